//! Text-to-speech relays. Both providers return encoded audio that the front
//! end plays as is.
pub mod base;
pub mod configs;
pub mod elevenlabs;
pub mod openai;

pub use base::{Audio, SpeechProvider, SpeechRequest, MAX_SPEECH_CHARS};
pub use configs::{ElevenLabsConfig, OpenAiSpeechConfig, VoiceCredential};
pub use elevenlabs::ElevenLabsProvider;
pub use openai::OpenAiSpeechProvider;
