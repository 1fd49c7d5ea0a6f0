pub mod errors;
pub mod extractor;
pub mod models;
pub mod platform;
pub mod providers;
pub mod session;
pub mod stream;
pub mod tts;
pub mod voice;
