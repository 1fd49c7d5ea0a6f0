//! Real-time voice sessions are hosted by a third party. The concierge only
//! mints session tokens and asks the hosted agent to join the visitor's room.
pub mod configs;
pub mod service;

pub use configs::VoiceProviderConfig;
pub use service::{AgentJoin, VoiceService, VoiceSession};
