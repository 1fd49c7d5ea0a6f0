//! Incremental ingestion of the backend's line-delimited event stream
pub mod cancel;
pub mod consumer;
pub mod decoder;
pub mod event;

pub use cancel::{CancelSignal, TurnControl};
pub use consumer::{StreamConsumer, StreamObserver, StreamOutcome, StreamState};
pub use decoder::LineDecoder;
pub use event::{EventKind, StreamEvent};
