//! These models represent the objects passed between the chat front end, the
//! streaming consumer and the service extractor
//!
//! The backend speaks in line-delimited event records; those are decoded into
//! [`crate::stream::StreamEvent`] and folded into text immediately. What survives a turn
//! is a [`turn::ChatTurn`] in the transcript plus whatever [`service::ExtractedService`]
//! cards the extractor found in the answer.
pub mod role;
pub mod service;
pub mod turn;
