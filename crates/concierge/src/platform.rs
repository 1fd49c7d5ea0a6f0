//! Capabilities that only some front ends have: audio in and out, and a way to
//! recognise a returning visitor. Front ends without them use the no-op and
//! in-memory implementations here.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Speech capture and playback owned by the front end
pub trait AudioIo: Send + Sync {
    /// Begin capturing the visitor's voice
    fn start(&mut self);

    /// Stop capturing and cut off any playback in progress
    fn stop(&mut self);

    /// Read text aloud
    fn speak(&mut self, text: &str);

    fn is_active(&self) -> bool;
}

/// Audio for front ends that have none
#[derive(Debug, Default)]
pub struct NoopAudio;

impl AudioIo for NoopAudio {
    fn start(&mut self) {}

    fn stop(&mut self) {}

    fn speak(&mut self, _text: &str) {}

    fn is_active(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorRecord {
    /// Set once the visitor introduces themselves
    #[serde(default)]
    pub name: Option<String>,
    pub first_visit: DateTime<Utc>,
    pub last_visit: DateTime<Utc>,
    pub visit_count: u32,
    /// Opaque identifier, also sent to the backend as the user
    pub fingerprint: String,
}

impl VisitorRecord {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            name: None,
            first_visit: now,
            last_visit: now,
            visit_count: 1,
            fingerprint: Uuid::new_v4().to_string(),
        }
    }

    pub fn is_returning(&self) -> bool {
        self.visit_count > 1
    }
}

/// Persistence for the visitor record, wherever the front end keeps it
pub trait ClientIdentity: Send {
    fn load(&self) -> Option<VisitorRecord>;

    fn save(&mut self, record: &VisitorRecord);

    /// Record a visit at `now`, creating the record on the first one
    fn recognize(&mut self, now: DateTime<Utc>) -> VisitorRecord {
        let record = match self.load() {
            Some(mut record) => {
                record.visit_count = record.visit_count.saturating_add(1);
                record.last_visit = now;
                record
            }
            None => VisitorRecord::new(now),
        };
        tracing::debug!(visits = record.visit_count, "Recognized visitor");
        self.save(&record);
        record
    }
}

/// Identity that lives as long as the process
#[derive(Debug, Default)]
pub struct InMemoryIdentity {
    record: Option<VisitorRecord>,
}

impl InMemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientIdentity for InMemoryIdentity {
    fn load(&self) -> Option<VisitorRecord> {
        self.record.clone()
    }

    fn save(&mut self, record: &VisitorRecord) {
        self.record = Some(record.clone());
    }
}
