//! Claim entity and its append-only event log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle event categories, with stable integer codes for persistence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    Started,
    Submitted,
    Completed,
    Fetched,
    Stored,
    ConfirmationEmail,
    Deleted,
    StatusChanged,
}

impl EventCategory {
    /// Stable integer code used in the database.
    pub fn code(self) -> i32 {
        match self {
            EventCategory::Started => 1,
            EventCategory::Submitted => 2,
            EventCategory::Completed => 3,
            EventCategory::Fetched => 4,
            EventCategory::Stored => 5,
            EventCategory::ConfirmationEmail => 6,
            EventCategory::Deleted => 7,
            EventCategory::StatusChanged => 8,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(EventCategory::Started),
            2 => Some(EventCategory::Submitted),
            3 => Some(EventCategory::Completed),
            4 => Some(EventCategory::Fetched),
            5 => Some(EventCategory::Stored),
            6 => Some(EventCategory::ConfirmationEmail),
            7 => Some(EventCategory::Deleted),
            8 => Some(EventCategory::StatusChanged),
            _ => None,
        }
    }
}

/// An immutable audit event owned by a single claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub claim_id: Uuid,
    pub category: EventCategory,
    /// Free text or JSON payload describing the event.
    pub description: String,
    pub happened_at: DateTime<Utc>,
}

impl Event {
    pub fn new(claim_id: Uuid, category: EventCategory, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            claim_id,
            category,
            description: description.into(),
            happened_at: Utc::now(),
        }
    }
}

/// An unemployment claim owned by a claimant at a state agency (SWA).
///
/// Completion is derived from the event log on every call, never cached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub id: Uuid,
    /// Issuing state workforce agency code (e.g. "AR").
    pub swa_code: String,
    /// Opaque reference to the owning claimant.
    pub claimant_id: String,
    pub status: Option<String>,
    pub events: Vec<Event>,
}

impl Claim {
    pub fn new(swa_code: impl Into<String>, claimant_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            swa_code: swa_code.into(),
            claimant_id: claimant_id.into(),
            status: None,
            events: Vec::new(),
        }
    }

    /// True iff at least one COMPLETED event exists in the log.
    pub fn is_complete(&self) -> bool {
        self.events
            .iter()
            .any(|e| e.category == EventCategory::Completed)
    }

    /// The canonical object-store path for this claim's payload, derived
    /// from its completion state. The two forms never collide.
    pub fn payload_path(&self) -> String {
        if self.is_complete() {
            self.completed_payload_path()
        } else {
            self.partial_payload_path()
        }
    }

    pub fn completed_payload_path(&self) -> String {
        format!("{}/{}.json", self.swa_code, self.id)
    }

    pub fn partial_payload_path(&self) -> String {
        format!("{}/{}.partial.json", self.swa_code, self.id)
    }

    /// Events ordered by occurrence time, ascending.
    pub fn ordered_events(&self) -> Vec<&Event> {
        let mut events: Vec<&Event> = self.events.iter().collect();
        events.sort_by_key(|e| e.happened_at);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_codes_roundtrip() {
        for code in 1..=8 {
            let category = EventCategory::from_code(code).unwrap();
            assert_eq!(category.code(), code);
        }
        assert!(EventCategory::from_code(0).is_none());
        assert!(EventCategory::from_code(9).is_none());
    }
}
