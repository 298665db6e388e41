use chrono::{Duration, Utc};
use claimvault_types::{Claim, Event, EventCategory};
use pretty_assertions::assert_eq;

#[test]
fn new_claim_is_not_complete() {
    let claim = Claim::new("AR", "claimant-1");
    assert!(!claim.is_complete());
}

#[test]
fn completed_event_marks_claim_complete() {
    let mut claim = Claim::new("AR", "claimant-1");
    claim
        .events
        .push(Event::new(claim.id, EventCategory::Started, ""));
    assert!(!claim.is_complete());

    claim
        .events
        .push(Event::new(claim.id, EventCategory::Completed, ""));
    assert!(claim.is_complete());
}

#[test]
fn payload_path_tracks_completion_state() {
    let mut claim = Claim::new("AR", "claimant-1");
    let partial = format!("AR/{}.partial.json", claim.id);
    let completed = format!("AR/{}.json", claim.id);

    assert_eq!(claim.payload_path(), partial);

    claim
        .events
        .push(Event::new(claim.id, EventCategory::Completed, ""));
    assert_eq!(claim.payload_path(), completed);

    // the two canonical paths never collide
    assert_ne!(claim.partial_payload_path(), claim.completed_payload_path());
}

#[test]
fn ordered_events_sorts_by_occurrence_time() {
    let mut claim = Claim::new("AR", "claimant-1");
    let now = Utc::now();

    let mut later = Event::new(claim.id, EventCategory::Submitted, "second");
    later.happened_at = now + Duration::seconds(10);
    let mut earlier = Event::new(claim.id, EventCategory::Started, "first");
    earlier.happened_at = now;

    claim.events.push(later);
    claim.events.push(earlier);

    let ordered: Vec<&str> = claim
        .ordered_events()
        .iter()
        .map(|e| e.description.as_str())
        .collect();
    assert_eq!(ordered, vec!["first", "second"]);
}

#[test]
fn claim_serialization_roundtrip() {
    let mut claim = Claim::new("AR", "claimant-1");
    claim.status = Some("processing".to_string());
    claim
        .events
        .push(Event::new(claim.id, EventCategory::Stored, "AR/path.json"));

    let json = serde_json::to_string(&claim).unwrap();
    let decoded: Claim = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, claim);
}
