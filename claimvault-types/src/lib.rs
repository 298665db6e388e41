//! Core value types for claimvault.
//!
//! Holds the claim/event data model shared by the storage and cloud crates,
//! plus the `SwaXid` parser for state-issued transaction identifiers.
//!
//! A claim's completion state is always derived from its event log — there
//! is deliberately no stored "complete" flag that could drift out of sync.

mod claim;
mod swa_xid;

pub use claim::{Claim, Event, EventCategory};
pub use swa_xid::{SwaTimezones, SwaXid};
