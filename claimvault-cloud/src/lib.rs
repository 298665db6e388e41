//! Object-store orchestration for claim payloads.
//!
//! Persists (typically encrypted) claim payloads to an S3-compatible
//! object store at paths derived from claim identity and completion
//! state, and appends the matching lifecycle events to the claim's audit
//! trail:
//! - [`ClaimWriter`] / [`ClaimReader`] — payload round-trips with
//!   STORED-event bookkeeping
//! - [`ObjectStore`] — one bucket (primary or archive) over a pluggable
//!   [`ObjectBackend`] (S3, or in-memory for tests)
//!
//! Store failures surface as `false` / `None` at this boundary so callers
//! can branch on success without catching transport-specific errors;
//! a failed write never records a STORED event.

pub mod claim_storage;
pub mod config;
pub mod error;
pub mod object_store;

pub use claim_storage::{delete_claim_artifacts, resolve_payload_path, ClaimReader, ClaimWriter};
pub use config::{BucketKind, StorageConfig};
pub use error::{CloudError, CloudResult};
pub use object_store::{MemoryBackend, ObjectBackend, ObjectStore, S3Backend};
