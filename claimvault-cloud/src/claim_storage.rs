//! Claim payload writers and readers.
//!
//! Payloads (typically a [`claimvault_crypto::PackagedClaim`] in its JSON
//! form) are written to the object store at the claim's derived path, or
//! at an explicit path when one is given. A successful write appends one
//! STORED event to the claim's audit trail; a failed write appends
//! nothing and returns `false`. Reads degrade to `None` for missing
//! objects and transport failures — "no payload yet" is a normal state.

use crate::error::{CloudError, CloudResult};
use crate::object_store::ObjectStore;
use claimvault_storage::ClaimStore;
use claimvault_types::{Claim, EventCategory};
use tracing::{debug, error, warn};

/// Resolves the object path for a write or read: an explicit path wins,
/// otherwise the claim's completion-state-derived path.
pub fn resolve_payload_path(claim: Option<&Claim>, explicit: Option<&str>) -> CloudResult<String> {
    if let Some(path) = explicit {
        if !path.is_empty() {
            return Ok(path.to_string());
        }
    }
    if let Some(claim) = claim {
        return Ok(claim.payload_path());
    }
    Err(CloudError::InvalidArgument(
        "Must provide path or a Claim object".to_string(),
    ))
}

/// Writes one claim payload to the object store.
pub struct ClaimWriter {
    objects: ObjectStore,
    claims: ClaimStore,
    claim: Option<Claim>,
    path: String,
    payload: Vec<u8>,
}

impl ClaimWriter {
    pub fn new(
        objects: ObjectStore,
        claims: ClaimStore,
        claim: Option<&Claim>,
        payload: impl Into<Vec<u8>>,
        explicit_path: Option<&str>,
    ) -> CloudResult<Self> {
        let path = resolve_payload_path(claim, explicit_path)?;
        Ok(Self {
            objects,
            claims,
            claim: claim.cloned(),
            path,
            payload: payload.into(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Writes the payload; on success, appends a STORED event when a
    /// claim was supplied. Returns `false` on any failure — a failed
    /// write is never recorded as STORED.
    pub async fn write(&self) -> bool {
        if let Err(e) = self.objects.put(&self.path, self.payload.clone()).await {
            error!("claim payload write failed at {}: {e}", self.path);
            return false;
        }

        if let Some(claim) = &self.claim {
            let description = serde_json::json!({ "path": self.path }).to_string();
            if let Err(e) = self
                .claims
                .append_event(&claim.id, EventCategory::Stored, description)
            {
                warn!(
                    "payload stored at {} but STORED event append failed: {e}",
                    self.path
                );
                return false;
            }
        }
        true
    }
}

/// Reads one claim payload from the object store.
pub struct ClaimReader {
    objects: ObjectStore,
    path: String,
}

impl ClaimReader {
    pub fn new(
        objects: ObjectStore,
        claim: Option<&Claim>,
        explicit_path: Option<&str>,
    ) -> CloudResult<Self> {
        let path = resolve_payload_path(claim, explicit_path)?;
        Ok(Self { objects, path })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The payload bytes, or `None` when the object is missing or the
    /// fetch fails.
    pub async fn read(&self) -> Option<Vec<u8>> {
        match self.objects.get(&self.path).await {
            Ok(Some(bytes)) => Some(bytes),
            Ok(None) => {
                debug!("no payload at {}", self.path);
                None
            }
            Err(e) => {
                warn!("claim payload read failed at {}: {e}", self.path);
                None
            }
        }
    }
}

/// Purges both payload objects for a claim (completed and partial forms)
/// and appends a DELETED event on success.
pub async fn delete_claim_artifacts(
    objects: &ObjectStore,
    claims: &ClaimStore,
    claim: &Claim,
) -> bool {
    let paths = vec![claim.completed_payload_path(), claim.partial_payload_path()];
    if !objects.delete(&paths).await {
        return false;
    }

    let description = serde_json::json!({ "paths": paths }).to_string();
    match claims.append_event(&claim.id, EventCategory::Deleted, description) {
        Ok(_) => true,
        Err(e) => {
            warn!("artifacts purged but DELETED event append failed: {e}");
            false
        }
    }
}
