//! Claim storage configuration.

use serde::{Deserialize, Serialize};

/// Which bucket an [`crate::ObjectStore`] addresses. Primary and archive
/// buckets are identically shaped but never mixed in one call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BucketKind {
    Primary,
    Archive,
}

/// Configuration for claim payload storage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Primary bucket for active claim payloads.
    pub bucket: String,

    /// Archive bucket for long-term retention.
    pub archive_bucket: String,

    /// AWS region for S3.
    pub region: String,

    /// Optional S3 endpoint override (for MinIO in testing).
    pub endpoint_override: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: "ui-claims".to_string(),
            archive_bucket: "ui-claims-archive".to_string(),
            region: "us-east-1".to_string(),
            endpoint_override: None,
        }
    }
}

impl StorageConfig {
    pub fn bucket_for(&self, kind: BucketKind) -> &str {
        match kind {
            BucketKind::Primary => &self.bucket,
            BucketKind::Archive => &self.archive_bucket,
        }
    }
}
