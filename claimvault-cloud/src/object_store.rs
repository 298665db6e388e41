//! Object store over an S3-compatible backend.
//!
//! [`ObjectBackend`] is the seam between the orchestration layer and the
//! transport: [`S3Backend`] talks to real S3 (or MinIO via an endpoint
//! override), [`MemoryBackend`] backs tests and can simulate outages.
//! An [`ObjectStore`] binds a backend to exactly one bucket, chosen by
//! [`BucketKind`] at construction.

use crate::config::{BucketKind, StorageConfig};
use crate::error::{CloudError, CloudResult};
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use aws_sdk_s3::Client as S3Client;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Put/get/delete of opaque blobs by bucket and key.
#[async_trait]
pub trait ObjectBackend: Send + Sync {
    async fn put(&self, bucket: &str, key: &str, data: Vec<u8>) -> CloudResult<()>;

    /// `Ok(None)` for a missing key; `Err` for transport/auth failures.
    async fn get(&self, bucket: &str, key: &str) -> CloudResult<Option<Vec<u8>>>;

    /// Bulk delete. Any per-object error fails the whole batch.
    async fn delete(&self, bucket: &str, keys: &[String]) -> CloudResult<()>;
}

/// S3 transport for claim payloads.
pub struct S3Backend {
    client: S3Client,
}

impl S3Backend {
    /// Wraps an already-configured S3 client.
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }

    /// Builds a client from the default AWS credential provider chain.
    pub async fn from_config(config: &StorageConfig) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_types::region::Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(ref endpoint) = config.endpoint_override {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: S3Client::from_conf(builder.build()),
        }
    }

    /// Builds a client from explicit static credentials (e.g. MinIO).
    pub fn with_credentials(
        config: &StorageConfig,
        access_key_id: &str,
        secret_access_key: &str,
    ) -> Self {
        let credentials = aws_credential_types::Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "claimvault-static",
        );

        let mut builder = aws_sdk_s3::Config::builder()
            .region(aws_types::region::Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .behavior_version_latest();

        if let Some(ref endpoint) = config.endpoint_override {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: S3Client::from_conf(builder.build()),
        }
    }
}

#[async_trait]
impl ObjectBackend for S3Backend {
    async fn put(&self, bucket: &str, key: &str, data: Vec<u8>) -> CloudResult<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| CloudError::S3(format!("upload failed for {key}: {e}")))?;
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> CloudResult<Option<Vec<u8>>> {
        let resp = match self.client.get_object().bucket(bucket).key(key).send().await {
            Ok(resp) => resp,
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_no_such_key() {
                    return Ok(None);
                }
                return Err(CloudError::S3(format!(
                    "download failed for {key}: {service_err}"
                )));
            }
        };

        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| CloudError::S3(format!("failed to read body for {key}: {e}")))?;

        Ok(Some(body.into_bytes().to_vec()))
    }

    async fn delete(&self, bucket: &str, keys: &[String]) -> CloudResult<()> {
        let objects = keys
            .iter()
            .map(|key| ObjectIdentifier::builder().key(key).build())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CloudError::S3(format!("invalid delete key: {e}")))?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .build()
            .map_err(|e| CloudError::S3(format!("invalid delete batch: {e}")))?;

        let resp = self
            .client
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| CloudError::S3(format!("delete failed: {e}")))?;

        // partial failures count as overall failure
        if !resp.errors().is_empty() {
            return Err(CloudError::S3(format!(
                "delete failed for {} object(s)",
                resp.errors().len()
            )));
        }
        Ok(())
    }
}

/// In-memory backend for tests, with toggles to simulate store outages.
#[derive(Default)]
pub struct MemoryBackend {
    objects: RwLock<HashMap<(String, String), Vec<u8>>>,
    fail_puts: AtomicBool,
    fail_gets: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub async fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .read()
            .await
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectBackend for MemoryBackend {
    async fn put(&self, bucket: &str, key: &str, data: Vec<u8>) -> CloudResult<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(CloudError::S3(format!("upload failed for {key}: simulated")));
        }
        self.objects
            .write()
            .await
            .insert((bucket.to_string(), key.to_string()), data);
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> CloudResult<Option<Vec<u8>>> {
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(CloudError::S3(format!(
                "download failed for {key}: simulated"
            )));
        }
        Ok(self
            .objects
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned())
    }

    async fn delete(&self, bucket: &str, keys: &[String]) -> CloudResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(CloudError::S3("delete failed: simulated".to_string()));
        }
        let mut objects = self.objects.write().await;
        for key in keys {
            objects.remove(&(bucket.to_string(), key.to_string()));
        }
        Ok(())
    }
}

/// A backend bound to exactly one bucket.
#[derive(Clone)]
pub struct ObjectStore {
    backend: Arc<dyn ObjectBackend>,
    bucket: String,
}

impl ObjectStore {
    pub fn new(backend: Arc<dyn ObjectBackend>, config: &StorageConfig, kind: BucketKind) -> Self {
        Self {
            backend,
            bucket: config.bucket_for(kind).to_string(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub async fn put(&self, key: &str, data: Vec<u8>) -> CloudResult<()> {
        let size = data.len();
        self.backend.put(&self.bucket, key, data).await?;
        debug!("stored {size} bytes at s3://{}/{key}", self.bucket);
        Ok(())
    }

    pub async fn get(&self, key: &str) -> CloudResult<Option<Vec<u8>>> {
        self.backend.get(&self.bucket, key).await
    }

    /// Deletes one or more objects. Any failure, including a partial
    /// batch failure, is reported as overall failure.
    pub async fn delete(&self, keys: &[String]) -> bool {
        match self.backend.delete(&self.bucket, keys).await {
            Ok(()) => {
                debug!("deleted {} object(s) from s3://{}", keys.len(), self.bucket);
                true
            }
            Err(e) => {
                warn!("delete failed in s3://{}: {e}", self.bucket);
                false
            }
        }
    }
}
