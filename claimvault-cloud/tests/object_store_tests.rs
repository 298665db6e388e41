use claimvault_cloud::{BucketKind, MemoryBackend, ObjectStore, StorageConfig};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn primary_store() -> (Arc<MemoryBackend>, ObjectStore) {
    let backend = Arc::new(MemoryBackend::new());
    let store = ObjectStore::new(
        backend.clone(),
        &StorageConfig::default(),
        BucketKind::Primary,
    );
    (backend, store)
}

#[tokio::test]
async fn put_then_get_roundtrip() {
    let (_, store) = primary_store();

    store.put("AR/claim.json", b"payload".to_vec()).await.unwrap();
    let fetched = store.get("AR/claim.json").await.unwrap();

    assert_eq!(fetched, Some(b"payload".to_vec()));
}

#[tokio::test]
async fn get_missing_object_is_none() {
    let (_, store) = primary_store();

    let fetched = store.get("AR/nope.json").await.unwrap();

    assert_eq!(fetched, None);
}

#[tokio::test]
async fn get_transport_failure_is_error() {
    let (backend, store) = primary_store();
    backend.fail_gets(true);

    assert!(store.get("AR/claim.json").await.is_err());
}

#[tokio::test]
async fn delete_removes_all_named_objects() {
    let (backend, store) = primary_store();
    store.put("AR/a.json", b"a".to_vec()).await.unwrap();
    store.put("AR/b.json", b"b".to_vec()).await.unwrap();

    let deleted = store
        .delete(&["AR/a.json".to_string(), "AR/b.json".to_string()])
        .await;

    assert!(deleted);
    assert!(backend.is_empty().await);
}

#[tokio::test]
async fn delete_failure_reports_false() {
    let (backend, store) = primary_store();
    store.put("AR/a.json", b"a".to_vec()).await.unwrap();
    backend.fail_deletes(true);

    let deleted = store.delete(&["AR/a.json".to_string()]).await;

    assert!(!deleted);
    assert!(backend.contains("ui-claims", "AR/a.json").await);
}

#[tokio::test]
async fn primary_and_archive_buckets_are_isolated() {
    let backend = Arc::new(MemoryBackend::new());
    let config = StorageConfig::default();
    let primary = ObjectStore::new(backend.clone(), &config, BucketKind::Primary);
    let archive = ObjectStore::new(backend.clone(), &config, BucketKind::Archive);

    primary.put("AR/claim.json", b"live".to_vec()).await.unwrap();

    assert_eq!(primary.bucket(), "ui-claims");
    assert_eq!(archive.bucket(), "ui-claims-archive");
    assert_eq!(archive.get("AR/claim.json").await.unwrap(), None);
    assert_eq!(
        primary.get("AR/claim.json").await.unwrap(),
        Some(b"live".to_vec())
    );
}
