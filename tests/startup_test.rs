//! Startup checks: library permissions and webhook registration.

mod common;

use common::{Call, FakeVideoSource};
use subscout::startup::{check_library_permissions, ensure_webhook_registered};

#[tokio::test]
async fn writable_locations_pass() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    let source = FakeVideoSource::new();
    *source.locations.lock() = vec![a.path().to_path_buf(), b.path().to_path_buf()];

    assert!(check_library_permissions(&source).await.unwrap());
}

#[tokio::test]
async fn missing_location_fails() {
    let a = tempfile::tempdir().unwrap();
    let source = FakeVideoSource::new();
    *source.locations.lock() = vec![a.path().to_path_buf(), a.path().join("gone")];

    assert!(!check_library_permissions(&source).await.unwrap());
}

#[tokio::test]
async fn registered_webhook_is_left_alone() {
    let source = FakeVideoSource::new();
    *source.webhooks.lock() = vec!["http://10.0.0.5:8686/webhook".to_string()];

    assert!(ensure_webhook_registered(&source, "http://10.0.0.5:8686/webhook")
        .await
        .unwrap());
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn missing_webhook_is_added() {
    let source = FakeVideoSource::new();
    *source.webhooks.lock() = vec!["http://other/hook".to_string()];

    assert!(ensure_webhook_registered(&source, "http://10.0.0.5:8686/webhook")
        .await
        .unwrap());
    assert_eq!(
        source.calls(),
        vec![Call::AddWebhook("http://10.0.0.5:8686/webhook".to_string())]
    );
}
