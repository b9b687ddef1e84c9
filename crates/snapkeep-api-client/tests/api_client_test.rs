//! Contract tests for the content-service client, against a mock server.

use std::sync::Arc;

use bytes::Bytes;
use mockito::Matcher;

use snapkeep_api_client::ApiClient;
use snapkeep_core::{
    ErrorReport, Platform, RegisterFile, StaticCredentialProvider, UploadError, UploadStage,
};

fn client_for(server: &mockito::ServerGuard, token: &str) -> ApiClient {
    ApiClient::new(server.url(), Arc::new(StaticCredentialProvider::new(token)))
}

#[tokio::test]
async fn presigned_request_carries_bearer_and_file_name() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/s3/presigned/upload")
        .match_query(Matcher::UrlEncoded(
            "fileName".into(),
            "capture_1700000000000.png".into(),
        ))
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":{"url":"https://bucket/capture_1700000000000.png?sig=abc","key":"uploads/capture_1700000000000.png"}}"#)
        .create_async()
        .await;

    let client = client_for(&server, "test-token");
    let presigned = client
        .get_upload_url("capture_1700000000000.png")
        .await
        .expect("presigned url");

    assert_eq!(presigned.key, "uploads/capture_1700000000000.png");
    assert!(presigned.url.contains("?sig=abc"));
    mock.assert_async().await;
}

#[tokio::test]
async fn missing_credential_fails_without_any_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/s3/presigned/upload")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server, "");
    let err = client.get_upload_url("text_1.txt").await.unwrap_err();

    assert!(matches!(err, UploadError::Unauthorized { .. }));
    assert_eq!(err.stage(), UploadStage::RequestingUrl);
    mock.assert_async().await;
}

#[tokio::test]
async fn rejected_credential_maps_to_unauthorized() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/s3/presigned/upload")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body("token expired")
        .create_async()
        .await;

    let client = client_for(&server, "stale-token");
    let err = client.get_upload_url("text_1.txt").await.unwrap_err();

    assert!(matches!(err, UploadError::Unauthorized { .. }));
    assert_eq!(err.stage(), UploadStage::RequestingUrl);
}

#[tokio::test]
async fn rejected_credential_at_registration_names_that_stage() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/files/complete")
        .with_status(401)
        .with_body("token expired")
        .create_async()
        .await;

    let client = client_for(&server, "stale-token");
    let err = client
        .complete_upload(&RegisterFile {
            key: "uploads/x".into(),
            media_type: "image/png".into(),
            file_size: 1,
            origin_url: "https://bucket/x".into(),
            platform: Platform::Web,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::Unauthorized { .. }));
    assert_eq!(err.stage(), UploadStage::Registering);
}

#[tokio::test]
async fn blob_write_puts_exact_bytes_and_media_type() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/bucket/image_1.png")
        .match_query(Matcher::Any)
        .match_header("content-type", "image/png")
        .match_body(Matcher::Exact("PNGDATA".into()))
        .with_status(200)
        .create_async()
        .await;

    let client = client_for(&server, "test-token");
    let write_url = format!("{}/bucket/image_1.png?X-Amz-Signature=sig", server.url());
    client
        .upload_blob(&write_url, Bytes::from_static(b"PNGDATA"), "image/png")
        .await
        .expect("blob write");

    mock.assert_async().await;
}

#[tokio::test]
async fn blob_write_failure_is_a_storage_write_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("PUT", "/bucket/image_1.png")
        .with_status(500)
        .create_async()
        .await;

    let client = client_for(&server, "test-token");
    let write_url = format!("{}/bucket/image_1.png?sig=abc", server.url());
    let err = client
        .upload_blob(&write_url, Bytes::from_static(b"PNGDATA"), "image/png")
        .await
        .unwrap_err();

    assert_eq!(err.stage(), UploadStage::Uploading);
    assert!(err.user_message().contains("storage write"));
}

#[tokio::test]
async fn registration_sends_wire_shape_and_returns_id() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/files/complete")
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "key": "uploads/image_1.png",
            "type": "image/png",
            "fileSize": 7,
            "originUrl": "https://bucket/image_1.png",
            "platform": "WEB",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":{"id":42,"categoryId":null}}"#)
        .create_async()
        .await;

    let client = client_for(&server, "test-token");
    let record = client
        .complete_upload(&RegisterFile {
            key: "uploads/image_1.png".into(),
            media_type: "image/png".into(),
            file_size: 7,
            origin_url: "https://bucket/image_1.png".into(),
            platform: Platform::Web,
        })
        .await
        .expect("registration");

    assert_eq!(record.id, 42);
    mock.assert_async().await;
}

#[tokio::test]
async fn registration_failure_names_file_registration() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/files/complete")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let client = client_for(&server, "test-token");
    let err = client
        .complete_upload(&RegisterFile {
            key: "uploads/x".into(),
            media_type: "image/png".into(),
            file_size: 1,
            origin_url: "https://bucket/x".into(),
            platform: Platform::App,
        })
        .await
        .unwrap_err();

    assert_eq!(err.stage(), UploadStage::Registering);
    assert!(err.user_message().contains("file registration"));
}

#[tokio::test]
async fn post_process_targets_the_file_id() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/files/42/post-process")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .create_async()
        .await;

    let client = client_for(&server, "test-token");
    client.post_process(42).await.expect("post-process");

    mock.assert_async().await;
}
