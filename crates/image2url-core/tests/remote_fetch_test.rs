//! URL payload resolution against a local HTTP server.
//!
//! Run with: `cargo test -p image2url-core --test remote_fetch_test`

use image2url_core::constants::USER_AGENT;
use image2url_core::payload::resolve_from_url;
use image2url_core::{HttpRemoteClient, ToolError, MAX_INLINE_IMAGE_BYTES};

#[tokio::test]
async fn test_fetch_png() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/cat.png")
        .match_header("user-agent", USER_AGENT)
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body([0x89, b'P', b'N', b'G', 0x0D, 0x0A])
        .create_async()
        .await;

    let client = HttpRemoteClient::new().unwrap();
    let payload = resolve_from_url(&client, &format!("{}/cat.png", server.url()))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(payload.content_type(), "image/png");
    assert_eq!(payload.size(), 6);
}

#[tokio::test]
async fn test_http_error_status_is_a_fetch_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/missing.png")
        .with_status(404)
        .create_async()
        .await;

    let client = HttpRemoteClient::new().unwrap();
    let err = resolve_from_url(&client, &format!("{}/missing.png", server.url()))
        .await
        .unwrap_err();

    match err {
        ToolError::Fetch { status, reason } => {
            assert_eq!(status, Some(404));
            assert_eq!(reason, "HTTP 404: Not Found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_image_content_type_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/page")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body("<html></html>")
        .create_async()
        .await;

    let client = HttpRemoteClient::new().unwrap();
    let err = resolve_from_url(&client, &format!("{}/page", server.url()))
        .await
        .unwrap_err();

    match err {
        ToolError::UnsupportedType(ty) => assert_eq!(ty, "text/html"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_content_type_parameters_are_ignored() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/photo")
        .with_status(200)
        .with_header("content-type", "image/webp; q=0.9")
        .with_body("RIFF")
        .create_async()
        .await;

    let client = HttpRemoteClient::new().unwrap();
    let payload = resolve_from_url(&client, &format!("{}/photo", server.url()))
        .await
        .unwrap();

    assert_eq!(payload.content_type(), "image/webp");
}

#[tokio::test]
async fn test_url_path_has_no_size_ceiling() {
    let mut server = mockito::Server::new_async().await;
    let body = vec![0u8; MAX_INLINE_IMAGE_BYTES + 1];
    server
        .mock("GET", "/huge.jpg")
        .with_status(200)
        .with_header("content-type", "image/jpeg")
        .with_body(body)
        .create_async()
        .await;

    let client = HttpRemoteClient::new().unwrap();
    let payload = resolve_from_url(&client, &format!("{}/huge.jpg", server.url()))
        .await
        .unwrap();

    assert_eq!(payload.size(), MAX_INLINE_IMAGE_BYTES + 1);
}

#[tokio::test]
async fn test_unreachable_host_is_a_fetch_error() {
    let client = HttpRemoteClient::new().unwrap();
    let err = resolve_from_url(&client, "http://127.0.0.1:1/cat.png")
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::Fetch { status: None, .. }));
}
