//! HTTP sender tests against a local mock collector

#![cfg(feature = "http")]

use log_shipper::prelude::*;
use log_shipper::HttpSender;
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn test_default_sender_posts_json_payload() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/logs")
        .match_header("content-type", "application/json")
        .match_header("authorization", "Bearer token-123")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({ "application": "web" })),
            Matcher::Regex(r#""event":"page_loaded""#.to_string()),
            Matcher::Regex(r#""logger":"frontend""#.to_string()),
        ]))
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let shipper = LogShipper::new();
    shipper
        .configure(
            ShipperConfig::builder()
                .endpoint(format!("{}/logs", server.url()))
                .header("Authorization", "Bearer token-123")
                .request_field("application", "web")
                .build(),
        )
        .expect("configure");

    shipper
        .create_logger("frontend", LogContext::new())
        .info("page_loaded");
    shipper.flush().await.expect("delivery succeeds");

    mock.assert_async().await;
    assert_eq!(shipper.metrics().delivered_count(), 1);
}

#[tokio::test]
async fn test_error_status_is_reported_and_lines_dropped() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/logs")
        .with_status(500)
        .create_async()
        .await;

    let shipper = LogShipper::new();
    shipper
        .configure(
            ShipperConfig::builder()
                .endpoint(format!("{}/logs", server.url()))
                .build(),
        )
        .expect("configure");

    shipper.create_logger("app", LogContext::new()).error("boom");
    let result = shipper.flush().await;

    assert!(matches!(
        result,
        Err(LoggerError::HttpStatus { status: 500, .. })
    ));
    assert_eq!(shipper.pending_len(), 0);
    assert_eq!(shipper.metrics().delivery_failures(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_http_sender_direct() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/ingest")
        .match_body(Matcher::PartialJson(json!({ "lines": [] })))
        .with_status(200)
        .create_async()
        .await;

    let sender = HttpSender::new(&format!("{}/ingest", server.url())).expect("sender");
    sender
        .send_logs(Payload::new(&LogContext::new(), Vec::new()))
        .await
        .expect("send");

    mock.assert_async().await;
}
