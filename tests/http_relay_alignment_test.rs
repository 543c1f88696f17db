//! HTTP-level relay behavior against a real socket: path selection,
//! bearer auth, pass-through, timeout surfacing, and classification of
//! the bodies real gateways produce.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mediagen::error::GenError;
use mediagen::relay::{self, BodyKind, HttpRelay, Relay};

#[tokio::test]
async fn chat_bodies_hit_the_chat_path_with_bearer_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({ "model": "m" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let relay = HttpRelay::new();
    let response = relay
        .post(&server.uri(), "sk-test", BodyKind::Chat, &json!({ "model": "m" }))
        .await
        .unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn non_chat_bodies_hit_the_images_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(3)
        .mount(&server)
        .await;

    let relay = HttpRelay::new();
    for kind in [BodyKind::Images, BodyKind::WebUi, BodyKind::ChatVideo] {
        relay
            .post(&server.uri(), "sk-test", kind, &json!({ "prompt": "x" }))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn trailing_slash_endpoints_normalize() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let relay = HttpRelay::new();
    let endpoint = format!("{}/", server.uri());
    let response = relay.get_models(&endpoint, "sk-test").await.unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn status_and_body_pass_through_unmodified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({ "error": "rate limited" })),
        )
        .mount(&server)
        .await;

    let relay = HttpRelay::new();
    let response = relay
        .post(&server.uri(), "sk", BodyKind::Chat, &json!({}))
        .await
        .unwrap();
    assert_eq!(response.status, 429);
    assert!(response.raw_text.contains("rate limited"));

    // Classification turns it into a structured error.
    match relay::classify(&response) {
        Err(GenError::ApiError { code, message, .. }) => {
            assert_eq!(code, 429);
            assert_eq!(message, "rate limited");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn html_gateway_page_classifies_with_a_hint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(504)
                .set_body_string("<html><body>504 Gateway Time-out</body></html>")
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let relay = HttpRelay::new();
    let response = relay
        .post(&server.uri(), "sk", BodyKind::Chat, &json!({}))
        .await
        .unwrap();

    match relay::classify(&response) {
        Err(GenError::GatewayError { status: 504, message }) => {
            assert!(message.contains("Gateway timeout"));
        }
        other => panic!("expected gateway error, got {other:?}"),
    }
}

#[tokio::test]
async fn unparsable_body_classifies_as_format_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_string("oops not json"))
        .mount(&server)
        .await;

    let relay = HttpRelay::new();
    let response = relay
        .post(&server.uri(), "sk", BodyKind::Images, &json!({}))
        .await
        .unwrap();

    match relay::classify(&response) {
        Err(GenError::ParseError(message)) => assert!(message.contains("oops not json")),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_upstream_surfaces_as_a_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "choices": [] }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let relay =
        HttpRelay::new().with_timeouts(Duration::from_millis(100), Duration::from_millis(100));
    let err = relay
        .post(&server.uri(), "sk", BodyKind::Chat, &json!({}))
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {err:?}");
}

#[tokio::test]
async fn model_listing_uses_the_metadata_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [{ "id": "model-a" }] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let relay = HttpRelay::new();
    let response = relay.get_models(&server.uri(), "sk-test").await.unwrap();
    let body = relay::classify(&response).unwrap();
    assert_eq!(body["data"][0]["id"], "model-a");
}
