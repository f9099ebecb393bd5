//! Client tests against an in-process HTTP server

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use signa_client::{ClientError, InterpretationClient, TranslationClient};
use signa_core::PayloadError;

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn convert(Json(body): Json<Value>) -> Json<Value> {
    let text = body["text"].as_str().unwrap_or_default().to_uppercase();
    Json(json!({
        "sign_grammar_text": text,
        "frames_json": "[{\"time\": 0, \"joints\": {\"wrist\": [0, 0, 0]}}, {\"time\": 1, \"joints\": {\"wrist\": [1, 0, 0]}}]",
        "facial_expression": "neutral"
    }))
}

#[tokio::test]
async fn test_translate_round_trip() {
    let addr = serve(Router::new().route("/convert", post(convert))).await;
    let client = TranslationClient::new(format!("http://{addr}"));

    let resp = client.translate("hello there").await.unwrap();
    assert_eq!(resp.sign_grammar_text.as_deref(), Some("HELLO THERE"));
    assert_eq!(resp.facial_expression.as_deref(), Some("neutral"));

    let parsed = resp.frames().unwrap();
    assert_eq!(parsed.sequence.len(), 2);
    assert_eq!(parsed.skipped_joints, 0);
}

#[tokio::test]
async fn test_translate_server_error() {
    let app = Router::new().route(
        "/convert",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model offline") }),
    );
    let addr = serve(app).await;
    let client = TranslationClient::new(format!("http://{addr}"));

    match client.translate("hello").await {
        Err(ClientError::Api { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "model offline");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_translate_malformed_frames() {
    let app = Router::new().route(
        "/convert",
        post(|| async { Json(json!({ "sign_grammar_text": "HI", "frames_json": "{bad json" })) }),
    );
    let addr = serve(app).await;
    let client = TranslationClient::new(format!("http://{addr}"));

    let resp = client.translate("hi").await.unwrap();
    assert_eq!(resp.sign_grammar_text.as_deref(), Some("HI"));
    assert!(matches!(resp.frames(), Err(PayloadError::InvalidJson(_))));
}

#[tokio::test]
async fn test_translate_non_json_body() {
    let app = Router::new().route("/convert", post(|| async { "<html>oops</html>" }));
    let addr = serve(app).await;
    let client = TranslationClient::new(format!("http://{addr}"));

    assert!(matches!(
        client.translate("hi").await,
        Err(ClientError::Decode(_))
    ));
}

#[tokio::test]
async fn test_translate_connection_refused() {
    // Bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = TranslationClient::new(format!("http://{addr}"));
    assert!(matches!(
        client.translate("hi").await,
        Err(ClientError::Request(_))
    ));
}

async fn generate(
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let prompt = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default();
    let key = params.get("key").cloned().unwrap_or_default();
    Json(json!({
        "candidates": [{
            "content": { "parts": [{ "text": format!("  key={key} chars={}  ", prompt.len()) }] }
        }]
    }))
}

#[tokio::test]
async fn test_interpret_sends_key_and_prompt() {
    let addr = serve(Router::new().route("/generate", post(generate))).await;
    let client = InterpretationClient::new(
        format!("http://{addr}/generate"),
        Some("secret".to_string()),
    );

    let text = client.interpret("Yes/Agree Two/Peace").await.unwrap();
    assert_eq!(text.as_deref(), Some("key=secret chars=19"));
}

#[tokio::test]
async fn test_interpret_without_candidates() {
    let app = Router::new().route(
        "/generate",
        post(|| async { Json(json!({ "promptFeedback": { "blockReason": "OTHER" } })) }),
    );
    let addr = serve(app).await;
    let client = InterpretationClient::new(format!("http://{addr}/generate"), None);

    assert_eq!(client.interpret("anything").await.unwrap(), None);
}

#[tokio::test]
async fn test_interpret_rejected() {
    let app = Router::new().route(
        "/generate",
        post(|| async { (StatusCode::FORBIDDEN, "API key not valid") }),
    );
    let addr = serve(app).await;
    let client = InterpretationClient::new(format!("http://{addr}/generate"), None);

    assert!(matches!(
        client.interpret("anything").await,
        Err(ClientError::Api { status: 403, .. })
    ));
}
