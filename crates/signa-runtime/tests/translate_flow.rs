//! End-to-end translation runs against an in-process translation service

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use signa_anim::{AvatarAsset, PlaybackPhase, PlayerSession};
use signa_client::TranslationClient;
use signa_core::{Position3D, SignaError};
use signa_runtime::{
    run_translation, NoticeLevel, RenderOptions, TranslationDesk, TranslationOutcome,
};

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn fast() -> RenderOptions {
    RenderOptions {
        tick: Duration::from_millis(5),
        deadline: Duration::from_secs(10),
    }
}

fn session() -> PlayerSession {
    PlayerSession::new(AvatarAsset::default_humanoid()).unwrap()
}

#[tokio::test]
async fn test_translation_plays_to_held_pose() {
    let app = Router::new().route(
        "/convert",
        post(|| async {
            Json(json!({
                "sign_grammar_text": "HELLO",
                "frames_json": [
                    {"time": 0.0, "joints": {"LeftHand": [0, 0, 0], "RightHand": [0, 0, 0]}},
                    {"time": 0.1, "joints": {"LeftHand": [0.5, 0.2, 0], "RightHand": [-0.5, 0.2, 0]}},
                    {"time": 0.2, "joints": {"LeftHand": [1, 0.4, 0], "RightHand": [-1, 0.4, 0]}}
                ]
            }))
        }),
    );
    let addr = serve(app).await;

    let mut desk = TranslationDesk::new();
    desk.set_input("hello");
    let mut session = session();
    let report = run_translation(
        TranslationClient::new(format!("http://{addr}")),
        &mut desk,
        &mut session,
        fast(),
    )
    .await
    .unwrap();

    assert_eq!(report.phase, PlaybackPhase::Held);
    assert_eq!(report.translation.as_deref(), Some("HELLO"));
    assert_eq!(
        report.outcome,
        Some(TranslationOutcome::Loaded {
            frames: 3,
            skipped_joints: 0
        })
    );
    assert_eq!(report.pose["LeftHand"], Position3D::new(1.0, 0.4, 0.0));
    assert_eq!(report.pose["RightHand"], Position3D::new(-1.0, 0.4, 0.0));
    assert_eq!(report.notices.len(), 1);
    assert_eq!(report.notices[0].level, NoticeLevel::Success);
}

#[tokio::test]
async fn test_translation_failure_is_reported() {
    let app = Router::new().route(
        "/convert",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let addr = serve(app).await;

    let mut desk = TranslationDesk::new();
    desk.set_input("hello");
    let mut session = session();
    let report = run_translation(
        TranslationClient::new(format!("http://{addr}")),
        &mut desk,
        &mut session,
        fast(),
    )
    .await
    .unwrap();

    assert_eq!(report.outcome, Some(TranslationOutcome::Failed));
    assert_eq!(report.phase, PlaybackPhase::Idle);
    assert!(report.translation.is_none());
    assert!(report.pose.is_empty());
    assert_eq!(report.notices[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn test_malformed_frames_keep_translation() {
    let app = Router::new().route(
        "/convert",
        post(|| async { Json(json!({"sign_grammar_text": "HELLO", "frames_json": "{bad json"})) }),
    );
    let addr = serve(app).await;

    let mut desk = TranslationDesk::new();
    desk.set_input("hello");
    let mut session = session();
    let report = run_translation(
        TranslationClient::new(format!("http://{addr}")),
        &mut desk,
        &mut session,
        fast(),
    )
    .await
    .unwrap();

    assert_eq!(report.outcome, Some(TranslationOutcome::MalformedFrames));
    assert_eq!(report.translation.as_deref(), Some("HELLO"));
    assert_eq!(report.notices.len(), 1);
    assert_eq!(report.notices[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn test_empty_input_sends_nothing() {
    let mut desk = TranslationDesk::new();
    let mut session = session();
    // Nothing listens here; a request would fail differently
    let client = TranslationClient::new("http://127.0.0.1:9");

    let err = run_translation(client, &mut desk, &mut session, fast())
        .await
        .unwrap_err();
    assert!(matches!(err, SignaError::EmptyInput));
    assert_eq!(desk.notices()[0].level, NoticeLevel::Warning);
}
