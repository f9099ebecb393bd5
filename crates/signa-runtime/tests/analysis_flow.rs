//! End-to-end gesture analysis runs against an in-process interpretation service

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use signa_client::InterpretationClient;
use signa_core::SignaError;
use signa_gesture::{
    BlankFrameSource, GestureClassifier, GestureResult, RecordedClassifier, Recognition,
    VideoFrame,
};
use signa_runtime::{run_analysis, AnalysisMode, AnalysisOptions, AnalysisSession};

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn ready_video_session() -> AnalysisSession {
    let mut session = AnalysisSession::new(AnalysisMode::Video, 0.7);
    session.set_recognizer_ready(true);
    session.set_video_source(Some("recording".to_string()));
    session
}

const GESTURES: [&str; 10] = [
    "Thumbs_Up",
    "Victory",
    "Open_Palm",
    "Closed_Fist",
    "ILoveYou",
    "Pointing_Up",
    "Thumbs_Down",
    "OK_Sign",
    "Rock_On",
    "Salute",
];

async fn interpret(Json(body): Json<Value>) -> Json<Value> {
    let prompt = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default();
    let answer = if prompt.contains("Yes/Agree Two/Peace") {
        "Yes, peace and hello."
    } else {
        "unexpected prompt"
    };
    Json(json!({ "candidates": [{ "content": { "parts": [{ "text": answer }] } }] }))
}

#[tokio::test]
async fn test_analysis_batches_and_interprets() {
    let addr = serve(Router::new().route("/generate", post(interpret))).await;

    // Each gesture held for two frames, plus noise that must not count
    let mut frames = Vec::new();
    for name in GESTURES {
        frames.push(Recognition::single(name, 0.9));
        frames.push(Recognition::single(name, 0.95));
        frames.push(Recognition::single("Pinch", 0.3));
    }
    let classifier = RecordedClassifier::new(frames);

    let mut session = ready_video_session();

    let report = run_analysis(
        &mut session,
        BlankFrameSource::video_file(200, 200),
        Arc::new(Mutex::new(classifier)),
        InterpretationClient::new(format!("http://{addr}/generate"), None),
        AnalysisOptions {
            frame_interval: Duration::from_millis(5),
            max_frames: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(report.frames, 200);
    assert_eq!(report.classified + report.dropped, 200);
    assert!(report.classified >= 30, "classified only {}", report.classified);
    assert_eq!(report.batches, 1);
    assert_eq!(report.interpretations, vec!["Yes, peace and hello.".to_string()]);
    assert!(!session.is_analyzing());
    assert_eq!(report.log[0].message, "Stopping analysis");
}

#[tokio::test]
async fn test_analysis_refused_without_recognizer() {
    let mut session = AnalysisSession::new(AnalysisMode::Live, 0.7);
    let result = run_analysis(
        &mut session,
        BlankFrameSource::camera(30),
        Arc::new(Mutex::new(RecordedClassifier::default())),
        InterpretationClient::new("http://127.0.0.1:9/generate", None),
        AnalysisOptions::default(),
    )
    .await;

    assert!(matches!(result, Err(SignaError::NotReady(_))));
}

#[tokio::test]
async fn test_empty_recording_refuses_to_start() {
    let classifier = RecordedClassifier::default();
    let mut session = AnalysisSession::new(AnalysisMode::Video, 0.7);
    session.set_recognizer_ready(classifier.is_ready());
    session.set_video_source(Some("empty".to_string()));

    let result = run_analysis(
        &mut session,
        BlankFrameSource::video_file(3, 30),
        Arc::new(Mutex::new(classifier)),
        InterpretationClient::new("http://127.0.0.1:9/generate", None),
        AnalysisOptions::default(),
    )
    .await;

    assert!(matches!(result, Err(SignaError::NotReady("gesture recognizer"))));
    assert_eq!(
        session.debug_log().next().map(|e| e.message.as_str()),
        Some("Cannot start: Recognizer not ready")
    );
}

/// Model that crashes on every frame
struct CrashingClassifier;

impl GestureClassifier for CrashingClassifier {
    fn recognize(&mut self, _frame: &VideoFrame, _timestamp_ms: u64) -> GestureResult<Recognition> {
        panic!("model crashed");
    }
}

#[tokio::test]
async fn test_analysis_survives_classifier_panic() {
    let mut session = ready_video_session();

    let run = run_analysis(
        &mut session,
        BlankFrameSource::video_file(3, 100),
        Arc::new(Mutex::new(CrashingClassifier)),
        InterpretationClient::new("http://127.0.0.1:9/generate", None),
        AnalysisOptions {
            frame_interval: Duration::from_millis(5),
            max_frames: None,
        },
    );
    let report = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("analysis did not finish after a classifier panic")
        .unwrap();

    assert_eq!(report.frames, 3);
    assert_eq!(report.classified, 0);
    assert!(report.failed >= 1);
    assert_eq!(report.failed + report.dropped, 3);
    assert_eq!(report.batches, 0);
    assert!(!session.is_analyzing());
    assert!(report
        .log
        .iter()
        .any(|entry| entry.message.contains("classifier task failed")));
    assert_eq!(report.log[0].message, "Stopping analysis");
}
