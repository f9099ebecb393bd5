//! Headless drivers for both pipelines
//!
//! The owner of the session state runs a single loop. Render ticks and
//! frame captures come from `tokio::time::interval`; network and
//! classification results come back over an mpsc channel and are applied
//! in the same loop, so state is never touched from two places.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;
use signa_anim::{PlaybackPhase, PlayerSession};
use signa_client::{InterpretationClient, TranslationClient, TranslationResponse};
use signa_core::{Generation, Position3D, SignaError, SignaResult};
use signa_gesture::{
    FrameSource, FrameStamper, GestureClassifier, GestureError, GestureResult, ProcessingGate,
    Recognition, SourceKind,
};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::{
    AnalysisSession, Completion, DebugEntry, Notice, TranslationDesk, TranslationOutcome,
};

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Render tick interval
    pub tick: Duration,
    /// Give up after this long, response or not
    pub deadline: Duration,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            tick: Duration::from_millis(16),
            deadline: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslationReport {
    pub translation: Option<String>,
    pub facial_expression: Option<String>,
    pub outcome: Option<TranslationOutcome>,
    pub phase: PlaybackPhase,
    pub ticks: u64,
    pub elapsed_ms: u64,
    /// Final positions of the joints in the last keyframe
    pub pose: BTreeMap<String, Position3D>,
    pub notices: Vec<Notice>,
}

type TranslationResult = (Generation, SignaResult<TranslationResponse>);

/// Submit the desk's input, then render until the animation settles.
///
/// Returns once the response has been applied and playback is no longer
/// `Playing`, or when the deadline passes.
pub async fn run_translation(
    client: TranslationClient,
    desk: &mut TranslationDesk,
    session: &mut PlayerSession,
    options: RenderOptions,
) -> SignaResult<TranslationReport> {
    let ticket = desk.submit()?;

    let (tx, mut rx) = mpsc::channel::<TranslationResult>(4);
    tokio::spawn(async move {
        let result = client
            .translate(&ticket.text)
            .await
            .map_err(SignaError::from);
        let _ = tx.send((ticket.generation, result)).await;
    });

    let started = Instant::now();
    let mut interval = tokio::time::interval(options.tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut outcome = None;
    let mut ticks = 0u64;

    loop {
        tokio::select! {
            Some((generation, result)) = rx.recv() => {
                if let Completion::Applied(applied) = desk.complete(generation, result, session) {
                    outcome = Some(applied);
                }
            }
            _ = interval.tick() => {
                session.tick();
                ticks += 1;
                if outcome.is_some() && session.phase() != PlaybackPhase::Playing {
                    break;
                }
                if started.elapsed() >= options.deadline {
                    tracing::warn!(ticks, "Render deadline reached");
                    break;
                }
            }
        }
    }

    let pose = session
        .player()
        .sequence()
        .and_then(|sequence| sequence.last())
        .map(|frame| {
            frame
                .joints
                .keys()
                .filter_map(|name| session.joint_position(name).map(|p| (name.clone(), p)))
                .collect()
        })
        .unwrap_or_default();

    Ok(TranslationReport {
        translation: desk.translation().map(str::to_string),
        facial_expression: desk.facial_expression().map(str::to_string),
        outcome,
        phase: session.phase(),
        ticks,
        elapsed_ms: started.elapsed().as_millis() as u64,
        pose,
        notices: desk.take_notices(),
    })
}

#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    /// Time between captured frames
    pub frame_interval: Duration,
    /// Stop after this many frames; a video file also stops when it ends
    pub max_frames: Option<u64>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            frame_interval: Duration::from_millis(33),
            max_frames: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisReport {
    /// Frames captured from the source
    pub frames: u64,
    pub classified: u64,
    /// Frames whose classification returned an error
    pub failed: u64,
    /// Frames dropped because another was still being classified
    pub dropped: u64,
    pub batches: u64,
    pub interpretations: Vec<String>,
    /// Activity log, newest first
    pub log: Vec<DebugEntry>,
}

enum AnalysisEvent {
    Recognized(GestureResult<Recognition>),
    Interpreted(Generation, SignaResult<Option<String>>),
}

/// Capture, classify and interpret until the source is done and nothing is
/// in flight. The session must be ready to start.
///
/// A classification or interpretation task that panics settles as an
/// error, so every admitted frame and every batch is accounted for.
pub async fn run_analysis<S, C>(
    session: &mut AnalysisSession,
    mut source: S,
    classifier: Arc<Mutex<C>>,
    interpreter: InterpretationClient,
    options: AnalysisOptions,
) -> SignaResult<AnalysisReport>
where
    S: FrameSource,
    C: GestureClassifier + 'static,
{
    session.start()?;

    let gate = ProcessingGate::new();
    let mut stamper = FrameStamper::new();
    let (tx, mut rx) = mpsc::channel::<AnalysisEvent>(32);
    let mut interval = tokio::time::interval(options.frame_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut report = AnalysisReport::default();
    let mut pending_frames = 0u64;
    let mut pending_interpretations = 0u64;
    let mut exhausted = false;

    loop {
        tokio::select! {
            Some(event) = rx.recv() => match event {
                AnalysisEvent::Recognized(Ok(recognition)) => {
                    pending_frames -= 1;
                    report.classified += 1;
                    if let Some(ticket) = session.observe(&recognition) {
                        report.batches += 1;
                        pending_interpretations += 1;
                        let client = interpreter.clone();
                        let prompt = ticket.prompt;
                        let request = tokio::spawn(async move {
                            client.interpret(&prompt).await.map_err(SignaError::from)
                        });
                        let generation = ticket.generation;
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            let result = request.await.unwrap_or_else(|err| {
                                Err(SignaError::Transport(format!(
                                    "interpretation task failed: {err}"
                                )))
                            });
                            let _ = tx
                                .send(AnalysisEvent::Interpreted(generation, result))
                                .await;
                        });
                    }
                }
                AnalysisEvent::Recognized(Err(err)) => {
                    pending_frames -= 1;
                    report.failed += 1;
                    session.frame_error(err);
                }
                AnalysisEvent::Interpreted(generation, result) => {
                    pending_interpretations -= 1;
                    let text = result.as_ref().ok().cloned().flatten();
                    let completion = session.complete_interpretation(generation, result);
                    if let (Completion::Applied(()), Some(text)) = (completion, text) {
                        report.interpretations.push(text);
                    }
                }
            },
            _ = interval.tick(), if !exhausted => {
                let limit_hit = options.max_frames.is_some_and(|max| report.frames >= max);
                let next = if limit_hit { None } else { source.next_frame() };
                match next {
                    None => exhausted = true,
                    Some(frame) => {
                        report.frames += 1;
                        if let Some(guard) = gate.try_enter() {
                            pending_frames += 1;
                            let timestamp = stamper.stamp(frame.timestamp_ms);
                            let classifier = Arc::clone(&classifier);
                            let work = tokio::task::spawn_blocking(move || {
                                classifier.lock().recognize(&frame, timestamp)
                            });
                            let tx = tx.clone();
                            // The gate stays closed until the result is queued,
                            // so results arrive in capture order.
                            tokio::spawn(async move {
                                let result = work.await.unwrap_or_else(|err| {
                                    Err(GestureError::Classifier(format!(
                                        "classifier task failed: {err}"
                                    )))
                                });
                                let _ = tx.send(AnalysisEvent::Recognized(result)).await;
                                drop(guard);
                            });
                        } else {
                            tracing::trace!("Frame dropped; previous frame still processing");
                        }
                    }
                }
            }
        }

        if exhausted && pending_frames == 0 && pending_interpretations == 0 {
            break;
        }
    }

    match source.kind() {
        SourceKind::VideoFile => session.video_ended(),
        SourceKind::Camera => session.stop(),
    }
    source.stop();

    report.dropped = gate.dropped();
    report.log = session.debug_log().cloned().collect();
    tracing::info!(
        frames = report.frames,
        classified = report.classified,
        failed = report.failed,
        dropped = report.dropped,
        batches = report.batches,
        "Analysis finished"
    );
    Ok(report)
}
