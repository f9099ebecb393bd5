//! Analysis Session - state behind the gesture-analysis pipeline

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use signa_core::{Generation, GenerationCounter, SignaError, SignaResult};
use signa_gesture::{GestureBatch, Observation, Recognition, SequenceInterpreter};

use crate::Completion;

/// Entries kept in the activity log
pub const DEBUG_LOG_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Uploaded video file
    Video,
    /// Live camera
    Live,
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMode::Video => write!(f, "video"),
            AnalysisMode::Live => write!(f, "live"),
        }
    }
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "video" => Ok(AnalysisMode::Video),
            "live" | "camera" => Ok(AnalysisMode::Live),
            other => Err(format!("unknown mode '{other}', expected video or live")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugEntry {
    pub message: String,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}

/// A batch waiting for its interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpretTicket {
    pub generation: Generation,
    pub batch: GestureBatch,
    pub prompt: String,
}

#[derive(Debug)]
pub struct AnalysisSession {
    mode: AnalysisMode,
    recognizer_ready: bool,
    video_source: Option<String>,
    analyzing: bool,
    interpreter: SequenceInterpreter,
    interpretation: Option<String>,
    /// Newest first
    debug_log: VecDeque<DebugEntry>,
    generations: GenerationCounter,
}

impl AnalysisSession {
    pub fn new(mode: AnalysisMode, confidence_threshold: f32) -> Self {
        Self {
            mode,
            recognizer_ready: false,
            video_source: None,
            analyzing: false,
            interpreter: SequenceInterpreter::with_threshold(confidence_threshold),
            interpretation: None,
            debug_log: VecDeque::with_capacity(DEBUG_LOG_CAPACITY),
            generations: GenerationCounter::new(),
        }
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    pub fn is_recognizer_ready(&self) -> bool {
        self.recognizer_ready
    }

    pub fn video_source(&self) -> Option<&str> {
        self.video_source.as_deref()
    }

    pub fn latest_gesture(&self) -> Option<&str> {
        self.interpreter.latest_gesture()
    }

    pub fn partial_gestures(&self) -> &[String] {
        self.interpreter.partial_gestures()
    }

    pub fn interpretation(&self) -> Option<&str> {
        self.interpretation.as_deref()
    }

    pub fn debug_log(&self) -> impl Iterator<Item = &DebugEntry> {
        self.debug_log.iter()
    }

    pub fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("{}", message);
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.debug_log.push_front(DebugEntry {
            message,
            timestamp_ms,
        });
        self.debug_log.truncate(DEBUG_LOG_CAPACITY);
    }

    pub fn set_recognizer_ready(&mut self, ready: bool) {
        self.recognizer_ready = ready;
        if ready {
            self.log("GestureRecognizer initialized successfully");
        } else {
            self.log("GestureRecognizer unavailable");
        }
    }

    pub fn set_video_source(&mut self, source: Option<String>) {
        self.video_source = source;
    }

    /// Switching mode stops any running analysis and clears results.
    pub fn set_mode(&mut self, mode: AnalysisMode) {
        self.stop();
        self.mode = mode;
        self.log(format!("Switched to {mode} mode"));
    }

    /// Refused unless the recognizer is ready and, in video mode, a video
    /// has been chosen.
    pub fn start(&mut self) -> SignaResult<()> {
        if !self.recognizer_ready {
            self.log("Cannot start: Recognizer not ready");
            return Err(SignaError::NotReady("gesture recognizer"));
        }
        if self.mode == AnalysisMode::Video && self.video_source.is_none() {
            self.log("Cannot start: No video uploaded");
            return Err(SignaError::NotReady("video source"));
        }

        self.analyzing = true;
        self.log(format!("Starting analysis in {} mode", self.mode));
        Ok(())
    }

    /// Stop and reset results. Interpretations still in flight become stale.
    pub fn stop(&mut self) {
        self.log("Stopping analysis");
        self.analyzing = false;
        self.interpreter.reset();
        self.interpretation = None;
        self.generations.advance();
    }

    pub fn video_ended(&mut self) {
        self.log("Video finished");
        self.stop();
    }

    pub fn frame_error(&mut self, error: impl fmt::Display) {
        self.log(format!("Frame processing error: {error}"));
    }

    /// Feed one classified frame. Returns a ticket when a batch is ready
    /// to be interpreted.
    pub fn observe(&mut self, recognition: &Recognition) -> Option<InterpretTicket> {
        if !self.analyzing {
            return None;
        }

        let observation = self.interpreter.observe(recognition);
        if let Some(line) = observation.describe() {
            self.log(line);
        }

        let Observation::Batch(batch) = observation else {
            return None;
        };
        if batch.is_empty() {
            return None;
        }

        self.log("Requesting AI interpretation...");
        let prompt = batch.prompt();
        Some(InterpretTicket {
            generation: self.generations.advance(),
            batch,
            prompt,
        })
    }

    /// Apply an interpretation result. Results for a superseded batch, or
    /// from before a stop or mode change, are discarded.
    pub fn complete_interpretation(
        &mut self,
        generation: Generation,
        result: SignaResult<Option<String>>,
    ) -> Completion {
        if !self.generations.is_current(generation) {
            tracing::debug!(%generation, "Discarding stale interpretation");
            return Completion::Stale;
        }

        match result {
            Ok(Some(text)) => {
                self.log(format!("Interpreted as: {text}"));
                self.interpretation = Some(text);
            }
            Ok(None) => self.log("No interpretation received from AI."),
            Err(err) => {
                tracing::warn!(error = %err, "Interpretation failed");
                self.interpretation = None;
                self.log(format!("Error getting AI interpretation: {err}"));
            }
        }
        Completion::Applied(())
    }
}
