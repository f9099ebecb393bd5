//! Sequence Interpreter - per-frame classifications to gesture batches

use crate::{known_label, label_for, BufferPush, GestureSequenceBuffer, Recognition, NO_GESTURE};

/// Minimum confidence for a prediction to count
pub const CONFIDENCE_THRESHOLD: f32 = 0.70;

/// What one frame did to the interpreter
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    /// No hands in frame; latest gesture cleared
    NoHands,
    /// Hands but no usable prediction
    NoGesture,
    BelowThreshold { category: String, confidence: f32 },
    /// Accepted, but repeats the last buffered gesture
    Duplicate { category: String, confidence: f32 },
    Accepted {
        category: String,
        confidence: f32,
        buffered: usize,
    },
    /// Accepted and completed a batch
    Batch(GestureBatch),
}

impl Observation {
    /// One-line description for the host's activity log, or None when
    /// nothing was detected
    pub fn describe(&self) -> Option<String> {
        let (category, confidence) = match self {
            Observation::Duplicate {
                category,
                confidence,
            }
            | Observation::Accepted {
                category,
                confidence,
                ..
            } => (category.as_str(), *confidence),
            Observation::Batch(batch) => {
                return Some(format!(
                    "Detected batch of {} gestures",
                    batch.gestures().len()
                ))
            }
            _ => return None,
        };
        Some(format!(
            "Detected: {} ({:.2}) - {}",
            category,
            confidence,
            known_label(category).unwrap_or("Unknown gesture")
        ))
    }
}

/// A full sequence ready for interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureBatch {
    gestures: Vec<String>,
}

impl GestureBatch {
    pub fn new(gestures: Vec<String>) -> Self {
        let gestures = gestures.into_iter().filter(|g| g != NO_GESTURE).collect();
        Self { gestures }
    }

    pub fn gestures(&self) -> &[String] {
        &self.gestures
    }

    pub fn is_empty(&self) -> bool {
        self.gestures.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.gestures.iter().map(|g| label_for(g)).collect()
    }

    /// Prompt sent to the interpretation service
    pub fn prompt(&self) -> String {
        format!(
            "You are an assistant. Interpret this hand gesture sequence concisely:\n{}\n\nOriginal gestures: {}",
            self.labels().join(" "),
            self.gestures.join(" → ")
        )
    }
}

/// Confidence filter plus sequence buffer
#[derive(Debug)]
pub struct SequenceInterpreter {
    threshold: f32,
    buffer: GestureSequenceBuffer,
    latest: Option<String>,
    batches: u64,
}

impl SequenceInterpreter {
    pub fn new() -> Self {
        Self::with_threshold(CONFIDENCE_THRESHOLD)
    }

    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            threshold,
            buffer: GestureSequenceBuffer::new(),
            latest: None,
            batches: 0,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn latest_gesture(&self) -> Option<&str> {
        self.latest.as_deref()
    }

    /// Gestures collected toward the next batch
    pub fn partial_gestures(&self) -> &[String] {
        self.buffer.entries()
    }

    pub fn batches(&self) -> u64 {
        self.batches
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.latest = None;
    }

    pub fn observe(&mut self, recognition: &Recognition) -> Observation {
        if !recognition.has_hands() {
            self.latest = None;
            return Observation::NoHands;
        }
        let Some(top) = recognition.top_gesture() else {
            return Observation::NoGesture;
        };
        if top.category == NO_GESTURE {
            return Observation::NoGesture;
        }

        let confidence = if top.confidence.is_finite() {
            top.confidence
        } else {
            0.0
        };
        let category = top.category.clone();
        if confidence < self.threshold {
            return Observation::BelowThreshold {
                category,
                confidence,
            };
        }

        self.latest = Some(category.clone());
        match self.buffer.push(&category) {
            BufferPush::Duplicate | BufferPush::Ignored => Observation::Duplicate {
                category,
                confidence,
            },
            BufferPush::Appended(buffered) => {
                tracing::debug!(gesture = %category, confidence, buffered, "Gesture accepted");
                Observation::Accepted {
                    category,
                    confidence,
                    buffered,
                }
            }
            BufferPush::Full(gestures) => {
                self.batches += 1;
                tracing::debug!(batch = self.batches, "Gesture batch complete");
                Observation::Batch(GestureBatch::new(gestures))
            }
        }
    }
}

impl Default for SequenceInterpreter {
    fn default() -> Self {
        Self::new()
    }
}
