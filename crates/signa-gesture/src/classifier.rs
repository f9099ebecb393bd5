//! Classifier adapters
//!
//! The gesture model itself is an external collaborator. `RecordedClassifier`
//! replays its output from a JSON-lines file, one `Recognition` per line:
//!
//! ```text
//! {"hands": [{"gestures": [{"categoryName": "Victory", "score": 0.91}]}]}
//! {"hands": []}
//! ```

use std::path::Path;

use crate::{GestureError, GestureResult, Recognition, VideoFrame};

pub trait GestureClassifier: Send {
    /// Whether the model is loaded and can classify frames
    fn is_ready(&self) -> bool {
        true
    }

    /// Classify one frame. `timestamp_ms` must increase strictly between calls.
    fn recognize(&mut self, frame: &VideoFrame, timestamp_ms: u64) -> GestureResult<Recognition>;
}

/// Replays recorded classifier output in order
#[derive(Debug, Clone, Default)]
pub struct RecordedClassifier {
    frames: Vec<Recognition>,
    cursor: usize,
    looping: bool,
    last_timestamp: Option<u64>,
}

impl RecordedClassifier {
    pub fn new(frames: Vec<Recognition>) -> Self {
        Self {
            frames,
            ..Self::default()
        }
    }

    pub fn from_jsonl_str(text: &str) -> GestureResult<Self> {
        let mut frames = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let recognition = serde_json::from_str(line).map_err(|source| {
                GestureError::InvalidRecording {
                    line: index + 1,
                    source,
                }
            })?;
            frames.push(recognition);
        }
        Ok(Self::new(frames))
    }

    pub fn load(path: impl AsRef<Path>) -> GestureResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_jsonl_str(&text)
    }

    /// Restart from the first recording when exhausted
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.frames.len().saturating_sub(self.cursor)
    }
}

impl GestureClassifier for RecordedClassifier {
    /// An empty recording has nothing to replay
    fn is_ready(&self) -> bool {
        !self.frames.is_empty()
    }

    fn recognize(&mut self, _frame: &VideoFrame, timestamp_ms: u64) -> GestureResult<Recognition> {
        if let Some(last) = self.last_timestamp {
            if timestamp_ms <= last {
                return Err(GestureError::Classifier(format!(
                    "timestamp {timestamp_ms} does not follow {last}"
                )));
            }
        }
        self.last_timestamp = Some(timestamp_ms);

        if self.cursor >= self.frames.len() {
            if !self.looping || self.frames.is_empty() {
                return Ok(Recognition::empty());
            }
            self.cursor = 0;
        }
        let recognition = self.frames[self.cursor].clone();
        self.cursor += 1;
        Ok(recognition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn frame() -> VideoFrame {
        VideoFrame {
            width: 1,
            height: 1,
            timestamp_ms: 0,
            pixels: Bytes::from_static(&[0, 0, 0, 0]),
        }
    }

    const RECORDING: &str = r#"
# two frames
{"hands": [{"gestures": [{"categoryName": "Victory", "score": 0.91}]}]}

{"hands": []}
"#;

    #[test]
    fn test_replay_in_order() {
        let mut c = RecordedClassifier::from_jsonl_str(RECORDING).unwrap();
        assert_eq!(c.len(), 2);

        let first = c.recognize(&frame(), 1).unwrap();
        assert_eq!(first.top_gesture().unwrap().category, "Victory");
        assert!(!c.recognize(&frame(), 2).unwrap().has_hands());
        // Exhausted
        assert!(!c.recognize(&frame(), 3).unwrap().has_hands());
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn test_looping() {
        let mut c = RecordedClassifier::from_jsonl_str(RECORDING)
            .unwrap()
            .looping(true);
        c.recognize(&frame(), 1).unwrap();
        c.recognize(&frame(), 2).unwrap();
        assert!(c.recognize(&frame(), 3).unwrap().has_hands());
    }

    #[test]
    fn test_rejects_stale_timestamp() {
        let mut c = RecordedClassifier::from_jsonl_str(RECORDING).unwrap();
        c.recognize(&frame(), 10).unwrap();
        assert!(matches!(
            c.recognize(&frame(), 10),
            Err(GestureError::Classifier(_))
        ));
    }

    #[test]
    fn test_empty_recording_is_not_ready() {
        assert!(!RecordedClassifier::from_jsonl_str("# nothing\n").unwrap().is_ready());
        assert!(RecordedClassifier::from_jsonl_str(RECORDING).unwrap().is_ready());
    }

    #[test]
    fn test_bad_line_reports_number() {
        let err = RecordedClassifier::from_jsonl_str("{\"hands\": []}\n{oops").unwrap_err();
        assert!(matches!(err, GestureError::InvalidRecording { line: 2, .. }));
    }
}
