//! Gesture pipeline errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GestureError {
    #[error("Failed to read recording: {0}")]
    Io(#[from] std::io::Error),

    #[error("Recording line {line}: {source}")]
    InvalidRecording {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Classifier failed: {0}")]
    Classifier(String),

    #[error("Classifier not ready")]
    NotReady,
}

pub type GestureResult<T> = Result<T, GestureError>;
