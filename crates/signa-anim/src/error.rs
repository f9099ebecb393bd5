//! Animation errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnimError {
    #[error("Node {node} references unknown parent {parent}")]
    UnknownParent { node: String, parent: String },

    #[error("Animation clip not found: {0}")]
    UnknownClip(String),

    #[error("Clip {clip} track {node}: {times} keys but {values} values")]
    TrackMismatch {
        clip: String,
        node: String,
        times: usize,
        values: usize,
    },

    #[error("Clip {clip} track {node}: key {index} is not finite or precedes the previous key")]
    TrackTimes {
        clip: String,
        node: String,
        index: usize,
    },

    #[error("Invalid avatar asset: {0}")]
    Asset(#[from] serde_json::Error),

    #[error("Failed to read avatar asset: {0}")]
    Io(#[from] std::io::Error),
}

pub type AnimResult<T> = Result<T, AnimError>;
