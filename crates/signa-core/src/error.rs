//! Error types for SIGNA

use thiserror::Error;

/// Structured failure of the animation payload parser.
///
/// Produced at the boundary where the translation response is decoded;
/// nothing past that boundary sees an untyped payload.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PayloadError {
    #[error("Invalid JSON in frames payload: {0}")]
    InvalidJson(String),

    #[error("Unexpected frames payload shape: expected {expected}, got {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Frame {index} is not an object")]
    InvalidFrame { index: usize },

    #[error("Frame {index} has no time")]
    MissingTime { index: usize },

    #[error("Frame {index} has an invalid time")]
    InvalidTime { index: usize },

    #[error("Frame {index} at {time}s precedes previous frame at {previous}s")]
    OutOfOrder {
        index: usize,
        previous: f64,
        time: f64,
    },
}

/// Core SIGNA errors
#[derive(Error, Debug)]
pub enum SignaError {
    // Input validation
    #[error("Please enter some text to translate")]
    EmptyInput,

    // Transport errors
    #[error("Request failed: {0}")]
    Transport(String),

    // Payload errors
    #[error("Malformed animation payload: {0}")]
    Payload(#[from] PayloadError),

    // Readiness errors
    #[error("Not ready: {0}")]
    NotReady(&'static str),

    // Asset errors
    #[error("Asset error: {0}")]
    Asset(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for SIGNA operations
pub type SignaResult<T> = Result<T, SignaError>;
