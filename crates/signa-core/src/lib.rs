//! SIGNA Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every SIGNA pipeline:
//! - Joint positions (Position3D)
//! - Keyframes and validated keyframe sequences
//! - Strict parsing of animation payloads
//! - Request generation tokens
//! - Error taxonomy

pub mod error;
pub mod id;
pub mod joint;
pub mod keyframe;
pub mod payload;

pub use error::*;
pub use id::*;
pub use joint::*;
pub use keyframe::*;
pub use payload::*;
