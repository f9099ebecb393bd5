//! SIGNA Gesture - Turning classifier output into interpretable sequences
//!
//! Pipeline, leaves first:
//! - Frame sources (video file or camera) produce frames
//! - A classifier adapter turns each frame into a `Recognition`
//! - The sequence interpreter filters by confidence, dedupes runs and
//!   batches ten gestures for interpretation
//!
//! At most one frame is classified at a time; `ProcessingGate` drops
//! frames that arrive while another is still in flight.

pub mod buffer;
pub mod classifier;
pub mod error;
pub mod event;
pub mod gate;
pub mod interpreter;
pub mod labels;
pub mod source;

pub use buffer::*;
pub use classifier::*;
pub use error::*;
pub use event::*;
pub use gate::*;
pub use interpreter::*;
pub use labels::*;
pub use source::*;
