//! SIGNA Animation - Avatar playback
//!
//! Two animation layers drive the avatar every render tick, in this order:
//!
//! 1. Base layer: baked clips from the avatar asset, advanced by the mixer
//! 2. Override layer: joint keyframes from the translation service
//!
//! The override layer writes last, so per joint the keyframe pose wins.
//!
//! # Keyframe playback
//!
//! - Idle: nothing loaded, the avatar keeps whatever pose it last had
//! - Playing: interpolating between the two keyframes around the clock
//! - Held: past the final keyframe, the final pose is frozen

pub mod asset;
pub mod clip;
pub mod clock;
pub mod error;
pub mod mixer;
pub mod player;
pub mod registry;
pub mod session;
pub mod skeleton;

pub use asset::*;
pub use clip::*;
pub use clock::*;
pub use error::*;
pub use mixer::*;
pub use player::*;
pub use registry::*;
pub use session::*;
pub use skeleton::*;
