//! SIGNA Runtime - Headless host for both pipelines
//!
//! - Text to animation: `TranslationDesk` + `PlayerSession`, driven by
//!   `run_translation`
//! - Gesture analysis: `AnalysisSession`, driven by `run_analysis`
//!
//! Each piece of mutable state has exactly one owner. Async work
//! (HTTP calls, classification) reports back over channels and is applied
//! by that owner, tagged with a generation so late results for superseded
//! requests are dropped.

pub mod analysis;
pub mod config;
pub mod desk;
pub mod driver;
pub mod notice;
pub mod telemetry;

pub use analysis::*;
pub use config::*;
pub use desk::*;
pub use driver::*;
pub use notice::*;
pub use telemetry::*;
