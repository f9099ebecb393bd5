//! SIGNA Client - HTTP access to the external services
//!
//! - Translation service: text in, sign grammar text and joint keyframes out
//! - Interpretation service: gesture prompt in, free text out
//!
//! Both clients accept a shared `reqwest::Client` so the host controls
//! timeouts and connection pooling.

pub mod error;
pub mod interpret;
pub mod translate;

pub use error::*;
pub use interpret::*;
pub use translate::*;
