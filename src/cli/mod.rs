//! Release workflow entry points used by the binary.

pub mod orchestration;

pub use orchestration::{ReleaseOrchestrator, ReleaseReport, RunOutcome};
