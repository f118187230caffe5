//! User-facing output for the release run.
//!
//! Everything printed for people reading the CI log goes through here;
//! diagnostics go through `tracing`.

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_command_output, display_error, display_failure,
    display_release_summary, display_status, display_step, display_success,
};
