//! Formatting functions for UI output.
//!
//! Functions here only print; the strings they print are built by small pure
//! helpers so they can be tested.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::cli::orchestration::ReleaseReport;
use crate::process::CommandOutput;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Print a numbered step banner, e.g. `[6/10] Updating version`.
pub fn display_step(step: usize, total: usize, title: &str) {
    println!("{}", style(step_banner(step, total, title)).bold());
}

fn step_banner(step: usize, total: usize, title: &str) -> String {
    format!("[{}/{}] {}", step, total, title)
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Echo what a finished external command printed.
pub fn display_command_output(output: &CommandOutput) {
    let stdout = output.stdout.trim_end();
    if !stdout.is_empty() {
        println!("{}", stdout);
    }
    let stderr = output.stderr.trim_end();
    if !stderr.is_empty() {
        eprintln!("{}", stderr);
    }
}

/// Report a failed run.
///
/// In GitHub Actions the message is also emitted as an `::error::` workflow
/// command so it shows up as an annotation on the run.
pub fn display_failure(message: &str, github_annotations: bool) {
    if github_annotations {
        println!("{}", error_annotation(message));
    }
    display_error(message);
}

/// `::error::` workflow command with the message escaped per the Actions rules.
pub fn error_annotation(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{}", escaped)
}

/// Display what a completed release produced.
pub fn display_release_summary(report: &ReleaseReport) {
    println!("\n{}", style("Release complete").bold());
    for line in summary_lines(report) {
        println!("  {}", line);
    }
}

fn summary_lines(report: &ReleaseReport) -> Vec<String> {
    let mut lines = vec![
        format!("Branch:   {}", report.branch),
        format!("Tag:      {}", report.tag),
        format!("Released: {}", report.release_version),
    ];
    if let Some(next) = &report.next_snapshot {
        lines.push(format!("Next:     {}", next));
    }
    lines
}
