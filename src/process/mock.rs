use std::sync::Mutex;
use std::time::Duration;

use crate::error::{ReleaseError, Result};
use crate::process::{CommandOutput, CommandRunner, Invocation};

enum Reply {
    Output(CommandOutput),
    Timeout,
}

struct Rule {
    prefix: String,
    reply: Reply,
}

/// Runner for testing without spawning processes.
///
/// Every invocation is recorded. Replies are chosen by the first rule whose
/// prefix matches the rendered command line; unmatched commands succeed with
/// empty output.
#[derive(Default)]
pub struct RecordingRunner {
    rules: Vec<Rule>,
    calls: Mutex<Vec<Invocation>>,
}

impl RecordingRunner {
    /// Create a runner where every command succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands starting with `prefix` with the given stdout
    pub fn respond(mut self, prefix: impl Into<String>, stdout: impl Into<String>) -> Self {
        self.rules.push(Rule {
            prefix: prefix.into(),
            reply: Reply::Output(CommandOutput {
                status: Some(0),
                stdout: stdout.into(),
                stderr: String::new(),
            }),
        });
        self
    }

    /// Make commands starting with `prefix` exit with `code`
    pub fn fail(
        mut self,
        prefix: impl Into<String>,
        code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        self.rules.push(Rule {
            prefix: prefix.into(),
            reply: Reply::Output(CommandOutput {
                status: Some(code),
                stdout: String::new(),
                stderr: stderr.into(),
            }),
        });
        self
    }

    /// Make commands starting with `prefix` run past their deadline
    pub fn time_out(mut self, prefix: impl Into<String>) -> Self {
        self.rules.push(Rule {
            prefix: prefix.into(),
            reply: Reply::Timeout,
        });
        self
    }

    /// All recorded invocations, in call order
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Rendered command lines, in call order
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(Invocation::command_line).collect()
    }

    /// Position of the first call starting with `prefix`
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.command_lines()
            .iter()
            .position(|line| line.starts_with(prefix))
    }
}

impl CommandRunner for RecordingRunner {
    fn invoke(&self, invocation: &Invocation) -> Result<CommandOutput> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(invocation.clone());
        }

        let line = invocation.command_line();
        match self.rules.iter().find(|rule| line.starts_with(&rule.prefix)) {
            Some(Rule {
                reply: Reply::Output(output),
                ..
            }) => Ok(output.clone()),
            Some(Rule {
                reply: Reply::Timeout,
                ..
            }) => Err(ReleaseError::Timeout {
                command: line,
                timeout: invocation.timeout.unwrap_or(Duration::ZERO),
            }),
            None => Ok(CommandOutput {
                status: Some(0),
                ..CommandOutput::default()
            }),
        }
    }
}
