use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{ReleaseError, Result};
use crate::process::{CommandOutput, CommandRunner, Invocation};
use crate::ui;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs commands as child processes of this one.
pub struct SystemRunner {
    workdir: PathBuf,
}

impl SystemRunner {
    /// Create a runner whose children start in `workdir`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        SystemRunner {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }
}

impl CommandRunner for SystemRunner {
    /// Execute a command, capturing stdout and stderr.
    ///
    /// If a timeout is set and the child is still running when it expires, the
    /// child is killed and [ReleaseError::Timeout] is returned.
    fn invoke(&self, invocation: &Invocation) -> Result<CommandOutput> {
        let command_line = invocation.command_line();
        debug!(command = %command_line, workdir = %self.workdir.display(), "invoking");

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        for (key, value) in &invocation.env {
            cmd.env(key, value);
        }

        let mut child = cmd.spawn().map_err(|source| ReleaseError::Spawn {
            command: command_line.clone(),
            source,
        })?;

        let stdout_reader = child.stdout.take().map(drain);
        let stderr_reader = child.stderr.take().map(drain);

        let status = match invocation.timeout {
            None => child.wait()?,
            Some(limit) => match wait_until(&mut child, limit)? {
                Some(status) => status,
                None => {
                    warn!(command = %command_line, timeout_secs = limit.as_secs(), "timed out, killing");
                    // The child may have exited between the last poll and the kill.
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ReleaseError::Timeout {
                        command: command_line,
                        timeout: limit,
                    });
                }
            },
        };

        let output = CommandOutput {
            status: status.code(),
            stdout: collect(stdout_reader),
            stderr: collect(stderr_reader),
        };
        debug!(command = %command_line, status = ?output.status, "finished");

        if !invocation.quiet {
            ui::display_command_output(&output);
        }

        Ok(output)
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn collect(reader: Option<JoinHandle<String>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

fn wait_until(child: &mut Child, limit: Duration) -> Result<Option<ExitStatus>> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
