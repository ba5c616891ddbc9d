//! Child process execution with stdin streaming and a deadline.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::trace;

/// Collected result of a finished child.
#[derive(Debug)]
pub(crate) struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    /// Returns stderr as lossy UTF-8 with surrounding whitespace removed.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// Why a child could not be run to completion.
#[derive(Debug)]
pub(crate) enum RunError {
    /// The program could not be started.
    Spawn(io::Error),
    /// Talking to the running program failed.
    Io(io::Error),
    /// The deadline passed; the child has been killed.
    TimedOut,
}

/// Runs `program args...`, writes `input` to its stdin, and collects output.
///
/// Stdin is written from a separate task while stdout/stderr are drained, so
/// large inputs and outputs cannot deadlock on full pipes. The child is
/// killed if the deadline passes or the returned future is dropped.
pub(crate) async fn run_with_stdin<I, S>(
    program: &str,
    args: I,
    input: Vec<u8>,
    timeout: Duration,
) -> Result<ProcessOutput, RunError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(RunError::Spawn)?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| RunError::Io(io::Error::other("child stdin was not captured")))?;

    let writer = tokio::spawn(async move {
        stdin.write_all(&input).await?;
        stdin.shutdown().await
    });

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(RunError::Io)?,
        Err(_) => {
            writer.abort();
            return Err(RunError::TimedOut);
        },
    };

    match writer.await {
        Ok(Ok(())) => {},
        // The program exited without reading all of its input.
        Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
            trace!(program, "child closed stdin early");
        },
        Ok(Err(e)) => return Err(RunError::Io(e)),
        Err(e) => return Err(RunError::Io(io::Error::other(e.to_string()))),
    }

    Ok(ProcessOutput {
        status: output.status,
        stdout: output.stdout,
        stderr: output.stderr,
    })
}
