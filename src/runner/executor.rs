//! Probe execution
//!
//! Runs a check's probe command with a depth-derived timeout and
//! classifies the result. A probe's internal errors are classified as a
//! failure with the error captured, never silently swallowed.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use wait_timeout::ChildExt;

use crate::error::AttestError;
use crate::models::CheckOutcome;

/// How long to wait for the reader threads after the process exits.
const OUTPUT_COLLECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Cap on captured probe output kept as failure detail.
const MAX_DETAIL_SIZE: usize = 64 * 1024;

/// Classified result of one probe execution.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub outcome: CheckOutcome,
    pub duration: Duration,
    /// Captured error text or stderr for non-passing probes.
    pub detail: Option<String>,
}

impl ProbeResult {
    pub fn pass(duration: Duration) -> Self {
        Self {
            outcome: CheckOutcome::Pass,
            duration,
            detail: None,
        }
    }

    pub fn fail(duration: Duration, detail: String) -> Self {
        Self {
            outcome: CheckOutcome::Fail,
            duration,
            detail: Some(detail),
        }
    }

    pub fn timeout(duration: Duration, budget: Duration) -> Self {
        Self {
            outcome: CheckOutcome::Timeout,
            duration,
            detail: Some(AttestError::CheckTimeout(budget).to_string()),
        }
    }
}

/// Pluggable probe execution seam. The surrounding system supplies the
/// real executor; tests substitute deterministic ones.
pub trait ProbeExecutor: Sync {
    fn execute(&self, command: &str, timeout: Duration) -> ProbeResult;
}

/// Default executor: runs the probe through the system shell.
pub struct ShellProbe {
    working_dir: Option<PathBuf>,
}

impl ShellProbe {
    pub fn new() -> Self {
        Self { working_dir: None }
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(dir.into()),
        }
    }
}

impl Default for ShellProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbeExecutor for ShellProbe {
    fn execute(&self, command: &str, timeout: Duration) -> ProbeResult {
        let start = Instant::now();

        let mut child = match spawn_shell(command, self.working_dir.as_deref()) {
            Ok(child) => child,
            Err(e) => {
                // Spawn failures are a probe error, recorded not raised.
                return ProbeResult::fail(
                    start.elapsed(),
                    AttestError::CheckExecution(e.to_string()).to_string(),
                );
            }
        };

        // Start draining output BEFORE waiting for exit. Waiting first can
        // deadlock: the child blocks on write() once the pipe buffer fills.
        let stderr_rx = drain_in_thread(child.stderr.take());
        let stdout_rx = drain_in_thread(child.stdout.take());

        let wait_result = match child.wait_timeout(timeout) {
            Ok(result) => result,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return ProbeResult::fail(
                    start.elapsed(),
                    AttestError::CheckExecution(e.to_string()).to_string(),
                );
            }
        };
        let duration = start.elapsed();

        match wait_result {
            Some(status) if status.success() => ProbeResult::pass(duration),
            Some(status) => {
                let stderr = stderr_rx
                    .recv_timeout(OUTPUT_COLLECTION_TIMEOUT)
                    .unwrap_or_default();
                // Stdout drained but discarded; the record only keeps detail.
                let _ = stdout_rx.recv_timeout(OUTPUT_COLLECTION_TIMEOUT);
                let code = status
                    .code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string());
                let detail = if stderr.trim().is_empty() {
                    format!("exit code {code}")
                } else {
                    format!("exit code {code}: {}", stderr.trim())
                };
                ProbeResult::fail(duration, detail)
            }
            None => {
                // Budget exceeded: kill, reap, classify as timeout.
                let _ = child.kill();
                let _ = child.wait();
                ProbeResult::timeout(duration, timeout)
            }
        }
    }
}

fn spawn_shell(command: &str, working_dir: Option<&std::path::Path>) -> std::io::Result<Child> {
    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }
    cmd.spawn()
}

/// Drain a child stream on a background thread, capped at MAX_DETAIL_SIZE.
fn drain_in_thread<R: Read + Send + 'static>(stream: Option<R>) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    match stream {
        Some(mut stream) => {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 8192];
                loop {
                    match stream.read(&mut chunk) {
                        Ok(0) => break,
                        Ok(n) => {
                            let remaining = MAX_DETAIL_SIZE.saturating_sub(buf.len());
                            let take = n.min(remaining);
                            buf.extend_from_slice(&chunk[..take]);
                            if take < n {
                                // Keep draining so the child never blocks,
                                // but stop retaining output.
                                let mut discard = [0u8; 8192];
                                while stream.read(&mut discard).unwrap_or(0) > 0 {}
                                buf.extend_from_slice(b"\n[output truncated]");
                                break;
                            }
                        }
                        Err(_) => break,
                    }
                }
                let _ = tx.send(String::from_utf8_lossy(&buf).to_string());
            });
        }
        None => {
            let _ = tx.send(String::new());
        }
    }
    rx
}
