//! Running an external tool as a child process.

use std::ffi::OsString;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::consts::{POLL_INTERVAL, STDERR_GRACE, STDERR_TAIL_LINES};
use crate::errors::{Result, SearchToolError};

/// Name used for a tool in errors and logs: the binary's file name.
pub fn tool_name(binary: &Path) -> String {
    binary
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| binary.display().to_string())
}

///
/// Run a tool to completion. Stdout is discarded (tools write their results to
/// files); stderr is captured and its tail reported on failure.
///
/// # Arguments
/// - binary: path to the executable
/// - args: command line arguments
/// - timeout: kill the child if it runs longer than this
///
/// # Returns
/// - wall-clock time the tool ran for
pub fn run_tool(binary: &Path, args: &[OsString], timeout: Option<Duration>) -> Result<Duration> {
    let tool = tool_name(binary);
    debug!("Launching {} {:?}", binary.display(), args);

    let mut child = Command::new(binary)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => SearchToolError::ToolNotFound {
                tool: tool.clone(),
                binary: binary.to_path_buf(),
            },
            _ => SearchToolError::Io(e),
        })?;

    // drain stderr on its own thread so a chatty tool cannot block on a full pipe
    let (stderr_tx, stderr_rx) = mpsc::channel();
    if let Some(pipe) = child.stderr.take() {
        thread::spawn(move || {
            for line in BufReader::new(pipe).lines() {
                let Ok(line) = line else { break };
                if stderr_tx.send(line).is_err() {
                    break;
                }
            }
        });
    } else {
        drop(stderr_tx);
    }

    let start = Instant::now();
    let status: ExitStatus = match timeout {
        None => child.wait()?,
        Some(limit) => loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if start.elapsed() >= limit {
                let _ = child.kill();
                let _ = child.wait();
                return Err(SearchToolError::Timeout {
                    tool,
                    seconds: limit.as_secs_f64(),
                    stderr: stderr_tail(&collect_stderr(&stderr_rx, STDERR_GRACE)),
                });
            }
            thread::sleep(POLL_INTERVAL);
        },
    };
    let elapsed = start.elapsed();
    let stderr = collect_stderr(&stderr_rx, STDERR_GRACE);

    if !status.success() {
        return Err(SearchToolError::Failed {
            tool,
            status: status.to_string(),
            stderr: stderr_tail(&stderr),
        });
    }

    debug!("{} finished in {:.2} seconds", tool, elapsed.as_secs_f64());
    Ok(elapsed)
}

///
/// Stderr lines of a finished tool. Processes the tool started may keep the pipe
/// open after it exits, so this waits at most `grace` for the pipe to close and
/// returns whatever arrived by then.
///
fn collect_stderr(lines: &Receiver<String>, grace: Duration) -> Vec<String> {
    let deadline = Instant::now() + grace;
    let mut collected = Vec::new();
    loop {
        match lines.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok(line) => collected.push(line),
            Err(RecvTimeoutError::Timeout) => {
                debug!("stderr still open {:.1} seconds after the tool exited", grace.as_secs_f64());
                break;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    collected
}

fn stderr_tail(lines: &[String]) -> String {
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use rstest::*;

    fn sh(script: &str) -> Vec<OsString> {
        vec!["-c".into(), script.into()]
    }

    #[rstest]
    fn test_successful_tool() {
        assert!(run_tool(Path::new("sh"), &sh("exit 0"), None).is_ok());
    }

    #[rstest]
    fn test_failing_tool_reports_stderr() {
        let err = run_tool(Path::new("sh"), &sh("echo 'bad database' >&2; exit 3"), None).unwrap_err();
        match err {
            SearchToolError::Failed { tool, stderr, .. } => {
                assert_eq!(tool, "sh");
                assert_eq!(stderr, "bad database");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[rstest]
    fn test_missing_tool() {
        let err = run_tool(Path::new("/nonexistent/jackhmmer"), &[], None).unwrap_err();
        assert!(matches!(err, SearchToolError::ToolNotFound { ref tool, .. } if tool == "jackhmmer"));
    }

    #[rstest]
    fn test_timeout_kills_tool() {
        let start = Instant::now();
        let err = run_tool(
            Path::new("sh"),
            &sh("sleep 10"),
            Some(Duration::from_millis(200)),
        )
        .unwrap_err();
        assert!(matches!(err, SearchToolError::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[rstest]
    fn test_timeout_does_not_wait_for_background_processes() {
        // the backgrounded sleep outlives the killed shell and keeps stderr open
        let start = Instant::now();
        let err = run_tool(
            Path::new("sh"),
            &sh("echo 'loading database' >&2; sleep 10 & wait"),
            Some(Duration::from_millis(300)),
        )
        .unwrap_err();
        match err {
            SearchToolError::Timeout { stderr, .. } => assert_eq!(stderr, "loading database"),
            other => panic!("unexpected error {:?}", other),
        }
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[rstest]
    fn test_stderr_tail_keeps_last_lines() {
        let stderr: Vec<String> = (0..30).map(|i| format!("line {}", i)).collect();
        let tail = stderr_tail(&stderr);
        assert!(tail.starts_with("line 10"));
        assert!(tail.ends_with("line 29"));
    }
}
