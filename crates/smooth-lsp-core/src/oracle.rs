//! Boundary to the external analysis oracle.
//!
//! The oracle is an out-of-process program: it receives the full document
//! text on stdin, writes zero or more findings to stdout (one per line) and
//! signals failure with a non-zero exit status and text on stderr.

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::settings::OracleSettings;
use crate::types::AnalysisRequest;

/// Errors produced while running the oracle.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The process could not be started (e.g. missing executable).
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Reading or writing the process streams failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The process exited with a non-zero status. Displays stderr verbatim.
    #[error("{stderr}")]
    Failed { code: i32, stderr: String },

    /// The process did not exit within the configured bound.
    #[error("analysis did not finish within {} seconds", .0.as_secs())]
    TimedOut(Duration),
}

/// Output from a finished oracle process.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code (0 = success, -1 when terminated by a signal)
    pub code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// Get stdout as a string (lossy UTF-8 conversion)
    pub fn stdout_string(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Get stderr as a string (lossy UTF-8 conversion)
    pub fn stderr_string(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    /// Map the exit status onto the oracle contract.
    pub fn into_result(self) -> Result<String, OracleError> {
        if self.success() {
            Ok(self.stdout_string())
        } else {
            Err(OracleError::Failed {
                code: self.code,
                stderr: self.stderr_string(),
            })
        }
    }
}

/// Something that can analyze a captured document.
///
/// Returns the oracle's raw stdout on success.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn run(&self, request: AnalysisRequest) -> Result<String, OracleError>;
}

/// Oracle backed by a subprocess.
///
/// Each run spawns a fresh process; nothing is shared between runs. The
/// child is killed if the run is dropped before it finishes, which is how
/// cancellation reaches the process.
#[derive(Debug, Clone)]
pub struct ProcessOracle {
    program: PathBuf,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl ProcessOracle {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: None,
        }
    }

    /// Build an oracle from settings, resolving the program on `PATH`.
    pub fn from_settings(settings: &OracleSettings) -> Self {
        Self {
            program: settings.resolve_program(),
            args: settings.args.clone(),
            timeout: settings.timeout(),
        }
    }

    /// Bound how long a single run may take.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Start the process, feed it the request and collect everything it writes.
    async fn exec(&self, request: AnalysisRequest) -> Result<CommandOutput, OracleError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| OracleError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("oracle stdin was not captured"))?;
        let input = request.into_bytes();

        // Write and read concurrently so a chatty oracle cannot fill its
        // stdout pipe while we are still blocked on stdin.
        let feed = async move {
            stdin.write_all(&input).await?;
            stdin.shutdown().await
            // stdin dropped here, closing the pipe
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());

        match fed {
            Ok(()) => {}
            // The oracle may exit without reading all of its input; its exit
            // status decides the outcome.
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                tracing::debug!("oracle closed stdin before reading all input");
            }
            Err(e) => return Err(e.into()),
        }

        let output = output?;
        Ok(CommandOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[async_trait]
impl Oracle for ProcessOracle {
    async fn run(&self, request: AnalysisRequest) -> Result<String, OracleError> {
        tracing::debug!(
            program = %self.program.display(),
            bytes = request.source().len(),
            "starting oracle"
        );

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.exec(request))
                .await
                .map_err(|_| OracleError::TimedOut(limit))??,
            None => self.exec(request).await?,
        };

        tracing::debug!(code = output.code, "oracle finished");
        output.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> ProcessOracle {
        ProcessOracle::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[test]
    fn command_output_success_yields_stdout() {
        let output = CommandOutput {
            code: 0,
            stdout: b"finding".to_vec(),
            stderr: b"warning".to_vec(),
        };
        assert!(output.success());
        assert_eq!(output.into_result().unwrap(), "finding");
    }

    #[test]
    fn command_output_failure_ignores_stdout() {
        let output = CommandOutput {
            code: 2,
            stdout: b"partial".to_vec(),
            stderr: b"SyntaxError: invalid syntax".to_vec(),
        };
        match output.into_result() {
            Err(OracleError::Failed { code, stderr }) => {
                assert_eq!(code, 2);
                assert_eq!(stderr, "SyntaxError: invalid syntax");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn failed_error_displays_stderr_verbatim() {
        let err = OracleError::Failed {
            code: 1,
            stderr: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn timed_out_error_mentions_bound() {
        let err = OracleError::TimedOut(Duration::from_secs(3));
        insta::assert_snapshot!(err.to_string(), @"analysis did not finish within 3 seconds");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn document_text_reaches_stdin_unchanged() {
        let source = "def jam(xs):\n    return [x * 2 for x in xs]\n\n# ñandú ✓\r\n";
        let echoed = sh("cat").run(AnalysisRequest::new(source)).await.unwrap();
        assert_eq!(echoed, source);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn large_input_does_not_deadlock() {
        let source = "x = 1\n".repeat(200_000);
        let echoed = sh("cat").run(AnalysisRequest::new(source.clone())).await.unwrap();
        assert_eq!(echoed.len(), source.len());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_reports_stderr() {
        let err = sh("echo boom >&2; exit 3")
            .run(AnalysisRequest::new("x = 1"))
            .await
            .unwrap_err();
        match err {
            OracleError::Failed { code, stderr } => {
                assert_eq!(code, 3);
                assert_eq!(stderr.trim_end(), "boom");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn oracle_that_ignores_stdin_still_succeeds() {
        let out = sh("echo done").run(AnalysisRequest::new("x = 1\n".repeat(100_000))).await;
        assert_eq!(out.unwrap(), "done\n");
    }

    #[tokio::test]
    async fn missing_executable_is_a_spawn_error() {
        let oracle = ProcessOracle::new("definitely-not-an-installed-oracle", Vec::new());
        let err = oracle.run(AnalysisRequest::new("")).await.unwrap_err();
        assert!(matches!(err, OracleError::Spawn { .. }), "got {err:?}");
        assert!(err.to_string().contains("definitely-not-an-installed-oracle"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_oracle_times_out() {
        let oracle = sh("sleep 5").with_timeout(Some(Duration::from_millis(200)));
        let err = oracle.run(AnalysisRequest::new("")).await.unwrap_err();
        assert!(matches!(err, OracleError::TimedOut(_)), "got {err:?}");
    }
}
