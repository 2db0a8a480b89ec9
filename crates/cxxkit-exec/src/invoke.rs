//! Single external-tool invocation with captured output.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::ExecError;

/// The captured outcome of one external-tool run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code. 0 means success; signal-terminated children report 1.
    pub code: i32,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// True if the tool exited with code 0.
    pub fn ok(&self) -> bool {
        self.code == 0
    }
}

/// One external-tool invocation: program, arguments, optional working
/// directory, optional timeout.
///
/// Running never raises on a non-zero exit; callers inspect
/// `CommandOutput::ok()`. The child's stdin is closed, stdout and stderr are
/// captured, and the calling task suspends until the child exits (or the
/// timeout/cancellation fires, in which case the child is killed).
#[derive(Debug, Clone)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl Invocation {
    /// Start building an invocation of the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            timeout: None,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the child's working directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Kill the child and fail with `ExecError::TimedOut` after this long.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The program name this invocation runs.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The full command line, for echoing to the operator.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Run to completion with captured output.
    pub async fn run(&self) -> Result<CommandOutput, ExecError> {
        self.run_with_cancel(&CancellationToken::new()).await
    }

    /// Run to completion, aborting early (and killing the child) if the
    /// token is cancelled.
    pub async fn run_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<CommandOutput, ExecError> {
        debug!(command = %self.command_line(), cwd = ?self.cwd, "spawning external tool");

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the wait future (timeout/cancel) must not leave the
            // child running.
            .kill_on_drop(true);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        let child = cmd.spawn().map_err(|source| ExecError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let wait = child.wait_with_output();
        let waited = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(ExecError::Cancelled {
                    program: self.program.clone(),
                });
            }
            waited = maybe_timeout(self.timeout, wait) => waited,
        };

        let output = match waited {
            Some(result) => result.map_err(|source| ExecError::Wait {
                program: self.program.clone(),
                source,
            })?,
            None => {
                return Err(ExecError::TimedOut {
                    program: self.program.clone(),
                    // Only reachable when a timeout was set.
                    after: self.timeout.unwrap_or_default(),
                });
            }
        };

        Ok(CommandOutput {
            code: output.status.code().unwrap_or(1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Await the future, bounded by an optional timeout. `None` means the
/// deadline elapsed.
async fn maybe_timeout<F>(timeout: Option<Duration>, fut: F) -> Option<F::Output>
where
    F: std::future::Future,
{
    match timeout {
        Some(duration) => tokio::time::timeout(duration, fut).await.ok(),
        None => Some(fut.await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_joins_program_and_args() {
        let inv = Invocation::new("cmake")
            .arg("--build")
            .arg(".")
            .args(["--parallel", "8"]);
        assert_eq!(inv.command_line(), "cmake --build . --parallel 8");
    }

    #[tokio::test]
    async fn missing_executable_is_a_spawn_error() {
        let err = Invocation::new("cxxkit-no-such-tool-xyzzy")
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, crate::ExecError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_code_stdout_and_stderr() {
        let out = Invocation::new("sh")
            .args(["-c", "echo out; echo err >&2; exit 3"])
            .run()
            .await
            .unwrap();
        assert_eq!(out.code, 3);
        assert!(!out.ok());
        assert_eq!(out.stdout, "out\n");
        assert_eq!(out.stderr, "err\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_not_raised() {
        let out = Invocation::new("false").run().await.unwrap();
        assert!(!out.ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn respects_working_directory() {
        let out = Invocation::new("pwd").current_dir("/").run().await.unwrap();
        assert_eq!(out.stdout.trim(), "/");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timeout_kills_the_child() {
        let err = Invocation::new("sleep")
            .arg("5")
            .timeout(Duration::from_millis(50))
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, crate::ExecError::TimedOut { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn cancellation_kills_the_child() {
        let cancel = CancellationToken::new();
        let killer = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            killer.cancel();
        });

        let err = Invocation::new("sleep")
            .arg("5")
            .run_with_cancel(&cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::ExecError::Cancelled { .. }));
    }
}
