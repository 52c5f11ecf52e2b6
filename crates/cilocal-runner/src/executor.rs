use std::process::Stdio;

use crate::docker::{DockerError, ExitInfo};

/// Abstraction over container runtime CLI execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait DockerExecutor: Send + Sync {
    /// Execute a command and capture stdout.
    async fn exec(&self, args: &[String]) -> Result<String, DockerError>;

    /// Execute a command, streaming output to the terminal.
    async fn exec_streaming(&self, args: &[String]) -> Result<(), DockerError>;

    /// Execute a command with stdin, stdout and stderr all attached to ours.
    async fn exec_interactive(&self, args: &[String]) -> Result<(), DockerError>;

    /// Execute a command with data piped to stdin, capturing stdout.
    async fn exec_with_stdin(
        &self,
        args: &[String],
        stdin_data: &[u8],
    ) -> Result<String, DockerError>;
}

/// Runs the real container runtime binary.
pub struct RealExecutor {
    binary: String,
}

impl RealExecutor {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn command(&self, args: &[String]) -> tokio::process::Command {
        tracing::debug!(binary = %self.binary, ?args, "exec");
        let mut cmd = tokio::process::Command::new(&self.binary);
        cmd.args(args);
        cmd
    }

    fn not_found(&self, source: std::io::Error) -> DockerError {
        DockerError::NotFound {
            binary: self.binary.clone(),
            source,
        }
    }

    fn check_status(
        args: &[String],
        status: std::process::ExitStatus,
        stderr: String,
    ) -> Result<(), DockerError> {
        if status.success() {
            Ok(())
        } else {
            Err(DockerError::CommandFailed {
                args: args.to_vec(),
                exit: ExitInfo::from(status),
                stderr,
            })
        }
    }
}

impl Default for RealExecutor {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl DockerExecutor for RealExecutor {
    async fn exec(&self, args: &[String]) -> Result<String, DockerError> {
        let output = self
            .command(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| self.not_found(e))?;

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        Self::check_status(args, output.status, stderr)?;
        String::from_utf8(output.stdout).map_err(|e| DockerError::InvalidUtf8 { source: e })
    }

    async fn exec_streaming(&self, args: &[String]) -> Result<(), DockerError> {
        let status = self
            .command(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| self.not_found(e))?;

        Self::check_status(args, status, String::new())
    }

    async fn exec_interactive(&self, args: &[String]) -> Result<(), DockerError> {
        let status = self
            .command(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| self.not_found(e))?;

        Self::check_status(args, status, String::new())
    }

    async fn exec_with_stdin(
        &self,
        args: &[String],
        stdin_data: &[u8],
    ) -> Result<String, DockerError> {
        use tokio::io::AsyncWriteExt;

        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.not_found(e))?;

        // Feed stdin while stdout is drained so neither pipe can fill up and stall.
        let stdin = child.stdin.take();
        let data = stdin_data.to_vec();
        let writer = tokio::spawn(async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(&data).await?;
                stdin.shutdown().await?;
            }
            Ok::<(), std::io::Error>(())
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| self.not_found(e))?;

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        Self::check_status(args, output.status, stderr)?;

        match writer.await {
            Ok(Ok(())) => {}
            // A command that succeeded may stop reading before the input ends.
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                tracing::debug!(?args, error = %e, "stdin closed early by a successful command");
            }
            Ok(Err(e)) => return Err(DockerError::StdinWrite { source: e }),
            Err(e) => {
                return Err(DockerError::StdinWrite {
                    source: std::io::Error::other(e),
                });
            }
        }

        String::from_utf8(output.stdout).map_err(|e| DockerError::InvalidUtf8 { source: e })
    }
}
