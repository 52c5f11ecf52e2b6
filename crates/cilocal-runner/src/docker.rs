use std::fmt;
use std::process::ExitStatus;

#[derive(Debug, thiserror::Error)]
pub enum DockerError {
    #[error("failed to launch `{binary}`; is it installed and on PATH?")]
    NotFound {
        binary: String,
        source: std::io::Error,
    },

    #[error("`{}` failed with {exit}{}", args.join(" "), format_stderr(stderr))]
    CommandFailed {
        args: Vec<String>,
        exit: ExitInfo,
        stderr: String,
    },

    #[error("container runtime output was not valid UTF-8")]
    InvalidUtf8 { source: std::string::FromUtf8Error },

    #[error("failed to write to container runtime stdin")]
    StdinWrite { source: std::io::Error },
}

impl DockerError {
    /// How the process ended, when it ran at all.
    pub fn exit(&self) -> Option<ExitInfo> {
        match self {
            Self::CommandFailed { exit, .. } => Some(*exit),
            _ => None,
        }
    }
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{trimmed}")
    }
}

/// Exit code and terminating signal of a finished process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitInfo {
    pub code: Option<i32>,
    pub signal: Option<i32>,
}

impl ExitInfo {
    pub fn code(code: i32) -> Self {
        Self {
            code: Some(code),
            signal: None,
        }
    }

    pub fn signal(signal: i32) -> Self {
        Self {
            code: None,
            signal: Some(signal),
        }
    }
}

impl From<ExitStatus> for ExitInfo {
    fn from(status: ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = std::os::unix::process::ExitStatusExt::signal(&status);
        #[cfg(not(unix))]
        let signal = None;

        Self {
            code: status.code(),
            signal,
        }
    }
}

impl fmt::Display for ExitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code, self.signal) {
            (Some(code), _) => write!(f, "exit code {code}"),
            (None, Some(signal)) => write!(f, "signal {signal}"),
            (None, None) => f.write_str("unknown exit status"),
        }
    }
}
