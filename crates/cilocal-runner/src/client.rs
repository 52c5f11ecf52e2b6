use std::fmt;
use std::path::{Path, PathBuf};

use cilocal_core::CompilerConfig;

use crate::docker::{DockerError, ExitInfo};
use crate::executor::{DockerExecutor, RealExecutor};

/// Container runtime operations, parameterized over the executor for testability.
pub struct DockerClient<E: DockerExecutor = RealExecutor> {
    executor: E,
}

impl DockerClient<RealExecutor> {
    pub fn new(binary: &str) -> Self {
        Self {
            executor: RealExecutor::new(binary),
        }
    }
}

impl Default for DockerClient<RealExecutor> {
    fn default() -> Self {
        Self {
            executor: RealExecutor::default(),
        }
    }
}

impl<E: DockerExecutor> DockerClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    // ── Availability ──

    /// Version banner of the runtime, or `None` when it cannot be queried.
    pub async fn version(&self) -> Option<String> {
        match self.executor.exec(&args(["--version"])).await {
            Ok(v) => Some(v.trim().to_owned()),
            Err(e) => {
                tracing::debug!(error = %e, "container runtime version probe failed");
                None
            }
        }
    }

    pub async fn is_available(&self) -> bool {
        match self.version().await {
            Some(version) => {
                tracing::debug!(%version, "container runtime available");
                true
            }
            None => false,
        }
    }

    // ── Compile ──

    /// Pipe `ci_config` through the compiler helper image and return the
    /// build script it prints.
    pub async fn compile_script(
        &self,
        compiler: &CompilerConfig,
        ci_config: &[u8],
    ) -> Result<String, StepError> {
        let mut cmd = args(["run", "--rm", "-i", compiler.image.as_str()]);
        cmd.extend(compiler.args.iter().cloned());

        let script = self
            .executor
            .exec_with_stdin(&cmd, ci_config)
            .await
            .map_err(|e| StepError::Failed {
                step: Step::Compile,
                source: e,
            })?;

        if script.trim().is_empty() {
            return Err(StepError::EmptyScript {
                image: compiler.image.clone(),
            });
        }

        Ok(script)
    }

    // ── Build / Run / Remove ──

    pub async fn build_image(
        &self,
        descriptor: &Path,
        image: &str,
        context: &Path,
    ) -> Result<(), StepError> {
        let descriptor_str = path_str(descriptor)?;
        let context_str = path_str(context)?;

        self.executor
            .exec_streaming(&args([
                "build",
                "--file",
                descriptor_str,
                "--tag",
                image,
                context_str,
            ]))
            .await
            .map_err(|e| StepError::Failed {
                step: Step::Build,
                source: e,
            })
    }

    /// Run the image to completion with our terminal attached.
    ///
    /// `tty` allocates a pseudo-terminal; only request it when stdin is one.
    pub async fn run_image(&self, image: &str, tty: bool) -> Result<(), StepError> {
        let mut cmd = args(["run", "--rm", "-i"]);
        if tty {
            cmd.push("-t".to_owned());
        }
        cmd.push(image.to_owned());

        self.executor
            .exec_interactive(&cmd)
            .await
            .map_err(|e| StepError::Failed {
                step: Step::Run,
                source: e,
            })
    }

    pub async fn remove_image(&self, image: &str) -> Result<(), StepError> {
        self.executor
            .exec(&args(["rmi", "--force", image]))
            .await
            .map(|_| ())
            .map_err(|e| StepError::Failed {
                step: Step::Remove,
                source: e,
            })
    }
}

// ── Helper ──

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}

fn path_str(path: &Path) -> Result<&str, StepError> {
    path.to_str()
        .ok_or_else(|| StepError::InvalidPath(path.to_path_buf()))
}

// ── Error types ──

/// External invocation within a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Compile,
    Build,
    Run,
    Remove,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Compile => "compile",
            Self::Build => "image build",
            Self::Run => "run",
            Self::Remove => "image removal",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("{step} step failed")]
    Failed { step: Step, source: DockerError },

    #[error("compiler image {image} produced an empty build script")]
    EmptyScript { image: String },

    #[error("path is not valid UTF-8: {0}")]
    InvalidPath(PathBuf),
}

impl StepError {
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::Failed { step, .. } => Some(*step),
            Self::EmptyScript { .. } => Some(Step::Compile),
            Self::InvalidPath(_) => None,
        }
    }

    /// Exit code / signal of the failed process, if it ran.
    pub fn exit(&self) -> Option<ExitInfo> {
        match self {
            Self::Failed { source, .. } => source.exit(),
            _ => None,
        }
    }
}
