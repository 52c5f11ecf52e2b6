//! The local CI run, end to end.
//!
//! Every step is awaited before the next one starts. Once the image build
//! has been attempted, the image is removed no matter how build or run
//! ended; the first failure is reported after that cleanup.

use cilocal_build::descriptor::{self, DescriptorError, DescriptorGenerator};
use cilocal_build::ignore::{self, IgnoreError, IgnoreOutcome};
use cilocal_build::script::{self, ScriptError};
use cilocal_core::{CilocalConfig, EphemeralImage, PipelinePaths};

use crate::client::{DockerClient, StepError};
use crate::executor::{DockerExecutor, RealExecutor};

/// Result of a successful pipeline run.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Image that was built, run, and removed
    pub image: EphemeralImage,
    pub ignore: IgnoreOutcome,
    pub steps: Vec<String>,
}

pub struct Pipeline<E: DockerExecutor = RealExecutor> {
    client: DockerClient<E>,
    config: CilocalConfig,
    paths: PipelinePaths,
    tty: bool,
}

impl Pipeline<RealExecutor> {
    /// Pipeline driving the runtime binary named in `config`.
    pub fn new(config: CilocalConfig, paths: PipelinePaths) -> Self {
        let client = DockerClient::new(&config.runtime.binary);
        Self::with_client(client, config, paths)
    }
}

impl<E: DockerExecutor> Pipeline<E> {
    pub fn with_client(client: DockerClient<E>, config: CilocalConfig, paths: PipelinePaths) -> Self {
        Self {
            client,
            config,
            paths,
            tty: false,
        }
    }

    /// Allocate a pseudo-terminal for the run step.
    pub fn tty(mut self, tty: bool) -> Self {
        self.tty = tty;
        self
    }

    pub fn paths(&self) -> &PipelinePaths {
        &self.paths
    }

    /// Probe → compile → descriptor → ignore file → build → run → remove.
    pub async fn run(&self) -> Result<PipelineOutcome, PipelineError> {
        let mut steps = Vec::new();

        // Nothing may touch the disk before the runtime is known to work.
        if !self.client.is_available().await {
            return Err(PipelineError::RuntimeUnavailable {
                binary: self.config.runtime.binary.clone(),
            });
        }
        steps.push(format!("{} is available", self.config.runtime.binary));

        self.generate_script().await?;
        steps.push(format!("Build script written to {}", self.paths.script.display()));

        let script_in_context = self.paths.script_in_context();
        let generator = DescriptorGenerator::new(&self.config.image, &script_in_context);
        descriptor::write_descriptor(&self.paths.descriptor, &generator.render())?;
        steps.push(format!(
            "Image descriptor written to {}",
            self.paths.descriptor.display()
        ));

        let ignore = ignore::derive_ignore_file(&self.paths.ignore, &self.paths.container_ignore)?;
        if ignore == IgnoreOutcome::Derived {
            steps.push(format!(
                "Derived {} from {}",
                self.paths.container_ignore.display(),
                self.paths.ignore.display()
            ));
        }

        let image = EphemeralImage::generate(&self.config.image.name_prefix)?;
        self.build_run_remove(&image).await?;
        steps.push(format!("Image {image} built, run, and removed"));

        Ok(PipelineOutcome {
            image,
            ignore,
            steps,
        })
    }

    async fn generate_script(&self) -> Result<(), PipelineError> {
        let source = &self.paths.source;
        let ci_config = std::fs::read(source).map_err(|e| PipelineError::ReadSource {
            path: source.clone(),
            source: e,
        })?;

        tracing::info!(
            source = %source.display(),
            compiler = %self.config.compiler.image,
            "compiling build script"
        );
        let compiled = self
            .client
            .compile_script(&self.config.compiler, &ci_config)
            .await?;

        script::write_script(&self.paths.script, &compiled, &self.config.image.project_dir)?;
        Ok(())
    }

    async fn build_run_remove(&self, image: &EphemeralImage) -> Result<(), PipelineError> {
        // Ctrl-C reaches the child through the terminal's process group. Hold
        // SIGINT here so the step ends on its own and the image still goes.
        let interrupt = tokio::signal::ctrl_c();
        let steps = self.build_then_run(image);
        tokio::pin!(interrupt, steps);

        let outcome = tokio::select! {
            biased;
            signal = &mut interrupt => match signal {
                Ok(()) => {
                    tracing::warn!(%image, "interrupted; waiting for the current step to stop");
                    steps.await
                }
                Err(e) => {
                    tracing::warn!(error = %e, "cannot listen for Ctrl-C; it will abort the run");
                    steps.await
                }
            },
            outcome = &mut steps => outcome,
        };

        tracing::info!(%image, "removing image");
        let cleanup = self.client.remove_image(image.as_str()).await;

        match (outcome, cleanup) {
            (Ok(()), Ok(())) => Ok(()),
            (Ok(()), Err(cleanup_err)) => Err(cleanup_err.into()),
            (Err(e), Ok(())) => Err(e.into()),
            (Err(e), Err(cleanup_err)) => {
                tracing::warn!(
                    %image,
                    error = %cleanup_err,
                    "image removal failed after an earlier failure; remove it manually"
                );
                Err(e.into())
            }
        }
    }

    async fn build_then_run(&self, image: &EphemeralImage) -> Result<(), StepError> {
        tracing::info!(%image, "building image");
        self.client
            .build_image(&self.paths.descriptor, image.as_str(), &self.paths.work_dir)
            .await?;

        tracing::info!(%image, "running image");
        self.client.run_image(image.as_str(), self.tty).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(
        "container runtime `{binary}` is not available; install it or set [runtime].binary in cilocal.toml"
    )]
    RuntimeUnavailable { binary: String },

    #[error("failed to read CI config at {path}")]
    ReadSource {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Step(#[from] StepError),

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Ignore(#[from] IgnoreError),

    #[error(transparent)]
    Config(#[from] cilocal_core::Error),
}

impl PipelineError {
    /// The external step that failed, if the failure came from one.
    pub fn step_error(&self) -> Option<&StepError> {
        match self {
            Self::Step(e) => Some(e),
            _ => None,
        }
    }
}
