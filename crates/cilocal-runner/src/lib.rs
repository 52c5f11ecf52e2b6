pub mod client;
pub mod docker;
pub mod executor;
pub mod pipeline;

pub use client::{DockerClient, Step, StepError};
pub use docker::{DockerError, ExitInfo};
pub use executor::{DockerExecutor, RealExecutor};
pub use pipeline::{Pipeline, PipelineError, PipelineOutcome};
