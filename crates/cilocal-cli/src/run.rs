use std::io::IsTerminal;
use std::path::Path;

use cilocal_build::IgnoreOutcome;
use cilocal_core::{CilocalConfig, PipelinePaths};
use cilocal_runner::Pipeline;

/// Execute the full local run pipeline in `dir`.
pub async fn run(dir: &Path) -> anyhow::Result<()> {
    let config = CilocalConfig::load(dir)?;
    let paths = PipelinePaths::resolve(dir, &config.files)?;

    println!("Running {} locally...", paths.source.display());

    let tty = std::io::stdin().is_terminal();
    tracing::debug!(
        work_dir = %paths.work_dir.display(),
        runtime = %config.runtime.binary,
        compiler = %config.compiler.image,
        tty,
        "starting local build"
    );

    let pipeline = Pipeline::new(config, paths).tty(tty);
    let outcome = pipeline.run().await?;

    if outcome.ignore == IgnoreOutcome::SourceMissing {
        println!(
            "No {} found; built without {}",
            pipeline.paths().ignore.display(),
            pipeline.paths().container_ignore.display()
        );
    }

    println!();
    for step in &outcome.steps {
        println!("  {step}");
    }
    println!();
    println!("Build finished: {}", outcome.image);
    tracing::debug!(image = %outcome.image, "local build finished");

    Ok(())
}
