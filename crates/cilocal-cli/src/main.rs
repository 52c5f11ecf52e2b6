mod run;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cilocal",
    about = "Run a Travis CI build locally in a throwaway container image"
)]
#[command(version)]
struct Cli {
    /// Project directory containing .travis.yml (defaults to the current directory)
    #[arg(long, short = 'C', value_name = "DIR", default_value = ".")]
    dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    run::run(&cli.dir).await
}
