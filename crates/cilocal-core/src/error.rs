use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid image name prefix {prefix:?}: {reason}")]
    InvalidImagePrefix { prefix: String, reason: &'static str },

    #[error("invalid project_dir {path:?}: must be an absolute container path")]
    RelativeProjectDir { path: String },

    #[error(
        "invalid script path {path:?}: must be relative to the working directory and stay inside it"
    )]
    ScriptOutsideContext { path: String },

    #[error("failed to resolve working directory {path}")]
    WorkDirResolve {
        path: PathBuf,
        source: std::io::Error,
    },
}
