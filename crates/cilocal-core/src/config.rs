use serde::{Deserialize, Serialize};

/// File name of the optional per-project configuration.
pub const CONFIG_FILE: &str = "cilocal.toml";

/// cilocal.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CilocalConfig {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub compiler: CompilerConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub files: FilesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Container runtime CLI (looked up on PATH)
    #[serde(default = "default_binary")]
    pub binary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Helper image that reads the CI config on stdin and prints a bash script
    #[serde(default = "default_compiler_image")]
    pub image: String,
    /// Extra arguments passed after the helper image reference
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Pinned base image the build script runs on
    #[serde(default = "default_base_image")]
    pub base_image: String,
    /// Prefix of the ephemeral image name; a random hex suffix is appended
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,
    /// Unprivileged user the build runs as
    #[serde(default = "default_user")]
    pub user: String,
    /// Directory inside the container holding the project checkout.
    /// The generated script `cd`s here before announcing the build.
    #[serde(default = "default_project_dir")]
    pub project_dir: String,
}

/// Paths of the files a run reads and writes, relative to the working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_script")]
    pub script: String,
    #[serde(default = "default_descriptor")]
    pub descriptor: String,
    #[serde(default = "default_ignore")]
    pub ignore: String,
    #[serde(default = "default_container_ignore")]
    pub container_ignore: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
        }
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            image: default_compiler_image(),
            args: Vec::new(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_image: default_base_image(),
            name_prefix: default_name_prefix(),
            user: default_user(),
            project_dir: default_project_dir(),
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            script: default_script(),
            descriptor: default_descriptor(),
            ignore: default_ignore(),
            container_ignore: default_container_ignore(),
        }
    }
}

impl CilocalConfig {
    /// Load from cilocal.toml in the given directory, or return defaults if not found.
    pub fn load(work_dir: &std::path::Path) -> crate::Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE);
        let config = if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            tracing::debug!(path = %config_path.display(), "loading config");
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })?
        } else {
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would produce an invalid image name, a script
    /// that `cd`s somewhere relative, or a script the image build cannot
    /// copy because it lies outside the build context.
    pub fn validate(&self) -> crate::Result<()> {
        crate::image::validate_prefix(&self.image.name_prefix)?;

        if !self.image.project_dir.starts_with('/') {
            return Err(crate::Error::RelativeProjectDir {
                path: self.image.project_dir.clone(),
            });
        }

        let script = std::path::Path::new(&self.files.script);
        let escapes = script.components().any(|c| {
            !matches!(
                c,
                std::path::Component::Normal(_) | std::path::Component::CurDir
            )
        });
        if escapes || script.file_name().is_none() {
            return Err(crate::Error::ScriptOutsideContext {
                path: self.files.script.clone(),
            });
        }

        Ok(())
    }
}

fn default_binary() -> String {
    "docker".to_owned()
}

fn default_compiler_image() -> String {
    "travis-build:latest".to_owned()
}

fn default_base_image() -> String {
    "travisci/ci-garnet:packer-1512502276-986baf0".to_owned()
}

fn default_name_prefix() -> String {
    "cilocal-".to_owned()
}

fn default_user() -> String {
    "travis".to_owned()
}

fn default_project_dir() -> String {
    "/home/travis/project".to_owned()
}

fn default_source() -> String {
    ".travis.yml".to_owned()
}

fn default_script() -> String {
    ".travis.sh".to_owned()
}

fn default_descriptor() -> String {
    ".travis.Dockerfile".to_owned()
}

fn default_ignore() -> String {
    ".gitignore".to_owned()
}

fn default_container_ignore() -> String {
    ".dockerignore".to_owned()
}
