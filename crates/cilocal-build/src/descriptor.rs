use std::path::Path;

use cilocal_core::ImageConfig;

/// Renders the image descriptor that runs the generated build script
/// on top of the pinned CI base image.
pub struct DescriptorGenerator<'a> {
    config: &'a ImageConfig,
    script: &'a Path,
}

impl<'a> DescriptorGenerator<'a> {
    /// `script` is the build script's path inside the build context.
    pub fn new(config: &'a ImageConfig, script: &'a Path) -> Self {
        Self { config, script }
    }

    /// Where the script lands inside the image.
    pub fn script_target(&self) -> String {
        format!("/home/{user}/build.sh", user = self.config.user)
    }

    pub fn render(&self) -> String {
        let script = self.script.to_string_lossy().replace('\\', "/");

        format!(
            r#"FROM {base}
COPY --chown={user}:{user} . {project_dir}
COPY --chown={user}:{user} {script} {target}
USER {user}
WORKDIR {project_dir}
CMD ["bash", "{target}"]
"#,
            base = self.config.base_image,
            user = self.config.user,
            project_dir = self.config.project_dir,
            script = script,
            target = self.script_target(),
        )
    }
}

/// Write the rendered descriptor, replacing any previous one.
pub fn write_descriptor(dest: &Path, content: &str) -> Result<(), DescriptorError> {
    std::fs::write(dest, content).map_err(|e| DescriptorError::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %dest.display(), "image descriptor written");
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("failed to write image descriptor at {path}")]
    Write {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}
