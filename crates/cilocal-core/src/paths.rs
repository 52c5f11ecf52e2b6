use std::path::{Path, PathBuf};

use crate::FilesConfig;

/// Every file a pipeline run touches, resolved against one working directory.
///
/// The working directory doubles as the image build context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePaths {
    pub work_dir: PathBuf,
    /// CI configuration fed to the compiler helper (read-only)
    pub source: PathBuf,
    /// Generated build script
    pub script: PathBuf,
    /// Generated image descriptor
    pub descriptor: PathBuf,
    /// Version-control ignore list (may be absent)
    pub ignore: PathBuf,
    /// Build-context ignore list derived from [`ignore`](Self::ignore)
    pub container_ignore: PathBuf,
}

impl PipelinePaths {
    /// Join each configured file name onto `work_dir`.
    pub fn new(work_dir: &Path, files: &FilesConfig) -> Self {
        Self {
            work_dir: work_dir.to_path_buf(),
            source: work_dir.join(&files.source),
            script: work_dir.join(&files.script),
            descriptor: work_dir.join(&files.descriptor),
            ignore: work_dir.join(&files.ignore),
            container_ignore: work_dir.join(&files.container_ignore),
        }
    }

    /// Like [`new`](Self::new), but canonicalizes `work_dir` first so every
    /// path handed to the container runtime is absolute.
    pub fn resolve(work_dir: &Path, files: &FilesConfig) -> crate::Result<Self> {
        let canonical = work_dir
            .canonicalize()
            .map_err(|e| crate::Error::WorkDirResolve {
                path: work_dir.to_path_buf(),
                source: e,
            })?;
        Ok(Self::new(&canonical, files))
    }

    /// Script path relative to the build context, as the descriptor refers to it.
    ///
    /// A script outside the working directory is returned as is; the image
    /// build cannot copy it, which is why config validation rejects one.
    pub fn script_in_context(&self) -> PathBuf {
        if self.script.starts_with(&self.work_dir) {
            self.script
                .iter()
                .skip(self.work_dir.iter().count())
                .collect()
        } else {
            self.script.clone()
        }
    }
}
