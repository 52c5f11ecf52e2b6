use std::path::Path;

/// What [`derive_ignore_file`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreOutcome {
    /// The ignore file was copied to the build-context ignore file.
    Derived,
    /// There was nothing to copy; the destination was left untouched.
    SourceMissing,
}

/// Copies the version-control ignore list into the build-context ignore
/// list so the image build skips the same files.
///
/// A missing `source` is not an error.
pub fn derive_ignore_file(source: &Path, dest: &Path) -> Result<IgnoreOutcome, IgnoreError> {
    if !source.exists() {
        tracing::debug!(path = %source.display(), "no ignore file to derive from");
        return Ok(IgnoreOutcome::SourceMissing);
    }

    let bytes = std::fs::copy(source, dest).map_err(|e| IgnoreError::Copy {
        from: source.to_path_buf(),
        to: dest.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(
        from = %source.display(),
        to = %dest.display(),
        bytes,
        "ignore file derived"
    );
    Ok(IgnoreOutcome::Derived)
}

#[derive(Debug, thiserror::Error)]
pub enum IgnoreError {
    #[error("failed to copy {from} to {to}")]
    Copy {
        from: std::path::PathBuf,
        to: std::path::PathBuf,
        source: std::io::Error,
    },
}
