//! Ephemeral image naming.
//!
//! Each run builds into a fresh image named `<prefix><suffix>`, where the
//! suffix is [`SUFFIX_LEN`] lowercase hex characters taken from a v4 UUID.
//! Two runs started in the same second still get distinct names.

use std::fmt;

/// Number of hex characters appended to the prefix (48 random bits).
pub const SUFFIX_LEN: usize = 12;

/// Longest prefix accepted, leaving room for the suffix under docker's
/// 128-character tag component limit.
const MAX_PREFIX_LEN: usize = 64;

/// Name of the single-use image built, run, and removed by one pipeline run.
///
/// # Examples
///
/// ```
/// use cilocal_core::EphemeralImage;
///
/// let image = EphemeralImage::generate("cilocal-").unwrap();
/// assert!(image.as_str().starts_with("cilocal-"));
/// assert_eq!(image.suffix().len(), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EphemeralImage {
    name: String,
    prefix_len: usize,
}

impl EphemeralImage {
    /// Generate a fresh name under `prefix`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidImagePrefix`](crate::Error::InvalidImagePrefix) if the
    /// prefix cannot start a docker image name.
    pub fn generate(prefix: &str) -> crate::Result<Self> {
        validate_prefix(prefix)?;

        let uuid = uuid::Uuid::new_v4().simple().to_string();
        // The first 12 hex digits of a v4 UUID carry no version/variant bits.
        let suffix = &uuid[..SUFFIX_LEN];

        Ok(Self {
            name: format!("{prefix}{suffix}"),
            prefix_len: prefix.len(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn suffix(&self) -> &str {
        &self.name[self.prefix_len..]
    }
}

impl fmt::Display for EphemeralImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl AsRef<str> for EphemeralImage {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

/// Check that `prefix` is a valid leading part of an image name.
pub(crate) fn validate_prefix(prefix: &str) -> crate::Result<()> {
    let invalid = |reason| crate::Error::InvalidImagePrefix {
        prefix: prefix.to_owned(),
        reason,
    };

    if prefix.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if prefix.len() > MAX_PREFIX_LEN {
        return Err(invalid("must be at most 64 characters"));
    }
    if !prefix
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'))
    {
        return Err(invalid(
            "only lowercase letters, digits, '.', '_' and '-' are allowed",
        ));
    }
    if !prefix.starts_with(|c: char| c.is_ascii_lowercase() || c.is_ascii_digit()) {
        return Err(invalid("must start with a lowercase letter or digit"));
    }

    Ok(())
}
