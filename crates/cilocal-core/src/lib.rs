//! Core types and configuration for cilocal.
//!
//! This crate defines the `cilocal.toml` schema ([`CilocalConfig`]), the
//! explicit set of files a run reads and writes ([`PipelinePaths`]),
//! ephemeral image naming ([`EphemeralImage`]), and shared error types.

pub mod config;
pub mod error;
pub mod image;
pub mod paths;

pub use config::{CilocalConfig, CompilerConfig, FilesConfig, ImageConfig, RuntimeConfig};
pub use error::{Error, Result};
pub use image::EphemeralImage;
pub use paths::PipelinePaths;
