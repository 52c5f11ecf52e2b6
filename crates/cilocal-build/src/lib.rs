//! Build artifacts for a local CI run.
//!
//! # Run pipeline
//!
//! ```text
//! cilocal
//!   1. Probe       ── docker --version
//!   2. Compile     ── .travis.yml → helper image → ScriptFilter → .travis.sh
//!   3. Descriptor  ── DescriptorGenerator::render() → .travis.Dockerfile
//!   4. Ignore      ── .gitignore → .dockerignore (if present)
//!   5. Build       ── docker build -f .travis.Dockerfile -t <image> .
//!   6. Run         ── docker run --rm -i [-t] <image>
//!   7. Remove      ── docker rmi --force <image> (always, once 5 started)
//! ```
//!
//! This crate owns steps 2 (the text half), 3 and 4; the runner crate
//! drives the container runtime.

pub mod descriptor;
pub mod ignore;
pub mod script;

pub use descriptor::DescriptorGenerator;
pub use ignore::IgnoreOutcome;
pub use script::ScriptFilter;
