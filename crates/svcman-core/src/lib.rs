//! svcman core: command groups, discovery, and the root registry.
//!
//! This crate provides the foundational types used across svcman.
//! It has no internal svcman dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`group`]: The command-group capability contract
//! - [`manifest`]: TOML manifests contributed by services
//! - [`discover`]: Filesystem discovery of candidate manifests
//! - [`registry`]: Root registry, registration outcomes, scan report
//! - [`process`]: Subprocess execution with exit-status propagation
//! - [`traits`]: Configuration seam for embedding applications

#![doc = include_str!("../README.md")]

pub mod discover;
pub mod error;
pub mod group;
pub mod manifest;
pub mod process;
pub mod registry;
pub mod traits;

// Re-export key types at crate root for convenience
pub use discover::{Candidate, MANIFEST_SUBPATH, discover};
pub use error::{Error, Result};
pub use group::{ArgSpec, CommandAction, CommandArgs, CommandGroup, CommandSpec};
pub use registry::{RegistrationOutcome, RootRegistry, ScanReport, build_registry};
pub use traits::ConfigProvider;
