//! The svcman command-line application.
//!
//! # Key Abstractions
//!
//! - [`App`]: the application tying config, registry, and dispatch together
//! - [`cli`]: runtime composition of the command tree from the registry
//! - [`builtins`]: statically registered command groups
//! - [`SvcmanConfig`]: layered configuration

#![doc = include_str!("../README.md")]

pub mod app;
pub mod builtins;
pub mod cli;
pub mod config;

pub use app::{App, EXIT_FAILURE, EXIT_NO_GROUPS};
pub use cli::GlobalArgs;
pub use config::SvcmanConfig;
