//! Subprocess execution with exit-status propagation.
//!
//! Manifest-declared commands are thin wrappers over external programs; the
//! only contract is "run and propagate the exit status". Signal termination
//! maps to `128 + signal` on Unix, matching shell convention.

use std::process::{Command, ExitStatus};
use tracing::debug;

use crate::{Error, Result};

/// Run a command line and return the child's exit code.
///
/// The child inherits stdio, so output formatting belongs to the invoked
/// program. A spawn failure (missing executable, permissions) is an error;
/// a child that runs and exits non-zero is a normal result.
pub fn run(argv: &[String]) -> Result<i32> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| Error::invalid_data("empty command line"))?;

    debug!(command = %argv.join(" "), "running subprocess");

    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| Error::io_with_path(e, program))?;

    Ok(exit_code(status))
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    match status.code() {
        Some(code) => code,
        None => match status.signal() {
            Some(signal) => 128 + signal,
            None => -1,
        },
    }
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
