//! TOML command manifests contributed by services.
//!
//! A service exports a command group by placing a `commands.toml` under its
//! `scripts/` directory. The manifest declares the group's name and help
//! text plus the commands it contributes; commands shell out to an argv
//! template with `{arg}` placeholders. Declaring commands as data instead of
//! code means the registry validates shape without executing anything.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

use crate::group::{ArgSpec, CommandAction, CommandGroup, CommandSpec};
use crate::{Error, Result};

// ============================================================================
// Manifest document types
// ============================================================================

/// Whole-file document. The `[group]` table is the exported command group;
/// a file without one parses fine but exports nothing.
#[derive(Debug, Deserialize)]
struct ManifestDoc {
    group: Option<GroupManifest>,
}

/// A command group declared in a manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupManifest {
    /// Self-declared group name. When absent, the registry derives one from
    /// the service directory containing the manifest.
    pub name: Option<String>,

    /// Help text for the group.
    pub about: Option<String>,

    /// Declared commands.
    #[serde(default, rename = "command")]
    pub commands: Vec<CommandManifest>,
}

/// One command declared in a manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandManifest {
    /// Command name as invoked on the command line.
    pub name: String,

    /// Help text.
    pub about: Option<String>,

    /// Argv template to execute, with `{arg}` placeholders.
    pub exec: Vec<String>,

    /// Arguments accepted by the command.
    #[serde(default)]
    pub args: Vec<ArgManifest>,
}

/// One argument declared in a manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct ArgManifest {
    pub name: String,
    pub help: Option<String>,
    #[serde(default)]
    pub required: bool,
    pub default: Option<String>,
    #[serde(default)]
    pub option: bool,
    #[serde(default)]
    pub flag: bool,
}

// ============================================================================
// Loading and validation
// ============================================================================

/// Read and parse a manifest file.
///
/// Returns `Ok(None)` when the file parses but exports no `[group]` table.
/// Read and parse failures are hard errors for this candidate only; the
/// caller records them and moves on.
pub fn load(path: &Path) -> Result<Option<GroupManifest>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
    let doc: ManifestDoc =
        toml::from_str(&content).map_err(|e| Error::manifest(path, e.to_string()))?;
    Ok(doc.group)
}

impl GroupManifest {
    /// Check that the declared group has a usable shape.
    ///
    /// A group with no commands, a command with an empty exec template, or
    /// duplicate command names is malformed.
    pub fn validate(&self) -> Result<()> {
        if self.commands.is_empty() {
            return Err(Error::invalid_data("group declares no commands"));
        }

        let mut seen = BTreeSet::new();
        for command in &self.commands {
            if command.name.is_empty() {
                return Err(Error::invalid_data("command with empty name"));
            }
            if command.exec.is_empty() {
                return Err(Error::invalid_data(format!(
                    "command '{}' has an empty exec template",
                    command.name
                )));
            }
            if !seen.insert(command.name.as_str()) {
                return Err(Error::invalid_data(format!(
                    "duplicate command name '{}'",
                    command.name
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// CommandGroup implementation
// ============================================================================

impl CommandGroup for GroupManifest {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn about(&self) -> Option<&str> {
        self.about.as_deref()
    }

    fn commands(&self) -> Vec<CommandSpec> {
        self.commands
            .iter()
            .map(|cmd| CommandSpec {
                name: cmd.name.clone(),
                about: cmd.about.clone(),
                args: cmd
                    .args
                    .iter()
                    .map(|arg| ArgSpec {
                        name: arg.name.clone(),
                        help: arg.help.clone(),
                        required: arg.required,
                        default: arg.default.clone(),
                        option: arg.option,
                        flag: arg.flag,
                    })
                    .collect(),
                action: CommandAction::Exec(cmd.exec.clone()),
            })
            .collect()
    }
}
