//! Command-line surface composition.
//!
//! The command tree is not known at compile time: one subcommand per
//! registered group, each with the group's declared commands and arguments.
//! Global flags are parsed in a first permissive pass (so configuration can
//! be loaded and the registry built), then the fully composed tree parses
//! the same argv again with strict matching.

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;

use svcman_core::group::ArgSpec;
use svcman_core::registry::RootRegistry;

// ============================================================================
// Global flags
// ============================================================================

/// Flags that apply before any subcommand dispatch.
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to the configuration file.
    pub config: Option<String>,

    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,
}

/// Parse only the global flags, tolerating everything else.
///
/// Unknown subcommands and arguments are expected at this stage: the full
/// command tree does not exist until the registry is built.
pub fn parse_globals<I, T>(argv: I) -> GlobalArgs
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let permissive = base_command("svcman", "")
        .allow_external_subcommands(true)
        .ignore_errors(true);

    match permissive.try_get_matches_from(argv) {
        Ok(matches) => GlobalArgs {
            config: matches.get_one::<String>("config").cloned(),
            verbose: matches.get_flag("verbose"),
            quiet: matches.get_flag("quiet"),
        },
        Err(_) => GlobalArgs::default(),
    }
}

// ============================================================================
// Command tree construction
// ============================================================================

/// The root command with global flags and the `groups` report subcommand.
pub fn base_command(name: &str, version: &str) -> Command {
    Command::new(name.to_string())
        .version(version.to_string())
        .about("Command front door for modular multi-service projects")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .global(true)
                .help("Path to configuration file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Enable verbose output"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Suppress non-essential output"),
        )
        .subcommand(
            Command::new("groups")
                .about("List registered command groups and the scan report")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Emit the report as JSON"),
                ),
        )
}

/// Name reserved for the registry report subcommand.
pub const REPORT_COMMAND: &str = "groups";

/// Extend a root command with one subcommand per registered group.
pub fn compose(mut root: Command, registry: &RootRegistry) -> Command {
    for (name, group) in registry.iter() {
        if name == REPORT_COMMAND {
            tracing::warn!(name, "group name is reserved, not mounted");
            continue;
        }
        let mut group_cmd = Command::new(name.to_string())
            .subcommand_required(true)
            .arg_required_else_help(true);
        if let Some(about) = group.about() {
            group_cmd = group_cmd.about(about.to_string());
        }

        for spec in group.commands() {
            let mut cmd = Command::new(spec.name.clone());
            if let Some(about) = &spec.about {
                cmd = cmd.about(about.clone());
            }
            for arg in &spec.args {
                cmd = cmd.arg(build_arg(arg));
            }
            group_cmd = group_cmd.subcommand(cmd);
        }

        root = root.subcommand(group_cmd);
    }
    root
}

fn build_arg(spec: &ArgSpec) -> Arg {
    let mut arg = Arg::new(spec.name.clone());
    if let Some(help) = &spec.help {
        arg = arg.help(help.clone());
    }

    if spec.flag {
        return arg.long(spec.name.clone()).action(ArgAction::SetTrue);
    }

    arg = arg.action(ArgAction::Set);
    if spec.option {
        arg = arg.long(spec.name.clone());
    }
    match &spec.default {
        // A default satisfies the argument, so required would be ignored.
        Some(default) => arg = arg.default_value(default.clone()),
        None => arg = arg.required(spec.required),
    }
    arg
}

/// Collect the values declared by `specs` from parsed matches.
pub fn collect_args(specs: &[ArgSpec], matches: &ArgMatches) -> svcman_core::CommandArgs {
    let mut args = svcman_core::CommandArgs::new();
    for spec in specs {
        if spec.flag {
            args.set(&spec.name, matches.get_flag(&spec.name).to_string());
        } else if let Some(value) = matches.get_one::<String>(&spec.name) {
            args.set(&spec.name, value);
        }
    }
    args
}

// ============================================================================
// Tests
// ============================================================================
