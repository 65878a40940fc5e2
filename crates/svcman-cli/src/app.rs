//! The svcman application.
//!
//! Ties the pieces together: loads configuration, initialises logging,
//! registers builtins, scans for service command groups, composes the
//! command tree, and dispatches the invoked command.

use std::ffi::OsString;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use serde::Serialize;
use svcman_core::group::{CommandAction, render_exec};
use svcman_core::registry::{RootRegistry, ScanReport, scan_into};
use svcman_core::traits::ConfigProvider;
use svcman_core::{Error, Result, process};

use crate::builtins;
use crate::cli::{self, GlobalArgs};
use crate::config::SvcmanConfig;

// ============================================================================
// Exit codes
// ============================================================================

/// Generic failure.
pub const EXIT_FAILURE: i32 = 1;

/// The registry ended up empty: the application has nothing to run.
/// Distinct from clap's usage-error code (2) so "no groups at all" is
/// distinguishable from "command not found".
pub const EXIT_NO_GROUPS: i32 = 3;

// ============================================================================
// App
// ============================================================================

/// The svcman application, parameterized over a config provider.
pub struct App<C: ConfigProvider> {
    name: String,
    version: String,
    config: Arc<C>,
    config_path: Option<String>,
}

impl App<SvcmanConfig> {
    /// Create from parsed global flags, loading config from file/env.
    pub fn from_globals(name: impl Into<String>, globals: &GlobalArgs) -> Result<Self> {
        let config = SvcmanConfig::load(globals.config.as_deref())?;
        Ok(Self::new(name, config).with_config_path(globals.config.clone()))
    }
}

impl<C: ConfigProvider> App<C> {
    /// Create a new application.
    pub fn new(name: impl Into<String>, config: C) -> Self {
        Self {
            name: name.into(),
            config: Arc::new(config),
            version: env!("CARGO_PKG_VERSION").to_string(),
            config_path: None,
        }
    }

    /// Override the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Record the raw `--config` path for the config command group.
    pub fn with_config_path(mut self, path: Option<String>) -> Self {
        self.config_path = path;
        self
    }

    /// Get a reference to the config provider.
    pub fn config(&self) -> &C {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` env var if set, otherwise defaults based on verbosity flags.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // Ignore error if a subscriber is already set (e.g. in tests).
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }

    /// Register builtins (when enabled) and scan the configured roots.
    ///
    /// Builtins go in first so discovered groups shadow them on collision.
    pub fn build_registry(&self) -> Result<(RootRegistry, ScanReport)> {
        let mut registry = RootRegistry::new();

        if self.config.builtins_enabled() {
            builtins::register_all(&mut registry, &*self.config, self.config_path.as_deref())?;
        }

        let roots = self.config.discovery_roots()?;
        let report = scan_into(&mut registry, &roots)?;
        tracing::debug!(
            groups = registry.len(),
            discovered = report.registered(),
            "registry ready"
        );
        Ok((registry, report))
    }

    /// Run the application over the given argv. Returns the process exit code.
    pub fn run<I>(&self, globals: &GlobalArgs, argv: I) -> Result<i32>
    where
        I: IntoIterator<Item = OsString>,
    {
        self.init_logging(globals.verbose, globals.quiet);

        let (registry, report) = self.build_registry()?;

        if registry.is_empty() {
            eprintln!("{}: no command groups registered — nothing to run", self.name);
            for outcome in &report.outcomes {
                eprintln!("  {}", outcome.describe());
            }
            return Ok(EXIT_NO_GROUPS);
        }

        let command = cli::compose(cli::base_command(&self.name, &self.version), &registry);
        let matches = match command.try_get_matches_from(argv) {
            Ok(matches) => matches,
            Err(err) => {
                // clap renders its own message; propagate its exit code.
                let _ = err.print();
                return Ok(err.exit_code());
            }
        };

        match matches.subcommand() {
            Some((cli::REPORT_COMMAND, sub)) => {
                self.print_groups(&registry, &report, sub.get_flag("json"))?;
                Ok(0)
            }
            Some((group_name, group_matches)) => {
                self.dispatch(&registry, group_name, group_matches)
            }
            None => {
                println!("{} {} — use --help for usage", self.name, self.version);
                Ok(0)
            }
        }
    }

    /// Dispatch one group invocation to its command.
    fn dispatch(
        &self,
        registry: &RootRegistry,
        group_name: &str,
        group_matches: &clap::ArgMatches,
    ) -> Result<i32> {
        let group = registry
            .get(group_name)
            .ok_or_else(|| Error::not_found(format!("command group '{group_name}'")))?;

        // subcommand_required(true) on every group command guarantees this.
        let (command_name, command_matches) = group_matches
            .subcommand()
            .ok_or_else(|| Error::invalid_data("group invoked without a command"))?;

        let specs = group.commands();
        let spec = specs
            .iter()
            .find(|s| s.name == command_name)
            .ok_or_else(|| {
                Error::not_found(format!("command '{command_name}' in group '{group_name}'"))
            })?;

        let args = cli::collect_args(&spec.args, command_matches);

        match &spec.action {
            CommandAction::Exec(template) => {
                let rendered = render_exec(template, &args)?;
                process::run(&rendered)
            }
            CommandAction::Handler(handler) => handler(&args),
        }
    }

    /// Print registered groups and the scan report.
    fn print_groups(
        &self,
        registry: &RootRegistry,
        report: &ScanReport,
        json: bool,
    ) -> Result<()> {
        if json {
            let rendered = GroupsReport::new(registry, report);
            println!(
                "{}",
                serde_json::to_string_pretty(&rendered)
                    .map_err(|e| Error::invalid_data(e.to_string()))?
            );
            return Ok(());
        }

        println!("Registered command groups:");
        for (name, group) in registry.iter() {
            match group.about() {
                Some(about) => println!("  {name} — {about}"),
                None => println!("  {name}"),
            }
        }
        if !report.is_empty() {
            println!("Scan report:");
            for outcome in &report.outcomes {
                println!("  {}", outcome.describe());
            }
        }
        Ok(())
    }
}

// ============================================================================
// JSON report shape
// ============================================================================

#[derive(Serialize)]
struct GroupsReport<'a> {
    groups: Vec<GroupLine>,
    scan: &'a ScanReport,
}

#[derive(Serialize)]
struct GroupLine {
    name: String,
    about: Option<String>,
    commands: Vec<String>,
}

impl<'a> GroupsReport<'a> {
    fn new(registry: &RootRegistry, report: &'a ScanReport) -> Self {
        let groups = registry
            .iter()
            .map(|(name, group)| GroupLine {
                name: name.to_string(),
                about: group.about().map(str::to_string),
                commands: group.commands().into_iter().map(|s| s.name).collect(),
            })
            .collect();
        Self {
            groups,
            scan: report,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuiltinsConfig, DiscoveryConfig, SvcmanConfig};
    use std::path::Path;
    use tempfile::TempDir;

    fn argv(parts: &[&str]) -> Vec<OsString> {
        parts.iter().map(OsString::from).collect()
    }

    fn config_for(base: &Path, builtins: bool) -> SvcmanConfig {
        SvcmanConfig {
            base_path: Some(base.to_string_lossy().into_owned()),
            discovery: DiscoveryConfig {
                roots: vec!["services".into()],
            },
            builtins: BuiltinsConfig { enabled: builtins },
            ..Default::default()
        }
    }

    fn write_service(base: &Path, service: &str, manifest: &str) {
        let dir = base.join("services").join(service).join("scripts");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("commands.toml"), manifest).unwrap();
    }

    #[test]
    fn test_app_new_and_version() {
        let temp = TempDir::new().unwrap();
        let app = App::new("svcman", config_for(temp.path(), true)).with_version("9.9.9");
        assert_eq!(app.name, "svcman");
        assert_eq!(app.version, "9.9.9");
    }

    #[test]
    fn test_build_registry_with_builtins_only() {
        let temp = TempDir::new().unwrap();
        let app = App::new("svcman", config_for(temp.path(), true));
        let (registry, report) = app.build_registry().unwrap();
        assert_eq!(registry.names(), vec!["admin", "config", "git", "user"]);
        assert!(report.is_empty());
    }

    #[test]
    fn test_build_registry_discovers_services() {
        let temp = TempDir::new().unwrap();
        write_service(
            temp.path(),
            "billing",
            "[group]\n[[group.command]]\nname = \"ping\"\nexec = [\"true\"]\n",
        );

        let app = App::new("svcman", config_for(temp.path(), false));
        let (registry, report) = app.build_registry().unwrap();
        assert_eq!(registry.names(), vec!["billing"]);
        assert_eq!(report.registered(), 1);
    }

    #[test]
    fn test_run_empty_registry_exits_distinctly() {
        let temp = TempDir::new().unwrap();
        let app = App::new("svcman", config_for(temp.path(), false));
        let code = app
            .run(&GlobalArgs::default(), argv(&["svcman", "groups"]))
            .unwrap();
        assert_eq!(code, EXIT_NO_GROUPS);
    }

    #[test]
    fn test_run_groups_report() {
        let temp = TempDir::new().unwrap();
        let app = App::new("svcman", config_for(temp.path(), true));
        let code = app
            .run(&GlobalArgs::default(), argv(&["svcman", "groups"]))
            .unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_run_groups_report_json() {
        let temp = TempDir::new().unwrap();
        let app = App::new("svcman", config_for(temp.path(), true));
        let code = app
            .run(&GlobalArgs::default(), argv(&["svcman", "groups", "--json"]))
            .unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_run_no_subcommand_prints_hint() {
        let temp = TempDir::new().unwrap();
        let app = App::new("svcman", config_for(temp.path(), true));
        let code = app.run(&GlobalArgs::default(), argv(&["svcman"])).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_run_unknown_group_is_usage_error() {
        let temp = TempDir::new().unwrap();
        let app = App::new("svcman", config_for(temp.path(), true));
        let code = app
            .run(&GlobalArgs::default(), argv(&["svcman", "no-such-group"]))
            .unwrap();
        assert_ne!(code, 0);
    }

    #[test]
    fn test_run_dispatches_builtin_handler() {
        let temp = TempDir::new().unwrap();
        let app = App::new("svcman", config_for(temp.path(), true));
        let code = app
            .run(
                &GlobalArgs::default(),
                argv(&["svcman", "user", "create", "ada", "ada@example.org"]),
            )
            .unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    #[cfg(unix)]
    fn test_run_dispatches_discovered_exec_command() {
        let temp = TempDir::new().unwrap();
        write_service(
            temp.path(),
            "billing",
            "[group]\n[[group.command]]\nname = \"check\"\nexec = [\"sh\", \"-c\", \"exit 7\"]\n",
        );

        let app = App::new("svcman", config_for(temp.path(), false));
        let code = app
            .run(&GlobalArgs::default(), argv(&["svcman", "billing", "check"]))
            .unwrap();
        assert_eq!(code, 7);
    }

    #[test]
    fn test_discovered_group_shadows_builtin_user() {
        let temp = TempDir::new().unwrap();
        write_service(
            temp.path(),
            "user",
            "[group]\n[[group.command]]\nname = \"noop\"\nexec = [\"true\"]\n",
        );

        let app = App::new("svcman", config_for(temp.path(), true));
        let (registry, _) = app.build_registry().unwrap();
        let group = registry.get("user").unwrap();
        assert_eq!(group.commands()[0].name, "noop");
    }

    #[test]
    fn test_from_globals_loads_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "project_name = \"from-file\"\n").unwrap();

        let globals = GlobalArgs {
            config: Some(path.to_string_lossy().into_owned()),
            ..Default::default()
        };
        let app = App::from_globals("svcman", &globals).unwrap();
        assert_eq!(app.config().project_name, "from-file");
    }
}
