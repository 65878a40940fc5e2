//! Configuration inspection commands.
//!
//! Works on the raw `--config` path rather than a loaded config because
//! `path` and `init` must function before a config file exists.

use std::path::PathBuf;
use svcman_core::group::{ArgSpec, CommandArgs, CommandGroup, CommandSpec};
use svcman_core::{Error, Result};

use crate::config::SvcmanConfig;

/// The builtin `config` command group.
pub struct ConfigGroup {
    config_path: Option<String>,
}

impl ConfigGroup {
    pub fn new(config_path: Option<String>) -> Self {
        Self { config_path }
    }
}

impl CommandGroup for ConfigGroup {
    fn name(&self) -> Option<&str> {
        Some("config")
    }

    fn about(&self) -> Option<&str> {
        Some("Configuration operations")
    }

    fn commands(&self) -> Vec<CommandSpec> {
        let path_for_path = self.config_path.clone();
        let path_for_init = self.config_path.clone();
        let path_for_show = self.config_path.clone();

        vec![
            CommandSpec::handler("path", move |_| cmd_path(path_for_path.as_deref()))
                .with_about("Show the resolved config file path"),
            CommandSpec::handler("init", move |args| {
                cmd_init(path_for_init.as_deref(), args)
            })
            .with_about("Create a default configuration file")
            .with_arg(ArgSpec::flag("force").with_help("Overwrite an existing file")),
            CommandSpec::handler("show", move |_| cmd_show(path_for_show.as_deref()))
                .with_about("Print the resolved configuration"),
        ]
    }
}

// ============================================================================
// Handlers
// ============================================================================

fn cmd_path(config_path: Option<&str>) -> Result<i32> {
    match SvcmanConfig::resolve_config_path(config_path) {
        Some(path) => {
            println!("{}", path.display());
            if !path.exists() {
                eprintln!("(file does not exist — run `svcman config init` to create it)");
            }
            Ok(0)
        }
        None => Err(Error::config(
            "Could not determine config directory for this platform",
        )),
    }
}

fn cmd_init(config_path: Option<&str>, args: &CommandArgs) -> Result<i32> {
    let force = args.get_or("force", "false") == "true";
    let path = match config_path {
        Some(p) => PathBuf::from(p),
        None => SvcmanConfig::default_config_path()
            .ok_or_else(|| Error::config("Could not determine config directory"))?,
    };

    if path.exists() && !force {
        return Err(Error::config(format!(
            "Config file already exists at {}. Use --force true to overwrite.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }

    let config = SvcmanConfig::default();
    std::fs::write(&path, config.to_toml_string()?).map_err(|e| Error::io_with_path(e, &path))?;

    println!("Config file created at {}", path.display());
    Ok(0)
}

fn cmd_show(config_path: Option<&str>) -> Result<i32> {
    let config = SvcmanConfig::load(config_path)?;
    print!("{}", config.to_toml_string()?);
    Ok(0)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use svcman_core::group::CommandAction;
    use tempfile::TempDir;

    fn invoke(spec: &CommandSpec, pairs: &[(&str, &str)]) -> Result<i32> {
        let mut args = CommandArgs::new();
        for (k, v) in pairs {
            args.set(*k, *v);
        }
        match &spec.action {
            CommandAction::Handler(h) => h(&args),
            CommandAction::Exec(_) => panic!("expected handler action"),
        }
    }

    fn command(group: &ConfigGroup, name: &str) -> CommandSpec {
        group
            .commands()
            .into_iter()
            .find(|s| s.name == name)
            .unwrap()
    }

    #[test]
    fn test_config_group_identity() {
        let group = ConfigGroup::new(None);
        assert_eq!(group.name(), Some("config"));
        assert_eq!(group.commands().len(), 3);
    }

    #[test]
    fn test_path_with_explicit_config() {
        let group = ConfigGroup::new(Some("/tmp/svcman-test-config.toml".into()));
        assert_eq!(invoke(&command(&group, "path"), &[]).unwrap(), 0);
    }

    #[test]
    fn test_init_creates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        let group = ConfigGroup::new(Some(path.to_string_lossy().into_owned()));

        assert_eq!(invoke(&command(&group, "init"), &[]).unwrap(), 0);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("project_name = \"svcman\""));
    }

    #[test]
    fn test_init_refuses_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "project_name = \"keep\"\n").unwrap();
        let group = ConfigGroup::new(Some(path.to_string_lossy().into_owned()));

        assert!(invoke(&command(&group, "init"), &[]).is_err());
        assert_eq!(
            invoke(&command(&group, "init"), &[("force", "true")]).unwrap(),
            0
        );
    }

    #[test]
    fn test_show_prints_loaded_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "project_name = \"demo\"\n").unwrap();
        let group = ConfigGroup::new(Some(path.to_string_lossy().into_owned()));

        assert_eq!(invoke(&command(&group, "show"), &[]).unwrap(), 0);
    }
}
