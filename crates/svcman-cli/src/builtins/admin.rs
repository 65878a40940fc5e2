//! Project administration commands.
//!
//! Secret-key generation, an admin-account stub, and a settings-file version
//! rewrite. These run in-process as handlers rather than shelling out.

use rand::Rng;
use regex::Regex;
use std::path::{Path, PathBuf};
use svcman_core::group::{ArgSpec, CommandArgs, CommandGroup, CommandSpec};
use svcman_core::{Error, Result};

/// Minimum accepted secret key length.
const MIN_SECRET_LENGTH: usize = 32;

/// Default secret key length.
const DEFAULT_SECRET_LENGTH: &str = "50";

/// Settings file rewritten by `set-version`, relative to the base path.
const DEFAULT_SETTINGS_FILE: &str = "config/settings.toml";

/// The builtin `admin` command group.
pub struct AdminGroup {
    base_path: PathBuf,
}

impl AdminGroup {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }
}

impl CommandGroup for AdminGroup {
    fn name(&self) -> Option<&str> {
        Some("admin")
    }

    fn about(&self) -> Option<&str> {
        Some("Project administration")
    }

    fn commands(&self) -> Vec<CommandSpec> {
        let default_settings = self.base_path.join(DEFAULT_SETTINGS_FILE);

        vec![
            CommandSpec::handler("secret", cmd_secret)
                .with_about("Generate a random secret key")
                .with_arg(
                    ArgSpec::option_with_default("length", DEFAULT_SECRET_LENGTH)
                        .with_help("Length of the secret key (minimum 32)"),
                ),
            CommandSpec::handler("create-admin", cmd_create_admin)
                .with_about("Create a new admin account (stub)")
                .with_arg(ArgSpec::required("username").with_help("The admin's username"))
                .with_arg(ArgSpec::required("email").with_help("The admin's email address"))
                .with_arg(ArgSpec::required("password").with_help("The admin's password")),
            CommandSpec::handler("set-version", move |args| {
                cmd_set_version(args, &default_settings)
            })
            .with_about("Update the version declared in the settings file")
            .with_arg(ArgSpec::required("version").with_help("The new version to set"))
            .with_arg(ArgSpec {
                name: "file".into(),
                help: Some("Path to the settings file".into()),
                option: true,
                ..ArgSpec::default()
            }),
        ]
    }
}

// ============================================================================
// Handlers
// ============================================================================

fn cmd_secret(args: &CommandArgs) -> Result<i32> {
    let length: usize = args
        .get_or("length", DEFAULT_SECRET_LENGTH)
        .parse()
        .map_err(|_| Error::invalid_data("length must be a positive integer"))?;

    if length < MIN_SECRET_LENGTH {
        return Err(Error::invalid_data(format!(
            "length must be at least {MIN_SECRET_LENGTH} for security reasons"
        )));
    }

    println!("Generated secret key: {}", generate_secret(length));
    Ok(0)
}

/// Random key over letters, digits, and punctuation.
pub(crate) fn generate_secret(length: usize) -> String {
    const CHARSET: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789\
          !\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

fn cmd_create_admin(args: &CommandArgs) -> Result<i32> {
    let username = args.require("username")?;
    let email = args.require("email")?;
    let password = args.require("password")?;

    // Stub until wired to the account backend.
    println!("Admin account created:");
    println!("  Username: {username}");
    println!("  Email:    {email}");
    println!("  Password: {} (hidden)", "*".repeat(password.len()));
    Ok(0)
}

fn cmd_set_version(args: &CommandArgs, default_settings: &Path) -> Result<i32> {
    let version = args.require("version")?;
    let path = match args.get("file") {
        Some(file) => PathBuf::from(file),
        None => default_settings.to_path_buf(),
    };

    if !path.exists() {
        return Err(Error::not_found(format!(
            "settings file '{}' does not exist",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
    let pattern = Regex::new(r#"version\s*=\s*"[^"]*""#)
        .map_err(|e| Error::invalid_data(e.to_string()))?;
    let updated = pattern.replace_all(&content, format!("version = \"{version}\""));
    std::fs::write(&path, updated.as_bytes()).map_err(|e| Error::io_with_path(e, &path))?;

    println!("Updated version to {version} in {}", path.display());
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

    fn handler_for(name: &str) -> CommandSpec {
        AdminGroup::new(PathBuf::from("/tmp"))
            .commands()
            .into_iter()
            .find(|s| s.name == name)
            .unwrap()
    }

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

    #[test]
    fn test_generate_secret_length_and_charset() {
        let secret = generate_secret(50);
        assert_eq!(secret.chars().count(), 50);
        assert!(secret.chars().all(|c| c.is_ascii_graphic()));
    }

    #[test]
    fn test_secret_rejects_short_length() {
        let spec = handler_for("secret");
        let err = invoke(&spec, &[("length", "16")]).unwrap_err();
        assert!(err.to_string().contains("at least 32"));
    }

    #[test]
    fn test_secret_rejects_non_numeric_length() {
        let spec = handler_for("secret");
        assert!(invoke(&spec, &[("length", "plenty")]).is_err());
    }

    #[test]
    fn test_secret_accepts_default_length() {
        let spec = handler_for("secret");
        assert_eq!(invoke(&spec, &[]).unwrap(), 0);
    }

    #[test]
    fn test_create_admin_requires_all_arguments() {
        let spec = handler_for("create-admin");
        assert!(invoke(&spec, &[("username", "root")]).is_err());
        let code = invoke(
            &spec,
            &[
                ("username", "root"),
                ("email", "root@example.org"),
                ("password", "hunter2"),
            ],
        )
        .unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_set_version_rewrites_settings_file() {
        let temp = TempDir::new().unwrap();
        let settings = temp.path().join("settings.toml");
        std::fs::write(&settings, "name = \"demo\"\nversion = \"0.1.0\"\n").unwrap();

        let spec = handler_for("set-version");
        let code = invoke(
            &spec,
            &[("version", "2.0.0"), ("file", settings.to_str().unwrap())],
        )
        .unwrap();
        assert_eq!(code, 0);

        let content = std::fs::read_to_string(&settings).unwrap();
        assert!(content.contains("version = \"2.0.0\""));
        assert!(!content.contains("0.1.0"));
    }

    #[test]
    fn test_set_version_missing_file_is_error() {
        let spec = handler_for("set-version");
        let err = invoke(&spec, &[("version", "2.0.0"), ("file", "/nope/settings.toml")])
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
