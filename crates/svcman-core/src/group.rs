//! The command-group capability contract.
//!
//! A [`CommandGroup`] is a named bundle of invocable sub-commands contributed
//! by one collaborator, either a statically registered builtin or a group
//! materialised from a discovered manifest. The trait is the entire interface
//! the registry requires from a contributor; nothing else about a
//! collaborator matters to the core.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::{Error, Result};

// ============================================================================
// Argument and command specifications
// ============================================================================

/// One argument accepted by a command.
#[derive(Debug, Clone, Default)]
pub struct ArgSpec {
    /// Argument name, also the placeholder key in exec templates.
    pub name: String,
    /// Help text shown in usage output.
    pub help: Option<String>,
    /// Whether the argument must be supplied.
    pub required: bool,
    /// Default value applied when the argument is omitted.
    pub default: Option<String>,
    /// Render as a `--name <value>` option instead of a positional.
    pub option: bool,
    /// Render as a boolean `--name` flag; the parsed value is `"true"` or
    /// `"false"`.
    pub flag: bool,
}

impl ArgSpec {
    /// A required positional argument.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            ..Self::default()
        }
    }

    /// An optional `--name <value>` argument with a default.
    pub fn option_with_default(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
            option: true,
            ..Self::default()
        }
    }

    /// A boolean `--name` flag.
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flag: true,
            ..Self::default()
        }
    }

    /// Attach help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// In-process command handler.
///
/// Returns the exit code the command should produce.
pub type Handler = Arc<dyn Fn(&CommandArgs) -> Result<i32> + Send + Sync>;

/// What invoking a command actually does.
#[derive(Clone)]
pub enum CommandAction {
    /// Run a subprocess. Elements may contain `{arg}` placeholders that are
    /// substituted from the parsed arguments before execution.
    Exec(Vec<String>),
    /// Call an in-process handler.
    Handler(Handler),
}

impl fmt::Debug for CommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exec(argv) => f.debug_tuple("Exec").field(argv).finish(),
            Self::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

/// One invocable command within a group.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Command name as invoked on the command line.
    pub name: String,
    /// Help text shown in usage output.
    pub about: Option<String>,
    /// Ordered argument list.
    pub args: Vec<ArgSpec>,
    /// What the command does when invoked.
    pub action: CommandAction,
}

impl CommandSpec {
    /// Create a subprocess-backed command.
    pub fn exec(name: impl Into<String>, argv: Vec<String>) -> Self {
        Self {
            name: name.into(),
            about: None,
            args: Vec::new(),
            action: CommandAction::Exec(argv),
        }
    }

    /// Create a handler-backed command.
    pub fn handler<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&CommandArgs) -> Result<i32> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            about: None,
            args: Vec::new(),
            action: CommandAction::Handler(Arc::new(f)),
        }
    }

    /// Attach help text.
    pub fn with_about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Attach an argument.
    pub fn with_arg(mut self, arg: ArgSpec) -> Self {
        self.args.push(arg);
        self
    }
}

// ============================================================================
// Parsed argument values
// ============================================================================

/// Argument values collected for one command invocation.
#[derive(Debug, Clone, Default)]
pub struct CommandArgs {
    values: BTreeMap<String, String>,
}

impl CommandArgs {
    /// Empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any previous one.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Get a value by argument name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Get a value, falling back to a default.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    /// Get a required value, failing if absent.
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name)
            .ok_or_else(|| Error::invalid_data(format!("missing argument '{name}'")))
    }
}

impl FromIterator<(String, String)> for CommandArgs {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Exec template rendering
// ============================================================================

/// Substitute `{arg}` placeholders in an exec argv template.
///
/// Every placeholder must resolve to a parsed argument value; an unresolved
/// placeholder is an error rather than an empty string, so a typo in a
/// manifest surfaces before a subprocess runs with a mangled command line.
pub fn render_exec(template: &[String], args: &CommandArgs) -> Result<Vec<String>> {
    let mut rendered = Vec::with_capacity(template.len());
    for element in template {
        let mut out = element.clone();
        for (name, value) in &args.values {
            out = out.replace(&format!("{{{name}}}"), value);
        }
        if let Some(start) = out.find('{') {
            if out[start..].contains('}') {
                return Err(Error::invalid_data(format!(
                    "unresolved placeholder in exec element '{element}'"
                )));
            }
        }
        rendered.push(out);
    }
    Ok(rendered)
}

// ============================================================================
// The capability contract
// ============================================================================

/// A named bundle of invocable sub-commands contributed by one collaborator.
///
/// Contributors implement this trait and are registered explicitly (builtins)
/// or via manifest discovery. The registry never introspects anything beyond
/// this contract.
pub trait CommandGroup: Send + Sync {
    /// The group's self-declared name, if any.
    ///
    /// When `None`, the registry falls back to a name derived from the
    /// contributor's location (the service directory).
    fn name(&self) -> Option<&str>;

    /// Help text for the group.
    fn about(&self) -> Option<&str> {
        None
    }

    /// The commands this group contributes, in presentation order.
    fn commands(&self) -> Vec<CommandSpec>;
}
