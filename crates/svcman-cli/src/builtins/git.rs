//! Source-control helpers.
//!
//! Thin wrappers over `git`: every command is an exec template run through
//! the subprocess runner, with the child's exit status propagated verbatim.
//! Nothing here inspects git output; formatting belongs to git itself.

use svcman_core::group::{ArgSpec, CommandGroup, CommandSpec};

/// The builtin `git` command group.
pub struct GitGroup;

impl CommandGroup for GitGroup {
    fn name(&self) -> Option<&str> {
        Some("git")
    }

    fn about(&self) -> Option<&str> {
        Some("Source-control helpers")
    }

    fn commands(&self) -> Vec<CommandSpec> {
        vec![
            CommandSpec::exec("status", argv(&["git", "status"]))
                .with_about("Show the working tree status"),
            CommandSpec::exec("stage", argv(&["git", "add", "{path}"]))
                .with_about("Stage a file")
                .with_arg(ArgSpec::required("path").with_help("File to stage")),
            CommandSpec::exec("unstage", argv(&["git", "reset", "{path}"]))
                .with_about("Unstage a file")
                .with_arg(ArgSpec::required("path").with_help("File to unstage")),
            CommandSpec::exec("push", argv(&["git", "push"])).with_about("Push the latest commit"),
            CommandSpec::exec("pull", argv(&["git", "pull"]))
                .with_about("Pull changes from the remote repository"),
            CommandSpec::exec("branches", argv(&["git", "branch"])).with_about("List branches"),
            CommandSpec::exec("switch", argv(&["git", "checkout", "{branch}"]))
                .with_about("Switch to a different branch")
                .with_arg(ArgSpec::required("branch").with_help("Branch to switch to")),
            CommandSpec::exec("branch", argv(&["git", "checkout", "-b", "{name}"]))
                .with_about("Create and switch to a new branch")
                .with_arg(ArgSpec::required("name").with_help("Name of the new branch")),
        ]
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| (*s).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use svcman_core::group::{CommandAction, CommandArgs, render_exec};

    #[test]
    fn test_git_group_identity() {
        assert_eq!(GitGroup.name(), Some("git"));
        assert!(GitGroup.about().is_some());
    }

    #[test]
    fn test_git_commands_are_exec_templates() {
        for spec in GitGroup.commands() {
            match &spec.action {
                CommandAction::Exec(argv) => assert_eq!(argv[0], "git"),
                other => panic!("'{}' is not exec-backed: {other:?}", spec.name),
            }
        }
    }

    #[test]
    fn test_switch_renders_branch_argument() {
        let specs = GitGroup.commands();
        let switch = specs.iter().find(|s| s.name == "switch").unwrap();
        let mut args = CommandArgs::new();
        args.set("branch", "main");
        match &switch.action {
            CommandAction::Exec(template) => {
                let rendered = render_exec(template, &args).unwrap();
                assert_eq!(rendered, vec!["git", "checkout", "main"]);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_command_names_are_unique() {
        let mut names: Vec<_> = GitGroup.commands().into_iter().map(|s| s.name).collect();
        let before = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), before);
    }
}
