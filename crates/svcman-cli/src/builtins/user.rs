//! User management commands.
//!
//! A stub group until user creation is wired to the account backend.

use svcman_core::group::{ArgSpec, CommandArgs, CommandGroup, CommandSpec};
use svcman_core::Result;

/// The builtin `user` command group.
pub struct UserGroup;

impl CommandGroup for UserGroup {
    fn name(&self) -> Option<&str> {
        Some("user")
    }

    fn about(&self) -> Option<&str> {
        Some("User management")
    }

    fn commands(&self) -> Vec<CommandSpec> {
        vec![
            CommandSpec::handler("create", cmd_create)
                .with_about("Create a new user")
                .with_arg(ArgSpec::required("username").with_help("Username of the new user"))
                .with_arg(ArgSpec::required("email").with_help("Email of the new user")),
        ]
    }
}

fn cmd_create(args: &CommandArgs) -> Result<i32> {
    let username = args.require("username")?;
    let email = args.require("email")?;
    println!("User '{username}' with email '{email}' has been created.");
    Ok(0)
}
