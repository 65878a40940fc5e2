//! Builtin command groups.
//!
//! These are the groups every svcman installation carries regardless of what
//! the service scan finds. Each implements the same [`CommandGroup`] contract
//! as discovered manifests and is registered through an explicit call, not
//! reflection or discovery.
//!
//! Builtins register before the scan, so a discovered group with a colliding
//! name shadows the builtin (last writer wins, consistently).

pub mod admin;
pub mod config_group;
pub mod git;
pub mod user;

use std::sync::Arc;
use svcman_core::registry::RootRegistry;
use svcman_core::traits::ConfigProvider;
use svcman_core::{CommandGroup, Result};

/// Register every builtin group into the registry.
pub fn register_all<C: ConfigProvider>(
    registry: &mut RootRegistry,
    config: &C,
    config_path: Option<&str>,
) -> Result<()> {
    let base_path = config.base_path()?;

    let builtins: Vec<Arc<dyn CommandGroup>> = vec![
        Arc::new(git::GitGroup),
        Arc::new(admin::AdminGroup::new(base_path)),
        Arc::new(user::UserGroup),
        Arc::new(config_group::ConfigGroup::new(
            config_path.map(str::to_string),
        )),
    ];

    for group in builtins {
        let name = group
            .name()
            .ok_or_else(|| svcman_core::Error::invalid_data("builtin group without a name"))?
            .to_string();
        registry.register(name, group);
    }

    Ok(())
}
