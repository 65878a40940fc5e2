//! Configuration seam for embedding applications.
//!
//! The CLI framework is generic over [`ConfigProvider`] so the concrete
//! configuration (file format, env layering, defaults) stays out of the
//! core. Implementations supply the project identity and the roots the
//! registry scans.

use std::path::PathBuf;

use crate::Result;

/// Configuration contract for applications built on the registry.
///
/// # Bounds
///
/// - `Send + Sync`: configuration is shared with handler closures
/// - `Clone`: configuration is duplicated into subsystems
/// - `'static`: configuration lifetime is not borrowed
pub trait ConfigProvider: Send + Sync + Clone + 'static {
    /// The project name, used for env var prefixes and default paths.
    fn project_name(&self) -> &str;

    /// Base path of the project tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be determined.
    fn base_path(&self) -> Result<PathBuf>;

    /// Roots the registry scans for service command manifests, resolved
    /// to absolute paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the base path cannot be determined.
    fn discovery_roots(&self) -> Result<Vec<PathBuf>>;

    /// Whether builtin command groups are registered before the scan.
    fn builtins_enabled(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct TestConfig {
        base: PathBuf,
    }

    impl ConfigProvider for TestConfig {
        fn project_name(&self) -> &str {
            "test-project"
        }

        fn base_path(&self) -> Result<PathBuf> {
            Ok(self.base.clone())
        }

        fn discovery_roots(&self) -> Result<Vec<PathBuf>> {
            Ok(vec![self.base.join("services")])
        }
    }

    #[test]
    fn test_config_provider_roots() {
        let config = TestConfig {
            base: PathBuf::from("/project"),
        };
        assert_eq!(config.project_name(), "test-project");
        assert_eq!(
            config.discovery_roots().unwrap(),
            vec![PathBuf::from("/project/services")]
        );
        assert!(config.builtins_enabled());
    }

    #[test]
    fn test_config_provider_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TestConfig>();
    }
}
