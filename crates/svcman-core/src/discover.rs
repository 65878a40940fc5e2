//! Filesystem discovery of candidate command manifests.
//!
//! Each configured root is scanned with the fixed relative pattern
//! `*/scripts/commands.toml`: one wildcard level for the service directory,
//! then a fixed subpath. The scan is lazy and enumeration order follows the
//! platform's directory order, which callers must not depend on.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{Error, Result};

/// Fixed subpath, under a service directory, where a manifest lives.
pub const MANIFEST_SUBPATH: &str = "scripts/commands.toml";

/// A matched manifest location, not yet confirmed to contain a valid group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Path to the matched manifest file.
    pub path: PathBuf,
}

impl Candidate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Fallback registration name: the directory two levels above the
    /// matched file (`services/billing/scripts/commands.toml` → `billing`).
    pub fn service_name(&self) -> Option<String> {
        self.path
            .ancestors()
            .nth(2)
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
            .map(str::to_string)
    }
}

/// Discover candidate manifests under the given roots.
///
/// Produces a lazy, finite, non-restartable iterator. A root that does not
/// exist simply yields nothing. No side effects beyond reading directory
/// entries.
pub fn discover(roots: &[PathBuf]) -> Result<impl Iterator<Item = Candidate> + use<>> {
    let mut walkers = Vec::with_capacity(roots.len());
    for root in roots {
        let pattern = format!("{}/*/{}", root.display(), MANIFEST_SUBPATH);
        debug!(pattern = %pattern, "scanning for command manifests");
        let paths = glob::glob(&pattern)
            .map_err(|e| Error::config(format!("bad discovery pattern '{pattern}': {e}")))?;
        walkers.push(paths);
    }

    Ok(walkers.into_iter().flatten().filter_map(|entry| match entry {
        Ok(path) => Some(Candidate::new(path)),
        Err(err) => {
            debug!(error = %err, "skipping unreadable directory entry");
            None
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn add_service(root: &Path, service: &str) -> PathBuf {
        let dir = root.join(service).join("scripts");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("commands.toml");
        std::fs::write(&path, "[group]\n[[group.command]]\nname = \"ping\"\nexec = [\"true\"]\n")
            .unwrap();
        path
    }

    #[test]
    fn test_discover_empty_root() {
        let temp = TempDir::new().unwrap();
        let found: Vec<_> = discover(&[temp.path().to_path_buf()]).unwrap().collect();
        assert!(found.is_empty());
    }

    #[test]
    fn test_discover_missing_root() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        let found: Vec<_> = discover(&[missing]).unwrap().collect();
        assert!(found.is_empty());
    }

    #[test]
    fn test_discover_finds_manifests() {
        let temp = TempDir::new().unwrap();
        let alpha = add_service(temp.path(), "alpha");
        let beta = add_service(temp.path(), "beta");

        let mut found: Vec<_> = discover(&[temp.path().to_path_buf()])
            .unwrap()
            .map(|c| c.path)
            .collect();
        found.sort();
        assert_eq!(found, vec![alpha, beta]);
    }

    #[test]
    fn test_discover_ignores_other_layouts() {
        let temp = TempDir::new().unwrap();
        // Wrong filename
        let dir = temp.path().join("alpha").join("scripts");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("other.toml"), "").unwrap();
        // Too deep
        let deep = temp.path().join("beta").join("nested").join("scripts");
        std::fs::create_dir_all(&deep).unwrap();
        std::fs::write(deep.join("commands.toml"), "").unwrap();
        // Manifest directly under the root
        std::fs::create_dir_all(temp.path().join("scripts")).unwrap();
        std::fs::write(temp.path().join("scripts").join("commands.toml"), "").unwrap();

        let found: Vec<_> = discover(&[temp.path().to_path_buf()]).unwrap().collect();
        assert!(found.is_empty(), "unexpected candidates: {found:?}");
    }

    #[test]
    fn test_discover_multiple_roots() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        add_service(first.path(), "alpha");
        add_service(second.path(), "beta");

        let found: Vec<_> = discover(&[first.path().to_path_buf(), second.path().to_path_buf()])
            .unwrap()
            .collect();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_candidate_service_name() {
        let candidate = Candidate::new("/project/services/billing/scripts/commands.toml");
        assert_eq!(candidate.service_name().as_deref(), Some("billing"));
    }

    #[test]
    fn test_candidate_service_name_shallow_path() {
        let candidate = Candidate::new("commands.toml");
        assert!(candidate.service_name().is_none());
    }
}
