//! The root registry and the scan that populates it.
//!
//! [`build_registry`] composes discovery and per-candidate registration into
//! a populated [`RootRegistry`] plus a [`ScanReport`] recording the outcome
//! of every candidate. Failures are scoped to the candidate that caused
//! them; the scan always runs to completion over the full candidate set.
//!
//! Name collisions resolve last-writer-wins: a later registration replaces
//! an earlier one under the same name, with a warning logged. Callers that
//! register builtins do so before scanning, so discovered groups shadow
//! builtins rather than the other way around.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::discover::{Candidate, discover};
use crate::group::CommandGroup;
use crate::manifest;
use crate::{Error, Result};

// ============================================================================
// Registration outcomes
// ============================================================================

/// Outcome of attempting to register one candidate.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RegistrationOutcome {
    /// The candidate exported a valid group, now registered under `name`.
    Registered { name: String, path: PathBuf },

    /// The candidate parsed but exported no command group.
    Skipped { path: PathBuf, reason: String },

    /// The candidate could not be read or parsed.
    LoadFailed { path: PathBuf, detail: String },

    /// The candidate exported a group with an unusable shape.
    Malformed { path: PathBuf, detail: String },

    /// Anything else that went wrong for this candidate.
    Failed { path: PathBuf, detail: String },
}

impl RegistrationOutcome {
    /// Whether this outcome added a group to the registry.
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered { .. })
    }

    /// The manifest path this outcome concerns.
    pub fn path(&self) -> &Path {
        match self {
            Self::Registered { path, .. }
            | Self::Skipped { path, .. }
            | Self::LoadFailed { path, .. }
            | Self::Malformed { path, .. }
            | Self::Failed { path, .. } => path,
        }
    }

    /// One-line human-readable rendering for scan reports.
    pub fn describe(&self) -> String {
        match self {
            Self::Registered { name, path } => {
                format!("registered '{}' from {}", name, path.display())
            }
            Self::Skipped { path, reason } => {
                format!("skipped {}: {}", path.display(), reason)
            }
            Self::LoadFailed { path, detail } => {
                format!("failed to load {}: {}", path.display(), detail)
            }
            Self::Malformed { path, detail } => {
                format!("malformed group in {}: {}", path.display(), detail)
            }
            Self::Failed { path, detail } => {
                format!("error for {}: {}", path.display(), detail)
            }
        }
    }
}

/// Accumulated outcomes of one full scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub outcomes: Vec<RegistrationOutcome>,
}

impl ScanReport {
    /// Number of candidates that registered a group.
    pub fn registered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_registered()).count()
    }

    /// Number of candidates that did not register a group.
    pub fn rejected(&self) -> usize {
        self.outcomes.len() - self.registered()
    }

    /// Whether the scan saw no candidates at all.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

// ============================================================================
// Root registry
// ============================================================================

/// The top-level mapping of group name to command group.
///
/// Keys are unique; registration under an existing name replaces the
/// previous group (last writer wins). Iteration order is sorted by name so
/// composed help output is deterministic regardless of discovery order.
#[derive(Default, Clone)]
pub struct RootRegistry {
    groups: BTreeMap<String, Arc<dyn CommandGroup>>,
}

impl RootRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a group under `name`, returning the group it replaced, if
    /// any. Last writer wins.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        group: Arc<dyn CommandGroup>,
    ) -> Option<Arc<dyn CommandGroup>> {
        self.groups.insert(name.into(), group)
    }

    /// Look up a group by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn CommandGroup>> {
        self.groups.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    /// Iterate over `(name, group)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn CommandGroup>)> {
        self.groups.iter().map(|(name, group)| (name.as_str(), group))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl std::fmt::Debug for RootRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootRegistry")
            .field("groups", &self.names())
            .finish()
    }
}

// ============================================================================
// Per-candidate registration
// ============================================================================

/// Load one candidate manifest and, if it exports a valid group, register it.
///
/// Every failure is converted into an outcome; nothing propagates past the
/// candidate boundary.
pub fn load_and_register(
    registry: &mut RootRegistry,
    candidate: &Candidate,
) -> RegistrationOutcome {
    let path = candidate.path.clone();
    debug!(path = %path.display(), "inspecting candidate manifest");

    let group = match manifest::load(&path) {
        Ok(Some(group)) => group,
        Ok(None) => {
            return RegistrationOutcome::Skipped {
                path,
                reason: "no command group exported".into(),
            };
        }
        Err(err @ (Error::Io(_) | Error::IoAt { .. } | Error::Manifest { .. })) => {
            return RegistrationOutcome::LoadFailed {
                path,
                detail: err.to_string(),
            };
        }
        Err(err) => {
            return RegistrationOutcome::Failed {
                path,
                detail: err.to_string(),
            };
        }
    };

    if let Err(err) = group.validate() {
        return RegistrationOutcome::Malformed {
            path,
            detail: err.to_string(),
        };
    }

    // Prefer the self-declared name, fall back to the service directory.
    let name = match group.name.clone().or_else(|| candidate.service_name()) {
        Some(name) => name,
        None => {
            return RegistrationOutcome::Failed {
                path,
                detail: "cannot derive a group name from the manifest path".into(),
            };
        }
    };

    if registry.register(name.clone(), Arc::new(group)).is_some() {
        warn!(name = %name, path = %path.display(), "replacing previously registered group");
    }

    RegistrationOutcome::Registered { name, path }
}

// ============================================================================
// Full scan
// ============================================================================

/// Discover and register every candidate under the given roots.
///
/// Candidates are processed strictly sequentially; the registry is not
/// exposed until the scan completes. An empty result is a reported state,
/// not an error; the caller decides what "nothing to run" means.
pub fn build_registry(roots: &[PathBuf]) -> Result<(RootRegistry, ScanReport)> {
    let mut registry = RootRegistry::new();
    let report = scan_into(&mut registry, roots)?;
    Ok((registry, report))
}

/// Scan the given roots into an existing registry.
///
/// Used by applications that register builtin groups first and let
/// discovered groups shadow them.
pub fn scan_into(registry: &mut RootRegistry, roots: &[PathBuf]) -> Result<ScanReport> {
    let mut report = ScanReport::default();

    for candidate in discover(roots)? {
        let outcome = load_and_register(registry, &candidate);
        if !outcome.is_registered() {
            warn!("{}", outcome.describe());
        }
        report.outcomes.push(outcome);
    }

    if report.registered() == 0 {
        warn!("no command groups discovered under {} root(s)", roots.len());
    } else {
        info!(
            registered = report.registered(),
            rejected = report.rejected(),
            "command group scan complete"
        );
    }

    Ok(report)
}
