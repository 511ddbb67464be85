//! Bundled-asset path resolution.

use crate::error::Result;
use std::path::PathBuf;

/// Resolves logical bundled-asset names to concrete on-device paths.
///
/// Host runtimes ship audio assets under logical names; the mapping to a real
/// filesystem location (optionally qualified by a package or bundle hint) is
/// platform-specific and therefore injected.
pub trait AssetResolver: Send + Sync {
    /// Resolve a logical asset path to a filesystem path.
    ///
    /// # Errors
    ///
    /// Returns an error if no asset exists under the given name (and package,
    /// when provided).
    fn resolve(&self, logical_path: &str, package: Option<&str>) -> Result<PathBuf>;
}
