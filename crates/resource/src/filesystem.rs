//! Filesystem-based resource provider.
//!
//! A sandboxed provider resolves every path relative to its base directory and
//! refuses paths that would escape it (e.g. `../../secret.csv`). An unrestricted
//! provider also accepts absolute paths; the CLI uses it for paths the user
//! typed on the command line.

use cardpress_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
pub struct FilesystemResourceProvider {
    base_path: PathBuf,
    /// Canonicalized base path for containment checks
    canonical_base: Option<PathBuf>,
    sandboxed: bool,
}

impl FilesystemResourceProvider {
    /// Creates a provider confined to `base_path`.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        // May fail if the directory doesn't exist yet
        let canonical = base.canonicalize().ok();
        Self {
            base_path: base,
            canonical_base: canonical,
            sandboxed: true,
        }
    }

    /// Creates a provider that resolves relative paths against `base_path` but
    /// also accepts absolute paths and parent-directory components.
    pub fn unrestricted<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            sandboxed: false,
            ..Self::new(base_path)
        }
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    pub fn is_sandboxed(&self) -> bool {
        self.sandboxed
    }

    /// Returns `None` if the path would escape the base directory.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let requested = Path::new(path);
        if !self.sandboxed {
            return Some(if requested.is_absolute() {
                requested.to_path_buf()
            } else {
                self.base_path.join(requested)
            });
        }

        if requested.is_absolute() {
            return None;
        }

        let full_path = self.base_path.join(requested);

        if let Ok(canonical) = full_path.canonicalize()
            && let Some(base) = &self.canonical_base
        {
            return canonical.starts_with(base).then_some(canonical);
        }

        // File doesn't exist (yet): fall back to a lexical check.
        if requested
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return None;
        }

        Some(full_path)
    }
}

impl ResourceProvider for FilesystemResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        let full_path = self
            .resolve(path)
            .ok_or_else(|| ResourceError::NotFound(format!("{} (outside {})", path, self.base_path.display())))?;

        log::debug!("Reading resource {}", full_path.display());
        std::fs::read(&full_path).map(Arc::new).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound(path.to_string())
            } else {
                ResourceError::LoadFailed {
                    path: path.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_some_and(|p| p.is_file())
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceProvider"
    }
}
