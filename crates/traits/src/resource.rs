//! ResourceProvider trait for abstracting asset retrieval.
//!
//! Fonts, background images and tabular data all reach the engine through this
//! trait, so the engine never touches the filesystem or the network directly.
//! A failure here is a fetch failure: it aborts the operation that asked for
//! the resource and nothing else.

use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;

/// Error type for resource retrieval.
#[derive(Error, Debug, Clone)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Network request for '{url}' failed: {message}")]
    Network { url: String, message: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io(err.to_string())
    }
}

/// Shared resource data type (reference-counted bytes).
pub type SharedResourceData = Arc<Vec<u8>>;

/// A source of named byte blobs.
///
/// # Implementations
///
/// - `FilesystemResourceProvider`: local files relative to a base directory
/// - `HttpResourceProvider`: absolute `http(s)` URLs (feature `remote`)
/// - `InMemoryResourceProvider`: pre-populated memory, used by tests
pub trait ResourceProvider: Send + Sync + Debug {
    /// Load a resource by its path or URL.
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError>;

    /// Check if a resource exists.
    fn exists(&self, path: &str) -> bool;

    /// Returns a human-readable name for this provider (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// An in-memory resource provider.
#[derive(Debug, Default)]
pub struct InMemoryResourceProvider {
    resources: std::sync::RwLock<std::collections::HashMap<String, SharedResourceData>>,
}

impl InMemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource to the in-memory store.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, path: impl Into<String>, data: Vec<u8>) -> Result<(), ResourceError> {
        let path_string = path.into();
        let mut resources = self
            .resources
            .write()
            .map_err(|_| ResourceError::LoadFailed {
                path: path_string.clone(),
                message: "resource store lock poisoned".to_string(),
            })?;
        resources.insert(path_string, Arc::new(data));
        Ok(())
    }

    /// Remove a resource from the store.
    ///
    /// Returns `None` if the lock is poisoned or the resource doesn't exist.
    pub fn remove(&self, path: &str) -> Option<SharedResourceData> {
        self.resources.write().ok()?.remove(path)
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.resources.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceProvider for InMemoryResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        let resources = self
            .resources
            .read()
            .map_err(|_| ResourceError::LoadFailed {
                path: path.to_string(),
                message: "resource store lock poisoned".to_string(),
            })?;
        resources
            .get(path)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        self.resources
            .read()
            .map(|r| r.contains_key(path))
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "InMemoryResourceProvider"
    }
}
