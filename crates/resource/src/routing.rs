use cardpress_traits::{ResourceError, ResourceProvider, SharedResourceData};

/// True for `http://` and `https://` locations.
pub fn is_remote(path: &str) -> bool {
    let lower = path.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Dispatches URLs to a remote provider and plain paths to a local one.
///
/// Without a remote provider, URLs fail with `ResourceError::Network`.
#[derive(Debug)]
pub struct RoutingResourceProvider {
    local: Box<dyn ResourceProvider>,
    remote: Option<Box<dyn ResourceProvider>>,
}

impl RoutingResourceProvider {
    pub fn new(local: Box<dyn ResourceProvider>) -> Self {
        Self { local, remote: None }
    }

    pub fn with_remote(mut self, remote: Box<dyn ResourceProvider>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }
}

impl ResourceProvider for RoutingResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        if !is_remote(path) {
            return self.local.load(path);
        }
        match &self.remote {
            Some(remote) => remote.load(path),
            None => Err(ResourceError::Network {
                url: path.to_string(),
                message: "remote fetching is not enabled in this build".to_string(),
            }),
        }
    }

    fn exists(&self, path: &str) -> bool {
        if is_remote(path) {
            self.remote.as_ref().is_some_and(|r| r.exists(path))
        } else {
            self.local.exists(path)
        }
    }

    fn name(&self) -> &'static str {
        "RoutingResourceProvider"
    }
}
