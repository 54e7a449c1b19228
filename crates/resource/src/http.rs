//! Blocking HTTP provider for published spreadsheets and hosted font files.
//!
//! reqwest's blocking client owns an internal runtime and panics when it is
//! built, used or dropped on a thread that is already driving tokio. Every
//! request therefore runs on its own worker thread, which also owns the client.

use cardpress_traits::{ResourceError, ResourceProvider, SharedResourceData};
use reqwest::blocking::Client;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct HttpResourceProvider {
    timeout: Duration,
}

impl HttpResourceProvider {
    pub fn new() -> Result<Self, ResourceError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ResourceError> {
        if timeout.is_zero() {
            return Err(ResourceError::Network {
                url: String::new(),
                message: "request timeout must be positive".to_string(),
            });
        }
        Ok(Self { timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs `request` with a fresh client on a thread outside any async runtime.
    fn on_worker<T, F>(&self, url: &str, request: F) -> Result<T, ResourceError>
    where
        T: Send,
        F: FnOnce(&Client) -> Result<T, ResourceError> + Send,
    {
        let timeout = self.timeout;
        let network = |message: String| ResourceError::Network {
            url: url.to_string(),
            message,
        };
        thread::scope(|scope| {
            scope
                .spawn(|| {
                    let client = Client::builder()
                        .connect_timeout(CONNECT_TIMEOUT)
                        .timeout(timeout)
                        .build()
                        .map_err(|e| network(e.to_string()))?;
                    request(&client)
                })
                .join()
                .unwrap_or_else(|_| Err(network("request thread panicked".to_string())))
        })
    }
}

impl ResourceProvider for HttpResourceProvider {
    fn load(&self, url: &str) -> Result<SharedResourceData, ResourceError> {
        log::info!("Fetching {}", url);
        let body = self.on_worker(url, |client| {
            let network = |message: String| ResourceError::Network {
                url: url.to_string(),
                message,
            };
            let response = client.get(url).send().map_err(|e| network(e.to_string()))?;
            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(ResourceError::NotFound(url.to_string()));
            }
            if !status.is_success() {
                return Err(network(format!("HTTP {}", status)));
            }
            let body = response.bytes().map_err(|e| network(e.to_string()))?;
            Ok(body.to_vec())
        })?;
        log::debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(Arc::new(body))
    }

    fn exists(&self, url: &str) -> bool {
        self.on_worker(url, |client| {
            Ok(client
                .head(url)
                .send()
                .map(|r| r.status().is_success())
                .unwrap_or(false))
        })
        .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "HttpResourceProvider"
    }
}
