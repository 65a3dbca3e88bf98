//! Shared application state for request handlers.

use crate::config::AppConfig;
use crate::upstream::UpstreamClient;

/// Read-only state cloned into every handler.
///
/// Nothing here is mutated after startup, so requests never coordinate.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
}

impl AppState {
    /// Creates the shared upstream client from the configuration.
    pub fn new(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let upstream = UpstreamClient::new(config.upstream.clone())?;
        Ok(Self { upstream })
    }
}
