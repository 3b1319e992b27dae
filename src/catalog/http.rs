//! Reference data fetched from an HTTP API.

use reqwest::Url;
use tracing::{debug, info, instrument, warn};

use crate::catalog::{ProviderError, UniverseProvider, UniversesResponse, World};

/// Provider that reads `GET {base}/universes` and
/// `GET {base}/universes/{name}/worlds`.
#[derive(Debug, Clone)]
pub struct HttpUniverseProvider {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpUniverseProvider {
    /// Creates a provider for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if `base_url` is not a valid base URL.
    #[instrument]
    pub fn new(base_url: &str) -> Result<Self, ProviderError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ProviderError::new(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::new(format!(
                "URL cannot be used as a base: {}",
                base_url
            )));
        }
        info!(base_url = %base_url, "Creating HttpUniverseProvider");
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    /// Builds `{base}/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::new("Base URL has no path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    #[instrument(skip(self))]
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, ProviderError> {
        debug!(url = %url, "Fetching");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Reference data request failed");
            return Err(ProviderError::new(format!("HTTP error! status: {}", status)));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait::async_trait]
impl UniverseProvider for HttpUniverseProvider {
    #[instrument(skip(self))]
    async fn get_universes(&self) -> Result<UniversesResponse, ProviderError> {
        let url = self.endpoint(&["universes"])?;
        let response: UniversesResponse = self.get_json(url).await?;
        info!(count = response.universes().len(), "Fetched universes");
        Ok(response)
    }

    #[instrument(skip(self))]
    async fn get_worlds_by_universe(&self, universe: &str) -> Result<Vec<World>, ProviderError> {
        let url = self.endpoint(&["universes", universe, "worlds"])?;
        let worlds: Vec<World> = self.get_json(url).await?;
        info!(count = worlds.len(), "Fetched worlds");
        Ok(worlds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_universe_name() {
        let provider = HttpUniverseProvider::new("https://api.example.com/v1/").expect("valid url");
        let url = provider
            .endpoint(&["universes", "TV Show", "worlds"])
            .expect("endpoint");
        assert_eq!(url.as_str(), "https://api.example.com/v1/universes/TV%20Show/worlds");
    }

    #[test]
    fn test_worlds_endpoint_for_universe() {
        let provider = HttpUniverseProvider::new("https://api.example.com/v1/").expect("valid url");
        let url = provider
            .endpoint(&["universes", "Movie", "worlds"])
            .expect("endpoint");
        assert_eq!(url.as_str(), "https://api.example.com/v1/universes/Movie/worlds");
    }

    #[test]
    fn test_endpoint_without_trailing_slash_keeps_base_path() {
        let provider = HttpUniverseProvider::new("https://api.example.com/v1").expect("valid url");
        let url = provider
            .endpoint(&["universes", "Movie", "worlds"])
            .expect("endpoint");
        assert_eq!(url.as_str(), "https://api.example.com/v1/universes/Movie/worlds");
    }

    #[tokio::test]
    async fn test_worlds_request_to_unreachable_host_is_an_error() {
        let provider = HttpUniverseProvider::new("http://127.0.0.1:1/").expect("valid url");
        assert!(provider.get_worlds_by_universe("Movie").await.is_err());
    }

    #[test]
    fn test_rejects_invalid_base() {
        assert!(HttpUniverseProvider::new("not a url").is_err());
    }
}
