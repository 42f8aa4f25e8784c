use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::config::WeatherConfig;
use crate::constants::USER_AGENT;
use crate::error::{Result, SearchError};

/// The three OpenWeatherMap calls a search makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Geocode,
    Current,
    Forecast,
}

impl Endpoint {
    /// Conditions and forecast are time-sensitive; city coordinates are not.
    pub fn bypasses_cache(&self) -> bool {
        !matches!(self, Endpoint::Geocode)
    }

    fn status_error(&self, status: StatusCode) -> SearchError {
        match self {
            Endpoint::Geocode => SearchError::NotFound(format!("geocoding returned {}", status)),
            _ if status == StatusCode::NOT_FOUND => {
                SearchError::NotFound(format!("weather service returned {}", status))
            }
            _ => SearchError::Network(format!("Request failed with status: {}", status)),
        }
    }
}

/// Thin HTTP layer shared by the resolver and the fetcher
#[derive(Clone)]
pub struct ApiClient {
    client: Arc<Client>,
    config: Arc<WeatherConfig>,
}

impl ApiClient {
    pub fn new(config: Arc<WeatherConfig>) -> anyhow::Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }

    pub fn config(&self) -> &WeatherConfig {
        &self.config
    }

    /// Makes an HTTP GET request and deserializes the JSON response
    pub async fn make_request<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let mut request = self.client.get(url).query(query);
        if endpoint.bypasses_cache() {
            request = request
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache");
        }

        tracing::debug!(?endpoint, url, "Sending request");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(?endpoint, %status, "Request rejected");
            return Err(endpoint.status_error(status));
        }

        // Decode failures surface as MalformedResponse through From<reqwest::Error>
        let data = response.json::<T>().await?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_geocode_may_be_cached() {
        assert!(!Endpoint::Geocode.bypasses_cache());
        assert!(Endpoint::Current.bypasses_cache());
        assert!(Endpoint::Forecast.bypasses_cache());
    }

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            Endpoint::Geocode.status_error(StatusCode::INTERNAL_SERVER_ERROR),
            SearchError::NotFound(_)
        ));
        assert!(matches!(
            Endpoint::Current.status_error(StatusCode::NOT_FOUND),
            SearchError::NotFound(_)
        ));
        assert!(matches!(
            Endpoint::Forecast.status_error(StatusCode::UNAUTHORIZED),
            SearchError::Network(_)
        ));
    }
}
