use crate::client::{ApiClient, Endpoint};
use crate::error::{Result, SearchError};
use crate::models::{ApiConditions, Coordinates, CurrentConditions, ForecastResponse, ForecastSample};

/// Retrieves current conditions and the 5 day / 3 hour forecast for resolved coordinates
pub struct WeatherFetcher {
    api: ApiClient,
}

impl WeatherFetcher {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn params(&self, coords: Option<Coordinates>) -> Result<[(&'static str, String); 4]> {
        let coords = coords
            .filter(Coordinates::is_valid)
            .ok_or(SearchError::InvalidCoordinates)?;
        let config = self.api.config();

        Ok([
            ("lat", coords.lat.to_string()),
            ("lon", coords.lon.to_string()),
            ("APPID", config.api_key.clone()),
            ("units", config.units.as_query().to_string()),
        ])
    }

    #[tracing::instrument(name = "fetch_current", skip(self))]
    pub async fn fetch_current(&self, coords: Option<Coordinates>) -> Result<CurrentConditions> {
        let params = self.params(coords)?;

        let raw: ApiConditions = self
            .api
            .make_request(Endpoint::Current, &self.api.config().weather_url, &params)
            .await?;

        raw.into_conditions(0)
    }

    /// Samples come back sorted by observation time.
    #[tracing::instrument(name = "fetch_forecast", skip(self))]
    pub async fn fetch_forecast(&self, coords: Option<Coordinates>) -> Result<Vec<ForecastSample>> {
        let params = self.params(coords)?;

        let raw: ForecastResponse = self
            .api
            .make_request(Endpoint::Forecast, &self.api.config().forecast_url, &params)
            .await?;

        if raw.list.is_empty() {
            return Err(SearchError::MalformedResponse("forecast list is empty".into()));
        }

        let offset = raw.city.as_ref().and_then(|city| city.timezone).unwrap_or(0);
        let mut samples = raw
            .list
            .into_iter()
            .map(|item| item.into_conditions(offset))
            .collect::<Result<Vec<_>>>()?;
        samples.sort_by_key(|sample| sample.observed_at_ms);

        tracing::debug!("Received {} forecast samples", samples.len());
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeatherConfig;
    use std::sync::Arc;

    fn fetcher() -> WeatherFetcher {
        // Nothing listens here; coordinate checks must fail before any request
        let mut config = WeatherConfig::new("test-key");
        config.weather_url = "http://127.0.0.1:9/data/2.5/weather".into();
        config.forecast_url = "http://127.0.0.1:9/data/2.5/forecast".into();
        WeatherFetcher::new(ApiClient::new(Arc::new(config)).unwrap())
    }

    #[tokio::test]
    async fn test_missing_coordinates_rejected() {
        let fetcher = fetcher();

        assert_eq!(
            fetcher.fetch_current(None).await,
            Err(SearchError::InvalidCoordinates)
        );
        assert_eq!(
            fetcher.fetch_forecast(None).await,
            Err(SearchError::InvalidCoordinates)
        );
    }

    #[tokio::test]
    async fn test_out_of_range_coordinates_rejected() {
        let fetcher = fetcher();
        let north_of_pole = Coordinates::new(91.0, 0.0);
        let past_dateline = Coordinates::new(0.0, 180.5);

        assert_eq!(
            fetcher.fetch_current(Some(north_of_pole)).await,
            Err(SearchError::InvalidCoordinates)
        );
        assert_eq!(
            fetcher.fetch_forecast(Some(past_dateline)).await,
            Err(SearchError::InvalidCoordinates)
        );
    }

    #[test]
    fn test_query_params() {
        let params = fetcher().params(Some(Coordinates::new(35.68, 139.69))).unwrap();
        assert_eq!(params[0], ("lat", "35.68".to_string()));
        assert_eq!(params[1], ("lon", "139.69".to_string()));
        assert_eq!(params[2], ("APPID", "test-key".to_string()));
        assert_eq!(params[3], ("units", "imperial".to_string()));
    }
}
