//! Location resolution.
//!
//! Turns free text like `" new   york , NY ,us"` into a normalized query and
//! resolves it to coordinates through the geocoding endpoint. Successful
//! lookups are cached in memory since city coordinates don't move.

use parking_lot::Mutex;
use std::collections::HashMap;

use crate::client::{ApiClient, Endpoint};
use crate::error::{Result, SearchError};
use crate::models::{Coordinates, GeocodeMatch};

/// A location string split into its comma-separated parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    pub primary: String,
    pub region: Option<String>,
    pub country_code: Option<String>,
}

impl LocationQuery {
    /// Returns `None` when the text holds no usable segment.
    pub fn parse(text: &str) -> Option<Self> {
        let mut segments = text
            .split(',')
            .map(collapse_whitespace)
            .filter(|segment| !segment.is_empty());

        let primary = segments.next()?;
        let region = segments.next();
        let country_code = segments.next();

        Some(Self {
            primary,
            region,
            country_code,
        })
    }

    /// Value for the geocoding `q` parameter
    pub fn to_query_string(&self) -> String {
        let mut parts = vec![self.primary.as_str()];
        parts.extend(self.region.as_deref());
        parts.extend(self.country_code.as_deref());
        parts.join(",")
    }

    /// Human-readable form, e.g. `"Springfield, IL, US"`
    pub fn display_name(&self) -> String {
        self.to_query_string().replace(',', ", ")
    }

    fn cache_key(&self) -> String {
        self.to_query_string().to_lowercase()
    }
}

fn collapse_whitespace(segment: &str) -> String {
    segment.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub struct CoordinateResolver {
    api: ApiClient,
    cache: Mutex<HashMap<String, Coordinates>>,
}

impl CoordinateResolver {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a location name to the coordinates of its best geocoding match
    #[tracing::instrument(name = "resolve", skip(self))]
    pub async fn resolve(&self, location_text: &str) -> Result<Coordinates> {
        let query = LocationQuery::parse(location_text).ok_or(SearchError::EmptyQuery)?;
        let key = query.cache_key();

        if let Some(coords) = self.cache.lock().get(&key).copied() {
            tracing::debug!("Geocode cache hit for '{}'", key);
            return Ok(coords);
        }

        let config = self.api.config();
        let params = [
            ("q", query.to_query_string()),
            ("limit", "1".to_string()),
            ("appid", config.api_key.clone()),
        ];

        let matches: Vec<GeocodeMatch> = self
            .api
            .make_request(Endpoint::Geocode, &config.geocode_url, &params)
            .await?;

        // Only the best match is used; ambiguous names are not disambiguated.
        let best = matches
            .into_iter()
            .next()
            .ok_or_else(|| SearchError::NotFound(query.to_query_string()))?;

        let coords = Coordinates::new(best.lat, best.lon);
        if !coords.is_valid() {
            return Err(SearchError::MalformedResponse(format!(
                "geocoding returned out-of-range coordinates ({}, {})",
                best.lat, best.lon
            )));
        }

        tracing::debug!(
            "Found location: {} [{}, {}] ({:.4}, {:.4})",
            best.name.as_deref().unwrap_or(&query.primary),
            best.state.as_deref().unwrap_or("-"),
            best.country.as_deref().unwrap_or("-"),
            coords.lat,
            coords.lon
        );

        self.cache.lock().insert(key, coords);
        Ok(coords)
    }
}
