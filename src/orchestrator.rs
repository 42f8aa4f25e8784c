//! End-to-end city search.
//!
//! A search resolves the city, fetches current conditions, fetches the
//! forecast, reduces it to daily entries and records the city in the history.
//! Any failure stops the chain before history or listeners are touched.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::client::ApiClient;
use crate::config::WeatherConfig;
use crate::error::{Result, SearchError};
use crate::fetcher::WeatherFetcher;
use crate::history::{normalize_key, HistoryEntry, HistoryStore};
use crate::models::SearchOutcome;
use crate::reducer::reduce_to_daily;
use crate::resolver::{CoordinateResolver, LocationQuery};

/// Receives plain-data results for presentation.
pub trait SearchListener: Send + Sync {
    fn on_search_completed(&self, _outcome: &SearchOutcome) {}
    fn on_search_failed(&self, _location_text: &str, _error: &SearchError) {}
    fn on_history_added(&self, _entry: &HistoryEntry) {}
    fn on_history_removed(&self, _entry: &HistoryEntry) {}
    fn on_history_changed(&self, _entries: &[HistoryEntry]) {}
}

/// Listener that only writes to the log
pub struct LoggingListener;

impl SearchListener for LoggingListener {
    fn on_search_completed(&self, outcome: &SearchOutcome) {
        tracing::info!(
            "Weather for {}: {} daily entries",
            outcome.display_name,
            outcome.daily.len()
        );
    }

    fn on_search_failed(&self, location_text: &str, error: &SearchError) {
        tracing::warn!("Search for '{}' failed: {}", location_text, error);
    }

    fn on_history_added(&self, entry: &HistoryEntry) {
        tracing::info!("Saved city: {}", entry.display_name);
    }

    fn on_history_removed(&self, entry: &HistoryEntry) {
        tracing::info!("Removed city: {}", entry.display_name);
    }
}

pub struct Orchestrator {
    config: Arc<WeatherConfig>,
    resolver: CoordinateResolver,
    fetcher: WeatherFetcher,
    history: Arc<HistoryStore>,
    listener: Arc<dyn SearchListener>,
    latest_search: AtomicU64,
}

impl Orchestrator {
    pub fn new(
        config: Arc<WeatherConfig>,
        history: Arc<HistoryStore>,
        listener: Arc<dyn SearchListener>,
    ) -> anyhow::Result<Self> {
        let api = ApiClient::new(config.clone())?;

        Ok(Self {
            config,
            resolver: CoordinateResolver::new(api.clone()),
            fetcher: WeatherFetcher::new(api),
            history,
            listener,
            latest_search: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &WeatherConfig {
        &self.config
    }

    /// Runs a full search for `location_text`.
    ///
    /// If another search starts before this one finishes, this one returns
    /// [`SearchError::Superseded`] and leaves history and listeners alone.
    pub async fn search(&self, location_text: &str) -> Result<SearchOutcome> {
        let token = self.latest_search.fetch_add(1, Ordering::SeqCst) + 1;

        match self.run_search(location_text, token).await {
            Ok(outcome) => Ok(outcome),
            Err(SearchError::Superseded) => {
                tracing::debug!("Discarding stale search for '{}'", location_text);
                Err(SearchError::Superseded)
            }
            Err(e) => {
                if self.is_latest(token) {
                    self.listener.on_search_failed(location_text, &e);
                }
                Err(e)
            }
        }
    }

    fn is_latest(&self, token: u64) -> bool {
        self.latest_search.load(Ordering::SeqCst) == token
    }

    async fn run_search(&self, location_text: &str, token: u64) -> Result<SearchOutcome> {
        let query = LocationQuery::parse(location_text).ok_or(SearchError::EmptyQuery)?;
        tracing::info!("Searching weather for '{}'", query.to_query_string());

        let coords = self.resolver.resolve(location_text).await?;
        let current = self.fetcher.fetch_current(Some(coords)).await?;
        let samples = self.fetcher.fetch_forecast(Some(coords)).await?;

        // "Today" must be measured in the same offset the samples were bucketed in
        let forecast_offset = samples
            .first()
            .map_or(current.utc_offset_seconds, |sample| sample.utc_offset_seconds);
        let daily = reduce_to_daily(&samples, current.local_day_at(forecast_offset));

        if !self.is_latest(token) {
            return Err(SearchError::Superseded);
        }

        let outcome = SearchOutcome {
            display_name: query.display_name(),
            coordinates: coords,
            current,
            daily,
        };

        if self.history.add(&outcome.display_name)? {
            if let Some(entry) = HistoryEntry::new(&outcome.display_name) {
                self.listener.on_history_added(&entry);
            }
            self.listener.on_history_changed(&self.history.list());
        }

        self.listener.on_search_completed(&outcome);
        Ok(outcome)
    }

    /// Removes a city from the history, notifying the listener if it was present.
    pub fn remove_from_history(&self, display_name: &str) -> Result<bool> {
        let existing = self
            .history
            .list()
            .into_iter()
            .find(|e| e.normalized_key == normalize_key(display_name));

        let removed = self.history.remove(display_name)?;
        if removed {
            if let Some(entry) = existing {
                self.listener.on_history_removed(&entry);
            }
            self.listener.on_history_changed(&self.history.list());
        }
        Ok(removed)
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.list()
    }
}
