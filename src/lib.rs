//! City weather lookup served over MCP.
//!
//! Resolves a city name to coordinates, fetches current conditions and the
//! 5 day / 3 hour forecast from OpenWeatherMap, reduces the forecast to one
//! afternoon sample per day and keeps a persisted list of searched cities.

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod fetcher;
pub mod formatters;
pub mod history;
pub mod models;
pub mod orchestrator;
pub mod reducer;
pub mod resolver;
pub mod service;

pub use config::WeatherConfig;
pub use error::SearchError;
pub use history::{FileStore, HistoryEntry, HistoryStore, KeyValueStore, MemoryStore};
pub use models::{Conditions, Coordinates, DailyForecastEntry, SearchOutcome, UnitMode};
pub use orchestrator::{LoggingListener, Orchestrator, SearchListener};
pub use reducer::reduce_to_daily;
pub use service::WeatherServer;
