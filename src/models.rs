use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

// ============================================================================
// OpenWeatherMap API Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GeocodeMatch {
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// Shape shared by the current weather body and each forecast `list` element.
#[derive(Debug, Deserialize)]
pub struct ApiConditions {
    pub dt: i64,
    #[serde(default)]
    pub weather: Vec<ApiWeather>,
    pub main: ApiMain,
    pub wind: ApiWind,
    /// Shift in seconds from UTC; only present on the current weather body
    #[serde(default)]
    pub timezone: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ApiWeather {
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiMain {
    pub temp: f64,
    pub humidity: u8,
}

#[derive(Debug, Deserialize)]
pub struct ApiWind {
    pub speed: f64,
}

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ApiConditions>,
    #[serde(default)]
    pub city: Option<ForecastCity>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastCity {
    #[serde(default)]
    pub timezone: Option<i32>,
}

impl ApiConditions {
    /// Maps the raw payload into [`Conditions`], using `utc_offset_seconds` when
    /// the payload itself carries no timezone.
    pub fn into_conditions(self, utc_offset_seconds: i32) -> Result<Conditions, SearchError> {
        let icon_code = self
            .weather
            .into_iter()
            .next()
            .map(|w| w.icon)
            .ok_or_else(|| SearchError::MalformedResponse("missing weather[0].icon".into()))?;

        if !self.main.temp.is_finite() || !self.wind.speed.is_finite() {
            return Err(SearchError::MalformedResponse(
                "non-numeric temperature or wind speed".into(),
            ));
        }

        let observed_at_ms = self
            .dt
            .checked_mul(1000)
            .ok_or_else(|| SearchError::MalformedResponse(format!("dt out of range: {}", self.dt)))?;

        Ok(Conditions {
            observed_at_ms,
            utc_offset_seconds: self.timezone.unwrap_or(utc_offset_seconds),
            icon_code,
            temperature: self.main.temp,
            wind_speed: self.wind.speed,
            humidity_percent: self.main.humidity.min(100),
        })
    }
}

// ============================================================================
// Domain Models
// ============================================================================

/// Measurement system requested from the API and used for display suffixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitMode {
    #[default]
    Imperial,
    Metric,
}

impl UnitMode {
    /// Value for the `units` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            UnitMode::Imperial => "imperial",
            UnitMode::Metric => "metric",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            UnitMode::Imperial => "\u{00b0}F",
            UnitMode::Metric => "\u{00b0}C",
        }
    }

    pub fn wind_suffix(&self) -> &'static str {
        match self {
            UnitMode::Imperial => "mph",
            UnitMode::Metric => "m/s",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Weather at one instant: either the current observation or a forecast step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    pub observed_at_ms: i64,
    pub utc_offset_seconds: i32,
    pub icon_code: String,
    pub temperature: f64,
    pub wind_speed: f64,
    pub humidity_percent: u8,
}

pub type CurrentConditions = Conditions;
pub type ForecastSample = Conditions;

/// Halves round up, so -2.5 displays as -2 and 2.5 as 3.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

impl Conditions {
    pub fn display_temperature(&self) -> i64 {
        round_half_up(self.temperature)
    }

    pub fn display_wind_speed(&self) -> i64 {
        round_half_up(self.wind_speed)
    }

    /// Observation time in the city's own UTC offset.
    pub fn local_time(&self) -> DateTime<FixedOffset> {
        self.time_at(self.utc_offset_seconds)
    }

    pub fn local_day(&self) -> NaiveDate {
        self.local_time().date_naive()
    }

    /// Calendar day of the observation as seen from `utc_offset_seconds`.
    pub fn local_day_at(&self, utc_offset_seconds: i32) -> NaiveDate {
        self.time_at(utc_offset_seconds).date_naive()
    }

    fn time_at(&self, utc_offset_seconds: i32) -> DateTime<FixedOffset> {
        let offset = FixedOffset::east_opt(utc_offset_seconds).unwrap_or(Utc.fix());
        let utc = DateTime::<Utc>::from_timestamp_millis(self.observed_at_ms).unwrap_or_default();
        utc.with_timezone(&offset)
    }

    pub fn icon_url(&self, icon_base: &str) -> String {
        format!("{}{}.png", icon_base, self.icon_code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecastEntry {
    pub day: NaiveDate,
    pub sample: ForecastSample,
}

/// Everything one successful search hands to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub display_name: String,
    pub coordinates: Coordinates,
    pub current: CurrentConditions,
    pub daily: Vec<DailyForecastEntry>,
}

// ============================================================================
// MCP Tool Request Models
// ============================================================================

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SearchWeatherRequest {
    pub location: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct RemoveCityRequest {
    pub name: String,
}
