//! Error kinds surfaced by a city search.
//!
//! The core only classifies failures; wording for end users lives in
//! [`SearchError::user_message`] so the presentation layer can pick it up.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchError {
    #[error("Location query is empty")]
    EmptyQuery,

    #[error("Location not found: {0}")]
    NotFound(String),

    #[error("Coordinates are missing or out of range")]
    InvalidCoordinates,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("History storage error: {0}")]
    Storage(String),

    /// A newer search started before this one finished.
    #[error("Search superseded by a newer request")]
    Superseded,
}

impl SearchError {
    /// Returns a message suitable for showing to the person who searched.
    pub fn user_message(&self) -> &'static str {
        match self {
            SearchError::EmptyQuery => "Please enter a city name.",
            SearchError::NotFound(_) => {
                "Couldn't find that city. Try adding a state or country code, e.g. \"Springfield, IL, US\"."
            }
            SearchError::InvalidCoordinates => "The city's location could not be determined.",
            SearchError::Network(_) => {
                "Unable to reach the weather service. Check your connection and try again."
            }
            SearchError::MalformedResponse(_) => {
                "The weather service returned unexpected data. Please try again later."
            }
            SearchError::Storage(_) => "Search history could not be saved.",
            SearchError::Superseded => "A newer search replaced this one.",
        }
    }

    /// True when the failure stems from what the caller typed rather than the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            SearchError::EmptyQuery | SearchError::NotFound(_) | SearchError::InvalidCoordinates
        )
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SearchError::MalformedResponse(err.to_string())
        } else {
            SearchError::Network(err.to_string())
        }
    }
}

impl From<anyhow::Error> for SearchError {
    fn from(err: anyhow::Error) -> Self {
        SearchError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors() {
        assert!(SearchError::EmptyQuery.is_user_error());
        assert!(SearchError::NotFound("x".into()).is_user_error());
        assert!(SearchError::InvalidCoordinates.is_user_error());
        assert!(!SearchError::Network("down".into()).is_user_error());
        assert!(!SearchError::Superseded.is_user_error());
    }

    #[test]
    fn test_not_found_message_suggests_refining() {
        let msg = SearchError::NotFound("Springfield".into()).user_message();
        assert!(msg.contains("country code"));
    }

    #[test]
    fn test_anyhow_maps_to_storage() {
        let err: SearchError = anyhow::anyhow!("disk full").into();
        assert_eq!(err, SearchError::Storage("disk full".into()));
    }
}
