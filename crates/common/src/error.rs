//! Unified error type for the wait-time board.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("ThemeParks API error (status={status}): {message}")]
    ThemeParksApi { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unknown park: {0}")]
    UnknownPark(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for failures that came from talking to the API, as opposed to
    /// local configuration or lookup problems.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::ThemeParksApi { .. } | Error::Json(_)
        )
    }
}
