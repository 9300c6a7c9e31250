use std::io;

use thiserror::Error;

use crate::model::category::Category;

/// Failures talking to the recipe API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status}: request quota exhausted")]
    QuotaExceeded { status: u16 },
    #[error("HTTP 401: unauthorized")]
    Unauthorized,
    #[error("network failure: {0}")]
    Network(String),
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("no recipes returned")]
    EmptyResult,
    #[error("invalid response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Quota and auth failures mean the source will not answer until reset.
    pub fn is_access_denied(&self) -> bool {
        matches!(self, FetchError::QuotaExceeded { .. } | FetchError::Unauthorized)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to serialize '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a number, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must be true/false, got '{value}'")]
    InvalidBool { var: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("category '{0}' has no feed")]
    NoFeed(Category),
    #[error("recipe '{0}' is not displayed")]
    UnknownRecipe(String),
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("unknown panel '{0}'")]
    UnknownPanel(String),
}
