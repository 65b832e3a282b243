use crate::record::PersonId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    StatusError { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("No record with id {0}")]
    NotFound(PersonId),

    #[error("No match for name '{0}'")]
    UnknownName(String),

    #[error("Name '{name}' matches {count} records")]
    AmbiguousName { name: String, count: usize },
}

pub type Result<T> = std::result::Result<T, FetchError>;
