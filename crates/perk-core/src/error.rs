//! Error types for perk

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unknown taxonomy: {0}")]
    UnknownTaxonomy(String),

    #[error("AI backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, Error>;
