//! Error types for bookmeta

use thiserror::Error;

/// Errors surfaced by a scrape call.
///
/// "Book not found" and "record not applicable" are not errors; scrapers
/// report those as `Ok(None)`.
#[derive(Error, Debug)]
pub enum Error {
    /// The HTTP collaborator failed to send or receive.
    #[error("data provider request failed: {0}")]
    Transport(#[source] anyhow::Error),

    /// The response body is not valid JSON, even after control characters
    /// were stripped.
    #[error("data provider response is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    /// A record passed the applicability gate but is missing a field the
    /// provider contract guarantees. Never raised for optional fields.
    #[error("provider record violates contract: {0}")]
    Mapping(String),

    /// Invalid scraper configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
