use thiserror::Error;

/// Message shown for an in-band failure that carries no text of its own
pub const FALLBACK_API_MESSAGE: &str = "Movie not found!";

/// Why a catalog request failed.
///
/// The `Display` output is what ends up in the panel, so transport-level
/// failures all render as the same generic message. Details go to the logs.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Something went wrong!")]
    Http(#[from] reqwest::Error),

    #[error("Something went wrong!")]
    Status(reqwest::StatusCode),

    #[error("Something went wrong!")]
    Decode(#[from] serde_json::Error),

    /// The catalog answered but flagged the request as failed
    #[error("{0}")]
    Api(String),
}

impl SourceError {
    pub fn api(message: Option<String>) -> Self {
        match message.map(|m| m.trim().to_string()).filter(|m| !m.is_empty()) {
            Some(message) => SourceError::Api(message),
            None => SourceError::Api(FALLBACK_API_MESSAGE.to_string()),
        }
    }

    /// Transport failures, as opposed to answers from the catalog itself
    pub fn is_transport(&self) -> bool {
        matches!(self, SourceError::Http(_) | SourceError::Status(_))
    }
}
