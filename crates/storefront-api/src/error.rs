use thiserror::Error;

/// Shown when a failure carries no usable message.
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors returned by the catalog API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with `"success": false`.
    #[error("request rejected: {}", message.as_deref().unwrap_or(FALLBACK_MESSAGE))]
    Rejected {
        message: Option<String>,
        errors: Vec<String>,
    },

    /// Non-2xx response without a decodable envelope.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl ApiError {
    /// Single user-facing string for this failure: the first validation
    /// error, else the backend message, else [`FALLBACK_MESSAGE`].
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Rejected { message, errors } => errors
                .iter()
                .chain(message)
                .map(|m| m.trim())
                .find(|m| !m.is_empty())
                .unwrap_or(FALLBACK_MESSAGE)
                .to_owned(),
            Self::Http(e) if e.is_timeout() => "The request timed out. Please try again.".to_owned(),
            Self::Http(_) | Self::UnexpectedStatus { .. } | Self::Deserialize { .. } => {
                FALLBACK_MESSAGE.to_owned()
            }
            Self::InvalidBaseUrl { .. } => self.to_string(),
        }
    }
}
