use thiserror::Error;

/// Failure of a single call against the contact API.
#[derive(Debug, Error)]
pub enum ApiCallError {
    /// The server answered with a non-2xx status.
    #[error("server rejected request with status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    /// No usable response: connection, DNS, timeout, or body read failure.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiCallError {
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiCallError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiCallError::Transport(_))
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("base url '{0}' must be an http or https address")]
    UnsupportedBaseUrl(String),
    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
