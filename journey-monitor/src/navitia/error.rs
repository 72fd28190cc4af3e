//! Navitia client error types.

use std::fmt;

/// Errors from the Navitia HTTP client.
#[derive(Debug)]
pub enum NavitiaError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    Api { status: u16, message: String },

    /// Rate limited by the API; transient, safe to retry on the next cycle
    RateLimited,

    /// Invalid or expired API key; retrying cannot fix this
    Unauthorized,
}

impl fmt::Display for NavitiaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavitiaError::Http(e) => write!(f, "HTTP error: {e}"),
            NavitiaError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            NavitiaError::Api { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            NavitiaError::RateLimited => write!(f, "rate limited by Navitia API"),
            NavitiaError::Unauthorized => write!(f, "unauthorized (invalid API key)"),
        }
    }
}

impl std::error::Error for NavitiaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NavitiaError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for NavitiaError {
    fn from(err: reqwest::Error) -> Self {
        NavitiaError::Http(err)
    }
}
