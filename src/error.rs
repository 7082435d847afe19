use thiserror::Error;

pub type ApiResult<T> = Result<T, Error>;

/// Client-side failures: transport problems, undecodable bodies, and
/// success-shaped responses that violate the provider contract.
///
/// Errors the provider itself signals (an error body with a top-level
/// `code`) are not represented here; they normalize into
/// [`ProviderError`](crate::types::ProviderError) values and reach the
/// caller as ordinary results.
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing required field `{field}` in provider response")]
    MissingField { field: &'static str },

    #[error("malformed field `{field}` in provider response: {value:?}")]
    MalformedField { field: &'static str, value: String },

    #[error("network error: {message}")]
    Network { message: String },

    #[error("request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("failed to decode provider response: {message}")]
    Decode { message: String },

    #[error("configuration error: {message}")]
    Config { message: String },
}

impl Error {
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    pub fn malformed_field(field: &'static str, value: impl Into<String>) -> Self {
        Self::MalformedField {
            field,
            value: value.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn timeout(seconds: u64) -> Self {
        Self::Timeout { seconds }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True for the malformed-response class: the response looked like a
    /// success but broke the provider contract. Callers treat these as
    /// fatal integration errors rather than business failures.
    pub fn is_malformed_response(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. } | Self::MalformedField { .. }
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::timeout(0)
        } else {
            Error::network(format!("request error: {}", err))
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::decode(format!("JSON error: {}", err))
    }
}
