use serde::Deserialize;

/// Error body returned by weatherapi.com on non-success responses.
#[derive(Debug, Deserialize)]
pub struct ProviderErrorBody {
    pub error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ProviderErrorDetail {
    #[serde(default)]
    pub code: Option<i64>,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid time zone: {0}")]
    InvalidTimeZone(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Map a reqwest failure to the matching variant.
    ///
    /// Body decoding errors come from the provider sending something we
    /// cannot read; everything else is a transport problem.
    pub(crate) fn from_reqwest(provider: &str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Provider(format!("{} response could not be decoded: {}", provider, err))
        } else {
            AppError::Network(format!("{} request failed: {}", provider, err))
        }
    }
}
