use super::currency::CurrencyCode;

/// Failures of a single conversion service call. None of these are retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error("Error connecting to the currency service: {0}")]
    NetworkFailure(String),

    #[error("API Error: {0}")]
    ProviderRejected(String),

    #[error("The target currency '{0}' was not found in the available rates")]
    UnknownCurrency(CurrencyCode),

    #[error("Could not parse the API response: {0}")]
    MalformedResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::NetworkFailure(format!("request timed out ({err})"))
        } else if err.is_decode() {
            ServiceError::MalformedResponse(err.to_string())
        } else {
            ServiceError::NetworkFailure(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::MalformedResponse(err.to_string())
    }
}
