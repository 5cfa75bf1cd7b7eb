use thiserror::Error;

/// Errors raised while fetching or persisting account data.
///
/// Parse misses on individual fields are not errors: they degrade to
/// [`Balance::NotNumeric`](crate::Balance::NotNumeric), a zero amount or
/// [`TransactionDate::Invalid`](crate::TransactionDate::Invalid).
#[derive(Error, Debug)]
pub enum FinanceError {
    /// Transport failure talking to the account service
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status without an `error` payload to explain it
    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    /// The service answered with an `error` field
    #[error("Account service error: {0}")]
    Upstream(String),

    /// The service reported that its upstream login session expired
    #[error("Session expired: {0}")]
    SessionExpired(String),

    /// A success envelope that is missing the expected array
    #[error("Response is missing the `{0}` field")]
    MissingPayload(&'static str),

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    /// Stored weekly budget is not a non-negative decimal
    #[error("Invalid weekly budget: {0}")]
    InvalidBudget(String),
}

impl FinanceError {
    /// Text to show to the user for this failure.
    ///
    /// Messages coming from the service are passed through verbatim; local
    /// transport problems collapse into one generic retry message.
    pub fn user_message(&self) -> String {
        match self {
            FinanceError::Upstream(msg) | FinanceError::SessionExpired(msg) => msg.clone(),
            FinanceError::Http(_) | FinanceError::Status(_) => {
                "Unable to reach the account service. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Whether a manual retry can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FinanceError::Http(_) | FinanceError::Status(_) | FinanceError::Upstream(_)
        )
    }
}

/// Convenient alias for results using [`FinanceError`]
pub type FinanceResult<T> = Result<T, FinanceError>;
