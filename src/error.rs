use thiserror::Error;

/// Errors that abort a billing notification run.
///
/// Every variant is terminal: nothing is retried and no partial
/// notification is published.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Failed to load settings: {0}")]
    Settings(#[from] config::ConfigError),
    #[error("Cost Explorer query failed: {0}")]
    Query(String),
    #[error("Invalid Cost Explorer response: {0}")]
    InvalidResponse(String),
    #[error("Insufficient billing data: {query} returned {buckets} bucket(s), need at least {required}")]
    InsufficientData {
        query: &'static str,
        buckets: usize,
        required: usize,
    },
    #[error("Failed to publish notification: {0}")]
    Delivery(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
