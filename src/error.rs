use thiserror::Error;

pub type Result<T> = core::result::Result<T, HaggleError>;

#[derive(Error, Debug)]
pub enum HaggleError {
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Listing not found: {0}")]
    ListingNotFound(String),

    #[error("Purchase not found: {0}")]
    PurchaseNotFound(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Invalid message record: {0}")]
    InvalidMessage(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl From<Box<dyn std::error::Error + Send + Sync>> for HaggleError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        HaggleError::Other(anyhow::anyhow!(err.to_string()))
    }
}
