use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request input the service refuses to store.
    #[error("validation error: {0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    /// The store could not be reached or did not answer in time.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    /// The store answered, but rejected the command (e.g. WRONGTYPE).
    #[error("store command failed: {0}")]
    StoreCommand(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn is_store_error(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::StoreCommand(_))
    }
}

impl From<redis::RedisError> for ServiceError {
    fn from(e: redis::RedisError) -> Self {
        if e.is_io_error() || e.is_timeout() || e.is_connection_dropped() || e.is_connection_refusal() {
            Self::StoreUnavailable(e.to_string())
        } else {
            Self::StoreCommand(e.to_string())
        }
    }
}
