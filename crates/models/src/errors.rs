use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },
}
