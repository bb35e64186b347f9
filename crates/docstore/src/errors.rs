use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn invalid(what: &str) -> Self {
        Self::InvalidArgument(format!("missing {} name", what))
    }

    pub fn not_found(what: &str, name: &str) -> Self {
        Self::NotFound(format!("{} '{}' does not exist", what, name))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
