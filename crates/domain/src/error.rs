use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid printer tag: {0}")]
    InvalidPrinterTag(String),

    #[error("Invalid print request: {0}")]
    InvalidRequest(String),

    #[error("Request source error: {0}")]
    SourceError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
