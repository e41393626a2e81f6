use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrinterError {
    /// Opening a socket failed (refused, unreachable or timed out).
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    /// The write and its recovery attempt both failed.
    #[error("Write failed: {0}")]
    WriteFailed(String),
    #[error("Printer with tag {0} already exists")]
    DuplicateTag(String),
    #[error("Printer with tag {0} not found")]
    UnknownTag(String),
    #[error("Not connected")]
    NotConnected,
}

impl PrinterError {
    /// Whether the same request may succeed later without operator action.
    ///
    /// Transport failures are; registry misuse (`DuplicateTag`, `UnknownTag`)
    /// fails the same way every time.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::WriteFailed(_) | Self::NotConnected
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_failures_are_retryable() {
        assert!(PrinterError::ConnectionFailed("refused".into()).is_retryable());
        assert!(PrinterError::WriteFailed("broken pipe".into()).is_retryable());
        assert!(PrinterError::NotConnected.is_retryable());
    }

    #[test]
    fn test_registry_misuse_is_not_retryable() {
        assert!(!PrinterError::UnknownTag("P9".into()).is_retryable());
        assert!(!PrinterError::DuplicateTag("P1".into()).is_retryable());
    }
}
