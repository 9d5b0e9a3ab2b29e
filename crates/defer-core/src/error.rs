use thiserror::Error;

/// Failure reason carried by a rejected deferred result.
///
/// There is exactly one error kind; the message says what failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct OperationError {
    message: String,
}

impl OperationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Rejection used when every resolver was dropped before settling.
    pub fn abandoned() -> Self {
        Self::new("deferred result abandoned before settlement")
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for OperationError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for OperationError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}
