use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("invalid logger format `{0}` (expected: text|json|journald)")]
    InvalidFormat(String),
    #[error("journald output requires linux and the `journald` feature")]
    JournaldNotSupported,
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
    #[error("failed to initialize logger: {0}")]
    InitializationFailed(String),
    #[error("invalid log filter `{0}`")]
    InvalidFilter(String),
}
