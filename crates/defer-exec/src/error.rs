use defer_model::Locator;
use thiserror::Error;

/// Why a document reported a load error.
///
/// Only used for diagnostics: at the deferred-result boundary every variant
/// becomes the same "failed to load script" rejection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoaderError {
    #[error("no route for {0}")]
    NotFound(Locator),
    #[error("unexpected status {status} for {src}")]
    Status { src: Locator, status: u16 },
    #[error("request failed: {0}")]
    Request(String),
    #[error("no async runtime to drive the load: {0}")]
    NoRuntime(String),
    #[error("document refused the resource")]
    Refused,
}
