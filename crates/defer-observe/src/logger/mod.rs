mod config;
mod error;
mod format;
mod log;

pub use config::{ENV_LOG_FILTER, ENV_LOG_FORMAT, LoggerConfig};
pub use error::LoggerError;
pub use format::LoggerFormat;

/// Install the global `tracing` subscriber described by `cfg`.
pub fn logger_init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    log::install(cfg)
}
