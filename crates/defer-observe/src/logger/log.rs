use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, fmt::time::OffsetTime, layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::logger::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

type Output = Box<dyn Layer<Registry> + Send + Sync>;

/// Install one output layer, chosen by `cfg.format`, behind the level filter.
pub(crate) fn install(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let filter = directives(&cfg.level)?;
    let output = match cfg.format {
        LoggerFormat::Text => text_output(cfg),
        LoggerFormat::Json => json_output(cfg),
        LoggerFormat::Journald => journald_output()?,
    };

    tracing_subscriber::registry()
        .with(output.with_filter(filter))
        .try_init()
        .map_err(|e| classify(e.to_string()))
}

fn directives(level: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::try_new(level).map_err(|_| LoggerError::InvalidFilter(level.to_string()))
}

/// Local RFC 3339 timestamps; UTC when the local offset can't be determined.
fn local_timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

fn text_output(cfg: &LoggerConfig) -> Output {
    fmt::layer()
        .with_ansi(cfg.use_color)
        .with_target(cfg.with_targets)
        .with_timer(local_timer())
        .boxed()
}

fn json_output(cfg: &LoggerConfig) -> Output {
    fmt::layer()
        .json()
        .with_current_span(true)
        .with_target(cfg.with_targets)
        .with_timer(local_timer())
        .boxed()
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn journald_output() -> Result<Output, LoggerError> {
    let layer = tracing_journald::layer()
        .map_err(|e| LoggerError::InitializationFailed(format!("journald: {e}")))?
        .with_syslog_identifier("defer".to_string());
    Ok(layer.boxed())
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn journald_output() -> Result<Output, LoggerError> {
    Err(LoggerError::JournaldNotSupported)
}

fn classify(reason: String) -> LoggerError {
    if reason.contains("SetGlobalDefaultError") || reason.contains("global default trace dispatcher")
    {
        LoggerError::AlreadyInitialized
    } else {
        LoggerError::InitializationFailed(reason)
    }
}
