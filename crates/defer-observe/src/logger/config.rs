use crate::logger::{error::LoggerError, format::LoggerFormat};

/// Environment variable holding an `EnvFilter` directive.
pub const ENV_LOG_FILTER: &str = "DEFER_LOG";
/// Environment variable holding the output format (`text|json|journald`).
pub const ENV_LOG_FORMAT: &str = "DEFER_LOG_FORMAT";

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// `EnvFilter` directive, e.g. `info` or `defer=debug,warn`.
    pub level: String,
    pub with_targets: bool,
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        let use_color = cfg!(test) || atty::is(atty::Stream::Stdout);
        Self {
            format: LoggerFormat::Text,
            level: "info".to_string(),
            with_targets: false,
            use_color,
        }
    }
}

impl LoggerConfig {
    /// Overlay `DEFER_LOG` / `DEFER_LOG_FORMAT` on top of `self`.
    pub fn with_env(self) -> Result<Self, LoggerError> {
        self.with_lookup(|key| std::env::var(key).ok())
    }

    fn with_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoggerError> {
        if let Some(level) = lookup(ENV_LOG_FILTER).filter(|v| !v.trim().is_empty()) {
            self.level = level;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            self.format = format.parse()?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_defaults() {
        let cfg = LoggerConfig::default()
            .with_lookup(|key| match key {
                ENV_LOG_FILTER => Some("debug".into()),
                ENV_LOG_FORMAT => Some("json".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(cfg.level, "debug");
        assert_eq!(cfg.format, LoggerFormat::Json);
    }

    #[test]
    fn blank_filter_keeps_default() {
        let cfg = LoggerConfig::default()
            .with_lookup(|key| (key == ENV_LOG_FILTER).then(|| "  ".to_string()))
            .unwrap();
        assert_eq!(cfg.level, "info");
    }

    #[test]
    fn bad_format_is_an_error() {
        let res = LoggerConfig::default().with_lookup(|key| (key == ENV_LOG_FORMAT).then(|| "yaml".into()));
        assert!(matches!(res, Err(LoggerError::InvalidFormat(_))));
    }
}
