use std::{fmt, str::FromStr};

use crate::logger::error::LoggerError;

/// Output format of the global subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoggerFormat {
    #[default]
    Text,
    Json,
    Journald,
}

impl LoggerFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoggerFormat::Text => "text",
            LoggerFormat::Json => "json",
            LoggerFormat::Journald => "journald",
        }
    }
}

impl fmt::Display for LoggerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoggerFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase();
        match norm.as_str() {
            "text" | "plain" => Ok(LoggerFormat::Text),
            "json" => Ok(LoggerFormat::Json),
            "journald" | "journal" => {
                #[cfg(all(target_os = "linux", feature = "journald"))]
                {
                    Ok(LoggerFormat::Journald)
                }

                #[cfg(not(all(target_os = "linux", feature = "journald")))]
                {
                    Err(LoggerError::JournaldNotSupported)
                }
            }
            _ => Err(LoggerError::InvalidFormat(s.to_string())),
        }
    }
}
