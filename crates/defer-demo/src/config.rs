use std::time::Duration;

use defer_exec::routines::{AllConfig, FailureConfig, PairConfig, Step};
use defer_model::{Locator, RoutineKind};
use defer_observe::{LoggerConfig, LoggerError};
use thiserror::Error;

use crate::cli::Args;

/// Script that loads.
pub const LODASH: &str = "https://cdnjs.cloudflare.com/ajax/libs/lodash.js/3.2.0/lodash.js";
/// Same script with a typo in the version; never loads.
pub const LODASH_TYPO: &str = "https://cdnjs.cloudflare.com/ajax/libs/lodash.js/3.2./lodash.js";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("loading routines selected but no script given")]
    NoScripts,
    #[error("failure message must not be empty")]
    EmptyFailureMessage,
    #[error(transparent)]
    Logger(#[from] LoggerError),
}

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub routines: Vec<RoutineKind>,
    pub scripts: Vec<Locator>,
    pub offline: bool,
    pub pair: PairConfig,
    pub all: AllConfig,
    pub failure: FailureConfig,
    pub logger: LoggerConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            routines: RoutineKind::ALL.to_vec(),
            scripts: vec![Locator::from(LODASH), Locator::from(LODASH_TYPO)],
            offline: false,
            pair: PairConfig::default(),
            all: AllConfig::default(),
            failure: FailureConfig::default(),
            logger: LoggerConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Defaults, overridden by the environment, then by command-line arguments.
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        if !args.routines.is_empty() {
            cfg.routines = args.routines;
        }
        if !args.scripts.is_empty() {
            cfg.scripts = args.scripts.into_iter().map(Locator::from).collect();
        }
        cfg.offline = args.offline;

        cfg.pair = PairConfig {
            first: Step::new(args.step_ms, "first"),
            second: Step::new(args.step_ms, "second"),
        };
        cfg.failure = FailureConfig {
            delay: Duration::from_millis(args.fail_ms),
            message: args.fail_message,
        };

        cfg.logger = cfg.logger.with_env()?;
        if let Some(level) = args.log_level {
            cfg.logger.level = level;
        }
        if let Some(format) = args.log_format {
            cfg.logger.format = format.parse()?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scripts.is_empty() && self.routines.iter().any(RoutineKind::needs_document) {
            return Err(ConfigError::NoScripts);
        }
        if self.failure.message.trim().is_empty() {
            return Err(ConfigError::EmptyFailureMessage);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use defer_observe::LoggerFormat;

    fn parse(argv: &[&str]) -> Result<DemoConfig, ConfigError> {
        let mut full = vec!["defer-demo"];
        full.extend_from_slice(argv);
        DemoConfig::from_args(Args::try_parse_from(full).unwrap())
    }

    #[test]
    fn defaults_run_everything_against_both_scripts() {
        let cfg = parse(&[]).unwrap();
        assert_eq!(cfg.routines, RoutineKind::ALL.to_vec());
        assert_eq!(cfg.scripts, vec![Locator::from(LODASH), Locator::from(LODASH_TYPO)]);
        assert_eq!(cfg.failure, FailureConfig::default());
        assert_eq!(cfg.pair, PairConfig::default());
    }

    #[test]
    fn args_override_timings() {
        let cfg = parse(&["--step-ms", "10", "--fail-ms", "5", "--fail-message", "Провал"]).unwrap();
        assert_eq!(cfg.pair.first.delay, Duration::from_millis(10));
        assert_eq!(cfg.pair.second.delay, Duration::from_millis(10));
        assert_eq!(cfg.failure.delay, Duration::from_millis(5));
        assert_eq!(cfg.failure.message, "Провал");
    }

    #[test]
    fn log_format_is_parsed() {
        let cfg = parse(&["--log-format", "json"]).unwrap();
        assert_eq!(cfg.logger.format, LoggerFormat::Json);

        assert!(matches!(
            parse(&["--log-format", "xml"]),
            Err(ConfigError::Logger(LoggerError::InvalidFormat(_)))
        ));
    }

    #[test]
    fn blank_failure_message_is_rejected() {
        assert!(matches!(
            parse(&["--fail-message", " "]),
            Err(ConfigError::EmptyFailureMessage)
        ));
    }

    #[test]
    fn timer_routines_need_no_script() {
        let mut cfg = DemoConfig::default();
        cfg.scripts.clear();
        cfg.routines = vec![RoutineKind::Parallel];
        assert!(cfg.validate().is_ok());

        cfg.routines.push(RoutineKind::LoadChain);
        assert!(matches!(cfg.validate(), Err(ConfigError::NoScripts)));
    }
}
