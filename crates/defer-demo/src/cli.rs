use clap::Parser;
use defer_model::RoutineKind;

/// Walk through deferred-result idioms: callback conversion, timed values,
/// sequential vs parallel composition and local error recovery.
#[derive(Debug, Parser)]
#[command(name = "defer-demo", version)]
pub struct Args {
    /// Routine to run; repeat to run several. Runs all when omitted.
    #[arg(short, long = "routine", value_name = "KIND")]
    pub routines: Vec<RoutineKind>,

    /// Script locator for the loading routines; repeat to chain several.
    #[arg(short, long = "script", value_name = "URL")]
    pub scripts: Vec<String>,

    /// Use the in-memory document instead of fetching over HTTP.
    #[arg(long, env = "DEFER_OFFLINE")]
    pub offline: bool,

    /// Delay of each step in the sequential and parallel routines.
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    pub step_ms: u64,

    /// Delay before the failing operation rejects.
    #[arg(long, value_name = "MS", default_value_t = 200)]
    pub fail_ms: u64,

    /// Message the failing operation rejects with.
    #[arg(long, value_name = "TEXT", default_value = "Failure")]
    pub fail_message: String,

    /// Log filter directive; overrides `DEFER_LOG`.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log output format (text, json or journald); overrides `DEFER_LOG_FORMAT`.
    #[arg(long)]
    pub log_format: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_repeated_routines() {
        let args = Args::try_parse_from(["defer-demo", "-r", "sequential", "--routine", "may-fail"]).unwrap();
        assert_eq!(args.routines, vec![RoutineKind::Sequential, RoutineKind::MayFail]);
        assert_eq!(args.step_ms, 1000);
        assert_eq!(args.fail_message, "Failure");
    }

    #[test]
    fn rejects_unknown_routine() {
        assert!(Args::try_parse_from(["defer-demo", "-r", "callback-hell"]).is_err());
    }
}
