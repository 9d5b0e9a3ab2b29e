use std::{convert::Infallible, time::Duration};

use tokio::time::Instant;
use tracing::{error, instrument};

use crate::{routines::FailureConfig, timer::delayed_failure};

/// Result of [`may_fail`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    /// Message of the rejection that was caught.
    pub caught: String,
    pub elapsed: Duration,
}

/// Await an operation that rejects after `cfg.delay` and recover locally.
///
/// The rejection never leaves this function: the message is logged and
/// returned in [`FailureReport::caught`]. No retry.
#[instrument(level = "debug", skip(cfg), fields(delay_ms = cfg.delay.as_millis() as u64))]
pub async fn may_fail(cfg: &FailureConfig) -> FailureReport {
    let begin = Instant::now();

    let Err(e) = delayed_failure::<Infallible>(cfg.delay, cfg.message.as_str()).await;
    error!(target: "defer.exec.routine", reason = e.message(), "caught error");

    FailureReport {
        caught: e.message().to_string(),
        elapsed: begin.elapsed(),
    }
}
