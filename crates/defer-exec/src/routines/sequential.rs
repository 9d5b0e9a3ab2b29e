use defer_core::OperationError;
use tokio::time::Instant;
use tracing::{info, instrument};

use crate::{
    routines::{PairConfig, PairReport},
    timer::delayed_value,
};

/// Await the first step, and only then start and await the second.
///
/// Takes about `first.delay + second.delay`.
#[instrument(level = "debug", skip(cfg), fields(
    first_ms = cfg.first.delay.as_millis() as u64,
    second_ms = cfg.second.delay.as_millis() as u64
))]
pub async fn sequential(cfg: &PairConfig) -> Result<PairReport, OperationError> {
    let begin = Instant::now();

    let first = delayed_value(cfg.first.delay, cfg.first.value.clone());
    let first_done = first.map(|_| Instant::now());
    let first = first.await?;
    let first_settled_at = first_done.await?.duration_since(begin);

    let second_started_at = begin.elapsed();
    let second = delayed_value(cfg.second.delay, cfg.second.value.clone());
    let second = second.await?;

    let elapsed = begin.elapsed();
    info!(
        target: "defer.exec.routine",
        %first,
        %second,
        elapsed_ms = elapsed.as_millis() as u64,
        "sequential"
    );

    Ok(PairReport {
        first,
        second,
        elapsed,
        first_settled_at,
        second_started_at,
    })
}
