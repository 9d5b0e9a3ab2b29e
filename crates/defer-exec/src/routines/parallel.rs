use defer_core::{Deferred, OperationError, all, both};
use tokio::time::Instant;
use tracing::{info, instrument};

use crate::{
    routines::{AllConfig, PairConfig, PairReport},
    timer::delayed_value,
};

/// Start both steps at once, then await them together.
///
/// Takes about `max(first.delay, second.delay)`.
#[instrument(level = "debug", skip(cfg), fields(
    first_ms = cfg.first.delay.as_millis() as u64,
    second_ms = cfg.second.delay.as_millis() as u64
))]
pub async fn parallel(cfg: &PairConfig) -> Result<PairReport, OperationError> {
    let begin = Instant::now();

    let first = delayed_value(cfg.first.delay, cfg.first.value.clone());
    let second_started_at = begin.elapsed();
    let second = delayed_value(cfg.second.delay, cfg.second.value.clone());

    let first_done = first.map(|_| Instant::now());
    let (first, second) = parallel_pair(first, second).await?;
    let first_settled_at = first_done.await?.duration_since(begin);

    let elapsed = begin.elapsed();
    info!(
        target: "defer.exec.routine",
        %first,
        %second,
        elapsed_ms = elapsed.as_millis() as u64,
        "parallel"
    );

    Ok(PairReport {
        first,
        second,
        elapsed,
        first_settled_at,
        second_started_at,
    })
}

/// Await two already-started operations; fail as soon as either fails.
pub async fn parallel_pair<A, B>(a: Deferred<A>, b: Deferred<B>) -> Result<(A, B), OperationError>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
{
    both(a, b).await
}

/// Start every step, then await all values in input order.
#[instrument(level = "debug", skip(cfg), fields(steps = cfg.steps.len()))]
pub async fn parallel_all(cfg: &AllConfig) -> Result<Vec<String>, OperationError> {
    let pending: Vec<_> = cfg
        .steps
        .iter()
        .map(|step| delayed_value(step.delay, step.value.clone()))
        .collect();

    let values = all(pending).await?;
    info!(target: "defer.exec.routine", ?values, "parallel all");
    Ok(values)
}
