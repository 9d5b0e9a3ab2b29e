use std::time::Duration;

use defer_core::{Deferred, OperationError, Outcome, deferred};
use tokio::runtime::Handle;
use tracing::trace;

/// Fulfils with `value` once `delay` has elapsed.
pub fn delayed_value<T>(delay: Duration, value: T) -> Deferred<T>
where
    T: Send + Sync + 'static,
{
    after(delay, Ok(value))
}

/// Rejects with `error` once `delay` has elapsed.
pub fn delayed_failure<T>(delay: Duration, error: impl Into<OperationError>) -> Deferred<T>
where
    T: Send + Sync + 'static,
{
    after(delay, Err(error.into()))
}

fn after<T>(delay: Duration, outcome: Outcome<T>) -> Deferred<T>
where
    T: Send + Sync + 'static,
{
    let (resolver, settled) = deferred();

    let handle = match Handle::try_current() {
        Ok(handle) => handle,
        Err(e) => {
            resolver.reject(format!("no timer runtime available: {e}"));
            return settled;
        }
    };

    trace!(target: "defer.exec.timer", delay_ms = delay.as_millis() as u64, "timer armed");
    handle.spawn(async move {
        tokio::time::sleep(delay).await;
        resolver.settle(outcome);
    });
    settled
}
