use defer_core::{Deferred, Outcome, Settlement};
use tracing::{debug, info, warn};

/// Read-only view over a settled outcome, used to pick log fields.
pub trait View {
    fn settlement(&self) -> Settlement;
    fn as_reason(&self) -> &str;
}

impl<T> View for Outcome<T> {
    #[inline]
    fn settlement(&self) -> Settlement {
        match self {
            Ok(_) => Settlement::Fulfilled,
            Err(_) => Settlement::Rejected,
        }
    }
    #[inline]
    fn as_reason(&self) -> &str {
        match self {
            Ok(_) => "",
            Err(e) => e.message(),
        }
    }
}

#[inline]
pub fn message_for(state: Settlement) -> &'static str {
    match state {
        Settlement::Pending => "deferred result still pending",
        Settlement::Fulfilled => "deferred result fulfilled",
        Settlement::Rejected => "deferred result rejected",
    }
}

/// Log one settlement under `label`.
///
/// Rejections are logged at `warn`: they are expected outcomes that the
/// caller handles, not crashes.
#[inline]
pub fn log_settlement<V: View>(label: &str, v: &V) {
    let state = v.settlement();
    let msg = message_for(state);

    match state {
        Settlement::Pending => debug!(label, "{msg}"),
        Settlement::Fulfilled => info!(label, state = state.as_str(), "{msg}"),
        Settlement::Rejected => {
            warn!(label, state = state.as_str(), reason = v.as_reason(), "{msg}")
        }
    }
}

/// Attach a continuation that logs the settlement of `deferred`.
pub fn watch<T>(label: impl Into<String>, deferred: &Deferred<T>) {
    let label = label.into();
    deferred.on_settle(move |outcome| log_settlement(&label, outcome));
}
