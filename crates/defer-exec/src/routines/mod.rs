//! Sequential, parallel and failing compositions of timed operations.

use std::time::Duration;

use defer_model::DelayMs;

mod may_fail;
pub use may_fail::{FailureReport, may_fail};

mod parallel;
pub use parallel::{parallel, parallel_all, parallel_pair};

mod sequential;
pub use sequential::sequential;

/// One timed operation: resolve `value` after `delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub delay: Duration,
    pub value: String,
}

impl Step {
    pub fn new(delay_ms: DelayMs, value: impl Into<String>) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            value: value.into(),
        }
    }
}

/// Two steps run by [`sequential`] or [`parallel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairConfig {
    pub first: Step,
    pub second: Step,
}

impl Default for PairConfig {
    fn default() -> Self {
        Self {
            first: Step::new(1000, "first"),
            second: Step::new(1000, "second"),
        }
    }
}

/// Steps awaited together by [`parallel_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllConfig {
    pub steps: Vec<Step>,
}

impl Default for AllConfig {
    fn default() -> Self {
        Self {
            steps: vec![Step::new(500, "A"), Step::new(300, "B")],
        }
    }
}

/// Operation awaited by [`may_fail`]; it always rejects with `message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureConfig {
    pub delay: Duration,
    pub message: String,
}

impl Default for FailureConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(200),
            message: "Failure".to_string(),
        }
    }
}

/// What a two-step runner observed.
///
/// Offsets are measured from the moment the runner started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairReport {
    pub first: String,
    pub second: String,
    pub elapsed: Duration,
    /// When the first step settled.
    pub first_settled_at: Duration,
    /// When the second step was initiated.
    pub second_started_at: Duration,
}
