use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Demonstration routine that can be selected for a run.
///
/// Each variant maps to one control-flow idiom.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoutineKind {
    /// Load a single script through the callback-style API.
    LoadCallback,
    /// Load a single script through the deferred-result API.
    LoadScript,
    /// Load scripts one after another, stopping at the first failure.
    LoadChain,
    /// Await two delayed values one after another.
    Sequential,
    /// Start two delayed values at once and await both.
    Parallel,
    /// Await a list of delayed values with the `all` combinator.
    ParallelAll,
    /// Await an operation that always fails and recover locally.
    MayFail,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown routine: {0}")]
pub struct UnknownRoutine(pub String);

impl RoutineKind {
    /// Every routine, in walkthrough order.
    pub const ALL: [RoutineKind; 7] = [
        RoutineKind::LoadCallback,
        RoutineKind::LoadScript,
        RoutineKind::LoadChain,
        RoutineKind::ParallelAll,
        RoutineKind::Sequential,
        RoutineKind::Parallel,
        RoutineKind::MayFail,
    ];

    /// Returns a short symbolic identifier, used for logging and CLI selection.
    pub fn kind(&self) -> &'static str {
        match self {
            RoutineKind::LoadCallback => "load-callback",
            RoutineKind::LoadScript => "load-script",
            RoutineKind::LoadChain => "load-chain",
            RoutineKind::Sequential => "sequential",
            RoutineKind::Parallel => "parallel",
            RoutineKind::ParallelAll => "parallel-all",
            RoutineKind::MayFail => "may-fail",
        }
    }

    /// Returns `true` if the routine talks to a document.
    pub fn needs_document(&self) -> bool {
        matches!(
            self,
            RoutineKind::LoadCallback | RoutineKind::LoadScript | RoutineKind::LoadChain
        )
    }
}

impl FromStr for RoutineKind {
    type Err = UnknownRoutine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('_', "-");
        RoutineKind::ALL
            .into_iter()
            .find(|r| r.kind() == norm)
            .ok_or_else(|| UnknownRoutine(s.to_string()))
    }
}
