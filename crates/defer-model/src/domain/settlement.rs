use serde::{Deserialize, Serialize};

/// Completion state of a deferred result.
///
/// The only transitions are `Pending -> Fulfilled` and `Pending -> Rejected`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Settlement {
    /// Operation started, no outcome yet.
    #[default]
    Pending,
    /// Operation completed with a value.
    Fulfilled,
    /// Operation completed with an error.
    Rejected,
}

impl Settlement {
    /// Returns `true` if the state won't transition further.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Settlement::Fulfilled | Settlement::Rejected)
    }

    /// Returns `true` if a transition from `self` to `next` is allowed.
    pub fn can_transition_to(&self, next: Settlement) -> bool {
        matches!(
            (self, next),
            (Settlement::Pending, Settlement::Fulfilled) | (Settlement::Pending, Settlement::Rejected)
        )
    }

    /// Short symbolic name, used as a log field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Settlement::Pending => "pending",
            Settlement::Fulfilled => "fulfilled",
            Settlement::Rejected => "rejected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_pending() {
        assert_eq!(Settlement::default(), Settlement::Pending);
    }

    #[test]
    fn terminal_states() {
        assert!(Settlement::Fulfilled.is_terminal());
        assert!(Settlement::Rejected.is_terminal());
        assert!(!Settlement::Pending.is_terminal());
    }

    #[test]
    fn only_pending_transitions() {
        assert!(Settlement::Pending.can_transition_to(Settlement::Fulfilled));
        assert!(Settlement::Pending.can_transition_to(Settlement::Rejected));

        assert!(!Settlement::Fulfilled.can_transition_to(Settlement::Rejected));
        assert!(!Settlement::Rejected.can_transition_to(Settlement::Fulfilled));
        assert!(!Settlement::Fulfilled.can_transition_to(Settlement::Pending));
        assert!(!Settlement::Pending.can_transition_to(Settlement::Pending));
    }

    #[test]
    fn serde_uses_camel_case() {
        let json = serde_json::to_string(&Settlement::Fulfilled).unwrap();
        assert_eq!(json, r#""fulfilled""#);

        let back: Settlement = serde_json::from_str(r#""rejected""#).unwrap();
        assert_eq!(back, Settlement::Rejected);
    }
}
