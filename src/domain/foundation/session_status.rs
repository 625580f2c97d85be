//! SessionStatus enum for tracking the lifecycle of mentoring sessions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a mentoring session.
///
/// Sessions move forward only:
/// `PendingMentorAcceptance -> Confirmed -> InProgress -> Completed`,
/// with `Cancelled` reachable from either pre-completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    PendingMentorAcceptance,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl SessionStatus {
    /// Validates a transition from this status to another.
    pub fn can_transition_to(&self, target: &SessionStatus) -> bool {
        use SessionStatus::*;
        matches!(
            (self, target),
            (PendingMentorAcceptance, Confirmed)
                | (PendingMentorAcceptance, Cancelled)
                | (Confirmed, InProgress)
                | (Confirmed, Cancelled)
                | (InProgress, Completed)
        )
    }

    /// Returns true if the session may still be cancelled.
    pub fn is_cancellable(&self) -> bool {
        matches!(
            self,
            SessionStatus::PendingMentorAcceptance | SessionStatus::Confirmed
        )
    }

    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Cancelled)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::PendingMentorAcceptance => "pending_mentor_acceptance",
            SessionStatus::Confirmed => "confirmed",
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SessionStatus::*;

    #[test]
    fn default_is_pending() {
        assert_eq!(SessionStatus::default(), PendingMentorAcceptance);
    }

    #[test]
    fn forward_transitions_are_allowed() {
        assert!(PendingMentorAcceptance.can_transition_to(&Confirmed));
        assert!(Confirmed.can_transition_to(&InProgress));
        assert!(InProgress.can_transition_to(&Completed));
    }

    #[test]
    fn cancellation_reachable_before_start_only() {
        assert!(PendingMentorAcceptance.can_transition_to(&Cancelled));
        assert!(Confirmed.can_transition_to(&Cancelled));
        assert!(!InProgress.can_transition_to(&Cancelled));
        assert!(!Completed.can_transition_to(&Cancelled));
    }

    #[test]
    fn no_skipping_to_completed() {
        assert!(!PendingMentorAcceptance.can_transition_to(&Completed));
        assert!(!Confirmed.can_transition_to(&Completed));
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for target in [PendingMentorAcceptance, Confirmed, InProgress, Completed, Cancelled] {
            assert!(!Completed.can_transition_to(&target));
            assert!(!Cancelled.can_transition_to(&target));
        }
    }

    #[test]
    fn cancellable_matches_pre_start_states() {
        assert!(PendingMentorAcceptance.is_cancellable());
        assert!(Confirmed.is_cancellable());
        assert!(!InProgress.is_cancellable());
        assert!(!Cancelled.is_cancellable());
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(
            serde_json::to_string(&PendingMentorAcceptance).unwrap(),
            "\"pending_mentor_acceptance\""
        );
        assert_eq!(serde_json::to_string(&Cancelled).unwrap(), "\"cancelled\"");
    }

    #[test]
    fn deserializes_from_snake_case_json() {
        let status: SessionStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, InProgress);
    }
}
