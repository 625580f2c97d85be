//! Actor responsible for a session cancellation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who initiated a cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelledBy {
    Student,
    Mentor,
    /// Auto-decline sweep or operator action.
    System,
}

impl fmt::Display for CancelledBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CancelledBy::Student => "student",
            CancelledBy::Mentor => "mentor",
            CancelledBy::System => "system",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_snake_case() {
        assert_eq!(
            serde_json::to_string(&CancelledBy::System).unwrap(),
            "\"system\""
        );
    }

    #[test]
    fn deserializes_from_snake_case() {
        let by: CancelledBy = serde_json::from_str("\"mentor\"").unwrap();
        assert_eq!(by, CancelledBy::Mentor);
    }
}
