//! GetBookingHandler - Query handler for a single session.

use std::sync::Arc;

use crate::domain::foundation::{SessionId, UserId};
use crate::domain::session::{BookingError, Session};
use crate::ports::SessionStore;

/// Query for one session.
///
/// `requested_by` of `None` means an internal caller (admin surface,
/// background jobs); party checks apply only to external requesters.
#[derive(Debug, Clone)]
pub struct GetBookingQuery {
    pub session_id: SessionId,
    pub requested_by: Option<UserId>,
}

/// Handler for fetching a session.
pub struct GetBookingHandler {
    store: Arc<dyn SessionStore>,
}

impl GetBookingHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetBookingQuery) -> Result<Session, BookingError> {
        let session = self
            .store
            .find_by_id(&query.session_id)
            .await?
            .ok_or(BookingError::NotFound(query.session_id))?;

        if let Some(requester) = &query.requested_by {
            if session.student_id() != requester && session.mentor_id() != requester {
                return Err(BookingError::Forbidden);
            }
        }

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::booking::test_support::MockSessionStore;
    use crate::domain::foundation::{SessionType, Timestamp};
    use chrono::{DateTime, Utc};

    fn ts(s: &str) -> Timestamp {
        Timestamp::from_datetime(DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc))
    }

    fn session() -> Session {
        Session::new(
            SessionId::new(),
            UserId::new("student-1").unwrap(),
            UserId::new("mentor-1").unwrap(),
            ts("2024-03-04T10:00:00Z"),
            60,
            "Trait objects".to_string(),
            SessionType::Video,
            5000,
            "usd".to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn parties_can_read_their_session() {
        let session = session();
        let store = Arc::new(MockSessionStore::with_session(session.clone()));
        let handler = GetBookingHandler::new(store);

        for requester in ["student-1", "mentor-1"] {
            let found = handler
                .handle(GetBookingQuery {
                    session_id: *session.id(),
                    requested_by: Some(UserId::new(requester).unwrap()),
                })
                .await
                .unwrap();
            assert_eq!(found.id(), session.id());
        }
    }

    #[tokio::test]
    async fn strangers_are_forbidden() {
        let session = session();
        let store = Arc::new(MockSessionStore::with_session(session.clone()));
        let handler = GetBookingHandler::new(store);

        let result = handler
            .handle(GetBookingQuery {
                session_id: *session.id(),
                requested_by: Some(UserId::new("someone-else").unwrap()),
            })
            .await;

        assert!(matches!(result, Err(BookingError::Forbidden)));
    }

    #[tokio::test]
    async fn internal_callers_skip_the_party_check() {
        let session = session();
        let store = Arc::new(MockSessionStore::with_session(session.clone()));
        let handler = GetBookingHandler::new(store);

        let found = handler
            .handle(GetBookingQuery {
                session_id: *session.id(),
                requested_by: None,
            })
            .await
            .unwrap();

        assert_eq!(found.id(), session.id());
    }

    #[tokio::test]
    async fn missing_session_is_not_found() {
        let store = Arc::new(MockSessionStore::new());
        let handler = GetBookingHandler::new(store);

        let result = handler
            .handle(GetBookingQuery {
                session_id: SessionId::new(),
                requested_by: None,
            })
            .await;

        assert!(matches!(result, Err(BookingError::NotFound(_))));
    }
}
