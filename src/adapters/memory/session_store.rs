//! In-memory implementation of SessionStore.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{
    CancelledBy, DomainError, ErrorCode, SessionId, SessionStatus, Timestamp, UserId,
};
use crate::domain::session::Session;
use crate::ports::{InsertOutcome, SessionStore};

/// In-memory session store.
///
/// All mutating operations take the write lock for their full
/// read-check-write sequence, which is what makes the conditional
/// insert and the status compare-and-set atomic here.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, cancelled included.
    pub fn len(&self) -> usize {
        self.sessions.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().unwrap().is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: &Session) -> Result<InsertOutcome, DomainError> {
        let mut sessions = self.sessions.write().unwrap();

        let slot_held = sessions
            .values()
            .any(|s| s.slot_id() == session.slot_id() && s.status() != SessionStatus::Cancelled);
        if slot_held {
            return Ok(InsertOutcome::SlotTaken);
        }

        sessions.insert(*session.id(), session.clone());
        Ok(InsertOutcome::Created)
    }

    async fn update(&self, session: &Session) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().unwrap();
        if !sessions.contains_key(session.id()) {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            ));
        }
        sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        Ok(self.sessions.read().unwrap().get(id).cloned())
    }

    async fn find_active_by_mentor_between(
        &self,
        mentor_id: &UserId,
        from: &Timestamp,
        to: &Timestamp,
    ) -> Result<Vec<Session>, DomainError> {
        let sessions = self.sessions.read().unwrap();
        let mut found: Vec<Session> = sessions
            .values()
            .filter(|s| {
                s.mentor_id() == mentor_id
                    && s.status() != SessionStatus::Cancelled
                    && s.scheduled_time() >= from
                    && s.scheduled_time() < to
            })
            .cloned()
            .collect();
        found.sort_by_key(|s| *s.scheduled_time());
        Ok(found)
    }

    async fn find_overdue_pending(&self, now: &Timestamp) -> Result<Vec<Session>, DomainError> {
        let sessions = self.sessions.read().unwrap();
        let mut found: Vec<Session> = sessions
            .values()
            .filter(|s| s.is_overdue(now))
            .cloned()
            .collect();
        found.sort_by_key(|s| *s.auto_decline_at());
        Ok(found)
    }

    async fn find_confirmed_missing_link(
        &self,
        from: &Timestamp,
        to: &Timestamp,
    ) -> Result<Vec<Session>, DomainError> {
        let sessions = self.sessions.read().unwrap();
        let mut found: Vec<Session> = sessions
            .values()
            .filter(|s| {
                s.status() == SessionStatus::Confirmed
                    && s.meeting_link().is_none()
                    && s.scheduled_time() >= from
                    && s.scheduled_time() < to
            })
            .cloned()
            .collect();
        found.sort_by_key(|s| *s.scheduled_time());
        Ok(found)
    }

    async fn cancel_if_status(
        &self,
        id: &SessionId,
        expected: SessionStatus,
        cancelled_by: CancelledBy,
        reason: &str,
    ) -> Result<Option<Session>, DomainError> {
        let mut sessions = self.sessions.write().unwrap();
        let Some(session) = sessions.get_mut(id) else {
            return Ok(None);
        };
        if session.status() != expected {
            return Ok(None);
        }
        session
            .cancel(cancelled_by, reason.to_string())
            .map_err(|e| DomainError::new(ErrorCode::InvalidStateTransition, e.message))?;
        Ok(Some(session.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionType;
    use chrono::{DateTime, Utc};

    fn ts(s: &str) -> Timestamp {
        Timestamp::from_datetime(DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc))
    }

    fn session_at(start: &str) -> Session {
        Session::new(
            SessionId::new(),
            UserId::new("student-1").unwrap(),
            UserId::new("mentor-1").unwrap(),
            ts(start),
            60,
            "Pattern matching".to_string(),
            SessionType::Video,
            5000,
            "usd".to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn insert_then_find() {
        let store = InMemorySessionStore::new();
        let session = session_at("2024-03-04T10:00:00Z");

        let outcome = store.insert(&session).await.unwrap();
        assert_eq!(outcome, InsertOutcome::Created);

        let found = store.find_by_id(session.id()).await.unwrap().unwrap();
        assert_eq!(found.id(), session.id());
    }

    #[tokio::test]
    async fn second_insert_for_same_slot_is_taken() {
        let store = InMemorySessionStore::new();
        store.insert(&session_at("2024-03-04T10:00:00Z")).await.unwrap();

        let rival = session_at("2024-03-04T10:00:00Z");
        let outcome = store.insert(&rival).await.unwrap();

        assert_eq!(outcome, InsertOutcome::SlotTaken);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn cancelled_session_frees_its_slot() {
        let store = InMemorySessionStore::new();
        let mut session = session_at("2024-03-04T10:00:00Z");
        store.insert(&session).await.unwrap();

        session
            .cancel(CancelledBy::Student, "changed plans".to_string())
            .unwrap();
        store.update(&session).await.unwrap();

        let outcome = store.insert(&session_at("2024-03-04T10:00:00Z")).await.unwrap();
        assert_eq!(outcome, InsertOutcome::Created);
    }

    #[tokio::test]
    async fn update_unknown_session_fails() {
        let store = InMemorySessionStore::new();
        let session = session_at("2024-03-04T10:00:00Z");

        let result = store.update(&session).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn mentor_window_query_filters_and_sorts() {
        let store = InMemorySessionStore::new();
        let late = session_at("2024-03-04T11:00:00Z");
        let early = session_at("2024-03-04T09:00:00Z");
        let outside = session_at("2024-03-05T09:00:00Z");
        store.insert(&late).await.unwrap();
        store.insert(&early).await.unwrap();
        store.insert(&outside).await.unwrap();

        let found = store
            .find_active_by_mentor_between(
                &UserId::new("mentor-1").unwrap(),
                &ts("2024-03-04T00:00:00Z"),
                &ts("2024-03-05T00:00:00Z"),
            )
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id(), early.id());
        assert_eq!(found[1].id(), late.id());
    }

    #[tokio::test]
    async fn overdue_query_finds_only_pending_past_deadline() {
        let store = InMemorySessionStore::new();
        // Deadline 08:00.
        let overdue = session_at("2024-03-04T10:00:00Z");
        // Deadline 16:00.
        let fresh = session_at("2024-03-04T18:00:00Z");
        store.insert(&overdue).await.unwrap();
        store.insert(&fresh).await.unwrap();

        let found = store
            .find_overdue_pending(&ts("2024-03-04T08:30:00Z"))
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), overdue.id());
    }

    #[tokio::test]
    async fn cas_cancel_succeeds_once() {
        let store = InMemorySessionStore::new();
        let session = session_at("2024-03-04T10:00:00Z");
        store.insert(&session).await.unwrap();

        let first = store
            .cancel_if_status(
                session.id(),
                SessionStatus::PendingMentorAcceptance,
                CancelledBy::System,
                "overdue",
            )
            .await
            .unwrap();
        assert!(first.is_some());
        assert_eq!(first.unwrap().status(), SessionStatus::Cancelled);

        let second = store
            .cancel_if_status(
                session.id(),
                SessionStatus::PendingMentorAcceptance,
                CancelledBy::System,
                "overdue",
            )
            .await
            .unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn concurrent_cas_cancels_yield_one_winner() {
        let store = std::sync::Arc::new(InMemorySessionStore::new());
        let session = session_at("2024-03-04T10:00:00Z");
        store.insert(&session).await.unwrap();

        let id = *session.id();
        let tasks: Vec<_> = [CancelledBy::System, CancelledBy::Student]
            .into_iter()
            .map(|by| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .cancel_if_status(&id, SessionStatus::PendingMentorAcceptance, by, "race")
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut winners = 0;
        for task in tasks {
            if task.await.unwrap().is_some() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        let stored = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.status(), SessionStatus::Cancelled);
    }

    #[tokio::test]
    async fn cas_cancel_misses_on_status_change() {
        let store = InMemorySessionStore::new();
        let mut session = session_at("2024-03-04T10:00:00Z");
        store.insert(&session).await.unwrap();

        session
            .accept_with_meeting_link(
                crate::domain::session::MeetingLink::parse("https://meet.google.com/abc-defg-hij")
                    .unwrap(),
            )
            .unwrap();
        store.update(&session).await.unwrap();

        let result = store
            .cancel_if_status(
                session.id(),
                SessionStatus::PendingMentorAcceptance,
                CancelledBy::System,
                "overdue",
            )
            .await
            .unwrap();

        assert!(result.is_none());
        let stored = store.find_by_id(session.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), SessionStatus::Confirmed);
    }
}
