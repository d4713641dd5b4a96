//! Session tokens issued at login.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use liars_dice::UserId;
use serde::Serialize;
use uuid::Uuid;

/// A live session: the bearer token and the user it identifies.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("already logged in.")]
    AlreadyLoggedIn,
}

/// In-memory mapping from session token to user id.
///
/// Every login mints a fresh user id. Sessions don't survive a restart.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, UserId>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session, unless `presented` is already a live token.
    pub fn login(&self, presented: Option<&str>) -> Result<Session, SessionError> {
        if presented.is_some_and(|token| self.user_for(token).is_some()) {
            return Err(SessionError::AlreadyLoggedIn);
        }

        let session = Session {
            token: Uuid::new_v4().to_string(),
            user_id: Uuid::new_v4().to_string(),
        };
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.token.clone(), session.user_id.clone());
        Ok(session)
    }

    /// End a session, returning the user it belonged to.
    pub fn logout(&self, token: &str) -> Option<UserId> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token)
    }

    #[must_use]
    pub fn user_for(&self, token: &str) -> Option<UserId> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_issues_distinct_users() {
        let store = SessionStore::new();
        let first = store.login(None).unwrap();
        let second = store.login(None).unwrap();

        assert_ne!(first.user_id, second.user_id);
        assert_eq!(store.user_for(&first.token), Some(first.user_id));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_login_with_live_token_is_rejected() {
        let store = SessionStore::new();
        let session = store.login(None).unwrap();

        assert_eq!(
            store.login(Some(&session.token)),
            Err(SessionError::AlreadyLoggedIn)
        );
        assert!(store.login(Some("stale-token")).is_ok());
    }

    #[test]
    fn test_logout_ends_session() {
        let store = SessionStore::new();
        let session = store.login(None).unwrap();

        assert_eq!(store.logout(&session.token), Some(session.user_id));
        assert!(store.user_for(&session.token).is_none());
        assert!(store.logout(&session.token).is_none());
    }
}
