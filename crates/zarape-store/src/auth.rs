//! # Auth Seam
//!
//! Thin seam over the remote auth service. The engine consumes sessions
//! as an opaque capability: sign in, sign out, who is signed in. The
//! production implementation wraps the cloud SDK; [`StaticAuth`] backs
//! tests and the demo with a fixed user list.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{StoreError, StoreResult};

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub email: String,
}

/// Async access to the remote auth service.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Signs in with email and password, establishing the session.
    async fn sign_in(&self, email: &str, password: &str) -> StoreResult<Session>;

    /// Ends the current session. Signing out twice is a no-op.
    async fn sign_out(&self);

    /// The current session, if any.
    async fn current_session(&self) -> Option<Session>;
}

/// Fixed-credential auth for tests and the demo binary.
#[derive(Debug, Default)]
pub struct StaticAuth {
    users: HashMap<String, String>,
    session: RwLock<Option<Session>>,
}

impl StaticAuth {
    /// Builds an auth service accepting the given email/password pairs.
    pub fn new<I>(users: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        StaticAuth {
            users: users.into_iter().collect(),
            session: RwLock::new(None),
        }
    }
}

#[async_trait]
impl AuthService for StaticAuth {
    async fn sign_in(&self, email: &str, password: &str) -> StoreResult<Session> {
        let valid = self
            .users
            .get(email)
            .map(|expected| expected == password)
            .unwrap_or(false);

        if !valid {
            return Err(StoreError::Unauthorized(format!(
                "invalid credentials for {email}"
            )));
        }

        let session = Session {
            user_id: format!("user:{email}"),
            email: email.to_string(),
        };
        *self.session.write().await = Some(session.clone());
        info!(%email, "signed in");
        Ok(session)
    }

    async fn sign_out(&self) {
        *self.session.write().await = None;
    }

    async fn current_session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> StaticAuth {
        StaticAuth::new([("ventas@zarape.mx".to_string(), "sarape123".to_string())])
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let auth = auth();
        assert!(auth.current_session().await.is_none());

        let session = auth.sign_in("ventas@zarape.mx", "sarape123").await.unwrap();
        assert_eq!(session.email, "ventas@zarape.mx");
        assert_eq!(auth.current_session().await, Some(session));

        auth.sign_out().await;
        assert!(auth.current_session().await.is_none());
        auth.sign_out().await;
    }

    #[tokio::test]
    async fn test_bad_credentials_rejected() {
        let auth = auth();
        let err = auth.sign_in("ventas@zarape.mx", "wrong").await.unwrap_err();
        assert!(matches!(err, StoreError::Unauthorized(_)));
        assert!(auth.current_session().await.is_none());
    }
}
