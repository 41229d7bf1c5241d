//! Auth gate - decides between the login screen and the vault.
//!
//! The gate owns the transition between [`AuthState::Anonymous`] and
//! [`AuthState::Authenticated`] and is the only writer of the
//! [`SessionSlot`] that entry stores read from.

mod memory;
mod remote;

pub use memory::MemoryAuth;
pub use remote::RemoteAuth;

use crate::session::{Session, SessionSlot};
use crate::{Result, VaultError};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Email/password pair entered on the auth screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(VaultError::Validation(
                "a valid email address is required".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(VaultError::Validation("password is required".to_string()));
        }
        Ok(())
    }
}

/// External authentication backend.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Session carried over from an earlier run, if still valid.
    async fn restore(&self) -> Result<Option<Session>>;

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session>;

    async fn sign_up(&self, credentials: &Credentials) -> Result<Session>;

    async fn sign_out(&self, session: &Session) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Anonymous,
    Authenticated(Session),
}

/// Which top-level screen to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Vault,
}

pub struct AuthGate {
    provider: Arc<dyn AuthProvider>,
    slot: SessionSlot,
    state: AuthState,
}

impl AuthGate {
    /// Run the initial session check and return a gate already settled in
    /// one of its two states. A failing check settles on `Anonymous`.
    pub async fn resolve(provider: Arc<dyn AuthProvider>, slot: SessionSlot) -> Self {
        let restored = match provider.restore().await {
            Ok(session) => session.filter(|s| !s.is_expired()),
            Err(e) => {
                warn!("Session check failed: {}", e);
                None
            }
        };

        let mut gate = Self {
            provider,
            slot,
            state: AuthState::Anonymous,
        };
        if let Some(session) = restored {
            info!("Restored session for {}", session.principal_id);
            gate.enter(session);
        } else {
            gate.slot.clear();
        }
        gate
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            AuthState::Authenticated(session) => Some(session),
            AuthState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated(_))
    }

    pub fn screen(&self) -> Screen {
        if self.is_authenticated() {
            Screen::Vault
        } else {
            Screen::Login
        }
    }

    /// Sign in. On failure the current state is kept.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<Session> {
        credentials.validate()?;
        let session = self.provider.sign_in(credentials).await?;
        info!("Signed in as {}", session.principal_id);
        Ok(self.enter(session))
    }

    /// Create an account and sign in with it.
    pub async fn register(&mut self, credentials: &Credentials) -> Result<Session> {
        credentials.validate()?;
        let session = self.provider.sign_up(credentials).await?;
        info!("Registered {}", session.principal_id);
        Ok(self.enter(session))
    }

    /// Return to `Anonymous`. Backend sign-out failures are logged only.
    pub async fn logout(&mut self) {
        if let AuthState::Authenticated(session) = &self.state {
            if let Err(e) = self.provider.sign_out(session).await {
                warn!("Backend sign-out failed: {}", e);
            }
            info!("Signed out {}", session.principal_id);
        }
        self.slot.clear();
        self.state = AuthState::Anonymous;
    }

    fn enter(&mut self, session: Session) -> Session {
        self.slot.replace(Some(session.clone()));
        self.state = AuthState::Authenticated(session.clone());
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::PrincipalId;
    use chrono::{Duration, Utc};

    fn alice() -> Credentials {
        Credentials::new("alice@example.com", "correct horse")
    }

    fn provider() -> Arc<MemoryAuth> {
        Arc::new(MemoryAuth::new().with_account("alice@example.com", "correct horse"))
    }

    #[tokio::test]
    async fn test_resolves_anonymous_without_session() {
        let slot = SessionSlot::new();
        let gate = AuthGate::resolve(provider(), slot.clone()).await;

        assert_eq!(gate.state(), &AuthState::Anonymous);
        assert_eq!(gate.screen(), Screen::Login);
        assert!(slot.current().is_none());
    }

    #[tokio::test]
    async fn test_resolves_authenticated_from_restored_session() {
        let session = Session::new(PrincipalId::new("p1"), "token");
        let provider = Arc::new(MemoryAuth::new().with_restored(session.clone()));
        let slot = SessionSlot::new();

        let gate = AuthGate::resolve(provider, slot.clone()).await;
        assert_eq!(gate.screen(), Screen::Vault);
        assert_eq!(gate.session(), Some(&session));
        assert_eq!(slot.current(), Some(session));
    }

    #[tokio::test]
    async fn test_expired_restored_session_stays_anonymous() {
        let mut session = Session::new(PrincipalId::new("p1"), "token");
        session.expires_at = Some(Utc::now() - Duration::seconds(10));
        let provider = Arc::new(MemoryAuth::new().with_restored(session));

        let gate = AuthGate::resolve(provider, SessionSlot::new()).await;
        assert!(!gate.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_and_logout_transitions() {
        let slot = SessionSlot::new();
        let mut gate = AuthGate::resolve(provider(), slot.clone()).await;

        let principal = gate.login(&alice()).await.unwrap().principal_id;
        assert_eq!(gate.screen(), Screen::Vault);
        assert_eq!(slot.require().unwrap().principal_id, principal);

        gate.logout().await;
        assert_eq!(gate.state(), &AuthState::Anonymous);
        assert!(matches!(
            slot.require(),
            Err(VaultError::AuthenticationRequired)
        ));
    }

    #[tokio::test]
    async fn test_failed_login_keeps_anonymous() {
        let slot = SessionSlot::new();
        let mut gate = AuthGate::resolve(provider(), slot.clone()).await;

        let result = gate
            .login(&Credentials::new("alice@example.com", "wrong"))
            .await;
        assert!(matches!(result, Err(VaultError::AuthenticationFailed(_))));
        assert!(!gate.is_authenticated());
        assert!(slot.current().is_none());
    }

    #[tokio::test]
    async fn test_invalid_credentials_rejected_before_provider() {
        let mut gate = AuthGate::resolve(provider(), SessionSlot::new()).await;
        assert!(matches!(
            gate.login(&Credentials::new("not-an-email", "pw")).await,
            Err(VaultError::Validation(_))
        ));
        assert!(matches!(
            gate.register(&Credentials::new("bob@example.com", "")).await,
            Err(VaultError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_register_then_login_same_principal() {
        let slot = SessionSlot::new();
        let mut gate = AuthGate::resolve(Arc::new(MemoryAuth::new()), slot).await;
        let creds = Credentials::new("bob@example.com", "s3cret");

        let registered = gate.register(&creds).await.unwrap().principal_id;
        gate.logout().await;

        let signed_in = gate.login(&creds).await.unwrap().principal_id;
        assert_eq!(registered, signed_in);
    }
}
