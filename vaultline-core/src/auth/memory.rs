//! In-process auth provider for demo mode and tests.

use super::{AuthProvider, Credentials};
use crate::entry::PrincipalId;
use crate::session::Session;
use crate::{Result, VaultError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

struct Account {
    password: String,
    principal_id: PrincipalId,
}

/// Accounts held in a map keyed by lowercase email.
#[derive(Default)]
pub struct MemoryAuth {
    accounts: Mutex<HashMap<String, Account>>,
    restored: Option<Session>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.with_principal(email, password, PrincipalId::new(Uuid::new_v4().to_string()))
    }

    /// Account with a fixed principal, e.g. the owner of seeded demo data.
    pub fn with_principal(self, email: &str, password: &str, principal_id: PrincipalId) -> Self {
        if let Ok(mut accounts) = self.accounts.lock() {
            accounts.insert(
                email.trim().to_lowercase(),
                Account {
                    password: password.to_string(),
                    principal_id,
                },
            );
        }
        self
    }

    /// Session reported by the initial check.
    pub fn with_restored(mut self, session: Session) -> Self {
        self.restored = Some(session);
        self
    }

    fn issue(email: &str, principal_id: PrincipalId) -> Session {
        let mut session = Session::new(principal_id, Uuid::new_v4().to_string());
        session.email = Some(email.to_string());
        session
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    async fn restore(&self) -> Result<Option<Session>> {
        Ok(self.restored.clone())
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session> {
        let email = credentials.email.trim().to_lowercase();
        let accounts = self
            .accounts
            .lock()
            .map_err(|_| VaultError::StoreUnavailable("account table lock poisoned".to_string()))?;

        match accounts.get(&email) {
            Some(account) if account.password == credentials.password => {
                Ok(Self::issue(&email, account.principal_id.clone()))
            }
            _ => Err(VaultError::AuthenticationFailed(
                "Invalid login credentials".to_string(),
            )),
        }
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Session> {
        let email = credentials.email.trim().to_lowercase();
        let mut accounts = self
            .accounts
            .lock()
            .map_err(|_| VaultError::StoreUnavailable("account table lock poisoned".to_string()))?;

        if accounts.contains_key(&email) {
            return Err(VaultError::AuthenticationFailed(
                "User already registered".to_string(),
            ));
        }

        let principal_id = PrincipalId::new(Uuid::new_v4().to_string());
        accounts.insert(
            email.clone(),
            Account {
                password: credentials.password.clone(),
                principal_id: principal_id.clone(),
            },
        );
        Ok(Self::issue(&email, principal_id))
    }

    async fn sign_out(&self, _session: &Session) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_email_is_case_insensitive() {
        let auth = MemoryAuth::new().with_account("Alice@Example.com", "pw");
        let session = auth
            .sign_in(&Credentials::new("alice@example.COM", "pw"))
            .await
            .unwrap();
        assert_eq!(session.email.as_deref(), Some("alice@example.com"));
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_fails() {
        let auth = MemoryAuth::new().with_account("alice@example.com", "pw");
        let result = auth
            .sign_up(&Credentials::new("alice@example.com", "other"))
            .await;
        assert!(matches!(result, Err(VaultError::AuthenticationFailed(_))));
    }

    #[tokio::test]
    async fn test_fixed_principal_is_reported() {
        let auth = MemoryAuth::new().with_principal("demo@example.com", "demo", PrincipalId::new("demo"));
        let session = auth
            .sign_in(&Credentials::new("demo@example.com", "demo"))
            .await
            .unwrap();
        assert_eq!(session.principal_id.as_str(), "demo");
    }
}
