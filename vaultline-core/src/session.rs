//! Authenticated session and the slot through which stores observe it.

use crate::entry::PrincipalId;
use crate::{Result, VaultError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::warn;

/// An authenticated session issued by the auth backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub principal_id: PrincipalId,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub email: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(principal_id: PrincipalId, access_token: impl Into<String>) -> Self {
        Self {
            principal_id,
            access_token: access_token.into(),
            refresh_token: None,
            email: None,
            expires_at: None,
        }
    }

    /// Whether the access token has passed its expiry.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Shared handle holding the current session, if any.
///
/// The auth gate is the only writer; entry stores read it at the start of
/// every operation.
#[derive(Debug, Clone, Default)]
pub struct SessionSlot {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(session))),
        }
    }

    /// Current session, expired sessions included.
    pub fn current(&self) -> Option<Session> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Current live session, or `AuthenticationRequired`.
    pub fn require(&self) -> Result<Session> {
        match self.current() {
            Some(session) if !session.is_expired() => Ok(session),
            _ => Err(VaultError::AuthenticationRequired),
        }
    }

    pub fn replace(&self, session: Option<Session>) {
        *self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = session;
    }

    pub fn clear(&self) {
        self.replace(None);
    }
}

/// JSON file holding the last established session between runs.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session. A missing or unreadable file yields `None`,
    /// as does an expired session that cannot be refreshed; corrupt and
    /// unrefreshable files are removed. An expired session that still has a
    /// refresh token is returned as is.
    pub fn load(&self) -> Result<Option<Session>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let session: Session = match serde_json::from_str(&content) {
            Ok(session) => session,
            Err(e) => {
                warn!("Discarding unreadable session file {:?}: {}", self.path, e);
                self.remove()?;
                return Ok(None);
            }
        };

        if session.is_expired() && session.refresh_token.is_none() {
            self.remove()?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session)
            .map_err(|e| VaultError::Config(format!("Failed to encode session: {}", e)))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn remove(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
