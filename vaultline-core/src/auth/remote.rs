//! Auth provider over the hosted auth API (GoTrue dialect).

use super::{AuthProvider, Credentials};
use crate::config::BackendConfig;
use crate::entry::PrincipalId;
use crate::http::{build_client, check_status, transport_error};
use crate::session::{Session, SessionFile};
use crate::{Result, VaultError};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Token grant response. When the backend requires email confirmation,
/// sign-up answers with the bare user object instead (top-level `id`, no
/// tokens).
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    user: Option<AuthUser>,
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl AuthErrorBody {
    fn into_message(self, status: StatusCode) -> String {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .unwrap_or_else(|| format!("auth backend returned {}", status))
    }
}

impl TokenResponse {
    fn into_session(self) -> Result<Session> {
        let Some(access_token) = self.access_token else {
            if self.user.is_some() || self.id.is_some() {
                return Err(VaultError::AuthenticationFailed(
                    "account created; confirm the email address before signing in".to_string(),
                ));
            }
            return Err(VaultError::StoreUnavailable(
                "Auth response did not include a session".to_string(),
            ));
        };
        let user = self.user.ok_or_else(|| {
            VaultError::StoreUnavailable("Auth response did not include a user".to_string())
        })?;

        Ok(Session {
            principal_id: PrincipalId::new(user.id),
            access_token,
            refresh_token: self.refresh_token,
            email: user.email,
            expires_at: self.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)),
        })
    }
}

/// HTTP client for the auth endpoints, optionally persisting the session.
pub struct RemoteAuth {
    client: reqwest::Client,
    config: BackendConfig,
    session_file: Option<SessionFile>,
}

impl RemoteAuth {
    pub fn new(config: BackendConfig) -> Result<Self> {
        config.validate()?;
        let client = build_client(&config)?;

        Ok(Self {
            client,
            config,
            session_file: None,
        })
    }

    /// Keep the established session in `file` across runs.
    pub fn with_session_file(mut self, file: SessionFile) -> Self {
        self.session_file = Some(file);
        self
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.config.base_url(), path)
    }

    fn credentials_body(credentials: &Credentials) -> serde_json::Value {
        serde_json::json!({
            "email": credentials.email.trim(),
            "password": credentials.password,
        })
    }

    /// POST `body` to a token-issuing endpoint and persist the resulting
    /// session. 4xx answers mean the backend rejected the grant.
    async fn grant(&self, url: String, body: serde_json::Value) -> Result<Session> {
        let resp = self
            .client
            .post(url)
            .header("apikey", &self.config.anon_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        if status.is_client_error() {
            let message = resp
                .json::<AuthErrorBody>()
                .await
                .unwrap_or_default()
                .into_message(status);
            return Err(VaultError::AuthenticationFailed(message));
        }

        let resp = check_status(resp).await?;
        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| VaultError::StoreUnavailable(format!("Invalid auth response: {}", e)))?;
        let session = token.into_session()?;

        if let Some(file) = &self.session_file {
            if let Err(e) = file.save(&session) {
                warn!("Failed to persist session: {}", e);
            }
        }
        Ok(session)
    }

    /// Exchange the refresh token of `session` for a new session.
    pub async fn refresh(&self, session: &Session) -> Result<Session> {
        let token = session
            .refresh_token
            .as_deref()
            .ok_or(VaultError::AuthenticationRequired)?;

        debug!("Refreshing session for {}", session.principal_id);
        self.grant(
            self.auth_url("token?grant_type=refresh_token"),
            serde_json::json!({ "refresh_token": token }),
        )
        .await
    }
}

#[async_trait]
impl AuthProvider for RemoteAuth {
    /// Load the persisted session, trading an expired one for a fresh
    /// session through its refresh token.
    async fn restore(&self) -> Result<Option<Session>> {
        let Some(file) = &self.session_file else {
            return Ok(None);
        };
        let Some(session) = file.load()? else {
            return Ok(None);
        };
        if !session.is_expired() {
            return Ok(Some(session));
        }

        match self.refresh(&session).await {
            Ok(fresh) => Ok(Some(fresh)),
            Err(e) => {
                warn!("Session refresh failed: {}", e);
                file.remove()?;
                Ok(None)
            }
        }
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session> {
        debug!("Requesting password grant");
        self.grant(
            self.auth_url("token?grant_type=password"),
            Self::credentials_body(credentials),
        )
        .await
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Session> {
        debug!("Requesting sign-up");
        self.grant(self.auth_url("signup"), Self::credentials_body(credentials))
            .await
    }

    async fn sign_out(&self, session: &Session) -> Result<()> {
        if let Some(file) = &self.session_file {
            file.remove()?;
        }

        let resp = self
            .client
            .post(self.auth_url("logout"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(resp).await?;
        Ok(())
    }
}
