//! Vaultline Core Library
//!
//! Client-side core of a hosted password vault: the credential entry model,
//! the entry store contract and its backends, the vault view with search and
//! local-state reduction, and the auth gate deciding between the login
//! screen and the vault.

pub mod auth;
pub mod card;
pub mod config;
pub mod demo;
pub mod entry;
pub mod form;
pub mod generator;
mod http;
pub mod platform;
pub mod session;
pub mod store;
pub mod vault;

pub use auth::{AuthGate, AuthProvider, AuthState, Credentials, MemoryAuth, RemoteAuth, Screen};
pub use card::EntryCard;
pub use config::{BackendConfig, Config, DeletePolicy};
pub use entry::{CredentialEntry, EntryId, EntryPatch, NewEntry, PrincipalId};
pub use form::EntryForm;
pub use generator::{generate_passphrase, generate_password, PasswordGeneratorConfig};
pub use platform::{get_config_dir, get_default_config_path, get_session_path};
pub use session::{Session, SessionFile, SessionSlot};
pub use store::{EntryStore, MemoryEntryStore, RemoteEntryStore};
pub use vault::{filter_entries, reduce, EmptyState, Notice, NoticeLevel, VaultAction, VaultView};

use thiserror::Error;

/// Result type for vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// General error type for vault operations
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VaultError {
    /// Whether the caller may reasonably retry the operation as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, VaultError::StoreUnavailable(_))
    }
}
