//! Wiring of the auth gate and entry store for one CLI invocation.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use vaultline_core::demo::{demo_backend, DEMO_EMAIL, DEMO_PASSWORD};
use vaultline_core::{
    get_default_config_path, get_session_path, AuthGate, Config, Credentials, EntryStore,
    RemoteAuth, RemoteEntryStore, SessionFile, SessionSlot, VaultView,
};

pub struct Backend {
    pub gate: AuthGate,
    store: Arc<dyn EntryStore>,
}

impl Backend {
    /// Hosted backend described by the config file and environment.
    pub async fn connect(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;
        let shown_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(get_default_config_path);

        let slot = SessionSlot::new();
        let auth = RemoteAuth::new(config.backend.clone())
            .with_context(|| {
                format!(
                    "Backend not configured; set VAULTLINE_URL and VAULTLINE_ANON_KEY or edit {}",
                    shown_path.display()
                )
            })?
            .with_session_file(SessionFile::new(get_session_path()));
        let store = RemoteEntryStore::new(config.backend, slot.clone())?;

        let gate = AuthGate::resolve(Arc::new(auth), slot).await;
        Ok(Self {
            gate,
            store: Arc::new(store),
        })
    }

    /// In-memory backend with sample data, already signed in.
    pub async fn demo() -> Result<Self> {
        let slot = SessionSlot::new();
        let (auth, store) = demo_backend(slot.clone());

        let mut gate = AuthGate::resolve(Arc::new(auth), slot).await;
        gate.login(&Credentials::new(DEMO_EMAIL, DEMO_PASSWORD))
            .await
            .context("Demo login failed")?;

        Ok(Self {
            gate,
            store: Arc::new(store),
        })
    }

    /// Loaded vault view for the signed-in principal.
    pub async fn open_vault(&self) -> Result<VaultView> {
        if !self.gate.is_authenticated() {
            anyhow::bail!("Not signed in. Run `vaultline login` first.");
        }

        let mut view = VaultView::new(Arc::clone(&self.store));
        let loaded = view.load().await;
        crate::output::print_notices(&mut view);
        loaded?;
        Ok(view)
    }
}
