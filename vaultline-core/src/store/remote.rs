//! Entry store over the hosted table API (PostgREST dialect).

use super::row::{eq, EntryRow, InsertRow, PatchRow, COL_CREATED_AT, COL_ID, COL_OWNER};
use super::EntryStore;
use crate::config::{BackendConfig, DeletePolicy};
use crate::entry::{CredentialEntry, EntryId, EntryPatch, NewEntry};
use crate::http::{build_client, check_status, transport_error};
use crate::session::{Session, SessionSlot};
use crate::{Result, VaultError};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, RequestBuilder};
use tracing::debug;

const RETURN_REPRESENTATION: &str = "return=representation";

/// HTTP client for the entries table.
pub struct RemoteEntryStore {
    client: reqwest::Client,
    config: BackendConfig,
    session: SessionSlot,
}

impl RemoteEntryStore {
    /// Create a store for `config`, reading the session from `session`.
    pub fn new(config: BackendConfig, session: SessionSlot) -> Result<Self> {
        config.validate()?;
        let client = build_client(&config)?;

        Ok(Self {
            client,
            config,
            session,
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.config.base_url(), self.config.table)
    }

    fn request(&self, method: Method, session: &Session) -> RequestBuilder {
        self.client
            .request(method, self.table_url())
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&session.access_token)
    }

    /// Request addressing a single row of the session's principal.
    fn row_request(&self, method: Method, session: &Session, id: &EntryId) -> RequestBuilder {
        self.request(method, session)
            .query(&[
                (COL_ID, eq(id.as_str())),
                (COL_OWNER, eq(session.principal_id.as_str())),
            ])
            .header("Prefer", RETURN_REPRESENTATION)
    }

    async fn fetch_rows(&self, request: RequestBuilder) -> Result<Vec<EntryRow>> {
        let resp = request.send().await.map_err(transport_error)?;
        let resp = check_status(resp).await?;

        resp.json::<Vec<EntryRow>>()
            .await
            .map_err(|e| VaultError::StoreUnavailable(format!("Invalid backend response: {}", e)))
    }

    async fn single_row(&self, request: RequestBuilder, id: &EntryId) -> Result<EntryRow> {
        self.fetch_rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| VaultError::NotFound(format!("Entry {}", id)))
    }
}

#[async_trait]
impl EntryStore for RemoteEntryStore {
    async fn list(&self) -> Result<Vec<CredentialEntry>> {
        let session = self.session.require()?;
        debug!("Listing entries for {}", session.principal_id);

        let request = self.request(Method::GET, &session).query(&[
            ("select", "*".to_string()),
            (COL_OWNER, eq(session.principal_id.as_str())),
            ("order", format!("{}.desc", COL_CREATED_AT)),
        ]);

        let rows = self.fetch_rows(request).await?;
        Ok(rows.into_iter().map(CredentialEntry::from).collect())
    }

    async fn create(&self, entry: NewEntry) -> Result<CredentialEntry> {
        let session = self.session.require()?;
        let entry = entry.validate()?;

        let body = InsertRow::new(&session.principal_id, entry, Utc::now());
        let request = self
            .request(Method::POST, &session)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&[body]);

        let row = self
            .fetch_rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                VaultError::StoreUnavailable("Backend returned no row for insert".to_string())
            })?;

        debug!("Created entry {}", row.id);
        Ok(row.into())
    }

    async fn update(&self, id: &EntryId, patch: EntryPatch) -> Result<CredentialEntry> {
        let session = self.session.require()?;
        let patch = patch.validate()?;

        let request = self
            .row_request(Method::PATCH, &session, id)
            .json(&PatchRow::edit(patch, Utc::now()));

        let row = self.single_row(request, id).await?;
        debug!("Updated entry {}", id);
        Ok(row.into())
    }

    async fn delete(&self, id: &EntryId) -> Result<()> {
        let session = self.session.require()?;
        let request = self.row_request(Method::DELETE, &session, id);

        match self.single_row(request, id).await {
            Ok(_) => {
                debug!("Deleted entry {}", id);
                Ok(())
            }
            Err(VaultError::NotFound(_)) if self.config.delete_policy == DeletePolicy::Idempotent => {
                debug!("Delete of missing entry {} accepted", id);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn mark_used(&self, id: &EntryId) -> Result<()> {
        let session = self.session.require()?;
        let request = self
            .row_request(Method::PATCH, &session, id)
            .json(&PatchRow::used(Utc::now()));

        self.single_row(request, id).await?;
        Ok(())
    }
}
