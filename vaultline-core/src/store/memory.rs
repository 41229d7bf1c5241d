//! In-process entry store with the same contract as the remote one.

use super::EntryStore;
use crate::config::DeletePolicy;
use crate::entry::{CredentialEntry, EntryId, EntryPatch, NewEntry, PrincipalId};
use crate::session::SessionSlot;
use crate::{Result, VaultError};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Entry store backed by a vector guarded by a mutex.
///
/// Used for demo mode and as the store double in tests.
pub struct MemoryEntryStore {
    session: SessionSlot,
    entries: Mutex<Vec<CredentialEntry>>,
    delete_policy: DeletePolicy,
}

impl MemoryEntryStore {
    pub fn new(session: SessionSlot) -> Self {
        Self {
            session,
            entries: Mutex::new(Vec::new()),
            delete_policy: DeletePolicy::default(),
        }
    }

    /// Store pre-filled with `entries`, oldest first.
    pub fn seeded(session: SessionSlot, entries: Vec<CredentialEntry>) -> Self {
        Self {
            session,
            entries: Mutex::new(entries),
            delete_policy: DeletePolicy::default(),
        }
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<CredentialEntry>>> {
        self.entries
            .lock()
            .map_err(|_| VaultError::StoreUnavailable("entry store lock poisoned".to_string()))
    }

    fn position(entries: &[CredentialEntry], id: &EntryId, owner: &PrincipalId) -> Result<usize> {
        entries
            .iter()
            .position(|e| &e.id == id && &e.owner_id == owner)
            .ok_or_else(|| VaultError::NotFound(format!("Entry {}", id)))
    }
}

/// A timestamp strictly after `previous`, normally just "now".
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous + Duration::microseconds(1))
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn list(&self) -> Result<Vec<CredentialEntry>> {
        let session = self.session.require()?;
        let entries = self.lock()?;

        // Reverse insertion order first so equal timestamps stay newest-first.
        let mut owned: Vec<CredentialEntry> = entries
            .iter()
            .rev()
            .filter(|e| e.owner_id == session.principal_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(owned)
    }

    async fn create(&self, entry: NewEntry) -> Result<CredentialEntry> {
        let session = self.session.require()?;
        let entry = entry.validate()?;

        let now = Utc::now();
        let created = CredentialEntry {
            id: EntryId::generate(),
            owner_id: session.principal_id,
            title: entry.title,
            username: entry.username,
            password: entry.password,
            url: entry.url,
            notes: entry.notes,
            category: entry.category,
            favorite: entry.favorite,
            created_at: now,
            updated_at: now,
            last_used_at: None,
        };

        self.lock()?.push(created.clone());
        debug!("Created entry {}", created.id);

        Ok(created)
    }

    async fn update(&self, id: &EntryId, patch: EntryPatch) -> Result<CredentialEntry> {
        let session = self.session.require()?;
        let patch = patch.validate()?;

        let mut entries = self.lock()?;
        let index = Self::position(&entries, id, &session.principal_id)?;
        let entry = &mut entries[index];

        patch.apply_to(entry);
        entry.updated_at = next_timestamp(entry.updated_at);
        debug!("Updated entry {}", id);

        Ok(entry.clone())
    }

    async fn delete(&self, id: &EntryId) -> Result<()> {
        let session = self.session.require()?;
        let mut entries = self.lock()?;

        match Self::position(&entries, id, &session.principal_id) {
            Ok(index) => {
                entries.remove(index);
                debug!("Deleted entry {}", id);
                Ok(())
            }
            Err(VaultError::NotFound(_)) if self.delete_policy == DeletePolicy::Idempotent => {
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn mark_used(&self, id: &EntryId) -> Result<()> {
        let session = self.session.require()?;
        let mut entries = self.lock()?;
        let index = Self::position(&entries, id, &session.principal_id)?;

        entries[index].last_used_at = Some(Utc::now());
        Ok(())
    }
}
