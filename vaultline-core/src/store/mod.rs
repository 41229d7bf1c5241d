//! Entry store: the persistence contract for credential entries.
//!
//! Every operation is scoped to the principal of the session held in the
//! store's [`SessionSlot`](crate::SessionSlot). Without a live session the
//! call fails with `AuthenticationRequired` before anything else happens.
//! Stores keep no cache; callers reconcile their own copies.

mod memory;
mod remote;
pub mod row;

pub use memory::MemoryEntryStore;
pub use remote::RemoteEntryStore;

use crate::entry::{CredentialEntry, EntryId, EntryPatch, NewEntry};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait EntryStore: Send + Sync {
    /// All entries of the current principal, newest first.
    async fn list(&self) -> Result<Vec<CredentialEntry>>;

    /// Add an entry; the store assigns id, owner and timestamps.
    async fn create(&self, entry: NewEntry) -> Result<CredentialEntry>;

    /// Apply the supplied fields and refresh `updated_at`.
    async fn update(&self, id: &EntryId, patch: EntryPatch) -> Result<CredentialEntry>;

    /// Permanently remove an entry.
    async fn delete(&self, id: &EntryId) -> Result<()>;

    /// Refresh `last_used_at`; nothing else changes.
    async fn mark_used(&self, id: &EntryId) -> Result<()>;
}
