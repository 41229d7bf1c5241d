//! Vault view - the local list of entries, search over it, and the actions
//! that go through the entry store.
//!
//! Local state only changes after the store confirms an operation; the
//! change itself is computed by the pure [`reduce`] function so it can be
//! exercised without any backend.


use crate::entry::{CredentialEntry, EntryId, EntryPatch, NewEntry};
use crate::store::EntryStore;
use crate::{Result, VaultError};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

/// A confirmed store outcome to fold into the local list.
#[derive(Debug, Clone, PartialEq)]
pub enum VaultAction {
    Loaded(Vec<CredentialEntry>),
    Created(CredentialEntry),
    Updated(CredentialEntry),
    Deleted(EntryId),
    MarkedUsed { id: EntryId, at: DateTime<Utc> },
}

/// Compute the list that results from applying `action` to `entries`.
///
/// Created entries go first, matching the store's newest-first listing.
/// Updates keep the entry's position.
pub fn reduce(entries: &[CredentialEntry], action: VaultAction) -> Vec<CredentialEntry> {
    match action {
        VaultAction::Loaded(loaded) => loaded,
        VaultAction::Created(entry) => {
            let mut next = Vec::with_capacity(entries.len() + 1);
            next.push(entry);
            next.extend(entries.iter().cloned());
            next
        }
        VaultAction::Updated(updated) => entries
            .iter()
            .map(|e| {
                if e.id == updated.id {
                    updated.clone()
                } else {
                    e.clone()
                }
            })
            .collect(),
        VaultAction::Deleted(id) => entries.iter().filter(|e| e.id != id).cloned().collect(),
        VaultAction::MarkedUsed { id, at } => entries
            .iter()
            .map(|e| {
                let mut e = e.clone();
                if e.id == id {
                    e.last_used_at = Some(at);
                }
                e
            })
            .collect(),
    }
}

/// Entries matching a free-text query.
///
/// A blank (empty or all-whitespace) query matches everything. Otherwise the
/// query, surrounding whitespace included, is matched case-insensitively as a
/// substring of title, username or url; entries without a url only match
/// through the other two.
pub fn filter_entries<'a>(entries: &'a [CredentialEntry], query: &str) -> Vec<&'a CredentialEntry> {
    if query.trim().is_empty() {
        return entries.iter().collect();
    }
    let needle = query.to_lowercase();

    entries
        .iter()
        .filter(|e| {
            e.title.to_lowercase().contains(&needle)
                || e.username.to_lowercase().contains(&needle)
                || e
                    .url
                    .as_ref()
                    .is_some_and(|url| url.to_lowercase().contains(&needle))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// User-visible notification about the outcome of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    fn success(title: &str, description: &str) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    fn error(title: &str, err: &VaultError) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.to_string(),
            description: err.to_string(),
        }
    }
}

/// What to show when the filtered view is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyState {
    /// The vault has entries but none match the current filters.
    NoMatches { query: String },
    /// The vault holds no entries at all.
    NoEntries,
}

/// In-memory vault state bound to an entry store.
pub struct VaultView {
    store: Arc<dyn EntryStore>,
    entries: Vec<CredentialEntry>,
    query: String,
    favorites_only: bool,
    category: Option<String>,
    notices: Vec<Notice>,
}

impl VaultView {
    pub fn new(store: Arc<dyn EntryStore>) -> Self {
        Self {
            store,
            entries: Vec::new(),
            query: String::new(),
            favorites_only: false,
            category: None,
            notices: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[CredentialEntry] {
        &self.entries
    }

    pub fn find(&self, id: &EntryId) -> Option<&CredentialEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn set_favorites_only(&mut self, favorites_only: bool) {
        self.favorites_only = favorites_only;
    }

    /// Restrict the view to one category (compared case-insensitively).
    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category.filter(|c| !c.trim().is_empty());
    }

    /// Entries passing the query and the favorite/category filters, in list
    /// order. Recomputed from the current state on every call.
    pub fn filtered(&self) -> Vec<&CredentialEntry> {
        let category = self.category.as_ref().map(|c| c.trim().to_lowercase());

        filter_entries(&self.entries, &self.query)
            .into_iter()
            .filter(|e| !self.favorites_only || e.favorite)
            .filter(|e| match &category {
                Some(wanted) => e
                    .category
                    .as_ref()
                    .is_some_and(|c| c.to_lowercase() == *wanted),
                None => true,
            })
            .collect()
    }

    /// Empty-view explanation, or `None` when something is visible.
    pub fn empty_state(&self) -> Option<EmptyState> {
        if !self.filtered().is_empty() {
            return None;
        }
        if self.entries.is_empty() {
            Some(EmptyState::NoEntries)
        } else {
            Some(EmptyState::NoMatches {
                query: self.query.trim().to_string(),
            })
        }
    }

    /// Distinct categories in use, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|e| e.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain pending notices for display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Replace the local list with the store's current contents.
    pub async fn load(&mut self) -> Result<()> {
        match self.store.list().await {
            Ok(entries) => {
                info!("Loaded {} entries", entries.len());
                self.apply(VaultAction::Loaded(entries));
                Ok(())
            }
            Err(e) => Err(self.fail("Could not load passwords", e)),
        }
    }

    pub async fn add(&mut self, entry: NewEntry) -> Result<CredentialEntry> {
        match self.store.create(entry).await {
            Ok(created) => {
                self.apply(VaultAction::Created(created.clone()));
                self.notices.push(Notice::success(
                    "Password added",
                    "Your new password has been saved securely.",
                ));
                Ok(created)
            }
            Err(e) => Err(self.fail("Could not add password", e)),
        }
    }

    pub async fn edit(&mut self, id: &EntryId, patch: EntryPatch) -> Result<CredentialEntry> {
        match self.store.update(id, patch).await {
            Ok(updated) => {
                self.apply(VaultAction::Updated(updated.clone()));
                self.notices.push(Notice::success(
                    "Password updated",
                    "Your password entry has been updated successfully.",
                ));
                Ok(updated)
            }
            Err(e) => Err(self.fail("Could not update password", e)),
        }
    }

    pub async fn delete(&mut self, id: &EntryId) -> Result<()> {
        match self.store.delete(id).await {
            Ok(()) => {
                self.apply(VaultAction::Deleted(id.clone()));
                self.notices.push(Notice::success(
                    "Password deleted",
                    "The password entry has been removed.",
                ));
                Ok(())
            }
            Err(e) => Err(self.fail("Could not delete password", e)),
        }
    }

    /// Record use of an entry. The local timestamp is taken once the store
    /// has confirmed, so it can trail the stored one slightly.
    pub async fn mark_used(&mut self, id: &EntryId) -> Result<()> {
        match self.store.mark_used(id).await {
            Ok(()) => {
                self.apply(VaultAction::MarkedUsed {
                    id: id.clone(),
                    at: Utc::now(),
                });
                self.notices.push(Notice::success(
                    "Marked as used",
                    "The last-used time has been updated.",
                ));
                Ok(())
            }
            Err(e) => Err(self.fail("Could not mark password as used", e)),
        }
    }

    fn apply(&mut self, action: VaultAction) {
        self.entries = reduce(&self.entries, action);
    }

    fn fail(&mut self, title: &str, err: VaultError) -> VaultError {
        warn!("{}: {}", title, err);
        self.notices.push(Notice::error(title, &err));
        err
    }
}
