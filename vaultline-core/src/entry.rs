//! Credential entry model: the stored record, its creation payload and
//! partial updates.

use crate::{Result, VaultError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of a stored entry, assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random identifier for stores that assign ids locally.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the authenticated user owning a set of entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialEntry {
    pub id: EntryId,
    pub owner_id: PrincipalId,
    pub title: String,
    pub username: String,
    pub password: String,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub category: Option<String>,
    pub favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

/// Fields supplied when adding an entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    pub title: String,
    pub username: String,
    pub password: String,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub category: Option<String>,
    pub favorite: bool,
}

impl NewEntry {
    pub fn new(
        title: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }

    /// Check required fields and normalize the optional ones.
    ///
    /// Title and username are trimmed; the password is kept verbatim but must
    /// contain something other than whitespace. Blank optional fields become
    /// `None`.
    pub fn validate(self) -> Result<Self> {
        let title = required("title", self.title)?;
        let username = required("username", self.username)?;
        if self.password.trim().is_empty() {
            return Err(VaultError::Validation("password is required".to_string()));
        }

        Ok(Self {
            title,
            username,
            password: self.password,
            url: optional(self.url),
            notes: optional(self.notes),
            category: optional(self.category),
            favorite: self.favorite,
        })
    }
}

/// Partial update of an entry. `None` leaves a field unchanged; for the
/// optional text fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub url: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub favorite: Option<bool>,
}

impl EntryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn url(mut self, url: Option<String>) -> Self {
        self.url = Some(url);
        self
    }

    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = Some(notes);
        self
    }

    pub fn category(mut self, category: Option<String>) -> Self {
        self.category = Some(category);
        self
    }

    pub fn favorite(mut self, favorite: bool) -> Self {
        self.favorite = Some(favorite);
        self
    }

    /// True when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.url.is_none()
            && self.notes.is_none()
            && self.category.is_none()
            && self.favorite.is_none()
    }

    /// Same rules as [`NewEntry::validate`], applied to supplied fields only.
    pub fn validate(self) -> Result<Self> {
        let title = self.title.map(|t| required("title", t)).transpose()?;
        let username = self.username.map(|u| required("username", u)).transpose()?;
        if matches!(&self.password, Some(p) if p.trim().is_empty()) {
            return Err(VaultError::Validation("password is required".to_string()));
        }

        Ok(Self {
            title,
            username,
            password: self.password,
            url: self.url.map(optional),
            notes: self.notes.map(optional),
            category: self.category.map(optional),
            favorite: self.favorite,
        })
    }

    /// Apply supplied fields to `entry`. Timestamps are left to the caller.
    pub fn apply_to(&self, entry: &mut CredentialEntry) {
        if let Some(title) = &self.title {
            entry.title = title.clone();
        }
        if let Some(username) = &self.username {
            entry.username = username.clone();
        }
        if let Some(password) = &self.password {
            entry.password = password.clone();
        }
        if let Some(url) = &self.url {
            entry.url = url.clone();
        }
        if let Some(notes) = &self.notes {
            entry.notes = notes.clone();
        }
        if let Some(category) = &self.category {
            entry.category = category.clone();
        }
        if let Some(favorite) = self.favorite {
            entry.favorite = favorite;
        }
    }
}

fn required(field: &str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(VaultError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> CredentialEntry {
        let now = Utc::now();
        CredentialEntry {
            id: EntryId::new("e1"),
            owner_id: PrincipalId::new("alice"),
            title: "GitHub".to_string(),
            username: "alice".to_string(),
            password: "hunter2".to_string(),
            url: Some("github.com".to_string()),
            notes: None,
            category: Some("work".to_string()),
            favorite: false,
            created_at: now,
            updated_at: now,
            last_used_at: None,
        }
    }

    #[test]
    fn test_new_entry_requires_title() {
        let result = NewEntry::new("   ", "alice", "secret").validate();
        assert!(matches!(result, Err(VaultError::Validation(_))));
    }

    #[test]
    fn test_new_entry_requires_username_and_password() {
        assert!(NewEntry::new("Mail", "", "secret").validate().is_err());
        assert!(NewEntry::new("Mail", "bob", "").validate().is_err());
    }

    #[test]
    fn test_new_entry_normalizes_optional_fields() {
        let entry = NewEntry::new(" Mail ", "bob", " pass ")
            .with_url("  ")
            .with_notes(" note ")
            .validate()
            .unwrap();

        assert_eq!(entry.title, "Mail");
        assert_eq!(entry.password, " pass ");
        assert_eq!(entry.url, None);
        assert_eq!(entry.notes, Some("note".to_string()));
        assert_eq!(entry.category, None);
    }

    #[test]
    fn test_patch_rejects_blank_required_field() {
        let result = EntryPatch::new().title("").validate();
        assert!(matches!(result, Err(VaultError::Validation(_))));
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let mut entry = sample_entry();
        let before = entry.clone();
        let patch = EntryPatch::new().validate().unwrap();
        assert!(patch.is_empty());

        patch.apply_to(&mut entry);
        assert_eq!(entry, before);
    }

    #[test]
    fn test_patch_applies_and_clears_fields() {
        let mut entry = sample_entry();
        EntryPatch::new()
            .title("GitHub Enterprise")
            .url(None)
            .favorite(true)
            .apply_to(&mut entry);

        assert_eq!(entry.title, "GitHub Enterprise");
        assert_eq!(entry.url, None);
        assert!(entry.favorite);
        assert_eq!(entry.category, Some("work".to_string()));
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&EntryId::new("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
        assert_ne!(EntryId::generate(), EntryId::generate());
    }
}
