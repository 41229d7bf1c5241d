//! Row adapter between [`CredentialEntry`] and the backend table layout.
//!
//! Column names live here and nowhere else. Rows written by older schema
//! revisions may lack `favorite`, `category` or `last_used`; those read back
//! as their defaults.

use crate::entry::{CredentialEntry, EntryId, EntryPatch, NewEntry, PrincipalId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const COL_ID: &str = "id";
pub const COL_OWNER: &str = "user_id";
pub const COL_CREATED_AT: &str = "created_at";

/// A row as returned by the table API.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryRow {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub favorite: Option<bool>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_used: Option<DateTime<Utc>>,
}

impl From<EntryRow> for CredentialEntry {
    fn from(row: EntryRow) -> Self {
        // Rows that never recorded an update fall back to their creation time.
        let updated_at = row
            .updated_at
            .map(|at| at.max(row.created_at))
            .unwrap_or(row.created_at);

        CredentialEntry {
            id: EntryId::new(row.id),
            owner_id: PrincipalId::new(row.user_id),
            title: row.title,
            username: row.username,
            password: row.password,
            url: row.url.filter(|u| !u.is_empty()),
            notes: row.notes.filter(|n| !n.is_empty()),
            category: row.category.filter(|c| !c.is_empty()),
            favorite: row.favorite.unwrap_or(false),
            created_at: row.created_at,
            updated_at,
            last_used_at: row.last_used,
        }
    }
}

/// Body of an insert. The backend assigns `id`.
#[derive(Debug, Clone, Serialize)]
pub struct InsertRow {
    pub user_id: String,
    pub title: String,
    pub username: String,
    pub password: String,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub category: Option<String>,
    pub favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InsertRow {
    pub fn new(owner: &PrincipalId, entry: NewEntry, now: DateTime<Utc>) -> Self {
        Self {
            user_id: owner.as_str().to_string(),
            title: entry.title,
            username: entry.username,
            password: entry.password,
            url: entry.url,
            notes: entry.notes,
            category: entry.category,
            favorite: entry.favorite,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of a partial update; absent fields are not sent at all.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PatchRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
}

impl PatchRow {
    /// Edit of the supplied fields, stamping `updated_at`.
    pub fn edit(patch: EntryPatch, now: DateTime<Utc>) -> Self {
        Self {
            title: patch.title,
            username: patch.username,
            password: patch.password,
            url: patch.url,
            notes: patch.notes,
            category: patch.category,
            favorite: patch.favorite,
            updated_at: Some(now),
            last_used: None,
        }
    }

    /// Touch `last_used` only.
    pub fn used(now: DateTime<Utc>) -> Self {
        Self {
            last_used: Some(now),
            ..Self::default()
        }
    }
}

/// PostgREST equality filter value.
pub fn eq(value: &str) -> String {
    format!("eq.{}", value)
}
