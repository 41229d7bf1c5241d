//! Entry form - raw input for adding or editing one entry.

use crate::entry::{CredentialEntry, EntryPatch, NewEntry};
use crate::generator::{generate_password, PasswordGeneratorConfig};
use crate::Result;

/// Text inputs as typed by the user. Blank optional inputs mean "no value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub title: String,
    pub username: String,
    pub password: String,
    pub url: String,
    pub notes: String,
    pub category: String,
    pub favorite: bool,
}

impl EntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Form pre-filled for editing `entry`.
    pub fn from_entry(entry: &CredentialEntry) -> Self {
        Self {
            title: entry.title.clone(),
            username: entry.username.clone(),
            password: entry.password.clone(),
            url: entry.url.clone().unwrap_or_default(),
            notes: entry.notes.clone().unwrap_or_default(),
            category: entry.category.clone().unwrap_or_default(),
            favorite: entry.favorite,
        }
    }

    /// Fill the password input with a generated one.
    pub fn generate_password(&mut self, config: &PasswordGeneratorConfig) -> Result<()> {
        self.password = generate_password(config)?;
        Ok(())
    }

    /// Validated payload for adding a new entry.
    pub fn into_new_entry(self) -> Result<NewEntry> {
        NewEntry {
            title: self.title,
            username: self.username,
            password: self.password,
            url: Some(self.url),
            notes: Some(self.notes),
            category: Some(self.category),
            favorite: self.favorite,
        }
        .validate()
    }

    /// Validated patch carrying every field of the form.
    pub fn into_patch(self) -> Result<EntryPatch> {
        EntryPatch {
            title: Some(self.title),
            username: Some(self.username),
            password: Some(self.password),
            url: Some(Some(self.url)),
            notes: Some(Some(self.notes)),
            category: Some(Some(self.category)),
            favorite: Some(self.favorite),
        }
        .validate()
    }

    /// Validated patch holding only the fields that differ from `original`.
    pub fn changes_from(self, original: &CredentialEntry) -> Result<EntryPatch> {
        let full = self.into_patch()?;
        let mut patch = EntryPatch::new();

        if full.title.as_ref() != Some(&original.title) {
            patch.title = full.title;
        }
        if full.username.as_ref() != Some(&original.username) {
            patch.username = full.username;
        }
        if full.password.as_ref() != Some(&original.password) {
            patch.password = full.password;
        }
        if full.url.as_ref() != Some(&original.url) {
            patch.url = full.url;
        }
        if full.notes.as_ref() != Some(&original.notes) {
            patch.notes = full.notes;
        }
        if full.category.as_ref() != Some(&original.category) {
            patch.category = full.category;
        }
        if full.favorite != Some(original.favorite) {
            patch.favorite = full.favorite;
        }
        Ok(patch)
    }
}
