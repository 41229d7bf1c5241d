//! Entry card - textual presentation of one entry.

use crate::entry::CredentialEntry;
use std::fmt;

const MASK: &str = "••••••••";

/// Display wrapper for an entry. The password is masked unless revealed;
/// the mask has a fixed width so it does not leak the length.
pub struct EntryCard<'a> {
    entry: &'a CredentialEntry,
    reveal: bool,
}

impl<'a> EntryCard<'a> {
    pub fn new(entry: &'a CredentialEntry) -> Self {
        Self {
            entry,
            reveal: false,
        }
    }

    pub fn reveal(mut self, reveal: bool) -> Self {
        self.reveal = reveal;
        self
    }

    pub fn password(&self) -> &str {
        if self.reveal {
            &self.entry.password
        } else {
            MASK
        }
    }

    /// Host part of the entry's url, if any.
    pub fn host(&self) -> Option<&str> {
        self.entry.url.as_deref().and_then(url_host)
    }
}

/// `https://user@www.example.com:8443/login?x` -> `www.example.com`
fn url_host(url: &str) -> Option<&str> {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    let host = authority.rsplit('@').next().unwrap_or(authority);
    let host = host.split(':').next().unwrap_or(host);

    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

impl fmt::Display for EntryCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entry = self.entry;
        let star = if entry.favorite { "★ " } else { "" };
        write!(f, "{}{}", star, entry.title)?;
        if let Some(category) = &entry.category {
            write!(f, " [{}]", category)?;
        }
        writeln!(f, "  ({})", entry.id)?;

        writeln!(f, "  username: {}", entry.username)?;
        writeln!(f, "  password: {}", self.password())?;
        if let Some(host) = self.host() {
            writeln!(f, "  site:     {}", host)?;
        }
        if let Some(notes) = &entry.notes {
            writeln!(f, "  notes:    {}", notes)?;
        }
        match entry.last_used_at {
            Some(at) => write!(f, "  last used {}", at.format("%Y-%m-%d %H:%M")),
            None => write!(f, "  never used"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{EntryId, PrincipalId};
    use chrono::Utc;

    fn entry() -> CredentialEntry {
        let now = Utc::now();
        CredentialEntry {
            id: EntryId::new("e1"),
            owner_id: PrincipalId::new("alice"),
            title: "GitHub".to_string(),
            username: "alice".to_string(),
            password: "hunter2".to_string(),
            url: Some("https://github.com/login".to_string()),
            notes: None,
            category: Some("work".to_string()),
            favorite: true,
            created_at: now,
            updated_at: now,
            last_used_at: None,
        }
    }

    #[test]
    fn test_password_masked_by_default() {
        let entry = entry();
        let text = EntryCard::new(&entry).to_string();
        assert!(!text.contains("hunter2"));
        assert!(text.contains(MASK));
        assert!(text.starts_with("★ GitHub [work]"));
        assert!(text.contains("site:     github.com"));
        assert!(text.ends_with("never used"));
    }

    #[test]
    fn test_reveal_shows_password() {
        let entry = entry();
        let card = EntryCard::new(&entry).reveal(true);
        assert_eq!(card.password(), "hunter2");
    }

    #[test]
    fn test_url_host() {
        assert_eq!(url_host("github.com"), Some("github.com"));
        assert_eq!(
            url_host("https://user@www.example.com:8443/a?b"),
            Some("www.example.com")
        );
        assert_eq!(url_host("https://"), None);
    }
}
