//! Demo data for the backend-less demo login.

use crate::auth::MemoryAuth;
use crate::entry::{CredentialEntry, EntryId, PrincipalId};
use crate::session::SessionSlot;
use crate::store::MemoryEntryStore;
use chrono::{Duration, Utc};

pub const DEMO_EMAIL: &str = "demo@vaultline.local";
pub const DEMO_PASSWORD: &str = "demo";
pub const DEMO_PRINCIPAL: &str = "demo-user";

const SAMPLES: &[(&str, &str, &str, Option<&str>, Option<&str>, bool)] = &[
    ("GitHub", "demo-dev", "gh-Xk29!pLm", Some("github.com"), Some("Work"), true),
    ("Gmail", "demo@gmail.com", "Secur3Mail#", Some("mail.google.com"), Some("Personal"), true),
    ("Netflix", "demo@example.com", "Str3am!ng", Some("netflix.com"), Some("Entertainment"), false),
    ("Amazon", "demo@example.com", "Sh0pp1ng$", Some("amazon.com"), Some("Shopping"), false),
    ("Bank", "demo-4821", "B@nkV4ult", None, Some("Finance"), false),
];

/// Sample entries owned by the demo principal, oldest first.
pub fn demo_entries() -> Vec<CredentialEntry> {
    let owner = PrincipalId::new(DEMO_PRINCIPAL);
    let now = Utc::now();
    let count = SAMPLES.len() as i64;

    SAMPLES
        .iter()
        .enumerate()
        .map(|(i, (title, username, password, url, category, favorite))| {
            let created_at = now - Duration::days(count - i as i64);
            CredentialEntry {
                id: EntryId::generate(),
                owner_id: owner.clone(),
                title: title.to_string(),
                username: username.to_string(),
                password: password.to_string(),
                url: url.map(str::to_string),
                notes: None,
                category: category.map(str::to_string),
                favorite: *favorite,
                created_at,
                updated_at: created_at,
                last_used_at: None,
            }
        })
        .collect()
}

/// Auth provider and seeded store wired to the same slot.
pub fn demo_backend(slot: SessionSlot) -> (MemoryAuth, MemoryEntryStore) {
    let auth = MemoryAuth::new().with_principal(
        DEMO_EMAIL,
        DEMO_PASSWORD,
        PrincipalId::new(DEMO_PRINCIPAL),
    );
    let store = MemoryEntryStore::seeded(slot, demo_entries());
    (auth, store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthGate, Credentials};
    use crate::store::EntryStore;
    use crate::vault::VaultView;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_demo_login_sees_seeded_entries_newest_first() {
        let slot = SessionSlot::new();
        let (auth, store) = demo_backend(slot.clone());
        let mut gate = AuthGate::resolve(Arc::new(auth), slot).await;

        gate.login(&Credentials::new(DEMO_EMAIL, DEMO_PASSWORD))
            .await
            .unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), SAMPLES.len());
        assert_eq!(listed[0].title, "Bank");
        assert!(listed
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
    }

    #[tokio::test]
    async fn test_demo_vault_lists_sample_categories() {
        let slot = SessionSlot::new();
        let (auth, store) = demo_backend(slot.clone());
        let mut gate = AuthGate::resolve(Arc::new(auth), slot).await;
        gate.login(&Credentials::new(DEMO_EMAIL, DEMO_PASSWORD))
            .await
            .unwrap();

        let mut view = VaultView::new(Arc::new(store));
        view.load().await.unwrap();
        assert_eq!(
            view.categories(),
            vec!["Entertainment", "Finance", "Personal", "Shopping", "Work"]
        );
    }
}
