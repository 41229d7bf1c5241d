use anyhow::{bail, Result};
use std::io::{self, BufRead, Write};
use vaultline_core::{
    CredentialEntry, EmptyState, EntryCard, EntryId, NoticeLevel, VaultView,
};

/// Print and drain pending notices. Errors go to stderr.
pub fn print_notices(view: &mut VaultView) {
    for notice in view.take_notices() {
        match notice.level {
            NoticeLevel::Success => println!("✓ {}: {}", notice.title, notice.description),
            NoticeLevel::Error => eprintln!("✗ {}: {}", notice.title, notice.description),
        }
    }
}

pub fn print_entries(view: &VaultView, reveal: bool) {
    let shown = view.filtered();
    if shown.is_empty() {
        match view.empty_state() {
            Some(EmptyState::NoMatches { query }) if !query.is_empty() => {
                println!("No passwords found matching \"{}\".", query)
            }
            Some(EmptyState::NoMatches { .. }) => println!("No passwords match the filters."),
            _ => println!("No passwords yet. Add one with `vaultline add`."),
        }
        return;
    }

    for entry in shown {
        println!("{}\n", EntryCard::new(entry).reveal(reveal));
    }
}

pub fn print_categories(view: &VaultView) {
    let categories = view.categories();
    if categories.is_empty() {
        println!("No categories yet.");
    }
    for category in categories {
        println!("{}", category);
    }
}

/// Resolve a full id or an unambiguous id prefix against the loaded entries.
pub fn find_entry<'a>(view: &'a VaultView, id: &str) -> Result<&'a CredentialEntry> {
    if let Some(entry) = view.find(&EntryId::new(id)) {
        return Ok(entry);
    }

    let mut candidates = view
        .entries()
        .iter()
        .filter(|e| e.id.as_str().starts_with(id));
    match (candidates.next(), candidates.next()) {
        (Some(entry), None) => Ok(entry),
        (Some(_), Some(_)) => bail!("Id prefix '{}' matches more than one entry", id),
        (None, _) => bail!("No entry with id '{}'", id),
    }
}

pub fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

pub fn prompt_line(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
