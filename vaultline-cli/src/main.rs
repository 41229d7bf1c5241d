//! Vaultline CLI - command-line front end for a hosted password vault

mod backend;
mod output;

use anyhow::{bail, Result};
use backend::Backend;
use clap::{Parser, Subcommand};
use rpassword::prompt_password;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vaultline_core::{
    generate_passphrase, generate_password, AuthState, Credentials, EntryForm,
    PasswordGeneratorConfig, Screen,
};

#[derive(Parser)]
#[command(name = "vaultline")]
#[command(about = "Hosted password vault from the command line", long_about = None)]
struct Cli {
    /// Use the built-in demo account and sample data (nothing is saved)
    #[arg(long, global = true)]
    demo: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Show informational log output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in to the vault
    Login {
        #[arg(long)]
        email: Option<String>,
    },

    /// Create an account and sign in
    Signup {
        #[arg(long)]
        email: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show whether a session is active
    Status,

    /// List entries
    List {
        /// Show passwords in plain text
        #[arg(long)]
        show_passwords: bool,

        /// Only favorites
        #[arg(long)]
        favorites: bool,

        /// Only entries in this category
        #[arg(long)]
        category: Option<String>,

        /// Print the categories in use instead of the entries
        #[arg(long, conflicts_with_all = ["show_passwords", "favorites", "category"])]
        categories: bool,
    },

    /// Search entries by title, username or url
    Search {
        query: String,

        #[arg(long)]
        show_passwords: bool,
    },

    /// Show one entry
    Show {
        /// Entry id or unique id prefix
        id: String,

        /// Show the password in plain text
        #[arg(long)]
        reveal: bool,
    },

    /// Add a new entry
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        username: String,

        /// Password (will prompt if neither this nor --generate is given)
        #[arg(long, conflicts_with = "generate")]
        password: Option<String>,

        /// Use a generated password
        #[arg(long)]
        generate: bool,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        favorite: bool,
    },

    /// Change fields of an existing entry
    Edit {
        /// Entry id or unique id prefix
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        username: Option<String>,

        #[arg(long, conflicts_with = "generate")]
        password: Option<String>,

        /// Replace the password with a generated one
        #[arg(long)]
        generate: bool,

        #[arg(long, conflicts_with = "clear_url")]
        url: Option<String>,

        #[arg(long)]
        clear_url: bool,

        #[arg(long, conflicts_with = "clear_notes")]
        notes: Option<String>,

        #[arg(long)]
        clear_notes: bool,

        #[arg(long, conflicts_with = "clear_category")]
        category: Option<String>,

        #[arg(long)]
        clear_category: bool,

        /// Set or unset the favorite flag
        #[arg(long)]
        favorite: Option<bool>,
    },

    /// Delete an entry
    Delete {
        /// Entry id or unique id prefix
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Record that an entry was just used
    Use {
        /// Entry id or unique id prefix
        id: String,
    },

    /// Generate a password without storing it
    Generate {
        #[arg(short, long, default_value_t = 16)]
        length: usize,

        #[arg(long)]
        no_symbols: bool,

        #[arg(long)]
        no_uppercase: bool,

        #[arg(long)]
        no_digits: bool,

        /// Generate a passphrase of this many words instead
        #[arg(long)]
        words: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Generation needs no backend.
    if let Commands::Generate {
        length,
        no_symbols,
        no_uppercase,
        no_digits,
        words,
    } = cli.command
    {
        let config = generator_config(length, no_symbols, no_uppercase, no_digits);
        return print_generated(&config, words);
    }

    let mut backend = if cli.demo {
        info!("Using demo backend");
        Backend::demo().await?
    } else {
        Backend::connect(cli.config.as_deref()).await?
    };

    run(&mut backend, cli.command).await
}

fn generator_config(
    length: usize,
    no_symbols: bool,
    no_uppercase: bool,
    no_digits: bool,
) -> PasswordGeneratorConfig {
    PasswordGeneratorConfig::default()
        .length(length)
        .with_symbols(!no_symbols)
        .with_uppercase(!no_uppercase)
        .with_digits(!no_digits)
}

fn print_generated(config: &PasswordGeneratorConfig, words: Option<usize>) -> Result<()> {
    let generated = match words {
        Some(count) => generate_passphrase(count, "-")?,
        None => generate_password(config)?,
    };
    println!("{}", generated);
    Ok(())
}

fn read_credentials(email: Option<String>) -> Result<Credentials> {
    let email = match email {
        Some(email) => email,
        None => output::prompt_line("Email")?,
    };
    let password = prompt_password("Password: ")?;
    Ok(Credentials::new(email, password))
}

async fn run(backend: &mut Backend, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email } => {
            let credentials = read_credentials(email)?;
            let session = backend.gate.login(&credentials).await?;
            println!(
                "Signed in as {}",
                session.email.as_deref().unwrap_or(session.principal_id.as_str())
            );
        }
        Commands::Signup { email } => {
            let credentials = read_credentials(email)?;
            let confirm = prompt_password("Confirm password: ")?;
            if confirm != credentials.password {
                bail!("Passwords do not match");
            }
            let session = backend.gate.register(&credentials).await?;
            println!("Account created for {}", session.principal_id);
        }
        Commands::Logout => {
            backend.gate.logout().await;
            println!("Signed out");
        }
        Commands::Status => match (backend.gate.screen(), backend.gate.state()) {
            (Screen::Vault, AuthState::Authenticated(session)) => {
                println!("Signed in as {}", session.principal_id);
                if let Some(email) = &session.email {
                    println!("  email:   {}", email);
                }
                if let Some(expires_at) = session.expires_at {
                    println!("  expires: {}", expires_at.format("%Y-%m-%d %H:%M UTC"));
                }
            }
            _ => println!("Not signed in"),
        },
        Commands::List {
            show_passwords,
            favorites,
            category,
            categories,
        } => {
            let mut view = backend.open_vault().await?;
            if categories {
                output::print_categories(&view);
                return Ok(());
            }
            view.set_favorites_only(favorites);
            view.set_category(category);
            output::print_entries(&view, show_passwords);
        }
        Commands::Search {
            query,
            show_passwords,
        } => {
            let mut view = backend.open_vault().await?;
            view.set_query(query);
            output::print_entries(&view, show_passwords);
        }
        Commands::Show { id, reveal } => {
            let view = backend.open_vault().await?;
            let entry = output::find_entry(&view, &id)?;
            println!("{}", vaultline_core::EntryCard::new(entry).reveal(reveal));
        }
        Commands::Add {
            title,
            username,
            password,
            generate,
            url,
            notes,
            category,
            favorite,
        } => {
            let mut form = EntryForm {
                title,
                username,
                url: url.unwrap_or_default(),
                notes: notes.unwrap_or_default(),
                category: category.unwrap_or_default(),
                favorite,
                ..EntryForm::new()
            };
            match password {
                Some(password) => form.password = password,
                None if generate => form.generate_password(&PasswordGeneratorConfig::default())?,
                None => form.password = prompt_password("Password: ")?,
            }
            let entry = form.into_new_entry()?;

            let mut view = backend.open_vault().await?;
            let added = view.add(entry).await;
            output::print_notices(&mut view);
            let added = added?;
            println!("{}", vaultline_core::EntryCard::new(&added).reveal(generate));
        }
        Commands::Edit {
            id,
            title,
            username,
            password,
            generate,
            url,
            clear_url,
            notes,
            clear_notes,
            category,
            clear_category,
            favorite,
        } => {
            let mut view = backend.open_vault().await?;
            let original = output::find_entry(&view, &id)?.clone();

            let mut form = EntryForm::from_entry(&original);
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(username) = username {
                form.username = username;
            }
            if let Some(password) = password {
                form.password = password;
            }
            if generate {
                form.generate_password(&PasswordGeneratorConfig::default())?;
            }
            if let Some(url) = url {
                form.url = url;
            }
            if clear_url {
                form.url.clear();
            }
            if let Some(notes) = notes {
                form.notes = notes;
            }
            if clear_notes {
                form.notes.clear();
            }
            if let Some(category) = category {
                form.category = category;
            }
            if clear_category {
                form.category.clear();
            }
            if let Some(favorite) = favorite {
                form.favorite = favorite;
            }

            let patch = form.changes_from(&original)?;
            let updated = view.edit(&original.id, patch).await;
            output::print_notices(&mut view);
            let updated = updated?;
            println!("{}", vaultline_core::EntryCard::new(&updated).reveal(generate));
        }
        Commands::Delete { id, yes } => {
            let mut view = backend.open_vault().await?;
            let entry = output::find_entry(&view, &id)?.clone();

            if !yes && !output::confirm(&format!("Delete \"{}\"?", entry.title))? {
                println!("Cancelled");
                return Ok(());
            }

            let deleted = view.delete(&entry.id).await;
            output::print_notices(&mut view);
            deleted?;
        }
        Commands::Use { id } => {
            let mut view = backend.open_vault().await?;
            let entry_id = output::find_entry(&view, &id)?.id.clone();

            let used = view.mark_used(&entry_id).await;
            output::print_notices(&mut view);
            used?;
        }
        Commands::Generate {
            length,
            no_symbols,
            no_uppercase,
            no_digits,
            words,
        } => {
            let config = generator_config(length, no_symbols, no_uppercase, no_digits);
            print_generated(&config, words)?;
        }
    }

    Ok(())
}
