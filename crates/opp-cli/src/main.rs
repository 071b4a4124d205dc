//! `opp` — command-line shell for the OpenPassPhrase client.
//!
//! Thin UI glue: every invocation logs in, spawns a session against the
//! server, performs one operation, waits for the optimistic state to
//! settle, and renders the category tree. All state logic lives in
//! `opp-store`; all side effects in `opp-client`.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use opp_client::{ClientConfig, HttpBackend, Session};
use opp_store::{Item, SecretPhrase, Store};

/// OpenPassPhrase — your categorized credentials, from the terminal.
#[derive(Parser)]
#[command(
    name = "opp",
    version,
    about = "OpenPassPhrase CLI — browse and manage your secret items",
    long_about = None
)]
struct Cli {
    /// Server base URL.
    #[arg(long, env = "OPP_URL", default_value = "http://127.0.0.1:5000")]
    server: String,

    /// Account username.
    #[arg(long, short, env = "OPP_USERNAME")]
    username: String,

    /// Account password.
    #[arg(long, short, env = "OPP_PASSWORD", hide_env_values = true)]
    password: String,

    /// Secret passphrase used server-side to decrypt your data.
    #[arg(long, env = "OPP_PHRASE", hide_env_values = true)]
    phrase: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the category tree with all items.
    Show {
        /// Print stored passwords instead of masking them.
        #[arg(long, default_value = "false")]
        reveal: bool,
    },
    /// Category operations.
    Category {
        #[command(subcommand)]
        action: CategoryCommands,
    },
    /// Item operations.
    Item {
        #[command(subcommand)]
        action: ItemCommands,
    },
    /// Change the secret passphrase for this session and reload.
    Phrase {
        /// The new passphrase.
        secret: String,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// Create a category.
    Add { name: String },
    /// Rename a category.
    Rename { id: i64, name: String },
    /// Remove a category.
    Rm {
        id: i64,
        /// Also delete the items filed under it (default: re-file them as
        /// unfiled).
        #[arg(long, default_value = "false")]
        cascade: bool,
    },
}

#[derive(Subcommand)]
enum ItemCommands {
    /// Create an item.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        url: String,
        #[arg(long, default_value = "")]
        account: String,
        #[arg(long, default_value = "")]
        password: String,
        #[arg(long, default_value = "")]
        blob: String,
        /// Category to file the item under (default: unfiled).
        #[arg(long)]
        category: Option<i64>,
    },
    /// Remove an item.
    Rm { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = ClientConfig {
        base_url: cli.server.clone(),
        phrase: cli.phrase.map(SecretPhrase::new),
        ..ClientConfig::default()
    };
    let backend = Arc::new(HttpBackend::new(config)?);

    backend
        .login(&cli.username, &cli.password)
        .await
        .context("login failed")?;

    let session = Session::new(Store::new(), backend);
    session.load();
    session.settled().await;

    let mut reveal = false;
    match cli.command {
        Commands::Show { reveal: r } => reveal = r,

        Commands::Category { action } => match action {
            CategoryCommands::Add { name } => {
                session.add_category(name.clone());
                session.settled().await;
                let confirmed = session
                    .categories()
                    .iter()
                    .find(|c| c.name == name && c.id.is_some())
                    .map(|c| c.id);
                match confirmed {
                    Some(Some(id)) => println!("added category {name:?} (#{id})"),
                    _ => bail!("could not add category {name:?}"),
                }
            }
            CategoryCommands::Rename { id, name } => {
                if session.rename_category(id, name.clone()).is_none() {
                    bail!("no category #{id}");
                }
                session.settled().await;
                let renamed = session
                    .categories()
                    .iter()
                    .any(|c| c.id == Some(id) && c.name == name);
                if !renamed {
                    bail!("could not rename category #{id}");
                }
                println!("renamed category #{id} to {name:?}");
            }
            CategoryCommands::Rm { id, cascade } => {
                if session.remove_category(id, cascade).is_none() {
                    bail!("no category #{id}");
                }
                session.settled().await;
                if session.categories().iter().any(|c| c.id == Some(id)) {
                    bail!("could not remove category #{id}");
                }
                println!("removed category #{id}");
            }
        },

        Commands::Item { action } => match action {
            ItemCommands::Add {
                name,
                url,
                account,
                password,
                blob,
                category,
            } => {
                session.add_item(Item {
                    name: name.clone(),
                    url,
                    account,
                    password,
                    blob,
                    category_id: category,
                    ..Item::default()
                });
                session.settled().await;
                let confirmed = session
                    .snapshot()
                    .items
                    .items
                    .iter()
                    .any(|i| i.name == name && i.id.is_some());
                if !confirmed {
                    bail!("could not add item {name:?}");
                }
                println!("added item {name:?}");
            }
            ItemCommands::Rm { id } => {
                if session.remove_item(id).is_none() {
                    bail!("no item #{id}");
                }
                session.settled().await;
                if session.snapshot().items.items.iter().any(|i| i.id == Some(id)) {
                    bail!("could not remove item #{id}");
                }
                println!("removed item #{id}");
            }
        },

        Commands::Phrase { secret } => {
            session.change_secret_phrase(SecretPhrase::new(secret));
            // The reload is dispatched by the effect layer; give it a beat
            // to start before waiting for it to settle.
            tokio::time::sleep(Duration::from_millis(200)).await;
            session.settled().await;
            println!("passphrase updated; data reloaded");
        }
    }

    render(&session, reveal);
    Ok(())
}

fn render(session: &Session, reveal: bool) {
    for view in session.category_items() {
        let id = view
            .id
            .map_or_else(|| "pending".to_owned(), |id| format!("#{id}"));
        println!("{} ({id})", view.name);
        for item in &view.items {
            println!("  {}", item_line(item, reveal));
        }
    }

    let unfiled = session.unfiled_items();
    if !unfiled.is_empty() {
        println!("(unfiled)");
        for item in &unfiled {
            println!("  {}", item_line(item, reveal));
        }
    }
}

fn item_line(item: &Item, reveal: bool) -> String {
    let mut line = item.name.clone();
    if !item.account.is_empty() {
        line.push_str(&format!("  {}", item.account));
    }
    if !item.url.is_empty() {
        line.push_str(&format!("  {}", item.url));
    }
    if !item.password.is_empty() {
        if reveal {
            line.push_str(&format!("  {}", item.password));
        } else {
            line.push_str("  ••••••");
        }
    }
    line
}
