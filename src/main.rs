//! # Herodex CLI (`hdx`)
//!
//! The `hdx` binary is the primary interface for Herodex. It provides
//! commands for listing the default watchlist, searching the directory,
//! printing subject dossiers, running the add flow, and starting the
//! JSON HTTP API.
//!
//! ## Usage
//!
//! ```bash
//! hdx --config ./config/hdx.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `hdx watchlist` | Load the default set and print its subjects |
//! | `hdx search "<query>"` | Watchlist-first search with remote fallback |
//! | `hdx show <id>` | Print the full dossier for one subject |
//! | `hdx add "<name>"` | Search the remote collection and add a subject |
//! | `hdx serve` | Start the JSON HTTP API |
//!
//! All commands work without a config file; the built-in defaults point
//! at the public SuperHero API.

mod add;
mod client;
mod config;
mod models;
mod roster;
mod search;
mod server;
mod show;
mod state;
mod watchlist;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Herodex — a watchlist directory for superhero records.
///
/// All commands accept a `--config` flag pointing to a TOML
/// configuration file. See `config/hdx.example.toml` for a full
/// example; a missing file falls back to built-in defaults.
#[derive(Parser)]
#[command(
    name = "hdx",
    about = "Herodex — a watchlist directory for superhero records",
    version,
    long_about = "Herodex keeps an in-memory watchlist of superhero records sourced from the \
    public SuperHero API, resolves searches watchlist-first with a remote fallback, and exposes \
    the directory through this CLI and a JSON HTTP API for browser front-ends."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/hdx.toml`. A missing file is fine — the
    /// built-in defaults are used instead.
    #[arg(long, global = true, default_value = "./config/hdx.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Load the default watchlist and print its subjects.
    ///
    /// Fetches the configured subject ids concurrently; records that
    /// cannot be fetched are dropped. The surviving subjects print in
    /// id-list order.
    Watchlist,

    /// Search the directory.
    ///
    /// Resolves against the watchlist first (name or civilian
    /// identity); only when nothing matches locally is the full remote
    /// collection fetched and filtered by name.
    Search {
        /// The search query string.
        query: String,
    },

    /// Print the full dossier for one subject.
    ///
    /// Fetches the record and prints powerstats, appearance, biography,
    /// work, and connections, substituting placeholders for absent
    /// fields.
    Show {
        /// Subject id.
        id: i64,
    },

    /// Search the remote collection and add a subject to the watchlist.
    ///
    /// Runs an immediate (non-debounced) remote search by name. With a
    /// single result the subject is added directly; with several, the
    /// candidates are listed for `--pick`. Adding an id that is already
    /// listed is a no-op.
    Add {
        /// Subject name to search for.
        name: String,

        /// Choose the n-th result (1-based) when the search returns
        /// several.
        #[arg(long)]
        pick: Option<usize>,
    },

    /// Start the JSON HTTP API.
    ///
    /// Binds to the address configured in `[server].bind` and serves
    /// the directory to browser front-ends, including the debounced
    /// query stream.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Watchlist => {
            watchlist::run_watchlist(&cfg).await?;
        }
        Commands::Search { query } => {
            search::run_search(&cfg, &query).await?;
        }
        Commands::Show { id } => {
            show::run_show(&cfg, id).await?;
        }
        Commands::Add { name, pick } => {
            add::run_add(&cfg, &name, pick).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
