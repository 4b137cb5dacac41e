//! # Herodex
//!
//! A watchlist directory for superhero records over the public
//! SuperHero API.
//!
//! Herodex keeps an in-memory watchlist seeded from a fixed set of
//! subject ids, resolves searches watchlist-first with a remote
//! fallback, and exposes the directory through a CLI and a JSON HTTP
//! API for browser front-ends. Nothing is persisted: state lives for
//! the lifetime of the process.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌───────────────┐
//! │ SuperHero API │──▶│ Fetch Client │──▶│  Directory     │
//! │ id/all .json  │   │ absence-on-  │   │  store (in-    │
//! │               │   │ failure      │   │  memory)       │
//! └──────────────┘   └─────────────┘   └──────┬────────┘
//!                                             │
//!                          ┌──────────────────┤
//!                          ▼                  ▼
//!                     ┌──────────┐      ┌──────────┐
//!                     │   CLI    │      │   HTTP   │
//!                     │  (hdx)   │      │  (serve) │
//!                     └──────────┘      └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! hdx watchlist                 # load and print the default set
//! hdx search "bat"              # watchlist-first search
//! hdx show 70                   # full dossier for one subject
//! hdx add "Zzzax"               # remote search + add to watchlist
//! hdx serve                     # JSON API for a browser front-end
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Record types and display helpers |
//! | [`client`] | Remote fetch client (absence-on-failure) |
//! | [`roster`] | Default watchlist loading |
//! | [`search`] | Two-tier search resolution |
//! | [`state`] | Directory store, events, debounced search driver |
//! | [`server`] | JSON HTTP API |

pub mod add;
pub mod client;
pub mod config;
pub mod models;
pub mod roster;
pub mod search;
pub mod server;
pub mod show;
pub mod state;
pub mod watchlist;
