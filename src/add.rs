//! `hdx add` — search the remote collection and add a subject to the
//! watchlist.
//!
//! The add flow searches on explicit trigger (no debounce), lets the
//! caller pick a result, and appends it unless the id is already
//! listed. State is in-memory only, so the command prints the updated
//! watchlist as its outcome.

use anyhow::Result;

use crate::client::ApiClient;
use crate::config::Config;
use crate::roster;
use crate::search;
use crate::state::{Directory, Event};
use crate::watchlist::print_card;

pub async fn run_add(config: &Config, name: &str, pick: Option<usize>) -> Result<()> {
    let api = ApiClient::new(&config.api)?;

    let results = search::remote_search(&api, name).await;
    if results.is_empty() {
        println!("No subjects found matching the query.");
        return Ok(());
    }

    // Several candidates and no pick: list them and let the caller rerun.
    if results.len() > 1 && pick.is_none() {
        println!("{} result(s). Rerun with --pick <n> to choose:", results.len());
        println!();
        for (i, hero) in results.iter().enumerate() {
            println!(
                "{:>3}. {} ({})",
                i + 1,
                hero.name,
                hero.secret_identity().unwrap_or("Unknown Identity")
            );
        }
        return Ok(());
    }

    let index = pick.unwrap_or(1);
    let hero = match results.get(index.wrapping_sub(1)) {
        Some(hero) => hero.clone(),
        None => anyhow::bail!(
            "--pick {} is out of range: {} result(s)",
            index,
            results.len()
        ),
    };

    let defaults = roster::load_default_set(&api, &config.watchlist.default_ids).await;
    let mut directory = Directory::new();
    directory.apply(Event::DefaultSetLoaded(defaults));

    let before = directory.watchlist().len();
    directory.apply(Event::SubjectAdded(hero.clone()));

    if directory.watchlist().len() > before {
        println!("Added {} to the watchlist.", hero.name);
    } else {
        println!("{} is already on the watchlist.", hero.name);
    }
    println!();

    println!("{} subject(s) in watchlist:", directory.watchlist().len());
    println!();
    for listed in directory.watchlist() {
        print_card(listed);
    }

    Ok(())
}
