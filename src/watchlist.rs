//! `hdx watchlist` — load the default set and print its subjects.

use anyhow::Result;

use crate::client::ApiClient;
use crate::config::Config;
use crate::models::Hero;
use crate::roster;

pub async fn run_watchlist(config: &Config) -> Result<()> {
    let api = ApiClient::new(&config.api)?;
    let heroes = roster::load_default_set(&api, &config.watchlist.default_ids).await;

    if heroes.is_empty() {
        println!("No subjects found.");
        return Ok(());
    }

    println!("{} subject(s) in watchlist:", heroes.len());
    println!();
    for hero in &heroes {
        print_card(hero);
    }

    Ok(())
}

/// One card per subject: the list-view counterpart.
pub(crate) fn print_card(hero: &Hero) {
    println!("#{:<6} {}", hero.id, hero.name);
    println!(
        "        identity: {}",
        hero.secret_identity().unwrap_or("Unknown Identity")
    );
    println!("        power:    {}", hero.powerstats.main_power());
    println!("        status:   {}", hero.alignment_badge());
    println!("        image:    {}", hero.thumb_url());
    println!();
}
