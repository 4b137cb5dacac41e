//! `hdx show` — print the full dossier for one subject.
//!
//! The detail-view counterpart: every descriptive field renders, with a
//! placeholder wherever the record is silent.

use anyhow::Result;

use crate::client::{ApiClient, HeroApi};
use crate::config::Config;
use crate::models::Hero;

pub async fn run_show(config: &Config, id: i64) -> Result<()> {
    let api = ApiClient::new(&config.api)?;
    let hero = match api.fetch_by_id(id).await {
        Some(hero) => hero,
        None => anyhow::bail!("subject not found: {}", id),
    };

    print_dossier(&hero);
    Ok(())
}

fn print_dossier(hero: &Hero) {
    println!("--- Subject #{} ---", hero.id);
    println!("name:      {}", hero.name);
    println!(
        "identity:  {}",
        hero.secret_identity().unwrap_or("Unknown Identity")
    );
    println!("status:    {}", hero.alignment_badge());
    println!("portrait:  {}", hero.portrait_url());
    println!();

    println!("--- Powerstats ---");
    for (label, value) in hero.powerstats.as_pairs() {
        println!("{:<14} {:>3}  {}", label, value, stat_bar(value));
    }
    println!();

    println!("--- Appearance ---");
    print_field("gender", hero.appearance.gender.as_deref());
    print_field("race", hero.appearance.race.as_deref());
    print_list("height", &hero.appearance.height);
    print_list("weight", &hero.appearance.weight);
    print_field("eye color", hero.appearance.eye_color.as_deref());
    print_field("hair color", hero.appearance.hair_color.as_deref());
    println!();

    println!("--- Biography ---");
    print_field("alter egos", hero.biography.alter_egos.as_deref());
    print_list("aliases", &hero.biography.aliases);
    print_field("born", hero.biography.place_of_birth.as_deref());
    print_field("first seen", hero.biography.first_appearance.as_deref());
    print_field("publisher", hero.biography.publisher.as_deref());
    println!();

    println!("--- Work ---");
    print_field("occupation", hero.work.occupation.as_deref());
    print_field("base", hero.work.base.as_deref());
    println!();

    println!("--- Connections ---");
    print_field("affiliation", hero.connections.group_affiliation.as_deref());
    print_field("relatives", hero.connections.relatives.as_deref());
}

fn print_field(label: &str, value: Option<&str>) {
    let value = value.filter(|v| !v.is_empty()).unwrap_or("Unknown");
    println!("{:<12} {}", format!("{}:", label), value);
}

fn print_list(label: &str, values: &[String]) {
    if values.is_empty() {
        print_field(label, None);
    } else {
        println!("{:<12} {}", format!("{}:", label), values.join(" / "));
    }
}

/// One `#` per five points, clamped to the nominal 0..=100 range.
fn stat_bar(value: i64) -> String {
    "#".repeat((value.clamp(0, 100) / 5) as usize)
}
