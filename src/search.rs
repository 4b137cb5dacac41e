//! Two-tier search resolution.
//!
//! A query resolves against the watchlist first and the remote
//! collection second:
//!
//! 1. Empty or whitespace-only query → the watchlist itself. No remote
//!    call.
//! 2. Otherwise, filter the watchlist by case-insensitive substring on
//!    `name` or the civilian identity. A non-empty local match is the
//!    final result — the remote collection is never consulted, even if
//!    it would surface more matches.
//! 3. Only when the local match is empty, fetch the entire remote
//!    collection and filter it by `name` only.
//!
//! The watchlist tier matches two fields while the remote tier matches
//! one; that asymmetry is long-standing observed behavior and is kept
//! as-is (see DESIGN.md).

use anyhow::Result;

use crate::client::{ApiClient, HeroApi};
use crate::config::Config;
use crate::models::Hero;
use crate::roster;
use crate::watchlist::print_card;

/// The result collection of a resolved query, tagged with the tier
/// that produced it.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Empty query: the watchlist itself.
    Watchlist(Vec<Hero>),
    /// Non-empty local match over the watchlist.
    Local(Vec<Hero>),
    /// Remote fallback result; may be empty.
    Remote(Vec<Hero>),
}

impl Resolution {
    pub fn provenance(&self) -> &'static str {
        match self {
            Resolution::Watchlist(_) => "watchlist",
            Resolution::Local(_) => "local match",
            Resolution::Remote(_) => "remote",
        }
    }

    pub fn into_results(self) -> Vec<Hero> {
        match self {
            Resolution::Watchlist(heroes)
            | Resolution::Local(heroes)
            | Resolution::Remote(heroes) => heroes,
        }
    }
}

/// Filter the watchlist by case-insensitive substring on `name` or the
/// civilian identity. An absent identity matches as the empty string.
pub fn local_matches(watchlist: &[Hero], query: &str) -> Vec<Hero> {
    let needle = query.to_lowercase();
    watchlist
        .iter()
        .filter(|hero| {
            hero.name.to_lowercase().contains(&needle)
                || hero
                    .biography
                    .full_name
                    .as_deref()
                    .unwrap_or("")
                    .to_lowercase()
                    .contains(&needle)
        })
        .cloned()
        .collect()
}

/// Fetch the entire remote collection and filter it by `name` substring.
/// An empty query short-circuits to no results without a fetch.
pub async fn remote_search(api: &dyn HeroApi, query: &str) -> Vec<Hero> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    api.fetch_all()
        .await
        .into_iter()
        .filter(|hero| hero.name.to_lowercase().contains(&needle))
        .collect()
}

/// Resolve a query against the watchlist with remote fallback.
///
/// Only emptiness is decided on the trimmed query; the filters receive
/// the query verbatim, surrounding whitespace included.
pub async fn resolve(api: &dyn HeroApi, watchlist: &[Hero], query: &str) -> Resolution {
    if query.trim().is_empty() {
        return Resolution::Watchlist(watchlist.to_vec());
    }

    let local = local_matches(watchlist, query);
    if !local.is_empty() {
        return Resolution::Local(local);
    }

    Resolution::Remote(remote_search(api, query).await)
}

/// CLI entry point — loads the watchlist, resolves the query, prints.
pub async fn run_search(config: &Config, query: &str) -> Result<()> {
    let api = ApiClient::new(&config.api)?;
    let watchlist = roster::load_default_set(&api, &config.watchlist.default_ids).await;

    let resolution = resolve(&api, &watchlist, query).await;
    let provenance = resolution.provenance();
    let results = resolution.into_results();

    if results.is_empty() {
        println!("No subjects found.");
        return Ok(());
    }

    println!("{} subject(s) found ({}):", results.len(), provenance);
    println!();
    for hero in &results {
        print_card(hero);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::InMemoryApi;

    fn hero(id: i64, name: &str) -> Hero {
        Hero {
            id,
            name: name.to_string(),
            ..Hero::default()
        }
    }

    fn hero_with_identity(id: i64, name: &str, identity: &str) -> Hero {
        let mut h = hero(id, name);
        h.biography.full_name = Some(identity.to_string());
        h
    }

    fn watchlist() -> Vec<Hero> {
        vec![
            hero_with_identity(1, "Batman", "Bruce Wayne"),
            hero_with_identity(2, "Superman", "Clark Kent"),
        ]
    }

    #[tokio::test]
    async fn test_empty_query_returns_watchlist_without_fetch() {
        let api = InMemoryApi::new(vec![hero(5, "Zzzax")]);
        let wl = watchlist();

        let resolution = resolve(&api, &wl, "   ").await;
        assert!(matches!(resolution, Resolution::Watchlist(_)));
        let results = resolution.into_results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, 1);
        assert_eq!(results[1].id, 2);
        assert_eq!(api.fetch_all_calls(), 0);
    }

    #[tokio::test]
    async fn test_local_hit_short_circuits_remote() {
        let api = InMemoryApi::new(vec![hero(5, "Batwoman")]);
        let resolution = resolve(&api, &watchlist(), "bat").await;

        assert!(matches!(resolution, Resolution::Local(_)));
        let results = resolution.into_results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 1);
        // Batwoman would also match remotely; the local hit wins anyway.
        assert_eq!(api.fetch_all_calls(), 0);
    }

    #[tokio::test]
    async fn test_identity_counts_as_local_match() {
        let api = InMemoryApi::new(Vec::new());
        let results = resolve(&api, &watchlist(), "kent").await.into_results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 2);
        assert_eq!(api.fetch_all_calls(), 0);
    }

    #[tokio::test]
    async fn test_remote_fallback_fetches_once() {
        let api = InMemoryApi::new(vec![hero(5, "Zzzax"), hero(6, "Zoom")]);
        let resolution = resolve(&api, &watchlist(), "zzz").await;

        assert!(matches!(resolution, Resolution::Remote(_)));
        let results = resolution.into_results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 5);
        assert_eq!(api.fetch_all_calls(), 1);
    }

    #[tokio::test]
    async fn test_remote_filter_matches_name_only() {
        // The remote record matches on identity, not name: the remote
        // tier ignores it.
        let api = InMemoryApi::new(vec![hero_with_identity(7, "Nobody", "Zzz Wayne")]);
        let results = resolve(&api, &[], "zzz").await.into_results();
        assert!(results.is_empty());
        assert_eq!(api.fetch_all_calls(), 1);
    }

    #[tokio::test]
    async fn test_remote_miss_yields_empty() {
        let api = InMemoryApi::new(vec![hero(5, "Zzzax")]);
        let results = resolve(&api, &watchlist(), "qqq").await.into_results();
        assert!(results.is_empty());
        assert_eq!(api.fetch_all_calls(), 1);
    }

    #[tokio::test]
    async fn test_matching_is_case_insensitive() {
        let api = InMemoryApi::new(Vec::new());
        let results = resolve(&api, &watchlist(), "BAT").await.into_results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Batman");
    }

    #[tokio::test]
    async fn test_remote_search_empty_query_is_empty_without_fetch() {
        let api = InMemoryApi::new(vec![hero(5, "Zzzax")]);
        assert!(remote_search(&api, "  ").await.is_empty());
        assert_eq!(api.fetch_all_calls(), 0);
    }

    #[test]
    fn test_local_matches_absent_identity_is_empty_string() {
        let wl = vec![hero(9, "Phantom")];
        assert!(local_matches(&wl, "wayne").is_empty());
        assert_eq!(local_matches(&wl, "phan").len(), 1);
    }
}
