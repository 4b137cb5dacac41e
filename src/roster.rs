//! Default watchlist loading.
//!
//! The watchlist starts from a fixed ordered set of subject ids, resolved
//! concurrently against the remote API. Lookups that fail are dropped;
//! the survivors keep the order of the id list.

use futures::future::join_all;

use crate::client::HeroApi;
use crate::models::Hero;

/// Subject ids loaded into the watchlist at startup.
pub const DEFAULT_SUBJECT_IDS: [i64; 12] = [
    346, // Iron Man
    70,  // Batman
    620, // Spider-Man
    644, // Superman
    226, // Doctor Strange
    313, // Green Lantern
    720, // Wonder Woman
    263, // Flash
    659, // Thor
    107, // Black Widow
    149, // Captain America
    332, // Hulk
];

/// Resolve `ids` into records with one concurrent lookup per id.
///
/// Absent results are discarded, so the output length is at most
/// `ids.len()`. The fan-out is joined in input order, which keeps the
/// relative order of the surviving records.
pub async fn load_default_set(api: &dyn HeroApi, ids: &[i64]) -> Vec<Hero> {
    let lookups = ids.iter().map(|id| api.fetch_by_id(*id));
    join_all(lookups).await.into_iter().flatten().collect()
}
