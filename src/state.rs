//! Application state: the directory store and the debounced search driver.
//!
//! All state lives in a [`Directory`] and is mutated through a single
//! entry point, [`Directory::apply`], one arm per [`Event`]. There is no
//! locking discipline beyond the store mutex: mutations only happen as
//! completed async operations are applied, never concurrently.
//!
//! Remote searches carry a monotonically increasing sequence token. A
//! resolution whose token is no longer live is discarded, so the
//! displayed collection always reflects the newest resolved query —
//! an in-flight request that lost the race cannot clobber a newer
//! result. Requests themselves are never cancelled.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, Mutex};

use crate::client::HeroApi;
use crate::models::Hero;
use crate::search;

/// What the directory is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Idle,
    LoadingDefault,
    LoadingSearch,
}

/// Every way the directory can change.
#[derive(Debug, Clone)]
pub enum Event {
    /// The default set loader finished (possibly with fewer records
    /// than ids).
    DefaultSetLoaded(Vec<Hero>),
    /// The query string changed; resolution follows after the debounce
    /// window.
    QueryChanged(String),
    /// A query resolved synchronously against the watchlist.
    LocalResolved(Vec<Hero>),
    /// A remote search was issued under `seq`.
    RemoteSearchStarted { seq: u64 },
    /// A remote search came back. Applied only while `seq` is live.
    RemoteSearchResolved { seq: u64, results: Vec<Hero> },
    /// The add flow picked a record. No-op when the id is already
    /// listed.
    SubjectAdded(Hero),
    /// A record was opened (or closed) in the detail view.
    SubjectSelected(Option<i64>),
}

/// The directory store. Starts in [`Phase::LoadingDefault`] with empty
/// collections.
#[derive(Debug)]
pub struct Directory {
    phase: Phase,
    query: String,
    watchlist: Vec<Hero>,
    displayed: Vec<Hero>,
    selected: Option<i64>,
    /// Token of the remote search allowed to resolve, if one is in
    /// flight.
    live_seq: Option<u64>,
}

pub type SharedDirectory = Arc<Mutex<Directory>>;

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

impl Directory {
    pub fn new() -> Self {
        Self {
            phase: Phase::LoadingDefault,
            query: String::new(),
            watchlist: Vec::new(),
            displayed: Vec::new(),
            selected: None,
            live_seq: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn watchlist(&self) -> &[Hero] {
        &self.watchlist
    }

    pub fn displayed(&self) -> &[Hero] {
        &self.displayed
    }

    pub fn selected(&self) -> Option<i64> {
        self.selected
    }

    /// Apply one event. The only mutation entry point.
    pub fn apply(&mut self, event: Event) {
        match event {
            Event::DefaultSetLoaded(heroes) => {
                self.watchlist = dedup_by_id(heroes);
                self.displayed = self.watchlist.clone();
                self.phase = Phase::Idle;
            }
            Event::QueryChanged(query) => {
                self.query = query;
            }
            Event::LocalResolved(results) => {
                // A synchronous resolution supersedes any in-flight
                // remote search.
                self.displayed = results;
                self.live_seq = None;
                self.phase = Phase::Idle;
            }
            Event::RemoteSearchStarted { seq } => {
                self.live_seq = Some(seq);
                self.phase = Phase::LoadingSearch;
            }
            Event::RemoteSearchResolved { seq, results } => {
                if self.live_seq != Some(seq) {
                    return; // stale: a newer resolution owns the view
                }
                self.displayed = results;
                self.live_seq = None;
                self.phase = Phase::Idle;
            }
            Event::SubjectAdded(hero) => {
                if self.watchlist.iter().any(|h| h.id == hero.id) {
                    return; // already listed: silent no-op
                }
                self.watchlist.push(hero);
                self.displayed = self.watchlist.clone();
            }
            Event::SubjectSelected(selected) => {
                self.selected = selected;
            }
        }
    }
}

fn dedup_by_id(heroes: Vec<Hero>) -> Vec<Hero> {
    let mut seen = std::collections::HashSet::new();
    heroes
        .into_iter()
        .filter(|hero| seen.insert(hero.id))
        .collect()
}

// ============ Search driver ============

/// Handle for feeding query changes into the driver task.
#[derive(Clone)]
pub struct SearchDriver {
    tx: mpsc::Sender<String>,
}

impl SearchDriver {
    /// Submit a query change. Returns `false` if the driver task is
    /// gone.
    pub async fn input(&self, query: String) -> bool {
        self.tx.send(query).await.is_ok()
    }
}

/// Spawn the debounced search driver.
///
/// The driver consumes query changes, restarts the debounce window on
/// every change so only the most recent query resolves, and applies the
/// resolution to the store: watchlist and local matches synchronously,
/// remote fallbacks through a spawned fetch tagged with a sequence
/// token. The driver keeps accepting input while a fetch is in flight.
pub fn spawn_driver(
    store: SharedDirectory,
    api: Arc<dyn HeroApi>,
    debounce: Duration,
) -> SearchDriver {
    let (tx, rx) = mpsc::channel(64);
    let task = DriverTask {
        store,
        api,
        debounce,
        next_seq: 0,
    };
    tokio::spawn(task.run(rx));
    SearchDriver { tx }
}

struct DriverTask {
    store: SharedDirectory,
    api: Arc<dyn HeroApi>,
    debounce: Duration,
    next_seq: u64,
}

impl DriverTask {
    async fn run(mut self, mut rx: mpsc::Receiver<String>) {
        'outer: while let Some(first) = rx.recv().await {
            let mut query = first;
            self.store
                .lock()
                .await
                .apply(Event::QueryChanged(query.clone()));

            // Debounce: every newer query restarts the window.
            loop {
                tokio::select! {
                    next = rx.recv() => match next {
                        Some(newer) => {
                            query = newer;
                            self.store
                                .lock()
                                .await
                                .apply(Event::QueryChanged(query.clone()));
                        }
                        // Shutdown abandons the pending window.
                        None => break 'outer,
                    },
                    _ = tokio::time::sleep(self.debounce) => break,
                }
            }

            self.resolve(query).await;
        }
    }

    async fn resolve(&mut self, query: String) {
        if query.trim().is_empty() {
            let mut dir = self.store.lock().await;
            let watchlist = dir.watchlist().to_vec();
            dir.apply(Event::LocalResolved(watchlist));
            return;
        }

        let watchlist = self.store.lock().await.watchlist().to_vec();
        let local = search::local_matches(&watchlist, &query);
        if !local.is_empty() {
            self.store.lock().await.apply(Event::LocalResolved(local));
            return;
        }

        self.next_seq += 1;
        let seq = self.next_seq;
        self.store
            .lock()
            .await
            .apply(Event::RemoteSearchStarted { seq });

        let store = self.store.clone();
        let api = self.api.clone();
        tokio::spawn(async move {
            let results = search::remote_search(api.as_ref(), &query).await;
            store
                .lock()
                .await
                .apply(Event::RemoteSearchResolved { seq, results });
        });
    }
}
