//! HTTP JSON API for browser front-ends.
//!
//! The server owns the in-memory directory state. A front-end streams
//! query changes to `POST /query` (debounced and sequenced server-side)
//! and polls `GET /state` for the phase and the displayed collection;
//! the add dialog uses the immediate `POST /search` and
//! `POST /watchlist/add`.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|----------------|--------------------------------------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/state` | Phase, query, and the displayed collection |
//! | `POST` | `/query` | Submit a (debounced) query change |
//! | `GET`  | `/watchlist` | The default collection |
//! | `POST` | `/watchlist/add` | Add a subject by id (silent no-op on dup) |
//! | `POST` | `/search` | Immediate remote search (add dialog) |
//! | `POST` | `/select` | Record which subject the detail view shows |
//! | `GET`  | `/subjects/{id}` | One record, watchlist first then remote |
//!
//! # Error Contract
//!
//! Error responses share one envelope:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "subject not found: 9" } }
//! ```
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so a browser-based
//! front-end can talk to the API directly.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

use crate::client::{ApiClient, HeroApi};
use crate::config::Config;
use crate::models::Hero;
use crate::roster;
use crate::search;
use crate::state::{self, Directory, Event, Phase, SearchDriver, SharedDirectory};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    store: SharedDirectory,
    api: Arc<dyn HeroApi>,
    driver: SearchDriver,
}

/// Start the HTTP API on the configured bind address.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let api: Arc<dyn HeroApi> = Arc::new(ApiClient::new(&config.api)?);
    let app_state = bootstrap(
        api,
        config.watchlist.default_ids.clone(),
        Duration::from_millis(config.watchlist.debounce_ms),
    );

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    println!("Herodex API listening on {}", config.server.bind);
    axum::serve(listener, router(app_state)).await?;
    Ok(())
}

/// Wire up the store, the background default-set load, and the search
/// driver. Serving starts immediately; the store reports
/// `loading-default` until the loader finishes.
fn bootstrap(api: Arc<dyn HeroApi>, default_ids: Vec<i64>, debounce: Duration) -> AppState {
    let store: SharedDirectory = Arc::new(tokio::sync::Mutex::new(Directory::new()));

    let loader_store = store.clone();
    let loader_api = api.clone();
    tokio::spawn(async move {
        let heroes = roster::load_default_set(loader_api.as_ref(), &default_ids).await;
        loader_store
            .lock()
            .await
            .apply(Event::DefaultSetLoaded(heroes));
    });

    let driver = state::spawn_driver(store.clone(), api.clone(), debounce);

    AppState { store, api, driver }
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/state", get(get_state))
        .route("/query", post(post_query))
        .route("/watchlist", get(get_watchlist))
        .route("/watchlist/add", post(post_add))
        .route("/search", post(post_search))
        .route("/select", post(post_select))
        .route("/subjects/{id}", get(get_subject))
        .layer(cors)
        .with_state(state)
}

// ============ Response shapes ============

#[derive(Serialize)]
struct StateView {
    phase: Phase,
    query: String,
    watchlist_count: usize,
    displayed: Vec<Hero>,
    selected: Option<i64>,
}

#[derive(Deserialize)]
struct QueryBody {
    q: String,
}

#[derive(Deserialize)]
struct AddBody {
    id: i64,
}

#[derive(Deserialize)]
struct SelectBody {
    id: Option<i64>,
}

#[derive(Serialize)]
struct AddResult {
    added: bool,
    watchlist_count: usize,
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

fn error_response(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code,
            message: message.into(),
        },
    };
    (status, Json(body)).into_response()
}

// ============ Handlers ============

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn get_state(State(state): State<AppState>) -> Json<StateView> {
    let dir = state.store.lock().await;
    Json(StateView {
        phase: dir.phase(),
        query: dir.query().to_string(),
        watchlist_count: dir.watchlist().len(),
        displayed: dir.displayed().to_vec(),
        selected: dir.selected(),
    })
}

async fn post_query(State(state): State<AppState>, Json(body): Json<QueryBody>) -> Response {
    if state.driver.input(body.q).await {
        (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({ "accepted": true })),
        )
            .into_response()
    } else {
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            "search driver is not running",
        )
    }
}

async fn get_watchlist(State(state): State<AppState>) -> Json<Vec<Hero>> {
    Json(state.store.lock().await.watchlist().to_vec())
}

async fn post_add(State(state): State<AppState>, Json(body): Json<AddBody>) -> Response {
    {
        let dir = state.store.lock().await;
        if dir.watchlist().iter().any(|h| h.id == body.id) {
            // Already listed: the add flow is a silent no-op.
            return Json(AddResult {
                added: false,
                watchlist_count: dir.watchlist().len(),
            })
            .into_response();
        }
    }

    let hero = match state.api.fetch_by_id(body.id).await {
        Some(hero) => hero,
        None => {
            return error_response(
                StatusCode::NOT_FOUND,
                "not_found",
                format!("subject not found: {}", body.id),
            )
        }
    };

    let mut dir = state.store.lock().await;
    let before = dir.watchlist().len();
    dir.apply(Event::SubjectAdded(hero));
    Json(AddResult {
        added: dir.watchlist().len() > before,
        watchlist_count: dir.watchlist().len(),
    })
    .into_response()
}

async fn post_search(State(state): State<AppState>, Json(body): Json<QueryBody>) -> Json<Vec<Hero>> {
    // The add dialog searches immediately, without the debounce.
    Json(search::remote_search(state.api.as_ref(), &body.q).await)
}

async fn post_select(State(state): State<AppState>, Json(body): Json<SelectBody>) -> Response {
    state
        .store
        .lock()
        .await
        .apply(Event::SubjectSelected(body.id));
    Json(serde_json::json!({ "selected": body.id })).into_response()
}

async fn get_subject(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let listed = {
        let dir = state.store.lock().await;
        dir.watchlist().iter().find(|h| h.id == id).cloned()
    };

    let hero = match listed {
        Some(hero) => Some(hero),
        None => state.api.fetch_by_id(id).await,
    };

    match hero {
        Some(hero) => Json(hero).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("subject not found: {}", id),
        ),
    }
}
