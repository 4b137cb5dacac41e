use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command};
use std::time::Duration;

use axum::extract::Path as AxumPath;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tempfile::TempDir;

fn hdx_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("hdx");
    path
}

// ============ Stub SuperHero API ============

fn fixture(id: i64, name: &str, full_name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "slug": format!("{}-{}", id, name.to_lowercase().replace(' ', "-")),
        "powerstats": {
            "intelligence": 80, "strength": 60, "speed": 40,
            "durability": 50, "power": 70, "combat": 30
        },
        "biography": {
            "fullName": full_name,
            "publisher": "Stub Comics",
            "alignment": "good"
        },
        "work": { "occupation": "Adventurer", "base": "Batcave" },
        "images": {
            "xs": format!("https://img/xs/{}.jpg", id),
            "sm": format!("https://img/sm/{}.jpg", id)
        }
    })
}

fn collection() -> Vec<serde_json::Value> {
    vec![
        fixture(346, "Iron Man", "Tony Stark"),
        fixture(70, "Batman", "Bruce Wayne"),
        fixture(620, "Spider-Man", "Peter Parker"),
        fixture(999, "Zzzax", ""),
    ]
}

async fn by_id(AxumPath(file): AxumPath<String>) -> axum::response::Response {
    let id: i64 = match file.trim_end_matches(".json").parse() {
        Ok(id) => id,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };
    match collection().into_iter().find(|h| h["id"] == id) {
        Some(hero) => Json(hero).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn all() -> Json<Vec<serde_json::Value>> {
    Json(collection())
}

/// Serve the stub API on an ephemeral port. The returned runtime must
/// stay alive for the duration of the test.
fn spawn_stub() -> (tokio::runtime::Runtime, String) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let listener = rt.block_on(async { tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap() });
    let addr = listener.local_addr().unwrap();

    let app = Router::new()
        .route("/api/id/{file}", get(by_id))
        .route("/api/all.json", get(all));

    rt.spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (rt, format!("http://{}/api", addr))
}

// ============ Test harness ============

/// Default ids for tests: three known subjects plus one (111) the stub
/// does not serve.
fn setup_test_env(base_url: &str, bind: Option<&str>) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let config_dir = tmp.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let mut config_content = format!(
        r#"[api]
base_url = "{}"
timeout_secs = 5

[watchlist]
default_ids = [346, 70, 620, 111]
debounce_ms = 50
"#,
        base_url
    );
    if let Some(bind) = bind {
        config_content.push_str(&format!("\n[server]\nbind = \"{}\"\n", bind));
    }

    let config_path = config_dir.join("hdx.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_hdx(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = hdx_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run hdx binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

struct ChildGuard(Child);

impl Drop for ChildGuard {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

// ============ CLI tests ============

#[test]
fn test_watchlist_drops_failed_id_and_keeps_order() {
    let (_rt, base) = spawn_stub();
    let (_tmp, config_path) = setup_test_env(&base, None);

    let (stdout, stderr, success) = run_hdx(&config_path, &["watchlist"]);
    assert!(success, "watchlist failed: {} {}", stdout, stderr);

    // Id 111 fails to fetch: three of four survive.
    assert!(stdout.contains("3 subject(s) in watchlist"), "{}", stdout);
    let iron = stdout.find("Iron Man").unwrap();
    let bat = stdout.find("Batman").unwrap();
    let spider = stdout.find("Spider-Man").unwrap();
    assert!(iron < bat && bat < spider, "order lost: {}", stdout);

    // The failed lookup is logged, not fatal.
    assert!(stderr.contains("111"), "{}", stderr);
}

#[test]
fn test_search_local_match_by_identity() {
    let (_rt, base) = spawn_stub();
    let (_tmp, config_path) = setup_test_env(&base, None);

    let (stdout, _, success) = run_hdx(&config_path, &["search", "wayne"]);
    assert!(success);
    assert!(stdout.contains("1 subject(s) found (local match)"), "{}", stdout);
    assert!(stdout.contains("Batman"));
}

#[test]
fn test_search_remote_fallback() {
    let (_rt, base) = spawn_stub();
    let (_tmp, config_path) = setup_test_env(&base, None);

    let (stdout, _, success) = run_hdx(&config_path, &["search", "zzz"]);
    assert!(success);
    assert!(stdout.contains("(remote)"), "{}", stdout);
    assert!(stdout.contains("Zzzax"));
}

#[test]
fn test_search_blank_query_prints_watchlist() {
    let (_rt, base) = spawn_stub();
    let (_tmp, config_path) = setup_test_env(&base, None);

    let (stdout, _, success) = run_hdx(&config_path, &["search", "   "]);
    assert!(success);
    assert!(stdout.contains("3 subject(s) found (watchlist)"), "{}", stdout);
}

#[test]
fn test_search_no_results_anywhere() {
    let (_rt, base) = spawn_stub();
    let (_tmp, config_path) = setup_test_env(&base, None);

    let (stdout, _, success) = run_hdx(&config_path, &["search", "qqqqq"]);
    assert!(success);
    assert!(stdout.contains("No subjects found."), "{}", stdout);
}

#[test]
fn test_show_prints_dossier() {
    let (_rt, base) = spawn_stub();
    let (_tmp, config_path) = setup_test_env(&base, None);

    let (stdout, _, success) = run_hdx(&config_path, &["show", "70"]);
    assert!(success);
    assert!(stdout.contains("Subject #70"), "{}", stdout);
    assert!(stdout.contains("Bruce Wayne"));
    assert!(stdout.contains("Powerstats"));
    assert!(stdout.contains("Batcave"));
    // Absent fields render as placeholders.
    assert!(stdout.contains("Unknown"));
}

#[test]
fn test_show_unknown_subject_fails() {
    let (_rt, base) = spawn_stub();
    let (_tmp, config_path) = setup_test_env(&base, None);

    let (_, stderr, success) = run_hdx(&config_path, &["show", "424242"]);
    assert!(!success);
    assert!(stderr.contains("subject not found"), "{}", stderr);
}

#[test]
fn test_add_novel_subject_grows_watchlist() {
    let (_rt, base) = spawn_stub();
    let (_tmp, config_path) = setup_test_env(&base, None);

    let (stdout, _, success) = run_hdx(&config_path, &["add", "Zzzax"]);
    assert!(success);
    assert!(stdout.contains("Added Zzzax to the watchlist."), "{}", stdout);
    assert!(stdout.contains("4 subject(s) in watchlist"), "{}", stdout);
}

#[test]
fn test_add_duplicate_is_noop() {
    let (_rt, base) = spawn_stub();
    let (_tmp, config_path) = setup_test_env(&base, None);

    let (stdout, _, success) = run_hdx(&config_path, &["add", "Iron Man"]);
    assert!(success);
    assert!(
        stdout.contains("Iron Man is already on the watchlist."),
        "{}",
        stdout
    );
    assert!(stdout.contains("3 subject(s) in watchlist"), "{}", stdout);
}

#[test]
fn test_add_ambiguous_lists_candidates() {
    let (_rt, base) = spawn_stub();
    let (_tmp, config_path) = setup_test_env(&base, None);

    let (stdout, _, success) = run_hdx(&config_path, &["add", "man"]);
    assert!(success);
    assert!(stdout.contains("--pick"), "{}", stdout);
    assert!(stdout.contains("Iron Man"));
    assert!(stdout.contains("Spider-Man"));
}

#[test]
fn test_add_with_pick_selects_candidate() {
    let (_rt, base) = spawn_stub();
    let (_tmp, config_path) = setup_test_env(&base, None);

    let (stdout, _, success) = run_hdx(&config_path, &["add", "man", "--pick", "2"]);
    assert!(success);
    assert!(stdout.contains("Batman is already on the watchlist."), "{}", stdout);
}

// ============ Server test ============

#[test]
fn test_serve_end_to_end() {
    let (rt, base) = spawn_stub();

    // Reserve an ephemeral port for the API.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let bind = format!("127.0.0.1:{}", port);
    let api_base = format!("http://{}", bind);

    let (_tmp, config_path) = setup_test_env(&base, Some(&bind));

    let child = Command::new(hdx_binary())
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("serve")
        .spawn()
        .unwrap();
    let _guard = ChildGuard(child);

    rt.block_on(async {
        let client = reqwest::Client::new();

        // Wait for the server to come up.
        let mut healthy = false;
        for _ in 0..100 {
            if let Ok(resp) = client.get(format!("{}/health", api_base)).send().await {
                if resp.status().is_success() {
                    healthy = true;
                    break;
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(healthy, "server never became healthy");

        // The default set loads in the background.
        let mut state = serde_json::Value::Null;
        for _ in 0..100 {
            state = client
                .get(format!("{}/state", api_base))
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            if state["phase"] == "idle" {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(state["phase"], "idle", "state: {}", state);
        assert_eq!(state["watchlist_count"], 3);

        // Debounced query stream resolves to a local match.
        let resp = client
            .post(format!("{}/query", api_base))
            .json(&json!({ "q": "wayne" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::ACCEPTED);

        let mut displayed_one = false;
        for _ in 0..100 {
            let state: serde_json::Value = client
                .get(format!("{}/state", api_base))
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            let displayed = state["displayed"].as_array().unwrap();
            if displayed.len() == 1 && displayed[0]["name"] == "Batman" {
                displayed_one = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(displayed_one, "query never resolved to Batman");

        // Add flow over HTTP, including the duplicate no-op.
        let added: serde_json::Value = client
            .post(format!("{}/watchlist/add", api_base))
            .json(&json!({ "id": 999 }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(added["added"], true);
        assert_eq!(added["watchlist_count"], 4);

        let again: serde_json::Value = client
            .post(format!("{}/watchlist/add", api_base))
            .json(&json!({ "id": 999 }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(again["added"], false);
        assert_eq!(again["watchlist_count"], 4);
    });
}
