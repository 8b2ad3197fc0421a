//! Integration tests for the kiosk-player HTTP API
//!
//! Drives the full router (with a running supervisor) through
//! `tower::ServiceExt::oneshot`, using a temporary media directory.

#![cfg(unix)]

mod helpers;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tower::ServiceExt;

use helpers::{wait_until, Fixture, WAIT_TIMEOUT};
use kiosk_player::api::{create_router, AppState};
use kiosk_player::playback::{Player, Supervisor};
use kiosk_player::playlist::Playlist;

/// Running router plus the handles needed to inspect and stop it
struct TestApp {
    fixture: Fixture,
    router: Router,
    player: Player,
    supervisor: JoinHandle<()>,
}

impl TestApp {
    fn start(files: &[&str]) -> Self {
        Self::start_with_static(files, false)
    }

    fn start_with_static(files: &[&str], with_static: bool) -> Self {
        let fixture = Fixture::new(files);

        let static_dir = with_static.then(|| {
            let dir = fixture.dir.path().join("www");
            std::fs::create_dir(&dir).unwrap();
            std::fs::write(dir.join("index.html"), "<h1>kiosk</h1>").unwrap();
            dir
        });

        let profiles = fixture.profiles();
        let playlist = Playlist::new(fixture.media_dir.clone(), profiles.playlist_patterns());
        let (supervisor, player) = Supervisor::new(fixture.options());
        let supervisor = tokio::spawn(supervisor.run());

        let router = create_router(AppState {
            player: player.clone(),
            playlist,
            static_dir,
        });

        Self {
            fixture,
            router,
            player,
            supervisor,
        }
    }

    async fn request(&self, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let (status, bytes) = self.raw_request(method, uri, body).await;
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn raw_request(
        &self,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(text) => {
                request = request.header("content-type", "application/json");
                Body::from(text.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn get_status(&self) -> Value {
        let (status, body) = self.request(Method::GET, "/api", None).await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    async fn post(&self, path: &str) -> (StatusCode, Value) {
        self.request(Method::POST, path, None).await
    }

    async fn play(&self, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, "/api/play", Some(&body.to_string())).await
    }

    /// Wait until `name` has been launched and is reported as playing
    async fn wait_playing(&self, name: &str) {
        self.fixture.wait_for_starts(&self.fixture.item(name), 1).await;
        wait_until(|| self.player.is_playing()).await;
    }

    fn path_of(&self, name: &str) -> String {
        self.fixture.item(name).to_path_string()
    }

    async fn shutdown(self) {
        drop(self.router);
        drop(self.player);
        tokio::time::timeout(WAIT_TIMEOUT, self.supervisor)
            .await
            .unwrap()
            .unwrap();
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::start(&[]);

    let (status, body) = app.request(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "kiosk-player");
    assert!(body["version"].is_string());

    app.shutdown().await;
}

#[tokio::test]
async fn test_initial_status_is_stopped() {
    let app = TestApp::start(&["b.mp4", "a.mp4", "c.png", "readme.txt"]);

    let body = app.get_status().await;
    assert_eq!(body["error"], "");
    assert_eq!(
        body["playlist"],
        json!([app.path_of("a.mp4"), app.path_of("b.mp4"), app.path_of("c.png")])
    );
    assert_eq!(body["current"], Value::Null);
    assert_eq!(body["status"], "stop");

    app.shutdown().await;
}

#[tokio::test]
async fn test_next_stop_prev_sequence() {
    let app = TestApp::start(&["a.mp4", "b.mp4", "c.mp4"]);

    let (status, body) = app.post("/api/next").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"error": ""}));
    app.wait_playing("a.mp4").await;
    let body = app.get_status().await;
    assert_eq!(body["current"], json!({"path": app.path_of("a.mp4"), "index": 0}));
    assert_eq!(body["status"], "play");

    app.post("/api/next").await;
    let body = app.get_status().await;
    assert_eq!(body["current"]["path"], app.path_of("b.mp4"));
    assert_eq!(body["current"]["index"], 1);

    app.post("/api/stop").await;
    let body = app.get_status().await;
    assert_eq!(body["current"], Value::Null);
    assert_eq!(body["status"], "stop");

    // From idle, prev wraps to the last entry
    app.post("/api/prev").await;
    let body = app.get_status().await;
    assert_eq!(body["current"], json!({"path": app.path_of("c.mp4"), "index": 2}));

    app.shutdown().await;
}

#[tokio::test]
async fn test_next_and_prev_wrap_around() {
    let app = TestApp::start(&["a.mp4", "b.mp4"]);

    app.post("/api/prev").await;
    assert_eq!(app.get_status().await["current"]["index"], 1);

    app.post("/api/next").await;
    assert_eq!(app.get_status().await["current"]["index"], 0);

    app.post("/api/prev").await;
    assert_eq!(app.get_status().await["current"]["index"], 1);

    app.shutdown().await;
}

#[tokio::test]
async fn test_next_on_empty_playlist_is_rejected() {
    let app = TestApp::start(&[]);

    let (status, body) = app.post("/api/next").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("400: "));
    assert_eq!(app.get_status().await["status"], "stop");

    app.shutdown().await;
}

#[tokio::test]
async fn test_pause_and_resume_status() {
    let app = TestApp::start(&["a.mp4"]);

    app.play(json!({"index": 0})).await;
    app.wait_playing("a.mp4").await;

    let (status, body) = app.post("/api/pause").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"error": ""}));
    assert_eq!(app.get_status().await["status"], "pause");
    wait_until(|| app.fixture.bytes_of(' ') == 1).await;

    app.post("/api/resume").await;
    assert_eq!(app.get_status().await["status"], "play");
    wait_until(|| app.fixture.bytes_of(' ') == 2).await;

    app.shutdown().await;
}

#[tokio::test]
async fn test_play_by_path_and_index() {
    let app = TestApp::start(&["a.mp4", "b.mp4", "c.mp4"]);

    let (status, body) = app.play(json!({"path": app.path_of("b.mp4")})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"error": ""}));
    assert_eq!(app.get_status().await["current"]["index"], 1);

    let (status, _) = app.play(json!({"index": 2})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.get_status().await["current"]["path"], app.path_of("c.mp4"));

    let (status, _) = app.play(json!({"index": "0"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.get_status().await["current"]["index"], 0);

    let (status, _) = app
        .play(json!({"path": app.path_of("b.mp4"), "index": 1}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.get_status().await["current"]["index"], 1);

    app.fixture.wait_for_starts(&app.fixture.item("b.mp4"), 1).await;
    app.shutdown().await;
}

#[tokio::test]
async fn test_inconsistent_selector_leaves_selection_unchanged() {
    let app = TestApp::start(&["a.mp4", "b.mp4", "c.mp4", "d.mp4"]);

    app.play(json!({"index": 0})).await;

    let (status, body) = app.play(json!({"path": "videos/x.mp4", "index": 3})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("400: inconsistent index and path"));
    assert!(message.contains("videos/x.mp4"));

    assert_eq!(app.get_status().await["current"]["path"], app.path_of("a.mp4"));

    app.shutdown().await;
}

#[tokio::test]
async fn test_play_rejects_bad_requests() {
    let app = TestApp::start(&["a.mp4", "b.mp4"]);

    let (status, body) = app
        .request(Method::POST, "/api/play", Some("{not json"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "400: invalid json");

    let (status, body) = app.play(json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "400: must set index or path");

    let (status, body) = app.play(json!({"index": "first"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "400: index must be int");

    let (status, _) = app.play(json!({"index": 2})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.play(json!({"index": -1})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.play(json!({"path": app.path_of("zzz.mp4")})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("400: no such media item"));

    // Nothing was selected along the way
    assert_eq!(app.get_status().await["status"], "stop");

    app.shutdown().await;
}

#[tokio::test]
async fn test_status_reflects_filesystem_changes() {
    let app = TestApp::start(&["a.mp4", "b.mp4"]);

    app.play(json!({"path": app.path_of("b.mp4")})).await;
    std::fs::write(app.fixture.media_dir.join("aa.mp4"), b"media").unwrap();

    let body = app.get_status().await;
    assert_eq!(body["playlist"].as_array().unwrap().len(), 3);
    assert_eq!(body["current"]["index"], 2);

    // Selection removed from disk: no index until the supervisor falls back
    std::fs::remove_file(app.fixture.media_dir.join("b.mp4")).unwrap();
    let body = app.get_status().await;
    if !body["current"].is_null() {
        assert_eq!(body["current"]["index"], Value::Null);
    }

    app.shutdown().await;
}

#[tokio::test]
async fn test_static_ui_is_served() {
    let app = TestApp::start_with_static(&[], true);

    let (status, bytes) = app.raw_request(Method::GET, "/index.html", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"<h1>kiosk</h1>");

    let (status, _) = app.raw_request(Method::GET, "/missing.js", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.shutdown().await;
}

#[tokio::test]
async fn test_unknown_route_without_static_dir() {
    let app = TestApp::start(&[]);

    let (status, _) = app.raw_request(Method::GET, "/index.html", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.shutdown().await;
}
