//! End-to-end tests: a real server on a loopback port, driven over HTTP
//! and WebSocket with a scripted feed behind it.

#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;

use tourney_feed::api;
use tourney_feed::app_state::AppState;
use tourney_feed::domain::EventBus;
use tourney_feed::fetch::{
    FetchError, Fetcher, RawParticipant, RawRecord, RawStanding, SourceCatalog, TournamentSources,
};
use tourney_feed::persistence::MemoryStore;
use tourney_feed::pipeline::Classifier;
use tourney_feed::service::{IngestOptions, IngestService};

#[derive(Debug, Default)]
struct FixtureFeed {
    down: AtomicBool,
    slow: AtomicBool,
}

#[async_trait]
impl Fetcher for FixtureFeed {
    async fn fetch_events(&self, url: &str) -> Result<Vec<RawRecord>, FetchError> {
        if self.slow.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(2)).await;
        }
        if self.down.load(Ordering::SeqCst) {
            return Err(FetchError::Navigation {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(vec![
            RawRecord::new("", "Leaderboard updated", "Jun 12, 2025 9:00 AM"),
            RawRecord::new("", "Reel boated a blue marlin", "Jun 12, 2025 9:30 AM"),
            RawRecord::new("", "Sea released a white marlin", "Jun 12, 2025 10:15 AM"),
        ])
    }

    async fn fetch_participants(&self, _url: &str) -> Result<Vec<RawParticipant>, FetchError> {
        Ok(vec![
            RawParticipant {
                boat: "Reel".to_string(),
                category: "Sportfish".to_string(),
                image_url: Some("https://site/reel.jpg".to_string()),
            },
            RawParticipant {
                boat: "Sea".to_string(),
                category: "Center Console".to_string(),
                image_url: None,
            },
        ])
    }

    async fn fetch_leaderboard(&self, url: &str) -> Result<Vec<RawStanding>, FetchError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(FetchError::Navigation {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(["Reel", "Sea", "Top", "Late"]
            .iter()
            .zip(["1,250 Points", "900 Points", "700 Points", "100 Points"])
            .map(|(boat, points)| RawStanding {
                boat: (*boat).to_string(),
                points: points.to_string(),
            })
            .collect())
    }
}

async fn start_server() -> (SocketAddr, Arc<FixtureFeed>) {
    start_server_with_timeout(Duration::from_secs(10)).await
}

async fn start_server_with_timeout(request_timeout: Duration) -> (SocketAddr, Arc<FixtureFeed>) {
    let mut catalog = SourceCatalog::default();
    catalog.insert(
        "Big Rock",
        TournamentSources {
            events: Some("http://feed/big-rock/events".to_string()),
            participants: Some("http://feed/big-rock/participants".to_string()),
            leaderboard: Some("http://feed/big-rock/leaderboard".to_string()),
        },
    );
    let feed = Arc::new(FixtureFeed::default());
    let service = IngestService::new(
        Arc::new(MemoryStore::new()),
        Arc::<FixtureFeed>::clone(&feed),
        Arc::new(catalog),
        Classifier::default(),
        EventBus::new(64),
        IngestOptions::default(),
    );
    let app = api::build_app(AppState::new(Arc::new(service)), request_timeout);

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("cannot bind loopback");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local address");
    };
    tokio::spawn(async move { axum::serve(listener, app).await });
    (addr, feed)
}

async fn get_json(client: &reqwest::Client, url: &str) -> (u16, Value) {
    let Ok(resp) = client.get(url).send().await else {
        panic!("GET {url} failed");
    };
    let status = resp.status().as_u16();
    let Ok(body) = resp.json::<Value>().await else {
        panic!("GET {url} returned no JSON");
    };
    (status, body)
}

async fn put_settings(client: &reqwest::Client, base: &str, body: Value) -> (u16, Value) {
    let Ok(resp) = client
        .put(format!("{base}/api/v1/settings"))
        .json(&body)
        .send()
        .await
    else {
        panic!("PUT settings failed");
    };
    let status = resp.status().as_u16();
    let Ok(body) = resp.json::<Value>().await else {
        panic!("PUT settings returned no JSON");
    };
    (status, body)
}

fn count(body: &Value) -> u64 {
    body.get("count").and_then(Value::as_u64).unwrap_or_default()
}

fn text<'a>(body: &'a Value, pointer: &str) -> &'a str {
    body.pointer(pointer).and_then(Value::as_str).unwrap_or_default()
}

#[tokio::test]
async fn rest_walkthrough() {
    let (addr, _) = start_server().await;
    let base = format!("http://{addr}");
    let client = reqwest::Client::new();

    let (status, health) = get_json(&client, &format!("{base}/health")).await;
    assert_eq!(status, 200);
    assert_eq!(text(&health, "/status"), "healthy");
    assert_eq!(text(&health, "/tournament"), "Big Rock");

    let (status, settings) = get_json(&client, &format!("{base}/api/v1/settings")).await;
    assert_eq!(status, 200);
    assert_eq!(text(&settings, "/tournament"), "Big Rock");
    assert_eq!(text(&settings, "/data_source"), "live");

    let (status, participants) = get_json(&client, &format!("{base}/api/v1/participants")).await;
    assert_eq!(status, 200);
    assert_eq!(count(&participants), 2);

    let (status, live) = get_json(&client, &format!("{base}/api/v1/events")).await;
    assert_eq!(status, 200);
    assert_eq!(count(&live), 2);
    assert_eq!(text(&live, "/events/0/kind"), "boated");
    assert_eq!(text(&live, "/events/1/kind"), "released");

    let (status, update) =
        put_settings(&client, &base, json!({"tournament": "Big Rock", "data_source": "demo"}))
            .await;
    assert_eq!(status, 200);
    assert_eq!(text(&update, "/status"), "ok");

    let (status, demo) = get_json(&client, &format!("{base}/api/v1/events?mode=demo")).await;
    assert_eq!(status, 200);
    assert_eq!(count(&demo), 4);
    assert_eq!(text(&demo, "/events/0/kind"), "hooked_up");

    let (status, hooked) = get_json(&client, &format!("{base}/api/v1/events/hooked")).await;
    assert_eq!(status, 200);
    assert_eq!(count(&hooked), 2);
}

#[tokio::test]
async fn leaderboard_serves_top_three_and_survives_outage() {
    let (addr, feed) = start_server().await;
    let base = format!("http://{addr}");
    let client = reqwest::Client::new();

    let (status, demo) = get_json(&client, &format!("{base}/api/v1/leaderboard?mode=demo")).await;
    assert_eq!(status, 200);
    assert_eq!(count(&demo), 0);

    let (status, live) = get_json(&client, &format!("{base}/api/v1/leaderboard")).await;
    assert_eq!(status, 200);
    assert_eq!(count(&live), 3);
    assert_eq!(text(&live, "/standings/0/boat"), "Reel");
    assert_eq!(text(&live, "/standings/0/points"), "1,250 Points");

    feed.down.store(true, Ordering::SeqCst);
    let (status, cached) = get_json(&client, &format!("{base}/api/v1/leaderboard")).await;
    assert_eq!(status, 200);
    assert_eq!(count(&cached), 3);
    assert_eq!(text(&cached, "/standings/2/boat"), "Top");
}

#[tokio::test]
async fn empty_tournament_is_rejected() {
    let (addr, _) = start_server().await;
    let base = format!("http://{addr}");
    let client = reqwest::Client::new();

    let (status, _) =
        put_settings(&client, &base, json!({"tournament": "  ", "data_source": "live"})).await;
    assert_eq!(status, 400);

    let (_, settings) = get_json(&client, &format!("{base}/api/v1/settings")).await;
    assert_eq!(text(&settings, "/tournament"), "Big Rock");
}

#[tokio::test]
async fn feed_outage_surfaces_as_bad_gateway() {
    let (addr, feed) = start_server().await;
    let base = format!("http://{addr}");
    let client = reqwest::Client::new();

    let (status, _) = get_json(&client, &format!("{base}/api/v1/events")).await;
    assert_eq!(status, 200);

    feed.down.store(true, Ordering::SeqCst);
    let (status, body) = get_json(&client, &format!("{base}/api/v1/events")).await;
    assert_eq!(status, 502);
    assert_eq!(text(&body, "/status"), "error");
    assert_eq!(count(&body), 0);
}

#[tokio::test]
async fn slow_request_times_out_with_408() {
    let (addr, feed) = start_server_with_timeout(Duration::from_millis(200)).await;
    feed.slow.store(true, Ordering::SeqCst);

    let Ok(resp) = reqwest::Client::new()
        .get(format!("http://{addr}/api/v1/events"))
        .send()
        .await
    else {
        panic!("GET events failed");
    };
    assert_eq!(resp.status().as_u16(), 408);
}

#[tokio::test]
async fn websocket_receives_cycle_updates() {
    let (addr, _) = start_server().await;
    let Ok((mut ws, _)) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws")).await else {
        panic!("ws connect failed");
    };

    let subscribe = json!({
        "id": "sub-1",
        "type": "command",
        "payload": {"command": "subscribe", "tournaments": ["Big Rock"]},
    });
    let Ok(()) = ws.send(Message::text(subscribe.to_string())).await else {
        panic!("ws send failed");
    };
    let reply = next_json(&mut ws).await;
    assert_eq!(text(&reply, "/type"), "response");
    assert_eq!(text(&reply, "/id"), "sub-1");

    let Ok(resp) = reqwest::Client::new()
        .post(format!("http://{addr}/api/v1/events/refresh"))
        .send()
        .await
    else {
        panic!("refresh failed");
    };
    assert_eq!(resp.status().as_u16(), 200);

    let update = next_json(&mut ws).await;
    assert_eq!(text(&update, "/type"), "event");
    assert_eq!(text(&update, "/payload/tournament"), "Big Rock");
    assert_eq!(text(&update, "/payload/mode"), "live");
    let added = update
        .pointer("/payload/events")
        .and_then(Value::as_array)
        .map(Vec::len);
    assert_eq!(added, Some(2));
}

async fn next_json<S>(ws: &mut S) -> Value
where
    S: StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    let Ok(Some(Ok(msg))) = tokio::time::timeout(Duration::from_secs(5), ws.next()).await else {
        panic!("no ws message within 5s");
    };
    let Ok(text) = msg.to_text() else {
        panic!("ws message is not text");
    };
    let Ok(value) = serde_json::from_str(text) else {
        panic!("ws message is not JSON");
    };
    value
}
