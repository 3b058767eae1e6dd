//! Integration tests for the briefing client against a local stub API.
//!
//! Each test starts a small Axum server on an ephemeral port that plays
//! the part of the text-generation endpoint, counts the requests it
//! receives, and records the last request body.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use depotwatch_briefing::{
    APOLOGY, BriefingClient, BriefingOutcome, GeminiBackend, GeminiConfig, NOT_ENOUGH_DATA,
    PromptEngine,
};
use serde_json::{Value, json};

struct Stub {
    status: StatusCode,
    body: String,
    delay: Duration,
    hits: AtomicUsize,
    last_body: Mutex<Option<String>>,
    last_uri: Mutex<Option<String>>,
}

async fn stub_handler(State(stub): State<Arc<Stub>>, uri: Uri, body: String) -> (StatusCode, String) {
    stub.hits.fetch_add(1, Ordering::SeqCst);
    *stub.last_body.lock().unwrap() = Some(body);
    *stub.last_uri.lock().unwrap() = Some(uri.to_string());
    tokio::time::sleep(stub.delay).await;
    (stub.status, stub.body.clone())
}

async fn start_stub(status: StatusCode, body: &str, delay: Duration) -> (String, Arc<Stub>) {
    let stub = Arc::new(Stub {
        status,
        body: body.to_owned(),
        delay,
        hits: AtomicUsize::new(0),
        last_body: Mutex::new(None),
        last_uri: Mutex::new(None),
    });
    let app = Router::new()
        .fallback(stub_handler)
        .with_state(Arc::clone(&stub));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/v1beta"), stub)
}

fn client_for(api_url: &str) -> BriefingClient {
    let backend = GeminiBackend::new(&GeminiConfig {
        api_url: api_url.to_owned(),
        model: "gemini-2.0-flash".to_owned(),
        api_key: "test-key".to_owned(),
        request_timeout: Duration::from_secs(5),
    })
    .unwrap();
    BriefingClient::new(backend, PromptEngine::new().unwrap())
}

fn answer(text: &str) -> String {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] }).to_string()
}

fn log_lines() -> Vec<String> {
    vec![
        "[08:00:10] 37 units loaded.".to_owned(),
        "[08:00:10] Vehicle detected: MH27AB4410".to_owned(),
    ]
}

fn assert_idle(client: &BriefingClient) {
    let panel = client.panel();
    assert!(!panel.busy, "loader should be hidden");
    assert!(panel.controls_enabled, "buttons should be enabled");
}

#[tokio::test]
async fn briefing_shows_generated_text() {
    let (url, stub) = start_stub(StatusCode::OK, &answer("X"), Duration::ZERO).await;
    let client = client_for(&url);

    let outcome = client.request_briefing(&[1, 2, 3], &[0, 1, 0]).await;

    assert_eq!(outcome, BriefingOutcome::Answered("X".to_owned()));
    assert_eq!(client.panel().output, "X");
    assert_idle(&client);
    assert_eq!(stub.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn request_targets_generate_content_with_key() {
    let (url, stub) = start_stub(StatusCode::OK, &answer("ok"), Duration::ZERO).await;
    let client = client_for(&url);

    client.request_briefing(&[5, 6], &[1, 2]).await;

    let uri = stub.last_uri.lock().unwrap().clone().unwrap();
    assert_eq!(
        uri,
        "/v1beta/models/gemini-2.0-flash:generateContent?key=test-key"
    );
}

#[tokio::test]
async fn payload_carries_single_user_text_part() {
    let (url, stub) = start_stub(StatusCode::OK, &answer("ok"), Duration::ZERO).await;
    let client = client_for(&url);

    client.request_briefing(&[5, 6], &[1, 2]).await;

    let raw = stub.last_body.lock().unwrap().clone().unwrap();
    let body: Value = serde_json::from_str(&raw).unwrap();
    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 1);
    assert_eq!(contents[0]["role"], "user");
    let text = contents[0]["parts"][0]["text"].as_str().unwrap();
    assert!(text.contains("5,6"));
    assert!(text.contains("1,2"));
}

#[tokio::test]
async fn anomaly_review_sends_log_lines() {
    let (url, stub) = start_stub(StatusCode::OK, &answer("all normal"), Duration::ZERO).await;
    let client = client_for(&url);

    let outcome = client.request_anomaly_review(&log_lines()).await;

    assert_eq!(outcome, BriefingOutcome::Answered("all normal".to_owned()));
    let raw = stub.last_body.lock().unwrap().clone().unwrap();
    let body: Value = serde_json::from_str(&raw).unwrap();
    let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(text.contains("[08:00:10] 37 units loaded.\n[08:00:10] Vehicle detected: MH27AB4410"));
    assert_idle(&client);
}

#[tokio::test]
async fn server_error_shows_apology() {
    let (url, _stub) = start_stub(
        StatusCode::INTERNAL_SERVER_ERROR,
        "upstream exploded",
        Duration::ZERO,
    )
    .await;
    let client = client_for(&url);

    let outcome = client.request_briefing(&[1], &[1]).await;

    assert_eq!(outcome, BriefingOutcome::Failed);
    assert_eq!(client.panel().output, APOLOGY);
    assert_idle(&client);
}

#[tokio::test]
async fn malformed_json_shows_apology() {
    let (url, _stub) = start_stub(StatusCode::OK, "{not json", Duration::ZERO).await;
    let client = client_for(&url);

    let outcome = client.request_anomaly_review(&log_lines()).await;

    assert_eq!(outcome, BriefingOutcome::Failed);
    assert_eq!(client.panel().output, APOLOGY);
    assert_idle(&client);
}

#[tokio::test]
async fn missing_text_path_shows_apology() {
    let body = json!({ "candidates": [] }).to_string();
    let (url, _stub) = start_stub(StatusCode::OK, &body, Duration::ZERO).await;
    let client = client_for(&url);

    let outcome = client.request_briefing(&[1], &[1]).await;

    assert_eq!(outcome, BriefingOutcome::Failed);
    assert_eq!(client.panel().output, APOLOGY);
    assert_idle(&client);
}

#[tokio::test]
async fn connection_refused_shows_apology() {
    let client = client_for("http://127.0.0.1:1");

    let outcome = client.request_briefing(&[1], &[1]).await;

    assert_eq!(outcome, BriefingOutcome::Failed);
    assert_eq!(client.panel().output, APOLOGY);
    assert_idle(&client);
}

#[tokio::test]
async fn empty_log_makes_no_request() {
    let (url, stub) = start_stub(StatusCode::OK, &answer("X"), Duration::ZERO).await;
    let client = client_for(&url);

    let outcome = client.request_anomaly_review(&[]).await;

    assert_eq!(outcome, BriefingOutcome::NotEnoughData);
    assert_eq!(client.panel().output, NOT_ENOUGH_DATA);
    assert_eq!(stub.hits.load(Ordering::SeqCst), 0);
    assert_idle(&client);
}

#[tokio::test]
async fn second_request_while_busy_is_refused() {
    let (url, stub) = start_stub(StatusCode::OK, &answer("slow"), Duration::from_millis(300)).await;
    let client = Arc::new(client_for(&url));

    let first = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.request_briefing(&[1], &[1]).await })
    };

    // Wait until the first request reaches the stub.
    while stub.hits.load(Ordering::SeqCst) == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let panel = client.panel();
    assert!(panel.busy);
    assert!(!panel.controls_enabled);
    assert!(panel.output.is_empty());

    let second = client.request_anomaly_review(&log_lines()).await;
    assert_eq!(second, BriefingOutcome::Busy);

    let first = first.await.unwrap();
    assert_eq!(first, BriefingOutcome::Answered("slow".to_owned()));
    assert_eq!(stub.hits.load(Ordering::SeqCst), 1);
    assert_idle(&client);
}

#[tokio::test]
async fn empty_log_while_busy_leaves_panel_alone() {
    let (url, stub) = start_stub(StatusCode::OK, &answer("slow"), Duration::from_millis(300)).await;
    let client = Arc::new(client_for(&url));

    let first = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.request_briefing(&[1], &[1]).await })
    };
    while stub.hits.load(Ordering::SeqCst) == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let second = client.request_anomaly_review(&[]).await;
    assert_eq!(second, BriefingOutcome::Busy);
    let panel = client.panel();
    assert!(panel.busy);
    assert!(panel.output.is_empty());

    let first = first.await.unwrap();
    assert_eq!(first, BriefingOutcome::Answered("slow".to_owned()));
    assert_eq!(client.panel().output, "slow");
    assert_idle(&client);
}

#[tokio::test]
async fn cancelled_request_restores_controls() {
    let (url, _stub) = start_stub(StatusCode::OK, &answer("late"), Duration::from_secs(3)).await;
    let client = client_for(&url);

    let result = tokio::time::timeout(
        Duration::from_millis(100),
        client.request_briefing(&[1], &[1]),
    )
    .await;

    assert!(result.is_err(), "request should have been cut short");
    assert_idle(&client);
}
