// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Router,
};
use serde_json::{json, Value};
use silverfit::config::Config;
use silverfit::db::KvStore;
use silverfit::models::{Availability, UserProfile};
use silverfit::routes::create_router;
use silverfit::AppState;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned answer of the fake Gemini endpoint.
#[derive(Clone)]
pub struct FakeReply {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

/// Handle to a running fake Gemini server.
#[allow(dead_code)]
pub struct FakeGemini {
    pub base_url: String,
    pub hits: Arc<AtomicUsize>,
    pub last_request: Arc<Mutex<Option<(HeaderMap, Value)>>>,
}

#[allow(dead_code)]
impl FakeGemini {
    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<(HeaderMap, Value)> {
        self.last_request.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct FakeState {
    reply: FakeReply,
    hits: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<(HeaderMap, Value)>>>,
}

async fn fake_generate(
    State(state): State<FakeState>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let parsed = serde_json::from_str(&body).unwrap_or(Value::Null);
    *state.last_request.lock().unwrap() = Some((headers, parsed));

    if !state.reply.delay.is_zero() {
        tokio::time::sleep(state.reply.delay).await;
    }
    (state.reply.status, state.reply.body.clone())
}

/// Start a local server that answers every request with `reply`.
#[allow(dead_code)]
pub async fn spawn_fake_gemini(reply: FakeReply) -> FakeGemini {
    let hits = Arc::new(AtomicUsize::new(0));
    let last_request = Arc::new(Mutex::new(None));
    let state = FakeState {
        reply,
        hits: hits.clone(),
        last_request: last_request.clone(),
    };

    let app = Router::new().fallback(fake_generate).with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeGemini {
        base_url: format!("http://{}", addr),
        hits,
        last_request,
    }
}

/// Fake endpoint returning `text` as the first candidate.
#[allow(dead_code)]
pub async fn spawn_gemini_returning(text: &str) -> FakeGemini {
    spawn_fake_gemini(FakeReply {
        status: StatusCode::OK,
        body: gemini_envelope(text).to_string(),
        delay: Duration::ZERO,
    })
    .await
}

/// Provider envelope wrapping `text`.
#[allow(dead_code)]
pub fn gemini_envelope(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }], "role": "model" },
            "finishReason": "STOP"
        }]
    })
}

/// Config pointing the Gemini client at `base_url`.
#[allow(dead_code)]
pub fn test_config(base_url: &str) -> Config {
    Config {
        gemini_base_url: base_url.to_string(),
        ..Config::default()
    }
}

/// Profile used by the knee-pain scenario.
#[allow(dead_code)]
pub fn knee_pain_profile() -> UserProfile {
    UserProfile {
        name: "Maria".to_string(),
        age: 70,
        restrictions: vec!["knee_pain".to_string()],
        availability: Availability {
            days: vec!["Segunda".to_string(), "Quarta".to_string()],
            time: "08:00".to_string(),
        },
    }
}

/// Fresh scratch directory under the system temp dir.
#[allow(dead_code)]
pub fn temp_dir(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "silverfit-{}-{}-{}",
        name,
        std::process::id(),
        nanos
    ))
}

/// Create a test app over an in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with(Config::default(), KvStore::new_memory())
}

#[allow(dead_code)]
pub fn create_test_app_with(config: Config, store: KvStore) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, store));
    (create_router(state.clone()), state)
}
