#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use daybook::api::{self, AppState};
use daybook::feedback::{FeedbackProvider, UpstreamError};
use daybook::journal::{EntryStore, JournalEntry, SharedStore};
use serde_json::Value;
use tower::ServiceExt;

/// Build an entry with every list field set, for equality checks.
pub fn sample_entry(id: &str) -> JournalEntry {
    JournalEntry {
        todo: vec!["buy milk".into()],
        wins: vec!["ran 5k".into()],
        emotions: vec!["tired".into()],
        reflection: "ok day".into(),
        ..JournalEntry::new(id)
    }
}

/// Feedback provider that answers from a script and records the prompts it saw.
pub struct StubFeedback {
    reply: Result<String, fn() -> UpstreamError>,
    pub prompts: Mutex<Vec<String>>,
}

impl StubFeedback {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(make_err: fn() -> UpstreamError) -> Self {
        Self {
            reply: Err(make_err),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl FeedbackProvider for StubFeedback {
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(make_err) => Err(make_err()),
        }
    }

    fn model(&self) -> &str {
        "stub"
    }
}

/// Router over `entries` with a stub provider that always answers "Well done.".
pub fn test_app(entries: Vec<JournalEntry>) -> (Router, SharedStore) {
    test_app_with(entries, Arc::new(StubFeedback::replying("Well done.")))
}

pub fn test_app_with(
    entries: Vec<JournalEntry>,
    feedback: Arc<dyn FeedbackProvider>,
) -> (Router, SharedStore) {
    let store = EntryStore::from_entries(entries).into_shared();
    let router = api::router(AppState::new(store.clone(), feedback));
    (router, store)
}

/// Send one request and return the status and the JSON body (`Null` when empty).
pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub fn store_len(store: &SharedStore) -> usize {
    store.read().unwrap().len()
}
