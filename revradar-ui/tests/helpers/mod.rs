//! Shared test helpers
//!
//! - `ScriptedBackend`: in-process AnalysisBackend with scripted replies
//! - `spawn_stub_server`: throwaway axum server standing in for the analysis service
//! - result fixtures and session observation helpers

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use revradar_common::events::SessionEvent;
use revradar_common::{AnalysisResult, SourcedComment, Subscores};
use revradar_ui::{AnalysisBackend, DispatchError, SearchSession};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, oneshot, watch};

pub type Outcome = Result<AnalysisResult, DispatchError>;

enum Reply {
    Now(Outcome),
    Gated(oneshot::Receiver<Outcome>),
}

/// Backend double: records every keyword, answers from a per-keyword script
///
/// Unscripted calls fail with a server error.
#[derive(Default)]
pub struct ScriptedBackend {
    calls: Mutex<Vec<String>>,
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Next call for `keyword` completes immediately with `outcome`
    pub fn reply(&self, keyword: &str, outcome: Outcome) {
        self.script(keyword, Reply::Now(outcome));
    }

    /// Next call for `keyword` waits until the returned sender is used
    pub fn gate(&self, keyword: &str) -> oneshot::Sender<Outcome> {
        let (tx, rx) = oneshot::channel();
        self.script(keyword, Reply::Gated(rx));
        tx
    }

    fn script(&self, keyword: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .entry(keyword.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Keywords received so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisBackend for ScriptedBackend {
    async fn analyze(&self, keyword: &str) -> Result<AnalysisResult, DispatchError> {
        self.calls.lock().unwrap().push(keyword.to_string());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(keyword)
            .and_then(|queue| queue.pop_front());

        match reply {
            Some(Reply::Now(outcome)) => outcome,
            Some(Reply::Gated(rx)) => rx.await.unwrap_or_else(|_| {
                Err(DispatchError::Server {
                    status: 599,
                    detail: Some("gate dropped".to_string()),
                })
            }),
            None => Err(DispatchError::Server {
                status: 500,
                detail: Some(format!("unscripted call for {}", keyword)),
            }),
        }
    }
}

/// Result with review data, Sony WH-1000XM5 scenario
pub fn reviewed_result() -> AnalysisResult {
    AnalysisResult {
        rating: 4.5,
        subscores: Subscores::new([4.0, 4.0, 5.0, 4.0]),
        summary: "Class-leading noise cancelling.".to_string(),
        comments: vec![SourcedComment::new("great", "http://x")],
        pros: Vec::new(),
        cons: Vec::new(),
        similar_products: vec!["Bose 700".to_string()],
    }
}

/// Result without review data (general summary only)
pub fn no_data_result() -> AnalysisResult {
    AnalysisResult {
        rating: 0.0,
        // Non-zero on purpose: the interim publish must zero it anyway
        subscores: Subscores::new([1.0, 2.0, 3.0, 4.0]),
        summary: "General info about this product.".to_string(),
        similar_products: vec!["Alternative One".to_string()],
        ..Default::default()
    }
}

/// Result distinguishable by its summary
pub fn tagged_result(tag: &str) -> AnalysisResult {
    AnalysisResult {
        summary: tag.to_string(),
        ..reviewed_result()
    }
}

/// Wire payload for the Sony WH-1000XM5 scenario
pub fn reviewed_payload() -> Value {
    json!({
        "final_rating": 4.5,
        "subscores": [4, 4, 5, 4],
        "ai_summary": "...",
        "comments": [["great", "http://x"]],
        "pros": [],
        "cons": [],
        "similar_products": ["Bose 700"]
    })
}

/// Wait (bounded) until the watched session satisfies `predicate`
pub async fn wait_for_state<F>(states: &mut watch::Receiver<SearchSession>, predicate: F) -> SearchSession
where
    F: FnMut(&SearchSession) -> bool,
{
    let observed = tokio::time::timeout(Duration::from_secs(30), states.wait_for(predicate))
        .await
        .expect("timed out waiting for session state")
        .expect("session dropped");
    observed.clone()
}

/// Everything currently queued on the event receiver
pub fn drain_events(events: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

/// Serve `router` on an ephemeral local port, returning its base URL
pub async fn spawn_stub_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Base URL of a local port with nothing listening
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
