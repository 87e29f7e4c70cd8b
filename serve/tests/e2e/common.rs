//! Shared helpers for e2e tests: a planner over scripted collaborators and a spawned server.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rigsmith::{BundleResolver, Category, Listing, MockLlm, Planner, PlannerConfig, ProductLookup};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Lookup that answers from a fixed term → listing map.
pub struct FixedLookup(pub HashMap<String, Listing>);

#[async_trait]
impl ProductLookup for FixedLookup {
    async fn resolve(&self, term: &str) -> Option<Listing> {
        self.0.get(term).cloned()
    }
}

pub fn term(category: Category) -> String {
    format!("{} pick", category.label())
}

/// Provider reply naming `term(c)` for every category.
pub fn full_reply() -> String {
    let object: serde_json::Map<String, serde_json::Value> = Category::ALL
        .iter()
        .map(|c| (c.label().to_string(), serde_json::Value::from(term(*c))))
        .collect();
    serde_json::Value::Object(object).to_string()
}

/// Lookup resolving every category's term at `price`, except `skip`.
pub fn lookup_except(price: u64, skip: &[Category]) -> FixedLookup {
    FixedLookup(
        Category::ALL
            .iter()
            .filter(|c| !skip.contains(c))
            .map(|c| {
                (
                    term(*c),
                    Listing::new(format!("{} listing", c.label()), price, "https://shop/p/1"),
                )
            })
            .collect(),
    )
}

pub fn planner(llm: MockLlm, lookup: FixedLookup) -> Arc<Planner> {
    planner_sharing(Arc::new(llm), lookup)
}

/// Like [`planner`], but the caller keeps a handle on the provider to count calls.
pub fn planner_sharing(llm: Arc<MockLlm>, lookup: FixedLookup) -> Arc<Planner> {
    Arc::new(Planner::new(
        llm,
        BundleResolver::new(Arc::new(lookup), Duration::ZERO),
        PlannerConfig::default(),
    ))
}

pub struct TestServer {
    pub base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<Result<(), Box<dyn std::error::Error + Send + Sync>>>,
}

impl TestServer {
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = tokio::time::timeout(Duration::from_secs(5), self.handle).await;
    }
}

/// Binds to a random port and spawns the server. Stop it with [`TestServer::stop`].
pub async fn spawn_server(planner: Arc<Planner>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(serve::run_serve_on_listener(listener, planner, async move {
        let _ = rx.await;
    }));
    TestServer {
        base_url: format!("http://{}", addr),
        shutdown: Some(tx),
        handle,
    }
}

pub async fn post_build(
    base_url: &str,
    body: serde_json::Value,
) -> (reqwest::StatusCode, serde_json::Value) {
    let response = reqwest::Client::new()
        .post(format!("{}/api/build", base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    let text = response.text().await.unwrap();
    eprintln!("[e2e] received: {}", text);
    let json = serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);
    (status, json)
}
