//! Shared test doubles for the marketplace and product lookups.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rigsmith::{Category, FetchError, HttpClient, Listing, ProductLookup, RawResponse};
use tokio::time::Instant;

/// Marketplace double: answers by the `text` query parameter, records every request.
pub struct StubMarketplace {
    responses: Mutex<HashMap<String, Vec<Result<RawResponse, FetchError>>>>,
    requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl StubMarketplace {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Queues a response for `term`; the last queued response repeats once the queue drains.
    pub fn respond(&self, term: &str, response: Result<RawResponse, FetchError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(term.to_string())
            .or_default()
            .push(response);
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.requests.lock().unwrap().clone()
    }
}

fn query_term(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.query_pairs()
                .find(|(k, _)| k == "text")
                .map(|(_, v)| v.into_owned())
        })
        .unwrap_or_default()
}

#[async_trait]
impl HttpClient for StubMarketplace {
    async fn get(&self, url: &str, headers: &[(String, String)]) -> Result<RawResponse, FetchError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), headers.to_vec()));
        let term = query_term(url);
        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(&term) {
            Some(queue) if queue.len() > 1 => queue.remove(0),
            Some(queue) if queue.len() == 1 => queue[0].clone(),
            _ => Ok(RawResponse::json(r#"{"data":{"cards":[]}}"#)),
        }
    }
}

/// JSON search body with one card per `(title, price)`.
pub fn cards(items: &[(&str, u64)]) -> String {
    let cards: Vec<serde_json::Value> = items
        .iter()
        .map(|(title, price)| {
            serde_json::json!({
                "title": title,
                "unitPrice": price,
                "shopLink": format!("/shop/p/{}/", title.to_lowercase().replace(' ', "-")),
                "previewImages": [{"medium": "https://img/m.jpg"}],
                "rating": 4.5,
                "reviewsQuantity": 10
            })
        })
        .collect();
    serde_json::json!({ "data": { "cards": cards } }).to_string()
}

/// In-memory [`ProductLookup`]: term → listing, with call recording.
#[derive(Default)]
pub struct MapLookup {
    listings: HashMap<String, Listing>,
    panic_on: Option<String>,
    delay: Duration,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl MapLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, term: &str, name: &str, price: u64) -> Self {
        self.listings.insert(
            term.to_string(),
            Listing::new(name, price, format!("https://shop/p/{}", price)),
        );
        self
    }

    pub fn panicking_on(mut self, term: &str) -> Self {
        self.panic_on = Some(term.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn terms(&self) -> Vec<String> {
        let mut terms: Vec<String> = self.calls.lock().unwrap().iter().map(|(t, _)| t.clone()).collect();
        terms.sort();
        terms
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }
}

#[async_trait]
impl ProductLookup for MapLookup {
    async fn resolve(&self, term: &str) -> Option<Listing> {
        self.calls
            .lock()
            .unwrap()
            .push((term.to_string(), Instant::now()));
        if self.panic_on.as_deref() == Some(term) {
            panic!("lookup exploded for {term}");
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.listings.get(term).cloned()
    }
}

/// Search terms used by the scripted provider replies, one per category.
pub fn term_for(category: Category) -> &'static str {
    match category {
        Category::Cpu => "AMD Ryzen 5 7600",
        Category::Gpu => "MSI GeForce RTX 4060 VENTUS 2X",
        Category::Motherboard => "ASUS TUF GAMING B650-PLUS",
        Category::Ram => "Kingston FURY Beast 32GB DDR5",
        Category::Psu => "be quiet! Pure Power 12 M 650W",
        Category::CpuCooler => "DeepCool AK400",
        Category::Fan => "Arctic P12 PWM",
        Category::Case => "Zalman i3 Neo",
    }
}

/// Provider reply naming [`term_for`] every category, wrapped in a code fence with prose.
pub fn full_spec_reply() -> String {
    let object: serde_json::Map<String, serde_json::Value> = Category::ALL
        .iter()
        .map(|c| (c.label().to_string(), serde_json::Value::from(term_for(*c))))
        .collect();
    format!(
        "Here is a balanced build:\n```json\n{}\n```",
        serde_json::Value::Object(object)
    )
}

/// Lookup that resolves every [`term_for`] term at `price` each.
pub fn lookup_all_at(price: u64) -> MapLookup {
    Category::ALL
        .iter()
        .fold(MapLookup::new(), |lookup, c| lookup.with(term_for(*c), term_for(*c), price))
}
