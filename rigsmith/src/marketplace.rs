//! Marketplace search contract: request construction and result-card projection.
//!
//! The search endpoint takes a URL-encoded free-text query plus a fixed browser-like header
//! set, and answers with JSON result cards:
//!
//! ```json
//! { "data": { "cards": [ { "title": "...", "unitPrice": 52990, "shopLink": "/shop/p/...",
//!   "previewImages": [ { "medium": "https://..." } ], "rating": 4.9, "reviewsQuantity": 312 } ] } }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::catalog::Listing;

/// Static session cookie sent by default: a storefront city and a visitor token, no login.
pub const DEFAULT_SESSION_COOKIE: &str = "ks.tg=47; kaspi.storefront.cookie.city=750000000";

/// Endpoint and impersonation headers for marketplace searches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketplaceConfig {
    /// Search endpoint without the query parameter.
    pub search_url: String,
    /// Name of the free-text query parameter.
    pub query_param: String,
    /// Base that relative shop links are joined to.
    pub origin: String,
    pub host: String,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub referer: String,
    /// Static session cookie sent with every search. Defaults to [`DEFAULT_SESSION_COOKIE`];
    /// set it to empty to send no cookie header.
    pub cookie: String,
    /// Per-request transport timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            search_url: "https://kaspi.kz/yml/product-view/pl/results".to_string(),
            query_param: "text".to_string(),
            origin: "https://kaspi.kz".to_string(),
            host: "kaspi.kz".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36"
                .to_string(),
            accept: "application/json, text/*".to_string(),
            accept_language: "ru-RU,ru;q=0.9,en;q=0.8".to_string(),
            referer: "https://kaspi.kz/shop/search/".to_string(),
            cookie: DEFAULT_SESSION_COOKIE.to_string(),
            timeout_secs: 30,
        }
    }
}

impl MarketplaceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Search URL for `term`, with the term URL-encoded into `query_param`.
    pub fn search_url_for(&self, term: &str) -> Result<String, url::ParseError> {
        let mut url = Url::parse(&self.search_url)?;
        url.query_pairs_mut().append_pair(&self.query_param, term);
        Ok(url.into())
    }

    /// Header set sent with every search; empty values are left out.
    pub fn headers(&self) -> Vec<(String, String)> {
        [
            ("Host", &self.host),
            ("User-Agent", &self.user_agent),
            ("Accept", &self.accept),
            ("Accept-Language", &self.accept_language),
            ("Referer", &self.referer),
            ("Cookie", &self.cookie),
        ]
        .into_iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
    }

    fn absolute_link(&self, link: &str) -> String {
        if link.is_empty() || link.starts_with("http://") || link.starts_with("https://") {
            return link.to_string();
        }
        Url::parse(&self.origin)
            .and_then(|base| base.join(link))
            .map(String::from)
            .unwrap_or_else(|_| link.to_string())
    }

    /// Parses a JSON search payload into listings, in marketplace order.
    ///
    /// Cards are read from `data.cards` (or a top-level `cards`); cards without a title or
    /// a non-negative price are skipped. A payload with neither array yields no listings.
    pub fn parse_listings(&self, body: &str) -> Result<Vec<Listing>, serde_json::Error> {
        let json: Value = serde_json::from_str(body)?;
        let cards = json
            .get("data")
            .and_then(|d| d.get("cards"))
            .or_else(|| json.get("cards"))
            .and_then(Value::as_array);
        Ok(cards
            .map(|cards| cards.iter().filter_map(|c| self.parse_card(c)).collect())
            .unwrap_or_default())
    }

    fn parse_card(&self, card: &Value) -> Option<Listing> {
        let name = card.get("title")?.as_str()?.trim();
        if name.is_empty() {
            return None;
        }
        let price = parse_price(card.get("unitPrice").or_else(|| card.get("price"))?)?;
        let url = card
            .get("shopLink")
            .and_then(Value::as_str)
            .map(|l| self.absolute_link(l))
            .unwrap_or_default();
        let image = card
            .get("previewImages")
            .and_then(Value::as_array)
            .and_then(|images| images.first())
            .and_then(preview_image_url)
            .unwrap_or_default();
        let rating = card.get("rating").and_then(Value::as_f64).unwrap_or(0.0);
        let review_count = card
            .get("reviewsQuantity")
            .and_then(Value::as_u64)
            .unwrap_or(0);

        Some(Listing {
            name: name.to_string(),
            price,
            url,
            image,
            rating,
            review_count,
        })
    }
}

fn parse_price(value: &Value) -> Option<u64> {
    if let Some(p) = value.as_u64() {
        return Some(p);
    }
    let p = value.as_f64()?;
    (p.is_finite() && p >= 0.0).then(|| p.round() as u64)
}

fn preview_image_url(image: &Value) -> Option<String> {
    if let Some(s) = image.as_str() {
        return Some(s.to_string());
    }
    ["medium", "large", "small"]
        .iter()
        .find_map(|k| image.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}
