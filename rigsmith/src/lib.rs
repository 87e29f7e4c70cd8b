//! # Rigsmith
//!
//! Budget-constrained PC parts planning. A generative-text provider proposes one product per
//! component category; every proposal is reconciled against live marketplace listings; when
//! the result is incomplete or off budget the provider gets one round of feedback and the
//! revised categories are merged back in.
//!
//! ## Pipeline
//!
//! - [`Planner`]: generation, resolution, at most one adjustment round ([`BuildOutcome`]).
//! - [`BundleResolver`]: resolves all categories of a mapping, one paced batch at a time,
//!   one task per category ([`Bundle`]).
//! - [`ProductResolver`]: search term → best listing via [`best_match`], through the shared
//!   [`ProductCache`] and [`RateLimitedFetcher`].
//! - [`RateLimitedFetcher`]: process-wide request spacing ([`Pacer`]) and exponential backoff
//!   on throttling ([`BackoffPolicy`]).
//!
//! ## Seams
//!
//! - [`LlmClient`] with [`ChatOpenAI`] and [`MockLlm`].
//! - [`HttpClient`] with [`ReqwestHttpClient`].
//! - [`ProductLookup`] for bundle-level tests without HTTP.
//! - [`Cache`] with [`InMemoryCache`].
//!
//! Configuration lives in [`config`]; [`build_planner`] wires everything from a [`RigConfig`].

pub mod builder;
pub mod bundle;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod fetch;
pub mod llm;
pub mod marketplace;
pub mod matching;
pub mod message;
pub mod pacing;
pub mod planner;
pub mod resolver;
pub mod retry;

pub use builder::{build_planner, build_planner_with};
pub use bundle::{Bundle, BundleResolver, DEFAULT_BATCH_INTERVAL, DEFAULT_BUDGET_TOLERANCE};
pub use cache::{Cache, InMemoryCache, ProductCache, DEFAULT_PRODUCT_TTL};
pub use catalog::{AdjustedSpec, Category, ComponentSpec, Listing, SpecError};
pub use config::{LoadError, RigConfig};
pub use fetch::{FetchError, HttpClient, RateLimitedFetcher, RawResponse, ReqwestHttpClient};
pub use llm::{ChatOpenAI, LlmClient, LlmError, LlmResponse, LlmUsage, MockLlm};
pub use marketplace::{MarketplaceConfig, DEFAULT_SESSION_COOKIE};
pub use matching::{best_match, similarity};
pub use message::Message;
pub use pacing::{PacedQueue, Pacer};
pub use planner::{BuildError, BuildOutcome, Planner, PlannerConfig};
pub use resolver::{ProductLookup, ProductResolver};
pub use retry::{BackoffPolicy, DEFAULT_BASE_DELAY};
