//! Environment variable overrides.

use std::str::FromStr;

use super::{LoadError, RigConfig};

fn parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, LoadError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| LoadError::InvalidEnv {
                key: key.to_string(),
                value: raw,
            }),
    }
}

fn text(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Overrides config fields from variables returned by `lookup`.
///
/// | variable | field |
/// |---|---|
/// | `RIGSMITH_SEARCH_URL` | `marketplace.search_url` |
/// | `RIGSMITH_MARKETPLACE_ORIGIN` | `marketplace.origin` |
/// | `RIGSMITH_MARKETPLACE_COOKIE` | `marketplace.cookie` |
/// | `RIGSMITH_USER_AGENT` | `marketplace.user_agent` |
/// | `RIGSMITH_HTTP_TIMEOUT_SECS` | `marketplace.timeout_secs` |
/// | `RIGSMITH_FETCH_INTERVAL_MS` | `pacing.fetch_interval_ms` |
/// | `RIGSMITH_BATCH_INTERVAL_MS` | `pacing.batch_interval_ms` |
/// | `RIGSMITH_RETRY_BASE_DELAY_MS` | `retry.base_delay_ms` |
/// | `RIGSMITH_MAX_RETRIES` | `retry.max_retries` |
/// | `RIGSMITH_CACHE_TTL_SECS` | `cache.ttl_secs` |
/// | `RIGSMITH_BUDGET_TOLERANCE` | `planner.budget_tolerance` |
/// | `RIGSMITH_DEADLINE_SECS` | `planner.deadline_secs` |
/// | `OPENAI_API_KEY` | `llm.api_key` |
/// | `OPENAI_BASE_URL` | `llm.base_url` |
/// | `OPENAI_MODEL` | `llm.model` |
/// | `RIGSMITH_LLM_TEMPERATURE` | `llm.temperature` |
pub fn apply_overrides(
    config: &mut RigConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), LoadError> {
    let m = &mut config.marketplace;
    if let Some(v) = text(&lookup, "RIGSMITH_SEARCH_URL") {
        m.search_url = v;
    }
    if let Some(v) = text(&lookup, "RIGSMITH_MARKETPLACE_ORIGIN") {
        m.origin = v;
    }
    if let Some(v) = lookup("RIGSMITH_MARKETPLACE_COOKIE") {
        m.cookie = v;
    }
    if let Some(v) = text(&lookup, "RIGSMITH_USER_AGENT") {
        m.user_agent = v;
    }
    if let Some(v) = parsed(&lookup, "RIGSMITH_HTTP_TIMEOUT_SECS")? {
        m.timeout_secs = v;
    }

    if let Some(v) = parsed(&lookup, "RIGSMITH_FETCH_INTERVAL_MS")? {
        config.pacing.fetch_interval_ms = v;
    }
    if let Some(v) = parsed(&lookup, "RIGSMITH_BATCH_INTERVAL_MS")? {
        config.pacing.batch_interval_ms = v;
    }
    if let Some(v) = parsed(&lookup, "RIGSMITH_RETRY_BASE_DELAY_MS")? {
        config.retry.base_delay_ms = v;
    }
    if let Some(v) = parsed(&lookup, "RIGSMITH_MAX_RETRIES")? {
        config.retry.max_retries = v;
    }
    if let Some(v) = parsed(&lookup, "RIGSMITH_CACHE_TTL_SECS")? {
        config.cache.ttl_secs = v;
    }
    if let Some(v) = parsed(&lookup, "RIGSMITH_BUDGET_TOLERANCE")? {
        config.planner.budget_tolerance = v;
    }
    if let Some(v) = parsed(&lookup, "RIGSMITH_DEADLINE_SECS")? {
        config.planner.deadline_secs = v;
    }

    if let Some(v) = text(&lookup, "OPENAI_API_KEY") {
        config.llm.api_key = Some(v);
    }
    if let Some(v) = text(&lookup, "OPENAI_BASE_URL") {
        config.llm.base_url = Some(v);
    }
    if let Some(v) = text(&lookup, "OPENAI_MODEL") {
        config.llm.model = v;
    }
    if let Some(v) = parsed(&lookup, "RIGSMITH_LLM_TEMPERATURE")? {
        config.llm.temperature = Some(v);
    }
    Ok(())
}
