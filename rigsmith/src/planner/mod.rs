//! Generation → resolution → at most one adjustment round.
//!
//! [`Planner::run`] asks the provider for a complete component list, resolves it against the
//! marketplace, and returns right away when the bundle is acceptable. Otherwise it sends one
//! round of feedback, resolves only the categories the provider revised, merges those into
//! the first bundle, and returns the merged result whatever its final deviation.

mod error;
pub mod prompt;

pub use error::BuildError;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::bundle::{Bundle, BundleResolver, DEFAULT_BUDGET_TOLERANCE};
use crate::catalog::{AdjustedSpec, ComponentSpec};
use crate::llm::{LlmClient, LlmResponse, LlmUsage};
use crate::message::Message;

/// Default overall time allowed for one run.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(300);

/// Planner tuning, loaded as the `[planner]` config section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Allowed relative deviation of the total from the budget.
    pub budget_tolerance: f64,
    /// Overall deadline per run in seconds; 0 disables it.
    pub deadline_secs: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            budget_tolerance: DEFAULT_BUDGET_TOLERANCE,
            deadline_secs: DEFAULT_DEADLINE.as_secs(),
        }
    }
}

impl PlannerConfig {
    pub fn deadline(&self) -> Option<Duration> {
        (self.deadline_secs > 0).then(|| Duration::from_secs(self.deadline_secs))
    }
}

/// Result of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutcome {
    /// Provider text of the last generation call.
    pub narration: String,
    pub bundle: Bundle,
    /// Whether the adjustment round ran.
    pub adjusted: bool,
    pub budget: u64,
    /// Deviation of the final bundle from the budget.
    pub deviation: f64,
    /// Acceptability of the final bundle. May be false after an adjustment round.
    pub acceptable: bool,
    /// Token usage summed over the generation calls; `None` when the provider reported none.
    pub usage: Option<LlmUsage>,
}

impl BuildOutcome {
    fn new(
        narration: String,
        bundle: Bundle,
        adjusted: bool,
        budget: u64,
        tolerance: f64,
        usage: Option<LlmUsage>,
    ) -> Self {
        let deviation = bundle.deviation(budget);
        let acceptable = bundle.is_acceptable(budget, tolerance);
        Self {
            narration,
            bundle,
            adjusted,
            budget,
            deviation,
            acceptable,
            usage,
        }
    }
}

/// Drives the two-stage build against a provider and a bundle resolver.
///
/// Shared across requests behind an `Arc`; all per-run state lives on the stack of
/// [`Planner::run`].
pub struct Planner {
    llm: Arc<dyn LlmClient>,
    bundles: BundleResolver,
    config: PlannerConfig,
}

impl Planner {
    pub fn new(llm: Arc<dyn LlmClient>, bundles: BundleResolver, config: PlannerConfig) -> Self {
        Self {
            llm,
            bundles,
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub async fn run(&self, prompt: &str, budget: u64) -> Result<BuildOutcome, BuildError> {
        if budget == 0 {
            return Err(BuildError::InvalidBudget);
        }
        let started = Instant::now();
        let result = match self.config.deadline() {
            Some(deadline) => tokio::time::timeout(deadline, self.run_rounds(prompt, budget))
                .await
                .map_err(|_| BuildError::DeadlineExceeded(deadline))
                .and_then(|r| r),
            None => self.run_rounds(prompt, budget).await,
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(outcome) => info!(
                budget,
                total = outcome.bundle.total(),
                missing = outcome.bundle.missing().len(),
                adjusted = outcome.adjusted,
                acceptable = outcome.acceptable,
                elapsed_ms,
                "build finished"
            ),
            Err(e) => error!(budget, error = %e, elapsed_ms, "build failed"),
        }
        result
    }

    async fn run_rounds(&self, prompt: &str, budget: u64) -> Result<BuildOutcome, BuildError> {
        let tolerance = self.config.budget_tolerance;

        let initial = self
            .llm
            .invoke(&[
                Message::system(prompt::SYSTEM_PROMPT),
                Message::user(prompt::initial_request(prompt, budget)),
            ])
            .await?;
        let mut usage = None;
        record_usage(&mut usage, "initial", &initial);
        let spec = ComponentSpec::parse(&initial.content).map_err(BuildError::InitialSpec)?;

        let bundle = self.bundles.resolve_bundle(&spec).await;
        if bundle.is_acceptable(budget, tolerance) {
            debug!(total = bundle.total(), "initial bundle acceptable");
            return Ok(BuildOutcome::new(
                initial.content,
                bundle,
                false,
                budget,
                tolerance,
                usage,
            ));
        }

        debug!(
            total = bundle.total(),
            missing = ?bundle.missing(),
            deviation = bundle.deviation(budget),
            "initial bundle unacceptable, requesting adjustment"
        );
        let adjusted = self
            .llm
            .invoke(&[
                Message::system(prompt::SYSTEM_PROMPT),
                Message::user(prompt::adjustment_feedback(&bundle, budget)),
            ])
            .await?;
        record_usage(&mut usage, "adjustment", &adjusted);
        let revision = AdjustedSpec::parse(&adjusted.content).map_err(BuildError::AdjustedSpec)?;

        let mut merged = bundle;
        let revised = self.bundles.resolve_entries(revision.entries()).await;
        let written = merged.merge_resolved(revised);
        debug!(replaced = ?written, total = merged.total(), "adjustment merged");

        Ok(BuildOutcome::new(
            adjusted.content,
            merged,
            true,
            budget,
            tolerance,
            usage,
        ))
    }
}

fn record_usage(total: &mut Option<LlmUsage>, round: &str, response: &LlmResponse) {
    let Some(usage) = &response.usage else {
        return;
    };
    debug!(
        round,
        prompt_tokens = usage.prompt_tokens,
        completion_tokens = usage.completion_tokens,
        total_tokens = usage.total_tokens,
        "generation usage"
    );
    total.get_or_insert_with(LlmUsage::default).accumulate(usage);
}
