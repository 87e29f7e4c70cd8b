//! End-to-end planner runs with a scripted provider and in-memory lookups.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{cards, full_spec_reply, lookup_all_at, term_for, MapLookup, StubMarketplace};
use rigsmith::{
    build_planner_with, BuildError, BundleResolver, Category, LlmError, LlmUsage, Message,
    MockLlm, Planner, PlannerConfig, RawResponse, RigConfig, SpecError,
};

fn planner(llm: Arc<MockLlm>, lookup: Arc<MapLookup>) -> Planner {
    Planner::new(
        llm,
        BundleResolver::new(lookup, Duration::ZERO),
        PlannerConfig::default(),
    )
}

/// **Scenario**: An on-budget first bundle returns after a single generation call.
#[tokio::test]
async fn acceptable_first_bundle_uses_one_generation_call() {
    let llm = Arc::new(MockLlm::with_replies([full_spec_reply()]));
    let lookup = Arc::new(lookup_all_at(62_500));

    let outcome = planner(llm.clone(), lookup.clone())
        .run("Gaming PC for 1440p", 500_000)
        .await
        .unwrap();

    assert_eq!(llm.call_count(), 1);
    assert!(!outcome.adjusted);
    assert!(outcome.acceptable);
    assert_eq!(outcome.bundle.total(), 500_000);
    assert_eq!(outcome.deviation, 0.0);
    assert_eq!(outcome.narration, full_spec_reply());
    assert_eq!(lookup.terms().len(), 8);
    assert_eq!(outcome.usage, None);

    let request = &llm.requests()[0];
    assert!(matches!(request[0], Message::System(_)));
    assert!(request[1].content().contains("Gaming PC for 1440p"));
    assert!(request[1].content().contains("500000"));
}

/// **Scenario**: A missing GPU triggers one feedback round; only the revised GPU is looked up and merged.
#[tokio::test]
async fn missing_gpu_triggers_one_adjustment_and_merge() {
    let adjusted_reply = r#"{"GPU": "Palit GeForce RTX 4060 Dual"}"#;
    let llm = Arc::new(MockLlm::with_replies([full_spec_reply(), adjusted_reply.to_string()]));
    let lookup = Category::ALL
        .iter()
        .filter(|c| **c != Category::Gpu)
        .fold(MapLookup::new(), |l, c| l.with(term_for(*c), term_for(*c), 50_000))
        .with("Palit GeForce RTX 4060 Dual", "Palit GeForce RTX 4060 Dual 8GB", 150_000);
    let lookup = Arc::new(lookup);

    let outcome = planner(llm.clone(), lookup.clone())
        .run("Gaming PC", 500_000)
        .await
        .unwrap();

    assert_eq!(llm.call_count(), 2);
    assert!(outcome.adjusted);
    assert_eq!(outcome.narration, adjusted_reply);
    assert!(outcome.bundle.missing().is_empty());
    assert_eq!(
        outcome.bundle.get(Category::Gpu).unwrap().name,
        "Palit GeForce RTX 4060 Dual 8GB"
    );
    assert_eq!(outcome.bundle.total(), 7 * 50_000 + 150_000);
    assert!(outcome.acceptable);

    // Eight initial lookups plus only the revised GPU.
    let terms = lookup.terms();
    assert_eq!(terms.len(), 9);
    assert_eq!(
        terms.iter().filter(|t| t.as_str() == "Palit GeForce RTX 4060 Dual").count(),
        1
    );

    let feedback = &llm.requests()[1];
    assert_eq!(feedback.len(), 2);
    assert!(matches!(feedback[0], Message::System(_)));
    assert!(feedback[1].content().contains("GPU"));
    assert!(feedback[1].content().contains("Target budget: 500000"));
    assert!(feedback[1].content().contains(term_for(Category::Cpu)));
}

/// **Scenario**: The adjustment round runs once and its result is returned even when still off budget.
#[tokio::test]
async fn adjustment_runs_once_even_if_still_off_budget() {
    let llm = Arc::new(MockLlm::with_replies([
        full_spec_reply(),
        r#"{"CPU": "AMD Ryzen 9 7950X"}"#.to_string(),
    ]));
    let lookup = Arc::new(lookup_all_at(100_000).with("AMD Ryzen 9 7950X", "AMD Ryzen 9 7950X", 300_000));

    let outcome = planner(llm.clone(), lookup)
        .run("Workstation", 500_000)
        .await
        .unwrap();

    assert_eq!(llm.call_count(), 2);
    assert!(outcome.adjusted);
    assert!(!outcome.acceptable);
    assert_eq!(outcome.bundle.total(), 7 * 100_000 + 300_000);
    assert!((outcome.deviation - 1.0).abs() < 1e-9);
}

/// **Scenario**: Usage reported by the provider is summed over both generation calls.
#[tokio::test]
async fn usage_is_summed_over_both_rounds() {
    let per_call = LlmUsage {
        prompt_tokens: 120,
        completion_tokens: 80,
        total_tokens: 200,
    };
    let llm = Arc::new(
        MockLlm::with_replies([full_spec_reply(), r#"{"CPU": "AMD Ryzen 5 7600"}"#.to_string()])
            .with_usage(per_call),
    );
    let lookup = Arc::new(lookup_all_at(100_000));

    let outcome = planner(llm.clone(), lookup).run("PC", 500_000).await.unwrap();

    assert_eq!(llm.call_count(), 2);
    assert_eq!(
        outcome.usage,
        Some(LlmUsage {
            prompt_tokens: 240,
            completion_tokens: 160,
            total_tokens: 400,
        })
    );
}

/// **Scenario**: A revision that resolves to nothing never clears the original listing.
#[tokio::test]
async fn unresolved_revision_keeps_the_original_listing() {
    let llm = Arc::new(MockLlm::with_replies([
        full_spec_reply(),
        r#"{"CPU": "Imaginary CPU", "RAM": 42, "Toaster": "x"}"#.to_string(),
    ]));
    let lookup = Arc::new(lookup_all_at(100_000));

    let outcome = planner(llm, lookup.clone())
        .run("Office PC", 500_000)
        .await
        .unwrap();

    assert!(outcome.adjusted);
    assert_eq!(
        outcome.bundle.get(Category::Cpu).unwrap().name,
        term_for(Category::Cpu)
    );
    assert!(outcome.bundle.get(Category::Ram).is_some());
    // The non-string RAM value and the unknown key never reach the marketplace.
    let terms = lookup.terms();
    assert_eq!(terms.len(), 9);
    assert!(terms.contains(&"Imaginary CPU".to_string()));
}

/// **Scenario**: A non-JSON initial reply fails the run before any marketplace lookup.
#[tokio::test]
async fn malformed_initial_reply_is_fatal_without_lookups() {
    let llm = Arc::new(MockLlm::with_replies(["I would suggest a Ryzen and a 4060."]));
    let lookup = Arc::new(lookup_all_at(1));

    let err = planner(llm.clone(), lookup.clone())
        .run("PC", 500_000)
        .await
        .unwrap_err();

    assert!(matches!(err, BuildError::InitialSpec(SpecError::NotJson(_))));
    assert_eq!(llm.call_count(), 1);
    assert!(lookup.terms().is_empty());
}

/// **Scenario**: An initial reply missing required categories names the missing ones.
#[tokio::test]
async fn initial_reply_missing_categories_is_fatal() {
    let llm = Arc::new(MockLlm::with_replies([r#"{"CPU": "Ryzen 5", "GPU": "RTX 4060"}"#]));
    let err = planner(llm, Arc::new(MapLookup::new()))
        .run("PC", 500_000)
        .await
        .unwrap_err();

    match err {
        BuildError::InitialSpec(SpecError::MissingCategories(missing)) => {
            assert_eq!(missing.len(), 6);
            assert!(!missing.contains(&Category::Cpu));
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// **Scenario**: A non-JSON adjustment reply fails the run.
#[tokio::test]
async fn malformed_adjustment_reply_is_fatal() {
    let llm = Arc::new(MockLlm::with_replies([full_spec_reply(), "no JSON today".to_string()]));
    let err = planner(llm.clone(), Arc::new(MapLookup::new()))
        .run("PC", 500_000)
        .await
        .unwrap_err();

    assert!(matches!(err, BuildError::AdjustedSpec(_)));
    assert_eq!(llm.call_count(), 2);
}

/// **Scenario**: A provider error surfaces as a generation error.
#[tokio::test]
async fn provider_failure_is_a_generation_error() {
    let llm = Arc::new(MockLlm::new(vec![Err(LlmError::EmptyResponse)]));
    let err = planner(llm, Arc::new(MapLookup::new()))
        .run("PC", 500_000)
        .await
        .unwrap_err();
    assert!(matches!(err, BuildError::Generation(LlmError::EmptyResponse)));
}

/// **Scenario**: A zero budget is rejected without calling the provider.
#[tokio::test]
async fn zero_budget_is_rejected_before_generation() {
    let llm = Arc::new(MockLlm::with_replies([full_spec_reply()]));
    let err = planner(llm.clone(), Arc::new(MapLookup::new()))
        .run("PC", 0)
        .await
        .unwrap_err();

    assert!(matches!(err, BuildError::InvalidBudget));
    assert!(err.is_client_error());
    assert_eq!(llm.call_count(), 0);
}

/// **Scenario**: A run outliving the deadline fails with `DeadlineExceeded`.
#[tokio::test(start_paused = true)]
async fn slow_run_hits_the_deadline() {
    let llm = Arc::new(MockLlm::with_replies([full_spec_reply()]));
    let lookup = Arc::new(lookup_all_at(1).with_delay(Duration::from_secs(600)));
    let planner = Planner::new(
        llm,
        BundleResolver::new(lookup, Duration::ZERO),
        PlannerConfig {
            deadline_secs: 300,
            ..PlannerConfig::default()
        },
    );

    let err = planner.run("PC", 500_000).await.unwrap_err();
    assert!(matches!(err, BuildError::DeadlineExceeded(d) if d == Duration::from_secs(300)));
}

/// **Scenario**: A planner wired from config resolves every category through the marketplace stub.
#[tokio::test]
async fn wired_planner_runs_against_stub_marketplace() {
    let marketplace = StubMarketplace::new();
    for category in Category::ALL {
        let term = term_for(category);
        marketplace.respond(
            term,
            Ok(RawResponse::json(cards(&[
                ("Refurbished parts lot", 1_000),
                (term, 60_000),
            ]))),
        );
    }

    let mut config = RigConfig::default();
    config.pacing.fetch_interval_ms = 0;
    config.pacing.batch_interval_ms = 0;

    let llm = Arc::new(MockLlm::with_replies([full_spec_reply()]));
    let planner = build_planner_with(&config, llm.clone(), marketplace.clone());

    let outcome = planner.run("Gaming PC", 480_000).await.unwrap();

    assert_eq!(llm.call_count(), 1);
    assert!(outcome.acceptable);
    assert_eq!(outcome.bundle.total(), 480_000);
    assert_eq!(marketplace.request_count(), 8);
    for (category, listing) in outcome.bundle.resolved() {
        assert_eq!(listing.name, term_for(category));
    }
}
