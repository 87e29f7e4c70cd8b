use std::sync::Arc;

use super::common;
use rigsmith::{Category, MockLlm};
use serde_json::json;

/// **Scenario**: A full, on-budget reply returns 200 with every product keyed by its label.
#[tokio::test]
async fn e2e_build_returns_products_by_label() {
    let planner = common::planner(
        MockLlm::with_replies([common::full_reply()]),
        common::lookup_except(62_500, &[]),
    );
    let server = common::spawn_server(planner).await;

    let (status, body) = common::post_build(
        &server.base_url,
        json!({"prompt": "Gaming PC", "budget": 500000}),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["response"], common::full_reply());
    assert_eq!(body["total"], 500_000);
    assert_eq!(body["acceptable"], true);
    assert_eq!(body["adjusted"], false);
    assert_eq!(body["missing"], json!([]));
    let products = body["products"].as_object().unwrap();
    assert_eq!(products.len(), 8);
    assert_eq!(products["CPU Cooler"]["name"], "CPU Cooler listing");
    assert_eq!(products["PC case"]["price"], 62_500);
    assert_eq!(products["GPU"]["reviewCount"], 0);

    server.stop().await;
}

/// **Scenario**: A category still unresolved after adjustment is listed under `missing`.
#[tokio::test]
async fn e2e_build_reports_missing_after_adjustment() {
    let planner = common::planner(
        MockLlm::with_replies([common::full_reply(), r#"{"GPU": "nothing sells"}"#.to_string()]),
        common::lookup_except(50_000, &[Category::Gpu]),
    );
    let server = common::spawn_server(planner).await;

    let (status, body) = common::post_build(
        &server.base_url,
        json!({"prompt": "Gaming PC", "budget": 500000}),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["adjusted"], true);
    assert_eq!(body["acceptable"], false);
    assert_eq!(body["missing"], json!(["GPU"]));
    assert!(body["products"].get("GPU").is_none());
    assert_eq!(body["total"], 350_000);

    server.stop().await;
}

/// **Scenario**: An unparseable provider reply maps to 500 with a generic error body.
#[tokio::test]
async fn e2e_build_failure_is_internal_error() {
    let planner = common::planner(
        MockLlm::with_replies(["not json at all"]),
        common::lookup_except(1, &[]),
    );
    let server = common::spawn_server(planner).await;

    let (status, body) = common::post_build(
        &server.base_url,
        json!({"prompt": "PC", "budget": 500000}),
    )
    .await;

    assert_eq!(status, 500);
    assert_eq!(body, json!({"error": "internal error"}));

    server.stop().await;
}

/// **Scenario**: A zero or negative budget is 400 `invalid budget`; a missing budget is a 4xx.
#[tokio::test]
async fn e2e_build_rejects_invalid_budget() {
    let planner = common::planner(MockLlm::with_replies(Vec::<String>::new()), common::lookup_except(1, &[]));
    let server = common::spawn_server(planner).await;

    for budget in [json!(0), json!(-100)] {
        let (status, body) = common::post_build(
            &server.base_url,
            json!({"prompt": "PC", "budget": budget}),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({"error": "invalid budget"}));
    }

    let (status, _) = common::post_build(&server.base_url, json!({"prompt": "PC"})).await;
    assert!(status.is_client_error());

    server.stop().await;
}

/// **Scenario**: A prompt one character over the limit is 400 `prompt too long` without any
/// provider call; a prompt exactly at the limit is served.
#[tokio::test]
async fn e2e_build_rejects_prompt_over_limit() {
    let llm = Arc::new(MockLlm::with_replies([common::full_reply()]));
    let planner = common::planner_sharing(Arc::clone(&llm), common::lookup_except(62_500, &[]));
    let server = common::spawn_server(planner).await;

    let (status, body) = common::post_build(
        &server.base_url,
        json!({"prompt": "x".repeat(4001), "budget": 500000}),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({"error": "prompt too long"}));
    assert_eq!(llm.call_count(), 0);

    let (status, _) = common::post_build(
        &server.base_url,
        json!({"prompt": "x".repeat(4000), "budget": 500000}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(llm.call_count(), 1);

    server.stop().await;
}

/// **Scenario**: A request body over the 64 KiB cap is refused with 413 before the handler runs.
#[tokio::test]
async fn e2e_build_rejects_oversized_body() {
    let llm = Arc::new(MockLlm::with_replies(Vec::<String>::new()));
    let planner = common::planner_sharing(Arc::clone(&llm), common::lookup_except(1, &[]));
    let server = common::spawn_server(planner).await;

    let (status, _) = common::post_build(
        &server.base_url,
        json!({"prompt": "x".repeat(70 * 1024), "budget": 500000}),
    )
    .await;
    assert_eq!(status, 413);
    assert_eq!(llm.call_count(), 0);

    server.stop().await;
}
