use super::common;
use rigsmith::MockLlm;

/// **Scenario**: `GET /health` answers `{"status":"ok"}`.
#[tokio::test]
async fn e2e_health() {
    let planner = common::planner(MockLlm::with_replies(Vec::<String>::new()), common::lookup_except(1, &[]));
    let server = common::spawn_server(planner).await;

    let body: serde_json::Value = reqwest::get(format!("{}/health", server.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, serde_json::json!({"status": "ok"}));

    server.stop().await;
}
