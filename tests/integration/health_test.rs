use super::common;

use common::fixtures::ScriptedModel;
use common::test_server::TestServer;
use std::sync::Arc;

#[tokio::test]
async fn test_health_endpoint() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].is_number());
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_health_ready_endpoint() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .get(server.url("/health/ready"))
        .send()
        .await
        .unwrap();

    // The default registry always carries the three domain tools
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["tools"], 3);
}

#[tokio::test]
async fn test_health_live_endpoint() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .get(server.url("/health/live"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let model = Arc::new(ScriptedModel::new(vec![
        "Action: Lineage_Explorer\nAction Input: orders",
        "Final Answer: orders flows downstream",
    ]));
    let server = TestServer::with_model(model).await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/agent/query"))
        .json(&serde_json::json!({"text": "where does orders come from?"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .get(server.url("/metrics"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    let body = response.text().await.unwrap();
    assert!(body.contains("comply_nav_queries_total"));
    assert!(body.contains("comply_nav_tool_invocations_total"));
    assert!(body.contains("Lineage_Explorer"));
}
