use super::common;

use common::test_server::TestServer;
use reqwest::multipart::{Form, Part};

const POLICY_TEXT: &str = "Customer records must be retained for seven years.\n\
Access to personal data requires approval from the data owner.";

fn policy_form(name: &str, text: &str) -> Form {
    let part = Part::text(text.to_string())
        .file_name(name.to_string())
        .mime_str("text/plain")
        .unwrap();
    Form::new().part("file", part)
}

#[tokio::test]
async fn test_upload_then_summary() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/policy/upload"))
        .multipart(policy_form("retention.txt", POLICY_TEXT))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(
        body["message"],
        "Policy document 'retention.txt' uploaded successfully"
    );
    assert_eq!(body["document"]["status"], "processed");
    let doc_id = body["document"]["doc_id"].as_str().unwrap().to_string();
    assert_eq!(doc_id.len(), 16);

    let response = client
        .get(server.url(&format!("/policy/{}/summary", doc_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let summary: serde_json::Value = response.json().await.unwrap();
    assert_eq!(summary["doc_id"], doc_id.as_str());
    assert_eq!(summary["title"], "retention.txt");

    assert_eq!(server.ctx.policies.len().await, 1);
}

#[tokio::test]
async fn test_upload_binary_pdf() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let pdf: Vec<u8> = b"%PDF-1.7\n\xe2\xe3\xcf\xd3\n1 0 obj\n<< /Type /Catalog >>\nendobj\n".to_vec();
    let part = Part::bytes(pdf)
        .file_name("gdpr.pdf")
        .mime_str("application/pdf")
        .unwrap();

    let response = client
        .post(server.url("/policy/upload"))
        .multipart(Form::new().part("file", part))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["document"]["word_count"], 0);
    let doc_id = body["document"]["doc_id"].as_str().unwrap().to_string();

    let summary: serde_json::Value = client
        .get(server.url(&format!("/policy/{}/summary", doc_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary["title"], "gdpr.pdf");
    assert_eq!(summary["metadata"]["content_type"], "application/pdf");
}

#[tokio::test]
async fn test_reupload_is_idempotent() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let mut ids = Vec::new();
    for _ in 0..2 {
        let body: serde_json::Value = client
            .post(server.url("/policy/upload"))
            .multipart(policy_form("retention.txt", POLICY_TEXT))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        ids.push(body["document"]["doc_id"].as_str().unwrap().to_string());
    }

    assert_eq!(ids[0], ids[1]);
    assert_eq!(server.ctx.policies.len().await, 1);
}

#[tokio::test]
async fn test_upload_rejects_missing_or_empty_file() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/policy/upload"))
        .multipart(Form::new().text("note", "no file here"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = client
        .post(server.url("/policy/upload"))
        .multipart(policy_form("empty.txt", "   "))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"]["kind"], "invalid_request");
}

#[tokio::test]
async fn test_unknown_summary_is_not_found() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .get(server.url("/policy/0000000000000000/summary"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}
