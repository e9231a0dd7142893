//! API endpoint integration tests

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine;
use serde_json::json;

mod common;
use common::{FixedSpeech, MemorySink, TestAppBuilder, complete_form};

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestAppBuilder::default().build();

    let (status, json) = app.get_json("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_ready_reports_degraded_integrations() {
    let app = TestAppBuilder::default().build();

    let (status, json) = app.get_json("/ready").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["credentials"]["status"], "unavailable");
    assert_eq!(json["checks"]["lead_sheet"]["status"], "unavailable");
    assert_eq!(json["checks"]["speech"]["status"], "unavailable");
}

#[tokio::test]
async fn test_ready_all_integrations_up() {
    let app = TestAppBuilder::default()
        .credentials()
        .remote(MemorySink::default())
        .speech(FixedSpeech {
            audio: vec![1, 2],
            fail: false,
        })
        .build();

    let (_, json) = app.get_json("/ready").await;

    assert_eq!(json["status"], "ok");
    assert_eq!(json["checks"]["lead_sheet"]["status"], "ok");
    assert!(json["checks"]["speech"].get("message").is_none());
}

#[tokio::test]
async fn test_index_serves_builtin_page() {
    let app = TestAppBuilder::default().build();

    let response = app
        .send(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let page = String::from_utf8(body.to_vec()).unwrap();
    assert!(page.contains("/chat"));
}

#[tokio::test]
async fn test_faq_lists_questions() {
    let app = TestAppBuilder::default().build();

    let (status, json) = app.get_json("/faq").await;

    assert_eq!(status, StatusCode::OK);
    let questions = json["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 13);
    assert!(questions.contains(&json!("how do you price your solutions?")));
}

#[tokio::test]
async fn test_chat_faq_answer_awaits_confirmation() {
    let app = TestAppBuilder::default().build();

    let (status, json) = app
        .post_json(
            "/chat",
            json!({"message": "  How do you PRICE your solutions?  ", "state": 0}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["new_state"], 1);
    let response = json["response"].as_str().unwrap();
    assert!(response.starts_with("Pricing depends on scope"));
    assert!(response.ends_with("  Can I help you with anything else? (Yes/No)"));
}

#[tokio::test]
async fn test_chat_other_queries_collects_lead() {
    let app = TestAppBuilder::default().build();

    let (_, json) = app
        .post_json("/chat", json!({"message": "Other Queries", "state": 0}))
        .await;

    assert_eq!(json["new_state"], 2);
    assert!(json["response"].as_str().unwrap().contains("provide your details"));
}

#[tokio::test]
async fn test_chat_idle_timeout_collects_lead() {
    let app = TestAppBuilder::default().build();

    let (_, json) = app
        .post_json("/chat", json!({"message": "idle_timeout", "state": 0}))
        .await;

    assert_eq!(json["new_state"], 2);
}

#[tokio::test]
async fn test_chat_missing_fields_default_to_greeting() {
    let app = TestAppBuilder::default().build();

    let (status, json) = app.post_json("/chat", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["new_state"], 0);
    assert!(json["response"].as_str().unwrap().starts_with("I'm sorry"));
}

#[tokio::test]
async fn test_chat_confirmation_flow() {
    let app = TestAppBuilder::default().build();

    let (_, json) = app
        .post_json("/chat", json!({"message": "YES", "state": 1}))
        .await;
    assert_eq!(json["new_state"], 0);
    assert_eq!(json["response"], "Great! How else can I help you?");

    let (_, json) = app
        .post_json("/chat", json!({"message": "maybe", "state": 1}))
        .await;
    assert_eq!(json["new_state"], 1);

    let (_, json) = app
        .post_json("/chat", json!({"message": "no", "state": 1}))
        .await;
    assert_eq!(json["new_state"], 3);

    let (_, json) = app
        .post_json("/chat", json!({"message": "hello again", "state": 3}))
        .await;
    assert_eq!(json["new_state"], 3);
    assert_eq!(json["response"], "");
}

#[tokio::test]
async fn test_chat_unknown_state_is_echoed() {
    let app = TestAppBuilder::default().build();

    let (status, json) = app
        .post_json("/chat", json!({"message": "hi", "state": 42}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["new_state"], 42);
    assert_eq!(json["response"], "");
}

#[tokio::test]
async fn test_chat_lead_submission_uses_remote_sheet() {
    let app = TestAppBuilder::default()
        .remote(MemorySink::default())
        .build();

    let (_, json) = app
        .post_json(
            "/chat",
            json!({"message": "submit_lead_form", "state": 2, "user_data": complete_form()}),
        )
        .await;

    assert_eq!(json["new_state"], 0);
    assert!(json["response"].as_str().unwrap().starts_with("Thank you!"));

    let rows = app.remote.as_ref().unwrap().rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "Asha Rao");
    assert_eq!(rows[0][4], "Need a demand forecasting dashboard");
    assert_eq!(rows[0][5].len(), "2025-01-01 00:00:00".len());
    assert!(app.local.rows().is_empty());
}

#[tokio::test]
async fn test_chat_lead_submission_falls_back_to_local() {
    let app = TestAppBuilder::default().build();

    let (_, json) = app
        .post_json(
            "/chat",
            json!({"message": "submit_lead_form", "state": 2, "user_data": complete_form()}),
        )
        .await;

    assert_eq!(json["new_state"], 0);
    assert_eq!(app.local.rows().len(), 1);
}

#[tokio::test]
async fn test_chat_incomplete_lead_is_not_stored() {
    let app = TestAppBuilder::default().build();

    let mut form = complete_form();
    form["email"] = json!("   ");

    let (_, json) = app
        .post_json(
            "/chat",
            json!({"message": "submit_lead_form", "state": 2, "user_data": form}),
        )
        .await;

    assert_eq!(json["new_state"], 2);
    assert!(json["response"].as_str().unwrap().contains("required details"));
    assert!(app.local.rows().is_empty());
}

#[tokio::test]
async fn test_chat_remote_failure_keeps_collecting() {
    let app = TestAppBuilder::default()
        .remote(MemorySink::failing())
        .build();

    let (status, json) = app
        .post_json(
            "/chat",
            json!({"message": "submit_lead_form", "state": 2, "user_data": complete_form()}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["new_state"], 2);
    assert!(json["response"].as_str().unwrap().starts_with("There was an error"));
    assert!(app.local.rows().is_empty());
}

#[tokio::test]
async fn test_tts_rejects_empty_text() {
    let app = TestAppBuilder::default()
        .speech(FixedSpeech {
            audio: vec![0; 4],
            fail: false,
        })
        .build();

    let (status, json) = app.post_json("/tts", json!({"text": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No text provided");

    let (status, _) = app.post_json("/tts", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tts_returns_base64_audio() {
    let app = TestAppBuilder::default()
        .speech(FixedSpeech {
            audio: vec![0x00, 0x7f, 0xff, 0x10],
            fail: false,
        })
        .build();

    let (status, json) = app.post_json("/tts", json!({"text": "Hello there"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["mime_type"], "audio/L16;codec=pcm;rate=24000");
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(json["audio_data"].as_str().unwrap())
        .unwrap();
    assert_eq!(decoded, vec![0x00, 0x7f, 0xff, 0x10]);
}

#[tokio::test]
async fn test_tts_backend_failure_is_generic() {
    let app = TestAppBuilder::default()
        .speech(FixedSpeech {
            audio: Vec::new(),
            fail: true,
        })
        .build();

    let (status, json) = app.post_json("/tts", json!({"text": "Hello"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to generate speech");
}

#[tokio::test]
async fn test_tts_without_backend_fails() {
    let app = TestAppBuilder::default().build();

    let (status, json) = app.post_json("/tts", json!({"text": "Hello"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to generate speech");
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = TestAppBuilder::default().build();

    let response = app
        .send(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "https://customer.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
