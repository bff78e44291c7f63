//! End-to-end tests of the HTTP action surface.
//!
//! Each test starts a real server on an ephemeral port and talks to it with
//! reqwest, the way a chat front end would.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use mindmate::CompanionService;
use mindmate::config::ServerConfig;
use mindmate::interaction::InteractionLog;
use mindmate::server::{AppState, MindMateServer};
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;

async fn start_server() -> (MindMateServer, Arc<InteractionLog>) {
    let log = Arc::new(InteractionLog::default());
    let state = AppState::new(CompanionService::keyword(), Arc::clone(&log), 7);
    let config = ServerConfig {
        host: "127.0.0.1".to_owned(),
        port: 0,
    };
    let server = MindMateServer::start(state, &config).await.unwrap();
    (server, log)
}

async fn post_action(server: &MindMateServer, body: Value) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(format!("http://{}/", server.addr()))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn health_endpoint_answers() {
    let (server, _) = start_server().await;
    let body: Value = reqwest::get(format!("http://{}/health", server.addr()))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn generate_response_returns_reply_and_verdict() {
    let (server, _) = start_server().await;
    let (status, body) = post_action(
        &server,
        json!({
            "action": "generate_response",
            "data": { "message": "I feel happy and grateful today" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["sentiment"]["label"], "POSITIVE");
    assert!((body["sentiment"]["score"].as_f64().unwrap() - 0.8).abs() < 1e-6);
    assert!(body["response"].as_str().is_some_and(|s| !s.is_empty()));
}

#[tokio::test]
async fn crisis_message_gets_crisis_resources() {
    let (server, _) = start_server().await;
    let (status, body) = post_action(
        &server,
        json!({
            "action": "generate_response",
            "data": { "message": "Honestly I think about suicide a lot" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentiment"]["label"], "CRISIS");
    let reply = body["response"].as_str().unwrap().to_lowercase();
    assert!(
        ["crisis", "emergency", "hotline"]
            .iter()
            .any(|kw| reply.contains(kw)),
        "{reply}"
    );
}

#[tokio::test]
async fn mood_response_follows_the_bucket() {
    let (server, _) = start_server().await;
    let (status, body) = post_action(
        &server,
        json!({ "action": "mood_response", "data": { "mood": "great" } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mood"], "great");
    assert!(body["response"].as_str().is_some_and(|s| !s.is_empty()));
}

#[tokio::test]
async fn unknown_action_is_rejected() {
    let (server, _) = start_server().await;
    let (status, body) = post_action(&server, json!({ "action": "delete_everything" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Unknown action");
}

#[tokio::test]
async fn malformed_data_is_a_bad_request() {
    let (server, _) = start_server().await;
    let (status, body) = post_action(
        &server,
        json!({ "action": "get_interactions", "data": { "sessionId": 42 } }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("get_interactions"));
}

#[tokio::test]
async fn session_history_round_trip() {
    let (server, log) = start_server().await;

    post_action(
        &server,
        json!({
            "action": "generate_response",
            "data": { "message": "I am so stressed", "sessionId": "session_a" }
        }),
    )
    .await;
    post_action(
        &server,
        json!({
            "action": "mood_response",
            "data": { "mood": "anxious", "sessionId": "session_a" }
        }),
    )
    .await;
    let (status, _) = post_action(
        &server,
        json!({
            "action": "track_interaction",
            "data": { "type": "message", "content": "unrelated", "sessionId": "session_b" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(log.len().await, 3);

    let (status, body) = post_action(
        &server,
        json!({ "action": "get_interactions", "data": { "sessionId": "session_a" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let interactions = body["interactions"].as_array().unwrap();
    assert_eq!(interactions.len(), 2);
    assert_eq!(interactions[0]["type"], "message");
    assert_eq!(interactions[0]["sentiment"]["label"], "NEGATIVE");
    assert_eq!(interactions[1]["type"], "mood_selection");
    assert_eq!(interactions[1]["mood"], "anxious");
}

#[tokio::test]
async fn analytics_count_the_window() {
    let (server, _) = start_server().await;
    for message in ["I feel great", "I feel amazing", "This is awful"] {
        post_action(
            &server,
            json!({
                "action": "generate_response",
                "data": { "message": message, "sessionId": "session_stats" }
            }),
        )
        .await;
    }

    let (status, body) = post_action(&server, json!({ "action": "get_analytics" })).await;
    assert_eq!(status, StatusCode::OK);
    let analytics = &body["analytics"];
    assert_eq!(analytics["totalInteractions"], 3);
    assert_eq!(analytics["windowDays"], 7);
    assert_eq!(analytics["sentimentDistribution"]["POSITIVE"], 2);
    assert_eq!(analytics["sentimentDistribution"]["NEGATIVE"], 1);
    let rows = analytics["weeklyData"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["content"], "I feel great");
    assert_eq!(rows[2]["sentiment"]["label"], "NEGATIVE");
    assert_eq!(analytics["crisisShare"], 0.0);
}

#[tokio::test]
async fn unparseable_body_gets_json_error() {
    let (server, _) = start_server().await;
    let response = reqwest::Client::new()
        .post(format!("http://{}/", server.addr()))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn missing_action_gets_json_error() {
    let (server, _) = start_server().await;
    let (status, body) = post_action(&server, json!({ "data": {} })).await;
    assert!(status.is_client_error());
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn preflight_is_answered_for_any_origin() {
    let (server, _) = start_server().await;
    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("http://{}/", server.addr()))
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type, apikey")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success(), "{}", response.status());
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    let allowed = headers["access-control-allow-headers"]
        .to_str()
        .unwrap()
        .to_lowercase();
    for name in ["authorization", "x-client-info", "apikey", "content-type"] {
        assert!(allowed.contains(name), "{allowed}");
    }
}

#[tokio::test]
async fn action_replies_carry_allow_origin() {
    let (server, _) = start_server().await;
    let response = reqwest::Client::new()
        .post(format!("http://{}/", server.addr()))
        .header("origin", "http://localhost:5173")
        .json(&json!({ "action": "mood_response", "data": { "mood": "okay" } }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn out_of_range_sentiment_is_rejected_and_not_logged() {
    let (server, log) = start_server().await;
    for action in ["generate_response", "track_interaction"] {
        let (status, body) = post_action(
            &server,
            json!({
                "action": action,
                "data": {
                    "type": "message",
                    "content": "hi",
                    "message": "hi",
                    "sessionId": "session_bad",
                    "sentiment": { "label": "CRISIS", "score": 7.5 }
                }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{action}");
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("0..=1"), "{body}");
    }
    assert!(log.is_empty().await);
}

#[tokio::test]
async fn supplied_crisis_sentiment_is_pinned() {
    let (server, log) = start_server().await;
    let (status, body) = post_action(
        &server,
        json!({
            "action": "track_interaction",
            "data": {
                "type": "message",
                "content": "rough night",
                "sessionId": "session_pin",
                "sentiment": { "label": "CRISIS", "score": 0.3 }
            }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["interaction"]["sentiment"]["label"], "CRISIS");
    assert!((body["interaction"]["sentiment"]["score"].as_f64().unwrap() - 0.95).abs() < 1e-6);
    let stored = log.for_session("session_pin").await;
    assert_eq!(stored[0].verdict, Some(mindmate::Verdict::crisis()));
}
