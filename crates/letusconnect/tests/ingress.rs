// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the direct and group send routes.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use letusconnect_core::{ChatMessage, DirectMessage, DocumentStore, GroupMessage};
use letusconnect_test_utils::TestHarness;

const DIRECT: &str = "/api/v1/messages/direct";
const GROUP: &str = "/api/v1/group-chats/messages";

async fn post(harness: &TestHarness, uri: &str, token: Option<&str>, body: &str) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        request = request.header("authorization", format!("Bearer {token}"));
    }
    let response = harness
        .router()
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn direct_body(sender: &str) -> String {
    json!({
        "senderId": sender,
        "receiverId": "u2",
        "content": "hi",
        "messageType": "text",
        "readStatus": {},
        "isDeleted": false,
        "isPinned": false,
        "priority": "normal",
        "createdAt": "2024-01-01T00:00:00Z"
    })
    .to_string()
}

fn group_body(group_id: Option<&str>) -> String {
    let mut body = json!({
        "senderId": "u1",
        "senderName": "Ada",
        "projectId": "p1",
        "content": "standup in 5",
        "messageType": "text",
        "readStatus": {"u1": true},
        "reactions": {"+1": 2},
        "attachments": ["https://cdn.example/a.png"],
        "priority": "high",
        "createdAt": "2024-01-01T09:00:00.123456Z"
    });
    if let Some(g) = group_id {
        body["groupId"] = json!(g);
    }
    body.to_string()
}

#[tokio::test]
async fn happy_direct_message() {
    let harness = TestHarness::new();
    let token = harness.token("u1").unwrap();

    let (status, body) = post(&harness, DIRECT, Some(&token), &direct_body("u1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["published"], true);
    let id = body["message"]["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(body["message"]["senderId"], "u1");
    assert_eq!(body["message"]["createdAt"], "2024-01-01T00:00:00Z");

    assert_eq!(harness.store.count("direct_messages"), 1);
    let doc = harness.store.get("direct_messages", &id).await.unwrap().unwrap();
    let stored = DirectMessage::from_store(&doc);
    assert_eq!(stored.base.id, id);
    assert_eq!(stored.receiver_id, "u2");

    let events = harness.publisher.published().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].topic, "direct-messages-u2");
    assert_eq!(events[0].event, "new-direct-message");
    assert_eq!(events[0].payload["id"], id.as_str());
    assert_eq!(events[0].payload["receiverId"], "u2");
}

#[tokio::test]
async fn sender_spoof_is_forbidden() {
    let harness = TestHarness::new();
    let token = harness.token("u1").unwrap();

    let (status, body) = post(&harness, DIRECT, Some(&token), &direct_body("u2")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert_eq!(harness.store.count("direct_messages"), 0);
    assert_eq!(harness.publisher.published_count().await, 0);
}

#[tokio::test]
async fn group_message_topic_nests_group_id() {
    let harness = TestHarness::new();
    let token = harness.token("u1").unwrap();

    let (status, body) = post(&harness, GROUP, Some(&token), &group_body(Some("g1"))).await;

    assert_eq!(status, StatusCode::OK);
    let events = harness.publisher.published().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].topic, "group-messages-p1-g1");
    assert_eq!(events[0].event, "new-group-message");
    assert_eq!(body["message"]["groupId"], "g1");
}

#[tokio::test]
async fn group_message_without_group_id_uses_project_topic() {
    let harness = TestHarness::new();
    let token = harness.token("u1").unwrap();

    let (status, _) = post(&harness, GROUP, Some(&token), &group_body(None)).await;

    assert_eq!(status, StatusCode::OK);
    let events = harness.publisher.published().await;
    assert_eq!(events[0].topic, "group-messages-p1");
    assert!(events[0].payload.get("groupId").is_none());
}

#[tokio::test]
async fn stored_group_message_matches_response() {
    let harness = TestHarness::new();
    let token = harness.token("u1").unwrap();

    let (_, body) = post(&harness, GROUP, Some(&token), &group_body(Some("g1"))).await;
    let id = body["message"]["id"].as_str().unwrap();

    let doc = harness.store.get("group_messages", id).await.unwrap().unwrap();
    let stored = GroupMessage::from_store(&doc);
    let returned: GroupMessage = serde_json::from_value(body["message"].clone()).unwrap();
    assert_eq!(stored, returned);
    assert_eq!(stored.base.created_at, "2024-01-01T09:00:00.123456Z");
    assert_eq!(stored.base.reactions.get("+1"), Some(&2));
    assert_eq!(stored.topic(), "group-messages-p1-g1");
}

#[tokio::test]
async fn client_supplied_id_is_replaced() {
    let harness = TestHarness::new();
    let token = harness.token("u1").unwrap();
    let mut body: Value = serde_json::from_str(&direct_body("u1")).unwrap();
    body["id"] = json!("client-chosen");

    let (status, response) = post(&harness, DIRECT, Some(&token), &body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let id = response["message"]["id"].as_str().unwrap();
    assert!(!id.is_empty());
    assert_ne!(id, "client-chosen");
    assert!(harness
        .store
        .get("direct_messages", "client-chosen")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn repeated_sends_get_distinct_ids() {
    let harness = TestHarness::new();
    let token = harness.token("u1").unwrap();

    let (_, a) = post(&harness, DIRECT, Some(&token), &direct_body("u1")).await;
    let (_, b) = post(&harness, DIRECT, Some(&token), &direct_body("u1")).await;

    assert_ne!(a["message"]["id"], b["message"]["id"]);
    assert_eq!(harness.store.count("direct_messages"), 2);
}

#[tokio::test]
async fn missing_optional_keys_map_to_zero_values() {
    let harness = TestHarness::new();
    let token = harness.token("u1").unwrap();
    let body = json!({"senderId": "u1", "projectId": "p1"}).to_string();

    let (status, response) = post(&harness, GROUP, Some(&token), &body).await;

    assert_eq!(status, StatusCode::OK);
    let message = &response["message"];
    assert_eq!(message["content"], "");
    assert_eq!(message["isDeleted"], false);
    assert_eq!(message["attachments"], json!([]));
    assert!(message.get("groupId").is_none());
    assert!(message.get("replyTo").is_none());
}

#[tokio::test]
async fn missing_credential_is_unauthorized() {
    let harness = TestHarness::new();

    let (status, body) = post(&harness, DIRECT, None, &direct_body("u1")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(harness.store.count("direct_messages"), 0);
}

#[tokio::test]
async fn expired_and_foreign_tokens_look_identical() {
    let harness = TestHarness::new();
    let expired = harness.token_expiring_at("u1", 1_000_000).unwrap();
    let foreign = letusconnect_auth::TokenIssuer::new("some-other-secret")
        .issue("u1", std::time::Duration::from_secs(3600))
        .unwrap();

    let (s1, b1) = post(&harness, GROUP, Some(&expired), &group_body(None)).await;
    let (s2, b2) = post(&harness, GROUP, Some(&foreign), &group_body(None)).await;
    let (s3, b3) = post(&harness, GROUP, Some("not.a.jwt"), &group_body(None)).await;

    assert_eq!(s1, StatusCode::UNAUTHORIZED);
    assert_eq!((s1, &b1), (s2, &b2));
    assert_eq!((s2, &b2), (s3, &b3));
}

#[tokio::test]
async fn non_object_body_is_bad_request() {
    let harness = TestHarness::new();
    let token = harness.token("u1").unwrap();

    for body in ["[1,2,3]", "\"text\"", "{not json", ""] {
        let (status, _) = post(&harness, DIRECT, Some(&token), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
    }
    assert_eq!(harness.publisher.published_count().await, 0);
}

#[tokio::test]
async fn wrong_field_type_is_bad_request() {
    let harness = TestHarness::new();
    let token = harness.token("u1").unwrap();
    let body = json!({"senderId": "u1", "projectId": "p1", "content": 42}).to_string();

    let (status, response) = post(&harness, GROUP, Some(&token), &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"].as_str().unwrap().contains("content"));
    assert_eq!(harness.store.count("group_messages"), 0);
}

#[tokio::test]
async fn self_addressed_direct_message_is_bad_request() {
    let harness = TestHarness::new();
    let token = harness.token("u2").unwrap();

    let (status, _) = post(&harness, DIRECT, Some(&token), &direct_body("u2")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(harness.store.count("direct_messages"), 0);
}

#[tokio::test]
async fn store_failure_is_generic_500_without_publish() {
    let harness = TestHarness::new();
    harness.store.set_failing(true);
    let token = harness.token("u1").unwrap();

    let (status, body) = post(&harness, GROUP, Some(&token), &group_body(None)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to save group message");
    assert_eq!(harness.publisher.published_count().await, 0);
}

#[tokio::test]
async fn publish_failure_keeps_stored_message() {
    let harness = TestHarness::new();
    harness.publisher.set_failing(true);
    let token = harness.token("u1").unwrap();

    let (status, body) = post(&harness, DIRECT, Some(&token), &direct_body("u1")).await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["success"], true);
    assert_eq!(body["published"], false);
    assert_eq!(harness.store.count("direct_messages"), 1);
}
