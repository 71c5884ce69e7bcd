//! HTTP API tests driven through the router without binding a socket

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use phishguard_classifiers::Classifier;
use phishguard_core::{ClassifierVerdict, Error, Label, Result};
use phishguard_policy::{HybridDecision, HybridPolicy};
use phishguard_rules::RuleEngine;
use phishguard_server::{build_decision, create_router, AppConfig, AppState};
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use tower::ServiceExt;

/// Uncertain ham for everything, except "SPAMMY" text and "BROKEN" failures
struct ScriptedClassifier;

impl Classifier for ScriptedClassifier {
    fn predict(&self, text: &str) -> Result<ClassifierVerdict> {
        if text.contains("BROKEN") {
            Err(Error::classifier("feature dimension mismatch"))
        } else if text.contains("SPAMMY") {
            ClassifierVerdict::new(Label::Spam, 0.95)
        } else if text.contains("lunch") {
            ClassifierVerdict::new(Label::Ham, 0.97)
        } else {
            ClassifierVerdict::new(Label::Ham, 0.6)
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn app(max_message_bytes: usize) -> Router {
    let decision = HybridDecision::new(
        Arc::new(ScriptedClassifier),
        Arc::new(RuleEngine::default()),
        HybridPolicy::default(),
    );
    let handle = PrometheusBuilder::new().build_recorder().handle();
    create_router(AppState::new(decision, handle, max_message_bytes))
}

async fn post_json(app: Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = app(1024)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let response = app(1024)
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_rule_escalation_over_http() {
    let (status, body) = post_json(app(1024), json!({"message": "URGENT: confirm your account"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["final_label"], "spam");
    assert_eq!(body["ai_label"], "ham");
    assert_eq!(body["is_phishing"], true);
    assert_eq!(body["rules_fired"], true);
    assert_eq!(
        body["rule_report"]["findings"],
        json!(["Urgency language", "Suspicious request"])
    );
}

#[tokio::test]
async fn test_classifier_spam_over_http() {
    let (status, body) = post_json(app(1024), json!({"message": "SPAMMY newsletter"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["final_label"], "spam");
    assert_eq!(body["ai_label"], "spam");
    assert_eq!(body["rules_fired"], false);
}

#[tokio::test]
async fn test_legitimate_message_over_http() {
    let (status, body) = post_json(
        app(1024),
        json!({"message": "Hi Daniel, are we still meeting for lunch tomorrow?"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["final_label"], "ham");
    assert_eq!(body["is_phishing"], false);
    assert_eq!(body["rules_fired"], false);
}

#[tokio::test]
async fn test_null_message_is_invalid_input() {
    let (status, body) = post_json(app(1024), json!({"message": null})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "invalid_input");

    let (status, body) = post_json(app(1024), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "invalid_input");

    let (status, body) = post_json(app(1024), json!({"message": 42})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "invalid_input");
}

#[tokio::test]
async fn test_oversized_message_rejected() {
    let (status, body) = post_json(app(16), json!({"message": "x".repeat(17)})).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["kind"], "message_too_large");
}

#[tokio::test]
async fn test_body_over_default_limit_is_too_large() {
    let message = "x".repeat(3_000_000);

    let (status, body) = post_json(app(1024), json!({ "message": message })).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["kind"], "message_too_large");
}

#[tokio::test]
async fn test_configured_limit_above_default_body_limit() {
    let message = "x".repeat(3_000_000);

    let (status, body) = post_json(app(4_000_000), json!({ "message": message })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["final_label"], "ham");
}

#[tokio::test]
async fn test_escaped_message_within_limit_is_accepted() {
    // each control character is sent as a six-byte \u escape
    let message = "\u{1}".repeat(1024);

    let (status, body) = post_json(app(1024), json!({ "message": message })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rules_fired"], false);
}

#[tokio::test]
async fn test_classifier_failure_is_server_error() {
    let (status, body) = post_json(app(1024), json!({"message": "BROKEN input"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["kind"], "classifier_error");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("feature dimension mismatch"));
}

#[tokio::test]
async fn test_unknown_route() {
    let response = app(1024)
        .oneshot(Request::builder().uri("/v2/nothing").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_build_decision_from_config() {
    let mut model = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        model,
        r#"{{"vocabulary": {{"prize": 0, "meeting": 1}}, "idf": [1.0, 1.0], "weights": [4.0, -4.0]}}"#
    )
    .unwrap();

    let config = AppConfig {
        model_path: Some(model.path().to_path_buf()),
        ..Default::default()
    };
    let decision = build_decision(&config).unwrap();

    let verdict = decision.decide("You won a prize!!").unwrap();
    assert_eq!(verdict.final_label, Label::Spam);

    let verdict = decision.decide("Team meeting").unwrap();
    assert_eq!(verdict.final_label, Label::Ham);
}

#[test]
fn test_build_decision_requires_model() {
    let err = build_decision(&AppConfig::default()).unwrap_err();
    assert!(err.to_string().contains("no model configured"));
}
