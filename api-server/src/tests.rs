use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use axum::response::IntoResponse;
use intel_response_core::{Engine, EngineConfig, EngineError, MemoryPersistence};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::config::Config;
use crate::{create_router, AppError, AppState};

fn app(api_key: Option<&str>) -> Router {
    let engine = Engine::new(EngineConfig::default(), Arc::new(MemoryPersistence::new()));
    let config = Config {
        api_key: api_key.map(str::to_string),
        ..Default::default()
    };
    create_router(AppState {
        engine: Arc::new(engine),
        config,
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn burst_window() -> Value {
    let signals: Vec<Value> = (0..6)
        .map(|i| {
            json!({
                "id": format!("s-{}", i),
                "text": "According to reports, Acme Corp is accused of fraud",
                "platform": if i % 2 == 0 { "reddit" } else { "twitter" },
                "entity_name": "Acme Corp",
                "timestamp": format!("2024-05-10T09:{:02}:00Z", i * 5),
            })
        })
        .collect();
    json!({ "signals": signals })
}

#[tokio::test]
async fn test_health_is_public() {
    let app = app(Some("secret"));
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_api_key_guard() {
    let app = app(Some("secret"));
    let (status, _) = send(&app, Method::GET, "/api/v1/validation/stats", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/api/v1/validation/stats")
        .header("x-api-key", "secret")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .uri("/api/v1/validation/stats")
        .header(header::AUTHORIZATION, "Bearer wrong")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_validate_discards_missing_entity() {
    let app = app(None);
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/signals/validate",
        Some(json!({ "content": "Nothing relevant here", "entity_name": "Acme Corp", "platform": "twitter" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tier"], "discard");
    assert_eq!(body["confidence"], 0.0);
    assert_eq!(body["rejection_reason"], "entity_not_found");

    let (_, stats) = send(&app, Method::GET, "/api/v1/validation/stats", None).await;
    assert_eq!(stats["total_validations"], 1);
    assert_eq!(stats["discarded_count"], 1);
}

#[tokio::test]
async fn test_validate_rejects_bad_request() {
    let app = app(None);
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/signals/validate",
        Some(json!({ "content": "", "entity_name": "Acme Corp" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/signals/validate",
        Some(json!({ "content": "Acme Corp", "entity_name": "Acme Corp", "base_confidence": 1.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_classify_signal() {
    let app = app(None);
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/signals/classify",
        Some(json!({ "content": "Acme Corp fraud scam exposed", "entity_name": "Acme Corp", "platform": "twitter" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classification"]["category"], "Reputation Attack");
}

#[tokio::test]
async fn test_unknown_ids_are_404() {
    let app = app(None);
    for uri in [
        "/api/v1/strategies/missing",
        "/api/v1/strategies/missing/prediction",
        "/api/v1/plans/missing",
        "/api/v1/plans/missing/metrics",
    ] {
        let (status, _) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
    }

    let (status, _) = send(&app, Method::POST, "/api/v1/strategies/missing/execute", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_generate_then_execute_strategy() {
    let app = app(None);
    let (status, strategies) = send(
        &app,
        Method::POST,
        "/api/v1/entities/Acme%20Corp/strategies",
        Some(burst_window()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = strategies[0]["id"].as_str().unwrap().to_string();

    let (status, prediction) = send(&app, Method::GET, &format!("/api/v1/strategies/{}/prediction", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prediction["strategy_id"], id.as_str());

    let (status, result) = send(&app, Method::POST, &format!("/api/v1/strategies/{}/execute", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["status"], "completed");

    let (status, _) = send(&app, Method::POST, &format!("/api/v1/strategies/{}/execute", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, stored) = send(&app, Method::GET, &format!("/api/v1/strategies/{}", id), None).await;
    assert_eq!(stored["status"], "completed");
}

#[tokio::test]
async fn test_plan_lifecycle() {
    let app = app(None);
    let (_, strategies) = send(
        &app,
        Method::POST,
        "/api/v1/entities/Acme%20Corp/strategies",
        Some(burst_window()),
    )
    .await;
    let ids: Vec<Value> = strategies
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].clone())
        .collect();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/plans",
        Some(json!({ "entity_name": "Acme Corp", "strategy_ids": ["missing"] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, plan) = send(
        &app,
        Method::POST,
        "/api/v1/plans",
        Some(json!({ "entity_name": "Acme Corp", "strategy_ids": ids })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let plan_id = plan["id"].as_str().unwrap().to_string();

    let (status, result) = send(&app, Method::POST, &format!("/api/v1/plans/{}/execute", plan_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["status"], "completed");

    let (_, view) = send(&app, Method::GET, &format!("/api/v1/plans/{}", plan_id), None).await;
    assert_eq!(view["status"]["status"], "completed");

    let (status, metrics) = send(&app, Method::GET, &format!("/api/v1/plans/{}/metrics", plan_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(metrics["overall_reach"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn test_cycle_endpoint() {
    let app = app(None);
    let mut window = burst_window();
    window["execute_plan"] = json!(true);

    let (status, report) = send(&app, Method::POST, "/api/v1/entities/Acme%20Corp/cycle", Some(window)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["ingest"]["total"], 6);
    assert_eq!(report["recommendation"]["strategy_type"], "counter_narrative");
    assert_eq!(report["execution"]["status"], "completed");

    let (status, best) = send(&app, Method::GET, "/api/v1/entities/Acme%20Corp/strategies/best?limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(best.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_engine_errors_map_to_status() {
    let cases = [
        (EngineError::strategy_not_found("s-1"), StatusCode::NOT_FOUND, "strategy 's-1' not found"),
        (
            EngineError::StateConflict {
                kind: "strategy",
                id: "s-1".to_string(),
                expected: "pending".to_string(),
                actual: "completed".to_string(),
            },
            StatusCode::CONFLICT,
            "strategy 's-1' is completed, expected pending",
        ),
        (
            EngineError::Config("bad threshold".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
        ),
    ];

    for (engine_error, status, message) in cases {
        let response = AppError::from(engine_error).into_response();
        assert_eq!(response.status(), status);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], message);
        assert_eq!(body["status"], status.as_u16());
    }

    let internal = AppError::from(EngineError::Config("bad threshold".to_string()));
    assert_eq!(internal.to_string(), "Internal error: configuration error: bad threshold");
}
