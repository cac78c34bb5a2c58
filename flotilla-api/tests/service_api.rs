//! Integration tests for the service API handlers.
//!
//! Uses `tower::ServiceExt::oneshot` to call handlers without binding a real
//! TCP port. The engine is a recording mock, so every test can inspect the
//! exact spec or identifier that reached it.

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use flotilla_api::server::{ApiState, build_api_router};
use flotilla_api::service::ServiceHandler;
use flotilla_core::description::{ServiceDescription, ServiceMode};
use flotilla_core::messages::RemoveServiceRequest;
use flotilla_core::spec::EngineServiceSpec;
use flotilla_core::translate::TranslationPolicy;
use flotilla_engine::{EngineClient, EngineError, ServiceCreateOptions};
use std::sync::{Arc, Mutex};
use tower::ServiceExt; // .oneshot()

// ── Mock engine ───────────────────────────────────────────────

#[derive(Default)]
struct MockEngine {
    created: Mutex<Vec<EngineServiceSpec>>,
    removed: Mutex<Vec<String>>,
    fail_with: Option<(u16, &'static str)>,
    reachable: bool,
}

impl MockEngine {
    fn healthy() -> Self {
        Self {
            reachable: true,
            ..Self::default()
        }
    }

    fn failing(status: u16, message: &'static str) -> Self {
        Self {
            fail_with: Some((status, message)),
            reachable: true,
            ..Self::default()
        }
    }

    fn error(&self) -> Option<EngineError> {
        self.fail_with.map(|(status, message)| EngineError::Api {
            status,
            message: message.to_string(),
        })
    }
}

#[async_trait]
impl EngineClient for MockEngine {
    async fn service_create(
        &self,
        spec: &EngineServiceSpec,
        _options: &ServiceCreateOptions,
    ) -> Result<String, EngineError> {
        if let Some(err) = self.error() {
            return Err(err);
        }
        let mut created = self.created.lock().unwrap();
        created.push(spec.clone());
        Ok(format!("svc-{}", created.len()))
    }

    async fn service_remove(&self, ident: &str) -> Result<(), EngineError> {
        if let Some(err) = self.error() {
            return Err(err);
        }
        self.removed.lock().unwrap().push(ident.to_string());
        Ok(())
    }

    async fn ping(&self) -> Result<(), EngineError> {
        if self.reachable {
            Ok(())
        } else {
            Err(EngineError::InvalidResponse("no engine".into()))
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────

fn make_state(engine: Arc<MockEngine>) -> Arc<ApiState> {
    Arc::new(ApiState {
        handler: ServiceHandler::new(engine, TranslationPolicy::default()),
        engine_api_version: "1.24".into(),
    })
}

fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_req(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn delete_req(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn web_request() -> serde_json::Value {
    serde_json::json!({
        "name": "web",
        "image": "nginx:latest",
        "mode": {"replicated": {"replicas": 3}},
        "publish_specs": [
            {"name": "http", "protocol": "tcp", "internal_port": 80, "publish_port": 8080}
        ]
    })
}

// ── Health ────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_reachable_engine() {
    let app = build_api_router(make_state(Arc::new(MockEngine::healthy())));
    let resp = app.oneshot(get_req("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let j = body_json(resp).await;
    assert_eq!(j["status"], "ok");
    assert_eq!(j["engine"], "reachable");
    assert_eq!(j["engine_api_version"], "1.24");
}

#[tokio::test]
async fn health_reports_unreachable_engine() {
    let app = build_api_router(make_state(Arc::new(MockEngine::default())));
    let resp = app.oneshot(get_req("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["engine"], "unreachable");
}

// ── Create ────────────────────────────────────────────────────

#[tokio::test]
async fn create_returns_engine_id() {
    let engine = Arc::new(MockEngine::healthy());
    let app = build_api_router(make_state(Arc::clone(&engine)));

    let resp = app.oneshot(json_post("/v1/services", web_request())).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body_json(resp).await["id"], "svc-1");

    let created = engine.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    let spec = &created[0];
    assert_eq!(spec.annotations.name, "web");
    assert_eq!(spec.mode.replicas(), Some(3));
    assert_eq!(spec.annotations.labels.get("io.flotilla.role").unwrap(), "user");
    assert_eq!(spec.task_template.networks[0].aliases, vec!["web".to_string()]);
    let ports = &spec.endpoint_spec.as_ref().unwrap().ports;
    assert_eq!(ports.len(), 1);
    assert_eq!(ports[0].target_port, 80);
    assert_eq!(ports[0].published_port, 8080);
}

#[tokio::test]
async fn create_passes_engine_error_through() {
    let engine = Arc::new(MockEngine::failing(409, "name conflicts with an existing object"));
    let app = build_api_router(make_state(engine));

    let resp = app.oneshot(json_post("/v1/services", web_request())).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let j = body_json(resp).await;
    assert_eq!(j["error"], "name conflicts with an existing object");
    assert_eq!(j["status"], 409);
    assert!(j.get("id").is_none());
}

#[tokio::test]
async fn create_with_reserved_fields_still_succeeds() {
    let engine = Arc::new(MockEngine::healthy());
    let app = build_api_router(make_state(Arc::clone(&engine)));

    let mut body = web_request();
    body["restart_policy"] = serde_json::json!({"condition": "on-failure"});
    let resp = app.oneshot(json_post("/v1/services", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let created = engine.created.lock().unwrap();
    assert!(created[0].task_template.restart_policy.is_none());
}

#[tokio::test]
async fn create_invalid_json_returns_4xx() {
    let engine = Arc::new(MockEngine::healthy());
    let app = build_api_router(make_state(Arc::clone(&engine)));
    let req = Request::builder()
        .method(Method::POST)
        .uri("/v1/services")
        .header("content-type", "application/json")
        .body(Body::from(r#"not-valid-json"#))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert!(resp.status().is_client_error(), "expected a 4xx for malformed JSON, got {}", resp.status());
    assert!(engine.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn create_with_unknown_mode_is_rejected_before_engine() {
    let engine = Arc::new(MockEngine::healthy());
    let app = build_api_router(make_state(Arc::clone(&engine)));
    let mut body = web_request();
    body["mode"] = serde_json::json!({"replicated_job": {}});
    let resp = app.oneshot(json_post("/v1/services", body)).await.unwrap();
    assert!(resp.status().is_client_error());
    assert!(engine.created.lock().unwrap().is_empty());
}

// ── Remove ────────────────────────────────────────────────────

#[tokio::test]
async fn remove_echoes_ident() {
    let engine = Arc::new(MockEngine::healthy());
    let app = build_api_router(make_state(Arc::clone(&engine)));

    let resp = app.oneshot(delete_req("/v1/services/ak7w3gjqoa3k")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["ident"], "ak7w3gjqoa3k");
    assert_eq!(*engine.removed.lock().unwrap(), vec!["ak7w3gjqoa3k".to_string()]);
}

#[tokio::test]
async fn remove_missing_service_returns_engine_not_found() {
    let engine = Arc::new(MockEngine::failing(404, "service svc123 not found"));
    let app = build_api_router(make_state(engine));

    let resp = app.oneshot(delete_req("/v1/services/svc123")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let j = body_json(resp).await;
    assert_eq!(j["error"], "service svc123 not found");
    assert!(j.get("ident").is_none());
}

// ── Handler ───────────────────────────────────────────────────

#[tokio::test]
async fn handler_remove_forwards_ident_unmodified() {
    let engine = Arc::new(MockEngine::healthy());
    let handler = ServiceHandler::new(engine.clone(), TranslationPolicy::default());

    let resp = handler
        .remove(RemoveServiceRequest { ident: "Web.Frontend-01".into() })
        .await
        .unwrap();
    assert_eq!(resp.ident, "Web.Frontend-01");
    assert_eq!(*engine.removed.lock().unwrap(), vec!["Web.Frontend-01".to_string()]);
}

#[tokio::test]
async fn handler_create_returns_engine_error_unchanged() {
    let engine = Arc::new(MockEngine::failing(400, "invalid reference format"));
    let handler = ServiceHandler::new(engine, TranslationPolicy::default());

    let desc: ServiceDescription = serde_json::from_value(serde_json::json!({
        "name": "bad",
        "image": "UPPER/Case:tag",
        "mode": {"global": {}}
    }))
    .unwrap();
    assert_eq!(desc.mode, ServiceMode::Global {});

    let err = handler.create(desc).await.unwrap_err();
    match err {
        EngineError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "invalid reference format");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn concurrent_creates_share_one_engine() {
    let engine = Arc::new(MockEngine::healthy());
    let state = make_state(Arc::clone(&engine));

    let mut tasks = Vec::new();
    for i in 0..8 {
        let app = build_api_router(Arc::clone(&state));
        let mut body = web_request();
        body["name"] = serde_json::json!(format!("web-{i}"));
        tasks.push(tokio::spawn(async move {
            app.oneshot(json_post("/v1/services", body)).await.unwrap().status()
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::CREATED);
    }
    assert_eq!(engine.created.lock().unwrap().len(), 8);
}
