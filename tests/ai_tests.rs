//! AI routes driven by in-process text generators.

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use alumni::api::AppState;
use alumni::clients::llm::{LlmError, TextGenerator};
use alumni::config::Config;
use alumni::state::SharedState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Replies with the prompt it was given and remembers how often it was called.
#[derive(Default)]
struct EchoGenerator {
    calls: Mutex<usize>,
}

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn ask(&self, prompt: &str, _system: &str, _temperature: f32) -> Result<String, LlmError> {
        *self.calls.lock().unwrap() += 1;
        Ok(prompt.to_string())
    }
}

struct FixedGenerator(&'static str);

#[async_trait]
impl TextGenerator for FixedGenerator {
    async fn ask(&self, _: &str, _: &str, _: f32) -> Result<String, LlmError> {
        Ok(self.0.to_string())
    }
}

struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn ask(&self, _: &str, _: &str, _: f32) -> Result<String, LlmError> {
        Err(LlmError::Api {
            status: 502,
            message: "bad gateway".to_string(),
        })
    }
}

async fn spawn_app(generator: Arc<dyn TextGenerator>) -> (Arc<AppState>, Router, String) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let shared = SharedState::with_generator(config, generator)
        .await
        .expect("Failed to create shared state");
    let state = alumni::api::create_app_state(Arc::new(shared), None);
    state
        .store()
        .seed_sample_alumni()
        .await
        .expect("Failed to seed");
    let app = alumni::api::router(state.clone());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "username": "admin", "password": "admin123" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .unwrap()
        .to_string();

    (state, app, cookie)
}

async fn call(app: &Router, cookie: &str, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/json");
    let request = builder
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_summary_returns_model_text() {
    let (_, app, cookie) = spawn_app(Arc::new(EchoGenerator::default())).await;

    let (status, body) = call(
        &app,
        &cookie,
        "POST",
        "/api/ai/summary",
        Some(json!({ "name": "王五", "major": "人工智能", "work": "某科技公司", "bio": "NLP" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let summary = body["data"]["summary"].as_str().unwrap();
    assert!(summary.contains("姓名：王五"));
    assert!(summary.contains("工作/公司：某科技公司"));
}

#[tokio::test]
async fn test_draft_email_applies_defaults() {
    let (_, app, cookie) = spawn_app(Arc::new(EchoGenerator::default())).await;

    let (status, body) = call(
        &app,
        &cookie,
        "POST",
        "/api/ai/draft_email",
        Some(json!({ "points": ["时间：周六", "  ", "地点：礼堂"] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let draft = body["data"]["draft"].as_str().unwrap();
    assert!(draft.contains("校友活动通知"));
    assert!(draft.contains("本校校友"));
    assert!(draft.contains("正式友好"));
    assert!(draft.contains("时间：周六; 地点：礼堂"));
}

#[tokio::test]
async fn test_ranked_search_returns_candidates_and_raw_ranking() {
    let (_, app, cookie) = spawn_app(Arc::new(EchoGenerator::default())).await;

    let (status, body) = call(&app, &cookie, "GET", "/api/ai/search?q=wang", None).await;

    assert_eq!(status, StatusCode::OK);
    let candidates = body["data"]["candidates"].as_array().unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0]["name"], "王五");
    assert_eq!(candidates[0]["snippet"], "算法工程师，NLP/LLM");
    assert!(candidates[0].get("bio").is_none());

    let ranked = body["data"]["ranked"].as_str().unwrap();
    assert!(ranked.contains("用户搜索：wang"));
    assert!(ranked.contains("姓名=王五"));
}

#[tokio::test]
async fn test_ranked_search_without_hits_still_asks_model() {
    let generator = Arc::new(EchoGenerator::default());
    let (_, app, cookie) = spawn_app(generator.clone()).await;

    let (status, body) = call(&app, &cookie, "GET", "/api/ai/search?q=zzzz", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["candidates"], json!([]));
    assert!(body["data"]["ranked"].as_str().unwrap().contains("（无）"));
    assert_eq!(*generator.calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_ranked_search_blank_query_skips_model() {
    let generator = Arc::new(EchoGenerator::default());
    let (_, app, cookie) = spawn_app(generator.clone()).await;

    let (status, body) = call(&app, &cookie, "GET", "/api/ai/search?q=%20%20", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["ranked"].is_null());
    assert_eq!(body["data"]["candidates"], json!([]));
    assert_eq!(*generator.calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_expand_parses_model_keywords() {
    let generator = Arc::new(FixedGenerator(
        "当然可以：[\"分布式存储\", \"对象存储\", \"x\", \"对象存储\"]",
    ));
    let (_, app, cookie) = spawn_app(generator).await;

    let (status, body) = call(&app, &cookie, "GET", "/api/ai/expand?q=%E5%AD%98%E5%82%A8", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["query"], "存储");
    assert_eq!(body["data"]["keywords"], json!(["分布式存储", "对象存储"]));
}

#[tokio::test]
async fn test_expand_falls_back_on_prose() {
    let (_, app, cookie) = spawn_app(Arc::new(FixedGenerator("sorry I can't help"))).await;

    let (_, body) = call(
        &app,
        &cookie,
        "GET",
        "/api/ai/expand?q=%E6%95%B0%E6%8D%AE%E5%BA%93",
        None,
    )
    .await;

    assert_eq!(body["data"]["keywords"], json!(["数据库"]));
}

#[tokio::test]
async fn test_upstream_failure_is_503_and_crud_unaffected() {
    let (state, app, cookie) = spawn_app(Arc::new(FailingGenerator)).await;

    let (status, body) = call(&app, &cookie, "GET", "/api/ai/search?q=wang", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], 503);
    assert!(!body["message"].as_str().unwrap().contains("bad gateway"));

    let (status, body) = call(&app, &cookie, "GET", "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"].as_array().unwrap().len() as u64,
        state.store().alumni_count().await.unwrap()
    );
}
