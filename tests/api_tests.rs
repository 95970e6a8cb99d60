use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use alumni::config::Config;
use http_body_util::BodyExt;
use sea_orm::{ConnectionTrait, Statement};
use serde_json::{Value, json};
use tower_sessions::ExpiredDeletion;
use tower::ServiceExt;

const ADMIN_USER: &str = "admin";
const ADMIN_PASS: &str = "admin123";

fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.server.secure_cookies = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config.llm.api_key = String::new();
    config
}

async fn spawn_app() -> Router {
    let state = alumni::api::create_app_state_from_config(test_config(), None)
        .await
        .expect("Failed to create app state");
    alumni::api::router(state)
}

struct Reply {
    status: StatusCode,
    body: Value,
    cookie: Option<String>,
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Reply {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(ToString::to_string);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    Reply {
        status,
        body,
        cookie,
    }
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let reply = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "login failed: {}", reply.body);
    reply.cookie.expect("login did not set a session cookie")
}

async fn register(app: &Router, username: &str, password: &str) -> Reply {
    send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await
}

#[tokio::test]
async fn test_public_routes() {
    let app = spawn_app().await;

    let reply = send(&app, "GET", "/", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["code"], 200);
    assert_eq!(reply.body["data"]["name"], "alumni");

    let reply = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["database"], true);
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let app = spawn_app().await;

    for uri in ["/api/users", "/api/auth/current", "/api/admin/users", "/api/metrics"] {
        let reply = send(&app, "GET", uri, None, None).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(reply.body["code"], 401, "{uri}");
    }

    let reply = send(&app, "GET", "/api/users", Some("alumni_session=forged"), None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_route_is_enveloped_404() {
    let app = spawn_app().await;

    let reply = send(&app, "GET", "/api/nope", None, None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["code"], 404);
    assert!(reply.body["data"].is_null());
}

#[tokio::test]
async fn test_login_and_logout() {
    let app = spawn_app().await;

    let cookie = login(&app, ADMIN_USER, ADMIN_PASS).await;

    let reply = send(&app, "GET", "/api/auth/current", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["username"], ADMIN_USER);
    assert_eq!(reply.body["data"]["role"], "admin");

    let reply = send(&app, "POST", "/api/auth/logout", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = send(&app, "GET", "/api/auth/current", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

async fn session_rows(state: &alumni::api::AppState) -> i64 {
    let conn = &state.store().conn;
    let row = conn
        .query_one(Statement::from_string(
            conn.get_database_backend(),
            "SELECT COUNT(*) AS n FROM tower_sessions".to_string(),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

#[tokio::test]
async fn test_sessions_are_stored_and_expired_ones_purged() {
    let state = alumni::api::create_app_state_from_config(test_config(), None)
        .await
        .unwrap();
    let app = alumni::api::router(state.clone());

    let cookie = login(&app, ADMIN_USER, ADMIN_PASS).await;
    assert_eq!(session_rows(&state).await, 1);

    let conn = &state.store().conn;
    conn.execute(Statement::from_string(
        conn.get_database_backend(),
        "UPDATE tower_sessions SET expiry_date = 0".to_string(),
    ))
    .await
    .unwrap();
    state.shared.sessions.delete_expired().await.unwrap();
    assert_eq!(session_rows(&state).await, 0);

    let reply = send(&app, "GET", "/api/auth/current", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_failures_do_not_leak() {
    let app = spawn_app().await;

    let wrong_password = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": ADMIN_USER, "password": "nope-nope" })),
    )
    .await;
    let unknown_user = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "ghost", "password": "nope-nope" })),
    )
    .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body["message"], unknown_user.body["message"]);

    let empty = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "", "password": "" })),
    )
    .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    assert_eq!(empty.body["code"], 400);
}

#[tokio::test]
async fn test_register_validation() {
    let app = spawn_app().await;

    let reply = register(&app, "ab", "secret1").await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = register(&app, "carol", "12345").await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "username": "carol", "password": "secret1", "confirm": "secret2" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    // None of the rejected attempts created an account
    let admin = login(&app, ADMIN_USER, ADMIN_PASS).await;
    let reply = send(&app, "GET", "/api/admin/users", Some(&admin), None).await;
    let accounts = reply.body["data"].as_array().unwrap();
    assert_eq!(accounts.len(), 1);
    assert!(accounts[0].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_logs_in_and_rejects_duplicates() {
    let app = spawn_app().await;

    let reply = register(&app, "carol", "secret1").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["role"], "user");
    let cookie = reply.cookie.expect("registration should start a session");

    let reply = send(&app, "GET", "/api/auth/current", Some(&cookie), None).await;
    assert_eq!(reply.body["data"]["username"], "carol");

    let reply = register(&app, "carol", "another1").await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.body["code"], 409);
}

#[tokio::test]
async fn test_non_admin_is_forbidden_from_admin_routes() {
    let app = spawn_app().await;

    let cookie = register(&app, "carol", "secret1").await.cookie.unwrap();

    let reply = send(&app, "GET", "/api/admin/users", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = send(&app, "DELETE", "/api/admin/users/1", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_alumni_crud() {
    let app = spawn_app().await;
    let cookie = login(&app, ADMIN_USER, ADMIN_PASS).await;

    let reply = send(&app, "POST", "/api/users", Some(&cookie), Some(json!({ "name": "  " }))).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    let reply = send(&app, "GET", "/api/users", Some(&cookie), None).await;
    assert_eq!(reply.body["data"].as_array().unwrap().len(), 0);

    let record = json!({
        "name": "王五",
        "gender": "男",
        "age": 28,
        "phone": null,
        "email": "wangwu@example.com",
        "grad_year": 2019,
        "degree": "硕士",
        "major": "人工智能",
        "city": "深圳",
        "country": "中国",
        "bio": null
    });
    let reply = send(&app, "POST", "/api/users", Some(&cookie), Some(record.clone())).await;
    assert_eq!(reply.status, StatusCode::OK);
    let id = reply.body["data"]["id"].as_i64().unwrap();

    let reply = send(&app, "GET", &format!("/api/users/{id}"), Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    let mut expected = record.clone();
    expected["id"] = json!(id);
    assert_eq!(reply.body["data"], expected);

    let reply = send(
        &app,
        "PUT",
        &format!("/api/users/{id}"),
        Some(&cookie),
        Some(json!({ "name": "王五", "city": "北京" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let reply = send(&app, "GET", &format!("/api/users/{id}"), Some(&cookie), None).await;
    assert_eq!(reply.body["data"]["city"], "北京");
    assert!(reply.body["data"]["email"].is_null());

    let reply = send(&app, "DELETE", &format!("/api/users/{id}"), Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    let reply = send(&app, "DELETE", &format!("/api/users/{id}"), Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = send(&app, "GET", &format!("/api/users/{id}"), Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_missing_record_creates_nothing() {
    let app = spawn_app().await;
    let cookie = login(&app, ADMIN_USER, ADMIN_PASS).await;

    let reply = send(
        &app,
        "PUT",
        "/api/users/999",
        Some(&cookie),
        Some(json!({ "name": "nobody" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    let reply = send(&app, "GET", "/api/users/999", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    let reply = send(&app, "GET", "/api/users", Some(&cookie), None).await;
    assert_eq!(reply.body["data"].as_array().unwrap().len(), 0);

    let reply = send(&app, "GET", "/api/users/0", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_input_is_enveloped_400() {
    let app = spawn_app().await;
    let cookie = login(&app, ADMIN_USER, ADMIN_PASS).await;

    let reply = send(
        &app,
        "POST",
        "/api/users",
        Some(&cookie),
        Some(json!({ "name": "x", "age": "abc" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], 400);
    assert!(reply.body["data"].is_null());

    let reply = send(&app, "GET", "/api/users/abc", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], 400);

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], 400);

    let reply = send(&app, "GET", "/api/users", Some(&cookie), None).await;
    assert_eq!(reply.body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_keyword_search() {
    let app = spawn_app().await;
    let cookie = login(&app, ADMIN_USER, ADMIN_PASS).await;

    for body in [
        json!({ "name": "王五", "email": "wangwu@example.com" }),
        json!({ "name": "李四", "email": "lisi@example.com", "city": "上海" }),
    ] {
        let reply = send(&app, "POST", "/api/users", Some(&cookie), Some(body)).await;
        assert_eq!(reply.status, StatusCode::OK);
    }

    let reply = send(&app, "GET", "/api/users?keyword=wang", Some(&cookie), None).await;
    let rows = reply.body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "王五");

    let reply = send(&app, "GET", "/api/users?keyword=", Some(&cookie), None).await;
    assert_eq!(reply.body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_admin_toggle_blocks_login() {
    let app = spawn_app().await;

    let reply = register(&app, "carol", "secret1").await;
    let carol_id = reply.body["data"]["id"].as_i64().unwrap();
    let admin = login(&app, ADMIN_USER, ADMIN_PASS).await;

    let reply = send(
        &app,
        "POST",
        &format!("/api/admin/users/{carol_id}/toggle"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["user_id"], carol_id);
    assert_eq!(reply.body["data"]["is_active"], false);

    let reply = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "carol", "password": "secret1" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = send(
        &app,
        "POST",
        &format!("/api/admin/users/{carol_id}/toggle"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(reply.body["data"]["is_active"], true);
    login(&app, "carol", "secret1").await;

    let reply = send(&app, "POST", "/api/admin/users/999/toggle", Some(&admin), None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_delete_account() {
    let app = spawn_app().await;

    let carol_id = register(&app, "carol", "secret1").await.body["data"]["id"]
        .as_i64()
        .unwrap();
    let admin = login(&app, ADMIN_USER, ADMIN_PASS).await;
    let admin_id = send(&app, "GET", "/api/auth/current", Some(&admin), None)
        .await
        .body["data"]["id"]
        .as_i64()
        .unwrap();

    let reply = send(
        &app,
        "DELETE",
        &format!("/api/admin/users/{admin_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = send(
        &app,
        "DELETE",
        &format!("/api/admin/users/{carol_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = send(&app, "GET", "/api/admin/users", Some(&admin), None).await;
    let ids: Vec<i64> = reply.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![admin_id]);

    let reply = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "carol", "password": "secret1" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ai_unavailable_without_credentials() {
    let app = spawn_app().await;
    let cookie = login(&app, ADMIN_USER, ADMIN_PASS).await;

    let reply = send(
        &app,
        "POST",
        "/api/ai/summary",
        Some(&cookie),
        Some(json!({ "name": "王五", "major": "人工智能", "work": "算法", "bio": "" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(reply.body["code"], 503);

    let reply = send(&app, "GET", "/api/ai/expand?q=%E6%95%B0%E6%8D%AE%E5%BA%93", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"]["keywords"], json!(["数据库"]));

    let reply = send(&app, "POST", "/api/users", Some(&cookie), Some(json!({ "name": "Lucy" }))).await;
    assert_eq!(reply.status, StatusCode::OK);
    let reply = send(&app, "GET", "/api/users", Some(&cookie), None).await;
    assert_eq!(reply.body["data"].as_array().unwrap().len(), 1);
}
