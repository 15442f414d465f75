//! Tests for the REST API.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use querybot::config::ServerConfig;
use querybot::{create_router, Chatbot, RestApiConfig, UnavailableDatabase};

use crate::common::{company_chatbot, company_database};

fn router(chatbot: Chatbot) -> Router {
    create_router(Arc::new(chatbot), &RestApiConfig::default())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn chat_request(body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_chat() {
    let app = router(company_chatbot());
    let (status, body) = send(app, chat_request(json!({"message": "How many employees"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], "Found 3 records.");
    assert_eq!(body["sql"], "SELECT COUNT(*) as count FROM employees");
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["data"], json!([{"count": 3}]));
    assert_eq!(body["debug"]["intent"], "count");
    assert_eq!(body["debug"]["keywords"], json!(["many", "employees"]));
}

#[tokio::test]
async fn test_chat_generation_failure() {
    let app = router(company_chatbot());
    let (status, body) = send(app, chat_request(json!({"message": "show me all widgets"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], "Could not identify which table to query");
    assert_eq!(body["data"], Value::Null);
    assert!(body.get("sql").is_none());
    assert_eq!(body["debug"]["entities"]["table"], Value::Null);
}

#[tokio::test]
async fn test_chat_requires_message() {
    for payload in [json!({"message": ""}), json!({}), json!({"text": "hi"})] {
        let app = router(company_chatbot());
        let (status, body) = send(app, chat_request(payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"success": false, "message": "No message provided"}));
    }
}

#[tokio::test]
async fn test_chat_whitespace_message_reaches_chatbot() {
    let app = router(company_chatbot());
    let (status, body) = send(app, chat_request(json!({"message": "   "}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], "Could not identify which table to query");
}

#[tokio::test]
async fn test_chat_message_passed_unchanged() {
    let app = router(company_chatbot());
    let (status, body) = send(app, chat_request(json!({"message": "  count products\n"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Found 4 records.");
    assert_eq!(body["sql"], "SELECT COUNT(*) as count FROM products");
}

#[tokio::test]
async fn test_chat_without_body() {
    let app = router(company_chatbot());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/chat")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No message provided");
}

#[tokio::test]
async fn test_chat_not_connected() {
    let app = router(Chatbot::new(company_database()));
    let (status, body) = send(app, chat_request(json!({"message": "How many employees"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": false,
            "message": "Chatbot is not connected to database",
            "data": null
        })
    );
}

#[tokio::test]
async fn test_tables() {
    let app = router(company_chatbot());
    let (status, body) = send(app, get("/api/tables")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "tables": ["employees", "products"]}));
}

#[tokio::test]
async fn test_tables_after_close() {
    let chatbot = company_chatbot();
    chatbot.close().unwrap();
    let (status, body) = send(router(chatbot), get("/api/tables")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert!(body["message"].as_str().unwrap().contains("closed"));
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(router(company_chatbot()), get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "database_connected": true}));

    let (_, body) = send(router(Chatbot::new(company_database())), get("/api/health")).await;
    assert_eq!(body["database_connected"], json!(false));
}

#[tokio::test]
async fn test_unavailable_database() {
    let database = Arc::new(UnavailableDatabase::new("unable to open database file"));
    let mut chatbot = Chatbot::new(database);
    assert!(chatbot.initialize().is_err());
    let chatbot = Arc::new(chatbot);
    let app = create_router(chatbot, &RestApiConfig::default());

    let (_, body) = send(app.clone(), get("/api/health")).await;
    assert_eq!(body["database_connected"], json!(false));

    let (status, body) = send(app.clone(), chat_request(json!({"message": "count products"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Chatbot is not connected to database");

    let (status, body) = send(app, get("/api/tables")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("unable to open database file"));
}

#[tokio::test]
async fn test_cors_origin_list() {
    let server = ServerConfig {
        cors_origins: vec!["http://localhost:3000".to_string()],
        ..ServerConfig::default()
    };
    let app = create_router(Arc::new(company_chatbot()), &RestApiConfig::from(&server));

    let allowed = Request::builder()
        .uri("/api/health")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(allowed).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );

    let denied = Request::builder()
        .uri("/api/health")
        .header(header::ORIGIN, "http://evil.test")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(denied).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_cors_any_origin() {
    let app = router(company_chatbot());
    let request = Request::builder()
        .uri("/api/health")
        .header(header::ORIGIN, "http://anywhere.test")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_custom_prefix() {
    let config = RestApiConfig {
        prefix: "/v2".to_string(),
        enable_cors: false,
        ..RestApiConfig::default()
    };
    let app = create_router(Arc::new(company_chatbot()), &config);
    let (status, body) = send(app, get("/v2/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
