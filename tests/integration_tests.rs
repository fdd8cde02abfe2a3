//! Integration tests for the Capture Server webhook
//!
//! These tests drive the full request/response cycle through the router,
//! with the hosted model and the WhatsApp API replaced by in-process fakes.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, NaiveTime};
use hmac::{Hmac, Mac};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sha2::Sha256;
use tower::ServiceExt;

use capture_server::assistant::tools::{CREATE_BOOKMARK, CREATE_REMINDER, CREATE_TODO, DAILY_LOG};
use capture_server::assistant::{Intent, IntentClassifier, ToolCall};
use capture_server::constants::{FALLBACK_REPLY, SIGNUP_PROMPT};
use capture_server::models::NewUser;
use capture_server::whatsapp::{MessageSender, WhatsAppClient};
use capture_server::{db, routes, AppError, AppState, Config, Db};

// Test configuration constants
const VERIFY_TOKEN: &str = "test-verify-token";
const APP_SECRET: &str = "test-app-secret";
const USER_PHONE: &str = "15551234567";
const USER_ID: &str = "user-ada";

// =============================================================================
// Fakes
// =============================================================================

/// Returns a fixed intent and records every message it was asked about
struct ScriptedClassifier {
    outcome: Option<Intent>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedClassifier {
    fn returning(intent: Intent) -> Arc<Self> {
        Arc::new(Self {
            outcome: Some(intent),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            outcome: None,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl IntentClassifier for ScriptedClassifier {
    async fn classify(&self, text: &str, _today: NaiveDate) -> capture_server::Result<Intent> {
        self.seen.lock().unwrap().push(text.to_string());
        self.outcome
            .clone()
            .ok_or_else(|| AppError::LanguageModel("503 Service Unavailable".to_string()))
    }
}

/// Collects outbound messages instead of calling WhatsApp
#[derive(Default)]
struct RecordingSender {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingSender {
    fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_text(&self, to: &str, body: &str) -> capture_server::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        Ok(())
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

/// Create a test configuration
fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        database_url: "sqlite::memory:".to_string(),
        environment: "test".to_string(),
        whatsapp_verify_token: VERIFY_TOKEN.to_string(),
        whatsapp_app_secret: None,
        whatsapp_access_token: "test-access-token".to_string(),
        whatsapp_phone_number_id: "100200300".to_string(),
        whatsapp_api_base: "http://127.0.0.1:9".to_string(),
        openai_api_key: "sk-test".to_string(),
        openai_base_url: "http://127.0.0.1:9".to_string(),
        openai_model: "test-model".to_string(),
    }
}

/// Create an in-memory database with migrations applied and one registered user
async fn create_test_db() -> Db {
    let pool = capture_server::create_pool("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    capture_server::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    db::users::insert(
        &pool,
        &NewUser {
            id: USER_ID.to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone_number: Some("+1 (555) 123-4567".to_string()),
        },
    )
    .await
    .expect("Failed to insert test user");

    pool
}

struct TestApp {
    app: Router,
    db: Db,
    classifier: Arc<ScriptedClassifier>,
    sender: Arc<RecordingSender>,
}

async fn create_test_app_with(config: Config, classifier: Arc<ScriptedClassifier>) -> TestApp {
    let db = create_test_db().await;
    let sender = Arc::new(RecordingSender::default());

    let state = AppState {
        db: db.clone(),
        config,
        classifier: classifier.clone(),
        messenger: sender.clone(),
    };

    TestApp {
        app: routes::router(state),
        db,
        classifier,
        sender,
    }
}

async fn create_test_app(intent: Intent) -> TestApp {
    create_test_app_with(test_config(), ScriptedClassifier::returning(intent)).await
}

fn tool(name: &str, arguments: Value) -> Intent {
    let call = ToolCall::parse(name, &arguments.to_string())
        .expect("arguments should match the tool schema")
        .expect("tool should be known");
    Intent::Tool(call)
}

/// Webhook body carrying one text message
fn text_message(from: &str, body: &str) -> String {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "WABA_ID",
            "changes": [{
                "field": "messages",
                "value": {
                    "messaging_product": "whatsapp",
                    "metadata": { "display_phone_number": "15550001111", "phone_number_id": "100200300" },
                    "messages": [{
                        "from": from,
                        "id": "wamid.test",
                        "timestamp": "1760700000",
                        "type": "text",
                        "text": { "body": body }
                    }]
                }
            }]
        }]
    })
    .to_string()
}

/// Webhook body for a delivery receipt
fn status_update() -> String {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "changes": [{
                "field": "messages",
                "value": {
                    "statuses": [{ "id": "wamid.test", "status": "delivered", "recipient_id": USER_PHONE }]
                }
            }]
        }]
    })
    .to_string()
}

fn sign(body: &str, secret: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body.as_bytes());
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

/// Parse response body as JSON
async fn body_to_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_to_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Create a POST request with JSON body
fn make_post_request(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

/// Create a GET request
fn make_get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Total rows across the four capture tables
async fn captured_rows(db: &Db) -> i64 {
    sqlx::query_scalar(
        "SELECT (SELECT COUNT(*) FROM todos) + (SELECT COUNT(*) FROM notes)
              + (SELECT COUNT(*) FROM bookmarks) + (SELECT COUNT(*) FROM reminders)",
    )
    .fetch_one(db)
    .await
    .unwrap()
}

// =============================================================================
// Health Check Tests
// =============================================================================

#[tokio::test]
async fn test_health_check_returns_healthy() {
    let t = create_test_app(Intent::Reply("unused".to_string())).await;

    let response = t.app.oneshot(make_get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert!(body["version"].as_str().is_some());
}

// =============================================================================
// Handshake Tests
// =============================================================================

#[tokio::test]
async fn test_handshake_echoes_challenge() {
    let t = create_test_app(Intent::Reply("unused".to_string())).await;

    let uri = format!(
        "/api/whatsapp?hub.mode=subscribe&hub.verify_token={}&hub.challenge=1158201444",
        VERIFY_TOKEN
    );
    let response = t.app.oneshot(make_get_request(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_string(response.into_body()).await, "1158201444");
}

#[tokio::test]
async fn test_handshake_wrong_token_forbidden() {
    let t = create_test_app(Intent::Reply("unused".to_string())).await;

    let response = t
        .app
        .oneshot(make_get_request(
            "/api/whatsapp?hub.mode=subscribe&hub.verify_token=guess&hub.challenge=42",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(!body_to_string(response.into_body()).await.contains("42"));
}

#[tokio::test]
async fn test_handshake_wrong_mode_forbidden() {
    let t = create_test_app(Intent::Reply("unused".to_string())).await;

    let uri = format!(
        "/api/whatsapp?hub.mode=unsubscribe&hub.verify_token={}&hub.challenge=42",
        VERIFY_TOKEN
    );
    let response = t.app.oneshot(make_get_request(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_handshake_missing_params_forbidden() {
    let t = create_test_app(Intent::Reply("unused".to_string())).await;

    let response = t
        .app
        .oneshot(make_get_request("/api/whatsapp"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// =============================================================================
// Inbound Message Tests
// =============================================================================

#[tokio::test]
async fn test_delivery_receipt_is_noop() {
    let t = create_test_app(tool(CREATE_TODO, json!({ "title": "never" }))).await;

    let response = t
        .app
        .oneshot(make_post_request("/api/whatsapp", status_update()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body, json!({ "status": "success" }));

    assert!(t.classifier.seen().is_empty());
    assert!(t.sender.sent().is_empty());
    assert_eq!(captured_rows(&t.db).await, 0);
}

#[tokio::test]
async fn test_partial_envelopes_are_noop() {
    let deliveries = [
        json!({ "entry": [{ "changes": [{ "value": {
            "messages": [{ "from": USER_PHONE, "type": "text", "text": {} }]
        } }] }] }),
        json!({ "entry": [{ "changes": [{ "value": { "messages": null } }] }] }),
        json!({ "entry": [{ "changes": [{ "value": {
            "messages": [{ "type": "text", "text": { "body": "buy milk" } }]
        } }] }] }),
        json!({ "entry": null }),
    ];

    for delivery in deliveries {
        let t = create_test_app(tool(CREATE_TODO, json!({ "title": "never" }))).await;

        let response = t
            .app
            .oneshot(make_post_request("/api/whatsapp", delivery.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "delivery: {}", delivery);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body, json!({ "status": "success" }));

        assert!(t.classifier.seen().is_empty());
        assert!(t.sender.sent().is_empty());
        assert_eq!(captured_rows(&t.db).await, 0);
    }
}

#[tokio::test]
async fn test_unknown_sender_gets_signup_prompt() {
    let t = create_test_app(tool(CREATE_TODO, json!({ "title": "never" }))).await;

    let response = t
        .app
        .oneshot(make_post_request(
            "/api/whatsapp",
            text_message("447700900123", "buy milk"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["reply"], SIGNUP_PROMPT);

    assert_eq!(
        t.sender.sent(),
        vec![("447700900123".to_string(), SIGNUP_PROMPT.to_string())]
    );
    assert!(t.classifier.seen().is_empty());
    assert_eq!(captured_rows(&t.db).await, 0);
}

#[tokio::test]
async fn test_todo_created_from_message() {
    let t = create_test_app(tool(
        CREATE_TODO,
        json!({ "title": "Buy milk", "due_date": "2026-10-18" }),
    ))
    .await;

    let response = t
        .app
        .oneshot(make_post_request(
            "/api/whatsapp",
            text_message(USER_PHONE, "buy milk tomorrow"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(
        body["reply"],
        "Todo 'Buy milk' created with due date 2026-10-18."
    );

    assert_eq!(t.classifier.seen(), vec!["buy milk tomorrow".to_string()]);
    assert_eq!(
        t.sender.sent(),
        vec![(
            USER_PHONE.to_string(),
            "Todo 'Buy milk' created with due date 2026-10-18.".to_string()
        )]
    );

    let todos = db::todos::list(&t.db, USER_ID).await.unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].title, "Buy milk");
    assert_eq!(todos[0].due_date, NaiveDate::from_ymd_opt(2026, 10, 18));
    assert!(!todos[0].completed);
    assert_eq!(captured_rows(&t.db).await, 1);
}

#[tokio::test]
async fn test_url_message_becomes_bookmark() {
    let url = "https://doc.rust-lang.org/book/ch16-00-concurrency.html";
    let t = create_test_app(tool(
        CREATE_BOOKMARK,
        json!({ "url": url, "title": "Fearless Concurrency - The Rust Book" }),
    ))
    .await;

    let response = t
        .app
        .oneshot(make_post_request(
            "/api/whatsapp",
            text_message(USER_PHONE, &format!("read later {}", url)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(
        body["reply"],
        "Bookmark 'Fearless Concurrency - The Rust Book' created."
    );

    let bookmarks = db::bookmarks::list(&t.db, USER_ID).await.unwrap();
    assert_eq!(bookmarks.len(), 1);
    assert_eq!(bookmarks[0].url, url);
    assert_eq!(captured_rows(&t.db).await, 1);
}

#[tokio::test]
async fn test_reminder_has_valid_date_and_time() {
    let t = create_test_app(tool(
        CREATE_REMINDER,
        json!({ "title": "Call Bob", "date": "2026-10-18", "time": "15:00:00" }),
    ))
    .await;

    let response = t
        .app
        .oneshot(make_post_request(
            "/api/whatsapp",
            text_message(USER_PHONE, "remind me tomorrow at 3pm to call Bob"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(
        body["reply"],
        "Reminder for 'Call Bob' set for 2026-10-18 at 15:00:00."
    );

    let reminders = db::reminders::list(&t.db, USER_ID).await.unwrap();
    assert_eq!(reminders.len(), 1);
    let reminder = &reminders[0];
    assert!(reminder.enabled);

    // Stored values must round-trip through the wire formats
    let date = reminder.date.expect("reminder should have a date");
    let time = reminder.time.expect("reminder should have a time");
    assert!(NaiveDate::parse_from_str(&date.format("%Y-%m-%d").to_string(), "%Y-%m-%d").is_ok());
    assert!(NaiveTime::parse_from_str(&time.format("%H:%M:%S").to_string(), "%H:%M:%S").is_ok());
    assert_eq!(time, NaiveTime::from_hms_opt(15, 0, 0).unwrap());
}

#[tokio::test]
async fn test_daily_log_creates_dated_note() {
    let t = create_test_app(tool(
        DAILY_LOG,
        json!({ "content": "Shipped the webhook, went for a run." }),
    ))
    .await;

    let response = t
        .app
        .oneshot(make_post_request(
            "/api/whatsapp",
            text_message(USER_PHONE, "daily log: shipped the webhook, went for a run"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    let reply = body["reply"].as_str().unwrap();
    assert!(reply.starts_with("Daily log for "));

    let notes = db::notes::list(&t.db, USER_ID).await.unwrap();
    assert_eq!(notes.len(), 1);
    assert!(notes[0].title.starts_with("Daily Log - "));
    assert_eq!(notes[0].content, "Shipped the webhook, went for a run.");
}

#[tokio::test]
async fn test_plain_reply_relayed_verbatim() {
    let t = create_test_app(Intent::Reply("Hi! Send me anything to save.".to_string())).await;

    let response = t
        .app
        .oneshot(make_post_request(
            "/api/whatsapp",
            text_message(USER_PHONE, "hello"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["reply"], "Hi! Send me anything to save.");
    assert_eq!(t.sender.sent().len(), 1);
    assert_eq!(captured_rows(&t.db).await, 0);
}

#[tokio::test]
async fn test_unrecognized_tool_gets_fallback() {
    let t = create_test_app(Intent::Unrecognized("book_flight".to_string())).await;

    let response = t
        .app
        .oneshot(make_post_request(
            "/api/whatsapp",
            text_message(USER_PHONE, "book me a flight to Lisbon"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["reply"], FALLBACK_REPLY);
    assert_eq!(
        t.sender.sent(),
        vec![(USER_PHONE.to_string(), FALLBACK_REPLY.to_string())]
    );
    assert_eq!(captured_rows(&t.db).await, 0);
}

#[tokio::test]
async fn test_model_failure_returns_500() {
    let t = create_test_app_with(test_config(), ScriptedClassifier::failing()).await;

    let response = t
        .app
        .oneshot(make_post_request(
            "/api/whatsapp",
            text_message(USER_PHONE, "buy milk"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Internal Server Error");
    assert!(t.sender.sent().is_empty());
    assert_eq!(captured_rows(&t.db).await, 0);
}

#[tokio::test]
async fn test_malformed_body_returns_500() {
    let t = create_test_app(Intent::Reply("unused".to_string())).await;

    let response = t
        .app
        .oneshot(make_post_request("/api/whatsapp", "{not json".to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// Signature Tests
// =============================================================================

fn config_with_secret() -> Config {
    Config {
        whatsapp_app_secret: Some(APP_SECRET.to_string()),
        ..test_config()
    }
}

#[tokio::test]
async fn test_unsigned_delivery_rejected_when_secret_set() {
    let t = create_test_app_with(
        config_with_secret(),
        ScriptedClassifier::returning(tool(CREATE_TODO, json!({ "title": "never" }))),
    )
    .await;

    let response = t
        .app
        .oneshot(make_post_request(
            "/api/whatsapp",
            text_message(USER_PHONE, "buy milk"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(t.classifier.seen().is_empty());
    assert_eq!(captured_rows(&t.db).await, 0);
}

#[tokio::test]
async fn test_signed_delivery_accepted() {
    let t = create_test_app_with(
        config_with_secret(),
        ScriptedClassifier::returning(tool(CREATE_TODO, json!({ "title": "Buy milk" }))),
    )
    .await;

    let body = text_message(USER_PHONE, "buy milk");
    let request = Request::builder()
        .method("POST")
        .uri("/api/whatsapp")
        .header("content-type", "application/json")
        .header("x-hub-signature-256", sign(&body, APP_SECRET))
        .body(Body::from(body))
        .unwrap();

    let response = t.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["reply"], "Todo 'Buy milk' created.");
    assert_eq!(captured_rows(&t.db).await, 1);
}

// =============================================================================
// Outbound Failure Tests
// =============================================================================

/// Base URL of a port that was just released, so connections are refused
async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_unreachable_whatsapp_returns_500_after_insert() {
    let config = Config {
        whatsapp_api_base: closed_port_url().await,
        ..test_config()
    };
    let db = create_test_db().await;
    let classifier = ScriptedClassifier::returning(tool(CREATE_TODO, json!({ "title": "Buy milk" })));
    let messenger = Arc::new(WhatsAppClient::new(reqwest::Client::new(), &config));

    let app = routes::router(AppState {
        db: db.clone(),
        config,
        classifier: classifier.clone(),
        messenger,
    });

    let response = app
        .oneshot(make_post_request(
            "/api/whatsapp",
            text_message(USER_PHONE, "buy milk"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["status"], "error");

    // The insert is not rolled back when the confirmation cannot be delivered
    let todos = db::todos::list(&db, USER_ID).await.unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].title, "Buy milk");
}
