//! End-to-end tests for the `KeyVault` HTTP surface.
//!
//! Each test builds the full router over an in-memory backend and drives it
//! with `tower::ServiceExt::oneshot`, so no socket is opened.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use keyvault_server::routes::build_router;
use keyvault_server::state::AppState;
use keyvault_storage::{MemoryBackend, StorageBackend, StorageError};
use tower::ServiceExt;

const PASSWORD: &str = "keyvault2024";
const SLOT: &str = "keyvault_waitlist";

fn app_with(storage: Arc<dyn StorageBackend>) -> Router {
    build_router(Arc::new(AppState::new(storage, SLOT, PASSWORD)))
}

fn app() -> (Router, MemoryBackend) {
    let backend = MemoryBackend::new();
    (app_with(Arc::new(backend.clone())), backend)
}

async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.unwrap()
}

async fn body_text(resp: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(
        header::CONTENT_TYPE,
        "application/x-www-form-urlencoded",
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_owned())).unwrap()
}

fn post_json(uri: &str, json: &serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

const ASHA_FORM: &str = "name=Asha&email=a%40x.com&phone=9999999999&city=Pune";

/// Log in and return the `name=value` pair to send back as a cookie.
async fn login(app: &Router) -> String {
    let resp = send(app, post_form("/admin/login", &format!("password={PASSWORD}"), None)).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/admin");
    let set_cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    set_cookie.split(';').next().unwrap().to_owned()
}

// ── Landing page ─────────────────────────────────────────────────────

#[tokio::test]
async fn landing_page_renders_with_security_headers() {
    let (app, _) = app();
    let resp = send(&app, get("/")).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::X_FRAME_OPTIONS], "DENY");
    assert_eq!(resp.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    let html = body_text(resp).await;
    assert!(html.contains("Never Lose Your Key Again"));
    assert!(html.contains("50 spots left!"));
    assert!(html.contains(r#"id="waitlist""#));
}

#[tokio::test]
async fn faq_query_opens_one_item() {
    let (app, _) = app();
    let html = body_text(send(&app, get("/?faq=2")).await).await;
    assert!(html.contains("100% satisfaction guarantee. If the duplicate key"));
    assert!(!html.contains("Our AI can handle standard residential"));

    let html = body_text(send(&app, get("/?faq=banana")).await).await;
    assert!(!html.contains("100% satisfaction guarantee. If the duplicate key"));
}

#[tokio::test]
async fn form_signup_confirms_and_counts() {
    let (app, _) = app();
    let resp = send(&app, post_form("/waitlist", ASHA_FORM, None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("You're In!"));
    assert!(html.contains("1 people have already joined!"));
    assert!(html.contains("49 spots left!"));
}

#[tokio::test]
async fn form_signup_with_blank_field_is_rejected() {
    let (app, backend) = app();
    let resp = send(
        &app,
        post_form("/waitlist", "name=Asha&email=&phone=1&city=Pune", None),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let html = body_text(resp).await;
    assert!(html.contains("Please fill in your email."));
    assert!(html.contains(r#"value="Asha""#));
    assert_eq!(backend.get(SLOT).await.unwrap(), None);
}

#[tokio::test]
async fn form_signup_storage_failure_shows_retry_message() {
    let app = app_with(Arc::new(MemoryBackend::with_quota(16)));
    let resp = send(&app, post_form("/waitlist", ASHA_FORM, None)).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = body_text(resp).await;
    assert!(html.contains("Error saving entry. Please try again."));
    assert!(html.contains(r#"value="Pune""#));
}

// ── JSON API ─────────────────────────────────────────────────────────

#[tokio::test]
async fn json_signup_returns_created_entry() {
    let (app, _) = app();
    let resp = send(
        &app,
        post_json(
            "/v1/waitlist",
            &serde_json::json!({
                "name": "Asha", "email": "a@x.com", "phone": "9999999999", "city": "Pune"
            }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let entry: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(entry["name"], "Asha");
    assert!(entry["id"].as_i64().unwrap() > 0);
    assert!(entry["timestamp"].as_str().unwrap().ends_with('Z'));

    let count: serde_json::Value =
        serde_json::from_str(&body_text(send(&app, get("/v1/waitlist/count")).await).await)
            .unwrap();
    assert_eq!(count["count"], 1);
    assert_eq!(count["spots_left"], 49);
}

#[tokio::test]
async fn json_signup_missing_field_is_bad_request() {
    let (app, _) = app();
    let resp = send(
        &app,
        post_json("/v1/waitlist", &serde_json::json!({"name": "Asha"})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(body["error"], "bad_request");
    assert_eq!(body["message"], "field 'email' is required");
}

/// Backend that accepts reads and refuses every write.
struct DisabledStorage;

#[async_trait::async_trait]
impl StorageBackend for DisabledStorage {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(None)
    }
    async fn put(&self, key: &str, _value: &[u8]) -> Result<(), StorageError> {
        Err(StorageError::Write {
            key: key.to_owned(),
            reason: "storage disabled".to_owned(),
        })
    }
    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        Err(StorageError::Delete {
            key: key.to_owned(),
            reason: "storage disabled".to_owned(),
        })
    }
}

#[tokio::test]
async fn json_signup_storage_failure_is_generic_500() {
    let app = app_with(Arc::new(DisabledStorage));
    let resp = send(
        &app,
        post_json(
            "/v1/waitlist",
            &serde_json::json!({"name": "a", "email": "b", "phone": "c", "city": "d"}),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = body_text(resp).await;
    assert!(text.contains("Please try again."));
    assert!(!text.contains("storage disabled"));
}

#[tokio::test]
async fn malformed_slot_reads_as_empty_waitlist() {
    let (app, backend) = app();
    backend.put(SLOT, b"not json at all").await.unwrap();

    let count: serde_json::Value =
        serde_json::from_str(&body_text(send(&app, get("/v1/waitlist/count")).await).await)
            .unwrap();
    assert_eq!(count["count"], 0);

    let resp = send(&app, post_form("/waitlist", ASHA_FORM, None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = app();
    let resp = send(&app, get("/v1/sys/health")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(body["status"], "ok");
}

// ── Admin overlay ────────────────────────────────────────────────────

#[tokio::test]
async fn admin_without_session_shows_prompt() {
    let (app, _) = app();
    send(&app, post_form("/waitlist", ASHA_FORM, None)).await;

    let html = body_text(send(&app, get("/admin")).await).await;
    assert!(html.contains("Admin Password"));
    assert!(!html.contains("a@x.com"));
}

#[tokio::test]
async fn wrong_password_keeps_entries_inaccessible() {
    let (app, _) = app();
    send(&app, post_form("/waitlist", ASHA_FORM, None)).await;

    let resp = send(&app, post_form("/admin/login", "password=letmein", None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    let html = body_text(resp).await;
    assert!(html.contains("Invalid password"));
    assert!(!html.contains("a@x.com"));

    let resp = send(&app, get("/v1/admin/entries")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let resp = send(&app, get("/admin/export.csv")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let resp = send(&app, get_with_cookie("/v1/admin/entries", "keyvault_admin=forged")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn correct_password_shows_all_entries() {
    let (app, _) = app();
    send(&app, post_form("/waitlist", ASHA_FORM, None)).await;
    send(
        &app,
        post_form("/waitlist", "name=Ravi&email=r%40y.com&phone=1&city=Delhi", None),
    )
    .await;

    let cookie = login(&app).await;

    let html = body_text(send(&app, get_with_cookie("/admin", &cookie)).await).await;
    assert!(html.contains("Waitlist Entries (2)"));
    assert!(html.contains("<td>Asha</td>"));
    assert!(html.contains("<td>Ravi</td>"));

    let resp = send(&app, get_with_cookie("/v1/admin/entries", &cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(body["count"], 2);
    assert_eq!(body["entries"][0]["name"], "Asha");
    assert_eq!(body["entries"][1]["city"], "Delhi");
}

#[tokio::test]
async fn export_downloads_dated_csv() {
    let (app, _) = app();
    send(&app, post_form("/waitlist", ASHA_FORM, None)).await;
    let cookie = login(&app).await;

    let resp = send(&app, get_with_cookie("/admin/export.csv", &cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );
    let disposition = resp.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_owned();
    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
    assert!(disposition.contains(&format!("keyvault_waitlist_{today}.csv")));

    let csv = body_text(resp).await;
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "ID,Name,Email,Phone,City,Timestamp");
    assert!(lines[1].contains(",Asha,a@x.com,9999999999,Pune,"));
}

#[tokio::test]
async fn export_of_empty_waitlist_is_empty_body() {
    let (app, _) = app();
    let cookie = login(&app).await;
    let resp = send(&app, get_with_cookie("/admin/export.csv", &cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "");
}

#[tokio::test]
async fn clear_requires_session_and_empties_waitlist() {
    let (app, backend) = app();
    send(&app, post_form("/waitlist", ASHA_FORM, None)).await;

    let resp = send(&app, post_form("/admin/clear", "", None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(backend.exists(SLOT).await.unwrap());

    let cookie = login(&app).await;
    let resp = send(&app, post_form("/admin/clear", "", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(!backend.exists(SLOT).await.unwrap());

    let html = body_text(send(&app, get_with_cookie("/admin", &cookie)).await).await;
    assert!(html.contains("No entries yet"));
}

/// Backend that stores normally but refuses to delete.
struct UndeletableStorage(MemoryBackend);

#[async_trait::async_trait]
impl StorageBackend for UndeletableStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.0.get(key).await
    }
    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.0.put(key, value).await
    }
    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        Err(StorageError::Delete {
            key: key.to_owned(),
            reason: "read-only volume".to_owned(),
        })
    }
}

#[tokio::test]
async fn failed_clear_stays_in_overlay_with_notice() {
    let app = app_with(Arc::new(UndeletableStorage(MemoryBackend::new())));
    send(&app, post_form("/waitlist", ASHA_FORM, None)).await;
    let cookie = login(&app).await;

    let resp = send(&app, post_form("/admin/clear", "", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        resp.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    let html = body_text(resp).await;
    assert!(html.contains("Could not clear entries. Please try again."));
    assert!(!html.contains("Error saving entry"));
    assert!(!html.contains("read-only volume"));
    assert!(html.contains("Waitlist Entries (1)"));
    assert!(html.contains("<td>Asha</td>"));
}

#[tokio::test]
async fn close_discards_authentication() {
    let (app, _) = app();
    let cookie = login(&app).await;

    let resp = send(&app, post_form("/admin/close", "", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/");

    let resp = send(&app, get_with_cookie("/v1/admin/entries", &cookie)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let html = body_text(send(&app, get_with_cookie("/admin", &cookie)).await).await;
    assert!(html.contains("Admin Password"));
}
