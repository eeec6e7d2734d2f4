//! Admin overlay routes: `/admin*` and `/v1/admin/*`
//!
//! `GET /admin` shows the password prompt or, with a live session cookie,
//! the entry listing. Export, clear and the JSON listing all require the
//! session. Closing the overlay ends the session and returns to `/`.

use std::fmt::Write as _;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use tracing::error;

use keyvault_core::admin::AdminView;
use keyvault_core::entry::WaitlistEntry;
use keyvault_core::landing::LAUNCH_PRICE;
use keyvault_core::waitlist::export_filename;

use crate::error::AppError;
use crate::html::{document, escape};
use crate::state::AppState;

/// Cookie carrying the admin session token.
pub const SESSION_COOKIE: &str = "keyvault_admin";

/// Shown in the overlay when Clear All fails.
pub const CLEAR_FAILED_MESSAGE: &str = "Could not clear entries. Please try again.";

/// Build the admin router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin", get(overlay))
        .route("/admin/login", post(login))
        .route("/admin/close", post(close))
        .route("/admin/export.csv", get(export_csv))
        .route("/admin/clear", post(clear))
        .route("/v1/admin/entries", get(list_entries))
}

#[derive(Deserialize)]
struct LoginForm {
    #[serde(default)]
    password: String,
}

/// Response body for `GET /v1/admin/entries`.
#[derive(Debug, Serialize)]
pub struct EntriesResponse {
    pub count: usize,
    pub entries: Vec<WaitlistEntry>,
}

fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_owned())
}

async fn overlay(State(state): State<Arc<AppState>>, jar: CookieJar) -> Html<String> {
    let token = session_token(&jar);
    match state.admin.view(token.as_deref()).await {
        AdminView::Authenticated => {
            let entries = state.waitlist.list().await;
            Html(render_listing(&entries, None))
        }
        AdminView::Hidden | AdminView::PasswordPrompt => Html(render_prompt(None)),
    }
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.admin.login(&form.password).await {
        Ok(token) => {
            let cookie = Cookie::build((SESSION_COOKIE, token))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Strict);
            (jar.add(cookie), Redirect::to("/admin")).into_response()
        }
        Err(e) => {
            let message = capitalize(&e.to_string());
            (StatusCode::UNAUTHORIZED, Html(render_prompt(Some(&message)))).into_response()
        }
    }
}

async fn close(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Redirect) {
    let token = session_token(&jar);
    state.admin.close(token.as_deref()).await;
    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Redirect::to("/"),
    )
}

async fn export_csv(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    state.admin.authorize(session_token(&jar).as_deref()).await?;

    let csv = state.waitlist.export_csv().await;
    let filename = export_filename(chrono::Utc::now().date_naive());
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    )
        .into_response())
}

/// Clear every entry. A storage failure keeps the admin in the overlay,
/// with the listing as it still stands.
async fn clear(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    state.admin.authorize(session_token(&jar).as_deref()).await?;
    if let Err(e) = state.waitlist.clear().await {
        error!(error = %e, "failed to clear waitlist");
        let entries = state.waitlist.list().await;
        return Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(render_listing(&entries, Some(CLEAR_FAILED_MESSAGE))),
        )
            .into_response());
    }
    Ok(Redirect::to("/admin").into_response())
}

async fn list_entries(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<EntriesResponse>, AppError> {
    state.admin.authorize(session_token(&jar).as_deref()).await?;
    let entries = state.waitlist.list().await;
    Ok(Json(EntriesResponse {
        count: entries.len(),
        entries,
    }))
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn panel(body: &str) -> String {
    let html = format!(
        r#"<div class="overlay"><div class="panel">
<div class="panel-head"><h2>KeyVault Admin Panel</h2>
<form method="post" action="/admin/close"><button type="submit" class="btn">Close</button></form></div>
<div class="panel-body">
{body}
</div></div></div>"#
    );
    document("KeyVault Admin", &html)
}

fn render_prompt(error: Option<&str>) -> String {
    let mut body = String::new();
    if let Some(error) = error {
        let _ = writeln!(
            body,
            r#"<div class="notice notice-err">{}</div>"#,
            escape(error)
        );
    }
    body.push_str(
        r#"<form class="login" method="post" action="/admin/login">
  <label for="password">Admin Password</label>
  <input id="password" type="password" name="password" required/>
  <button type="submit" class="btn">Login</button>
</form>"#,
    );
    panel(&body)
}

fn render_listing(entries: &[WaitlistEntry], error: Option<&str>) -> String {
    let mut body = String::with_capacity(4096);
    if let Some(error) = error {
        let _ = writeln!(
            body,
            r#"<div class="notice notice-err">{}</div>"#,
            escape(error)
        );
    }
    let _ = write!(
        body,
        r#"<div style="display:flex;justify-content:space-between;align-items:center">
<div><h3>Waitlist Entries ({})</h3><p class="muted">Users who signed up for the {LAUNCH_PRICE} launch offer</p></div>
<div class="actions">
  <a href="/admin/export.csv" class="btn">Export CSV</a>
  <form method="post" action="/admin/clear" onsubmit="return confirm('Are you sure you want to clear all waitlist entries? This cannot be undone.')">
    <button type="submit" class="btn btn-danger">Clear All</button>
  </form>
</div></div>
"#,
        entries.len()
    );

    if entries.is_empty() {
        body.push_str(r#"<p class="muted">No entries yet</p>"#);
        return panel(&body);
    }

    body.push_str(
        "<table><thead><tr><th>Name</th><th>Email</th><th>Phone</th><th>City</th><th>Date</th></tr></thead><tbody>\n",
    );
    for entry in entries {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&entry.name),
            escape(&entry.email),
            escape(&entry.phone),
            escape(&entry.city),
            escape(&entry.display_date()),
        );
    }
    body.push_str("</tbody></table>");
    panel(&body)
}
