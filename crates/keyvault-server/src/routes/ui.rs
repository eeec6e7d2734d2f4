//! Landing page routes.
//!
//! `GET /` renders the marketing page with the waitlist form; `POST
//! /waitlist` takes the form submission and renders the page again with
//! either the confirmation or an error next to the form. The FAQ accordion
//! is driven by a `?faq=<index>` query parameter.

use std::fmt::Write as _;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use tower::limit::ConcurrencyLimitLayer;

use keyvault_core::entry::SignupForm;
use keyvault_core::error::WaitlistError;
use keyvault_core::landing::{
    FAQ_ITEMS, FaqAccordion, HOW_IT_WORKS, LAUNCH_PRICE, LAUNCH_SPOTS, TRUST_BADGES, spots_left,
};

use crate::error::SAVE_FAILED_MESSAGE;
use crate::html::{document, escape};
use crate::state::AppState;

/// Build the landing page router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/waitlist", post(join_waitlist))
        .route_layer(ConcurrencyLimitLayer::new(32))
        .route("/", get(landing_page))
}

#[derive(Debug, Deserialize)]
struct LandingQuery {
    faq: Option<String>,
}

/// What to show above the waitlist form.
#[derive(Debug)]
enum Notice {
    None,
    Joined,
    MissingField(&'static str),
    SaveFailed,
}

async fn landing_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LandingQuery>,
) -> Html<String> {
    let faq = FaqAccordion::with_open(query.faq.and_then(|raw| raw.parse().ok()));
    let count = state.waitlist.count().await;
    Html(render_landing(count, faq, &Notice::None, &SignupForm::default()))
}

async fn join_waitlist(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SignupForm>,
) -> (StatusCode, Html<String>) {
    let (status, notice, refill) = match state.waitlist.append(form.clone()).await {
        Ok(_) => (StatusCode::OK, Notice::Joined, SignupForm::default()),
        Err(WaitlistError::MissingField { field }) => {
            (StatusCode::BAD_REQUEST, Notice::MissingField(field), form)
        }
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, Notice::SaveFailed, form),
    };

    let count = state.waitlist.count().await;
    (
        status,
        Html(render_landing(count, FaqAccordion::default(), &notice, &refill)),
    )
}

fn render_landing(count: usize, faq: FaqAccordion, notice: &Notice, values: &SignupForm) -> String {
    let mut body = String::with_capacity(16384);

    body.push_str(
        r##"<header class="header"><div class="wrap">
  <span class="logo">KeyVault</span>
  <a href="#waitlist" class="btn">Join Waitlist</a>
</div></header>
<div class="hero">
  <h1>Never Lose Your Key Again</h1>
  <p>Upload your key photo, we back it up. Lose it later? Get a copy delivered.</p>
"##,
    );

    let left = spots_left(count);
    let _ = write!(
        body,
        r#"  <div class="offer"><strong>Launch Offer</strong>Only {LAUNCH_PRICE} for first {LAUNCH_SPOTS} users"#
    );
    if left > 0 {
        let _ = write!(body, "<br/>{left} spots left!");
    }
    let _ = write!(
        body,
        "</div>\n  <div><a href=\"#waitlist\" class=\"btn\">Join the {LAUNCH_PRICE} Waitlist</a></div>\n</div>\n"
    );

    body.push_str("<section><h2>How It Works</h2><div class=\"grid\">\n");
    for step in &HOW_IT_WORKS {
        let _ = writeln!(
            body,
            r#"  <div class="card"><div class="step">{}</div><h3>{}</h3><p>{}</p></div>"#,
            step.number, step.title, step.description
        );
    }
    body.push_str("</div></section>\n");

    body.push_str("<section><div class=\"badges\">\n");
    for badge in TRUST_BADGES {
        let _ = writeln!(body, "  <div>{badge}</div>");
    }
    body.push_str("</div></section>\n");

    body.push_str("<section id=\"faq\"><h2>Frequently Asked Questions</h2><div class=\"faq\">\n");
    for (index, item) in FAQ_ITEMS.iter().enumerate() {
        let href = match faq.toggle(index).open() {
            Some(next) => format!("/?faq={next}#faq"),
            None => "/#faq".to_owned(),
        };
        let marker = if faq.is_open(index) { "&minus;" } else { "+" };
        let _ = write!(
            body,
            r#"  <div class="faq-item"><a href="{href}"><span>{}</span><span>{marker}</span></a>"#,
            item.question
        );
        if faq.is_open(index) {
            let _ = write!(body, "<p>{}</p>", item.answer);
        }
        body.push_str("</div>\n");
    }
    body.push_str("</div></section>\n");

    render_waitlist_section(&mut body, count, notice, values);

    body.push_str(
        r#"<footer class="footer">&copy; KeyVault. Made in India.</footer>
<a href="/admin" class="admin-toggle" title="Admin">&#9881;</a>"#,
    );

    document("KeyVault | Never Lose Your Key Again", &body)
}

fn render_waitlist_section(body: &mut String, count: usize, notice: &Notice, values: &SignupForm) {
    body.push_str("<section id=\"waitlist\" class=\"waitlist\"><h2>Join the Waitlist</h2>\n");
    let _ = writeln!(
        body,
        "<p class=\"muted\">Lock in your {LAUNCH_PRICE} launch price today</p>"
    );
    if count > 0 {
        let _ = writeln!(
            body,
            "<p class=\"muted\">{count} people have already joined!</p>"
        );
    }

    match notice {
        Notice::Joined => {
            body.push_str(
                r#"<div class="notice notice-ok"><h3>You're In!</h3>
<p>Thanks for joining the waitlist. We'll notify you when KeyVault launches!</p></div>
</section>
"#,
            );
            return;
        }
        Notice::MissingField(field) => {
            let _ = writeln!(
                body,
                r#"<div class="notice notice-err">Please fill in your {field}.</div>"#
            );
        }
        Notice::SaveFailed => {
            let _ = writeln!(
                body,
                r#"<div class="notice notice-err">{SAVE_FAILED_MESSAGE}</div>"#
            );
        }
        Notice::None => {}
    }

    let _ = write!(
        body,
        r##"<form method="post" action="/waitlist#waitlist">
  <input type="text" name="name" placeholder="Full Name" value="{}" required/>
  <input type="email" name="email" placeholder="Email Address" value="{}" required/>
  <input type="tel" name="phone" placeholder="Phone Number" value="{}" required/>
  <input type="text" name="city" placeholder="City" value="{}" required/>
  <button type="submit" class="btn">Reserve My Spot</button>
</form>
</section>
"##,
        escape(&values.name),
        escape(&values.email),
        escape(&values.phone),
        escape(&values.city),
    );
}
