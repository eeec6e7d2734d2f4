//! Waitlist JSON API: `/v1/waitlist*`
//!
//! The same signup path as the landing page form, for clients that post
//! JSON.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower::limit::ConcurrencyLimitLayer;

use keyvault_core::entry::{SignupForm, WaitlistEntry};
use keyvault_core::landing::spots_left;

use crate::error::AppError;
use crate::state::AppState;

/// Build the waitlist API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/waitlist", post(join))
        .route_layer(ConcurrencyLimitLayer::new(32))
        .route("/v1/waitlist/count", get(count))
}

/// Response body for `GET /v1/waitlist/count`.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: usize,
    pub spots_left: usize,
}

/// Add a signup. Responds `201` with the stored entry.
async fn join(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SignupForm>,
) -> Result<(StatusCode, Json<WaitlistEntry>), AppError> {
    let entry = state.waitlist.append(form).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn count(State(state): State<Arc<AppState>>) -> Json<CountResponse> {
    let count = state.waitlist.count().await;
    Json(CountResponse {
        count,
        spots_left: spots_left(count),
    })
}
