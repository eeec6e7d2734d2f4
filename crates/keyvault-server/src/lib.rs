//! `KeyVault` HTTP server.
//!
//! Wires the waitlist store, admin gate and storage backend into an Axum
//! server. Serves the landing page and admin overlay as HTML and a small
//! JSON API under `/v1/*`.

pub mod config;
pub mod error;
pub mod html;
pub mod routes;
pub mod state;
