//! Core library for `KeyVault`.
//!
//! Contains the waitlist store and its CSV export, the landing page content
//! model (launch offer, FAQ accordion) and the admin gate. This crate
//! depends on `keyvault-storage` for the storage backend trait and knows
//! nothing about HTTP.

pub mod admin;
pub mod entry;
pub mod error;
pub mod landing;
pub mod waitlist;
