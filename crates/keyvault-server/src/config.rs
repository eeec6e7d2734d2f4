//! Server configuration for `KeyVault`.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Values that fail to parse fall back to the default.

use std::net::SocketAddr;

use keyvault_core::admin::PLACEHOLDER_PASSWORD;
use keyvault_core::waitlist::DEFAULT_SLOT;

/// Default bind address when neither `KEYVAULT_BIND_ADDR` nor `PORT` is set.
const DEFAULT_BIND: ([u8; 4], u16) = ([127, 0, 0, 1], 8080);

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Storage backend type.
    pub storage_backend: StorageBackendType,
    /// Storage slot holding the waitlist.
    pub waitlist_slot: String,
    /// Shared admin password.
    pub admin_password: String,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("storage_backend", &self.storage_backend)
            .field("waitlist_slot", &self.waitlist_slot)
            .field("admin_password", &"[redacted]")
            .field("log_level", &self.log_level)
            .finish()
    }
}

/// Supported storage backend types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackendType {
    /// In-memory (data lost on restart).
    Memory,
    /// Single-file redb storage.
    Redb { path: String },
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// Environment variables:
    /// - `KEYVAULT_BIND_ADDR`: full bind address (overrides `PORT`, default: `127.0.0.1:8080`)
    /// - `PORT`: port to bind on, binds to `0.0.0.0`
    /// - `KEYVAULT_STORAGE`: `memory` or `redb` (default: `memory`)
    /// - `KEYVAULT_STORAGE_PATH`: redb file (default: `./data/keyvault.redb`)
    /// - `KEYVAULT_WAITLIST_SLOT`: storage slot name (default: `keyvault_waitlist`)
    /// - `KEYVAULT_ADMIN_PASSWORD`: admin password (default: the `keyvault2024` placeholder)
    /// - `KEYVAULT_LOG_LEVEL`: log filter (default: `info`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let bind_addr = if let Some(addr) = lookup("KEYVAULT_BIND_ADDR") {
            addr.parse().unwrap_or_else(|_| SocketAddr::from(DEFAULT_BIND))
        } else if let Some(port) = lookup("PORT") {
            let port: u16 = port.parse().unwrap_or(DEFAULT_BIND.1);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(DEFAULT_BIND)
        };

        let storage_backend = match lookup("KEYVAULT_STORAGE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "redb" => StorageBackendType::Redb {
                path: lookup("KEYVAULT_STORAGE_PATH")
                    .unwrap_or_else(|| "./data/keyvault.redb".to_owned()),
            },
            _ => StorageBackendType::Memory,
        };

        let waitlist_slot = lookup("KEYVAULT_WAITLIST_SLOT")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SLOT.to_owned());

        let admin_password = lookup("KEYVAULT_ADMIN_PASSWORD")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_PASSWORD.to_owned());

        let log_level = lookup("KEYVAULT_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        Self {
            bind_addr,
            storage_backend,
            waitlist_slot,
            admin_password,
            log_level,
        }
    }
}
