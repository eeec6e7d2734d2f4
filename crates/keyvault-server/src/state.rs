//! Shared application state for the `KeyVault` server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`.

use std::sync::Arc;

use keyvault_core::admin::AdminGate;
use keyvault_core::waitlist::WaitlistStore;
use keyvault_storage::StorageBackend;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Signup collection.
    pub waitlist: Arc<WaitlistStore>,
    /// Admin password check and open sessions.
    pub admin: Arc<AdminGate>,
}

impl AppState {
    /// Build the state over a storage backend.
    #[must_use]
    pub fn new(
        storage: Arc<dyn StorageBackend>,
        slot: impl Into<String>,
        admin_password: impl Into<String>,
    ) -> Self {
        Self {
            waitlist: Arc::new(WaitlistStore::with_slot(storage, slot)),
            admin: Arc::new(AdminGate::new(admin_password)),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("waitlist", &self.waitlist)
            .finish_non_exhaustive()
    }
}
