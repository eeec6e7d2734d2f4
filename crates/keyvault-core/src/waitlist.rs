//! The waitlist store.
//!
//! Every signup lives in one storage slot as a JSON array, in insertion
//! order. Appends read the whole array, push one entry and write the whole
//! array back. Within a process those read-modify-write cycles are
//! serialized; writers in other processes sharing the same storage file are
//! not coordinated with.
//!
//! Reads are forgiving: an absent, unreadable or malformed slot is an empty
//! waitlist. Writes are not: a failed append is reported to the caller.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use keyvault_storage::{StorageBackend, StorageError};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::entry::{CSV_HEADER, SignupForm, WaitlistEntry};
use crate::error::WaitlistError;

/// Slot name used when none is configured.
pub const DEFAULT_SLOT: &str = "keyvault_waitlist";

/// Append-only collection of signups persisted in a single storage slot.
pub struct WaitlistStore {
    storage: Arc<dyn StorageBackend>,
    slot: String,
    write_lock: Mutex<()>,
}

impl WaitlistStore {
    /// Create a store over the given backend using [`DEFAULT_SLOT`].
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self::with_slot(storage, DEFAULT_SLOT)
    }

    /// Create a store over the given backend and slot name.
    #[must_use]
    pub fn with_slot(storage: Arc<dyn StorageBackend>, slot: impl Into<String>) -> Self {
        Self {
            storage,
            slot: slot.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Name of the storage slot holding the collection.
    #[must_use]
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Validate a signup, stamp it with an id and timestamp, and persist it
    /// at the end of the collection.
    ///
    /// The id is the creation time in milliseconds. If that would not be
    /// greater than the last stored id (two signups in the same millisecond,
    /// or a clock step backwards) it becomes `last_id + 1`.
    ///
    /// # Errors
    ///
    /// - [`WaitlistError::MissingField`] if the form is incomplete.
    /// - [`WaitlistError::Storage`] if the slot cannot be read or written.
    /// - [`WaitlistError::Serialization`] if the collection cannot be encoded.
    pub async fn append(&self, form: SignupForm) -> Result<WaitlistEntry, WaitlistError> {
        form.validate()?;

        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await.inspect_err(|e| {
            error!(slot = %self.slot, error = %e, "failed to read waitlist before append");
        })?;

        let now = Utc::now();
        let entry = WaitlistEntry {
            id: next_id(entries.last(), now),
            timestamp: format_timestamp(now),
            name: form.name,
            email: form.email,
            phone: form.phone,
            city: form.city,
        };
        entries.push(entry.clone());

        let encoded = serde_json::to_vec(&entries).map_err(|e| WaitlistError::Serialization {
            reason: e.to_string(),
        })?;
        self.storage
            .put(&self.slot, &encoded)
            .await
            .inspect_err(|e| {
                error!(slot = %self.slot, error = %e, "failed to save waitlist entry");
            })?;

        info!(id = entry.id, count = entries.len(), "waitlist entry saved");
        Ok(entry)
    }

    /// All entries in insertion order.
    ///
    /// Returns an empty list when the slot is absent, unreadable or
    /// malformed; the failure is logged, not returned.
    pub async fn list(&self) -> Vec<WaitlistEntry> {
        match self.load().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(slot = %self.slot, error = %e, "failed to read waitlist, showing none");
                Vec::new()
            }
        }
    }

    /// Number of entries, equal to `list().len()`.
    pub async fn count(&self) -> usize {
        self.list().await.len()
    }

    /// Delete the slot and with it every entry.
    ///
    /// # Errors
    ///
    /// Returns [`WaitlistError::Storage`] if the backend fails to delete.
    pub async fn clear(&self) -> Result<(), WaitlistError> {
        let _guard = self.write_lock.lock().await;
        self.storage.delete(&self.slot).await?;
        warn!(slot = %self.slot, "waitlist cleared");
        Ok(())
    }

    /// Serialize all entries as CSV with a [`CSV_HEADER`] row.
    ///
    /// Returns an empty string when there are no entries. Rows are joined
    /// with `\n` and the text has no trailing newline. Field values are not
    /// quoted.
    pub async fn export_csv(&self) -> String {
        render_csv(&self.list().await)
    }

    /// Read and decode the slot. Malformed content decodes to no entries.
    async fn load(&self) -> Result<Vec<WaitlistEntry>, StorageError> {
        let Some(raw) = self.storage.get(&self.slot).await? else {
            return Ok(Vec::new());
        };
        Ok(serde_json::from_slice(&raw).unwrap_or_else(|e| {
            warn!(slot = %self.slot, error = %e, "malformed waitlist slot, treating as empty");
            Vec::new()
        }))
    }
}

impl std::fmt::Debug for WaitlistStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitlistStore")
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

/// Render entries as CSV text, or `""` for none.
#[must_use]
pub fn render_csv(entries: &[WaitlistEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    std::iter::once(CSV_HEADER.to_owned())
        .chain(entries.iter().map(WaitlistEntry::csv_row))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Download name for an export taken on `date`.
#[must_use]
pub fn export_filename(date: NaiveDate) -> String {
    format!("keyvault_waitlist_{}.csv", date.format("%Y-%m-%d"))
}

fn next_id(last: Option<&WaitlistEntry>, now: DateTime<Utc>) -> i64 {
    let millis = now.timestamp_millis();
    match last {
        Some(last) if millis <= last.id => last.id.saturating_add(1),
        _ => millis,
    }
}

fn format_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}
