//! Single-file redb storage backend.
//!
//! Persists slots to one redb database file, the on-disk counterpart of a
//! browser's local storage. Feature-gated behind `redb-backend`.
//!
//! All operations are transactional; a failed write leaves the previous
//! value of the slot intact.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition};

use crate::{StorageBackend, StorageError};

/// The single table holding every slot.
const SLOTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("slots");

/// A storage backend backed by redb (pure Rust, B-tree based).
///
/// Blocking redb calls are offloaded to the Tokio blocking thread pool.
///
/// # Examples
///
/// ```no_run
/// # use keyvault_storage::RedbBackend;
/// let backend = RedbBackend::open("./data/keyvault.redb").unwrap();
/// ```
#[derive(Clone)]
pub struct RedbBackend {
    db: Arc<Database>,
    path: PathBuf,
}

impl std::fmt::Debug for RedbBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbBackend")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl RedbBackend {
    /// Open or create a redb database at the given path.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the directory or database file cannot
    /// be created, or [`StorageError::Transaction`] if the slots table cannot
    /// be initialised.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Open {
                path: parent.display().to_string(),
                reason: e.to_string(),
            })?;
        }

        let db = Database::create(path).map_err(|e| StorageError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        // Opening the table in a write txn creates it if missing.
        let txn = db.begin_write().map_err(|e| StorageError::Transaction {
            reason: e.to_string(),
        })?;
        txn.open_table(SLOTS_TABLE)
            .map_err(|e| StorageError::Transaction {
                reason: format!("open table 'slots': {e}"),
            })?;
        txn.commit().map_err(|e| StorageError::Transaction {
            reason: e.to_string(),
        })?;

        tracing::debug!(path = %path.display(), "redb storage opened");

        Ok(Self {
            db: Arc::new(db),
            path: path.to_path_buf(),
        })
    }

    /// Return the filesystem path of this database.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl StorageBackend for RedbBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let db = Arc::clone(&self.db);
        let key = key.to_owned();
        tokio::task::spawn_blocking(move || {
            let read_err = |reason: String| StorageError::Read {
                key: key.clone(),
                reason,
            };
            let txn = db.begin_read().map_err(|e| read_err(e.to_string()))?;
            let table = txn
                .open_table(SLOTS_TABLE)
                .map_err(|e| read_err(e.to_string()))?;
            let value = table
                .get(key.as_str())
                .map_err(|e| read_err(e.to_string()))?
                .map(|v| v.value().to_vec());
            Ok(value)
        })
        .await
        .map_err(|e| StorageError::Read {
            key: String::new(),
            reason: format!("blocking task panicked: {e}"),
        })?
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let db = Arc::clone(&self.db);
        let key = key.to_owned();
        let value = value.to_vec();
        tokio::task::spawn_blocking(move || {
            let write_err = |reason: String| StorageError::Write {
                key: key.clone(),
                reason,
            };
            let txn = db.begin_write().map_err(|e| write_err(e.to_string()))?;
            {
                let mut table = txn
                    .open_table(SLOTS_TABLE)
                    .map_err(|e| write_err(e.to_string()))?;
                table
                    .insert(key.as_str(), value.as_slice())
                    .map_err(|e| write_err(e.to_string()))?;
            }
            txn.commit().map_err(|e| StorageError::Transaction {
                reason: e.to_string(),
            })
        })
        .await
        .map_err(|e| StorageError::Write {
            key: String::new(),
            reason: format!("blocking task panicked: {e}"),
        })?
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let db = Arc::clone(&self.db);
        let key = key.to_owned();
        tokio::task::spawn_blocking(move || {
            let delete_err = |reason: String| StorageError::Delete {
                key: key.clone(),
                reason,
            };
            let txn = db.begin_write().map_err(|e| delete_err(e.to_string()))?;
            {
                let mut table = txn
                    .open_table(SLOTS_TABLE)
                    .map_err(|e| delete_err(e.to_string()))?;
                table
                    .remove(key.as_str())
                    .map_err(|e| delete_err(e.to_string()))?;
            }
            txn.commit().map_err(|e| StorageError::Transaction {
                reason: e.to_string(),
            })
        })
        .await
        .map_err(|e| StorageError::Delete {
            key: String::new(),
            reason: format!("blocking task panicked: {e}"),
        })?
    }
}
