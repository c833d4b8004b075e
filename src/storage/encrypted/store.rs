// src/storage/encrypted/store.rs
use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::cipher::StorageCipher;
use super::errors::{db_error, Result, StorageError};

const RECORDS: TableDefinition<&str, &[u8]> = TableDefinition::new("records");

/// Key-value store of JSON records sealed with [`StorageCipher`].
///
/// Keys are plain `kind:id` strings so related records can be listed by
/// prefix; only values are encrypted.
pub struct EncryptedStore {
    db: Database,
    cipher: RwLock<StorageCipher>,
}

impl EncryptedStore {
    pub async fn new<P: AsRef<Path>>(path: P, encryption_key: &str) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(path).map_err(db_error)?;

        // Create the table up front so readers never see it missing.
        let write_txn = db.begin_write().map_err(db_error)?;
        write_txn.open_table(RECORDS).map_err(db_error)?;
        write_txn.commit().map_err(db_error)?;

        let cipher = StorageCipher::new(encryption_key.as_bytes())?;
        info!("Opened encrypted store at {}", path.display());

        Ok(Self {
            db,
            cipher: RwLock::new(cipher),
        })
    }

    pub async fn store<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let serialized = serde_json::to_vec(value)
            .map_err(|e| StorageError::InvalidFormat(e.to_string()))?;

        let cipher = self.cipher.read().await;
        let encrypted = cipher.encrypt(&serialized)?;

        let write_txn = self.db.begin_write().map_err(db_error)?;
        {
            let mut table = write_txn.open_table(RECORDS).map_err(db_error)?;
            table.insert(key, encrypted.as_slice()).map_err(db_error)?;
        }
        write_txn.commit().map_err(db_error)?;

        debug!(key, "Stored record");
        Ok(())
    }

    pub async fn retrieve<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let encrypted = match self.read_raw(key)? {
            Some(data) => data,
            None => return Ok(None),
        };

        let cipher = self.cipher.read().await;
        let decrypted = cipher.decrypt(&encrypted)?;

        let value = serde_json::from_slice(&decrypted)
            .map_err(|e| StorageError::InvalidFormat(e.to_string()))?;

        Ok(Some(value))
    }

    /// Returns whether a record was removed.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let write_txn = self.db.begin_write().map_err(db_error)?;
        let existed = {
            let mut table = write_txn.open_table(RECORDS).map_err(db_error)?;
            let removed = table.remove(key).map_err(db_error)?;
            removed.is_some()
        };
        write_txn.commit().map_err(db_error)?;

        Ok(existed)
    }

    pub async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.read_raw(key)?.is_some())
    }

    /// Every record whose key starts with `prefix`, in key order.
    ///
    /// Records that fail to decrypt or decode are logged and skipped so one
    /// bad entry does not hide the rest of a list.
    pub async fn list<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<(String, T)>> {
        let entries = self.scan_raw(prefix)?;
        let cipher = self.cipher.read().await;

        let mut values = Vec::with_capacity(entries.len());
        for (key, encrypted) in entries {
            let decoded = cipher.decrypt(&encrypted).and_then(|plain| {
                serde_json::from_slice(&plain).map_err(|e| StorageError::InvalidFormat(e.to_string()))
            });
            match decoded {
                Ok(value) => values.push((key, value)),
                Err(e) => warn!(key = %key, "Skipping unreadable record: {}", e),
            }
        }

        Ok(values)
    }

    /// Re-encrypts every record under `new_key` in a single transaction.
    pub async fn rotate_encryption_key(&self, new_key: &str) -> Result<()> {
        let new_cipher = StorageCipher::new(new_key.as_bytes())?;
        let mut cipher = self.cipher.write().await;

        let entries = self.scan_raw("")?;
        let count = entries.len();

        let write_txn = self.db.begin_write().map_err(db_error)?;
        {
            let mut table = write_txn.open_table(RECORDS).map_err(db_error)?;
            for (key, old_encrypted) in entries {
                let decrypted = cipher.decrypt(&old_encrypted)?;
                let new_encrypted = new_cipher.encrypt(&decrypted)?;
                table
                    .insert(key.as_str(), new_encrypted.as_slice())
                    .map_err(db_error)?;
            }
        }
        write_txn.commit().map_err(db_error)?;

        *cipher = new_cipher;
        info!(records = count, "Rotated storage encryption key");

        Ok(())
    }

    fn read_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read().map_err(db_error)?;
        let table = read_txn.open_table(RECORDS).map_err(db_error)?;
        let value = table.get(key).map_err(db_error)?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    fn scan_raw(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let read_txn = self.db.begin_read().map_err(db_error)?;
        let table = read_txn.open_table(RECORDS).map_err(db_error)?;

        let mut entries = Vec::new();
        for entry in table.range(prefix..).map_err(db_error)? {
            let (key, value) = entry.map_err(db_error)?;
            let key = key.value();
            if !key.starts_with(prefix) {
                break;
            }
            entries.push((key.to_string(), value.value().to_vec()));
        }

        Ok(entries)
    }
}
