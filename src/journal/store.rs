//! Health Entry Store
//!
//! Holds the journal's entries in memory, in insertion order, with an
//! optional JSON snapshot on disk. Thread-safe via Tokio's async RwLock.
//!
//! Writes persist while holding the write lock, so snapshots are written one
//! at a time and always reflect the latest state. A write whose snapshot
//! fails is rolled back in memory.
//!
//! The analysis engine never reads the store directly: callers take a
//! `snapshot()` and pass it in, so every analysis sees one immutable view.

use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::error::{JournalError, JournalResult};
use super::types::{HealthEntry, TimeWindow};
use super::validate::validate_entry;

/// Snapshot file name inside the data directory
pub const SNAPSHOT_FILE: &str = "entries.json";

/// Store configuration
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Directory for the JSON snapshot; `None` keeps entries in memory only
    pub data_dir: Option<PathBuf>,
}

impl StoreConfig {
    /// Persist snapshots under `data_dir`
    pub fn persistent(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: Some(data_dir.as_ref().to_path_buf()),
        }
    }

    /// Keep entries in memory only
    pub fn in_memory() -> Self {
        Self { data_dir: None }
    }

    /// Path of the snapshot file, if persistence is enabled
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(SNAPSHOT_FILE))
    }
}

/// In-memory entry store with optional JSON persistence
pub struct EntryStore {
    config: StoreConfig,
    entries: RwLock<Vec<HealthEntry>>,
}

impl EntryStore {
    /// Open a store, loading an existing snapshot if one is present
    pub async fn open(config: StoreConfig) -> JournalResult<Self> {
        if let Some(dir) = &config.data_dir {
            tokio::fs::create_dir_all(dir).await?;
        }

        let entries = match config.snapshot_path() {
            Some(path) => load_snapshot(&path).await?,
            None => Vec::new(),
        };

        tracing::info!(
            entries = entries.len(),
            persistent = config.data_dir.is_some(),
            "Entry store opened"
        );

        Ok(Self {
            config,
            entries: RwLock::new(entries),
        })
    }

    /// Create an empty in-memory store
    pub fn in_memory() -> Self {
        Self {
            config: StoreConfig::in_memory(),
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Add a single entry
    pub async fn add(&self, entry: HealthEntry) -> JournalResult<()> {
        validate_entry(&entry)?;

        {
            let mut entries = self.entries.write().await;
            if entries.iter().any(|e| e.id == entry.id) {
                return Err(JournalError::DuplicateEntry(entry.id));
            }
            let entry_id = entry.id.clone();
            let symptoms = entry.symptoms.len();
            entries.push(entry);

            if let Err(e) = self.persist(&entries).await {
                entries.pop();
                return Err(e);
            }
            tracing::debug!(entry_id = %entry_id, symptoms, "Entry added");
        }

        Ok(())
    }

    /// Add a batch of entries; nothing is stored if any entry is rejected
    pub async fn add_batch(&self, batch: Vec<HealthEntry>) -> JournalResult<usize> {
        for entry in &batch {
            validate_entry(entry)?;
        }

        let count = batch.len();
        {
            let mut entries = self.entries.write().await;
            for (i, entry) in batch.iter().enumerate() {
                let clash = entries.iter().any(|e| e.id == entry.id)
                    || batch[..i].iter().any(|e| e.id == entry.id);
                if clash {
                    return Err(JournalError::DuplicateEntry(entry.id.clone()));
                }
            }
            let previous_len = entries.len();
            entries.extend(batch);

            if let Err(e) = self.persist(&entries).await {
                entries.truncate(previous_len);
                return Err(e);
            }
        }

        tracing::debug!(count, "Entry batch added");
        Ok(count)
    }

    /// Check if writes reach a snapshot file
    pub fn is_persistent(&self) -> bool {
        self.config.data_dir.is_some()
    }

    /// Check that the snapshot directory is still usable
    ///
    /// In-memory stores are always ready.
    pub async fn is_ready(&self) -> bool {
        let dir = match &self.config.data_dir {
            Some(dir) => dir,
            None => return true,
        };

        match tokio::fs::metadata(dir).await {
            Ok(meta) => meta.is_dir() && !meta.permissions().readonly(),
            Err(e) => {
                tracing::warn!(data_dir = ?dir, error = %e, "Data directory unavailable");
                false
            }
        }
    }

    /// Get an entry by id
    pub async fn get(&self, id: &str) -> Option<HealthEntry> {
        self.entries.read().await.iter().find(|e| e.id == id).cloned()
    }

    /// Delete an entry by id, returning it
    pub async fn delete(&self, id: &str) -> JournalResult<HealthEntry> {
        let mut entries = self.entries.write().await;
        let index = entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| JournalError::EntryNotFound(id.to_string()))?;
        let removed = entries.remove(index);

        if let Err(e) = self.persist(&entries).await {
            entries.insert(index, removed);
            return Err(e);
        }

        tracing::debug!(entry_id = %id, "Entry deleted");
        Ok(removed)
    }

    /// Entries dated within `window`, newest first
    pub async fn list(&self, window: TimeWindow) -> Vec<HealthEntry> {
        let mut selected: Vec<HealthEntry> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| window.contains(e.date))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.date.cmp(&a.date));
        selected
    }

    /// The `limit` most recent entries, newest first
    pub async fn recent(&self, limit: usize) -> Vec<HealthEntry> {
        let mut all = self.snapshot().await;
        all.sort_by(|a, b| b.date.cmp(&a.date));
        all.truncate(limit);
        all
    }

    /// Copy of every stored entry, in insertion order
    pub async fn snapshot(&self) -> Vec<HealthEntry> {
        self.entries.read().await.clone()
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Write the snapshot file (no-op for in-memory stores)
    pub async fn flush(&self) -> JournalResult<()> {
        // The write lock keeps flushes from interleaving with writes
        let entries = self.entries.write().await;
        self.persist(&entries).await
    }

    /// Write `entries` as the snapshot; callers hold the write lock
    async fn persist(&self, entries: &[HealthEntry]) -> JournalResult<()> {
        let path = match self.config.snapshot_path() {
            Some(path) => path,
            None => return Ok(()),
        };

        let content = serde_json::to_string_pretty(entries)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Replace atomically via a temp file
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &path).await?;

        Ok(())
    }
}

async fn load_snapshot(path: &Path) -> JournalResult<Vec<HealthEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = tokio::fs::read_to_string(path).await?;
    let entries: Vec<HealthEntry> = serde_json::from_str(&content)?;

    for entry in &entries {
        validate_entry(entry)?;
    }

    Ok(entries)
}
