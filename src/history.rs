//! Generation history
//!
//! The orchestrator writes each successful generation to a history store,
//! best-effort: persistence failures never fail the generation. Stores
//! also back a browsing surface (list newest-first, delete, favorite,
//! clear), but the core never depends on read results.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::GenError;
use crate::types::{GeneratedRecord, GenerationRequest};

/// A persisted generation, as the browsing surface sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub url: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    pub params: GenerationRequest,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub favorite: bool,
}

/// What the orchestrator hands to `save`. The store assigns the id and
/// the favorite flag.
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub url: String,
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub params: GenerationRequest,
    pub created_at: DateTime<Utc>,
}

impl NewHistoryEntry {
    pub fn from_record(record: &GeneratedRecord) -> Self {
        Self {
            url: record.media.url.clone(),
            prompt: record.request.prompt.clone(),
            negative_prompt: record.request.negative_prompt.clone(),
            params: record.request.clone(),
            created_at: record.created_at,
        }
    }

    fn into_entry(self) -> HistoryEntry {
        HistoryEntry {
            id: Uuid::new_v4().to_string(),
            url: self.url,
            prompt: self.prompt,
            negative_prompt: self.negative_prompt,
            params: self.params,
            created_at: self.created_at,
            favorite: false,
        }
    }
}

/// Keyed store for generated records.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persist one generation; returns the assigned id.
    async fn save(&self, entry: NewHistoryEntry) -> Result<String, GenError>;

    /// All entries, newest first.
    async fn list(&self) -> Result<Vec<HistoryEntry>, GenError>;

    async fn delete(&self, id: &str) -> Result<(), GenError>;

    /// Flip the favorite flag. A missing id is a silent no-op.
    async fn toggle_favorite(&self, id: &str) -> Result<(), GenError>;

    async fn clear(&self) -> Result<(), GenError>;
}

/// In-memory store; the default for sessions that don't persist.
#[derive(Default)]
pub struct MemoryHistoryStore {
    entries: RwLock<Vec<HistoryEntry>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn save(&self, entry: NewHistoryEntry) -> Result<String, GenError> {
        let entry = entry.into_entry();
        let id = entry.id.clone();
        self.entries.write().await.insert(0, entry);
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<HistoryEntry>, GenError> {
        Ok(self.entries.read().await.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), GenError> {
        self.entries.write().await.retain(|e| e.id != id);
        Ok(())
    }

    async fn toggle_favorite(&self, id: &str) -> Result<(), GenError> {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.iter_mut().find(|e| e.id == id) {
            entry.favorite = !entry.favorite;
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), GenError> {
        self.entries.write().await.clear();
        Ok(())
    }
}

/// JSON-file-backed store. The whole history is small (URLs and params,
/// not media bytes), so rewrite-on-mutate is fine.
#[derive(Debug)]
pub struct JsonFileHistoryStore {
    path: PathBuf,
    entries: RwLock<Vec<HistoryEntry>>,
}

impl JsonFileHistoryStore {
    /// Open (or create) the store at `path`, loading existing entries.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, GenError> {
        let path = path.as_ref().to_path_buf();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| GenError::IoError(format!("corrupt history file: {e}")))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    async fn persist(&self, entries: &[HistoryEntry]) -> Result<(), GenError> {
        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|e| GenError::Internal(format!("history serialization failed: {e}")))?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for JsonFileHistoryStore {
    async fn save(&self, entry: NewHistoryEntry) -> Result<String, GenError> {
        let entry = entry.into_entry();
        let id = entry.id.clone();
        let mut entries = self.entries.write().await;
        entries.insert(0, entry);
        self.persist(&entries).await?;
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<HistoryEntry>, GenError> {
        Ok(self.entries.read().await.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), GenError> {
        let mut entries = self.entries.write().await;
        entries.retain(|e| e.id != id);
        self.persist(&entries).await
    }

    async fn toggle_favorite(&self, id: &str) -> Result<(), GenError> {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.iter_mut().find(|e| e.id == id) {
            entry.favorite = !entry.favorite;
        }
        self.persist(&entries).await
    }

    async fn clear(&self) -> Result<(), GenError> {
        let mut entries = self.entries.write().await;
        entries.clear();
        self.persist(&entries).await
    }
}
