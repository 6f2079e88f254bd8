use crate::core::{PersistedStatus, StateStore, Storage};
use crate::utils::error::Result;

pub const DEFAULT_STATE_FILE: &str = "last_status.json";

/// Keeps the single `PersistedStatus` record as a JSON document in any `Storage`.
#[derive(Debug, Clone)]
pub struct JsonStateStore<S: Storage> {
    storage: S,
    key: String,
}

impl<S: Storage> JsonStateStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_STATE_FILE)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    async fn try_load(&self) -> Result<PersistedStatus> {
        let data = self.storage.read_file(&self.key).await?;
        let record = serde_json::from_slice(&data)?;
        Ok(record)
    }
}

impl<S: Storage> StateStore for JsonStateStore<S> {
    async fn load_state(&self) -> Option<PersistedStatus> {
        match self.try_load().await {
            Ok(record) => {
                tracing::debug!(
                    "Loaded previous status {} from {} (checked at {})",
                    record.status,
                    self.key,
                    record.timestamp
                );
                Some(record)
            }
            Err(e) if e.is_not_found() => {
                tracing::info!("🆕 No previous state at {}, starting cold", self.key);
                None
            }
            Err(e) => {
                // 損毀或無法讀取的狀態檔不能讓整個 tick 失敗
                tracing::warn!(
                    "⚠️ Ignoring unreadable state at {}: {} ({})",
                    self.key,
                    e,
                    e.recovery_suggestion()
                );
                None
            }
        }
    }

    async fn save_state(&self, state: &PersistedStatus) -> Result<()> {
        let json = serde_json::to_vec_pretty(state)?;
        tracing::debug!("Writing {} bytes of state to {}", json.len(), self.key);
        self.storage.write_file(&self.key, &json).await
    }
}
