use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

/// Profile key under which the dialect selection is stored.
pub const DIALECT_KEY: &str = "selected_dialect";

/// Durable per-user key-value storage, backed by whatever the host app
/// persists profiles with. The session layer only reads and writes strings.
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Opaque identity signal from the host's auth provider.
pub trait Identity: Send + Sync {
    fn is_authenticated(&self) -> bool;
    fn user_id(&self) -> Option<String>;
}

/// A selectable dialect for practice conversations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dialect {
    pub id: String,
    pub name: String,
    pub flag: String,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            id: "egyptian".to_string(),
            name: "Egyptian Arabic".to_string(),
            flag: "\u{1F1EA}\u{1F1EC}".to_string(),
        }
    }
}

/// Read the user's selected dialect, falling back to the default when
/// nothing is stored or the stored value cannot be parsed.
pub async fn selected_dialect(store: &dyn ProfileStore) -> Dialect {
    match store.get(DIALECT_KEY).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(dialect) => dialect,
            Err(e) => {
                warn!("stored dialect is unreadable, using default: {e}");
                Dialect::default()
            }
        },
        Ok(None) => Dialect::default(),
        Err(e) => {
            warn!("failed to read dialect selection: {e}");
            Dialect::default()
        }
    }
}

/// Persist the user's dialect selection.
pub async fn store_dialect(store: &dyn ProfileStore, dialect: &Dialect) -> Result<()> {
    let raw = serde_json::to_string(dialect)?;
    store.set(DIALECT_KEY, &raw).await
}

/// In-memory profile store for tests and the console client.
#[derive(Default)]
pub struct InMemoryProfile {
    values: Mutex<HashMap<String, String>>,
}

impl InMemoryProfile {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProfileStore for InMemoryProfile {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
