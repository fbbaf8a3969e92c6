//! In-memory session stores for generated content.
//!
//! One store per content kind. Entries live for the process lifetime; writes
//! to an existing id replace the previous entry.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

#[derive(Clone)]
pub struct SessionStore<T> {
    kind: &'static str,
    items: Arc<RwLock<HashMap<String, T>>>,
}

impl<T: Clone> SessionStore<T> {
    pub fn new(kind: &'static str) -> Self {
        Self { kind, items: Arc::new(RwLock::new(HashMap::new())) }
    }

    /// Label used in logs and not-found errors ("quiz", "quest line", ...).
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Store under a fresh random id and return it.
    pub async fn put(&self, content: T) -> String {
        let id = Uuid::new_v4().to_string();
        self.insert(id.clone(), content).await;
        id
    }

    #[instrument(level = "debug", skip(self, content), fields(kind = self.kind, %id))]
    pub async fn insert(&self, id: String, content: T) {
        let mut items = self.items.write().await;
        items.insert(id, content);
        debug!(target: "sessions", size = items.len(), "Session content stored");
    }

    /// Clone of the stored content.
    pub async fn get(&self, id: &str) -> Option<T> {
        self.items.read().await.get(id).cloned()
    }

    /// Mutate the stored copy in place under the write lock.
    pub async fn update<R>(&self, id: &str, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut items = self.items.write().await;
        items.get_mut(id).map(f)
    }
}
