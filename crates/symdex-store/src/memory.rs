use std::collections::HashMap;
use std::io::Read;
use std::sync::RwLock;

use async_trait::async_trait;
use symdex_types::{copy_chunked, CancellationToken, SymbolKey, DEFAULT_CHUNK_SIZE};

use crate::error::StoreResult;
use crate::path::check_component;
use crate::traits::SymbolStore;

type StoreKey = (String, SymbolKey);

#[derive(Default)]
struct State {
    files: HashMap<StoreKey, Vec<u8>>,
    /// Every committed save, in order, overwrites included.
    writes: Vec<StoreKey>,
}

/// In-memory symbol store.
///
/// Intended for tests and embedding. Content is held behind a `RwLock` and
/// the order of committed saves is recorded.
pub struct InMemorySymbolStore {
    state: RwLock<State>,
}

impl InMemorySymbolStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
        }
    }

    /// Number of distinct `(filename, key)` pairs stored.
    pub fn len(&self) -> usize {
        self.state.read().expect("lock poisoned").files.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.state.read().expect("lock poisoned").files.is_empty()
    }

    /// Content stored under `filename` and `key`.
    pub fn get(&self, filename: &str, key: &SymbolKey) -> Option<Vec<u8>> {
        let state = self.state.read().expect("lock poisoned");
        state
            .files
            .get(&(filename.to_string(), key.clone()))
            .cloned()
    }

    /// Committed saves in the order they happened.
    pub fn writes(&self) -> Vec<(String, SymbolKey)> {
        self.state.read().expect("lock poisoned").writes.clone()
    }

    /// Remove all content and forget the write log.
    pub fn clear(&self) {
        let mut state = self.state.write().expect("lock poisoned");
        state.files.clear();
        state.writes.clear();
    }
}

impl Default for InMemorySymbolStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SymbolStore for InMemorySymbolStore {
    async fn save(
        &self,
        filename: &str,
        key: &SymbolKey,
        mut content: Box<dyn Read + Send>,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        check_component("filename", filename)?;
        let mut data = Vec::new();
        copy_chunked(&mut content, &mut data, DEFAULT_CHUNK_SIZE, cancel)?;
        cancel.check()?;

        let pair = (filename.to_string(), key.clone());
        let mut state = self.state.write().expect("lock poisoned");
        state.files.insert(pair.clone(), data);
        state.writes.push(pair);
        Ok(())
    }
}

impl std::fmt::Debug for InMemorySymbolStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySymbolStore")
            .field("file_count", &self.len())
            .finish()
    }
}
