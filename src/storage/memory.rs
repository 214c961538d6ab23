//! In-memory persistence
//!
//! Clones share the same backing map, so a test can keep a handle, run the
//! engine, and then inspect or reload what was saved.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::error::{LedgerError, LedgerResult};

use super::{DocumentKind, Persistence};

#[derive(Debug, Default)]
struct MemoryState {
    documents: HashMap<DocumentKind, Value>,
    save_count: usize,
    fail_saves: bool,
}

/// Persistence backed by a shared map
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw document, bypassing the engine
    pub fn insert(&self, kind: DocumentKind, document: Value) -> LedgerResult<()> {
        self.with_state(|state| {
            state.documents.insert(kind, document);
        })
    }

    /// Current raw document for a kind
    pub fn document(&self, kind: DocumentKind) -> LedgerResult<Option<Value>> {
        self.with_state(|state| state.documents.get(&kind).cloned())
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> LedgerResult<usize> {
        self.with_state(|state| state.save_count)
    }

    /// Make every subsequent save fail with a storage error
    pub fn set_fail_saves(&self, fail: bool) -> LedgerResult<()> {
        self.with_state(|state| state.fail_saves = fail)
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut MemoryState) -> R) -> LedgerResult<R> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire lock: {}", e)))?;
        Ok(f(&mut state))
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self, kind: DocumentKind) -> LedgerResult<Option<Value>> {
        self.document(kind)
    }

    fn save(&mut self, kind: DocumentKind, document: &Value) -> LedgerResult<()> {
        self.with_state(|state| {
            if state.fail_saves {
                return Err(LedgerError::Storage(format!("Failed to save {}", kind)));
            }
            state.documents.insert(kind, document.clone());
            state.save_count += 1;
            Ok(())
        })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clones_share_documents() {
        let handle = MemoryPersistence::new();
        let mut persistence = handle.clone();

        persistence.save(DocumentKind::Vendors, &json!({"a": 1})).unwrap();

        assert_eq!(handle.document(DocumentKind::Vendors).unwrap(), Some(json!({"a": 1})));
        assert_eq!(handle.save_count().unwrap(), 1);
    }

    #[test]
    fn test_failing_saves() {
        let mut persistence = MemoryPersistence::new();
        persistence.set_fail_saves(true).unwrap();

        let err = persistence.save(DocumentKind::Transactions, &json!([])).unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));
        assert!(persistence.document(DocumentKind::Transactions).unwrap().is_none());
    }
}
