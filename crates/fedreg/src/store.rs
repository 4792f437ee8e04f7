//! The persistence collaborator.
//!
//! Editors never write records themselves; they hand a saved record to a
//! [`RecordStore`]. [`MemoryStore`] keeps records in a map for tests and
//! offline use.

use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

/// Prefix of ids assigned by [`MemoryStore::create`].
pub const MEMORY_ID_PREFIX: &str = "urn:registry:record:";

///
/// StoreError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum StoreError {
    #[error("no record with id '{id}'")]
    NotFound { id: String },

    #[error("record rejected: {message}")]
    Rejected { message: String },

    #[error("store unavailable: {message}")]
    Unavailable { message: String },
}

///
/// RecordStore
///
/// Remote create/read/update/delete keyed by record id.
///

pub trait RecordStore {
    fn fetch(&self, id: &str) -> Result<Value, StoreError>;

    /// Store a new record and return the id the store assigned to it.
    fn create(&mut self, record: &Value) -> Result<String, StoreError>;

    fn update(&mut self, id: &str, record: &Value) -> Result<(), StoreError>;

    /// Delete every record in `ids`, or none of them.
    fn delete(&mut self, ids: &[String]) -> Result<(), StoreError>;
}

///
/// MemoryStore
///

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, Value>,
    next: u64,
    outage: Option<String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_record(mut self, id: &str, record: Value) -> Self {
        self.records.insert(id.to_string(), record);
        self
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.records.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fail every call with [`StoreError::Unavailable`] until
    /// [`Self::restore`].
    pub fn interrupt(&mut self, message: impl Into<String>) {
        self.outage = Some(message.into());
    }

    pub fn restore(&mut self) {
        self.outage = None;
    }

    fn available(&self) -> Result<(), StoreError> {
        match &self.outage {
            Some(message) => Err(StoreError::Unavailable {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl RecordStore for MemoryStore {
    fn fetch(&self, id: &str) -> Result<Value, StoreError> {
        self.available()?;

        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    fn create(&mut self, record: &Value) -> Result<String, StoreError> {
        self.available()?;

        let Value::Object(map) = record else {
            return Err(StoreError::Rejected {
                message: "record is not an object".to_string(),
            });
        };

        self.next += 1;
        let id = format!("{MEMORY_ID_PREFIX}{}", self.next);

        let mut map = map.clone();
        map.insert("id".to_string(), Value::String(id.clone()));
        self.records.insert(id.clone(), Value::Object(map));

        Ok(id)
    }

    fn update(&mut self, id: &str, record: &Value) -> Result<(), StoreError> {
        self.available()?;

        match self.records.get_mut(id) {
            Some(stored) => {
                *stored = record.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound { id: id.to_string() }),
        }
    }

    fn delete(&mut self, ids: &[String]) -> Result<(), StoreError> {
        self.available()?;

        if let Some(missing) = ids.iter().find(|id| !self.records.contains_key(*id)) {
            return Err(StoreError::NotFound {
                id: missing.clone(),
            });
        }
        for id in ids {
            self.records.remove(id);
        }

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_assigns_sequential_ids() {
        let mut store = MemoryStore::new();

        let first = store.create(&json!({"Name": "a"})).expect("create");
        let second = store.create(&json!({"Name": "b"})).expect("create");

        assert_eq!(first, "urn:registry:record:1");
        assert_eq!(second, "urn:registry:record:2");
        assert_eq!(store.get(&first).map(|r| &r["id"]), Some(&json!(first)));
    }

    #[test]
    fn delete_is_all_or_nothing() {
        let mut store = MemoryStore::new()
            .with_record("a", json!({}))
            .with_record("b", json!({}));

        let err = store
            .delete(&["a".to_string(), "zzz".to_string()])
            .expect_err("unknown id");
        assert_eq!(err, StoreError::NotFound { id: "zzz".into() });
        assert_eq!(store.len(), 2);

        store.delete(&["a".to_string(), "b".to_string()]).expect("delete");
        assert!(store.is_empty());
    }

    #[test]
    fn interrupted_store_rejects_everything() {
        let mut store = MemoryStore::new().with_record("a", json!({}));
        store.interrupt("maintenance");

        assert!(matches!(
            store.fetch("a"),
            Err(StoreError::Unavailable { .. })
        ));
        assert!(store.update("a", &json!({"x": 1})).is_err());

        store.restore();
        store.update("a", &json!({"x": 1})).expect("update");
        assert_eq!(store.get("a"), Some(&json!({"x": 1})));
    }

    #[test]
    fn update_of_unknown_record_fails() {
        let mut store = MemoryStore::new();

        assert_eq!(
            store.update("ghost", &json!({})),
            Err(StoreError::NotFound { id: "ghost".into() })
        );
    }
}
