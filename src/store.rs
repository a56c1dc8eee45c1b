use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde_json::Value;

use crate::error::{Error, Result};

/// In-memory key-value store shared by every connection
pub struct Store {
    data: RwLock<HashMap<String, Value>>,
}

impl Store {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or fully replace the value bound to `key`
    pub fn put(&self, key: String, value: Value) {
        // The map is never left half-updated, so a poisoned lock is still usable.
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        data.insert(key, value);
    }

    /// Get the current value for `key`
    pub fn get(&self, key: &str) -> Result<Value> {
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        data.get(key)
            .cloned()
            .ok_or_else(|| Error::NotFound(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.data.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_put_and_get() {
        let store = Store::new();
        store.put("wallet_info".to_string(), json!({"type": "eth", "amount": 42}));
        assert_eq!(
            store.get("wallet_info").unwrap(),
            json!({"type": "eth", "amount": 42})
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_put_replaces_whole_value() {
        let store = Store::new();
        store.put("k".to_string(), json!({"a": 1, "b": 2}));
        store.put("k".to_string(), json!({"c": 3}));
        assert_eq!(store.get("k").unwrap(), json!({"c": 3}));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_not_found() {
        let store = Store::new();
        assert!(store.is_empty());
        assert_eq!(
            store.get("nonexistent_key"),
            Err(Error::NotFound("nonexistent_key".to_string()))
        );
    }

    #[test]
    fn test_keys_are_isolated() {
        let store = Store::new();
        store.put("k1".to_string(), json!(1));
        store.put("k2".to_string(), json!(2));
        store.put("k1".to_string(), json!("changed"));
        assert_eq!(store.get("k2").unwrap(), json!(2));
    }

    #[test]
    fn test_stored_null_is_a_value() {
        let store = Store::new();
        store.put("empty".to_string(), Value::Null);
        assert_eq!(store.get("empty").unwrap(), Value::Null);
    }
}
