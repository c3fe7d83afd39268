use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::{LocalStorage, StorageError};

// Reads a JSON list from on-device storage. A missing or unreadable copy
// yields an empty list.
pub(crate) fn read_list<T, S>(storage: &S, key: &str) -> Vec<T>
where
    T: DeserializeOwned,
    S: LocalStorage,
{
    let raw = match storage.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            tracing::warn!(key, error = %err, "failed to read local copy");
            return Vec::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|err| {
        tracing::warn!(key, error = %err, "discarding corrupt local copy");
        Vec::new()
    })
}

pub(crate) fn write_list<T, S>(storage: &S, key: &str, items: &[T])
where
    T: Serialize,
    S: LocalStorage,
{
    let result = serde_json::to_string(items)
        .map_err(StorageError::from)
        .and_then(|raw| storage.save(key, &raw));

    if let Err(err) = result {
        tracing::warn!(key, error = %err, "failed to write local copy");
    }
}

pub(crate) fn forget<S: LocalStorage>(storage: &S, key: &str) {
    if let Err(err) = storage.remove(key) {
        tracing::warn!(key, error = %err, "failed to remove local copy");
    }
}
