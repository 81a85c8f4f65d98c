//! Session-scoped hand-off store between the edit and preview views.
//!
//! Holds JSON-serialized records under two keys. Consumers read with
//! [`SessionStore::take_record`], which clears the key on a successful read.

use std::collections::HashMap;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, error};

/// Record handed to the edit page (upload result, "back to edit").
pub const SKILLSHEET_DATA_KEY: &str = "skillsheetData";
/// Record handed to the preview page.
pub const PREVIEW_DATA_KEY: &str = "previewData";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no data stored under '{0}'")]
    Missing(String),

    #[error("stored data under '{key}' is malformed: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Clone)]
pub struct SessionStore {
    items: HashMap<String, String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: &str, value: impl Into<String>) {
        self.items.insert(key.to_string(), value.into());
    }

    pub fn remove_item(&mut self, key: &str) -> Option<String> {
        self.items.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    /// Serializes `value` under `key`, replacing any previous value.
    pub fn store_record<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), serde_json::Error> {
        let json = serde_json::to_string(value)?;
        self.set_item(key, json);
        debug!("Stored {key} in session");
        Ok(())
    }

    /// Parses the value under `key` and clears it. A malformed value is left
    /// in place and reported.
    pub fn take_record<T: DeserializeOwned>(&mut self, key: &str) -> Result<T, SessionError> {
        let raw = self
            .get_item(key)
            .ok_or_else(|| SessionError::Missing(key.to_string()))?;
        match serde_json::from_str(raw) {
            Ok(value) => {
                self.remove_item(key);
                debug!("Consumed {key} from session");
                Ok(value)
            }
            Err(source) => {
                error!("Error loading {key} from session storage: {source}");
                Err(SessionError::Malformed {
                    key: key.to_string(),
                    source,
                })
            }
        }
    }
}
