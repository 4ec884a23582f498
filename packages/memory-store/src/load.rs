//! Loading and saving store contents as JSON.
//!
//! The file shape is `{ "<collection>": { "<id>": { ...fields } } }`.

use std::collections::BTreeMap;
use std::{fs, io, path};

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use docbind_core_store::{json_to_value, value_to_json, DocRef, Value};

use crate::MemoryStore;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not access {path}: {error}")]
    Io { path: path::PathBuf, error: io::Error },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected {expected} at {location}")]
    Shape {
        expected: &'static str,
        location: String,
    },
}

impl MemoryStore {
    /// Build a store from a JSON document tree.
    pub fn from_json(json: JsonValue) -> Result<Self, LoadError> {
        let JsonValue::Object(collections) = json else {
            return Err(LoadError::Shape {
                expected: "an object of collections",
                location: "/".into(),
            });
        };

        let store = MemoryStore::new();
        for (collection, docs) in collections {
            let JsonValue::Object(docs) = docs else {
                return Err(LoadError::Shape {
                    expected: "an object of documents",
                    location: format!("/{}", collection),
                });
            };
            for (id, fields) in docs {
                if !fields.is_object() {
                    return Err(LoadError::Shape {
                        expected: "an object of fields",
                        location: format!("/{}/{}", collection, id),
                    });
                }
                store.insert(&DocRef::new(collection.clone(), id), json_to_value(fields));
            }
        }
        Ok(store)
    }

    /// Export every existing document as a JSON document tree.
    pub fn dump(&self) -> JsonValue {
        let mut collections: BTreeMap<String, Map<String, JsonValue>> = BTreeMap::new();
        for (doc, data) in self.documents() {
            collections
                .entry(doc.collection().to_string())
                .or_default()
                .insert(doc.id().to_string(), value_to_json(data));
        }
        JsonValue::Object(
            collections
                .into_iter()
                .map(|(name, docs)| (name, JsonValue::Object(docs)))
                .collect(),
        )
    }

    /// Read a store from a JSON file.
    pub fn load(file: &path::Path) -> Result<Self, LoadError> {
        let text = fs::read_to_string(file).map_err(|error| LoadError::Io {
            path: file.to_path_buf(),
            error,
        })?;
        tracing::debug!(path = %file.display(), "loading documents");
        Self::from_json(serde_json::from_str(&text)?)
    }

    /// Write every existing document to a JSON file.
    pub fn save(&self, file: &path::Path) -> Result<(), LoadError> {
        let text = serde_json::to_string_pretty(&self.dump())?;
        fs::write(file, text).map_err(|error| LoadError::Io {
            path: file.to_path_buf(),
            error,
        })
    }
}

/// Convenience for seeding one document from a JSON literal.
pub fn document(json: JsonValue) -> Value {
    json_to_value(json)
}
