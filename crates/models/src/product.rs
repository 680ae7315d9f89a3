use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A product record: a server-assigned `id` plus whatever fields the caller sent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Product {
    /// Build a product from a request body; any `id` in the body is discarded.
    pub fn new(id: i64, mut fields: Map<String, Value>) -> Self {
        fields.remove("id");
        Self { id, fields }
    }

    /// Shallow merge: each top-level key in `patch` replaces the stored value.
    /// The stored `id` always survives.
    pub fn merge(&mut self, patch: Map<String, Value>) {
        for (key, value) in patch {
            if key == "id" {
                continue;
            }
            self.fields.insert(key, value);
        }
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}
