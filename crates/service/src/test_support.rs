#![cfg(test)]
use std::path::PathBuf;
use std::sync::Arc;

use models::Database;
use serde_json::json;

use crate::storage::MemoryStore;

/// Unique path under the system temp dir for a throwaway store file.
pub fn temp_store_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("coffeeshop_{tag}_{}.json", uuid::Uuid::new_v4()))
}

/// Two products and one admin user.
pub fn sample_db() -> Database {
    serde_json::from_value(json!({
        "products": [
            {"id": 1, "name": "Espresso", "price": 3.0},
            {"id": 2, "name": "Latte", "price": 4.5, "milk": "whole"}
        ],
        "users": [
            {"id": 10, "username": "barista", "email": "barista@coffee.shop", "password": "beans", "role": "admin"}
        ]
    }))
    .expect("sample snapshot is well-formed")
}

pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new(sample_db()))
}
