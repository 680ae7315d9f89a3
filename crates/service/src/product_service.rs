use std::sync::Arc;

use models::{id, Product};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::errors::ServiceError;
use crate::storage::StateStore;

/// Product CRUD over the shared snapshot.
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn StateStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn StateStore>) -> Self { Self { store } }

    pub async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        let db = self.store.load().await?;
        Ok(db.products)
    }

    pub async fn get(&self, id: i64) -> Result<Product, ServiceError> {
        let db = self.store.load().await?;
        db.product(id).cloned().ok_or_else(|| ServiceError::not_found("product"))
    }

    /// Append a product with a fresh id. Any `id` in `body` is ignored.
    #[instrument(skip(self, body), fields(field_count = body.len()))]
    pub async fn create(&self, body: Map<String, Value>) -> Result<Product, ServiceError> {
        let mut db = self.store.load().await?;
        let product = Product::new(id::next_id(), body);
        db.products.push(product.clone());
        self.store.save(&db).await?;
        info!(id = product.id, "product_created");
        Ok(product)
    }

    /// Shallow-merge `patch` onto the stored product, keeping its id.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i64, patch: Map<String, Value>) -> Result<Product, ServiceError> {
        let mut db = self.store.load().await?;
        let product = db.product_mut(id).ok_or_else(|| ServiceError::not_found("product"))?;
        product.merge(patch);
        let merged = product.clone();
        self.store.save(&db).await?;
        info!(id, "product_updated");
        Ok(merged)
    }

    /// Remove every product with `id`. Nothing is written when no record matched.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let mut db = self.store.load().await?;
        if !db.remove_product(id) {
            debug!(id, "delete of unknown product");
            return Err(ServiceError::not_found("product"));
        }
        self.store.save(&db).await?;
        info!(id, "product_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::test_support::{memory_store, sample_db};
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn list_returns_all_in_order() -> anyhow::Result<()> {
        let svc = ProductService::new(memory_store());
        let ids: Vec<i64> = svc.list().await?.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        Ok(())
    }

    #[tokio::test]
    async fn list_on_empty_store_is_empty() -> anyhow::Result<()> {
        let svc = ProductService::new(Arc::new(MemoryStore::default()));
        assert!(svc.list().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn create_then_get_yields_same_fields() -> anyhow::Result<()> {
        let store = memory_store();
        let svc = ProductService::new(store.clone());
        let created = svc.create(obj(json!({"name": "Mocha", "price": 5.25}))).await?;
        let fetched = svc.get(created.id).await?;
        assert_eq!(fetched, created);
        assert_eq!(fetched.field("name"), Some(&json!("Mocha")));
        assert_eq!(store.snapshot().await.products.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn get_unknown_is_not_found() {
        let svc = ProductService::new(memory_store());
        assert!(matches!(svc.get(999).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_merges_supplied_fields_only() -> anyhow::Result<()> {
        let svc = ProductService::new(memory_store());
        let merged = svc.update(2, obj(json!({"price": 5.0, "id": 77}))).await?;
        assert_eq!(merged.id, 2);
        assert_eq!(merged.field("price"), Some(&json!(5.0)));
        assert_eq!(merged.field("name"), Some(&json!("Latte")));
        assert_eq!(merged.field("milk"), Some(&json!("whole")));
        assert_eq!(svc.get(2).await?, merged);
        Ok(())
    }

    #[tokio::test]
    async fn update_unknown_is_not_found_and_store_unchanged() {
        let store = memory_store();
        let svc = ProductService::new(store.clone());
        assert!(matches!(svc.update(5, obj(json!({"x": 1}))).await, Err(ServiceError::NotFound(_))));
        assert_eq!(store.snapshot().await, sample_db());
    }

    #[tokio::test]
    async fn delete_removes_record() -> anyhow::Result<()> {
        let store = memory_store();
        let svc = ProductService::new(store.clone());
        svc.delete(1).await?;
        let ids: Vec<i64> = store.snapshot().await.products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2]);
        Ok(())
    }

    #[tokio::test]
    async fn delete_unknown_is_not_found_and_store_unchanged() {
        let store = memory_store();
        let svc = ProductService::new(store.clone());
        assert!(matches!(svc.delete(12345).await, Err(ServiceError::NotFound(_))));
        assert_eq!(store.snapshot().await, sample_db());
    }
}
