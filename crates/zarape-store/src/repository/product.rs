//! # Product Repository
//!
//! Catalog reads and writes against the `productos` collection.

use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use zarape_core::Product;

use crate::document::{decode_product, encode_product};
use crate::error::{StoreError, StoreResult};
use crate::store::{DocumentStore, PRODUCTS};

/// Repository for catalog products.
#[derive(Clone)]
pub struct ProductRepository {
    store: Arc<dyn DocumentStore>,
}

impl ProductRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        ProductRepository { store }
    }

    /// Writes a product, replacing any existing document with its id.
    pub async fn save(&self, product: &Product) -> StoreResult<()> {
        debug!(id = %product.id, code = %product.code, "saving product");
        self.store
            .put(PRODUCTS, &product.id, encode_product(product))
            .await
    }

    /// Fetches a product by id.
    pub async fn get(&self, id: &str) -> StoreResult<Option<Product>> {
        match self.store.get(PRODUCTS, id).await? {
            Some(doc) => Ok(Some(decode_product(doc)?)),
            None => Ok(None),
        }
    }

    /// Fetches a product by id, failing when it is absent.
    pub async fn require(&self, id: &str) -> StoreResult<Product> {
        self.get(id)
            .await?
            .ok_or_else(|| StoreError::not_found("product", id))
    }

    /// Looks up a product by its human-entered SKU (barcode scans).
    pub async fn find_by_code(&self, code: &str) -> StoreResult<Option<Product>> {
        let hits = self
            .store
            .query_eq(PRODUCTS, "codigo", &json!(code))
            .await?;
        match hits.into_iter().next() {
            Some(doc) => Ok(Some(decode_product(doc)?)),
            None => Ok(None),
        }
    }

    /// The full catalog. Malformed documents abort the load with a
    /// decode error rather than being skipped.
    pub async fn list(&self) -> StoreResult<Vec<Product>> {
        let docs = self.store.list(PRODUCTS).await?;
        docs.into_iter()
            .map(|doc| decode_product(doc).map_err(StoreError::from))
            .collect()
    }

    /// Writes a new stock level for one product.
    ///
    /// Mirrors the backend's field update: the rest of the document is
    /// untouched, so a concurrent catalog edit is not clobbered.
    pub async fn update_stock(&self, id: &str, stock: i64) -> StoreResult<()> {
        let mut doc = self
            .store
            .get(PRODUCTS, id)
            .await?
            .ok_or_else(|| StoreError::not_found("product", id))?;
        doc["existencias"] = json!(stock);
        debug!(id, stock, "updating product stock");
        self.store.put(PRODUCTS, id, doc).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use zarape_core::sample;

    fn repo() -> ProductRepository {
        ProductRepository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let repo = repo();
        let product = sample::sample_products().remove(0);

        repo.save(&product).await.unwrap();
        let loaded = repo.get(&product.id).await.unwrap().unwrap();
        assert_eq!(loaded, product);

        assert!(repo.get("missing").await.unwrap().is_none());
        assert!(matches!(
            repo.require("missing").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_find_by_code() {
        let repo = repo();
        for product in sample::sample_products() {
            repo.save(&product).await.unwrap();
        }

        let hit = repo.find_by_code("0004").await.unwrap().unwrap();
        assert_eq!(hit.name, "Tapete Decorativo");
        assert!(repo.find_by_code("9999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_stock_preserves_document() {
        let repo = repo();
        let product = sample::sample_products().remove(0);
        repo.save(&product).await.unwrap();

        repo.update_stock(&product.id, 7).await.unwrap();
        let loaded = repo.get(&product.id).await.unwrap().unwrap();
        assert_eq!(loaded.stock, 7);
        assert_eq!(loaded.name, product.name);
        assert_eq!(loaded.price, product.price);
    }

    #[tokio::test]
    async fn test_list_fails_loudly_on_corrupt_document() {
        let store = Arc::new(MemoryStore::new());
        let repo = ProductRepository::new(Arc::clone(&store) as Arc<dyn DocumentStore>);
        repo.save(&sample::sample_products().remove(0)).await.unwrap();
        store
            .put(PRODUCTS, "corrupt", json!({"id": "corrupt"}))
            .await
            .unwrap();

        assert!(matches!(
            repo.list().await,
            Err(StoreError::Decode(_))
        ));
    }
}
