//! # Customer Repository
//!
//! Reads and writes against the `clientes` collection. Name search runs
//! as a prefix query over the derived `nombreLower` field, which is how
//! the backend does case-insensitive lookups.

use std::sync::Arc;
use tracing::debug;

use zarape_core::Customer;

use crate::document::{decode_customer, encode_customer};
use crate::error::{StoreError, StoreResult};
use crate::store::{DocumentStore, CUSTOMERS};

/// Repository for customers.
#[derive(Clone)]
pub struct CustomerRepository {
    store: Arc<dyn DocumentStore>,
}

impl CustomerRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        CustomerRepository { store }
    }

    /// Writes a customer. The searchable `nombreLower` field is derived
    /// here so it can never drift from the display name.
    pub async fn save(&self, customer: &Customer) -> StoreResult<()> {
        debug!(id = %customer.id, name = %customer.name, "saving customer");
        self.store
            .put(CUSTOMERS, &customer.id, encode_customer(customer))
            .await
    }

    /// Fetches a customer by id.
    pub async fn get(&self, id: &str) -> StoreResult<Option<Customer>> {
        match self.store.get(CUSTOMERS, id).await? {
            Some(doc) => Ok(Some(decode_customer(doc)?)),
            None => Ok(None),
        }
    }

    /// Fetches a customer by id, failing when absent.
    pub async fn require(&self, id: &str) -> StoreResult<Customer> {
        self.get(id)
            .await?
            .ok_or_else(|| StoreError::not_found("customer", id))
    }

    /// All customers.
    pub async fn list(&self) -> StoreResult<Vec<Customer>> {
        let docs = self.store.list(CUSTOMERS).await?;
        docs.into_iter()
            .map(|doc| decode_customer(doc).map_err(StoreError::from))
            .collect()
    }

    /// Case-insensitive name search by prefix.
    pub async fn search_by_name(&self, name: &str) -> StoreResult<Vec<Customer>> {
        let prefix = name.trim().to_lowercase();
        let docs = self
            .store
            .query_prefix(CUSTOMERS, "nombreLower", &prefix)
            .await?;
        docs.into_iter()
            .map(|doc| decode_customer(doc).map_err(StoreError::from))
            .collect()
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

    async fn seeded_repo() -> CustomerRepository {
        let repo = CustomerRepository::new(Arc::new(MemoryStore::new()));
        for customer in sample::sample_customers() {
            repo.save(&customer).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_save_get_list() {
        let repo = seeded_repo().await;
        assert_eq!(repo.list().await.unwrap().len(), 5);

        let ana = repo
            .search_by_name("ana")
            .await
            .unwrap()
            .into_iter()
            .next()
            .unwrap();
        let loaded = repo.get(&ana.id).await.unwrap().unwrap();
        assert_eq!(loaded, ana);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_prefix() {
        let repo = seeded_repo().await;

        assert_eq!(repo.search_by_name("MAR").await.unwrap().len(), 1);
        assert_eq!(repo.search_by_name("  juan ").await.unwrap().len(), 1);
        assert_eq!(repo.search_by_name("zzz").await.unwrap().len(), 0);
        // Prefix, not substring: "fernández" only matches from the start.
        assert_eq!(repo.search_by_name("fernández").await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_require_missing_customer() {
        let repo = seeded_repo().await;
        assert!(matches!(
            repo.require("missing").await,
            Err(StoreError::NotFound { entity: "customer", .. })
        ));
    }
}
