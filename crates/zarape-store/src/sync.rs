//! # Seed & Sync
//!
//! Gradual migration between local data and the remote store: push
//! whatever the backend is missing, load everything back. Used on first
//! run against a fresh backend and after working offline.
//!
//! Matching keys follow what each collection can promise:
//! - products by `codigo` (the human-entered SKU is the stable key)
//! - customers by `nombre|rfc` (no business key exists, so the pair)
//! - sales by `id`

use std::collections::HashSet;
use tracing::{debug, info};

use zarape_core::{Customer, Product, Sale};

use crate::error::StoreResult;
use crate::repository::customer::CustomerRepository;
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;

/// What a sync pass pushed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub products_pushed: usize,
    pub customers_pushed: usize,
    pub sales_pushed: usize,
}

/// Seed/sync routines over the repositories.
#[derive(Clone)]
pub struct DataSync {
    products: ProductRepository,
    customers: CustomerRepository,
    sales: SaleRepository,
}

impl DataSync {
    pub fn new(
        products: ProductRepository,
        customers: CustomerRepository,
        sales: SaleRepository,
    ) -> Self {
        DataSync {
            products,
            customers,
            sales,
        }
    }

    /// Pushes local data the backend is missing, then reseeds the
    /// invoice counter so imported history cannot collide with new
    /// invoices.
    pub async fn sync_all(
        &self,
        products: &[Product],
        customers: &[Customer],
        sales: &[Sale],
    ) -> StoreResult<SyncReport> {
        let report = SyncReport {
            products_pushed: self.sync_products(products).await?,
            customers_pushed: self.sync_customers(customers).await?,
            sales_pushed: self.sync_sales(sales).await?,
        };
        self.sales.seed_invoice_counter().await?;
        info!(?report, "sync complete");
        Ok(report)
    }

    /// Pushes local products whose `codigo` is not yet on the backend.
    pub async fn sync_products(&self, local: &[Product]) -> StoreResult<usize> {
        let existing: HashSet<String> = self
            .products
            .list()
            .await?
            .into_iter()
            .map(|p| p.code)
            .collect();

        let mut pushed = 0;
        for product in local {
            if existing.contains(&product.code) {
                continue;
            }
            self.products.save(product).await?;
            debug!(code = %product.code, name = %product.name, "product synced");
            pushed += 1;
        }
        Ok(pushed)
    }

    /// Pushes local customers missing by the `nombre|rfc` pair.
    pub async fn sync_customers(&self, local: &[Customer]) -> StoreResult<usize> {
        let existing: HashSet<String> = self
            .customers
            .list()
            .await?
            .into_iter()
            .map(|c| customer_key(&c))
            .collect();

        let mut pushed = 0;
        for customer in local {
            if existing.contains(&customer_key(customer)) {
                continue;
            }
            self.customers.save(customer).await?;
            debug!(name = %customer.name, "customer synced");
            pushed += 1;
        }
        Ok(pushed)
    }

    /// Pushes local sales whose `id` is not yet on the backend.
    pub async fn sync_sales(&self, local: &[Sale]) -> StoreResult<usize> {
        let existing: HashSet<String> = self
            .sales
            .list()
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();

        let mut pushed = 0;
        for sale in local {
            if existing.contains(&sale.id) {
                continue;
            }
            self.sales.save(sale).await?;
            debug!(id = %sale.id, invoice = %sale.invoice_number, "sale synced");
            pushed += 1;
        }
        Ok(pushed)
    }

    /// Loads the full backend state.
    pub async fn load_all(&self) -> StoreResult<(Vec<Product>, Vec<Customer>, Vec<Sale>)> {
        let products = self.products.list().await?;
        let customers = self.customers.list().await?;
        let sales = self.sales.list().await?;
        info!(
            products = products.len(),
            customers = customers.len(),
            sales = sales.len(),
            "loaded backend state"
        );
        Ok((products, customers, sales))
    }
}

fn customer_key(customer: &Customer) -> String {
    format!("{}|{}", customer.name, customer.tax_id)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DocumentStore, MemoryStore};
    use std::sync::Arc;
    use zarape_core::sample;

    fn data_sync(store: Arc<MemoryStore>) -> DataSync {
        let store = store as Arc<dyn DocumentStore>;
        DataSync::new(
            ProductRepository::new(Arc::clone(&store)),
            CustomerRepository::new(Arc::clone(&store)),
            SaleRepository::new(store),
        )
    }

    #[tokio::test]
    async fn test_sync_pushes_only_missing() {
        let sync = data_sync(Arc::new(MemoryStore::new()));
        let products = sample::sample_products();
        let customers = sample::sample_customers();

        let report = sync.sync_all(&products, &customers, &[]).await.unwrap();
        assert_eq!(report.products_pushed, 10);
        assert_eq!(report.customers_pushed, 5);
        assert_eq!(report.sales_pushed, 0);

        // A second pass finds everything by business key, even though the
        // regenerated sample data has fresh UUIDs.
        let report = sync
            .sync_all(&sample::sample_products(), &sample::sample_customers(), &[])
            .await
            .unwrap();
        assert_eq!(report, SyncReport::default());
    }

    #[tokio::test]
    async fn test_sync_seeds_invoice_counter_from_history() {
        let sync = data_sync(Arc::new(MemoryStore::new()));
        let products = sample::sample_products();
        let history = sample::sample_sale(&products, &[])
            .unwrap()
            .complete("#00041", zarape_core::PaymentMethod::Cash, "", chrono::Utc::now())
            .unwrap();

        sync.sync_all(&products, &[], &[history]).await.unwrap();
        let next = sync.sales.allocate_invoice_number().await.unwrap();
        assert_eq!(next, "#00042");
    }

    #[tokio::test]
    async fn test_load_all_round_trips() {
        let sync = data_sync(Arc::new(MemoryStore::new()));
        let products = sample::sample_products();
        let customers = sample::sample_customers();
        sync.sync_all(&products, &customers, &[]).await.unwrap();

        let (loaded_products, loaded_customers, loaded_sales) = sync.load_all().await.unwrap();
        assert_eq!(loaded_products.len(), 10);
        assert_eq!(loaded_customers.len(), 5);
        assert!(loaded_sales.is_empty());
    }
}
