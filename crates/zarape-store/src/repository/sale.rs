//! # Sale Repository
//!
//! Reads and writes against the `ventas` collection, plus the
//! backend-owned invoice counter.
//!
//! ## Invoice Allocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                  Invoice Number Allocation                          │
//! │                                                                     │
//! │  1. SEED (once per fresh backend)                                   │
//! │     scan ventas → highest numeroFactura → write_counter(max)        │
//! │                                                                     │
//! │  2. ALLOCATE (every completion)                                     │
//! │     increment(numeroFactura, 1) ──► 42 ──► "#00042"                 │
//! │                                                                     │
//! │  The counter lives on the backend and the increment is atomic, so   │
//! │  two registers completing sales at the same moment get distinct     │
//! │  numbers. Allocated numbers are never reclaimed: voiding a sale     │
//! │  leaves a gap in the sequence, by contract.                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use tracing::{debug, info};

use zarape_core::invoice::{format_invoice_number, parse_invoice_number};
use zarape_core::Sale;

use crate::document::{decode_customer, decode_sale, encode_sale};
use crate::error::{StoreError, StoreResult};
use crate::store::{DocumentStore, CUSTOMERS, INVOICE_COUNTER, SALES};

/// Repository for sales.
#[derive(Clone)]
pub struct SaleRepository {
    store: Arc<dyn DocumentStore>,
}

impl SaleRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        SaleRepository { store }
    }

    /// Writes a sale document.
    ///
    /// The invoice invariant is checked first: a sale with the invoiced
    /// flag and invoice number out of sync never reaches the backend.
    /// Flag and number travel in the same document, so the write is
    /// atomic from the store's point of view.
    pub async fn save(&self, sale: &Sale) -> StoreResult<()> {
        sale.check_invoice_invariant()?;
        debug!(id = %sale.id, invoice = %sale.invoice_number, "saving sale");
        self.store.put(SALES, &sale.id, encode_sale(sale)).await
    }

    /// Fetches a sale by id, rehydrating its customer from `clienteId`.
    pub async fn get(&self, id: &str) -> StoreResult<Option<Sale>> {
        let Some(doc) = self.store.get(SALES, id).await? else {
            return Ok(None);
        };
        Ok(Some(self.decode_with_customer(doc).await?))
    }

    /// Fetches a sale by id, failing when absent.
    pub async fn require(&self, id: &str) -> StoreResult<Sale> {
        self.get(id)
            .await?
            .ok_or_else(|| StoreError::not_found("sale", id))
    }

    /// The full sale history, oldest first (the order the history screen
    /// reverses for display).
    pub async fn list(&self) -> StoreResult<Vec<Sale>> {
        let docs = self.store.list(SALES).await?;
        let mut sales = Vec::with_capacity(docs.len());
        for doc in docs {
            sales.push(self.decode_with_customer(doc).await?);
        }
        sales.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(sales)
    }

    async fn decode_with_customer(&self, doc: serde_json::Value) -> StoreResult<Sale> {
        // Peek at clienteId before the full decode; the referenced
        // customer must exist or the sale is treated as corrupt.
        let cliente_id = doc
            .get("clienteId")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);

        let customer = match cliente_id {
            Some(id) => {
                let customer_doc = self
                    .store
                    .get(CUSTOMERS, &id)
                    .await?
                    .ok_or_else(|| StoreError::not_found("customer", id.clone()))?;
                Some(decode_customer(customer_doc)?)
            }
            None => None,
        };

        Ok(decode_sale(doc, customer)?)
    }

    // -------------------------------------------------------------------------
    // Invoice Counter
    // -------------------------------------------------------------------------

    /// Seeds the invoice counter from persisted history.
    ///
    /// Scans `ventas` for the highest `numeroFactura` and raises the
    /// counter to it when behind. Never lowers the counter: numbers are
    /// append-only even if history was pruned.
    pub async fn seed_invoice_counter(&self) -> StoreResult<i64> {
        let docs = self.store.list(SALES).await?;
        let highest = docs
            .iter()
            .filter_map(|doc| doc.get("numeroFactura"))
            .filter_map(serde_json::Value::as_str)
            .filter_map(parse_invoice_number)
            .max()
            .unwrap_or(0);

        let current = self.store.read_counter(INVOICE_COUNTER).await?;
        if highest > current {
            self.store.write_counter(INVOICE_COUNTER, highest).await?;
            info!(highest, "seeded invoice counter from sale history");
            return Ok(highest);
        }
        Ok(current)
    }

    /// Allocates the next invoice number from the backend counter.
    pub async fn allocate_invoice_number(&self) -> StoreResult<String> {
        let n = self.store.increment(INVOICE_COUNTER, 1).await?;
        let number = format_invoice_number(n);
        debug!(%number, "allocated invoice number");
        Ok(number)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::customer::CustomerRepository;
    use crate::store::MemoryStore;
    use chrono::Utc;
    use zarape_core::{sample, PaymentMethod};

    async fn seeded() -> (Arc<MemoryStore>, SaleRepository) {
        let store = Arc::new(MemoryStore::new());
        let customers = CustomerRepository::new(store.clone() as Arc<dyn DocumentStore>);
        for customer in sample::sample_customers() {
            customers.save(&customer).await.unwrap();
        }
        let sales = SaleRepository::new(store.clone() as Arc<dyn DocumentStore>);
        (store, sales)
    }

    fn draft() -> Sale {
        sample::sample_sale(&sample::sample_products(), &sample::sample_customers()).unwrap()
    }

    #[tokio::test]
    async fn test_save_and_rehydrate_customer() {
        let (store, repo) = seeded().await;
        let sale = draft();
        // The sale document stores only clienteId; the referenced
        // customer must be persisted under that exact id.
        let customer = sale.customer.clone().unwrap();
        let customers = CustomerRepository::new(store as Arc<dyn DocumentStore>);
        customers.save(&customer).await.unwrap();

        repo.save(&sale).await.unwrap();
        let loaded = repo.require(&sale.id).await.unwrap();
        assert_eq!(loaded.customer.as_ref().unwrap().name, "Ana López");
        assert_eq!(loaded.total(), sale.total());
    }

    #[tokio::test]
    async fn test_save_rejects_invariant_violation() {
        let (_store, repo) = seeded().await;
        let mut sale = draft();
        sale.customer = None;
        sale.invoiced = true; // number still empty

        let result = repo.save(&sale).await;
        assert!(matches!(result, Err(StoreError::Core(_))));
        assert!(repo.get(&sale.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_customer_reference_fails_loudly() {
        let (_store, repo) = seeded().await;
        let mut sale = draft();
        sale.customer = Some(zarape_core::Customer::new("Fantasma"));

        repo.save(&sale).await.unwrap();
        assert!(matches!(
            repo.get(&sale.id).await,
            Err(StoreError::NotFound { entity: "customer", .. })
        ));
    }

    #[tokio::test]
    async fn test_counter_seed_and_allocation() {
        let (_store, repo) = seeded().await;

        // Import two historical sales, one invoiced as #00005.
        let old = draft()
            .with_customer(None)
            .unwrap()
            .complete("#00005", PaymentMethod::Cash, "", Utc::now())
            .unwrap();
        repo.save(&old).await.unwrap();
        let mut quotation = draft().with_customer(None).unwrap().as_quotation().unwrap();
        quotation.comments = "cotización histórica".to_string();
        repo.save(&quotation).await.unwrap();

        assert_eq!(repo.seed_invoice_counter().await.unwrap(), 5);
        assert_eq!(repo.allocate_invoice_number().await.unwrap(), "#00006");
        assert_eq!(repo.allocate_invoice_number().await.unwrap(), "#00007");

        // Re-seeding never lowers the counter.
        assert_eq!(repo.seed_invoice_counter().await.unwrap(), 7);
        assert_eq!(repo.allocate_invoice_number().await.unwrap(), "#00008");
    }

    #[tokio::test]
    async fn test_list_sorted_by_timestamp() {
        let (_store, repo) = seeded().await;
        let products = sample::sample_products();

        for (i, days) in [3i64, 1, 2].iter().enumerate() {
            let at = Utc::now() - chrono::Duration::days(*days);
            let sale = Sale::new(at)
                .with_product(&products[i], 1)
                .unwrap()
                .complete(&format_invoice_number(i as i64 + 1), PaymentMethod::Cash, "", at)
                .unwrap();
            repo.save(&sale).await.unwrap();
        }

        let sales = repo.list().await.unwrap();
        assert_eq!(sales.len(), 3);
        assert!(sales.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }
}
