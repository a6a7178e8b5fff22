//! # Checkout Service
//!
//! Orchestrates the multi-step register operations: completing a sale,
//! saving a quotation, duplicating a historical sale, and the stock
//! write-back that follows a completed sale.
//!
//! ## Failure Semantics
//! Every operation takes the caller's current draft snapshot by
//! reference and returns the NEW snapshot only on success. If the
//! backend write fails, the error comes back, the caller's draft is
//! untouched, and the cashier retries from exactly where they were. No
//! partial state is ever published.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use zarape_core::{CoreError, PaymentMethod, Sale};

use crate::error::StoreResult;
use crate::repository::customer::CustomerRepository;
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;
use crate::store::DocumentStore;

/// The register-facing service over the repositories.
#[derive(Clone)]
pub struct CheckoutService {
    products: ProductRepository,
    customers: CustomerRepository,
    sales: SaleRepository,
}

impl CheckoutService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        CheckoutService {
            products: ProductRepository::new(Arc::clone(&store)),
            customers: CustomerRepository::new(Arc::clone(&store)),
            sales: SaleRepository::new(store),
        }
    }

    pub fn products(&self) -> &ProductRepository {
        &self.products
    }

    pub fn customers(&self) -> &CustomerRepository {
        &self.customers
    }

    pub fn sales(&self) -> &SaleRepository {
        &self.sales
    }

    /// Completes a draft sale: allocates an invoice number, applies the
    /// lifecycle transition, persists, then writes back stock.
    ///
    /// The invoice flag and number land in one document write. Stock
    /// write-back runs after the sale is durable; a product that has
    /// vanished from the catalog is logged and skipped, since the sale
    /// itself is the financial record.
    pub async fn complete_sale(
        &self,
        draft: &Sale,
        method: PaymentMethod,
        payment_reference: &str,
    ) -> StoreResult<Sale> {
        // Checked before allocation; issued numbers are never reclaimed.
        if draft.is_empty() {
            return Err(CoreError::EmptySale(draft.id.clone()).into());
        }

        let invoice_number = self.sales.allocate_invoice_number().await?;
        let completed = draft.complete(&invoice_number, method, payment_reference, Utc::now())?;
        self.sales.save(&completed).await?;

        info!(
            id = %completed.id,
            invoice = %completed.invoice_number,
            total = %completed.total(),
            "sale completed"
        );

        // The persisted sale is the financial record; stock drift is
        // corrected later with an AJUSTE, never by re-running checkout.
        for line in &completed.lines {
            if let Err(e) = self.write_back_stock(&line.product_id, line.quantity).await {
                warn!(
                    product_id = %line.product_id,
                    code = %line.product_code,
                    error = %e,
                    "stock not adjusted for sold product"
                );
            }
        }

        Ok(completed)
    }

    async fn write_back_stock(&self, product_id: &str, quantity: i64) -> StoreResult<()> {
        let product = self.products.require(product_id).await?;
        self.products
            .update_stock(&product.id, product.stock - quantity)
            .await
    }

    /// Saves a draft as a quotation. Quotations stay editable and never
    /// receive an invoice number.
    pub async fn save_quotation(&self, draft: &Sale) -> StoreResult<Sale> {
        let quotation = draft.as_quotation()?;
        self.sales.save(&quotation).await?;
        info!(id = %quotation.id, "quotation saved");
        Ok(quotation)
    }

    /// Duplicates a historical sale into a fresh draft and persists it.
    pub async fn duplicate_sale(&self, sale_id: &str) -> StoreResult<Sale> {
        let original = self.sales.require(sale_id).await?;
        let copy = original.duplicate(Utc::now());
        self.sales.save(&copy).await?;
        info!(source = %sale_id, copy = %copy.id, "sale duplicated");
        Ok(copy)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
