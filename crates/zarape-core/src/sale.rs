//! # Sales
//!
//! Line items, sale-level pricing, and the sale lifecycle.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Sale Lifecycle                               │
//! │                                                                     │
//! │                      ┌─────────┐                                    │
//! │      Sale::new ────► │  Draft  │ ◄── lines freely editable          │
//! │                      └────┬────┘                                    │
//! │                           │                                         │
//! │           ┌───────────────┴────────────────┐                        │
//! │           │ complete(...)                  │ as_quotation()         │
//! │           ▼                                ▼                        │
//! │     ┌───────────┐                   ┌───────────┐                   │
//! │     │ Completed │                   │ Quotation │                   │
//! │     │ invoiced  │                   │ no invoice│                   │
//! │     │ #00042    │                   │ editable  │                   │
//! │     └───────────┘                   └───────────┘                   │
//! │                                                                     │
//! │  Completed is terminal for invoice assignment: the number never     │
//! │  changes, only comments may still be edited.                        │
//! │                                                                     │
//! │  duplicate() produces a fresh Draft from any sale, with cleared     │
//! │  flags and a comment naming the source invoice.                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Updates
//! Every edit returns a NEW `Sale` value; the original is untouched. The
//! caller replaces its current snapshot with the returned one, so an
//! observer can never see a half-applied update (the invoiced flag and
//! invoice number always change together, in one snapshot).
//!
//! ## Pricing
//! Totals are a pure function of the current line items, recomputed on
//! every call. There is no cached running total to drift out of sync.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{Discount, Money, TaxRate};
use crate::types::{Customer, PaymentMethod, Product};
use crate::{MAX_LINE_QUANTITY, MAX_SALE_LINES};

// =============================================================================
// Sale Line
// =============================================================================

/// One product entry within a sale.
///
/// The product is captured **by value** at add time: code, name, price
/// and tax rate are copied, not live-linked. Historical sales are immune
/// to later catalog edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: String,
    /// SKU at time of sale (frozen).
    pub product_code: String,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Unit price at time of sale (frozen).
    pub unit_price: Money,
    /// Tax rate at time of sale (frozen).
    pub tax_rate: TaxRate,
    /// Units sold. Always positive.
    pub quantity: i64,
    /// Per-line discount.
    pub discount: Discount,
}

impl SaleLine {
    /// Creates a line from a catalog product, freezing its fields.
    pub fn new(product: &Product, quantity: i64, discount: Discount) -> CoreResult<Self> {
        SaleLine::from_parts(
            &product.id,
            &product.code,
            &product.name,
            product.price,
            product.tax_rate,
            quantity,
            discount,
        )
    }

    /// Creates a line from already-frozen parts (document decoding,
    /// tests). Validates quantity and price; the `Discount` type already
    /// guarantees its own range.
    pub fn from_parts(
        product_id: &str,
        product_code: &str,
        product_name: &str,
        unit_price: Money,
        tax_rate: TaxRate,
        quantity: i64,
        discount: Discount,
    ) -> CoreResult<Self> {
        validate_line_quantity(quantity)?;
        if unit_price.is_negative() {
            return Err(ValidationError::NegativeAmount { field: "unit price" }.into());
        }

        Ok(SaleLine {
            product_id: product_id.to_string(),
            product_code: product_code.to_string(),
            product_name: product_name.to_string(),
            unit_price,
            tax_rate,
            quantity,
            discount,
        })
    }

    /// Line amount before discount and tax.
    pub fn gross(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Discounted line amount before tax:
    /// `unit_price × quantity × (1 − discount)`.
    pub fn subtotal(&self) -> Money {
        self.gross().apply_discount(self.discount)
    }

    /// Tax charged on the discounted subtotal.
    pub fn tax(&self) -> Money {
        self.subtotal().calculate_tax(self.tax_rate)
    }

    /// Line amount including tax.
    pub fn total(&self) -> Money {
        self.subtotal() + self.tax()
    }
}

fn validate_line_quantity(quantity: i64) -> CoreResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::InvalidQuantity(quantity).into());
    }
    if quantity > MAX_LINE_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: quantity,
            max: MAX_LINE_QUANTITY,
        });
    }
    Ok(())
}

// =============================================================================
// Sale Status
// =============================================================================

/// Where a sale sits in its lifecycle. Derived from the stored flags,
/// not persisted itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Being put together at the register.
    Draft,
    /// Paid, invoiced, and frozen except for comments.
    Completed,
    /// A priced snapshot that will never be billed.
    Quotation,
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SaleStatus::Draft => "draft",
            SaleStatus::Completed => "completed",
            SaleStatus::Quotation => "quotation",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A sale: an ordered collection of line items plus payment and
/// lifecycle state.
///
/// ## Invariants
/// - `invoiced == true` if and only if `invoice_number` is non-empty
///   ([`Sale::check_invoice_invariant`]; also enforced at the save
///   boundary in `zarape-store`)
/// - a quotation never holds an invoice number
/// - line order is insertion order and is preserved on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    /// Line items in insertion order (= display order).
    pub lines: Vec<SaleLine>,
    /// Customer, when the sale is not a walk-in.
    pub customer: Option<Customer>,
    pub payment_method: PaymentMethod,
    /// When the sale happened. Re-stamped at completion so the recorded
    /// time is the payment capture, not the first keystroke.
    pub timestamp: DateTime<Utc>,
    /// Free-text comments. The one field still editable after completion.
    pub comments: String,
    pub completed: bool,
    pub invoiced: bool,
    /// Card/transfer authorization reference, when the method has one.
    pub payment_reference: String,
    /// Assigned on completion, `""` until then. Never changes afterwards.
    pub invoice_number: String,
    pub is_quotation: bool,
}

impl Sale {
    /// Creates an empty draft sale.
    pub fn new(at: DateTime<Utc>) -> Self {
        Sale {
            id: Uuid::new_v4().to_string(),
            lines: Vec::new(),
            customer: None,
            payment_method: PaymentMethod::default(),
            timestamp: at,
            comments: String::new(),
            completed: false,
            invoiced: false,
            payment_reference: String::new(),
            invoice_number: String::new(),
            is_quotation: false,
        }
    }

    /// The lifecycle state implied by the flags.
    pub fn status(&self) -> SaleStatus {
        if self.completed {
            SaleStatus::Completed
        } else if self.is_quotation {
            SaleStatus::Quotation
        } else {
            SaleStatus::Draft
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    // -------------------------------------------------------------------------
    // Pricing (always recomputed from current lines)
    // -------------------------------------------------------------------------

    /// Sum of discounted line subtotals. Zero for an empty sale.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(SaleLine::subtotal).sum()
    }

    /// Sum of per-line tax amounts.
    pub fn tax(&self) -> Money {
        self.lines.iter().map(SaleLine::tax).sum()
    }

    /// Grand total including tax.
    pub fn total(&self) -> Money {
        self.lines.iter().map(SaleLine::total).sum()
    }

    /// Total units across all lines.
    pub fn product_count(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    // -------------------------------------------------------------------------
    // Line Editing (snapshot style)
    // -------------------------------------------------------------------------
    // Each method validates, then returns a NEW sale with the edit
    // applied. Completed sales reject every line edit.

    /// Adds a product to the sale. If the product is already present the
    /// quantities merge instead of creating a second line.
    pub fn with_product(&self, product: &Product, quantity: i64) -> CoreResult<Sale> {
        self.ensure_editable()?;

        let mut next = self.clone();
        if let Some(line) = next.lines.iter_mut().find(|l| l.product_id == product.id) {
            validate_line_quantity(line.quantity + quantity)?;
            line.quantity += quantity;
            return Ok(next);
        }

        if next.lines.len() >= MAX_SALE_LINES {
            return Err(CoreError::TooManyLines { max: MAX_SALE_LINES });
        }
        next.lines.push(SaleLine::new(product, quantity, Discount::NONE)?);
        Ok(next)
    }

    /// Appends an already-built line (decoded documents, pre-discounted
    /// entries).
    pub fn with_line(&self, line: SaleLine) -> CoreResult<Sale> {
        self.ensure_editable()?;
        if self.lines.len() >= MAX_SALE_LINES {
            return Err(CoreError::TooManyLines { max: MAX_SALE_LINES });
        }

        let mut next = self.clone();
        next.lines.push(line);
        Ok(next)
    }

    /// Changes a line's quantity. Quantity 0 removes the line.
    pub fn with_line_quantity(&self, product_id: &str, quantity: i64) -> CoreResult<Sale> {
        self.ensure_editable()?;
        if quantity == 0 {
            return self.without_line(product_id);
        }
        validate_line_quantity(quantity)?;

        let mut next = self.clone();
        let line = next
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or_else(|| CoreError::LineNotFound(product_id.to_string()))?;
        line.quantity = quantity;
        Ok(next)
    }

    /// Changes a line's discount.
    pub fn with_line_discount(&self, product_id: &str, discount: Discount) -> CoreResult<Sale> {
        self.ensure_editable()?;

        let mut next = self.clone();
        let line = next
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or_else(|| CoreError::LineNotFound(product_id.to_string()))?;
        line.discount = discount;
        Ok(next)
    }

    /// Removes the line for a product.
    pub fn without_line(&self, product_id: &str) -> CoreResult<Sale> {
        self.ensure_editable()?;

        let mut next = self.clone();
        let before = next.lines.len();
        next.lines.retain(|l| l.product_id != product_id);
        if next.lines.len() == before {
            return Err(CoreError::LineNotFound(product_id.to_string()));
        }
        Ok(next)
    }

    /// Drops every line.
    pub fn without_lines(&self) -> CoreResult<Sale> {
        self.ensure_editable()?;

        let mut next = self.clone();
        next.lines.clear();
        Ok(next)
    }

    /// Sets or clears the customer.
    pub fn with_customer(&self, customer: Option<Customer>) -> CoreResult<Sale> {
        self.ensure_editable()?;

        let mut next = self.clone();
        next.customer = customer;
        Ok(next)
    }

    /// Replaces the comments. Allowed in every state; comments are
    /// non-financial.
    pub fn with_comments(&self, comments: &str) -> Sale {
        let mut next = self.clone();
        next.comments = comments.to_string();
        next
    }

    // -------------------------------------------------------------------------
    // Lifecycle Transitions
    // -------------------------------------------------------------------------

    /// Draft → Completed: payment captured.
    ///
    /// Assigns the invoice number, sets both lifecycle flags, records the
    /// payment, and re-stamps the timestamp with the capture time. All of
    /// it lands in one returned snapshot.
    pub fn complete(
        &self,
        invoice_number: &str,
        method: PaymentMethod,
        payment_reference: &str,
        at: DateTime<Utc>,
    ) -> CoreResult<Sale> {
        if self.is_quotation {
            return Err(CoreError::QuotationNotInvoiceable(self.id.clone()));
        }
        if self.completed || self.invoiced {
            return Err(CoreError::AlreadyInvoiced {
                sale_id: self.id.clone(),
                invoice_number: self.invoice_number.clone(),
            });
        }
        if self.lines.is_empty() {
            return Err(CoreError::EmptySale(self.id.clone()));
        }
        if invoice_number.is_empty() {
            return Err(ValidationError::Required {
                field: "invoice number",
            }
            .into());
        }

        let mut next = self.clone();
        next.payment_method = method;
        next.payment_reference = payment_reference.to_string();
        next.completed = true;
        next.invoiced = true;
        next.invoice_number = invoice_number.to_string();
        next.timestamp = at;
        Ok(next)
    }

    /// Draft → Quotation: a priced snapshot that will never be billed.
    /// Stays editable; never receives an invoice number.
    pub fn as_quotation(&self) -> CoreResult<Sale> {
        if self.completed {
            return Err(CoreError::InvalidStatus {
                sale_id: self.id.clone(),
                status: self.status().to_string(),
            });
        }

        let mut next = self.clone();
        next.is_quotation = true;
        Ok(next)
    }

    /// Produces a fresh Draft copying lines, customer, and payment method.
    ///
    /// The copy gets a new id and timestamp, cleared lifecycle flags, no
    /// invoice number, and a comment naming the source so the cashier can
    /// trace where it came from.
    pub fn duplicate(&self, at: DateTime<Utc>) -> Sale {
        let source = if self.invoice_number.is_empty() {
            // Drafts and quotations have no invoice; fall back to the id
            // prefix used as the ticket folio.
            self.id.chars().take(8).collect::<String>()
        } else {
            self.invoice_number.clone()
        };

        let mut comments = self.comments.clone();
        if !comments.is_empty() {
            comments.push(' ');
        }
        comments.push_str(&format!("(Copia de {source})"));

        Sale {
            id: Uuid::new_v4().to_string(),
            lines: self.lines.clone(),
            customer: self.customer.clone(),
            payment_method: self.payment_method,
            timestamp: at,
            comments,
            completed: false,
            invoiced: false,
            payment_reference: String::new(),
            invoice_number: String::new(),
            is_quotation: false,
        }
    }

    /// Verifies `invoiced == true ⟺ invoice_number non-empty`, and that a
    /// quotation holds no number. Called before every persist and after
    /// every decode.
    pub fn check_invoice_invariant(&self) -> CoreResult<()> {
        if self.invoiced != !self.invoice_number.is_empty() {
            return Err(CoreError::InvoiceFlagMismatch(self.id.clone()));
        }
        if self.is_quotation && !self.invoice_number.is_empty() {
            return Err(CoreError::QuotationNotInvoiceable(self.id.clone()));
        }
        Ok(())
    }

    fn ensure_editable(&self) -> CoreResult<()> {
        if self.completed {
            return Err(CoreError::InvalidStatus {
                sale_id: self.id.clone(),
                status: self.status().to_string(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price_cents: i64) -> Product {
        let mut p = Product::new(
            &format!("SKU-{id}"),
            &format!("Producto {id}"),
            Money::from_cents(price_cents),
            Utc::now(),
        );
        p.id = id.to_string();
        p
    }

    fn two_line_sale() -> Sale {
        // Product A: $100.00, 16%, qty 2, no discount
        // Product B: $50.00, 16%, qty 1, 10% discount
        let a = product("a", 10000);
        let b = product("b", 5000);

        let sale = Sale::new(Utc::now());
        let sale = sale.with_product(&a, 2).unwrap();
        let sale = sale.with_product(&b, 1).unwrap();
        sale.with_line_discount("b", Discount::from_bps(1000).unwrap())
            .unwrap()
    }

    #[test]
    fn test_line_pricing() {
        let p = product("a", 10000);
        let line = SaleLine::new(&p, 2, Discount::NONE).unwrap();

        assert_eq!(line.subtotal().cents(), 20000);
        assert_eq!(line.tax().cents(), 3200);
        assert_eq!(line.total().cents(), 23200);
    }

    #[test]
    fn test_line_tax_is_rate_of_discounted_subtotal() {
        let p = product("b", 5000);
        let line = SaleLine::new(&p, 1, Discount::from_bps(1000).unwrap()).unwrap();

        assert_eq!(line.subtotal().cents(), 4500);
        assert_eq!(line.total() - line.subtotal(), line.tax());
        assert_eq!(line.tax(), line.subtotal().calculate_tax(line.tax_rate));
    }

    #[test]
    fn test_line_subtotal_non_increasing_in_discount() {
        let p = product("a", 33333);
        let mut previous = i64::MAX;
        for bps in (0..=10000).step_by(250) {
            let line = SaleLine::new(&p, 3, Discount::from_bps(bps).unwrap()).unwrap();
            let subtotal = line.subtotal().cents();
            assert!(subtotal <= previous, "subtotal rose at {bps} bps");
            previous = subtotal;
        }
        // 100% discount zeroes the line.
        let free = SaleLine::new(&p, 3, Discount::from_bps(10000).unwrap()).unwrap();
        assert_eq!(free.subtotal().cents(), 0);
    }

    #[test]
    fn test_line_rejects_bad_quantity() {
        let p = product("a", 1000);
        assert!(matches!(
            SaleLine::new(&p, 0, Discount::NONE),
            Err(CoreError::Validation(ValidationError::InvalidQuantity(0)))
        ));
        assert!(SaleLine::new(&p, -3, Discount::NONE).is_err());
        assert!(matches!(
            SaleLine::new(&p, 1000, Discount::NONE),
            Err(CoreError::QuantityTooLarge { .. })
        ));
    }

    #[test]
    fn test_sale_totals_scenario() {
        // From the shop's acceptance sheet:
        // subtotal $245.00, tax $39.20, total $284.20
        let sale = two_line_sale();
        assert_eq!(sale.subtotal().cents(), 24500);
        assert_eq!(sale.tax().cents(), 3920);
        assert_eq!(sale.total().cents(), 28420);
        assert_eq!(sale.product_count(), 3);
    }

    #[test]
    fn test_sale_totals_order_independent() {
        let sale = two_line_sale();
        let mut reversed = sale.clone();
        reversed.lines.reverse();

        assert_eq!(sale.subtotal(), reversed.subtotal());
        assert_eq!(sale.tax(), reversed.tax());
        assert_eq!(sale.total(), reversed.total());
    }

    #[test]
    fn test_empty_sale_zeroes_and_cannot_complete() {
        let sale = Sale::new(Utc::now());
        assert!(sale.subtotal().is_zero());
        assert!(sale.tax().is_zero());
        assert!(sale.total().is_zero());
        assert_eq!(sale.product_count(), 0);

        let result = sale.complete("#00001", PaymentMethod::Cash, "", Utc::now());
        assert!(matches!(result, Err(CoreError::EmptySale(_))));
    }

    #[test]
    fn test_add_same_product_merges_quantity() {
        let p = product("a", 1000);
        let sale = Sale::new(Utc::now());
        let sale = sale.with_product(&p, 2).unwrap();
        let sale = sale.with_product(&p, 3).unwrap();

        assert_eq!(sale.lines.len(), 1);
        assert_eq!(sale.product_count(), 5);
    }

    #[test]
    fn test_line_edit_and_remove() {
        let a = product("a", 1000);
        let b = product("b", 2000);
        let sale = Sale::new(Utc::now())
            .with_product(&a, 1)
            .unwrap()
            .with_product(&b, 2)
            .unwrap();

        let sale = sale.with_line_quantity("a", 4).unwrap();
        assert_eq!(sale.product_count(), 6);

        // Quantity zero removes the line.
        let sale = sale.with_line_quantity("b", 0).unwrap();
        assert_eq!(sale.lines.len(), 1);

        assert!(matches!(
            sale.without_line("b"),
            Err(CoreError::LineNotFound(_))
        ));
    }

    #[test]
    fn test_snapshot_edits_leave_original_untouched() {
        let p = product("a", 1000);
        let original = Sale::new(Utc::now()).with_product(&p, 1).unwrap();
        let edited = original.with_line_quantity("a", 9).unwrap();

        assert_eq!(original.product_count(), 1);
        assert_eq!(edited.product_count(), 9);
    }

    #[test]
    fn test_complete_assigns_invoice_atomically() {
        let sale = two_line_sale();
        let at = Utc::now();
        let done = sale
            .complete("#00007", PaymentMethod::CreditCard, "AUTH-55", at)
            .unwrap();

        assert_eq!(done.status(), SaleStatus::Completed);
        assert!(done.completed);
        assert!(done.invoiced);
        assert_eq!(done.invoice_number, "#00007");
        assert_eq!(done.payment_reference, "AUTH-55");
        assert_eq!(done.timestamp, at);
        assert!(done.check_invoice_invariant().is_ok());

        // The draft the cashier held is unchanged.
        assert_eq!(sale.status(), SaleStatus::Draft);
        assert!(sale.invoice_number.is_empty());
    }

    #[test]
    fn test_complete_twice_is_a_conflict() {
        let done = two_line_sale()
            .complete("#00001", PaymentMethod::Cash, "", Utc::now())
            .unwrap();

        let again = done.complete("#00002", PaymentMethod::Cash, "", Utc::now());
        assert!(matches!(again, Err(CoreError::AlreadyInvoiced { .. })));
        assert_eq!(done.invoice_number, "#00001");
    }

    #[test]
    fn test_completed_sale_is_frozen_except_comments() {
        let done = two_line_sale()
            .complete("#00001", PaymentMethod::Cash, "", Utc::now())
            .unwrap();
        let p = product("c", 100);

        assert!(done.with_product(&p, 1).is_err());
        assert!(done.with_line_quantity("a", 5).is_err());
        assert!(done.without_line("a").is_err());
        assert!(done.with_customer(None).is_err());
        assert!(done.as_quotation().is_err());

        let commented = done.with_comments("entregado en tienda");
        assert_eq!(commented.comments, "entregado en tienda");
        assert_eq!(commented.invoice_number, "#00001");
    }

    #[test]
    fn test_quotation_never_invoiceable() {
        let quote = two_line_sale().as_quotation().unwrap();
        assert_eq!(quote.status(), SaleStatus::Quotation);
        assert!(quote.invoice_number.is_empty());

        let result = quote.complete("#00009", PaymentMethod::Cash, "", Utc::now());
        assert!(matches!(result, Err(CoreError::QuotationNotInvoiceable(_))));

        // Quotations remain editable.
        let p = product("c", 700);
        assert!(quote.with_product(&p, 1).is_ok());
    }

    #[test]
    fn test_duplicate_clears_lifecycle_state() {
        let done = two_line_sale()
            .complete("#00003", PaymentMethod::Transfer, "SPEI-9", Utc::now())
            .unwrap();
        let copy = done.duplicate(Utc::now());

        assert_ne!(copy.id, done.id);
        assert!(!copy.completed);
        assert!(!copy.invoiced);
        assert!(!copy.is_quotation);
        assert!(copy.invoice_number.is_empty());
        assert!(copy.payment_reference.is_empty());
        assert!(copy.comments.contains("#00003"));
        assert_eq!(copy.lines, done.lines);
        assert_eq!(copy.payment_method, done.payment_method);
        assert!(copy.check_invoice_invariant().is_ok());
    }

    #[test]
    fn test_invoice_invariant_detection() {
        let mut sale = two_line_sale();
        sale.invoiced = true; // number still empty
        assert!(matches!(
            sale.check_invoice_invariant(),
            Err(CoreError::InvoiceFlagMismatch(_))
        ));

        sale.invoiced = false;
        sale.invoice_number = "#00001".to_string();
        assert!(sale.check_invoice_invariant().is_err());
    }
}
