//! # Error Types
//!
//! Domain-specific error types for zarape-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  zarape-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  zarape-store errors (separate crate)                               │
//! │  ├── StoreError       - Backend/repository failures                 │
//! │  └── DecodeError      - Malformed remote documents                  │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → StoreError → caller            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (id, quantity, etc.)
//! 3. Errors are enum variants, never String
//! 4. Invalid input is rejected before any state changes

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These reject bad user input at the call boundary, before business
/// logic runs or state mutates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A line quantity must be a positive integer.
    #[error("quantity must be positive, got {0}")]
    InvalidQuantity(i64),

    /// A discount must be between 0% and 100%.
    #[error("discount must be between 0% and 100%, got {bps} bps")]
    InvalidDiscount { bps: i64 },

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Monetary value must not be negative.
    #[error("{field} must be non-negative")]
    NegativeAmount { field: &'static str },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    /// Invalid format (bad UUID, bad characters in a code, etc.).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: String,
    },
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations. They are returned to the
/// caller, never panicked; a failed operation leaves the sale editable
/// so the cashier can retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Product cannot be found (removed from catalog, bad id, or a sync
    /// gap between devices).
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// Customer cannot be found.
    #[error("customer not found: {0}")]
    CustomerNotFound(String),

    /// The sale has no line with the given product.
    #[error("sale has no line for product {0}")]
    LineNotFound(String),

    /// A sale with no line items cannot be completed.
    #[error("sale {0} has no line items")]
    EmptySale(String),

    /// Attempt to re-assign an invoice number to an invoiced sale.
    ///
    /// Completed sales keep their invoice number forever; a second
    /// completion is a conflict, not a retry.
    #[error("sale {sale_id} already holds invoice {invoice_number}")]
    AlreadyInvoiced {
        sale_id: String,
        invoice_number: String,
    },

    /// Quotations are never billable and never hold an invoice number.
    #[error("sale {0} is a quotation and cannot be invoiced")]
    QuotationNotInvoiceable(String),

    /// The sale is not in a state that allows the requested operation,
    /// e.g. editing line items on a completed sale.
    #[error("sale {sale_id} is {status}, cannot perform operation")]
    InvalidStatus { sale_id: String, status: String },

    /// The invoiced flag and invoice number disagree. This state must
    /// never be constructed or persisted.
    #[error("sale {0} has invoiced flag and invoice number out of sync")]
    InvoiceFlagMismatch(String),

    /// Sale has exceeded the maximum allowed line items.
    #[error("sale cannot have more than {max} line items")]
    TooManyLines { max: usize },

    /// Line quantity exceeds the maximum allowed.
    #[error("quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
