//! # zarape-core: Pure Business Logic for Zarape POS
//!
//! This crate is the heart of the Zarape Imports point of sale. It holds
//! every business rule as pure functions and value types, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Zarape POS Architecture                        │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐    │
//! │  │                    Mobile Front-End                         │    │
//! │  │   Catalog UI ──► Sale UI ──► Payment UI ──► Ticket UI       │    │
//! │  └────────────────────────────┬────────────────────────────────┘    │
//! │                               │                                     │
//! │  ┌────────────────────────────▼────────────────────────────────┐    │
//! │  │               ★ zarape-core (THIS CRATE) ★                  │    │
//! │  │                                                             │    │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐           │    │
//! │  │  │  money  │ │  sale   │ │ invoice │ │inventory │           │    │
//! │  │  │  Money  │ │  Sale   │ │ #00001  │ │ stock &  │           │    │
//! │  │  │ TaxRate │ │SaleLine │ │sequence │ │movements │           │    │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └──────────┘           │    │
//! │  │                                                             │    │
//! │  │  NO I/O • NO DOCUMENT STORE • NO NETWORK • PURE FUNCTIONS   │    │
//! │  └────────────────────────────┬────────────────────────────────┘    │
//! │                               │                                     │
//! │  ┌────────────────────────────▼────────────────────────────────┐    │
//! │  │              zarape-store (persistence boundary)            │    │
//! │  │        Wire documents, repositories, checkout, sync         │    │
//! │  └─────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - Catalog types (Product, Customer, movements, payment methods)
//! - [`sale`] - Sale, line items, pricing, and the sale lifecycle
//! - [`invoice`] - Sequential invoice numbering
//! - [`inventory`] - In-memory catalog and stock movement bookkeeping
//! - [`history`] - Sale history filtering
//! - [`ticket`] - Plain-text ticket rendering for the printer/PDF wrapper
//! - [`validation`] - Input validation rules
//! - [`error`] - Domain error types
//! - [`sample`] - Example catalog used for seeding and tests
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output; totals are always
//!    recomputed from the current line items, never cached.
//! 2. **Integer Money**: all monetary values are centavos (i64), all rates
//!    are basis points.
//! 3. **Snapshot Updates**: a [`sale::Sale`] is edited by producing a new
//!    immutable snapshot, so a half-applied update can never be observed.
//! 4. **Explicit Errors**: all failures are typed, never strings or panics.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod history;
pub mod inventory;
pub mod invoice;
pub mod money;
pub mod sale;
pub mod sample;
pub mod ticket;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use zarape_core::Money` instead of
// `use zarape_core::money::Money`.

pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::InvoiceSequence;
pub use money::{Discount, Money, TaxRate};
pub use sale::{Sale, SaleLine, SaleStatus};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct line items allowed on a single sale.
///
/// Prevents runaway carts and keeps ticket rendering bounded.
pub const MAX_SALE_LINES: usize = 100;

/// Maximum quantity of a single line item.
///
/// Guards against fat-finger entry (typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Stock level at or below which a product is reported as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 5;
