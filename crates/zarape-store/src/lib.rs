//! # zarape-store: Persistence Boundary for Zarape POS
//!
//! Everything that touches the remote document store lives here. The
//! engine in `zarape-core` stays pure; this crate maps its types onto
//! wire documents, routes them through the [`store::DocumentStore`]
//! seam, and orchestrates the multi-step operations (checkout, seeding)
//! that combine the two.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Zarape POS Data Flow                          │
//! │                                                                     │
//! │  Front-end action (cobrar, guardar cotización, duplicar)            │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐    │
//! │  │                  zarape-store (THIS CRATE)                  │    │
//! │  │                                                             │    │
//! │  │  ┌────────────┐   ┌──────────────┐   ┌─────────────────┐   │    │
//! │  │  │  checkout  │──►│ repositories │──►│  DocumentStore  │   │    │
//! │  │  │  service   │   │ product/sale │   │  trait + memory │   │    │
//! │  │  └────────────┘   │  /customer   │   │  reference impl │   │    │
//! │  │                   └──────┬───────┘   └─────────────────┘   │    │
//! │  │                          │                                 │    │
//! │  │                   ┌──────▼───────┐                         │    │
//! │  │                   │  document    │  encode: infallible     │    │
//! │  │                   │  (wire DTOs) │  decode: typed errors   │    │
//! │  │                   └──────────────┘                         │    │
//! │  └─────────────────────────────────────────────────────────────┘    │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Remote document store (productos / clientes / ventas)              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The `DocumentStore` trait and the in-memory backend
//! - [`document`] - Wire DTOs and typed encode/decode
//! - [`repository`] - Typed repositories (product, customer, sale)
//! - [`checkout`] - Sale completion, quotations, duplication
//! - [`auth`] - Opaque session seam over the remote auth service
//! - [`sync`] - Seed/sync routines for a fresh or partial backend
//! - [`error`] - Store error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod checkout;
pub mod document;
pub mod error;
pub mod repository;
pub mod store;
pub mod sync;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::CheckoutService;
pub use error::{DecodeError, StoreError, StoreResult};
pub use store::{DocumentStore, MemoryStore};

pub use repository::customer::CustomerRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
