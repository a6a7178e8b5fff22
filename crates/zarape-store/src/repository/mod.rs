//! # Repositories
//!
//! Typed access to each collection. A repository owns the document
//! mapping for its entity and the queries the screens actually run;
//! everything goes through the [`crate::store::DocumentStore`] seam.

pub mod customer;
pub mod product;
pub mod sale;
