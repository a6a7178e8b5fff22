//! # Document Store
//!
//! The seam between the engine and the remote document store.
//!
//! ## Why a Trait?
//! The shop's data lives in a cloud document store reached over the
//! network. Every call here is async and can fail transiently, so the
//! boundary is an object-safe trait: production wires in the cloud SDK
//! adapter, tests and the demo wire in [`MemoryStore`]. The repositories
//! above never know which one they got.
//!
//! ## Query Surface
//! Deliberately small, matching what the backend actually offers:
//! - get / put / delete / list by collection
//! - equality queries on a single field
//! - prefix-range queries on a single string field (how the backend does
//!   case-insensitive name search over `nombreLower`)
//! - atomic counters, the seam the invoice allocator relies on
//!
//! ## Counters
//! `increment` must be atomic on the backend (a transaction, not a read
//! followed by a write). Two registers asking for an invoice number at
//! the same moment must get different values.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, RwLock};

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Collection Names
// =============================================================================

/// The `productos` collection.
pub const PRODUCTS: &str = "productos";
/// The `clientes` collection.
pub const CUSTOMERS: &str = "clientes";
/// The `ventas` collection.
pub const SALES: &str = "ventas";

/// The backend-owned invoice counter.
pub const INVOICE_COUNTER: &str = "numeroFactura";

// =============================================================================
// DocumentStore Trait
// =============================================================================

/// Async access to the remote document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches one document by id.
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>>;

    /// Writes one document, replacing any existing one with the same id.
    async fn put(&self, collection: &str, id: &str, document: Value) -> StoreResult<()>;

    /// Deletes one document. Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// Lists every document in a collection.
    async fn list(&self, collection: &str) -> StoreResult<Vec<Value>>;

    /// Documents whose `field` equals `value`.
    async fn query_eq(&self, collection: &str, field: &str, value: &Value)
        -> StoreResult<Vec<Value>>;

    /// Documents whose string `field` starts with `prefix`.
    async fn query_prefix(
        &self,
        collection: &str,
        field: &str,
        prefix: &str,
    ) -> StoreResult<Vec<Value>>;

    /// Atomically adds `by` to a named counter and returns the new value.
    /// Missing counters start at zero.
    async fn increment(&self, counter: &str, by: i64) -> StoreResult<i64>;

    /// Reads a counter without changing it.
    async fn read_counter(&self, counter: &str) -> StoreResult<i64>;

    /// Overwrites a counter. Used once, at seed time.
    async fn write_counter(&self, counter: &str, value: i64) -> StoreResult<()>;
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// The in-memory reference backend.
///
/// Used by tests and the seed binary. Documents are kept per-collection
/// in id order; counters live behind one mutex so increments are atomic
/// exactly like the backend transaction they stand in for.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Value>>>,
    counters: Mutex<HashMap<String, i64>>,
    fail_next: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Makes the next store call fail with [`StoreError::Unavailable`].
    /// Tests use this to prove callers leave state unchanged on backend
    /// failure.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    fn check_availability(&self) -> StoreResult<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "injected backend failure".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        self.check_availability()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn put(&self, collection: &str, id: &str, document: Value) -> StoreResult<()> {
        self.check_availability()?;
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.check_availability()?;
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<Value>> {
        self.check_availability()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Value>> {
        self.check_availability()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| doc.get(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn query_prefix(
        &self,
        collection: &str,
        field: &str,
        prefix: &str,
    ) -> StoreResult<Vec<Value>> {
        self.check_availability()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| {
                        doc.get(field)
                            .and_then(Value::as_str)
                            .map(|s| s.starts_with(prefix))
                            .unwrap_or(false)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn increment(&self, counter: &str, by: i64) -> StoreResult<i64> {
        self.check_availability()?;
        let mut counters = self.counters.lock().await;
        let slot = counters.entry(counter.to_string()).or_insert(0);
        *slot += by;
        Ok(*slot)
    }

    async fn read_counter(&self, counter: &str) -> StoreResult<i64> {
        self.check_availability()?;
        let counters = self.counters.lock().await;
        Ok(counters.get(counter).copied().unwrap_or(0))
    }

    async fn write_counter(&self, counter: &str, value: i64) -> StoreResult<()> {
        self.check_availability()?;
        let mut counters = self.counters.lock().await;
        counters.insert(counter.to_string(), value);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
