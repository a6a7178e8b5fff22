//! # Store Error Types
//!
//! Error types for the persistence boundary.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Error Propagation                             │
//! │                                                                     │
//! │  Remote backend failure ──► StoreError::Unavailable (retryable)     │
//! │  Malformed document ───────► DecodeError ──► StoreError::Decode     │
//! │  Business rule violation ──► CoreError ────► StoreError::Core       │
//! │                                                                     │
//! │  The caller sees one typed StoreError and the in-memory sale        │
//! │  snapshot it was holding is unchanged on every failure path.        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use zarape_core::CoreError;

// =============================================================================
// Decode Error
// =============================================================================

/// A remote document that does not decode into a domain value.
///
/// The legacy client substituted defaults for anything malformed, which
/// masked data corruption. Decoding here is strict: every variant names
/// what was wrong so the operator can fix the record instead of silently
/// reading zeros.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// The document body does not match the expected shape (missing or
    /// mistyped fields).
    #[error("malformed {entity} document: {reason}")]
    Malformed {
        entity: &'static str,
        reason: String,
    },

    /// A timestamp field is not RFC 3339.
    #[error("bad timestamp in `{field}`: {value:?}")]
    BadTimestamp { field: &'static str, value: String },

    /// An unknown payment method enum string.
    #[error("unknown payment method {0:?}")]
    UnknownPaymentMethod(String),

    /// A monetary field is negative.
    #[error("negative amount in `{field}`: {value}")]
    NegativeAmount { field: &'static str, value: f64 },

    /// A rate fraction outside `[0, 1]`.
    #[error("rate out of range in `{field}`: {value}")]
    RateOutOfRange { field: &'static str, value: f64 },

    /// A line item that violates the pricing contract (zero or negative
    /// quantity, bad discount).
    #[error("invalid sale line for product {product_id}: {reason}")]
    InvalidLine { product_id: String, reason: String },

    /// The stored flags disagree with the stored invoice number.
    #[error("sale {0} has invoiced flag and invoice number out of sync")]
    InvoiceFlagMismatch(String),
}

// =============================================================================
// Store Error
// =============================================================================

/// Persistence boundary errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A referenced entity is absent from the backend.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The operation contradicts already-persisted state, e.g. saving a
    /// second invoice for the same sale.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Transient backend failure. Nothing was written; retry is safe and
    /// no data was dropped.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// Sign-in rejected or no active session.
    #[error("authentication failed: {0}")]
    Unauthorized(String),

    /// A document failed to decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A business rule rejected the operation before any write.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// True when the caller may simply retry the same call.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::not_found("product", "p-1");
        assert_eq!(err.to_string(), "product not found: p-1");

        let err = DecodeError::UnknownPaymentMethod("BITCOIN".to_string());
        assert_eq!(err.to_string(), "unknown payment method \"BITCOIN\"");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(StoreError::Unavailable("timeout".to_string()).is_retryable());
        assert!(!StoreError::not_found("sale", "v-1").is_retryable());
        assert!(!StoreError::Conflict("already invoiced".to_string()).is_retryable());
    }

    #[test]
    fn test_decode_error_converts() {
        let decode = DecodeError::NegativeAmount {
            field: "precio",
            value: -1.0,
        };
        let store: StoreError = decode.into();
        assert!(matches!(store, StoreError::Decode(_)));
    }
}
