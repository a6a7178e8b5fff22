//! # Catalog Types
//!
//! Products, customers, categories, suppliers, payment methods, and
//! inventory movements.
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4, immutable, used for document references
//! - Business key where one exists: `code` (SKU) for products, which is
//!   human-entered and unique in the catalog
//!
//! ## Snapshot Pattern
//! Anything that ends up inside a historical record (sale line, inventory
//! movement) copies the product fields it needs at the time of the event.
//! Later catalog edits never rewrite history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::{Money, TaxRate};

// =============================================================================
// Product
// =============================================================================

/// A product in the shop catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Human-entered SKU, unique in the catalog.
    pub code: String,

    /// Display name shown in the catalog and on tickets.
    pub name: String,

    /// Optional long description.
    pub description: String,

    /// Unit price before tax.
    pub price: Money,

    /// Current stock level. Goes negative only through an explicit
    /// adjustment, never through ordinary sales bookkeeping.
    pub stock: i64,

    /// Category label (free-form, managed by [`crate::inventory::Inventory`]).
    pub category: String,

    /// When the product entered the catalog.
    pub created_at: DateTime<Utc>,

    /// Tax rate for this product. Defaults to IVA (16%).
    pub tax_rate: TaxRate,

    /// Optional reference to a stored product image.
    pub image_url: Option<String>,
}

impl Product {
    /// Creates a catalog entry with a fresh id and the IVA default rate.
    pub fn new(code: &str, name: &str, price: Money, created_at: DateTime<Utc>) -> Self {
        Product {
            id: Uuid::new_v4().to_string(),
            code: code.to_string(),
            name: name.to_string(),
            description: String::new(),
            price,
            stock: 0,
            category: String::new(),
            created_at,
            tax_rate: TaxRate::default(),
            image_url: None,
        }
    }

    /// Unit price including tax.
    pub fn price_with_tax(&self) -> Money {
        self.price + self.price.calculate_tax(self.tax_rate)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer record. Only the name is required; walk-in sales have no
/// customer at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    /// RFC, the Mexican taxpayer id. Empty for most walk-in customers.
    pub tax_id: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub notes: String,
}

impl Customer {
    /// Creates a customer with a fresh id and empty contact fields.
    pub fn new(name: &str) -> Self {
        Customer {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            tax_id: String::new(),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            notes: String::new(),
        }
    }
}

// =============================================================================
// Category & Supplier
// =============================================================================

/// A product category. Soft-deactivated rather than deleted so existing
/// products keep a valid label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
    pub active: bool,
}

impl Category {
    pub fn new(name: &str, description: &str) -> Self {
        Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.to_string(),
            active: true,
        }
    }
}

/// A merchandise supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub contact: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub tax_id: String,
    pub notes: String,
    pub active: bool,
}

impl Supplier {
    pub fn new(name: &str) -> Self {
        Supplier {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            contact: String::new(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
            tax_id: String::new(),
            notes: String::new(),
            active: true,
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid. Wire names match the remote store's stored enum
/// strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "EFECTIVO")]
    Cash,
    #[serde(rename = "TARJETA_DEBITO")]
    DebitCard,
    #[serde(rename = "TARJETA_CREDITO")]
    CreditCard,
    #[serde(rename = "TRANSFERENCIA")]
    Transfer,
    #[serde(rename = "OTRO")]
    Other,
}

impl PaymentMethod {
    /// The enum string persisted by the remote store.
    pub const fn wire_code(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "EFECTIVO",
            PaymentMethod::DebitCard => "TARJETA_DEBITO",
            PaymentMethod::CreditCard => "TARJETA_CREDITO",
            PaymentMethod::Transfer => "TRANSFERENCIA",
            PaymentMethod::Other => "OTRO",
        }
    }

    /// Parses a wire enum string. Unknown strings are a decode failure
    /// for the caller to surface, never silently mapped to a default.
    pub fn from_wire_code(code: &str) -> Option<Self> {
        match code {
            "EFECTIVO" => Some(PaymentMethod::Cash),
            "TARJETA_DEBITO" => Some(PaymentMethod::DebitCard),
            "TARJETA_CREDITO" => Some(PaymentMethod::CreditCard),
            "TRANSFERENCIA" => Some(PaymentMethod::Transfer),
            "OTRO" => Some(PaymentMethod::Other),
            _ => None,
        }
    }

    /// Human-readable label for tickets.
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Efectivo",
            PaymentMethod::DebitCard => "Tarjeta de débito",
            PaymentMethod::CreditCard => "Tarjeta de crédito",
            PaymentMethod::Transfer => "Transferencia bancaria",
            PaymentMethod::Other => "Otro método",
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

// =============================================================================
// Inventory Movements
// =============================================================================

/// The kind of inventory movement, with its stock effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    /// Goods received from a supplier (stock +).
    #[serde(rename = "ENTRADA")]
    Entry,
    /// Customer return (stock +).
    #[serde(rename = "DEVOLUCION")]
    Return,
    /// Goods leaving outside a sale, e.g. breakage (stock −).
    #[serde(rename = "SALIDA")]
    Out,
    /// Stock sold at the register (stock −).
    #[serde(rename = "VENTA")]
    Sale,
    /// Manual correction: sets the absolute stock level.
    #[serde(rename = "AJUSTE")]
    Adjustment,
}

impl MovementKind {
    /// Applies this movement's effect to a stock level.
    ///
    /// Adjustment is the one kind that may leave stock negative on
    /// purpose; the additive kinds only move it.
    pub const fn apply(&self, stock: i64, quantity: i64) -> i64 {
        match self {
            MovementKind::Entry | MovementKind::Return => stock + quantity,
            MovementKind::Out | MovementKind::Sale => stock - quantity,
            MovementKind::Adjustment => quantity,
        }
    }

    /// The enum string persisted by the remote store.
    pub const fn wire_code(&self) -> &'static str {
        match self {
            MovementKind::Entry => "ENTRADA",
            MovementKind::Return => "DEVOLUCION",
            MovementKind::Out => "SALIDA",
            MovementKind::Sale => "VENTA",
            MovementKind::Adjustment => "AJUSTE",
        }
    }

    /// Parses a wire enum string.
    pub fn from_wire_code(code: &str) -> Option<Self> {
        match code {
            "ENTRADA" => Some(MovementKind::Entry),
            "DEVOLUCION" => Some(MovementKind::Return),
            "SALIDA" => Some(MovementKind::Out),
            "VENTA" => Some(MovementKind::Sale),
            "AJUSTE" => Some(MovementKind::Adjustment),
            _ => None,
        }
    }
}

/// One recorded inventory movement.
///
/// Product fields are snapshotted so the log stays meaningful after the
/// product is edited or retired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryMovement {
    pub id: String,
    pub product_id: String,
    pub product_code: String,
    pub product_name: String,
    pub quantity: i64,
    pub kind: MovementKind,
    pub created_at: DateTime<Utc>,
    /// Unit price for the movement (purchase or sale price), if known.
    pub unit_price: Option<Money>,
    pub comment: String,
    /// Reference document: supplier invoice, order number, sale invoice.
    pub reference_doc: String,
}

impl InventoryMovement {
    /// Creates a movement against a catalog product.
    pub fn new(
        product: &Product,
        kind: MovementKind,
        quantity: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        InventoryMovement {
            id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            product_code: product.code.clone(),
            product_name: product.name.clone(),
            quantity,
            kind,
            created_at,
            unit_price: None,
            comment: String::new(),
            reference_doc: String::new(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_with_tax() {
        let mut product = Product::new("0001", "Sarape Tradicional", Money::from_cents(85000), Utc::now());
        assert_eq!(product.price_with_tax().cents(), 98600); // $850 + 16%

        product.tax_rate = TaxRate::zero();
        assert_eq!(product.price_with_tax().cents(), 85000);
    }

    #[test]
    fn test_payment_method_wire_round_trip() {
        for method in [
            PaymentMethod::Cash,
            PaymentMethod::DebitCard,
            PaymentMethod::CreditCard,
            PaymentMethod::Transfer,
            PaymentMethod::Other,
        ] {
            assert_eq!(PaymentMethod::from_wire_code(method.wire_code()), Some(method));
        }
        assert_eq!(PaymentMethod::from_wire_code("BITCOIN"), None);
    }

    #[test]
    fn test_movement_kind_effects() {
        assert_eq!(MovementKind::Entry.apply(10, 5), 15);
        assert_eq!(MovementKind::Return.apply(10, 2), 12);
        assert_eq!(MovementKind::Out.apply(10, 3), 7);
        assert_eq!(MovementKind::Sale.apply(10, 4), 6);
        // Adjustment sets the absolute level, even below zero.
        assert_eq!(MovementKind::Adjustment.apply(10, -2), -2);
    }

    #[test]
    fn test_movement_kind_wire_round_trip() {
        for kind in [
            MovementKind::Entry,
            MovementKind::Return,
            MovementKind::Out,
            MovementKind::Sale,
            MovementKind::Adjustment,
        ] {
            assert_eq!(MovementKind::from_wire_code(kind.wire_code()), Some(kind));
        }
        assert_eq!(MovementKind::from_wire_code("MERMA"), None);
    }
}
