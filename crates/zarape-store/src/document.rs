//! # Wire Documents
//!
//! The DTOs persisted in the remote document store, and the typed
//! conversions between them and the domain types.
//!
//! ## Field Names
//! The store schema predates this codebase and uses Spanish field names
//! (`codigo`, `precio`, `fechaHora`, ...). The DTOs here reproduce them
//! exactly so existing data keeps reading and writing cleanly.
//!
//! ## Unit Conversions
//! The wire format stores decimal pesos and rate fractions; the engine
//! uses centavos and basis points. This module is the only place those
//! conversions happen.
//!
//! ## Strict Decoding
//! Encoding is infallible. Decoding returns a typed [`DecodeError`] for
//! anything malformed: missing fields, negative prices, unknown enum
//! strings, timestamps that do not parse, or flag/number mismatches.
//! Nothing is silently defaulted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use chrono::{DateTime, Utc};
use zarape_core::{Customer, Discount, Money, PaymentMethod, Product, Sale, SaleLine, TaxRate};

use crate::error::DecodeError;

// =============================================================================
// Product Documents
// =============================================================================

/// Wire form of a catalog product (`productos` collection).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDoc {
    pub id: String,
    pub codigo: String,
    pub nombre: String,
    pub descripcion: String,
    /// Unit price in decimal pesos.
    pub precio: f64,
    pub existencias: i64,
    pub categoria: String,
    /// RFC 3339 timestamp.
    pub fecha_creacion: String,
    /// Tax rate as a fraction (`0.16` = 16%).
    pub impuesto: f64,
    #[serde(default)]
    pub imagen_url: Option<String>,
}

impl From<&Product> for ProductDoc {
    fn from(product: &Product) -> Self {
        ProductDoc {
            id: product.id.clone(),
            codigo: product.code.clone(),
            nombre: product.name.clone(),
            descripcion: product.description.clone(),
            precio: product.price.to_pesos(),
            existencias: product.stock,
            categoria: product.category.clone(),
            fecha_creacion: product.created_at.to_rfc3339(),
            impuesto: product.tax_rate.fraction(),
            imagen_url: product.image_url.clone(),
        }
    }
}

/// Encodes a product for the `productos` collection.
pub fn encode_product(product: &Product) -> Value {
    serde_json::to_value(ProductDoc::from(product)).expect("product document serializes")
}

/// Decodes a `productos` document.
pub fn decode_product(value: Value) -> Result<Product, DecodeError> {
    let doc: ProductDoc = serde_json::from_value(value).map_err(|e| DecodeError::Malformed {
        entity: "product",
        reason: e.to_string(),
    })?;

    if doc.precio < 0.0 {
        return Err(DecodeError::NegativeAmount {
            field: "precio",
            value: doc.precio,
        });
    }
    let tax_rate = TaxRate::from_fraction(doc.impuesto).map_err(|_| DecodeError::RateOutOfRange {
        field: "impuesto",
        value: doc.impuesto,
    })?;
    let created_at = parse_timestamp("fechaCreacion", &doc.fecha_creacion)?;

    Ok(Product {
        id: doc.id,
        code: doc.codigo,
        name: doc.nombre,
        description: doc.descripcion,
        price: Money::from_pesos(doc.precio),
        stock: doc.existencias,
        category: doc.categoria,
        created_at,
        tax_rate,
        image_url: doc.imagen_url,
    })
}

// =============================================================================
// Customer Documents
// =============================================================================

/// Wire form of a customer (`clientes` collection).
///
/// `nombreLower` is derived at encode time for case-insensitive prefix
/// queries; decode ignores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDoc {
    pub id: String,
    pub nombre: String,
    #[serde(default)]
    pub nombre_lower: String,
    pub rfc: String,
    pub direccion: String,
    pub telefono: String,
    pub email: String,
    pub notas: String,
}

impl From<&Customer> for CustomerDoc {
    fn from(customer: &Customer) -> Self {
        CustomerDoc {
            id: customer.id.clone(),
            nombre: customer.name.clone(),
            nombre_lower: customer.name.to_lowercase(),
            rfc: customer.tax_id.clone(),
            direccion: customer.address.clone(),
            telefono: customer.phone.clone(),
            email: customer.email.clone(),
            notas: customer.notes.clone(),
        }
    }
}

/// Encodes a customer for the `clientes` collection.
pub fn encode_customer(customer: &Customer) -> Value {
    serde_json::to_value(CustomerDoc::from(customer)).expect("customer document serializes")
}

/// Decodes a `clientes` document.
pub fn decode_customer(value: Value) -> Result<Customer, DecodeError> {
    let doc: CustomerDoc = serde_json::from_value(value).map_err(|e| DecodeError::Malformed {
        entity: "customer",
        reason: e.to_string(),
    })?;

    Ok(Customer {
        id: doc.id,
        name: doc.nombre,
        tax_id: doc.rfc,
        address: doc.direccion,
        phone: doc.telefono,
        email: doc.email,
        notes: doc.notas,
    })
}

// =============================================================================
// Sale Documents
// =============================================================================

/// Wire form of one sale line inside `elementosVenta`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineDoc {
    pub producto_id: String,
    pub producto_codigo: String,
    pub producto_nombre: String,
    /// Frozen unit price in decimal pesos.
    pub producto_precio: f64,
    /// Frozen tax fraction.
    pub producto_impuesto: f64,
    pub cantidad: i64,
    /// Discount fraction (`0.1` = 10%).
    pub descuento: f64,
}

impl From<&SaleLine> for SaleLineDoc {
    fn from(line: &SaleLine) -> Self {
        SaleLineDoc {
            producto_id: line.product_id.clone(),
            producto_codigo: line.product_code.clone(),
            producto_nombre: line.product_name.clone(),
            producto_precio: line.unit_price.to_pesos(),
            producto_impuesto: line.tax_rate.fraction(),
            cantidad: line.quantity,
            descuento: line.discount.fraction(),
        }
    }
}

/// Wire form of a sale (`ventas` collection). The customer is stored by
/// reference (`clienteId`); lines are embedded in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDoc {
    pub id: String,
    /// RFC 3339 timestamp.
    pub fecha_hora: String,
    pub metodo_pago: String,
    #[serde(default)]
    pub cliente_id: Option<String>,
    pub comentarios: String,
    pub completada: bool,
    pub facturada: bool,
    pub referencia_pago: String,
    pub numero_factura: String,
    pub es_cotizacion: bool,
    pub elementos_venta: Vec<SaleLineDoc>,
}

impl From<&Sale> for SaleDoc {
    fn from(sale: &Sale) -> Self {
        SaleDoc {
            id: sale.id.clone(),
            fecha_hora: sale.timestamp.to_rfc3339(),
            metodo_pago: sale.payment_method.wire_code().to_string(),
            cliente_id: sale.customer.as_ref().map(|c| c.id.clone()),
            comentarios: sale.comments.clone(),
            completada: sale.completed,
            facturada: sale.invoiced,
            referencia_pago: sale.payment_reference.clone(),
            numero_factura: sale.invoice_number.clone(),
            es_cotizacion: sale.is_quotation,
            elementos_venta: sale.lines.iter().map(SaleLineDoc::from).collect(),
        }
    }
}

/// Encodes a sale for the `ventas` collection.
pub fn encode_sale(sale: &Sale) -> Value {
    serde_json::to_value(SaleDoc::from(sale)).expect("sale document serializes")
}

/// Decodes a `ventas` document.
///
/// The caller resolves `clienteId` and passes the customer in, since
/// that lookup is a store round-trip this pure function cannot make.
pub fn decode_sale(value: Value, customer: Option<Customer>) -> Result<Sale, DecodeError> {
    let doc: SaleDoc = serde_json::from_value(value).map_err(|e| DecodeError::Malformed {
        entity: "sale",
        reason: e.to_string(),
    })?;

    let timestamp = parse_timestamp("fechaHora", &doc.fecha_hora)?;
    let payment_method = PaymentMethod::from_wire_code(&doc.metodo_pago)
        .ok_or_else(|| DecodeError::UnknownPaymentMethod(doc.metodo_pago.clone()))?;

    let mut lines = Vec::with_capacity(doc.elementos_venta.len());
    for line in &doc.elementos_venta {
        lines.push(decode_sale_line(line)?);
    }

    let sale = Sale {
        id: doc.id,
        lines,
        customer,
        payment_method,
        timestamp,
        comments: doc.comentarios,
        completed: doc.completada,
        invoiced: doc.facturada,
        payment_reference: doc.referencia_pago,
        invoice_number: doc.numero_factura,
        is_quotation: doc.es_cotizacion,
    };

    sale.check_invoice_invariant()
        .map_err(|_| DecodeError::InvoiceFlagMismatch(sale.id.clone()))?;
    Ok(sale)
}

fn decode_sale_line(doc: &SaleLineDoc) -> Result<SaleLine, DecodeError> {
    if doc.producto_precio < 0.0 {
        return Err(DecodeError::NegativeAmount {
            field: "productoPrecio",
            value: doc.producto_precio,
        });
    }
    let tax_rate =
        TaxRate::from_fraction(doc.producto_impuesto).map_err(|_| DecodeError::RateOutOfRange {
            field: "productoImpuesto",
            value: doc.producto_impuesto,
        })?;
    let discount = Discount::from_fraction(doc.descuento).map_err(|e| DecodeError::InvalidLine {
        product_id: doc.producto_id.clone(),
        reason: e.to_string(),
    })?;

    SaleLine::from_parts(
        &doc.producto_id,
        &doc.producto_codigo,
        &doc.producto_nombre,
        Money::from_pesos(doc.producto_precio),
        tax_rate,
        doc.cantidad,
        discount,
    )
    .map_err(|e| DecodeError::InvalidLine {
        product_id: doc.producto_id.clone(),
        reason: e.to_string(),
    })
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, DecodeError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DecodeError::BadTimestamp {
            field,
            value: value.to_string(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================
