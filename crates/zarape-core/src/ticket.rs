//! # Ticket Rendering
//!
//! Renders a sale into the plain-text lines of a register ticket. The
//! PDF/printer wrapper and the email sender both consume this text; the
//! engine only supplies totals and line-item text, never drawing or
//! export.
//!
//! Layout mirrors the shop's printed ticket: header, sale data, one row
//! per line item, totals block, payment block, courtesy footer.

use crate::sale::Sale;

/// The width of the quantity / description / amount columns.
const NAME_WIDTH: usize = 25;

/// Shop identity printed in the ticket header.
#[derive(Debug, Clone)]
pub struct ShopInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub tax_id: String,
}

impl Default for ShopInfo {
    fn default() -> Self {
        ShopInfo {
            name: "ZARAPE IMPORTS".to_string(),
            address: "Av. Revolución 1234, CDMX".to_string(),
            phone: "Tel: 55-1234-5678".to_string(),
            tax_id: "RFC: ZAIM123456ABC".to_string(),
        }
    }
}

/// Renders the full ticket text for a sale.
pub fn render_ticket(sale: &Sale, shop: &ShopInfo) -> String {
    let mut out = Vec::new();

    // Header
    out.push(shop.name.clone());
    out.push(shop.address.clone());
    out.push(shop.phone.clone());
    out.push(shop.tax_id.clone());
    out.push(separator());

    // Sale data
    out.push("TICKET DE VENTA".to_string());
    out.push(format!("Fecha: {}", sale.timestamp.format("%d/%m/%Y %H:%M")));
    if !sale.invoice_number.is_empty() {
        out.push(format!("Factura: {}", sale.invoice_number));
    }
    out.push(format!("Folio: {}", folio(sale)));
    match &sale.customer {
        Some(customer) => {
            out.push(format!("Cliente: {}", customer.name));
            if !customer.tax_id.is_empty() {
                out.push(format!("RFC: {}", customer.tax_id));
            }
        }
        None => out.push("Cliente: Público en general".to_string()),
    }
    out.push(separator());

    // Line items
    out.push(format!(
        "{:>4}  {:<width$}  {:>10}  {:>5}  {:>10}",
        "CANT",
        "DESCRIPCIÓN",
        "P.UNIT",
        "DESC",
        "IMPORTE",
        width = NAME_WIDTH
    ));
    for line in &sale.lines {
        out.push(format!(
            "{:>4}  {:<width$}  {:>10}  {:>5}  {:>10}",
            line.quantity,
            truncate_name(&line.product_name),
            line.unit_price.to_string(),
            line.discount.to_string(),
            line.subtotal().to_string(),
            width = NAME_WIDTH
        ));
    }
    out.push(separator());

    // Totals
    out.push(format!("{:>48}  {:>10}", "Subtotal:", sale.subtotal().to_string()));
    out.push(format!("{:>48}  {:>10}", "IVA:", sale.tax().to_string()));
    out.push(format!("{:>48}  {:>10}", "TOTAL:", sale.total().to_string()));
    out.push(String::new());

    // Payment
    out.push(format!("Forma de pago: {}", sale.payment_method.label()));
    if !sale.payment_reference.is_empty() {
        out.push(format!("Referencia: {}", sale.payment_reference));
    }

    // Footer
    out.push(String::new());
    out.push("*** GRACIAS POR SU COMPRA ***".to_string());
    out.push("Este documento es un comprobante de pago, no fiscal.".to_string());
    out.push("Conserve su ticket para cualquier aclaración.".to_string());

    out.join("\n")
}

/// The short folio printed on tickets: the first 8 characters of the
/// sale id.
fn folio(sale: &Sale) -> String {
    sale.id.chars().take(8).collect()
}

fn truncate_name(name: &str) -> String {
    if name.chars().count() <= NAME_WIDTH {
        return name.to_string();
    }
    let head: String = name.chars().take(NAME_WIDTH - 3).collect();
    format!("{head}...")
}

fn separator() -> String {
    "-".repeat(60)
}

// =============================================================================
// Unit Tests
// =============================================================================
