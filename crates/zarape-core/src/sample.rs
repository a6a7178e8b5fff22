//! # Sample Data
//!
//! The example catalog used to seed a fresh backend and to drive tests
//! and the demo binary. Mirrors the shop's starter inventory.

use chrono::Utc;

use crate::error::CoreResult;
use crate::money::{Discount, Money, TaxRate};
use crate::sale::Sale;
use crate::types::{Category, Customer, Product, Supplier};

/// The ten-product starter catalog.
pub fn sample_products() -> Vec<Product> {
    let entries: [(&str, &str, &str, i64, i64, &str); 10] = [
        (
            "0001",
            "Sarape Tradicional",
            "Sarape tradicional mexicano en colores vivos",
            85000,
            25,
            "Sarapes",
        ),
        (
            "0002",
            "Reboso Artesanal",
            "Reboso artesanal tejido a mano",
            95000,
            15,
            "Rebosos",
        ),
        (
            "0003",
            "Zarape Infantil",
            "Zarape para niños con diseños coloridos",
            45000,
            30,
            "Infantil",
        ),
        (
            "0004",
            "Tapete Decorativo",
            "Tapete decorativo con motivos tradicionales",
            120000,
            10,
            "Decoración",
        ),
        (
            "0005",
            "Camino de Mesa",
            "Camino de mesa tejido a mano con patrones típicos",
            68000,
            18,
            "Decoración",
        ),
        (
            "0006",
            "Cojín Sarape",
            "Cojín decorativo con tela de sarape",
            32000,
            40,
            "Decoración",
        ),
        (
            "0007",
            "Bolsa Artesanal",
            "Bolsa para dama con diseño de sarape",
            52000,
            22,
            "Accesorios",
        ),
        (
            "0008",
            "Poncho Mexicano",
            "Poncho tradicional para caballero",
            115000,
            12,
            "Ropa",
        ),
        (
            "0009",
            "Manteles Individuales",
            "Set de 4 manteles individuales con motivos étnicos",
            42000,
            15,
            "Comedor",
        ),
        (
            "0010",
            "Sombrero Mexicano",
            "Sombrero tradicional con detalles bordados",
            75000,
            8,
            "Accesorios",
        ),
    ];

    entries
        .into_iter()
        .map(|(code, name, description, price_cents, stock, category)| {
            let mut product = Product::new(code, name, Money::from_cents(price_cents), Utc::now());
            product.description = description.to_string();
            product.stock = stock;
            product.category = category.to_string();
            product.tax_rate = TaxRate::IVA;
            product
        })
        .collect()
}

/// The starter customer list.
pub fn sample_customers() -> Vec<Customer> {
    let entries: [(&str, &str, &str, &str, &str, &str); 5] = [
        (
            "María Fernández",
            "FEMA901210ABC",
            "Av. Revolución 123, CDMX",
            "5555123456",
            "maria@ejemplo.com",
            "Cliente frecuente",
        ),
        (
            "Juan Pérez",
            "PEPJ851115XYZ",
            "Calle Madero 45, Puebla",
            "2222567890",
            "juan@ejemplo.com",
            "",
        ),
        (
            "Ana López",
            "LOAA780620DEF",
            "Av. Juárez 67, Guadalajara",
            "3333456789",
            "ana@ejemplo.com",
            "Prefiere envíos a domicilio",
        ),
        (
            "Roberto González",
            "GORB900825GHI",
            "Calzada Independencia 890, Monterrey",
            "8181234567",
            "roberto@ejemplo.com",
            "",
        ),
        (
            "Sofía Ramírez",
            "RASO870304JKL",
            "Calle 5 de Mayo 42, Oaxaca",
            "9511234567",
            "sofia@ejemplo.com",
            "Compras para hotel",
        ),
    ];

    entries
        .into_iter()
        .map(|(name, tax_id, address, phone, email, notes)| {
            let mut customer = Customer::new(name);
            customer.tax_id = tax_id.to_string();
            customer.address = address.to_string();
            customer.phone = phone.to_string();
            customer.email = email.to_string();
            customer.notes = notes.to_string();
            customer
        })
        .collect()
}

/// The starter category list.
pub fn sample_categories() -> Vec<Category> {
    [
        ("Sarapes", "Sarapes tradicionales de diferentes tamaños"),
        ("Rebosos", "Rebosos artesanales"),
        ("Infantil", "Productos para niños"),
        ("Decoración", "Artículos decorativos para el hogar"),
        ("Accesorios", "Accesorios personales"),
        ("Ropa", "Ropa tradicional mexicana"),
        ("Comedor", "Artículos para comedor y cocina"),
    ]
    .into_iter()
    .map(|(name, description)| Category::new(name, description))
    .collect()
}

/// The starter supplier list.
pub fn sample_suppliers() -> Vec<Supplier> {
    let entries: [(&str, &str, &str, &str, &str, &str); 3] = [
        (
            "Artesanías del Sur",
            "Pedro Martínez",
            "9511234567",
            "contacto@artesaniassur.com",
            "Av. Oaxaca 123, Oaxaca",
            "ASU160429JK2",
        ),
        (
            "Textiles Mexicanos",
            "Luisa Ramírez",
            "2221987654",
            "ventas@textilesmx.com",
            "Calle Juárez 45, Puebla",
            "TME050810XY3",
        ),
        (
            "Artesanos Unidos",
            "Miguel Ángel López",
            "3335678901",
            "info@artesanosunidos.mx",
            "Av. Hidalgo 78, Guadalajara",
            "AUN090215AB7",
        ),
    ];

    entries
        .into_iter()
        .map(|(name, contact, phone, email, address, tax_id)| {
            let mut supplier = Supplier::new(name);
            supplier.contact = contact.to_string();
            supplier.phone = phone.to_string();
            supplier.email = email.to_string();
            supplier.address = address.to_string();
            supplier.tax_id = tax_id.to_string();
            supplier
        })
        .collect()
}

/// An example draft sale: two sarapes, a discounted tapete, and three
/// bolsas for Ana López.
pub fn sample_sale(products: &[Product], customers: &[Customer]) -> CoreResult<Sale> {
    let sale = Sale::new(Utc::now())
        .with_product(&products[0], 2)?
        .with_product(&products[3], 1)?
        .with_line_discount(&products[3].id, Discount::from_bps(1000)?)?
        .with_product(&products[6], 3)?;
    sale.with_customer(customers.get(2).cloned())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_shape() {
        let products = sample_products();
        assert_eq!(products.len(), 10);
        assert!(products.iter().all(|p| !p.price.is_negative()));
        assert!(products.iter().all(|p| p.tax_rate == TaxRate::IVA));

        // Codes are unique.
        let mut codes: Vec<&str> = products.iter().map(|p| p.code.as_str()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 10);
    }

    #[test]
    fn test_sample_sale_totals() {
        let products = sample_products();
        let customers = sample_customers();
        let sale = sample_sale(&products, &customers).unwrap();

        // 2×$850 + $1200×0.9 + 3×$520 = $4340.00
        assert_eq!(sale.subtotal().cents(), 434000);
        assert_eq!(sale.product_count(), 6);
        assert_eq!(sale.customer.as_ref().unwrap().name, "Ana López");
    }
}
