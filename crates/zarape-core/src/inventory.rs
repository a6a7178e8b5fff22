//! # Inventory
//!
//! In-memory catalog bookkeeping: products, categories, suppliers, and
//! the movement log that drives stock levels.
//!
//! Movements are the only sanctioned way stock changes. Each movement is
//! appended to the log and its effect applied to the product, so the log
//! replays to the current stock level.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::types::{Category, InventoryMovement, MovementKind, Product, Supplier};
use crate::LOW_STOCK_THRESHOLD;

/// The shop's catalog and movement log.
#[derive(Debug, Default)]
pub struct Inventory {
    products: Vec<Product>,
    categories: Vec<Category>,
    suppliers: Vec<Supplier>,
    movements: Vec<InventoryMovement>,
}

impl Inventory {
    pub fn new() -> Self {
        Inventory::default()
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    pub fn add_product(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Replaces the product with the same id.
    pub fn update_product(&mut self, product: Product) -> CoreResult<()> {
        let slot = self
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| CoreError::ProductNotFound(product.id.clone()))?;
        *slot = product;
        Ok(())
    }

    /// Removes a product from the catalog. Historical sales keep their
    /// frozen copies, so this never rewrites history.
    pub fn remove_product(&mut self, id: &str) -> CoreResult<()> {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        if self.products.len() == before {
            return Err(CoreError::ProductNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Looks up a product by its human-entered SKU (barcode scans, manual
    /// entry).
    pub fn find_by_code(&self, code: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.code == code)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn products_in_category(&self, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Products at or below the restock threshold.
    pub fn low_stock(&self, threshold: Option<i64>) -> Vec<&Product> {
        let threshold = threshold.unwrap_or(LOW_STOCK_THRESHOLD);
        self.products
            .iter()
            .filter(|p| p.stock <= threshold)
            .collect()
    }

    // -------------------------------------------------------------------------
    // Categories & Suppliers
    // -------------------------------------------------------------------------

    pub fn add_category(&mut self, category: Category) {
        self.categories.push(category);
    }

    /// Active categories only; deactivated ones stay for history.
    pub fn categories(&self) -> Vec<&Category> {
        self.categories.iter().filter(|c| c.active).collect()
    }

    pub fn deactivate_category(&mut self, id: &str) {
        if let Some(category) = self.categories.iter_mut().find(|c| c.id == id) {
            category.active = false;
        }
    }

    pub fn add_supplier(&mut self, supplier: Supplier) {
        self.suppliers.push(supplier);
    }

    pub fn suppliers(&self) -> Vec<&Supplier> {
        self.suppliers.iter().filter(|s| s.active).collect()
    }

    pub fn deactivate_supplier(&mut self, id: &str) {
        if let Some(supplier) = self.suppliers.iter_mut().find(|s| s.id == id) {
            supplier.active = false;
        }
    }

    // -------------------------------------------------------------------------
    // Movements
    // -------------------------------------------------------------------------

    /// Records a movement and applies its stock effect to the product.
    pub fn record_movement(&mut self, movement: InventoryMovement) -> CoreResult<()> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == movement.product_id)
            .ok_or_else(|| CoreError::ProductNotFound(movement.product_id.clone()))?;

        product.stock = movement.kind.apply(product.stock, movement.quantity);
        self.movements.push(movement);
        Ok(())
    }

    /// Convenience for the register: records a VENTA movement for each
    /// quantity sold.
    pub fn record_sale_movement(
        &mut self,
        product_id: &str,
        quantity: i64,
        invoice_number: &str,
        at: DateTime<Utc>,
    ) -> CoreResult<()> {
        let product = self
            .find_by_id(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        let mut movement = InventoryMovement::new(product, MovementKind::Sale, quantity, at);
        movement.reference_doc = invoice_number.to_string();
        self.record_movement(movement)
    }

    pub fn movements(&self) -> &[InventoryMovement] {
        &self.movements
    }

    pub fn movements_for_product(&self, product_id: &str) -> Vec<&InventoryMovement> {
        self.movements
            .iter()
            .filter(|m| m.product_id == product_id)
            .collect()
    }

    pub fn movements_of_kind(&self, kind: MovementKind) -> Vec<&InventoryMovement> {
        self.movements.iter().filter(|m| m.kind == kind).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn inventory_with(stock: i64) -> (Inventory, String) {
        let mut product = Product::new("0001", "Sarape Tradicional", Money::from_cents(85000), Utc::now());
        product.stock = stock;
        let id = product.id.clone();

        let mut inventory = Inventory::new();
        inventory.add_product(product);
        (inventory, id)
    }

    #[test]
    fn test_movement_updates_stock() {
        let (mut inventory, id) = inventory_with(10);
        let product = inventory.find_by_id(&id).unwrap().clone();

        inventory
            .record_movement(InventoryMovement::new(
                &product,
                MovementKind::Entry,
                5,
                Utc::now(),
            ))
            .unwrap();
        assert_eq!(inventory.find_by_id(&id).unwrap().stock, 15);

        inventory
            .record_sale_movement(&id, 2, "#00001", Utc::now())
            .unwrap();
        assert_eq!(inventory.find_by_id(&id).unwrap().stock, 13);
        assert_eq!(inventory.movements().len(), 2);
        assert_eq!(inventory.movements()[1].reference_doc, "#00001");
    }

    #[test]
    fn test_adjustment_sets_absolute_level() {
        let (mut inventory, id) = inventory_with(10);
        let product = inventory.find_by_id(&id).unwrap().clone();

        inventory
            .record_movement(InventoryMovement::new(
                &product,
                MovementKind::Adjustment,
                -1,
                Utc::now(),
            ))
            .unwrap();
        assert_eq!(inventory.find_by_id(&id).unwrap().stock, -1);
    }

    #[test]
    fn test_movement_against_unknown_product() {
        let (mut inventory, _) = inventory_with(10);
        let result = inventory.record_sale_movement("missing", 1, "#00001", Utc::now());
        assert!(matches!(result, Err(CoreError::ProductNotFound(_))));
        assert!(inventory.movements().is_empty());
    }

    #[test]
    fn test_low_stock_query() {
        let mut inventory = Inventory::new();
        for (code, stock) in [("0001", 2), ("0002", 5), ("0003", 40)] {
            let mut p = Product::new(code, code, Money::from_cents(100), Utc::now());
            p.stock = stock;
            inventory.add_product(p);
        }

        assert_eq!(inventory.low_stock(None).len(), 2);
        assert_eq!(inventory.low_stock(Some(1)).len(), 0);
        assert_eq!(inventory.low_stock(Some(100)).len(), 3);
    }

    #[test]
    fn test_find_by_code_and_category() {
        let mut inventory = Inventory::new();
        let mut p = Product::new("0007", "Bolsa Artesanal", Money::from_cents(52000), Utc::now());
        p.category = "Accesorios".to_string();
        inventory.add_product(p);

        assert!(inventory.find_by_code("0007").is_some());
        assert!(inventory.find_by_code("9999").is_none());
        assert_eq!(inventory.products_in_category("Accesorios").len(), 1);
        assert_eq!(inventory.products_in_category("Ropa").len(), 0);
    }

    #[test]
    fn test_categories_filter_inactive() {
        let mut inventory = Inventory::new();
        let category = Category::new("Sarapes", "Sarapes tradicionales");
        let id = category.id.clone();
        inventory.add_category(category);
        inventory.add_category(Category::new("Rebosos", ""));

        assert_eq!(inventory.categories().len(), 2);
        inventory.deactivate_category(&id);
        assert_eq!(inventory.categories().len(), 1);
    }
}
