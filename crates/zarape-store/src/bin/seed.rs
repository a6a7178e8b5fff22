//! # Seed Data Loader
//!
//! Populates a backend with the sample catalog and walks one sale
//! through the register, printing the resulting ticket.
//!
//! ## Usage
//! ```bash
//! cargo run -p zarape-store --bin seed
//! ```
//!
//! Runs against the in-memory reference backend; point the store
//! construction at the cloud adapter to seed a real project.

use std::sync::Arc;

use zarape_core::sample;
use zarape_core::ticket::{render_ticket, ShopInfo};
use zarape_core::PaymentMethod;
use zarape_store::sync::DataSync;
use zarape_store::{CheckoutService, DocumentStore, MemoryStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("Zarape POS Seed Data Loader");
    println!("===========================");
    println!();

    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    let service = CheckoutService::new(Arc::clone(&store));
    let sync = DataSync::new(
        service.products().clone(),
        service.customers().clone(),
        service.sales().clone(),
    );

    // Push the sample catalog.
    let products = sample::sample_products();
    let customers = sample::sample_customers();
    let report = sync.sync_all(&products, &customers, &[]).await?;
    println!(
        "✓ Seeded {} products, {} customers",
        report.products_pushed, report.customers_pushed
    );

    // Walk one sale through the register.
    let draft = sample::sample_sale(&products, &customers)?;
    println!(
        "✓ Draft sale: {} lines, {} units, total {}",
        draft.lines.len(),
        draft.product_count(),
        draft.total()
    );

    let completed = service
        .complete_sale(&draft, PaymentMethod::Cash, "")
        .await?;
    println!("✓ Completed as invoice {}", completed.invoice_number);

    let remaining = service
        .products()
        .require(&completed.lines[0].product_id)
        .await?;
    println!(
        "✓ Stock written back: {} now at {}",
        remaining.name, remaining.stock
    );

    println!();
    println!("{}", render_ticket(&completed, &ShopInfo::default()));

    Ok(())
}
