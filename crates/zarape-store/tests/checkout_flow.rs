//! End-to-end checkout flow against the in-memory backend: seed the
//! catalog, sell, quote, duplicate, and reload, checking the invoice
//! sequence and the lifecycle invariant at every step.

use std::sync::Arc;

use zarape_core::{sample, Discount, PaymentMethod, Sale, SaleStatus};
use zarape_store::sync::DataSync;
use zarape_store::{CheckoutService, DocumentStore, MemoryStore, StoreError};

async fn seeded_service() -> (Arc<MemoryStore>, CheckoutService, Vec<zarape_core::Product>) {
    let store = Arc::new(MemoryStore::new());
    let service = CheckoutService::new(store.clone() as Arc<dyn DocumentStore>);

    let products = sample::sample_products();
    let customers = sample::sample_customers();
    let sync = DataSync::new(
        service.products().clone(),
        service.customers().clone(),
        service.sales().clone(),
    );
    sync.sync_all(&products, &customers, &[]).await.unwrap();

    (store, service, products)
}

#[tokio::test]
async fn full_register_day() {
    let (_store, service, products) = seeded_service().await;
    let customers = service.customers().list().await.unwrap();

    // Morning: a walk-in buys two sarapes and a discounted tapete.
    let draft = Sale::new(chrono::Utc::now())
        .with_product(&products[0], 2)
        .unwrap()
        .with_product(&products[3], 1)
        .unwrap()
        .with_line_discount(&products[3].id, Discount::from_bps(1000).unwrap())
        .unwrap();
    assert_eq!(draft.subtotal().cents(), 278000);

    let first = service
        .complete_sale(&draft, PaymentMethod::Cash, "")
        .await
        .unwrap();
    assert_eq!(first.invoice_number, "#00001");
    assert_eq!(first.total().cents(), 322480);

    // Midday: a quotation for a hotel order. No invoice number.
    let hotel = customers
        .iter()
        .find(|c| c.notes.contains("hotel"))
        .cloned();
    let quote_draft = Sale::new(chrono::Utc::now())
        .with_product(&products[8], 10)
        .unwrap()
        .with_customer(hotel)
        .unwrap();
    let quotation = service.save_quotation(&quote_draft).await.unwrap();
    assert_eq!(quotation.status(), SaleStatus::Quotation);
    assert!(quotation.invoice_number.is_empty());

    // Afternoon: the quotation never consumed a number.
    let second = service
        .complete_sale(&draft.duplicate(chrono::Utc::now()), PaymentMethod::CreditCard, "AUTH-9")
        .await
        .unwrap();
    assert_eq!(second.invoice_number, "#00002");

    // Evening: duplicate the first sale for a repeat customer.
    let copy = service.duplicate_sale(&first.id).await.unwrap();
    assert_eq!(copy.status(), SaleStatus::Draft);
    assert!(copy.comments.contains("#00001"));

    // The history holds every record, each obeying the invariant.
    let history = service.sales().list().await.unwrap();
    assert_eq!(history.len(), 4);
    for sale in &history {
        sale.check_invoice_invariant().unwrap();
        assert_eq!(sale.invoiced, !sale.invoice_number.is_empty());
    }

    // Stock reflects both completed sales: sarape sold 2 + 2.
    let sarape = service.products().require(&products[0].id).await.unwrap();
    assert_eq!(sarape.stock, 21);
}

#[tokio::test]
async fn invoice_sequence_survives_reload() {
    let (store, service, products) = seeded_service().await;

    let draft = sample::sample_sale(&products, &[]).unwrap();
    let done = service
        .complete_sale(&draft, PaymentMethod::Cash, "")
        .await
        .unwrap();
    assert_eq!(done.invoice_number, "#00001");

    // A second device comes up against the same backend and reseeds.
    let second_device = CheckoutService::new(store.clone() as Arc<dyn DocumentStore>);
    second_device.sales().seed_invoice_counter().await.unwrap();

    let another = sample::sample_sale(&products, &[]).unwrap();
    let done = second_device
        .complete_sale(&another, PaymentMethod::Transfer, "SPEI-3")
        .await
        .unwrap();
    assert_eq!(done.invoice_number, "#00002");
}

#[tokio::test]
async fn completed_sale_survives_comment_edit_only() {
    let (_store, service, products) = seeded_service().await;

    let draft = sample::sample_sale(&products, &sample::sample_customers()).unwrap();
    let customer = draft.customer.clone().unwrap();
    service.customers().save(&customer).await.unwrap();

    let done = service
        .complete_sale(&draft, PaymentMethod::DebitCard, "AUTH-1")
        .await
        .unwrap();

    // Comments may change after completion; the invoice may not.
    let annotated = done.with_comments("entregado el martes");
    service.sales().save(&annotated).await.unwrap();

    let reloaded = service.sales().require(&done.id).await.unwrap();
    assert_eq!(reloaded.comments, "entregado el martes");
    assert_eq!(reloaded.invoice_number, done.invoice_number);

    // Re-completing the reloaded sale is a conflict.
    let err = service
        .complete_sale(&reloaded, PaymentMethod::Cash, "")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Core(_)));
}
