use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use farm_orders::clients::{
    CustomerClient, OrderClient, OrderDependencies, PriceListClient, ProductClient, RingClient,
    SubmissionSettings,
};
use farm_orders::framework::{mock::MockClient, ActorClient, Upserted};
use farm_orders::lifecycle::FixedClock;
use farm_orders::model::{
    ContactDetails, Customer, CustomerId, DeliveryKind, Order, OrderChannel, OrderStatus,
    OrderSubmission, PaymentMethod, PriceList, PriceListId, Product, ProductId, Ring, RingId,
    RingStatus, Segment, Sku, Stop, StopId, SubmittedLine, Unit,
};
use farm_orders::notify::RecordingNotifier;
use farm_orders::order_actor::{self, InvoiceSequence, OrderContext, OrderError, TransitionPolicy};
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Real Order actor with mocked Product, PriceList, Ring and Customer actors.
///
/// Pattern: Actor + Mocks
/// - Real Order actor (orders are really created and listed)
/// - Mocked reference data, so each test states exactly which lookups a submission makes
struct Harness {
    products: MockClient<Product>,
    price_lists: MockClient<PriceList>,
    rings: MockClient<Ring>,
    customers: MockClient<Customer>,
    notifier: Arc<RecordingNotifier>,
    order_client: OrderClient,
    handle: tokio::task::JoinHandle<()>,
}

fn submitted_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 6, 20, 0, 0).unwrap()
}

fn start() -> Harness {
    let products = MockClient::<Product>::new();
    let price_lists = MockClient::<PriceList>::new();
    let rings = MockClient::<Ring>::new();
    let customers = MockClient::<Customer>::new();
    let notifier = Arc::new(RecordingNotifier::new());

    let (actor, orders) = order_actor::new(16);
    let order_client = OrderClient::new(
        orders,
        OrderDependencies {
            products: ProductClient::new(products.client()),
            price_lists: PriceListClient::new(price_lists.client()),
            rings: RingClient::new(rings.client()),
            customers: CustomerClient::new(customers.client()),
            notifier: notifier.clone(),
            clock: Arc::new(FixedClock::new(submitted_at())),
            settings: SubmissionSettings::default(),
        },
    );
    let handle = tokio::spawn(actor.run(OrderContext {
        invoices: Arc::new(InvoiceSequence::new()),
        transitions: TransitionPolicy::Permissive,
        vat_rate: dec!(0.20),
    }));

    Harness {
        products,
        price_lists,
        rings,
        customers,
        notifier,
        order_client,
        handle,
    }
}

fn ring(status: RingStatus) -> Ring {
    Ring {
        id: RingId(1),
        ring_date: NaiveDate::from_ymd_opt(2025, 10, 8).unwrap(),
        driver: "Mart".into(),
        visible_from: submitted_at() - Duration::days(3),
        visible_to: Utc.with_ymd_and_hms(2025, 10, 6, 23, 59, 0).unwrap(),
        cutoff_at: Utc.with_ymd_and_hms(2025, 10, 6, 23, 59, 0).unwrap(),
        capacity_orders: None,
        capacity_kg: None,
        status,
        delivery_kind: DeliveryKind::Stop,
        stops: vec![Stop {
            id: StopId(1),
            name: "Tartu".into(),
            meeting_point: "Lõunakeskus parking".into(),
            time_start: None,
            time_end: None,
            sort_order: 10,
        }],
        next_stop_id: 2,
    }
}

fn sausages() -> Product {
    Product {
        id: ProductId(4),
        sku: Sku::new("PORK-004"),
        name: "Pork sausages 500 g".into(),
        category: "Pork".into(),
        unit: Unit::Piece,
        catch_weight: false,
        active: true,
    }
}

fn retail_list() -> PriceList {
    PriceList {
        id: PriceListId(1),
        name: "Retail".into(),
        segment: Segment::Retail,
        valid_from: submitted_at() - Duration::days(30),
        valid_to: None,
        items: BTreeMap::from([(Sku::new("PORK-004"), dec!(4.20))]),
    }
}

fn form(sku: &str) -> OrderSubmission {
    OrderSubmission {
        channel: OrderChannel::Web,
        customer: ContactDetails {
            email: "Ann@Example.com".into(),
            name: "Ann Tamm".into(),
            phone: "+372 555 12345".into(),
            terms_accepted: true,
            ..Default::default()
        },
        ring_id: RingId(1),
        stop_id: StopId(1),
        delivery_address: None,
        payment_method: PaymentMethod::Cash,
        notes_customer: String::new(),
        lines: vec![SubmittedLine {
            sku: Sku::new(sku),
            quantity: dec!(1),
            substitution_allowed: false,
        }],
    }
}

#[tokio::test]
async fn submission_resolves_references_then_creates_order() {
    let mut h = start();

    h.rings.expect_get(RingId(1)).return_ok(Some(ring(RingStatus::Open)));
    h.products.expect_list().return_ok(vec![sausages()]);
    h.customers.expect_get_by_key("ann@example.com").return_ok(None);
    h.price_lists.expect_list().return_ok(vec![retail_list()]);
    h.customers.expect_upsert().return_ok(Upserted {
        id: CustomerId(7),
        created: true,
    });

    let receipt = h.order_client.submit_order(form("PORK-004")).await.unwrap();
    assert_eq!(receipt.customer_id, CustomerId(7));
    assert!(!receipt.duplicate);

    let order: Order = h.order_client.get(receipt.order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::New);
    assert_eq!(order.contact_phone, "+37255512345");
    assert_eq!(order.lines.len(), 1);
    assert_eq!(order.lines[0].unit_price, Some(dec!(4.20)));
    assert_eq!(order.lines[0].product_name, "Pork sausages 500 g");

    let sent = h
        .notifier
        .wait_for_confirmations(1, std::time::Duration::from_secs(1))
        .await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].customer_email, "ann@example.com");
    assert_eq!(sent[0].estimated_total, dec!(4.20));

    h.products.verify();
    h.price_lists.verify();
    h.rings.verify();
    h.customers.verify();

    drop(h.order_client);
    h.handle.await.unwrap();
}

#[tokio::test]
async fn closed_ring_rejects_before_any_other_lookup() {
    let mut h = start();
    h.rings.expect_get(RingId(1)).return_ok(Some(ring(RingStatus::Closed)));

    let err = h.order_client.submit_order(form("PORK-004")).await.unwrap_err();
    assert!(matches!(err, OrderError::RingClosed(RingId(1))), "got {err:?}");

    let orders = h.order_client.list_orders(Default::default()).await.unwrap();
    assert!(orders.is_empty());
    h.rings.verify();
    h.customers.verify();

    drop(h.order_client);
    h.handle.await.unwrap();
}

#[tokio::test]
async fn unknown_sku_fails_without_touching_customers() {
    let mut h = start();
    h.rings.expect_get(RingId(1)).return_ok(Some(ring(RingStatus::Open)));
    h.products.expect_list().return_ok(vec![sausages()]);

    let err = h.order_client.submit_order(form("LAMB-999")).await.unwrap_err();
    assert!(
        matches!(&err, OrderError::ProductNotFound(sku) if sku.as_str() == "LAMB-999"),
        "got {err:?}"
    );
    h.products.verify();
    h.customers.verify();

    drop(h.order_client);
    h.handle.await.unwrap();
}

#[tokio::test]
async fn missing_ring_is_reported_by_id() {
    let mut h = start();
    h.rings.expect_get(RingId(1)).return_ok(None);

    let err = h.order_client.submit_order(form("PORK-004")).await.unwrap_err();
    assert!(matches!(err, OrderError::RingNotFound(RingId(1))), "got {err:?}");
    h.rings.verify();

    drop(h.order_client);
    h.handle.await.unwrap();
}
