//! # farm-orders
//!
//! Runs one delivery round end to end against in-memory actors: loads the catalog,
//! publishes a price list and a ring, takes an order, packs it and invoices it.
//!
//! ```bash
//! RUST_LOG=info farm-orders --config farm.json --catalog catalog.json
//! ```

use chrono::{Duration, Utc};
use clap::Parser;
use farm_orders::clients::OrderQuery;
use farm_orders::lifecycle::{setup_tracing, FarmSystem, SystemConfig};
use farm_orders::model::{
    ContactDetails, DeliveryKind, OrderChannel, OrderStatus, OrderSubmission, PaymentMethod,
    PriceListCreate, RingCreate, Segment, Sku, StopCreate, SubmittedLine,
};
use rust_decimal_macros::dec;
use std::path::PathBuf;
use tracing::{info, Instrument};

const DEMO_CATALOG: &str = r#"[
    {"sku": "PORK-004", "name": "Pork sausages 500 g", "category": "Pork", "unit": "TK"},
    {"sku": "PORK-010", "name": "Pork shoulder", "category": "Pork", "unit": "KG", "catch_weight": true},
    {"sku": "BEEF-020", "name": "Beef brisket", "category": "Beef", "unit": "KG", "catch_weight": true}
]"#;

#[derive(Debug, Parser)]
#[command(name = "farm-orders", about = "Runs a delivery round against the order core")]
struct Cli {
    /// JSON file with system settings; defaults apply for missing keys.
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON array of catalog records to load instead of the built-in catalog.
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SystemConfig::load(path).map_err(|e| e.to_string())?,
        None => SystemConfig::default(),
    };
    let catalog = match &cli.catalog {
        Some(path) => std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?,
        None => DEMO_CATALOG.to_string(),
    };

    let system = FarmSystem::new(config);
    let now = Utc::now();

    let report = system
        .product_client
        .sync_catalog_json(&catalog)
        .await
        .map_err(|e| e.to_string())?;
    info!(created = report.created, updated = report.updated, "Catalog loaded");

    system
        .price_list_client
        .create_price_list(PriceListCreate {
            name: "Retail".to_string(),
            segment: Segment::Retail,
            valid_from: now - Duration::days(30),
            valid_to: None,
            items: vec![
                (Sku::new("PORK-004"), dec!(4.20)),
                (Sku::new("PORK-010"), dec!(8.50)),
            ],
        })
        .await
        .map_err(|e| e.to_string())?;

    let ring_id = system
        .ring_client
        .create_ring(RingCreate {
            ring_date: (now + Duration::days(2)).date_naive(),
            driver: "Mart".to_string(),
            visible_from: now - Duration::days(1),
            visible_to: now + Duration::days(1),
            cutoff_at: now + Duration::days(1),
            capacity_orders: Some(40),
            capacity_kg: None,
            delivery_kind: DeliveryKind::Stop,
            stops: vec![
                StopCreate {
                    name: "Tartu".to_string(),
                    meeting_point: "Lõunakeskus parking".to_string(),
                    time_start: None,
                    time_end: None,
                    sort_order: 10,
                },
                StopCreate {
                    name: "Elva".to_string(),
                    meeting_point: "Market square".to_string(),
                    time_start: None,
                    time_end: None,
                    sort_order: 20,
                },
            ],
        })
        .await
        .map_err(|e| e.to_string())?;
    let ring = system
        .ring_client
        .visible_rings(now)
        .await
        .map_err(|e| e.to_string())?
        .into_iter()
        .find(|ring| ring.id == ring_id)
        .ok_or("demo ring is not visible")?;
    let stop = ring.stops.first().ok_or("demo ring has no stops")?.id;
    info!(ring = %ring.id, region = %ring.region(), "Ring published");

    let span = tracing::info_span!("order_processing");
    async {
        let receipt = system
            .order_client
            .submit_order(OrderSubmission {
                channel: OrderChannel::Web,
                customer: ContactDetails {
                    email: "ann@example.com".to_string(),
                    name: "Ann Tamm".to_string(),
                    phone: "+372 5551 2345".to_string(),
                    terms_accepted: true,
                    ..Default::default()
                },
                ring_id,
                stop_id: stop,
                delivery_address: None,
                payment_method: PaymentMethod::Transfer,
                notes_customer: String::new(),
                lines: vec![
                    SubmittedLine {
                        sku: Sku::new("PORK-004"),
                        quantity: dec!(1),
                        substitution_allowed: false,
                    },
                    SubmittedLine {
                        sku: Sku::new("PORK-010"),
                        quantity: dec!(2),
                        substitution_allowed: true,
                    },
                ],
            })
            .await
            .map_err(|e| e.to_string())?;
        let order_id = receipt.order_id;

        let view = system
            .order_client
            .order_view(order_id)
            .await
            .map_err(|e| e.to_string())?
            .ok_or("order vanished")?;
        if let Some(line) = view.order.lines.iter().find(|line| line.catch_weight) {
            system
                .order_client
                .record_packed_weight(order_id, line.id, dec!(1.8))
                .await
                .map_err(|e| e.to_string())?;
        }
        for status in [
            OrderStatus::Accepted,
            OrderStatus::Fulfilling,
            OrderStatus::Ready,
            OrderStatus::OnTheWay,
            OrderStatus::Done,
        ] {
            system
                .order_client
                .update_status(order_id, status)
                .await
                .map_err(|e| e.to_string())?;
        }
        let invoice = system
            .order_client
            .issue_invoice(order_id)
            .await
            .map_err(|e| e.to_string())?;
        info!(number = %invoice.number, subtotal = %invoice.subtotal, total = %invoice.total, "Order settled");
        Ok::<(), String>(())
    }
    .instrument(span)
    .await?;

    let open = system
        .order_client
        .list_orders(OrderQuery {
            open_only: true,
            ..Default::default()
        })
        .await
        .map_err(|e| e.to_string())?;
    info!(open = open.len(), "Open orders after the round");

    system.shutdown().await?;
    info!("Application completed successfully");
    Ok(())
}
