use crate::clients::{
    CustomerClient, OrderClient, OrderDependencies, PriceListClient, ProductClient, RingClient,
    SubmissionSettings,
};
use crate::lifecycle::{Clock, SystemClock, SystemConfig};
use crate::notify::{LogNotifier, Notifier};
use crate::order_actor::{InvoiceSequence, OrderContext};
use std::sync::Arc;
use tracing::{error, info};

/// Services the system runs against. Tests swap in a fixed clock and a recording
/// notifier; production keeps the defaults.
#[derive(Clone)]
pub struct Services {
    pub clock: Arc<dyn Clock>,
    pub notifier: Arc<dyn Notifier>,
    /// Continue numbering from here, e.g. seeded with last year's invoices.
    pub invoices: Arc<InvoiceSequence>,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            notifier: Arc::new(LogNotifier),
            invoices: Arc::new(InvoiceSequence::new()),
        }
    }
}

/// The running order system: one actor per resource, wired together.
///
/// # Architecture
///
/// - **Product Actor**: the catalog, keyed by sku
/// - **PriceList Actor**: segment price lists
/// - **Ring Actor**: delivery schedule with stops
/// - **Customer Actor**: customers, keyed by email
/// - **Order Actor**: orders, with the invoice sequence in its context
///
/// [`OrderClient`] holds clones of the other four clients; none of the other actors
/// depend on anything, so shutting down by dropping clients always terminates.
///
/// # Example
///
/// ```ignore
/// let system = FarmSystem::new(SystemConfig::default());
/// let receipt = system.order_client.submit_order(form).await?;
/// system.shutdown().await?;
/// ```
pub struct FarmSystem {
    pub product_client: ProductClient,
    pub price_list_client: PriceListClient,
    pub ring_client: RingClient,
    pub customer_client: CustomerClient,
    pub order_client: OrderClient,
    pub invoices: Arc<InvoiceSequence>,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl FarmSystem {
    /// Starts every actor with the system clock and the logging notifier.
    /// Must be called inside a Tokio runtime.
    pub fn new(config: SystemConfig) -> Self {
        Self::with_services(config, Services::default())
    }

    pub fn with_services(config: SystemConfig, services: Services) -> Self {
        let buffer = config.channel_buffer;

        // 1. Create actors (no dependencies yet)
        let (product_actor, products) = crate::product_actor::new(buffer);
        let (price_list_actor, price_lists) = crate::price_list_actor::new(buffer);
        let (ring_actor, rings) = crate::ring_actor::new(buffer);
        let (customer_actor, customers) = crate::customer_actor::new(buffer);
        let (order_actor, orders) = crate::order_actor::new(buffer);

        let product_client = ProductClient::new(products);
        let price_list_client = PriceListClient::new(price_lists);
        let ring_client = RingClient::new(rings);
        let customer_client = CustomerClient::new(customers);
        let order_client = OrderClient::new(
            orders,
            OrderDependencies {
                products: product_client.clone(),
                price_lists: price_list_client.clone(),
                rings: ring_client.clone(),
                customers: customer_client.clone(),
                notifier: services.notifier,
                clock: services.clock,
                settings: SubmissionSettings::from(&config),
            },
        );

        // 2. Start actors with injected context
        let context = OrderContext {
            invoices: services.invoices.clone(),
            transitions: config.transition_policy,
            vat_rate: config.vat_rate,
        };
        let handles = vec![
            tokio::spawn(product_actor.run(())),
            tokio::spawn(price_list_actor.run(())),
            tokio::spawn(ring_actor.run(())),
            tokio::spawn(customer_actor.run(())),
            tokio::spawn(order_actor.run(context)),
        ];
        info!(?config, "Farm system started");

        Self {
            product_client,
            price_list_client,
            ring_client,
            customer_client,
            order_client,
            invoices: services.invoices,
            handles,
        }
    }

    /// Drops every client, then waits for each actor to drain its queue and stop.
    ///
    /// Clones of the clients held elsewhere keep their actors alive; drop them first.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        // The order client goes first: it holds clones of all the others.
        drop(self.order_client);
        drop(self.customer_client);
        drop(self.ring_client);
        drop(self.price_list_client);
        drop(self.product_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
