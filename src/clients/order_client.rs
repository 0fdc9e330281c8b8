//! # Order Client
//!
//! The order workflows. [`OrderClient::submit_order`] checks a submission against the
//! schedule, the catalog and the price lists before anything is written, then upserts
//! the customer and creates the order. Staff operations (status, packed weights,
//! ad-hoc lines, notes, invoicing) go to the Order actor, which applies them one at a
//! time.
use crate::clients::{CustomerClient, PriceListClient, ProductClient, RingClient};
use crate::customer_actor::CustomerError;
use crate::framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use crate::lifecycle::{Clock, SystemConfig};
use crate::model::{
    ad_hoc_sku, normalize_email, normalize_phone, AdHocLine, DeliveryKind, DeliveryType,
    InvoiceSummary, LineCreate, LineId, Order, OrderCreate, OrderId, OrderLine, OrderStatus,
    OrderSubmission, OrderUpdate, Product, ProductCreate, Ring, RingId, RingStatus, Sku, Stop,
    StopId, SubmissionReceipt,
};
use crate::notify::{ConfirmationLine, InvoiceMessage, Notifier, OrderConfirmation};
use crate::order_actor::{CapacityPolicy, OrderAction, OrderActionResult, OrderError};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn, Instrument};

/// Submission rules taken from [`SystemConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubmissionSettings {
    pub duplicate_window: Duration,
    pub capacity: CapacityPolicy,
}

impl From<&SystemConfig> for SubmissionSettings {
    fn from(config: &SystemConfig) -> Self {
        Self {
            duplicate_window: config.duplicate_window(),
            capacity: config.capacity_policy,
        }
    }
}

impl Default for SubmissionSettings {
    fn default() -> Self {
        Self::from(&SystemConfig::default())
    }
}

/// The other actors and services order workflows read from or notify.
#[derive(Clone)]
pub struct OrderDependencies {
    pub products: ProductClient,
    pub price_lists: PriceListClient,
    pub rings: RingClient,
    pub customers: CustomerClient,
    pub notifier: Arc<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
    pub settings: SubmissionSettings,
}

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    pub(crate) deps: OrderDependencies,
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            other => other
                .into_entity_error::<OrderError>()
                .unwrap_or_else(|e| OrderError::ActorCommunicationError(e.to_string())),
        }
    }
}

impl From<CustomerError> for OrderError {
    fn from(e: CustomerError) -> Self {
        match e {
            CustomerError::Validation(msg) => OrderError::Validation(msg),
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}

/// Failure of another actor while serving an order workflow.
pub(crate) fn upstream(e: impl Display) -> OrderError {
    OrderError::ActorCommunicationError(e.to_string())
}

fn unexpected(result: OrderActionResult) -> OrderError {
    OrderError::ActorCommunicationError(format!("unexpected action result {result:?}"))
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>, deps: OrderDependencies) -> Self {
        Self { inner, deps }
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Validates and stores a customer order.
    ///
    /// Checks run in this order and any failure leaves nothing written: form fields,
    /// ring and stop, ring status, cutoff, capacity, catalog. Then the customer is
    /// upserted by email, the duplicate check runs and the order is created in status
    /// `New`. The confirmation is sent in the background.
    #[instrument(skip(self, submission), fields(ring = %submission.ring_id, stop = %submission.stop_id))]
    pub async fn submit_order(&self, submission: OrderSubmission) -> Result<SubmissionReceipt, OrderError> {
        debug!(?submission, "submit_order called");
        let now = self.deps.clock.now();
        submission.validate().map_err(OrderError::Validation)?;

        let ring = self.ring_for(submission.ring_id).await?;
        let stop = ring
            .stop(submission.stop_id)
            .cloned()
            .ok_or(OrderError::StopNotFound {
                ring: ring.id,
                stop: submission.stop_id,
            })?;
        if ring.status != RingStatus::Open {
            return Err(OrderError::RingClosed(ring.id));
        }
        if ring.is_past_cutoff(now) {
            warn!(cutoff_at = %ring.cutoff_at, %now, "Submission after cutoff");
            return Err(OrderError::CutoffPassed {
                ring: ring.id,
                cutoff_at: ring.cutoff_at,
            });
        }
        self.check_capacity(&ring).await?;

        let skus: Vec<Sku> = submission.lines.iter().map(|line| line.sku.clone()).collect();
        let products = self.catalog_for(&skus).await?;

        let segment = self
            .deps
            .customers
            .find_by_email(&submission.customer.email)
            .await
            .map_err(upstream)?
            .map(|customer| customer.segment)
            .unwrap_or_default();
        let prices = self
            .deps
            .price_lists
            .resolve_prices(&skus, segment, now)
            .await
            .map_err(upstream)?;

        let customer = self
            .deps
            .customers
            .upsert_customer(submission.customer.clone().into())
            .await?;

        let contact_phone = normalize_phone(&submission.customer.phone);
        let duplicate = self
            .is_duplicate(&contact_phone, ring.id, stop.id, now)
            .await?;
        if duplicate {
            warn!(phone = %contact_phone, "Possible duplicate order");
        }

        let (delivery_type, delivery_address) = match ring.delivery_kind {
            DeliveryKind::Home => (
                DeliveryType::Home,
                Some(submission.notes_customer.trim().to_string()).filter(|a| !a.is_empty()),
            ),
            DeliveryKind::Stop => (DeliveryType::Stop, submission.delivery_address.clone()),
        };

        let lines: Vec<LineCreate> = submission
            .lines
            .iter()
            .map(|line| {
                let product = products
                    .get(&line.sku)
                    .ok_or_else(|| OrderError::ProductNotFound(line.sku.clone()))?;
                Ok(LineCreate {
                    sku: line.sku.clone(),
                    product_name: product.name.clone(),
                    unit: product.unit,
                    catch_weight: product.catch_weight,
                    requested_qty: line.quantity,
                    unit_price: prices.get(&line.sku).copied(),
                    substitution_allowed: line.substitution_allowed,
                })
            })
            .collect::<Result<_, OrderError>>()?;

        let params = OrderCreate {
            created_at: now,
            channel: submission.channel,
            customer_id: customer.id,
            contact_phone,
            ring_id: ring.id,
            stop_id: stop.id,
            delivery_type,
            delivery_address,
            payment_method: submission.payment_method,
            notes_customer: submission.notes_customer.clone(),
            lines,
        };
        let order_id = self.inner.create(params).await.map_err(Self::map_error)?;
        info!(%order_id, customer_id = %customer.id, duplicate, "Order submitted");

        if let Some(order) = self.get(order_id).await? {
            self.spawn_confirmation(confirmation(&order, &submission, &ring, &stop));
        }

        Ok(SubmissionReceipt {
            order_id,
            customer_id: customer.id,
            duplicate,
        })
    }

    async fn ring_for(&self, id: RingId) -> Result<Ring, OrderError> {
        self.deps
            .rings
            .get(id)
            .await
            .map_err(upstream)?
            .ok_or(OrderError::RingNotFound(id))
    }

    /// Applies the capacity policy against the non-cancelled orders already booked.
    async fn check_capacity(&self, ring: &Ring) -> Result<(), OrderError> {
        if ring.capacity_orders.is_none() && ring.capacity_kg.is_none() {
            return Ok(());
        }
        let ring_id = ring.id;
        let booked = self
            .list(Filter::new(move |order: &Order| {
                order.ring_id == ring_id && order.status != OrderStatus::Cancelled
            }))
            .await?;
        let booked_kg: Decimal = booked.iter().map(Order::weight_kg).sum();
        if !ring.is_at_capacity(booked.len(), booked_kg) {
            return Ok(());
        }
        match self.deps.settings.capacity {
            CapacityPolicy::Advisory => {
                warn!(ring = %ring.id, orders = booked.len(), kg = %booked_kg, "Ring at capacity");
                Ok(())
            }
            CapacityPolicy::Enforce => Err(OrderError::RingFull(ring.id)),
        }
    }

    /// Active products by sku. Unknown or inactive skus fail the whole submission.
    async fn catalog_for(&self, skus: &[Sku]) -> Result<HashMap<Sku, Product>, OrderError> {
        let products: HashMap<Sku, Product> = self
            .deps
            .products
            .find_many(skus.to_vec())
            .await
            .map_err(upstream)?
            .into_iter()
            .filter(|product| product.active)
            .map(|product| (product.sku.clone(), product))
            .collect();
        match skus.iter().find(|sku| !products.contains_key(*sku)) {
            Some(missing) => Err(OrderError::ProductNotFound(missing.clone())),
            None => Ok(products),
        }
    }

    async fn is_duplicate(
        &self,
        phone: &str,
        ring: RingId,
        stop: StopId,
        now: DateTime<Utc>,
    ) -> Result<bool, OrderError> {
        let since = now - self.deps.settings.duplicate_window;
        let phone = phone.to_string();
        let earlier = self
            .list(Filter::new(move |order: &Order| {
                order.contact_phone == phone
                    && order.ring_id == ring
                    && order.stop_id == stop
                    && order.created_at >= since
            }))
            .await?;
        Ok(!earlier.is_empty())
    }

    fn spawn_confirmation(&self, message: OrderConfirmation) {
        let notifier = self.deps.notifier.clone();
        tokio::spawn(
            async move {
                if let Err(e) = notifier.send_confirmation(&message).await {
                    warn!(order_id = %message.order_id, error = %e, "Confirmation not sent");
                }
            }
            .in_current_span(),
        );
    }

    // =========================================================================
    // Staff operations
    // =========================================================================

    /// Changes the status, subject to the configured transition policy.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, OrderError> {
        self.update_order(
            id,
            OrderUpdate {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn update_notes(&self, id: OrderId, notes_internal: String) -> Result<Order, OrderError> {
        self.update_order(
            id,
            OrderUpdate {
                notes_internal: Some(notes_internal),
                ..Default::default()
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn update_order(&self, id: OrderId, update: OrderUpdate) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Records the packed weight of a catch-weight line. Returns the updated line.
    #[instrument(skip(self))]
    pub async fn record_packed_weight(
        &self,
        id: OrderId,
        line: LineId,
        weight: Decimal,
    ) -> Result<OrderLine, OrderError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, OrderAction::RecordPackedWeight { line, weight })
            .await
            .map_err(Self::map_error)?
        {
            OrderActionResult::RecordPackedWeight(line) => Ok(line),
            other => Err(unexpected(other)),
        }
    }

    /// Adds a staff-entered line at an explicit price.
    ///
    /// A known sku snapshots the catalog product. Anything else is booked under an
    /// `ADHOC-` sku whose inactive catalog entry is created on first use, so it never
    /// shows up in the shop.
    #[instrument(skip(self))]
    pub async fn add_ad_hoc_line(&self, id: OrderId, line: AdHocLine) -> Result<LineId, OrderError> {
        if line.quantity <= Decimal::ZERO {
            return Err(OrderError::Validation("quantity must be positive".into()));
        }
        if line.unit_price.is_sign_negative() {
            return Err(OrderError::Validation("price must not be negative".into()));
        }
        let known = match &line.sku {
            Some(sku) => self.deps.products.find_by_sku(sku).await.map_err(upstream)?,
            None => None,
        };
        let product = match known {
            Some(product) => product,
            None => self.ad_hoc_product(&line).await?,
        };

        let params = LineCreate {
            sku: product.sku,
            product_name: product.name,
            unit: product.unit,
            catch_weight: product.catch_weight,
            requested_qty: line.quantity,
            unit_price: Some(line.unit_price),
            substitution_allowed: false,
        };
        match self
            .inner
            .perform_action(id, OrderAction::AddLine(params))
            .await
            .map_err(Self::map_error)?
        {
            OrderActionResult::AddLine(line_id) => Ok(line_id),
            other => Err(unexpected(other)),
        }
    }

    async fn ad_hoc_product(&self, line: &AdHocLine) -> Result<Product, OrderError> {
        if line.name.trim().is_empty() {
            return Err(OrderError::Validation("ad-hoc lines need a name".into()));
        }
        let sku = ad_hoc_sku(&line.name);
        if let Some(existing) = self.deps.products.find_by_sku(&sku).await.map_err(upstream)? {
            return Ok(existing);
        }
        let params = ProductCreate {
            sku: sku.clone(),
            name: line.name.trim().to_string(),
            category: "Ad hoc".to_string(),
            unit: line.unit,
            catch_weight: line.catch_weight,
            active: false,
        };
        self.deps
            .products
            .upsert_product(params)
            .await
            .map_err(upstream)?;
        info!(%sku, "Ad-hoc product created");
        self.deps
            .products
            .find_by_sku(&sku)
            .await
            .map_err(upstream)?
            .ok_or(OrderError::ProductNotFound(sku))
    }

    // =========================================================================
    // Invoicing
    // =========================================================================

    /// Assigns the next invoice number, marks the order `Invoiced` and sends the
    /// invoice. A failed delivery is logged; the invoice stands.
    #[instrument(skip(self))]
    pub async fn issue_invoice(&self, id: OrderId) -> Result<InvoiceSummary, OrderError> {
        let at = self.deps.clock.now();
        let summary = match self
            .inner
            .perform_action(id, OrderAction::Invoice { at })
            .await
            .map_err(Self::map_error)?
        {
            OrderActionResult::Invoice(summary) => summary,
            other => return Err(unexpected(other)),
        };
        info!(number = %summary.number, total = %summary.total, "Invoice issued");
        if let Err(e) = self.deliver_invoice(&summary).await {
            warn!(number = %summary.number, error = %e, "Invoice not sent");
        }
        Ok(summary)
    }

    async fn deliver_invoice(&self, summary: &InvoiceSummary) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let order = self
            .get(summary.order_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(summary.order_id.to_string()))?;
        let customer = self
            .deps
            .customers
            .get(order.customer_id)
            .await?
            .ok_or_else(|| CustomerError::NotFound(order.customer_id.to_string()))?;
        let message = InvoiceMessage {
            customer_email: customer.email,
            customer_name: customer.name,
            org_name: customer.org_name,
            reg_code: customer.reg_code,
            payment_method: order.payment_method,
            invoice: summary.clone(),
        };
        self.deps.notifier.send_invoice(&message).await?;
        Ok(())
    }
}

fn confirmation(order: &Order, submission: &OrderSubmission, ring: &Ring, stop: &Stop) -> OrderConfirmation {
    OrderConfirmation {
        order_id: order.id,
        customer_email: normalize_email(&submission.customer.email),
        customer_name: submission.customer.name.trim().to_string(),
        ring_date: ring.ring_date,
        region: ring.region(),
        stop_name: stop.name.clone(),
        meeting_point: stop.meeting_point.clone(),
        time_start: stop.time_start,
        delivery_type: order.delivery_type,
        delivery_address: order.delivery_address.clone(),
        payment_method: order.payment_method,
        lines: order
            .lines
            .iter()
            .map(|line| ConfirmationLine {
                sku: line.sku.clone(),
                name: line.product_name.clone(),
                unit: line.unit,
                quantity: line.requested_qty,
                unit_price: line.unit_price,
                substitution_allowed: line.substitution_allowed,
            })
            .collect(),
        estimated_total: order.total(),
        has_unpriced_lines: order.has_unpriced_lines(),
    }
}
