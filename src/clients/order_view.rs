//! # Order Listing
//!
//! The staff view of orders: each order joined with its customer, ring and stop, plus
//! the computed total. A listing costs three actor round trips regardless of its size.
use crate::clients::order_client::upstream;
use crate::clients::OrderClient;
use crate::framework::{ActorClient, Filter};
use crate::model::{Customer, CustomerId, Order, OrderId, OrderStatus, Ring, RingId, Stop};
use crate::order_actor::OrderError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, instrument};

/// Which orders to list. The default lists everything.
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    pub ring: Option<RingId>,
    pub customer: Option<CustomerId>,
    pub status: Option<OrderStatus>,
    /// Skip orders in a terminal status.
    pub open_only: bool,
}

impl OrderQuery {
    pub fn matches(&self, order: &Order) -> bool {
        self.ring.map_or(true, |ring| order.ring_id == ring)
            && self.customer.map_or(true, |customer| order.customer_id == customer)
            && self.status.map_or(true, |status| order.status == status)
            && !(self.open_only && order.status.is_terminal())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderView {
    pub order: Order,
    /// `None` only if the customer record was removed by maintenance.
    pub customer: Option<Customer>,
    pub ring_date: Option<NaiveDate>,
    pub region: String,
    pub stop: Option<Stop>,
    pub total: Decimal,
    pub has_unpriced_lines: bool,
}

impl OrderClient {
    /// Orders matching `query`, oldest first, with their references resolved.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, query: OrderQuery) -> Result<Vec<OrderView>, OrderError> {
        let orders = self
            .list(Filter::new(move |order: &Order| query.matches(order)))
            .await?;
        debug!(count = orders.len(), "Joining orders");
        self.join(orders).await
    }

    #[instrument(skip(self))]
    pub async fn order_view(&self, id: OrderId) -> Result<Option<OrderView>, OrderError> {
        match self.get(id).await? {
            Some(order) => Ok(self.join(vec![order]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn join(&self, orders: Vec<Order>) -> Result<Vec<OrderView>, OrderError> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }
        let customer_ids: BTreeSet<CustomerId> = orders.iter().map(|o| o.customer_id).collect();
        let ring_ids: BTreeSet<RingId> = orders.iter().map(|o| o.ring_id).collect();

        let customers: HashMap<CustomerId, Customer> = self
            .deps
            .customers
            .list(Filter::new(move |c: &Customer| customer_ids.contains(&c.id)))
            .await
            .map_err(upstream)?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let rings: HashMap<RingId, Ring> = self
            .deps
            .rings
            .list(Filter::new(move |r: &Ring| ring_ids.contains(&r.id)))
            .await
            .map_err(upstream)?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();

        Ok(orders
            .into_iter()
            .map(|order| {
                let ring = rings.get(&order.ring_id);
                OrderView {
                    customer: customers.get(&order.customer_id).cloned(),
                    ring_date: ring.map(|r| r.ring_date),
                    region: ring.map(Ring::region).unwrap_or_default(),
                    stop: ring.and_then(|r| r.stop(order.stop_id)).cloned(),
                    total: order.total(),
                    has_unpriced_lines: order.has_unpriced_lines(),
                    order,
                }
            })
            .collect())
    }
}
