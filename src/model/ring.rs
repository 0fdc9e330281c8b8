//! Delivery rings and their stops.
//!
//! # Actor Framework
//! [`Ring`] implements [`ActorEntity`](crate::framework::ActorEntity) in
//! [`crate::ring_actor::entity`]. A ring owns its stops; stop ids are allocated by the
//! ring and are only meaningful together with the ring id.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Rings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RingId(pub u32);

impl From<u32> for RingId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for RingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ring_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StopId(pub u32);

impl Display for StopId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stop_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RingStatus {
    #[default]
    Open,
    Closed,
    Cancelled,
}

/// How the ring hands goods over: at meeting points or at the customer's door.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryKind {
    #[default]
    Stop,
    Home,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub meeting_point: String,
    pub time_start: Option<NaiveTime>,
    pub time_end: Option<NaiveTime>,
    pub sort_order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopCreate {
    pub name: String,
    #[serde(default)]
    pub meeting_point: String,
    #[serde(default)]
    pub time_start: Option<NaiveTime>,
    #[serde(default)]
    pub time_end: Option<NaiveTime>,
    pub sort_order: u32,
}

/// A scheduled delivery route.
///
/// Stops are kept sorted by `sort_order`, which is unique within the ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub id: RingId,
    pub ring_date: NaiveDate,
    pub driver: String,
    pub visible_from: DateTime<Utc>,
    pub visible_to: DateTime<Utc>,
    pub cutoff_at: DateTime<Utc>,
    pub capacity_orders: Option<u32>,
    pub capacity_kg: Option<Decimal>,
    pub status: RingStatus,
    pub delivery_kind: DeliveryKind,
    pub stops: Vec<Stop>,
    pub next_stop_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingCreate {
    pub ring_date: NaiveDate,
    #[serde(default)]
    pub driver: String,
    pub visible_from: DateTime<Utc>,
    pub visible_to: DateTime<Utc>,
    pub cutoff_at: DateTime<Utc>,
    #[serde(default)]
    pub capacity_orders: Option<u32>,
    #[serde(default)]
    pub capacity_kg: Option<Decimal>,
    #[serde(default)]
    pub delivery_kind: DeliveryKind,
    #[serde(default)]
    pub stops: Vec<StopCreate>,
}

/// Schedule changes. For the capacity fields `Some(None)` removes the limit.
#[derive(Debug, Clone, Default)]
pub struct RingUpdate {
    pub driver: Option<String>,
    pub visible_from: Option<DateTime<Utc>>,
    pub visible_to: Option<DateTime<Utc>>,
    pub cutoff_at: Option<DateTime<Utc>>,
    pub capacity_orders: Option<Option<u32>>,
    pub capacity_kg: Option<Option<Decimal>>,
    pub status: Option<RingStatus>,
}

impl Ring {
    /// Human-readable region: the first stop, or "First – Last" when the ring spans
    /// several places. Empty for a ring without stops.
    pub fn region(&self) -> String {
        match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) if first.name != last.name => {
                format!("{} – {}", first.name, last.name)
            }
            (Some(first), _) => first.name.clone(),
            _ => String::new(),
        }
    }

    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.stops.iter().find(|stop| stop.id == id)
    }

    pub fn is_visible_at(&self, at: DateTime<Utc>) -> bool {
        self.status == RingStatus::Open && self.visible_from <= at && at <= self.visible_to
    }

    /// The cutoff instant itself still accepts orders.
    pub fn is_past_cutoff(&self, at: DateTime<Utc>) -> bool {
        at > self.cutoff_at
    }

    /// True when either configured limit is already reached by the booked load.
    pub fn is_at_capacity(&self, booked_orders: usize, booked_kg: Decimal) -> bool {
        let orders_full = self
            .capacity_orders
            .is_some_and(|limit| booked_orders >= limit as usize);
        let kg_full = self.capacity_kg.is_some_and(|limit| booked_kg >= limit);
        orders_full || kg_full
    }

    pub(crate) fn has_sort_order(&self, sort_order: u32) -> bool {
        self.stops.iter().any(|stop| stop.sort_order == sort_order)
    }

    /// Appends a stop with a fresh id and restores the ordering. The caller checks the
    /// sort order is free.
    pub(crate) fn push_stop(&mut self, params: StopCreate) -> StopId {
        let id = StopId(self.next_stop_id);
        self.next_stop_id += 1;
        self.stops.push(Stop {
            id,
            name: params.name,
            meeting_point: params.meeting_point,
            time_start: params.time_start,
            time_end: params.time_end,
            sort_order: params.sort_order,
        });
        self.stops.sort_by_key(|stop| stop.sort_order);
        id
    }
}
