//! Entity trait implementation for the Ring domain type.
//!
//! Schedule invariants enforced here:
//! - `visible_from <= visible_to`
//! - stop sort orders are unique within a ring
//! - capacity limits, when set, are positive

use super::actions::{RingAction, RingActionResult};
use crate::framework::ActorEntity;
use crate::model::{Ring, RingCreate, RingId, RingStatus, RingUpdate};
use crate::ring_actor::RingError;
use async_trait::async_trait;

impl Ring {
    fn check_schedule(&self) -> Result<(), RingError> {
        if self.visible_to < self.visible_from {
            return Err(RingError::Validation(format!(
                "visible_to {} is before visible_from {}",
                self.visible_to, self.visible_from
            )));
        }
        if self.capacity_orders == Some(0) {
            return Err(RingError::Validation("capacity_orders must be positive".into()));
        }
        if self.capacity_kg.is_some_and(|kg| kg <= rust_decimal::Decimal::ZERO) {
            return Err(RingError::Validation("capacity_kg must be positive".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ActorEntity for Ring {
    type Id = RingId;
    type Create = RingCreate;
    type Update = RingUpdate;
    type Action = RingAction;
    type ActionResult = RingActionResult;
    type Context = ();
    type Error = RingError;

    fn from_create_params(id: RingId, params: RingCreate) -> Result<Self, Self::Error> {
        let mut ring = Self {
            id,
            ring_date: params.ring_date,
            driver: params.driver,
            visible_from: params.visible_from,
            visible_to: params.visible_to,
            cutoff_at: params.cutoff_at,
            capacity_orders: params.capacity_orders,
            capacity_kg: params.capacity_kg,
            status: RingStatus::Open,
            delivery_kind: params.delivery_kind,
            stops: Vec::with_capacity(params.stops.len()),
            next_stop_id: 1,
        };
        ring.check_schedule()?;
        for stop in params.stops {
            if ring.has_sort_order(stop.sort_order) {
                return Err(RingError::DuplicateSortOrder(stop.sort_order));
            }
            ring.push_stop(stop);
        }
        Ok(ring)
    }

    async fn on_update(&mut self, update: RingUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(driver) = update.driver {
            self.driver = driver;
        }
        if let Some(visible_from) = update.visible_from {
            self.visible_from = visible_from;
        }
        if let Some(visible_to) = update.visible_to {
            self.visible_to = visible_to;
        }
        if let Some(cutoff_at) = update.cutoff_at {
            self.cutoff_at = cutoff_at;
        }
        if let Some(capacity_orders) = update.capacity_orders {
            self.capacity_orders = capacity_orders;
        }
        if let Some(capacity_kg) = update.capacity_kg {
            self.capacity_kg = capacity_kg;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.check_schedule()
    }

    async fn handle_action(
        &mut self,
        action: RingAction,
        _ctx: &(),
    ) -> Result<RingActionResult, Self::Error> {
        match action {
            RingAction::AddStop(stop) => {
                if self.has_sort_order(stop.sort_order) {
                    return Err(RingError::DuplicateSortOrder(stop.sort_order));
                }
                Ok(RingActionResult::AddStop(self.push_stop(stop)))
            }
            RingAction::RemoveStop(stop) => {
                let index = self
                    .stops
                    .iter()
                    .position(|s| s.id == stop)
                    .ok_or(RingError::StopNotFound { ring: self.id, stop })?;
                Ok(RingActionResult::RemoveStop(self.stops.remove(index)))
            }
            RingAction::MoveStop { stop, sort_order } => {
                let current = self
                    .stop(stop)
                    .ok_or(RingError::StopNotFound { ring: self.id, stop })?
                    .sort_order;
                if current == sort_order {
                    return Ok(RingActionResult::MoveStop(()));
                }
                if self.has_sort_order(sort_order) {
                    return Err(RingError::DuplicateSortOrder(sort_order));
                }
                for s in self.stops.iter_mut().filter(|s| s.id == stop) {
                    s.sort_order = sort_order;
                }
                self.stops.sort_by_key(|s| s.sort_order);
                Ok(RingActionResult::MoveStop(()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeliveryKind, StopCreate, StopId};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn stop(name: &str, sort_order: u32) -> StopCreate {
        StopCreate {
            name: name.into(),
            meeting_point: format!("{name} market"),
            time_start: None,
            time_end: None,
            sort_order,
        }
    }

    fn params(stops: Vec<StopCreate>) -> RingCreate {
        RingCreate {
            ring_date: NaiveDate::from_ymd_opt(2025, 10, 8).unwrap(),
            driver: "Mart".into(),
            visible_from: Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap(),
            visible_to: Utc.with_ymd_and_hms(2025, 10, 6, 23, 59, 0).unwrap(),
            cutoff_at: Utc.with_ymd_and_hms(2025, 10, 6, 23, 59, 0).unwrap(),
            capacity_orders: None,
            capacity_kg: None,
            delivery_kind: DeliveryKind::Stop,
            stops,
        }
    }

    #[test]
    fn duplicate_sort_order_on_create_is_rejected() {
        let err = Ring::from_create_params(RingId(1), params(vec![stop("Tartu", 1), stop("Elva", 1)]))
            .unwrap_err();
        assert_eq!(err, RingError::DuplicateSortOrder(1));
    }

    #[tokio::test]
    async fn stops_can_be_added_moved_and_removed() {
        let mut ring = Ring::from_create_params(RingId(1), params(vec![stop("Tartu", 10)])).unwrap();

        let added = ring
            .handle_action(RingAction::AddStop(stop("Elva", 20)), &())
            .await
            .unwrap();
        assert_eq!(added, RingActionResult::AddStop(StopId(2)));
        assert_eq!(ring.region(), "Tartu – Elva");

        ring.handle_action(RingAction::MoveStop { stop: StopId(2), sort_order: 5 }, &())
            .await
            .unwrap();
        assert_eq!(ring.region(), "Elva – Tartu");

        let clash = ring
            .handle_action(RingAction::MoveStop { stop: StopId(1), sort_order: 5 }, &())
            .await;
        assert_eq!(clash, Err(RingError::DuplicateSortOrder(5)));

        ring.handle_action(RingAction::RemoveStop(StopId(2)), &()).await.unwrap();
        assert_eq!(ring.region(), "Tartu");
        let missing = ring.handle_action(RingAction::RemoveStop(StopId(2)), &()).await;
        assert!(matches!(missing, Err(RingError::StopNotFound { .. })));
    }

    #[tokio::test]
    async fn update_rejects_inverted_visibility() {
        let mut ring = Ring::from_create_params(RingId(1), params(vec![])).unwrap();
        let update = RingUpdate {
            visible_to: Some(Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(ring.on_update(update, &()).await.is_err());
    }
}
