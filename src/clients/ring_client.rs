//! # Ring Client
//!
//! Delivery schedule maintenance and the customer-facing ring listing.
use crate::framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use crate::model::{Ring, RingCreate, RingId, RingStatus, RingUpdate, Stop, StopCreate, StopId};
use crate::ring_actor::{RingAction, RingActionResult, RingError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct RingClient {
    inner: ResourceClient<Ring>,
}

impl RingClient {
    pub fn new(inner: ResourceClient<Ring>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Ring> for RingClient {
    type Error = RingError;

    fn inner(&self) -> &ResourceClient<Ring> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => RingError::NotFound(id),
            other => other
                .into_entity_error::<RingError>()
                .unwrap_or_else(|e| RingError::ActorCommunicationError(e.to_string())),
        }
    }
}

fn unexpected(result: RingActionResult) -> RingError {
    RingError::ActorCommunicationError(format!("unexpected action result {result:?}"))
}

impl RingClient {
    #[instrument(skip(self))]
    pub async fn create_ring(&self, params: RingCreate) -> Result<RingId, RingError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_ring(&self, id: RingId, update: RingUpdate) -> Result<Ring, RingError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Stops the ring from taking orders. Existing orders are unaffected.
    pub async fn close_ring(&self, id: RingId) -> Result<Ring, RingError> {
        let update = RingUpdate {
            status: Some(RingStatus::Closed),
            ..Default::default()
        };
        self.update_ring(id, update).await
    }

    #[instrument(skip(self))]
    pub async fn add_stop(&self, id: RingId, stop: StopCreate) -> Result<StopId, RingError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, RingAction::AddStop(stop))
            .await
            .map_err(Self::map_error)?
        {
            RingActionResult::AddStop(stop_id) => Ok(stop_id),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn remove_stop(&self, id: RingId, stop: StopId) -> Result<Stop, RingError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, RingAction::RemoveStop(stop))
            .await
            .map_err(Self::map_error)?
        {
            RingActionResult::RemoveStop(removed) => Ok(removed),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn move_stop(&self, id: RingId, stop: StopId, sort_order: u32) -> Result<(), RingError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, RingAction::MoveStop { stop, sort_order })
            .await
            .map_err(Self::map_error)?
        {
            RingActionResult::MoveStop(()) => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    /// Open rings customers can pick at `at`, soonest delivery first.
    #[instrument(skip(self))]
    pub async fn visible_rings(&self, at: DateTime<Utc>) -> Result<Vec<Ring>, RingError> {
        let mut rings = self
            .list(Filter::new(move |ring: &Ring| ring.is_visible_at(at)))
            .await?;
        rings.sort_by_key(|ring| (ring.ring_date, ring.id));
        Ok(rings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockClient;

    #[tokio::test]
    async fn unknown_ring_maps_to_not_found() {
        let mut mock = MockClient::<Ring>::new();
        mock.expect_action(RingId(9))
            .return_err(FrameworkError::NotFound("ring_9".into()));
        let client = RingClient::new(mock.client());

        let err = client
            .move_stop(RingId(9), StopId(1), 3)
            .await
            .unwrap_err();
        assert_eq!(err, RingError::NotFound("ring_9".into()));
        mock.verify();
    }

    #[tokio::test]
    async fn visible_rings_come_back_by_date() {
        use crate::framework::mock::{create_mock_client, expect_list};
        use crate::model::DeliveryKind;
        use chrono::{NaiveDate, TimeZone};

        let (client, mut receiver) = create_mock_client::<Ring>(10);
        let client = RingClient::new(client);
        let at = Utc.with_ymd_and_hms(2025, 10, 3, 12, 0, 0).unwrap();
        let task = tokio::spawn(async move { client.visible_rings(at).await });

        let ring = |id: u32, day: u32, status: RingStatus| Ring {
            id: RingId(id),
            ring_date: NaiveDate::from_ymd_opt(2025, 10, day).unwrap(),
            driver: String::new(),
            visible_from: Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap(),
            visible_to: Utc.with_ymd_and_hms(2025, 10, 6, 23, 59, 0).unwrap(),
            cutoff_at: Utc.with_ymd_and_hms(2025, 10, 6, 23, 59, 0).unwrap(),
            capacity_orders: None,
            capacity_kg: None,
            status,
            delivery_kind: DeliveryKind::Stop,
            stops: Vec::new(),
            next_stop_id: 1,
        };
        let (filter, responder) = expect_list(&mut receiver).await.expect("Expected List request");
        let matched: Vec<Ring> = [
            ring(1, 9, RingStatus::Open),
            ring(2, 8, RingStatus::Open),
            ring(3, 7, RingStatus::Cancelled),
        ]
        .into_iter()
        .filter(|r| filter.matches(r))
        .collect();
        responder.send(Ok(matched)).unwrap();

        let ids: Vec<RingId> = task.await.unwrap().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![RingId(2), RingId(1)]);
    }
}
