//! # Price List Client
//!
//! Price list maintenance and unit price resolution for a customer segment.
use crate::framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use crate::model::{resolve_price, PriceList, PriceListCreate, PriceListId, PriceListUpdate, Segment, Sku};
use crate::price_list_actor::{PriceListAction, PriceListActionResult, PriceListError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct PriceListClient {
    inner: ResourceClient<PriceList>,
}

impl PriceListClient {
    pub fn new(inner: ResourceClient<PriceList>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<PriceList> for PriceListClient {
    type Error = PriceListError;

    fn inner(&self) -> &ResourceClient<PriceList> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => PriceListError::NotFound(id),
            other => other
                .into_entity_error::<PriceListError>()
                .unwrap_or_else(|e| PriceListError::ActorCommunicationError(e.to_string())),
        }
    }
}

fn unexpected(result: PriceListActionResult) -> PriceListError {
    PriceListError::ActorCommunicationError(format!("unexpected action result {result:?}"))
}

impl PriceListClient {
    #[instrument(skip(self))]
    pub async fn create_price_list(&self, params: PriceListCreate) -> Result<PriceListId, PriceListError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_price_list(
        &self,
        id: PriceListId,
        update: PriceListUpdate,
    ) -> Result<PriceList, PriceListError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Sets a sku's price. Returns the price it replaced.
    #[instrument(skip(self))]
    pub async fn set_price(
        &self,
        id: PriceListId,
        sku: Sku,
        price: Decimal,
    ) -> Result<Option<Decimal>, PriceListError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, PriceListAction::SetPrice { sku, price })
            .await
            .map_err(Self::map_error)?
        {
            PriceListActionResult::SetPrice(previous) => Ok(previous),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn remove_price(&self, id: PriceListId, sku: Sku) -> Result<Option<Decimal>, PriceListError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, PriceListAction::RemovePrice(sku))
            .await
            .map_err(Self::map_error)?
        {
            PriceListActionResult::RemovePrice(previous) => Ok(previous),
            other => Err(unexpected(other)),
        }
    }

    /// Lists of `segment` valid at `at`.
    #[instrument(skip(self))]
    pub async fn valid_lists(&self, segment: Segment, at: DateTime<Utc>) -> Result<Vec<PriceList>, PriceListError> {
        self.list(Filter::new(move |list: &PriceList| {
            list.segment == segment && list.is_valid_at(at)
        }))
        .await
    }

    /// Unit price of one sku, or `None` when it is to be agreed.
    #[instrument(skip(self))]
    pub async fn resolve_price(
        &self,
        sku: &Sku,
        segment: Segment,
        at: DateTime<Utc>,
    ) -> Result<Option<Decimal>, PriceListError> {
        let lists = self.valid_lists(segment, at).await?;
        Ok(resolve_price(&lists, sku, segment, at))
    }

    /// Prices for several skus from a single listing. Unpriced skus are absent.
    #[instrument(skip(self, skus))]
    pub async fn resolve_prices(
        &self,
        skus: &[Sku],
        segment: Segment,
        at: DateTime<Utc>,
    ) -> Result<BTreeMap<Sku, Decimal>, PriceListError> {
        let lists = self.valid_lists(segment, at).await?;
        Ok(skus
            .iter()
            .filter_map(|sku| resolve_price(&lists, sku, segment, at).map(|price| (sku.clone(), price)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_client, expect_action, expect_list};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn list(id: u32, segment: Segment, from_month: u32, price: Decimal) -> PriceList {
        PriceList {
            id: PriceListId(id),
            name: format!("list {id}"),
            segment,
            valid_from: Utc.with_ymd_and_hms(2025, from_month, 1, 0, 0, 0).unwrap(),
            valid_to: None,
            items: BTreeMap::from([(Sku::new("PORK-004"), price)]),
        }
    }

    #[tokio::test]
    async fn listing_is_filtered_inside_the_actor() {
        let (client, mut receiver) = create_mock_client::<PriceList>(10);
        let client = PriceListClient::new(client);
        let at = Utc.with_ymd_and_hms(2025, 10, 6, 12, 0, 0).unwrap();

        let task = tokio::spawn(async move {
            client
                .resolve_prices(&[Sku::new("PORK-004"), Sku::new("BEEF-001")], Segment::Retail, at)
                .await
        });

        let (filter, responder) = expect_list(&mut receiver).await.expect("Expected List request");
        let candidates = [
            list(1, Segment::Retail, 1, dec!(4.00)),
            list(2, Segment::Retail, 9, dec!(4.20)),
            list(3, Segment::Wholesale, 10, dec!(3.10)),
        ];
        let matched: Vec<PriceList> = candidates.into_iter().filter(|l| filter.matches(l)).collect();
        assert_eq!(matched.len(), 2);
        responder.send(Ok(matched)).unwrap();

        let prices = task.await.unwrap().unwrap();
        assert_eq!(prices.get(&Sku::new("PORK-004")), Some(&dec!(4.20)));
        assert!(!prices.contains_key(&Sku::new("BEEF-001")));
    }

    #[tokio::test]
    async fn set_price_returns_previous_price() {
        let (client, mut receiver) = create_mock_client::<PriceList>(10);
        let client = PriceListClient::new(client);

        let task = tokio::spawn(async move {
            client
                .set_price(PriceListId(1), Sku::new("PORK-004"), dec!(4.50))
                .await
        });

        let (id, action, responder) = expect_action(&mut receiver).await.expect("Expected Action request");
        assert_eq!(id, PriceListId(1));
        assert!(matches!(action, PriceListAction::SetPrice { price, .. } if price == dec!(4.50)));
        responder
            .send(Ok(PriceListActionResult::SetPrice(Some(dec!(4.20)))))
            .unwrap();

        assert_eq!(task.await.unwrap().unwrap(), Some(dec!(4.20)));
    }
}
