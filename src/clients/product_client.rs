//! # Product Client
//!
//! Catalog access: sku lookups, admin corrections and idempotent catalog sync.
use crate::framework::{ActorClient, Filter, FrameworkError, ResourceClient, Upserted};
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate, Sku};
use crate::product_actor::ProductError;
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

/// Outcome of a catalog sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogSyncReport {
    pub created: usize,
    pub updated: usize,
}

impl ProductClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Product> for ProductClient {
    type Error = ProductError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => ProductError::NotFound(id),
            FrameworkError::Conflict(sku) => ProductError::DuplicateSku(sku),
            other => other
                .into_entity_error::<ProductError>()
                .unwrap_or_else(|e| ProductError::ActorCommunicationError(e.to_string())),
        }
    }
}

impl ProductClient {
    /// Creates a product. Fails with [`ProductError::DuplicateSku`] if the sku exists.
    #[instrument(skip(self))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<ProductId, ProductError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Creates the product or overwrites the one with the same sku.
    #[instrument(skip(self))]
    pub async fn upsert_product(&self, params: ProductCreate) -> Result<Upserted<ProductId>, ProductError> {
        debug!("Sending request");
        self.inner.upsert(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_product(&self, id: ProductId, update: ProductUpdate) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn find_by_sku(&self, sku: &Sku) -> Result<Option<Product>, ProductError> {
        debug!("Sending request");
        self.inner
            .get_by_key(sku.as_str())
            .await
            .map_err(Self::map_error)
    }

    /// Products with the given skus, in id order. Unknown skus are skipped.
    #[instrument(skip(self, skus))]
    pub async fn find_many(&self, skus: Vec<Sku>) -> Result<Vec<Product>, ProductError> {
        debug!(count = skus.len(), "Sending request");
        self.list(Filter::new(move |p: &Product| skus.contains(&p.sku)))
            .await
    }

    #[instrument(skip(self))]
    pub async fn list_active(&self) -> Result<Vec<Product>, ProductError> {
        self.list(Filter::new(|p: &Product| p.active)).await
    }

    /// Upserts every record by sku. Running the same feed twice changes nothing.
    ///
    /// Stops at the first invalid record; records before it stay applied.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub async fn sync_catalog(&self, records: Vec<ProductCreate>) -> Result<CatalogSyncReport, ProductError> {
        let mut report = CatalogSyncReport::default();
        for record in records {
            if self.upsert_product(record).await?.created {
                report.created += 1;
            } else {
                report.updated += 1;
            }
        }
        info!(created = report.created, updated = report.updated, "Catalog synced");
        Ok(report)
    }

    /// Parses a JSON array of [`ProductCreate`] records and syncs it.
    pub async fn sync_catalog_json(&self, feed: &str) -> Result<CatalogSyncReport, ProductError> {
        let records: Vec<ProductCreate> =
            serde_json::from_str(feed).map_err(|e| ProductError::MalformedFeed(e.to_string()))?;
        self.sync_catalog(records).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_client, expect_upsert, MockClient};
    use crate::model::Unit;

    fn record(sku: &str) -> ProductCreate {
        ProductCreate {
            sku: Sku::new(sku),
            name: format!("Item {sku}"),
            category: String::new(),
            unit: Unit::Piece,
            catch_weight: false,
            active: true,
        }
    }

    #[tokio::test]
    async fn sync_counts_created_and_updated() {
        let mut mock = MockClient::<Product>::new();
        mock.expect_upsert().return_ok(Upserted { id: ProductId(1), created: true });
        mock.expect_upsert().return_ok(Upserted { id: ProductId(2), created: false });
        let client = ProductClient::new(mock.client());

        let report = client
            .sync_catalog(vec![record("PORK-004"), record("BEEF-001")])
            .await
            .unwrap();
        assert_eq!(report, CatalogSyncReport { created: 1, updated: 1 });
        mock.verify();
    }

    #[tokio::test]
    async fn feed_records_are_normalized_before_upsert() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let client = ProductClient::new(client);

        let task = tokio::spawn(async move {
            client
                .sync_catalog_json(r#"[{"sku":"lamb-002","name":"Lamb chops","unit":"KG","catch_weight":true}]"#)
                .await
        });

        let (params, responder) = expect_upsert(&mut receiver).await.expect("Expected Upsert request");
        assert_eq!(params.sku.as_str(), "LAMB-002");
        assert!(params.catch_weight && params.active);
        responder.send(Ok(Upserted { id: ProductId(1), created: true })).unwrap();

        assert_eq!(task.await.unwrap().unwrap().created, 1);
    }

    #[tokio::test]
    async fn malformed_feed_sends_nothing() {
        let mock = MockClient::<Product>::new();
        let client = ProductClient::new(mock.client());
        let err = client.sync_catalog_json("[{\"sku\":").await.unwrap_err();
        assert!(matches!(err, ProductError::MalformedFeed(_)));
        mock.verify();
    }

    #[tokio::test]
    async fn entity_errors_keep_their_type() {
        let mut mock = MockClient::<Product>::new();
        mock.expect_upsert().return_err(FrameworkError::EntityError(Box::new(
            ProductError::Validation("name is required".into()),
        )));
        let client = ProductClient::new(mock.client());
        let err = client.upsert_product(record("PORK-004")).await.unwrap_err();
        assert_eq!(err, ProductError::Validation("name is required".into()));
    }
}
