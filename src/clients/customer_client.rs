//! # Customer Client
use crate::framework::{ActorClient, FrameworkError, ResourceClient, Upserted};
use crate::model::{normalize_email, Customer, CustomerCreate, CustomerId, CustomerUpdate};
use crate::customer_actor::CustomerError;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Customer actor.
#[derive(Clone)]
pub struct CustomerClient {
    inner: ResourceClient<Customer>,
}

impl CustomerClient {
    pub fn new(inner: ResourceClient<Customer>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Customer> for CustomerClient {
    type Error = CustomerError;

    fn inner(&self) -> &ResourceClient<Customer> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => CustomerError::NotFound(id),
            FrameworkError::Conflict(email) => CustomerError::DuplicateEmail(email),
            other => other
                .into_entity_error::<CustomerError>()
                .unwrap_or_else(|e| CustomerError::ActorCommunicationError(e.to_string())),
        }
    }
}

impl CustomerClient {
    #[instrument(skip(self))]
    pub async fn create_customer(&self, params: CustomerCreate) -> Result<CustomerId, CustomerError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Creates the customer, or refreshes the one registered under the same email.
    #[instrument(skip(self, params), fields(email = %params.email))]
    pub async fn upsert_customer(&self, params: CustomerCreate) -> Result<Upserted<CustomerId>, CustomerError> {
        debug!(?params, "Sending request");
        self.inner.upsert(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, CustomerError> {
        debug!("Sending request");
        self.inner
            .get_by_key(normalize_email(email))
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_customer(&self, id: CustomerId, update: CustomerUpdate) -> Result<Customer, CustomerError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }
}
