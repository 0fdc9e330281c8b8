//! # Generic Actor Server
//!
//! `ResourceActor` is the "server" half of every resource: it owns the store for one
//! entity type and processes requests sequentially, so a read-modify-write on that type
//! can never interleave with another one.

use crate::framework::client::ResourceClient;
use crate::framework::entity::ActorEntity;
use crate::framework::error::FrameworkError;
use crate::framework::message::{ResourceRequest, Upserted};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities.
///
/// **Concurrency Model**:
/// Each actor processes its own messages *sequentially* in a loop, so the store needs
/// no `Mutex`. Hooks run against a draft copy of the entity; the draft replaces the
/// stored value only when the hook succeeds, so a rejected update or action leaves the
/// entity untouched.
///
/// ## Operations
///
/// * **Create** - allocates the next `u32` ID, builds the entity, runs `on_create`,
///   rejects a natural key that is already taken.
/// * **Get / GetByKey** - clone of the entity, or `None`.
/// * **List** - clones of every entity matching the filter, in ID order.
/// * **Update** - runs `on_update` on a draft, re-indexes the natural key.
/// * **Upsert** - merges into the entity owning the payload's natural key via
///   `on_upsert`, or falls through to Create.
/// * **Delete** - runs `on_delete`, removes the entity and its key.
/// * **Action** - runs `handle_action` on a draft and returns its result.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    keys: HashMap<String, T::Id>,
    next_id: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; callers wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            keys: HashMap::new(),
            next_id: 1,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    ///
    /// The `context` argument is injected into every entity hook.
    pub async fn run(mut self, context: T::Context) {
        // Extract just the type name (e.g., "Order" instead of "farm_orders::model::order::Order")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let result = self.create(entity_type, params, &context).await;
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::GetByKey { key, respond_to } => {
                    let item = self
                        .keys
                        .get(&key)
                        .and_then(|id| self.store.get(id))
                        .cloned();
                    let found = item.is_some();
                    debug!(entity_type, %key, found, "GetByKey");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { filter, respond_to } => {
                    let items: Vec<T> = self
                        .store
                        .values()
                        .filter(|item| filter.matches(item))
                        .cloned()
                        .collect();
                    debug!(entity_type, matched = items.len(), size = self.store.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let old_key = item.natural_key();
                    let mut draft = item.clone();
                    if let Err(e) = draft.on_update(update, &context).await {
                        warn!(entity_type, %id, error = %e, "Update failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    let new_key = draft.natural_key();
                    if new_key != old_key {
                        if let Some(key) = new_key.as_ref().filter(|k| self.keys.contains_key(*k)) {
                            warn!(entity_type, %id, %key, "Update would duplicate natural key");
                            let _ = respond_to.send(Err(FrameworkError::Conflict(key.clone())));
                            continue;
                        }
                        if let Some(key) = old_key {
                            self.keys.remove(&key);
                        }
                        if let Some(key) = new_key {
                            self.keys.insert(key, id.clone());
                        }
                    }
                    *item = draft.clone();
                    info!(entity_type, %id, "Updated");
                    let _ = respond_to.send(Ok(draft));
                }
                ResourceRequest::Upsert { params, respond_to } => {
                    debug!(entity_type, ?params, "Upsert");
                    let existing = T::create_key(&params).and_then(|key| self.keys.get(&key).cloned());
                    let result = match existing {
                        Some(id) => self.merge(entity_type, id, params, &context).await,
                        None => self
                            .create(entity_type, params, &context)
                            .await
                            .map(|id| Upserted { id, created: true }),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let Some(item) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_delete(&context).await {
                        warn!(entity_type, %id, error = %e, "on_delete failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    if let Some(key) = self.store.remove(&id).and_then(|removed| removed.natural_key()) {
                        self.keys.remove(&key);
                    }
                    info!(entity_type, %id, size = self.store.len(), "Deleted");
                    let _ = respond_to.send(Ok(()));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let mut draft = item.clone();
                    let result = match draft.handle_action(action, &context).await {
                        Ok(value) => {
                            *item = draft;
                            info!(entity_type, %id, "Action ok");
                            Ok(value)
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Action failed");
                            Err(FrameworkError::EntityError(Box::new(e)))
                        }
                    };
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    async fn create(
        &mut self,
        entity_type: &str,
        params: T::Create,
        context: &T::Context,
    ) -> Result<T::Id, FrameworkError> {
        if let Some(key) = T::create_key(&params).filter(|k| self.keys.contains_key(k)) {
            warn!(entity_type, %key, "Create would duplicate natural key");
            return Err(FrameworkError::Conflict(key));
        }

        let id = T::Id::from(self.next_id);
        let mut item = T::from_create_params(id.clone(), params).map_err(|e| {
            warn!(entity_type, error = %e, "Create failed");
            FrameworkError::EntityError(Box::new(e))
        })?;
        if let Err(e) = item.on_create(context).await {
            warn!(entity_type, error = %e, "on_create failed");
            return Err(FrameworkError::EntityError(Box::new(e)));
        }

        // IDs are only consumed by successful creates.
        self.next_id += 1;
        if let Some(key) = item.natural_key() {
            self.keys.insert(key, id.clone());
        }
        self.store.insert(id.clone(), item);
        info!(entity_type, %id, size = self.store.len(), "Created");
        Ok(id)
    }

    async fn merge(
        &mut self,
        entity_type: &str,
        id: T::Id,
        params: T::Create,
        context: &T::Context,
    ) -> Result<Upserted<T::Id>, FrameworkError> {
        let item = self
            .store
            .get_mut(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        let mut draft = item.clone();
        if let Err(e) = draft.on_upsert(params, context).await {
            warn!(entity_type, %id, error = %e, "on_upsert failed");
            return Err(FrameworkError::EntityError(Box::new(e)));
        }
        *item = draft;
        info!(entity_type, %id, "Upserted");
        Ok(Upserted { id, created: false })
    }
}
