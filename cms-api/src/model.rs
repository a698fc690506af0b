//! Model-backed resources
//!
//! [`ModelApi`] exposes any [`Model`] through a [`ModelManager`]: listing,
//! fetching, saving and deleting go straight to the manager, new objects start
//! from `Model::default()`, and JSON conversion merges submitted fields over the
//! existing object instead of replacing it wholesale.
//!
//! # Example
//!
//! ```rust,ignore
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! struct Page {
//!     id: Option<i64>,
//!     title: String,
//! }
//!
//! impl Model for Page {
//!     fn id(&self) -> Option<i64> { self.id }
//!     fn set_id(&mut self, id: i64) { self.id = Some(id) }
//! }
//!
//! let pages = ModelApi::new("page", InMemoryManager::<Page>::new())
//!     .with_config(ResourceConfig::new().with_authorization(Open));
//! let app = cms_resource(Arc::new(pages));
//! ```

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::atomic::{AtomicI64, Ordering};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::api::{ApiError, ApiErrorKind, ApiOperation};
use crate::bundle::Bundle;
use crate::pagination::ObjectSet;
use crate::resource::{Resource, ResourceConfig, DEFAULT_PREFIX};

/// A persistent domain object identified by an integer id
pub trait Model: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static {
    /// `None` until the object has been saved
    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: i64);

    /// JSON representation of every field
    fn to_data(&self) -> Result<Value, ApiError> {
        serde_json::to_value(self)
            .map_err(|e| ApiError::internal(format!("Failed to serialize model: {e}")))
    }

    /// Overwrite fields present in `data`, keeping the rest
    ///
    /// A saved object keeps its id even when `data` carries a different one.
    fn update_from(&mut self, data: &Value) -> Result<(), ApiError> {
        let Value::Object(incoming) = data else {
            return Err(ApiError::bad_request("Expected a JSON object"));
        };

        let mut merged = match self.to_data()? {
            Value::Object(fields) => fields,
            _ => serde_json::Map::new(),
        };
        for (field, value) in incoming {
            if field == "id" && self.id().is_some() {
                continue;
            }
            merged.insert(field.clone(), value.clone());
        }

        *self = serde_json::from_value(Value::Object(merged))
            .map_err(|e| ApiError::bad_request(format!("Invalid data: {e}")))?;
        Ok(())
    }
}

/// Storage for one model type
pub trait ModelManager<M: Model>: Send + Sync + 'static {
    fn all(&self) -> impl Future<Output = Result<ObjectSet<M>, ApiError>> + Send;

    fn get(&self, id: i64) -> impl Future<Output = Result<Option<M>, ApiError>> + Send;

    fn count(&self) -> impl Future<Output = Result<u64, ApiError>> + Send;

    /// Insert or replace; unsaved objects are assigned an id
    fn save(&self, obj: M) -> impl Future<Output = Result<M, ApiError>> + Send;

    /// Returns whether an object was removed
    fn delete(&self, obj: &M) -> impl Future<Output = Result<bool, ApiError>> + Send;
}

/// Process-local model storage ordered by id
#[derive(Debug)]
pub struct InMemoryManager<M> {
    objects: RwLock<BTreeMap<i64, M>>,
    last_id: AtomicI64,
}

impl<M: Model> InMemoryManager<M> {
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(BTreeMap::new()),
            last_id: AtomicI64::new(0),
        }
    }

    /// Seed the manager; objects without an id are numbered in order
    ///
    /// Objects that cannot be given an id are skipped with a warning.
    pub fn with_objects(objects: impl IntoIterator<Item = M>) -> Self {
        let manager = Self::new();
        let mut stored = BTreeMap::new();
        for mut obj in objects {
            match manager.assign_id(&mut obj) {
                Ok(id) => {
                    stored.insert(id, obj);
                }
                Err(e) => tracing::warn!(error = %e, "object not seeded"),
            }
        }
        Self {
            objects: RwLock::new(stored),
            last_id: manager.last_id,
        }
    }

    /// Keep an explicit id, or take the one after the highest id seen so far
    fn assign_id(&self, obj: &mut M) -> Result<i64, ApiError> {
        match obj.id() {
            Some(id) => {
                self.last_id.fetch_max(id, Ordering::SeqCst);
                Ok(id)
            }
            None => {
                let previous = self
                    .last_id
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| last.checked_add(1))
                    .map_err(|_| {
                        ApiError::new(
                            ApiOperation::Create,
                            ApiErrorKind::Conflict,
                            "No free object id",
                        )
                    })?;
                let id = previous + 1;
                obj.set_id(id);
                Ok(id)
            }
        }
    }
}

impl<M: Model> Default for InMemoryManager<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> ModelManager<M> for InMemoryManager<M> {
    async fn all(&self) -> Result<ObjectSet<M>, ApiError> {
        let objects: Vec<M> = self.objects.read().await.values().cloned().collect();
        Ok(Box::new(objects))
    }

    async fn get(&self, id: i64) -> Result<Option<M>, ApiError> {
        Ok(self.objects.read().await.get(&id).cloned())
    }

    async fn count(&self) -> Result<u64, ApiError> {
        Ok(self.objects.read().await.len() as u64)
    }

    async fn save(&self, mut obj: M) -> Result<M, ApiError> {
        let id = self.assign_id(&mut obj)?;
        self.objects.write().await.insert(id, obj.clone());
        Ok(obj)
    }

    async fn delete(&self, obj: &M) -> Result<bool, ApiError> {
        let Some(id) = obj.id() else {
            return Ok(false);
        };
        Ok(self.objects.write().await.remove(&id).is_some())
    }
}

/// Resource serving a [`Model`] through a [`ModelManager`]
pub struct ModelApi<M: Model, S: ModelManager<M> = InMemoryManager<M>> {
    name: String,
    prefix: String,
    manager: S,
    config: ResourceConfig<M>,
}

impl<M: Model, S: ModelManager<M>> ModelApi<M, S> {
    pub fn new(name: impl Into<String>, manager: S) -> Self {
        Self {
            name: name.into(),
            prefix: DEFAULT_PREFIX.to_string(),
            manager,
            config: ResourceConfig::new(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ResourceConfig<M>) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn manager(&self) -> &S {
        &self.manager
    }
}

impl<M: Model, S: ModelManager<M>> Resource for ModelApi<M, S> {
    type Object = M;

    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> &ResourceConfig<M> {
        &self.config
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    async fn get_obj_list(&self) -> Result<ObjectSet<M>, ApiError> {
        self.manager.all().await
    }

    async fn get_obj(&self, id: i64) -> Result<Option<M>, ApiError> {
        self.manager.get(id).await
    }

    async fn save_obj(&self, obj: M) -> Result<M, ApiError> {
        self.manager.save(obj).await
    }

    async fn delete_obj(&self, obj: M) -> Result<(), ApiError> {
        if !self.manager.delete(&obj).await? {
            tracing::warn!(resource = %self.name, id = ?obj.id(), "object vanished before delete");
        }
        Ok(())
    }

    fn new_object(&self) -> Option<M> {
        Some(M::default())
    }

    fn dehydrate(&self, bundle: &mut Bundle<'_, M>) -> Result<(), ApiError> {
        if let Some(obj) = &bundle.obj {
            bundle.data = obj.to_data()?;
        }
        Ok(())
    }

    fn hydrate(&self, bundle: &mut Bundle<'_, M>) -> Result<(), ApiError> {
        let data = std::mem::take(&mut bundle.data);
        let result = bundle.obj.get_or_insert_with(M::default).update_from(&data);
        bundle.data = data;
        result
    }
}
