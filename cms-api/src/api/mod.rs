//! Resource endpoints
//!
//! [`Api`] runs one request against one [`Resource`]. Each endpoint follows
//! the same sequence and stops at the first failure:
//!
//! 1. the HTTP method must be enabled for the list or detail URL
//! 2. the authentication policy must accept the caller
//! 3. write endpoints parse the JSON body and stop early with
//!    [`ApiResponse::Invalid`] when field errors are pending
//! 4. the target object is loaded (`NotFound`) or checked for a clash (`Conflict`)
//! 5. the authorization policy is consulted
//! 6. the object is hydrated and persisted, or dehydrated for output
//!
//! # Example
//!
//! ```rust,ignore
//! let request = RequestContext::new().with_param("page", "2");
//! let response = Api::new(&number_api, &request).collection_get().await?;
//! ```

mod error;
mod response;

use serde_json::Value;

use crate::bundle::{Bundle, ListMeta};
use crate::context::RequestContext;
use crate::pagination::{ObjectSet, PaginationError, Paginator};
use crate::resource::{ApiMethod, Resource, ResourceConfig};
use crate::responses::Created;

pub use error::{
    ApiError, ApiErrorKind, ApiOperation, NOT_AUTHENTICATED_MESSAGE, NOT_AUTHORIZED_MESSAGE,
};
pub use response::ApiResponse;

/// Query parameter selecting the page of a list response
pub const PAGE_PARAM: &str = "page";

/// Endpoint runner binding a resource to one request
pub struct Api<'a, R: Resource> {
    resource: &'a R,
    request: &'a RequestContext,
}

impl<'a, R: Resource> Api<'a, R> {
    pub fn new(resource: &'a R, request: &'a RequestContext) -> Self {
        Self { resource, request }
    }

    pub fn resource(&self) -> &'a R {
        self.resource
    }

    pub fn request(&self) -> &'a RequestContext {
        self.request
    }

    /// GET on the detail URL
    pub async fn get(&self, id: i64) -> Result<ApiResponse, ApiError> {
        let operation = ApiOperation::Get;
        self.check_method(ApiMethod::Get, true, operation)?;
        self.authenticate(operation)?;

        let obj = self.fetch(id, operation).await?;
        let mut bundle = self.bundle(Some(obj), None);
        self.authorize(self.config().authorization().read_detail(&bundle), operation)?;
        self.resource
            .dehydrate(&mut bundle)
            .map_err(|e| e.with_operation(operation))?;

        tracing::debug!(resource = self.name(), id, user = ?self.identifier(), "object read");
        Ok(ApiResponse::Ok(bundle.into_json()))
    }

    /// PUT on the detail URL
    pub async fn put(&self, id: i64, body: &[u8]) -> Result<ApiResponse, ApiError> {
        let operation = ApiOperation::Update;
        self.check_method(ApiMethod::Put, true, operation)?;
        self.authenticate(operation)?;

        let data = self.parse_body(body, operation)?;
        if let Some(invalid) = self.pending_validation() {
            return Ok(invalid);
        }

        let obj = self.fetch(id, operation).await?;
        let mut bundle = self.bundle(Some(obj), Some(data));
        self.authorize(self.config().authorization().update_detail(&bundle), operation)?;

        let saved = self.hydrate_and_save(&mut bundle, operation).await?;
        tracing::info!(resource = self.name(), id, user = ?self.identifier(), "object updated");

        if !self.config().always_return_data() {
            return Ok(ApiResponse::NoContent);
        }
        bundle.obj = Some(saved);
        self.resource
            .dehydrate(&mut bundle)
            .map_err(|e| e.with_operation(operation))?;
        Ok(ApiResponse::Ok(bundle.into_json()))
    }

    /// POST on the collection URL
    pub async fn collection_post(&self, body: &[u8]) -> Result<ApiResponse, ApiError> {
        let operation = ApiOperation::Create;
        self.check_method(ApiMethod::Post, false, operation)?;
        self.authenticate(operation)?;

        let data = self.parse_body(body, operation)?;
        if let Some(invalid) = self.pending_validation() {
            return Ok(invalid);
        }

        if let Some(id) = data.get("id").and_then(Value::as_i64) {
            let existing = self
                .resource
                .get_obj(id)
                .await
                .map_err(|e| e.with_operation(operation))?;
            if existing.is_some() {
                return Err(ApiError::conflict(self.name(), id.to_string()).with_operation(operation));
            }
        }

        let mut bundle = self.bundle(None, Some(data));
        self.authorize(self.config().authorization().create_detail(&bundle), operation)?;

        let saved = self.hydrate_and_save(&mut bundle, operation).await?;
        bundle.obj = Some(saved);
        self.resource
            .dehydrate(&mut bundle)
            .map_err(|e| e.with_operation(operation))?;

        let id = bundle.data.get("id").and_then(Value::as_i64);
        tracing::info!(resource = self.name(), id, user = ?self.identifier(), "object created");

        let created = if self.config().always_return_data() {
            Created::new(bundle.into_json())
        } else {
            Created::empty()
        };
        Ok(ApiResponse::Created(match id {
            Some(id) => created.with_location(format!("{}/{id}", self.resource.api_url())),
            None => created,
        }))
    }

    /// GET on the collection URL
    ///
    /// Reads the page number from the `page` query parameter (default 1). A
    /// non-integer or out-of-range page is a `BadRequest`.
    pub async fn collection_get(&self) -> Result<ApiResponse, ApiError> {
        let operation = ApiOperation::List;
        self.check_method(ApiMethod::Get, false, operation)?;
        self.authenticate(operation)?;

        let number = self.page_number()?;
        let paginator = self.paginator().await?;
        let page = paginator.page(number).map_err(ApiError::from)?;

        let api_url = self.resource.api_url();
        let page_url = |n: u64| format!("{api_url}?{PAGE_PARAM}={n}");
        let meta = ListMeta {
            limit: paginator.per_page(),
            next: page.next_page_number().ok().map(page_url),
            page: page.number(),
            num_pages: paginator.num_pages(),
            previous: page
                .has_previous()
                .then(|| page.previous_page_number().ok().map(page_url))
                .flatten(),
            total_count: paginator.count(),
        };

        let items = page
            .into_object_list()
            .into_iter()
            .map(|obj| {
                let mut bundle = self.bundle(Some(obj), None);
                self.resource.dehydrate(&mut bundle)?;
                Ok(bundle)
            })
            .collect::<Result<Vec<_>, ApiError>>()
            .map_err(|e| e.with_operation(operation))?;

        tracing::debug!(
            resource = self.name(),
            page = meta.page,
            total_count = meta.total_count,
            user = ?self.identifier(),
            "collection read"
        );
        Ok(ApiResponse::Ok(Bundle::list(items, meta).into_json()))
    }

    /// DELETE on the detail URL
    pub async fn delete(&self, id: i64) -> Result<ApiResponse, ApiError> {
        let operation = ApiOperation::Delete;
        self.check_method(ApiMethod::Delete, true, operation)?;
        self.authenticate(operation)?;

        let obj = self.fetch(id, operation).await?;
        let mut bundle = self.bundle(Some(obj), None);
        self.authorize(self.config().authorization().delete_detail(&bundle), operation)?;

        let obj = self.take_obj(&mut bundle)?;
        self.resource
            .delete_obj(obj)
            .await
            .map_err(|e| e.with_operation(operation))?;

        tracing::info!(resource = self.name(), id, user = ?self.identifier(), "object deleted");
        Ok(ApiResponse::NoContent)
    }

    /// Paginator over the objects the caller may read
    pub async fn paginator(&self) -> Result<Paginator<ObjectSet<R::Object>>, ApiError> {
        let objects = self.resource.get_obj_list().await?;
        let bundle = self.bundle(None, None);
        let allowed = self
            .config()
            .authorization()
            .read_list(objects, &bundle)
            .map_err(|e| e.with_operation(ApiOperation::List))?;
        Ok(Paginator::new(allowed, self.config().page_size()))
    }

    fn name(&self) -> &'a str {
        self.resource.name()
    }

    fn config(&self) -> &'a ResourceConfig<R::Object> {
        self.resource.config()
    }

    fn identifier(&self) -> Option<String> {
        self.config().authentication().get_identifier(self.request)
    }

    fn bundle(&self, obj: Option<R::Object>, data: Option<Value>) -> Bundle<'a, R::Object> {
        Bundle::for_resource(self.resource, self.request, obj, data)
    }

    fn check_method(
        &self,
        method: ApiMethod,
        detail: bool,
        operation: ApiOperation,
    ) -> Result<(), ApiError> {
        if self.config().is_allowed(method, detail) {
            Ok(())
        } else {
            Err(ApiError::method_not_allowed(method)
                .with_operation(operation)
                .with_entity_type(self.name()))
        }
    }

    fn authenticate(&self, operation: ApiOperation) -> Result<(), ApiError> {
        if self.config().authentication().is_authenticated(self.request) {
            Ok(())
        } else {
            tracing::warn!(resource = self.name(), %operation, "unauthenticated request");
            Err(ApiError::not_authenticated()
                .with_operation(operation)
                .with_entity_type(self.name()))
        }
    }

    fn authorize(
        &self,
        decision: Result<bool, ApiError>,
        operation: ApiOperation,
    ) -> Result<(), ApiError> {
        match decision {
            Ok(true) => Ok(()),
            Ok(false) => {
                tracing::warn!(
                    resource = self.name(),
                    %operation,
                    user = ?self.identifier(),
                    "authorization denied"
                );
                Err(ApiError::not_authorized()
                    .with_operation(operation)
                    .with_entity_type(self.name()))
            }
            Err(e) => Err(e.with_operation(operation)),
        }
    }

    fn parse_body(&self, body: &[u8], operation: ApiOperation) -> Result<Value, ApiError> {
        serde_json::from_slice(body).map_err(|e| {
            ApiError::bad_request(format!("Invalid JSON body: {e}"))
                .with_operation(operation)
                .with_entity_type(self.name())
        })
    }

    fn pending_validation(&self) -> Option<ApiResponse> {
        let errors = self.request.validation_errors();
        errors.has_errors().then(|| {
            tracing::debug!(
                resource = self.name(),
                errors = errors.error_count(),
                "rejecting request with pending validation errors"
            );
            ApiResponse::Invalid(errors.clone())
        })
    }

    fn page_number(&self) -> Result<i64, ApiError> {
        match self.request.param(PAGE_PARAM) {
            None => Ok(1),
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
                ApiError::from(PaginationError::PageNotAnInteger(raw.to_string()))
                    .with_entity_type(self.name())
            }),
        }
    }

    async fn fetch(&self, id: i64, operation: ApiOperation) -> Result<R::Object, ApiError> {
        self.resource
            .get_obj(id)
            .await
            .map_err(|e| e.with_operation(operation))?
            .ok_or_else(|| ApiError::not_found(self.name(), id.to_string()).with_operation(operation))
    }

    fn take_obj(&self, bundle: &mut Bundle<'a, R::Object>) -> Result<R::Object, ApiError> {
        bundle.obj.take().ok_or_else(|| {
            ApiError::internal("Bundle holds no object").with_entity_type(self.name())
        })
    }

    async fn hydrate_and_save(
        &self,
        bundle: &mut Bundle<'a, R::Object>,
        operation: ApiOperation,
    ) -> Result<R::Object, ApiError> {
        self.resource
            .hydrate(bundle)
            .map_err(|e| e.with_operation(operation).with_entity_type(self.name()))?;
        let obj = self.take_obj(bundle)?;
        self.resource
            .save_obj(obj)
            .await
            .map_err(|e| e.with_operation(operation))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use tokio::sync::Mutex;

    use super::*;
    use crate::authentication::SessionAuthentication;
    use crate::authorization::{AclAuthorization, Authorization, DetailResult, ListResult, Open};
    use crate::context::{PermissionSet, Principal};
    use crate::responses::FieldError;

    struct NumberApi {
        config: ResourceConfig<i64>,
    }

    impl NumberApi {
        fn new() -> Self {
            Self {
                config: ResourceConfig::new().with_limit(10),
            }
        }
    }

    impl Resource for NumberApi {
        type Object = i64;

        fn name(&self) -> &str {
            "number"
        }

        fn config(&self) -> &ResourceConfig<i64> {
            &self.config
        }

        async fn get_obj_list(&self) -> Result<ObjectSet<i64>, ApiError> {
            Ok(Box::new(0..1000_i64))
        }

        async fn get_obj(&self, id: i64) -> Result<Option<i64>, ApiError> {
            Ok((0..1000).contains(&id).then_some(id))
        }
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Note {
        #[serde(default)]
        id: i64,
        title: String,
    }

    struct NoteApi {
        config: ResourceConfig<Note>,
        notes: Mutex<BTreeMap<i64, Note>>,
    }

    impl NoteApi {
        fn new(config: ResourceConfig<Note>) -> Self {
            let notes = (1..=3)
                .map(|id| {
                    (
                        id,
                        Note {
                            id,
                            title: format!("note {id}"),
                        },
                    )
                })
                .collect();
            Self {
                config,
                notes: Mutex::new(notes),
            }
        }
    }

    impl Resource for NoteApi {
        type Object = Note;

        fn name(&self) -> &str {
            "note"
        }

        fn config(&self) -> &ResourceConfig<Note> {
            &self.config
        }

        async fn get_obj_list(&self) -> Result<ObjectSet<Note>, ApiError> {
            let notes: Vec<Note> = self.notes.lock().await.values().cloned().collect();
            Ok(Box::new(notes))
        }

        async fn get_obj(&self, id: i64) -> Result<Option<Note>, ApiError> {
            Ok(self.notes.lock().await.get(&id).cloned())
        }

        async fn save_obj(&self, mut obj: Note) -> Result<Note, ApiError> {
            let mut notes = self.notes.lock().await;
            if obj.id == 0 {
                obj.id = notes.keys().next_back().copied().unwrap_or(0) + 1;
            }
            notes.insert(obj.id, obj.clone());
            Ok(obj)
        }

        async fn delete_obj(&self, obj: Note) -> Result<(), ApiError> {
            self.notes.lock().await.remove(&obj.id);
            Ok(())
        }

        fn new_object(&self) -> Option<Note> {
            Some(Note::default())
        }
    }

    /// Keeps only the listed objects, rejects every detail check
    #[derive(Debug)]
    struct OnlyThese(Vec<i64>);

    impl Authorization<i64> for OnlyThese {
        fn read_list(&self, _objects: ObjectSet<i64>, _bundle: &Bundle<'_, i64>) -> ListResult<i64> {
            Ok(Box::new(self.0.clone()))
        }
        fn read_detail(&self, _bundle: &Bundle<'_, i64>) -> DetailResult {
            Ok(false)
        }
        fn create_list(&self, objects: ObjectSet<i64>, _bundle: &Bundle<'_, i64>) -> ListResult<i64> {
            Ok(objects)
        }
        fn create_detail(&self, _bundle: &Bundle<'_, i64>) -> DetailResult {
            Ok(false)
        }
        fn update_list(&self, objects: ObjectSet<i64>, _bundle: &Bundle<'_, i64>) -> ListResult<i64> {
            Ok(objects)
        }
        fn update_detail(&self, _bundle: &Bundle<'_, i64>) -> DetailResult {
            Ok(false)
        }
        fn delete_list(&self, objects: ObjectSet<i64>, _bundle: &Bundle<'_, i64>) -> ListResult<i64> {
            Ok(objects)
        }
        fn delete_detail(&self, _bundle: &Bundle<'_, i64>) -> DetailResult {
            Ok(false)
        }
    }

    fn writable() -> ResourceConfig<Note> {
        ResourceConfig::new().with_authorization(Open)
    }

    #[test]
    fn test_identity_hydrate_dehydrate_round_trip() {
        let resource = NoteApi::new(writable());
        let request = RequestContext::new();
        let original = json!({"id": 7, "title": "round trip"});

        let mut bundle = Bundle::for_resource(&resource, &request, None, Some(original.clone()));
        resource.hydrate(&mut bundle).unwrap();
        bundle.data = json!({});
        resource.dehydrate(&mut bundle).unwrap();

        assert_eq!(bundle.data, original);
    }

    #[tokio::test]
    async fn test_collection_get_second_page() {
        let resource = NumberApi::new();
        let request = RequestContext::new().with_param("page", "2");

        let response = Api::new(&resource, &request).collection_get().await.unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let body = response.body().unwrap();
        assert_eq!(
            body["meta"],
            json!({
                "limit": 10,
                "next": "/api/number?page=3",
                "page": 2,
                "num_pages": 100,
                "previous": "/api/number?page=1",
                "total_count": 1000
            })
        );
        assert_eq!(body["items"], json!((10..20).collect::<Vec<i64>>()));
    }

    #[tokio::test]
    async fn test_collection_get_first_and_last_page_links() {
        let resource = NumberApi::new();

        let request = RequestContext::new();
        let response = Api::new(&resource, &request).collection_get().await.unwrap();
        let meta = &response.body().unwrap()["meta"];
        assert_eq!(meta["page"], 1);
        assert_eq!(meta["previous"], Value::Null);
        assert_eq!(meta["next"], "/api/number?page=2");

        let request = RequestContext::new().with_param("page", "100");
        let response = Api::new(&resource, &request).collection_get().await.unwrap();
        let meta = &response.body().unwrap()["meta"];
        assert_eq!(meta["next"], Value::Null);
        assert_eq!(meta["previous"], "/api/number?page=99");
    }

    #[tokio::test]
    async fn test_collection_get_bad_page() {
        let resource = NumberApi::new();

        for page in ["x", "1.5", "0", "101"] {
            let request = RequestContext::new().with_param("page", page);
            let error = Api::new(&resource, &request).collection_get().await.unwrap_err();
            assert_eq!(error.kind, ApiErrorKind::BadRequest, "page={page}");
            assert_eq!(error.message, "Invalid page number");
        }
    }

    #[tokio::test]
    async fn test_collection_get_uses_authorized_subset() {
        let resource = NumberApi {
            config: ResourceConfig::new().with_authorization(OnlyThese(vec![10, 5, 2])),
        };
        let request = RequestContext::new();

        let response = Api::new(&resource, &request).collection_get().await.unwrap();
        let body = response.body().unwrap();
        assert_eq!(body["items"], json!([10, 5, 2]));
        assert_eq!(body["meta"]["total_count"], 3);
        assert_eq!(body["meta"]["num_pages"], 1);
    }

    #[tokio::test]
    async fn test_collection_get_empty() {
        let resource = NoteApi::new(writable());
        resource.notes.lock().await.clear();
        let request = RequestContext::new();

        let response = Api::new(&resource, &request).collection_get().await.unwrap();
        let body = response.body().unwrap();
        assert_eq!(body["items"], json!([]));
        assert_eq!(body["meta"]["total_count"], 0);
        assert_eq!(body["meta"]["num_pages"], 0);
        assert_eq!(body["meta"]["next"], Value::Null);
        assert_eq!(body["meta"]["previous"], Value::Null);
    }

    #[tokio::test]
    async fn test_collection_get_unpaginated() {
        let resource = NumberApi {
            config: ResourceConfig::new().with_limit(0),
        };
        let request = RequestContext::new();

        let response = Api::new(&resource, &request).collection_get().await.unwrap();
        let body = response.body().unwrap();
        assert_eq!(body["items"].as_array().unwrap().len(), 1000);
        assert_eq!(body["meta"]["limit"], 0);
        assert_eq!(body["meta"]["num_pages"], 1);
    }

    #[tokio::test]
    async fn test_get_detail() {
        let resource = NumberApi::new();
        let request = RequestContext::new();

        let response = Api::new(&resource, &request).get(42).await.unwrap();
        assert_eq!(response.body(), Some(&json!(42)));
    }

    #[tokio::test]
    async fn test_get_missing_object() {
        let resource = NumberApi::new();
        let request = RequestContext::new();

        let error = Api::new(&resource, &request).get(5000).await.unwrap_err();
        assert_eq!(error.kind, ApiErrorKind::NotFound);
        assert_eq!(error.entity_id, Some("5000".to_string()));
    }

    #[tokio::test]
    async fn test_get_detail_denied() {
        let resource = NumberApi {
            config: ResourceConfig::new().with_authorization(OnlyThese(vec![])),
        };
        let request = RequestContext::new();

        let error = Api::new(&resource, &request).get(1).await.unwrap_err();
        assert_eq!(error.kind, ApiErrorKind::NotAuthorized);
        assert_eq!(error.operation, ApiOperation::Get);
    }

    #[tokio::test]
    async fn test_authentication_required() {
        let resource = NoteApi::new(writable().with_authentication(SessionAuthentication));
        let request = RequestContext::new();
        let api = Api::new(&resource, &request);

        assert_eq!(
            api.collection_get().await.unwrap_err().kind,
            ApiErrorKind::NotAuthenticated
        );
        assert_eq!(api.get(1).await.unwrap_err().kind, ApiErrorKind::NotAuthenticated);
        assert_eq!(
            api.put(1, br#"{"title": "x"}"#).await.unwrap_err().message,
            "Authentication required"
        );
        assert_eq!(
            api.collection_post(br#"{"title": "x"}"#).await.unwrap_err().kind,
            ApiErrorKind::NotAuthenticated
        );
        assert_eq!(api.delete(1).await.unwrap_err().kind, ApiErrorKind::NotAuthenticated);

        let request = RequestContext::new().with_user(Principal::new(1, "admin"));
        assert!(Api::new(&resource, &request).get(1).await.is_ok());
    }

    #[tokio::test]
    async fn test_disabled_method() {
        let resource = NoteApi::new(writable().with_detail_allowed_methods([ApiMethod::Get]));
        let request = RequestContext::new();
        let api = Api::new(&resource, &request);

        let error = api.delete(1).await.unwrap_err();
        assert_eq!(error.kind, ApiErrorKind::MethodNotAllowed);
        assert!(api.get(1).await.is_ok());
        assert_eq!(resource.notes.lock().await.len(), 3);
    }

    #[tokio::test]
    async fn test_put_updates_object() {
        let resource = NoteApi::new(writable());
        let request = RequestContext::new();

        let response = Api::new(&resource, &request)
            .put(2, br#"{"id": 2, "title": "edited"}"#)
            .await
            .unwrap();

        assert!(matches!(response, ApiResponse::NoContent));
        assert_eq!(resource.notes.lock().await[&2].title, "edited");
    }

    #[tokio::test]
    async fn test_put_returns_data_when_configured() {
        let resource = NoteApi::new(writable().with_always_return_data(true));
        let request = RequestContext::new();

        let response = Api::new(&resource, &request)
            .put(2, br#"{"id": 2, "title": "edited"}"#)
            .await
            .unwrap();

        assert_eq!(response.body(), Some(&json!({"id": 2, "title": "edited"})));
    }

    #[tokio::test]
    async fn test_put_errors() {
        let resource = NoteApi::new(writable());
        let request = RequestContext::new();
        let api = Api::new(&resource, &request);

        let error = api.put(1, b"{not json").await.unwrap_err();
        assert_eq!(error.kind, ApiErrorKind::BadRequest);

        let error = api.put(99, br#"{"title": "x"}"#).await.unwrap_err();
        assert_eq!(error.kind, ApiErrorKind::NotFound);
        assert_eq!(error.operation, ApiOperation::Update);
    }

    #[tokio::test]
    async fn test_put_read_only() {
        let resource = NoteApi::new(ResourceConfig::new());
        let request = RequestContext::new();

        let error = Api::new(&resource, &request)
            .put(1, br#"{"id": 1, "title": "x"}"#)
            .await
            .unwrap_err();
        assert_eq!(error.kind, ApiErrorKind::NotAuthorized);
        assert_eq!(resource.notes.lock().await[&1].title, "note 1");
    }

    #[tokio::test]
    async fn test_pending_validation_errors_stop_writes() {
        let resource = NoteApi::new(writable());
        let request = RequestContext::new()
            .with_validation_error(FieldError::new("title", "REQUIRED", "Title is required"));
        let api = Api::new(&resource, &request);

        let response = api.put(1, br#"{"id": 1, "title": ""}"#).await.unwrap();
        assert!(matches!(response, ApiResponse::Invalid(ref errors) if errors.error_count() == 1));

        let response = api.collection_post(br#"{"title": ""}"#).await.unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);

        let notes = resource.notes.lock().await;
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[&1].title, "note 1");
    }

    #[tokio::test]
    async fn test_collection_post_creates_object() {
        let resource = NoteApi::new(writable());
        let request = RequestContext::new();

        let response = Api::new(&resource, &request)
            .collection_post(br#"{"title": "fresh"}"#)
            .await
            .unwrap();

        match response {
            ApiResponse::Created(created) => {
                assert!(created.data().is_none());
                assert_eq!(created.location(), Some("/api/note/4"));
            }
            other => panic!("expected Created, got {other:?}"),
        }
        assert_eq!(resource.notes.lock().await[&4].title, "fresh");
    }

    #[tokio::test]
    async fn test_collection_post_returns_data_when_configured() {
        let resource = NoteApi::new(writable().with_always_return_data(true));
        let request = RequestContext::new();

        let response = Api::new(&resource, &request)
            .collection_post(br#"{"title": "fresh"}"#)
            .await
            .unwrap();

        assert_eq!(response.body(), Some(&json!({"id": 4, "title": "fresh"})));
    }

    #[tokio::test]
    async fn test_collection_post_conflict() {
        let resource = NoteApi::new(writable());
        let request = RequestContext::new();

        let error = Api::new(&resource, &request)
            .collection_post(br#"{"id": 1, "title": "again"}"#)
            .await
            .unwrap_err();

        assert_eq!(error.kind, ApiErrorKind::Conflict);
        assert_eq!(resource.notes.lock().await[&1].title, "note 1");
    }

    #[tokio::test]
    async fn test_collection_post_read_only() {
        let resource = NoteApi::new(ResourceConfig::new());
        let request = RequestContext::new();

        let error = Api::new(&resource, &request)
            .collection_post(br#"{"title": "fresh"}"#)
            .await
            .unwrap_err();
        assert_eq!(error.kind, ApiErrorKind::NotAuthorized);
        assert_eq!(error.operation, ApiOperation::Create);
    }

    #[tokio::test]
    async fn test_delete() {
        let resource = NoteApi::new(writable());
        let request = RequestContext::new();
        let api = Api::new(&resource, &request);

        let response = api.delete(3).await.unwrap();
        assert!(matches!(response, ApiResponse::NoContent));
        assert!(!resource.notes.lock().await.contains_key(&3));

        let error = api.delete(3).await.unwrap_err();
        assert_eq!(error.kind, ApiErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_acl_resource() {
        let resource = NoteApi::new(ResourceConfig::new().with_authorization(AclAuthorization));

        let request = RequestContext::new().with_permissions(PermissionSet::from_iter(["read-note"]));
        let api = Api::new(&resource, &request);
        assert!(api.collection_get().await.is_ok());
        assert!(api.get(1).await.is_ok());
        assert_eq!(api.delete(1).await.unwrap_err().kind, ApiErrorKind::NotAuthorized);

        let request = RequestContext::new();
        let error = Api::new(&resource, &request).collection_get().await.unwrap_err();
        assert_eq!(error.kind, ApiErrorKind::NotAuthorized);
    }
}
