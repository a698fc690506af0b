//! Resource definitions
//!
//! A [`Resource`] names a collection of objects, knows how to load and persist
//! them, and carries an immutable [`ResourceConfig`] describing page size,
//! enabled HTTP methods and its authentication and authorization policies.
//! The [`Api`](crate::api::Api) endpoints drive a resource through one request.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::api::ApiError;
use crate::authentication::{AllowAll, Authentication, SessionAuthentication};
use crate::authorization::{AclAuthorization, Authorization, Open, ReadOnly};
use crate::bundle::Bundle;
use crate::pagination::ObjectSet;

/// Default URL prefix for resources
pub const DEFAULT_PREFIX: &str = "/api";

/// Default page size
pub const DEFAULT_LIMIT: u64 = 20;

/// Default upper bound on the page size
pub const DEFAULT_MAX_LIMIT: u64 = 1000;

/// HTTP methods a resource can enable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl ApiMethod {
    pub const ALL: [ApiMethod; 5] = [
        ApiMethod::Get,
        ApiMethod::Post,
        ApiMethod::Put,
        ApiMethod::Delete,
        ApiMethod::Patch,
    ];
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
            Self::Patch => write!(f, "PATCH"),
        }
    }
}

impl TryFrom<&http::Method> for ApiMethod {
    type Error = ApiError;

    fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
        match *method {
            http::Method::GET => Ok(Self::Get),
            http::Method::POST => Ok(Self::Post),
            http::Method::PUT => Ok(Self::Put),
            http::Method::DELETE => Ok(Self::Delete),
            http::Method::PATCH => Ok(Self::Patch),
            _ => Err(ApiError::method_not_allowed(method)),
        }
    }
}

/// Authentication policy selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationKind {
    AllowAll,
    Session,
}

impl AuthenticationKind {
    pub fn policy(self) -> Arc<dyn Authentication> {
        match self {
            Self::AllowAll => Arc::new(AllowAll),
            Self::Session => Arc::new(SessionAuthentication),
        }
    }
}

/// Authorization policy selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationKind {
    Open,
    ReadOnly,
    Acl,
}

impl AuthorizationKind {
    pub fn policy<O: 'static>(self) -> Arc<dyn Authorization<O>> {
        match self {
            Self::Open => Arc::new(Open),
            Self::ReadOnly => Arc::new(ReadOnly),
            Self::Acl => Arc::new(AclAuthorization),
        }
    }
}

/// Per-resource overrides, as read from configuration
///
/// Every field is optional; unset fields inherit from the defaults passed to
/// [`build_config`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceOptions {
    pub limit: Option<u64>,
    pub max_limit: Option<u64>,
    pub allowed_methods: Option<Vec<ApiMethod>>,
    pub list_allowed_methods: Option<Vec<ApiMethod>>,
    pub detail_allowed_methods: Option<Vec<ApiMethod>>,
    pub authentication: Option<AuthenticationKind>,
    pub authorization: Option<AuthorizationKind>,
    pub always_return_data: Option<bool>,
}

/// Immutable resource configuration
///
/// The `with_*` builders consume and return the configuration, so a shared
/// default is never modified in place: clone it first.
pub struct ResourceConfig<O> {
    limit: u64,
    max_limit: u64,
    allowed_methods: Vec<ApiMethod>,
    list_allowed_methods: Vec<ApiMethod>,
    detail_allowed_methods: Vec<ApiMethod>,
    authentication: Arc<dyn Authentication>,
    authorization: Arc<dyn Authorization<O>>,
    always_return_data: bool,
}

impl<O: 'static> ResourceConfig<O> {
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            max_limit: DEFAULT_MAX_LIMIT,
            allowed_methods: ApiMethod::ALL.to_vec(),
            list_allowed_methods: ApiMethod::ALL.to_vec(),
            detail_allowed_methods: ApiMethod::ALL.to_vec(),
            authentication: Arc::new(AllowAll),
            authorization: Arc::new(ReadOnly),
            always_return_data: false,
        }
    }
}

impl<O> ResourceConfig<O> {
    /// Page size; `0` disables pagination
    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn max_limit(&self) -> u64 {
        self.max_limit
    }

    /// Effective page size: `limit` capped by `max_limit` when both are set
    pub fn page_size(&self) -> u64 {
        if self.limit > 0 && self.max_limit > 0 {
            self.limit.min(self.max_limit)
        } else {
            self.limit
        }
    }

    pub fn allowed_methods(&self) -> &[ApiMethod] {
        &self.allowed_methods
    }

    pub fn list_allowed_methods(&self) -> &[ApiMethod] {
        &self.list_allowed_methods
    }

    pub fn detail_allowed_methods(&self) -> &[ApiMethod] {
        &self.detail_allowed_methods
    }

    pub fn is_allowed(&self, method: ApiMethod, detail: bool) -> bool {
        if detail {
            self.detail_allowed_methods.contains(&method)
        } else {
            self.list_allowed_methods.contains(&method)
        }
    }

    pub fn authentication(&self) -> &dyn Authentication {
        self.authentication.as_ref()
    }

    pub fn authorization(&self) -> &dyn Authorization<O> {
        self.authorization.as_ref()
    }

    pub fn always_return_data(&self) -> bool {
        self.always_return_data
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_max_limit(mut self, max_limit: u64) -> Self {
        self.max_limit = max_limit;
        self
    }

    /// Set the enabled methods; list and detail sets follow
    #[must_use]
    pub fn with_allowed_methods(mut self, methods: impl Into<Vec<ApiMethod>>) -> Self {
        self.allowed_methods = methods.into();
        self.list_allowed_methods = self.allowed_methods.clone();
        self.detail_allowed_methods = self.allowed_methods.clone();
        self
    }

    #[must_use]
    pub fn with_list_allowed_methods(mut self, methods: impl Into<Vec<ApiMethod>>) -> Self {
        self.list_allowed_methods = methods.into();
        self
    }

    #[must_use]
    pub fn with_detail_allowed_methods(mut self, methods: impl Into<Vec<ApiMethod>>) -> Self {
        self.detail_allowed_methods = methods.into();
        self
    }

    #[must_use]
    pub fn with_authentication(mut self, authentication: impl Authentication + 'static) -> Self {
        self.authentication = Arc::new(authentication);
        self
    }

    #[must_use]
    pub fn with_authorization(mut self, authorization: impl Authorization<O> + 'static) -> Self {
        self.authorization = Arc::new(authorization);
        self
    }

    #[must_use]
    pub fn with_always_return_data(mut self, always_return_data: bool) -> Self {
        self.always_return_data = always_return_data;
        self
    }
}

impl<O: 'static> Default for ResourceConfig<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> Clone for ResourceConfig<O> {
    fn clone(&self) -> Self {
        Self {
            limit: self.limit,
            max_limit: self.max_limit,
            allowed_methods: self.allowed_methods.clone(),
            list_allowed_methods: self.list_allowed_methods.clone(),
            detail_allowed_methods: self.detail_allowed_methods.clone(),
            authentication: Arc::clone(&self.authentication),
            authorization: Arc::clone(&self.authorization),
            always_return_data: self.always_return_data,
        }
    }
}

impl<O> fmt::Debug for ResourceConfig<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceConfig")
            .field("limit", &self.limit)
            .field("max_limit", &self.max_limit)
            .field("list_allowed_methods", &self.list_allowed_methods)
            .field("detail_allowed_methods", &self.detail_allowed_methods)
            .field("authentication", &self.authentication)
            .field("authorization", &self.authorization)
            .field("always_return_data", &self.always_return_data)
            .finish()
    }
}

/// Merge configuration overrides over a set of defaults
///
/// Unset overrides inherit from `defaults`. When `allowed_methods` is
/// overridden but the list or detail sets are not, those sets follow the new
/// `allowed_methods`.
pub fn build_config<O: 'static>(
    defaults: &ResourceConfig<O>,
    overrides: &ResourceOptions,
) -> ResourceConfig<O> {
    let mut config = defaults.clone();

    if let Some(limit) = overrides.limit {
        config.limit = limit;
    }
    if let Some(max_limit) = overrides.max_limit {
        config.max_limit = max_limit;
    }
    if let Some(methods) = &overrides.allowed_methods {
        config = config.with_allowed_methods(methods.clone());
    }
    if let Some(methods) = &overrides.list_allowed_methods {
        config.list_allowed_methods = methods.clone();
    }
    if let Some(methods) = &overrides.detail_allowed_methods {
        config.detail_allowed_methods = methods.clone();
    }
    if let Some(kind) = overrides.authentication {
        config.authentication = kind.policy();
    }
    if let Some(kind) = overrides.authorization {
        config.authorization = kind.policy();
    }
    if let Some(always_return_data) = overrides.always_return_data {
        config.always_return_data = always_return_data;
    }

    config
}

/// A named collection of objects exposed over the REST protocol
///
/// Implementors provide loading (`get_obj_list`, `get_obj`) and, for writable
/// resources, persistence (`save_obj`, `delete_obj`). The remaining methods
/// have working defaults: `hydrate` and `dehydrate` convert between objects
/// and JSON through serde.
pub trait Resource: Send + Sync + 'static {
    type Object: Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Resource name, used in URLs and permission names
    fn name(&self) -> &str;

    fn config(&self) -> &ResourceConfig<Self::Object>;

    fn prefix(&self) -> &str {
        DEFAULT_PREFIX
    }

    /// Collection URL, e.g. `/api/page`
    fn api_url(&self) -> String {
        format!("{}/{}", self.prefix().trim_end_matches('/'), self.name())
    }

    fn get_obj_list(&self) -> impl Future<Output = Result<ObjectSet<Self::Object>, ApiError>> + Send;

    fn get_obj(&self, id: i64) -> impl Future<Output = Result<Option<Self::Object>, ApiError>> + Send;

    /// Persist an object and return the stored version
    fn save_obj(
        &self,
        obj: Self::Object,
    ) -> impl Future<Output = Result<Self::Object, ApiError>> + Send {
        async move { Ok(obj) }
    }

    fn delete_obj(&self, obj: Self::Object) -> impl Future<Output = Result<(), ApiError>> + Send {
        let _ = obj;
        async { Ok(()) }
    }

    /// Object to hydrate into when creating
    fn new_object(&self) -> Option<Self::Object> {
        None
    }

    /// Fill `bundle.data` from `bundle.obj`
    fn dehydrate(&self, bundle: &mut Bundle<'_, Self::Object>) -> Result<(), ApiError> {
        if let Some(obj) = &bundle.obj {
            bundle.data = serde_json::to_value(obj).map_err(|e| {
                ApiError::internal(format!("Failed to serialize object: {e}"))
                    .with_entity_type(self.name())
            })?;
        }
        Ok(())
    }

    /// Fill `bundle.obj` from `bundle.data`
    fn hydrate(&self, bundle: &mut Bundle<'_, Self::Object>) -> Result<(), ApiError> {
        let obj = serde_json::from_value(bundle.data.clone())
            .map_err(|e| ApiError::bad_request(format!("Invalid data: {e}")))?;
        bundle.obj = Some(obj);
        Ok(())
    }
}
