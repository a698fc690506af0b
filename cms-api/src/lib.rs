//! # cms-api
//!
//! Paginated REST resources for content management systems.
//!
//! A resource is a named collection of objects served on two URLs: a
//! collection URL (`GET` lists one page, `POST` creates) and a detail URL
//! (`GET`, `PUT`, `DELETE` one object). Every request passes through the
//! resource's authentication policy, then its authorization policy, before any
//! object is read or written.
//!
//! ## Features
//!
//! - **Pagination**: page-number pagination over materialised or lazily
//!   counted collections, with `next`/`previous` links in list responses
//! - **Policies**: `AllowAll` and session authentication; `Open`, `ReadOnly`
//!   and permission-based (`{action}-{resource}`) authorization
//! - **Model resources**: `ModelApi` serves any [`Model`](model::Model)
//!   through a pluggable [`ModelManager`](model::ModelManager)
//! - **Configuration**: Figment layering of defaults, `config.toml` and
//!   `CMS_` environment variables, with per-resource overrides
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use cms_api::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! struct Page {
//!     id: Option<i64>,
//!     title: String,
//! }
//!
//! impl Model for Page {
//!     fn id(&self) -> Option<i64> {
//!         self.id
//!     }
//!
//!     fn set_id(&mut self, id: i64) {
//!         self.id = Some(id);
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let pages = ModelApi::new("page", InMemoryManager::<Page>::new())
//!         .with_prefix(config.api.prefix.clone())
//!         .with_config(config.resource_config("page"));
//!
//!     let app = cms_resource(Arc::new(pages));
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod authentication;
pub mod authorization;
pub mod bundle;
pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod observability;
pub mod pagination;
pub mod resource;
pub mod responses;
pub mod routing;

pub mod prelude {
    pub use crate::api::{Api, ApiError, ApiErrorKind, ApiOperation, ApiResponse};
    pub use crate::authentication::{AllowAll, Authentication, SessionAuthentication};
    pub use crate::authorization::{AclAuthorization, Authorization, Open, ReadOnly};
    pub use crate::bundle::{Bundle, ListMeta};
    pub use crate::config::Config;
    pub use crate::context::{PermissionChecker, PermissionSet, Permissions, Principal, RequestContext};
    pub use crate::error::{Error, Result};
    pub use crate::model::{InMemoryManager, Model, ModelApi, ModelManager};
    pub use crate::observability::init_tracing;
    pub use crate::pagination::{ObjectList, ObjectSet, Page, PaginationError, Paginator};
    pub use crate::resource::{build_config, ApiMethod, Resource, ResourceConfig, ResourceOptions};
    pub use crate::responses::{FieldError, ValidationError};
    pub use crate::routing::cms_resource;

    pub use axum::Router;
}
