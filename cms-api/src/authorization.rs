//! Authorization policies
//!
//! Every endpoint consults exactly one policy method before touching data.
//! List checks receive the candidate [`ObjectSet`] and return the subset the
//! caller may see; detail checks receive the bundle holding the candidate
//! object and answer yes or no. A policy may also fail outright with
//! [`ApiError::not_authorized`], which the endpoint propagates unchanged.

use std::fmt;

use crate::api::ApiError;
use crate::bundle::Bundle;
use crate::pagination::ObjectSet;

pub type ListResult<O> = Result<ObjectSet<O>, ApiError>;
pub type DetailResult = Result<bool, ApiError>;

pub trait Authorization<O>: Send + Sync + fmt::Debug {
    fn read_list(&self, objects: ObjectSet<O>, bundle: &Bundle<'_, O>) -> ListResult<O>;
    fn read_detail(&self, bundle: &Bundle<'_, O>) -> DetailResult;
    fn create_list(&self, objects: ObjectSet<O>, bundle: &Bundle<'_, O>) -> ListResult<O>;
    fn create_detail(&self, bundle: &Bundle<'_, O>) -> DetailResult;
    fn update_list(&self, objects: ObjectSet<O>, bundle: &Bundle<'_, O>) -> ListResult<O>;
    fn update_detail(&self, bundle: &Bundle<'_, O>) -> DetailResult;
    fn delete_list(&self, objects: ObjectSet<O>, bundle: &Bundle<'_, O>) -> ListResult<O>;
    fn delete_detail(&self, bundle: &Bundle<'_, O>) -> DetailResult;
}

/// Permits everything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Open;

impl<O> Authorization<O> for Open {
    fn read_list(&self, objects: ObjectSet<O>, _bundle: &Bundle<'_, O>) -> ListResult<O> {
        Ok(objects)
    }

    fn read_detail(&self, _bundle: &Bundle<'_, O>) -> DetailResult {
        Ok(true)
    }

    fn create_list(&self, objects: ObjectSet<O>, _bundle: &Bundle<'_, O>) -> ListResult<O> {
        Ok(objects)
    }

    fn create_detail(&self, _bundle: &Bundle<'_, O>) -> DetailResult {
        Ok(true)
    }

    fn update_list(&self, objects: ObjectSet<O>, _bundle: &Bundle<'_, O>) -> ListResult<O> {
        Ok(objects)
    }

    fn update_detail(&self, _bundle: &Bundle<'_, O>) -> DetailResult {
        Ok(true)
    }

    fn delete_list(&self, objects: ObjectSet<O>, _bundle: &Bundle<'_, O>) -> ListResult<O> {
        Ok(objects)
    }

    fn delete_detail(&self, _bundle: &Bundle<'_, O>) -> DetailResult {
        Ok(true)
    }
}

/// Permits reads, rejects every mutation; the default policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOnly;

impl<O> Authorization<O> for ReadOnly {
    fn read_list(&self, objects: ObjectSet<O>, _bundle: &Bundle<'_, O>) -> ListResult<O> {
        Ok(objects)
    }

    fn read_detail(&self, _bundle: &Bundle<'_, O>) -> DetailResult {
        Ok(true)
    }

    fn create_list(&self, _objects: ObjectSet<O>, _bundle: &Bundle<'_, O>) -> ListResult<O> {
        Err(ApiError::not_authorized())
    }

    fn create_detail(&self, _bundle: &Bundle<'_, O>) -> DetailResult {
        Err(ApiError::not_authorized())
    }

    fn update_list(&self, _objects: ObjectSet<O>, _bundle: &Bundle<'_, O>) -> ListResult<O> {
        Err(ApiError::not_authorized())
    }

    fn update_detail(&self, _bundle: &Bundle<'_, O>) -> DetailResult {
        Err(ApiError::not_authorized())
    }

    fn delete_list(&self, _objects: ObjectSet<O>, _bundle: &Bundle<'_, O>) -> ListResult<O> {
        Err(ApiError::not_authorized())
    }

    fn delete_detail(&self, _bundle: &Bundle<'_, O>) -> DetailResult {
        Err(ApiError::not_authorized())
    }
}

/// Checks named permissions of the form `{action}-{resource}`
///
/// `read_list` on resource `page` requires `read-page`, `delete_detail`
/// requires `delete-page`, and so on. List and detail checks share the same
/// permission name. A bundle without a request or resource is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AclAuthorization;

impl AclAuthorization {
    pub fn permission_name(action: &str, resource: &str) -> String {
        format!("{action}-{resource}")
    }

    fn check<O>(&self, action: &str, bundle: &Bundle<'_, O>) -> Result<(), ApiError> {
        let (Some(request), Some(resource)) = (bundle.request, bundle.resource) else {
            return Err(ApiError::not_authorized());
        };

        let permission = Self::permission_name(action, resource);
        if request.has_permission(&permission) {
            Ok(())
        } else {
            tracing::debug!(
                resource,
                permission = %permission,
                user = ?request.user().map(|user| &user.username),
                "permission denied"
            );
            Err(ApiError::not_authorized().with_entity_type(resource))
        }
    }
}

impl<O> Authorization<O> for AclAuthorization {
    fn read_list(&self, objects: ObjectSet<O>, bundle: &Bundle<'_, O>) -> ListResult<O> {
        self.check("read", bundle).map(|_| objects)
    }

    fn read_detail(&self, bundle: &Bundle<'_, O>) -> DetailResult {
        self.check("read", bundle).map(|_| true)
    }

    fn create_list(&self, objects: ObjectSet<O>, bundle: &Bundle<'_, O>) -> ListResult<O> {
        self.check("create", bundle).map(|_| objects)
    }

    fn create_detail(&self, bundle: &Bundle<'_, O>) -> DetailResult {
        self.check("create", bundle).map(|_| true)
    }

    fn update_list(&self, objects: ObjectSet<O>, bundle: &Bundle<'_, O>) -> ListResult<O> {
        self.check("update", bundle).map(|_| objects)
    }

    fn update_detail(&self, bundle: &Bundle<'_, O>) -> DetailResult {
        self.check("update", bundle).map(|_| true)
    }

    fn delete_list(&self, objects: ObjectSet<O>, bundle: &Bundle<'_, O>) -> ListResult<O> {
        self.check("delete", bundle).map(|_| objects)
    }

    fn delete_detail(&self, bundle: &Bundle<'_, O>) -> DetailResult {
        self.check("delete", bundle).map(|_| true)
    }
}
