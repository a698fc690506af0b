//! Authentication policies
//!
//! A policy answers two questions about a request: is the caller
//! authenticated, and what identifier should appear in logs for them.

use std::fmt;

use crate::context::RequestContext;

pub trait Authentication: Send + Sync + fmt::Debug {
    fn is_authenticated(&self, request: &RequestContext) -> bool;

    /// Identifier of the caller, used for request logging
    fn get_identifier(&self, request: &RequestContext) -> Option<String>;
}

/// Treats every caller as authenticated and never names them; the default policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllowAll;

impl Authentication for AllowAll {
    fn is_authenticated(&self, _request: &RequestContext) -> bool {
        true
    }

    fn get_identifier(&self, _request: &RequestContext) -> Option<String> {
        None
    }
}

/// Requires a logged-in user, as resolved from the session by upstream middleware
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionAuthentication;

impl Authentication for SessionAuthentication {
    fn is_authenticated(&self, request: &RequestContext) -> bool {
        request.user().is_some()
    }

    fn get_identifier(&self, request: &RequestContext) -> Option<String> {
        request.user().map(|user| user.username.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Principal;

    #[test]
    fn test_allow_all() {
        let anonymous = RequestContext::new();
        assert!(AllowAll.is_authenticated(&anonymous));
        assert_eq!(AllowAll.get_identifier(&anonymous), None);
    }

    #[test]
    fn test_allow_all_has_no_identifier_for_logged_in_user() {
        let request = RequestContext::new().with_user(Principal::new(1, "admin"));
        assert!(AllowAll.is_authenticated(&request));
        assert_eq!(AllowAll.get_identifier(&request), None);
    }

    #[test]
    fn test_session_anonymous() {
        let request = RequestContext::new();
        assert!(!SessionAuthentication.is_authenticated(&request));
        assert_eq!(SessionAuthentication.get_identifier(&request), None);
    }

    #[test]
    fn test_session_logged_in() {
        let request = RequestContext::new().with_user(Principal::new(1, "admin"));
        assert!(SessionAuthentication.is_authenticated(&request));
        assert_eq!(
            SessionAuthentication.get_identifier(&request),
            Some("admin".to_string())
        );
    }
}
