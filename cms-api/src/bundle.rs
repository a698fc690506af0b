//! Transport container passed through the endpoint pipeline
//!
//! A [`Bundle`] pairs a domain object with its JSON representation and the
//! request it belongs to. Detail endpoints move one bundle through
//! authorization, hydration, persistence and dehydration. `collection_get`
//! builds a list bundle whose `items` are detail bundles and whose `meta` is a
//! [`ListMeta`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::RequestContext;
use crate::resource::Resource;

/// Pagination metadata of a list response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMeta {
    pub limit: u64,
    /// URL of the next page, `null` on the last page
    pub next: Option<String>,
    pub page: u64,
    pub num_pages: u64,
    pub previous: Option<String>,
    pub total_count: u64,
}

pub struct Bundle<'a, O> {
    pub obj: Option<O>,
    /// JSON representation; an empty object until hydrated or dehydrated
    pub data: Value,
    pub request: Option<&'a RequestContext>,
    /// Name of the resource the bundle belongs to
    pub resource: Option<&'a str>,
    pub items: Vec<Bundle<'a, O>>,
    pub meta: Option<ListMeta>,
}

impl<'a, O> Bundle<'a, O> {
    /// Bundle with no request or resource attached; `data` defaults to `{}`
    pub fn new(obj: Option<O>, data: Option<Value>) -> Self {
        Self {
            obj,
            data: data.unwrap_or_else(|| Value::Object(Map::new())),
            request: None,
            resource: None,
            items: Vec::new(),
            meta: None,
        }
    }

    /// Bundle bound to a resource and request
    ///
    /// When `obj` is absent the resource's default object is used instead, so
    /// a creation bundle always has something to hydrate into.
    pub fn for_resource<R>(
        resource: &'a R,
        request: &'a RequestContext,
        obj: Option<O>,
        data: Option<Value>,
    ) -> Self
    where
        R: Resource<Object = O>,
    {
        let obj = obj.or_else(|| resource.new_object());
        let mut bundle = Self::new(obj, data);
        bundle.request = Some(request);
        bundle.resource = Some(resource.name());
        bundle
    }

    /// List bundle wrapping already dehydrated item bundles
    pub fn list(items: Vec<Bundle<'a, O>>, meta: ListMeta) -> Self {
        let mut bundle = Self::new(None, None);
        bundle.items = items;
        bundle.meta = Some(meta);
        bundle
    }

    pub fn is_list(&self) -> bool {
        self.meta.is_some()
    }

    /// `{"meta": ..., "items": [...]}` for list bundles, `data` otherwise
    pub fn to_json(&self) -> Value {
        match &self.meta {
            Some(meta) => serde_json::json!({
                "meta": meta,
                "items": self.items.iter().map(Bundle::to_json).collect::<Vec<_>>(),
            }),
            None => self.data.clone(),
        }
    }

    pub fn into_json(self) -> Value {
        match self.meta {
            Some(meta) => serde_json::json!({
                "meta": meta,
                "items": self.items.into_iter().map(Bundle::into_json).collect::<Vec<_>>(),
            }),
            None => self.data,
        }
    }
}

impl<O: fmt::Display> fmt::Display for Bundle<'_, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.obj {
            Some(obj) => write!(f, "<Bundle for obj: '{obj}' and with data: {}>", self.data),
            None => write!(f, "<Bundle for obj: 'None' and with data: {}>", self.data),
        }
    }
}

impl<O: fmt::Debug> fmt::Debug for Bundle<'_, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundle")
            .field("obj", &self.obj)
            .field("data", &self.data)
            .field("resource", &self.resource)
            .field("items", &self.items)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta() -> ListMeta {
        ListMeta {
            limit: 10,
            next: Some("/api/number?page=3".to_string()),
            page: 2,
            num_pages: 100,
            previous: Some("/api/number?page=1".to_string()),
            total_count: 1000,
        }
    }

    #[test]
    fn test_default_data_is_empty_object() {
        let bundle: Bundle<'_, i64> = Bundle::new(None, None);
        assert!(bundle.obj.is_none());
        assert_eq!(bundle.data, json!({}));
        assert!(bundle.request.is_none());
        assert!(!bundle.is_list());
    }

    #[test]
    fn test_detail_json_is_data() {
        let bundle = Bundle::new(Some(10), Some(json!({"id": 10})));
        assert_eq!(bundle.to_json(), json!({"id": 10}));
        assert_eq!(bundle.into_json(), json!({"id": 10}));
    }

    #[test]
    fn test_list_json() {
        let items = vec![
            Bundle::new(Some(10), Some(json!(10))),
            Bundle::new(Some(11), Some(json!(11))),
        ];
        let bundle = Bundle::list(items, meta());

        assert!(bundle.is_list());
        assert_eq!(
            bundle.to_json(),
            json!({
                "meta": {
                    "limit": 10,
                    "next": "/api/number?page=3",
                    "page": 2,
                    "num_pages": 100,
                    "previous": "/api/number?page=1",
                    "total_count": 1000
                },
                "items": [10, 11]
            })
        );
    }

    #[test]
    fn test_display() {
        let bundle = Bundle::new(Some("Page 1"), Some(json!({"id": 1})));
        assert_eq!(
            bundle.to_string(),
            r#"<Bundle for obj: 'Page 1' and with data: {"id":1}>"#
        );

        let bundle: Bundle<'_, String> = Bundle::new(None, None);
        assert_eq!(bundle.to_string(), "<Bundle for obj: 'None' and with data: {}>");
    }
}
