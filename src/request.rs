//! Inbound request data handed to the invoker.
//!
//! [`RequestContext`] holds what the router and request-construction collaborators
//! resolved: path, query and header maps plus a [`RequestBody`]. It deserializes directly
//! from a gateway event, so a host can feed the event JSON through `serde_json`.

use http::Method;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

/// Payload of an inbound request as handed over by the request-construction collaborator.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    /// No payload
    #[default]
    Empty,
    /// Raw text, not yet parsed
    Text(String),
    /// Payload already decoded into a structure
    Structured(Value),
}

impl RequestBody {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, RequestBody::Empty)
    }
}

impl<'de> Deserialize<'de> for RequestBody {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => RequestBody::Empty,
            Value::String(text) => RequestBody::Text(text),
            other => RequestBody::Structured(other),
        })
    }
}

/// Resolved inbound request data available for binding.
///
/// Deserializes from the gateway event shape:
///
/// ```json
/// {
///   "method": "POST",
///   "pathTemplate": "/{id}",
///   "path": { "id": "123" },
///   "querystring": { "query1": "test3" },
///   "header": {},
///   "requestBody": { "id": "456" },
///   "requestId": "01ARZ3NDEKTSV4RRFFQ69G5FAV"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    /// HTTP method, informational only
    #[serde(default, deserialize_with = "method_from_str")]
    pub method: Option<Method>,
    /// Route template the router matched, informational only
    #[serde(default)]
    pub path_template: Option<String>,
    /// Path parameters extracted by the router
    #[serde(rename = "path", default)]
    pub path_parameters: HashMap<String, String>,
    /// Query string parameters
    #[serde(rename = "querystring", default)]
    pub query_params: HashMap<String, String>,
    /// Request headers
    #[serde(rename = "header", default)]
    pub request_headers: HashMap<String, String>,
    /// Request payload
    #[serde(default)]
    pub request_body: RequestBody,
    /// Correlation id assigned upstream, reused when it is a valid ULID
    #[serde(default)]
    pub request_id: Option<String>,
}

fn method_from_str<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Method>, D::Error> {
    Option::<String>::deserialize(deserializer)?
        .map(|m| Method::from_bytes(m.as_bytes()).map_err(serde::de::Error::custom))
        .transpose()
}

impl RequestContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    #[must_use]
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_parameters.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request_headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.request_body = body;
        self
    }

    #[must_use]
    pub fn with_text_body(self, text: impl Into<String>) -> Self {
        self.with_body(RequestBody::Text(text.into()))
    }

    #[must_use]
    pub fn with_json_body(self, value: Value) -> Self {
        self.with_body(RequestBody::Structured(value))
    }

    #[inline]
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_parameters.get(name).map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    /// Get a header by name: exact match first, then case-insensitive per RFC 7230.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request_headers
            .get(name)
            .or_else(|| {
                self.request_headers
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v)
            })
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_gateway_event() {
        let req: RequestContext = serde_json::from_value(json!({
            "package": "org.example",
            "pathTemplate": "/{id}",
            "method": "GET",
            "requestBody": {},
            "path": { "id": "123" },
            "querystring": { "query1": "test3", "query2": "test" },
            "header": {}
        }))
        .unwrap();
        assert_eq!(req.method, Some(Method::GET));
        assert_eq!(req.path_template.as_deref(), Some("/{id}"));
        assert_eq!(req.path_param("id"), Some("123"));
        assert_eq!(req.query_param("query1"), Some("test3"));
        assert_eq!(req.request_body, RequestBody::Structured(json!({})));
        assert!(req.request_id.is_none());
    }

    #[test]
    fn test_body_shapes() {
        let text: RequestContext =
            serde_json::from_value(json!({ "requestBody": "{\"a\":1}" })).unwrap();
        assert_eq!(text.request_body, RequestBody::Text("{\"a\":1}".into()));

        let null: RequestContext = serde_json::from_value(json!({ "requestBody": null })).unwrap();
        assert!(null.request_body.is_empty());

        let missing: RequestContext = serde_json::from_value(json!({})).unwrap();
        assert!(missing.request_body.is_empty());
        assert!(missing.method.is_none());

        let tagged: RequestContext =
            serde_json::from_value(json!({ "requestId": "01ARZ3NDEKTSV4RRFFQ69G5FAV" })).unwrap();
        assert_eq!(tagged.request_id.as_deref(), Some("01ARZ3NDEKTSV4RRFFQ69G5FAV"));
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = RequestContext::new().with_header("X-Trace-Id", "abc");
        assert_eq!(req.header("X-Trace-Id"), Some("abc"));
        assert_eq!(req.header("x-trace-id"), Some("abc"));
        assert_eq!(req.header("x-other"), None);
    }
}
