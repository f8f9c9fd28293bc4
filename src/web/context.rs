//! Per-request view handed to the gate by the host runtime.

use std::collections::HashMap;

use reqwest::Method;

use crate::request::Identity;

/// Read-only view of an inbound request at authorization time.
///
/// `RequestContext` is the primary integration point between a gateway runtime
/// and the gate. It carries simple owned data so that it does not couple to any
/// specific framework's request types; framework code builds one through
/// [`ExtractRequestContext`](super::ExtractRequestContext) or the builder
/// methods below.
///
/// The body is kept as raw bytes and only parsed when a `$body(..)` field spec
/// asks for it.
///
/// # Examples
///
/// ```
/// use rebac_gate::web::RequestContext;
/// use rebac_gate::Identity;
/// use reqwest::Method;
///
/// let ctx = RequestContext::new("req-1", Method::GET, "/items/{id}")
///     .with_identity(Identity::new("user-1"))
///     .with_header("X-Tenant", "acme")
///     .with_param("id", "42");
///
/// assert_eq!(ctx.header("x-tenant"), Some("acme"));
/// assert_eq!(ctx.param("id"), Some("42"));
/// assert_eq!(ctx.identity().map(|i| i.sub.as_str()), Some("user-1"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    request_id: String,
    method: Method,
    /// Route pattern as registered with the router, not the concrete URL
    route_path: String,
    /// Keys are lowercased on insert
    headers: HashMap<String, String>,
    params: HashMap<String, String>,
    body: Option<Vec<u8>>,
    identity: Option<Identity>,
}

impl RequestContext {
    /// Creates a context with no headers, params, body or identity.
    pub fn new(request_id: impl Into<String>, method: Method, route_path: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            method,
            route_path: route_path.into(),
            headers: HashMap::new(),
            params: HashMap::new(),
            body: None,
            identity: None,
        }
    }

    /// Sets the authenticated identity.
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Adds a header. Names are matched case-insensitively.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_header(name, value);
        self
    }

    /// Adds a path parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_param(name, value);
        self
    }

    /// Sets the raw request body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets or clears the authenticated identity in place.
    pub fn set_identity(&mut self, identity: Option<Identity>) {
        self.identity = identity;
    }

    /// Adds a header in place.
    pub fn insert_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
    }

    /// Adds a path parameter in place.
    pub fn insert_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.insert(name.into(), value.into());
    }

    /// Returns the request ID used to correlate log lines and audit events.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the matched route pattern.
    pub fn route_path(&self) -> &str {
        &self.route_path
    }

    /// Looks up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Looks up a path parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Returns the raw body, if the request had one.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Returns the authenticated identity, if present.
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_is_empty() {
        let ctx = RequestContext::new("req-test", Method::POST, "/orders");
        assert_eq!(ctx.request_id(), "req-test");
        assert_eq!(ctx.method(), &Method::POST);
        assert_eq!(ctx.route_path(), "/orders");
        assert!(ctx.identity().is_none());
        assert!(ctx.body().is_none());
        assert!(ctx.header("anything").is_none());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let ctx = RequestContext::new("r", Method::GET, "/").with_header("X-Object-Id", "doc-1");
        assert_eq!(ctx.header("x-object-id"), Some("doc-1"));
        assert_eq!(ctx.header("X-OBJECT-ID"), Some("doc-1"));
    }

    #[test]
    fn param_lookup_is_exact() {
        let ctx = RequestContext::new("r", Method::GET, "/items/{id}").with_param("id", "7");
        assert_eq!(ctx.param("id"), Some("7"));
        assert_eq!(ctx.param("ID"), None);
    }

    #[test]
    fn set_identity_replaces_and_clears() {
        let mut ctx = RequestContext::new("r", Method::GET, "/");
        ctx.set_identity(Some(Identity::new("u1")));
        assert_eq!(ctx.identity().unwrap().sub, "u1");
        ctx.set_identity(None);
        assert!(ctx.identity().is_none());
    }
}
