//! Resolution of field specs against a live request.

use serde_json::Value;

use crate::error::{Violation, ViolationKind};
use crate::field::{BodyPath, FieldSpec};
use crate::web::RequestContext;

/// Resolves field specs for one evaluation.
///
/// A resolver is created per request and borrows the request context. The
/// JSON body is parsed the first time a `$body(..)` spec needs it and reused
/// for every later spec, so one evaluation parses it at most once.
///
/// # Examples
///
/// ```
/// use rebac_gate::{FieldResolver, FieldSpec};
/// use rebac_gate::web::RequestContext;
/// use reqwest::Method;
///
/// let ctx = RequestContext::new("req-1", Method::POST, "/orders")
///     .with_body(r#"{"order":{"id":"o-7"}}"#);
/// let mut resolver = FieldResolver::new(&ctx);
///
/// let spec = FieldSpec::parse("$body(order.id)").unwrap();
/// assert_eq!(resolver.resolve(spec.as_ref()).unwrap(), Some("o-7".to_string()));
/// ```
#[derive(Debug)]
pub struct FieldResolver<'a> {
    ctx: &'a RequestContext,
    body: Option<Value>,
    #[cfg(test)]
    body_parses: usize,
}

impl<'a> FieldResolver<'a> {
    /// Creates a resolver for one request.
    pub fn new(ctx: &'a RequestContext) -> Self {
        Self {
            ctx,
            body: None,
            #[cfg(test)]
            body_parses: 0,
        }
    }

    /// Resolves a spec to its runtime value.
    ///
    /// Returns `Ok(None)` when there is no spec or the referenced value is
    /// absent; the caller applies its default in that case.
    ///
    /// # Errors
    ///
    /// Returns a [`ViolationKind::BodyParseFailure`] violation when a
    /// `$body(..)` spec is used and the body is missing or not valid JSON.
    pub fn resolve(&mut self, spec: Option<&FieldSpec>) -> Result<Option<String>, Violation> {
        let Some(spec) = spec else {
            return Ok(None);
        };
        match spec {
            FieldSpec::Literal(value) => Ok(Some(value.clone())),
            FieldSpec::Header(name) => Ok(self.ctx.header(name).map(str::to_string)),
            FieldSpec::Param(name) => Ok(self.ctx.param(name).map(str::to_string)),
            FieldSpec::Body(path) => {
                let body = self.parsed_body()?;
                Ok(walk(body, path).and_then(scalar_to_string))
            }
        }
    }

    #[cfg(test)]
    fn body_parse_count(&self) -> usize {
        self.body_parses
    }

    fn parsed_body(&mut self) -> Result<&Value, Violation> {
        if self.body.is_none() {
            let raw = self.ctx.body().ok_or_else(|| {
                Violation::new(
                    ViolationKind::BodyParseFailure,
                    "request has no body to read a $body() field from",
                )
            })?;
            #[cfg(test)]
            {
                self.body_parses += 1;
            }
            let parsed: Value = serde_json::from_slice(raw).map_err(|err| {
                Violation::new(
                    ViolationKind::BodyParseFailure,
                    format!("request body is not valid JSON: {err}"),
                )
            })?;
            self.body = Some(parsed);
        }
        match &self.body {
            Some(body) => Ok(body),
            None => Err(Violation::new(
                ViolationKind::BodyParseFailure,
                "request body unavailable",
            )),
        }
    }
}

/// Walks `path` through nested objects.
///
/// A missing key or a non-object along the way yields `None`.
pub(crate) fn walk<'v>(root: &'v Value, path: &BodyPath) -> Option<&'v Value> {
    path.segments()
        .iter()
        .try_fold(root, |node, segment| node.as_object()?.get(segment))
}

/// Strings pass through; numbers and booleans use their JSON text.
/// Null, objects and arrays are not usable identifiers.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
