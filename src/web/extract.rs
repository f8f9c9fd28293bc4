//! Extraction boundary trait for gateway integration.

use super::RequestContext;

/// Builds a [`RequestContext`] from a framework-specific request.
///
/// This trait is the boundary between a gateway runtime's request type and
/// the gate. Implementations should:
/// - copy headers and matched path parameters
/// - report the route *pattern* (e.g. `/items/{id}`), not the concrete path
/// - attach the identity set by the authentication step, if any
/// - hand over the raw body bytes without parsing them
///
/// It intentionally does NOT authorize anything; that is
/// [`AuthorizationGate`](crate::AuthorizationGate)'s job.
///
/// # Examples
///
/// ```
/// use rebac_gate::web::{ExtractRequestContext, RequestContext};
/// use rebac_gate::Identity;
/// use reqwest::Method;
///
/// struct MyFrameworkRequest {
///     id: String,
///     route: String,
///     user: Option<String>,
/// }
///
/// impl ExtractRequestContext for MyFrameworkRequest {
///     fn extract_request_context(&self) -> RequestContext {
///         let mut ctx = RequestContext::new(self.id.clone(), Method::GET, self.route.clone());
///         ctx.set_identity(self.user.as_ref().map(Identity::new));
///         ctx
///     }
/// }
/// ```
pub trait ExtractRequestContext {
    /// Produces the read-only view the gate evaluates.
    fn extract_request_context(&self) -> RequestContext;
}

impl ExtractRequestContext for RequestContext {
    fn extract_request_context(&self) -> RequestContext {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Identity;
    use reqwest::Method;

    struct TestRequest {
        id: String,
        user: Option<String>,
        tenant_header: Option<String>,
    }

    impl ExtractRequestContext for TestRequest {
        fn extract_request_context(&self) -> RequestContext {
            let mut ctx = RequestContext::new(self.id.clone(), Method::DELETE, "/docs/{doc}");
            ctx.set_identity(self.user.as_ref().map(Identity::new));
            if let Some(tenant) = &self.tenant_header {
                ctx.insert_header("X-Tenant", tenant.clone());
            }
            ctx.insert_param("doc", "d-9");
            ctx
        }
    }

    #[test]
    fn framework_request_maps_to_context() {
        let req = TestRequest {
            id: "test-1".to_string(),
            user: Some("alice".to_string()),
            tenant_header: Some("acme".to_string()),
        };

        let ctx = req.extract_request_context();
        assert_eq!(ctx.request_id(), "test-1");
        assert_eq!(ctx.method(), &Method::DELETE);
        assert_eq!(ctx.identity().unwrap().sub, "alice");
        assert_eq!(ctx.header("x-tenant"), Some("acme"));
        assert_eq!(ctx.param("doc"), Some("d-9"));
    }

    #[test]
    fn missing_user_maps_to_no_identity() {
        let req = TestRequest {
            id: "test-2".to_string(),
            user: None,
            tenant_header: None,
        };

        assert!(req.extract_request_context().identity().is_none());
    }

    #[test]
    fn context_extracts_to_itself() {
        let ctx = RequestContext::new("r", Method::GET, "/").with_param("a", "b");
        assert_eq!(ctx.extract_request_context(), ctx);
    }
}
