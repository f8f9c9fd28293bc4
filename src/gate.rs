use std::sync::Arc;

use crate::{
    audit::{AuditEvent, AuditOutcome, AuditSink, TracingAuditSink},
    client::{DecisionClient, HttpDecisionClient},
    config::PolicyConfig,
    decision::{DecisionRequest, ResourceTriple, DEFAULT_OBJECT_TYPE, DEFAULT_RELATION},
    error::{ClientError, Violation, ViolationKind},
    logging::GateLog,
    resolver::FieldResolver,
    web::{ExtractRequestContext, RequestContext},
};

/// Result of one authorization check.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Forward the request upstream; this is the caller's request, unchanged
    Allow(RequestContext),
    /// Block the request; render `violation.status()` to the client
    Deny(Violation),
}

impl Outcome {
    /// Returns true for [`Outcome::Allow`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, Outcome::Allow(_))
    }

    /// Returns the violation for a deny.
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Outcome::Allow(_) => None,
            Outcome::Deny(v) => Some(v),
        }
    }
}

/// The authorization gate.
///
/// `AuthorizationGate` runs once per inbound request, after authentication
/// and before the request is forwarded upstream. It derives the resource
/// triple for the request, asks the policy-decision service whether the
/// caller holds that relation, and fails closed on every error.
///
/// The gate holds only immutable state and can be shared behind an `Arc`
/// by any number of concurrent requests.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use rebac_gate::{AuthorizationGate, Identity, Outcome, PolicyConfig};
/// use rebac_gate::web::RequestContext;
/// use reqwest::Method;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let config = PolicyConfig::new("tenant-1", "api-key", "policy-todo", "catalog");
/// let gate = AuthorizationGate::from_config(Arc::new(config))?;
///
/// let ctx = RequestContext::new("req-1", Method::GET, "/items/{id}")
///     .with_identity(Identity::new("user-1"));
///
/// match gate.authorize(ctx).await {
///     Outcome::Allow(ctx) => { /* forward ctx upstream */ }
///     Outcome::Deny(violation) => { /* respond with violation.status() */ }
/// }
/// # Ok(())
/// # }
/// ```
pub struct AuthorizationGate<C = HttpDecisionClient> {
    config: Arc<PolicyConfig>,
    client: C,
    audit: Arc<dyn AuditSink>,
}

impl AuthorizationGate<HttpDecisionClient> {
    /// Creates a gate that talks to the configured authorizer over HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the HTTP client cannot be built from the
    /// configuration.
    pub fn from_config(config: Arc<PolicyConfig>) -> Result<Self, ClientError> {
        let client = HttpDecisionClient::from_config(&config)?;
        Ok(Self::new(config, client))
    }
}

impl<C: DecisionClient> AuthorizationGate<C> {
    /// Creates a gate with an explicit decision client.
    ///
    /// Audit events go to [`TracingAuditSink`] until replaced with
    /// [`with_audit_sink`](Self::with_audit_sink).
    pub fn new(config: Arc<PolicyConfig>, client: C) -> Self {
        Self {
            config,
            client,
            audit: Arc::new(TracingAuditSink),
        }
    }

    /// Replaces the audit sink.
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = sink;
        self
    }

    /// Returns the configuration this gate evaluates with.
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Returns the decision client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Default object id: `{service}:{METHOD}:{route pattern}`.
    pub fn canonical_endpoint_id(&self, ctx: &RequestContext) -> String {
        format!(
            "{}:{}:{}",
            self.config.service_name,
            ctx.method(),
            ctx.route_path()
        )
    }

    /// Resolves the triple for `ctx`, applying defaults to absent fields.
    ///
    /// Fields resolve in order object type, object id, relation, and share
    /// one parsed body.
    ///
    /// # Errors
    ///
    /// Returns a [`ViolationKind::BodyParseFailure`] violation when a
    /// `$body(..)` override cannot read the request body.
    pub fn resource_triple(&self, ctx: &RequestContext) -> Result<ResourceTriple, Violation> {
        let mut resolver = FieldResolver::new(ctx);
        let object_type = non_empty(resolver.resolve(self.config.object_type.as_ref())?)
            .unwrap_or_else(|| DEFAULT_OBJECT_TYPE.to_string());
        let object_id = non_empty(resolver.resolve(self.config.object_id.as_ref())?)
            .unwrap_or_else(|| self.canonical_endpoint_id(ctx));
        let relation = non_empty(resolver.resolve(self.config.relation.as_ref())?)
            .unwrap_or_else(|| DEFAULT_RELATION.to_string());
        Ok(ResourceTriple {
            object_type,
            object_id,
            relation,
        })
    }

    /// Authorizes a framework request through its [`ExtractRequestContext`] impl.
    pub async fn authorize_request<R>(&self, request: &R) -> Outcome
    where
        R: ExtractRequestContext + ?Sized,
    {
        self.authorize(request.extract_request_context()).await
    }

    /// Runs the authorization check for one request.
    ///
    /// Never panics and never fails open: unauthenticated requests, body
    /// parse failures, transport failures, and negative verdicts all come
    /// back as [`Outcome::Deny`].
    pub async fn authorize(&self, ctx: RequestContext) -> Outcome {
        let subject = ctx.identity().map(|identity| identity.sub.clone());
        let log = GateLog::new(ctx.request_id(), subject.as_deref());

        let Some(subject) = subject.as_deref() else {
            let violation = Violation::new(
                ViolationKind::Unauthenticated,
                "request has no identity; an authentication step must run before authorization",
            );
            return self.deny(&ctx, log, violation, None);
        };

        let resource = match self.resource_triple(&ctx) {
            Ok(resource) => resource,
            Err(violation) => return self.deny(&ctx, log, violation, None),
        };

        let request =
            DecisionRequest::rebac_check(subject, resource.clone(), &self.config.policy_name);
        log.debug(format_args!("rebac.check request: {request:?}"));

        let response = match self.client.decide(&request).await {
            Ok(response) => response,
            Err(err) => {
                let violation = Violation::new(
                    ViolationKind::AuthorizationError,
                    format!("authorization error for user '{subject}': {err}"),
                );
                return self.deny(&ctx, log, violation, Some(resource));
            }
        };
        log.debug(format_args!("decision response: {response:?}"));

        if !response.is_allowed() {
            let violation = Violation::new(
                ViolationKind::NotAuthorized,
                format!("the user '{subject}' is not authorized to perform this action"),
            );
            return self.deny(&ctx, log, violation, Some(resource));
        }

        log.allowed(&resource);
        self.audit.record(
            &self
                .event(&ctx, subject_of(&ctx), AuditOutcome::Allowed)
                .with_resource(resource),
        );
        Outcome::Allow(ctx)
    }

    fn deny(
        &self,
        ctx: &RequestContext,
        log: GateLog<'_>,
        violation: Violation,
        resource: Option<ResourceTriple>,
    ) -> Outcome {
        log.denied(&violation, resource.as_ref());
        let mut event = self
            .event(
                ctx,
                subject_of(ctx),
                AuditOutcome::for_violation(violation.kind),
            )
            .with_violation(&violation);
        if let Some(resource) = resource {
            event = event.with_resource(resource);
        }
        self.audit.record(&event);
        Outcome::Deny(violation)
    }

    fn event(
        &self,
        ctx: &RequestContext,
        subject: Option<&str>,
        outcome: AuditOutcome,
    ) -> AuditEvent {
        AuditEvent::new(
            ctx.request_id(),
            subject,
            ctx.method().as_str(),
            ctx.route_path(),
            outcome,
        )
    }
}

fn subject_of(ctx: &RequestContext) -> Option<&str> {
    ctx.identity().map(|identity| identity.sub.as_str())
}

/// An empty resolved string counts as absent so defaults still apply.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl<C> std::fmt::Debug for AuthorizationGate<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationGate")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
