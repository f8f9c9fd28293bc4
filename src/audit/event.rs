//! Audit event schema.

use std::fmt;

use crate::decision::ResourceTriple;
use crate::error::{Violation, ViolationKind};

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// The policy allowed the request
    Allowed,
    /// The request was denied by policy or for lack of identity
    Denied,
    /// The check could not be completed and failed closed
    Error,
}

impl AuditOutcome {
    /// Classifies a deny: policy verdicts are `Denied`, failures are `Error`.
    pub fn for_violation(kind: ViolationKind) -> Self {
        match kind {
            ViolationKind::Unauthenticated | ViolationKind::NotAuthorized => AuditOutcome::Denied,
            ViolationKind::BodyParseFailure | ViolationKind::AuthorizationError => {
                AuditOutcome::Error
            }
        }
    }
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditOutcome::Allowed => write!(f, "allowed"),
            AuditOutcome::Denied => write!(f, "denied"),
            AuditOutcome::Error => write!(f, "error"),
        }
    }
}

/// One authorization decision, as recorded for audit.
///
/// # Example
///
/// ```
/// use rebac_gate::audit::{AuditEvent, AuditOutcome};
///
/// let event = AuditEvent::new("req-1", Some("user-1"), "GET", "/items/{id}", AuditOutcome::Allowed);
/// assert_eq!(event.subject(), Some("user-1"));
/// assert!(event.reason().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    request_id: String,
    /// None when the request carried no identity
    subject: Option<String>,
    method: String,
    route_path: String,
    outcome: AuditOutcome,
    /// Deny reason, e.g. `not-authorized`
    reason: Option<&'static str>,
    /// The triple sent (or about to be sent) to the decision service
    resource: Option<ResourceTriple>,
}

impl AuditEvent {
    /// Creates an event with the required fields.
    pub fn new(
        request_id: impl Into<String>,
        subject: Option<impl Into<String>>,
        method: impl Into<String>,
        route_path: impl Into<String>,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            subject: subject.map(Into::into),
            method: method.into(),
            route_path: route_path.into(),
            outcome,
            reason: None,
            resource: None,
        }
    }

    /// Records why the request was denied.
    pub fn with_violation(mut self, violation: &Violation) -> Self {
        self.reason = Some(violation.reason());
        self
    }

    /// Records the triple that was checked.
    pub fn with_resource(mut self, resource: ResourceTriple) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Returns the request identifier.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the subject, if authenticated.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the route pattern.
    pub fn route_path(&self) -> &str {
        &self.route_path
    }

    /// Returns the outcome.
    pub fn outcome(&self) -> AuditOutcome {
        self.outcome
    }

    /// Returns the deny reason, if denied.
    pub fn reason(&self) -> Option<&'static str> {
        self.reason
    }

    /// Returns the checked triple, if one was built.
    pub fn resource(&self) -> Option<&ResourceTriple> {
        self.resource.as_ref()
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} {} subject={}",
            self.request_id,
            self.outcome,
            self.method,
            self.route_path,
            self.subject.as_deref().unwrap_or("<none>")
        )?;
        if let Some(reason) = self.reason {
            write!(f, ", reason={reason}")?;
        }
        if let Some(resource) = &self.resource {
            write!(
                f,
                ", resource={}:{}#{}",
                resource.object_type, resource.object_id, resource.relation
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple() -> ResourceTriple {
        ResourceTriple {
            object_type: "endpoint".to_string(),
            object_id: "svc:GET:/a".to_string(),
            relation: "can_invoke".to_string(),
        }
    }

    #[test]
    fn outcome_display() {
        assert_eq!(AuditOutcome::Allowed.to_string(), "allowed");
        assert_eq!(AuditOutcome::Denied.to_string(), "denied");
        assert_eq!(AuditOutcome::Error.to_string(), "error");
    }

    #[test]
    fn failures_classify_as_error() {
        assert_eq!(
            AuditOutcome::for_violation(ViolationKind::NotAuthorized),
            AuditOutcome::Denied
        );
        assert_eq!(
            AuditOutcome::for_violation(ViolationKind::Unauthenticated),
            AuditOutcome::Denied
        );
        assert_eq!(
            AuditOutcome::for_violation(ViolationKind::AuthorizationError),
            AuditOutcome::Error
        );
        assert_eq!(
            AuditOutcome::for_violation(ViolationKind::BodyParseFailure),
            AuditOutcome::Error
        );
    }

    #[test]
    fn display_includes_reason_and_resource() {
        let violation = Violation::new(ViolationKind::NotAuthorized, "no");
        let event = AuditEvent::new("req-9", Some("u9"), "GET", "/a", AuditOutcome::Denied)
            .with_violation(&violation)
            .with_resource(triple());

        let display = event.to_string();
        assert!(display.contains("req-9"));
        assert!(display.contains("reason=not-authorized"));
        assert!(display.contains("resource=endpoint:svc:GET:/a#can_invoke"));
    }

    #[test]
    fn anonymous_event_displays_none() {
        let event = AuditEvent::new("req-anon", None::<String>, "GET", "/", AuditOutcome::Denied);
        assert!(event.subject().is_none());
        assert!(event.to_string().contains("<none>"));
    }
}
