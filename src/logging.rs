use std::fmt;

use crate::decision::ResourceTriple;
use crate::error::{Violation, ViolationKind};

/// Request-scoped logging facade for one evaluation.
///
/// `GateLog` borrows the request id and subject from the evaluation so every
/// line it emits is correlated without the caller repeating fields. It is
/// lifetime-bound to the evaluation and cannot outlive it.
///
/// The API key is never in scope here: callers only pass triples, violations,
/// and formatted messages built from request data.
#[derive(Debug, Clone, Copy)]
pub struct GateLog<'a> {
    request_id: &'a str,
    subject: Option<&'a str>,
}

impl<'a> GateLog<'a> {
    /// Creates a logger for one evaluation.
    pub(crate) fn new(request_id: &'a str, subject: Option<&'a str>) -> Self {
        Self {
            request_id,
            subject,
        }
    }

    /// Logs a debug-level message with request context.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(request_id = %self.request_id, subject = ?self.subject, "{}", args);
    }

    /// Logs an allow with the triple the verdict was given for.
    pub fn allowed(&self, resource: &ResourceTriple) {
        tracing::info!(
            request_id = %self.request_id,
            subject = ?self.subject,
            object_type = %resource.object_type,
            object_id = %resource.object_id,
            relation = %resource.relation,
            "request allowed"
        );
    }

    /// Logs a deny with the triple that was attempted, if one was built.
    ///
    /// Policy verdicts log at warn; failures that forced a fail-closed deny
    /// log at error.
    pub fn denied(&self, violation: &Violation, resource: Option<&ResourceTriple>) {
        let object_type = resource.map(|r| r.object_type.as_str());
        let object_id = resource.map(|r| r.object_id.as_str());
        let relation = resource.map(|r| r.relation.as_str());
        match violation.kind {
            ViolationKind::Unauthenticated | ViolationKind::NotAuthorized => {
                tracing::warn!(
                    request_id = %self.request_id,
                    subject = ?self.subject,
                    reason = violation.reason(),
                    object_type = ?object_type,
                    object_id = ?object_id,
                    relation = ?relation,
                    "request denied: {}",
                    violation.message
                );
            }
            ViolationKind::BodyParseFailure | ViolationKind::AuthorizationError => {
                tracing::error!(
                    request_id = %self.request_id,
                    subject = ?self.subject,
                    reason = violation.reason(),
                    object_type = ?object_type,
                    object_id = ?object_id,
                    relation = ?relation,
                    "request denied: {}",
                    violation.message
                );
            }
        }
    }
}
