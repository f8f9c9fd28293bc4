//! Audit sinks.

use super::AuditEvent;

/// Destination for audit events.
///
/// Sinks are called inline on the request path, so implementations should
/// hand events off quickly rather than block on I/O.
pub trait AuditSink: Send + Sync {
    /// Records one event.
    fn record(&self, event: &AuditEvent);
}

/// Emits audit events as structured tracing events under the `rebac_audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuditEvent) {
        let resource = event.resource();
        tracing::info!(
            target: "rebac_audit",
            request_id = %event.request_id(),
            subject = ?event.subject(),
            method = %event.method(),
            route = %event.route_path(),
            outcome = %event.outcome(),
            reason = ?event.reason(),
            object_type = ?resource.map(|r| r.object_type.as_str()),
            object_id = ?resource.map(|r| r.object_id.as_str()),
            relation = ?resource.map(|r| r.relation.as_str()),
            "authorization decision"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditOutcome;

    #[test]
    fn tracing_sink_does_not_panic_without_subscriber() {
        let event = AuditEvent::new("req-t", Some("u"), "GET", "/", AuditOutcome::Allowed);
        TracingAuditSink.record(&event);
    }
}
