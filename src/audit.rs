//! Audit records for authorization decisions.
//!
//! Every evaluation produces exactly one [`AuditEvent`], handed to the gate's
//! [`AuditSink`]:
//! - [`TracingAuditSink`]: emits structured tracing events (the default)
//! - [`AuditTrail`]: in-memory recorder for tests and embedders
//!
//! Audit events carry only safe metadata: request id, subject, route, the
//! attempted triple, and the outcome. Credentials and request bodies never
//! reach them.

mod event;
mod sink;
mod trail;

pub use event::{AuditEvent, AuditOutcome};
pub use sink::{AuditSink, TracingAuditSink};
pub use trail::AuditTrail;
