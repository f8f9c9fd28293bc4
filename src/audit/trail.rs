//! In-memory audit trail recorder.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{AuditEvent, AuditSink};

/// In-memory recorder for audit events.
///
/// Stores events in arrival order. Useful in tests and for hosts that drain
/// events to their own store.
///
/// # Example
///
/// ```
/// use rebac_gate::audit::{AuditEvent, AuditOutcome, AuditSink, AuditTrail};
///
/// let trail = AuditTrail::new();
/// trail.record(&AuditEvent::new("req-1", Some("u1"), "GET", "/", AuditOutcome::Allowed));
///
/// assert_eq!(trail.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct AuditTrail {
    events: Mutex<Vec<AuditEvent>>,
}

impl AuditTrail {
    /// Creates a new empty audit trail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.lock().clone()
    }

    /// Returns the number of recorded events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Clears all recorded events.
    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock cannot leave a Vec half-pushed.
    fn lock(&self) -> MutexGuard<'_, Vec<AuditEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AuditSink for AuditTrail {
    fn record(&self, event: &AuditEvent) {
        self.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditOutcome;

    fn event(id: &str, outcome: AuditOutcome) -> AuditEvent {
        AuditEvent::new(id, Some("user-1"), "GET", "/items", outcome)
    }

    #[test]
    fn audit_trail_starts_empty() {
        let trail = AuditTrail::new();
        assert!(trail.is_empty());
        assert_eq!(trail.len(), 0);
    }

    #[test]
    fn audit_trail_records_in_order() {
        let trail = AuditTrail::new();
        trail.record(&event("req-1", AuditOutcome::Allowed));
        trail.record(&event("req-2", AuditOutcome::Denied));

        let events = trail.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].request_id(), "req-1");
        assert_eq!(events[1].outcome(), AuditOutcome::Denied);
    }

    #[test]
    fn audit_trail_can_be_cleared() {
        let trail = AuditTrail::new();
        trail.record(&event("req-1", AuditOutcome::Error));
        trail.clear();
        assert!(trail.is_empty());
    }

    #[test]
    fn audit_trail_is_shareable_across_threads() {
        let trail = std::sync::Arc::new(AuditTrail::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let trail = trail.clone();
                std::thread::spawn(move || {
                    trail.record(&event(&format!("req-{i}"), AuditOutcome::Allowed));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(trail.len(), 4);
    }
}
