//! RFC 7807 problem details for denied requests.
//!
//! The gate does not render HTTP responses itself. Hosts without their own
//! problem-response convention can serialize [`ProblemDetails`] as the body
//! of the 401/403 they return.

use serde::Serialize;

use crate::error::{Violation, ViolationKind};

/// Problem-details body (`application/problem+json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemDetails {
    /// Problem type URI
    #[serde(rename = "type")]
    pub problem_type: String,
    /// Short summary of the status
    pub title: String,
    /// HTTP status code
    pub status: u16,
    /// Human-readable explanation
    pub detail: String,
    /// Request that produced the problem
    pub instance: String,
}

/// Content type for problem-details bodies.
pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

impl ProblemDetails {
    /// Builds the problem body for a deny.
    ///
    /// The detail is generic on purpose: it tells the caller what happened
    /// without echoing policy or transport internals.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebac_gate::problem::ProblemDetails;
    /// use rebac_gate::{Violation, ViolationKind};
    ///
    /// let v = Violation::new(ViolationKind::NotAuthorized, "policy said no");
    /// let problem = ProblemDetails::from_violation(&v, "req-1");
    /// assert_eq!(problem.status, 403);
    /// assert_eq!(problem.title, "Forbidden");
    /// ```
    pub fn from_violation(violation: &Violation, request_id: &str) -> Self {
        let status = violation.status();
        let (problem_type, detail) = match violation.kind {
            ViolationKind::Unauthenticated => (
                "https://httpproblems.com/http-status/401",
                "Authentication is required to access this resource.",
            ),
            ViolationKind::BodyParseFailure
            | ViolationKind::AuthorizationError
            | ViolationKind::NotAuthorized => (
                "https://httpproblems.com/http-status/403",
                "You are not authorized to perform this action.",
            ),
        };
        Self {
            problem_type: problem_type.to_string(),
            title: status.canonical_reason().unwrap_or("Forbidden").to_string(),
            status: status.as_u16(),
            detail: detail.to_string(),
            instance: request_id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unauthenticated_is_401_problem() {
        let v = Violation::new(ViolationKind::Unauthenticated, "missing identity");
        let problem = ProblemDetails::from_violation(&v, "req-401");
        assert_eq!(problem.status, 401);
        assert_eq!(problem.title, "Unauthorized");
        assert_eq!(problem.instance, "req-401");
    }

    #[test]
    fn transport_failure_does_not_leak_message() {
        let v = Violation::new(
            ViolationKind::AuthorizationError,
            "connection refused to 10.0.0.1",
        );
        let problem = ProblemDetails::from_violation(&v, "req-x");
        assert_eq!(problem.status, 403);
        assert!(!problem.detail.contains("10.0.0.1"));
    }

    #[test]
    fn serializes_type_field() {
        let v = Violation::new(ViolationKind::NotAuthorized, "no");
        let value = serde_json::to_value(ProblemDetails::from_violation(&v, "r")).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "https://httpproblems.com/http-status/403",
                "title": "Forbidden",
                "status": 403,
                "detail": "You are not authorized to perform this action.",
                "instance": "r"
            })
        );
    }
}
