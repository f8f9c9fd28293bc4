use serde_json::Value;

/// The authenticated caller, as established by an upstream authentication step.
///
/// The gate only reads `sub`; `claims` carries whatever the authenticator
/// decoded (JWT claims, API-key metadata) for hosts that want it downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    /// Subject identifier sent to the policy-decision service
    pub sub: String,
    /// Raw claims attached by the authenticator, if any
    pub claims: Option<Value>,
}

impl Identity {
    /// Creates an identity with only a subject.
    pub fn new(sub: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            claims: None,
        }
    }

    /// Attaches the authenticator's raw claims.
    pub fn with_claims(mut self, claims: Value) -> Self {
        self.claims = Some(claims);
        self
    }
}
