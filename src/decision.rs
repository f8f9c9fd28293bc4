//! Wire model for the policy-decision service.
//!
//! Field names are snake_case on the wire, matching the hosted authorizer's
//! `/api/v2/authz/is` endpoint.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Decision name asked of the policy.
pub const DECISION_ALLOWED: &str = "allowed";

/// Policy path evaluated for relationship checks.
pub const REBAC_CHECK_PATH: &str = "rebac.check";

/// Identity type for subject-identifier identities.
pub const IDENTITY_TYPE_SUB: &str = "IDENTITY_TYPE_SUB";

/// Object type used when no override resolves.
pub const DEFAULT_OBJECT_TYPE: &str = "endpoint";

/// Relation used when no override resolves.
pub const DEFAULT_RELATION: &str = "can_invoke";

/// The (object type, object id, relation) tuple being checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTriple {
    /// Kind of object, e.g. `endpoint`
    pub object_type: String,
    /// Object identifier, e.g. `catalog:GET:/items/{id}`
    pub object_id: String,
    /// Relation the subject must hold on the object
    pub relation: String,
}

/// Payload posted to the policy-decision service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Who is asking
    pub identity_context: IdentityContext,
    /// What is being accessed
    pub resource_context: ResourceTriple,
    /// Which policy decision to evaluate
    pub policy_context: PolicyContext,
    /// Which policy instance to evaluate against
    pub policy_instance: PolicyInstance,
}

impl DecisionRequest {
    /// Builds a `rebac.check` request for `subject` on `resource`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebac_gate::decision::{DecisionRequest, ResourceTriple};
    ///
    /// let triple = ResourceTriple {
    ///     object_type: "endpoint".to_string(),
    ///     object_id: "catalog:GET:/items".to_string(),
    ///     relation: "can_invoke".to_string(),
    /// };
    /// let req = DecisionRequest::rebac_check("user-1", triple, "todo");
    /// assert_eq!(req.policy_context.path, "rebac.check");
    /// assert_eq!(req.policy_instance.instance_label, "todo");
    /// ```
    pub fn rebac_check(
        subject: impl Into<String>,
        resource: ResourceTriple,
        policy_name: impl Into<String>,
    ) -> Self {
        let policy_name = policy_name.into();
        Self {
            identity_context: IdentityContext {
                identity_type: IDENTITY_TYPE_SUB.to_string(),
                identity: subject.into(),
            },
            resource_context: resource,
            policy_context: PolicyContext {
                decisions: vec![DECISION_ALLOWED.to_string()],
                path: REBAC_CHECK_PATH.to_string(),
            },
            policy_instance: PolicyInstance {
                name: policy_name.clone(),
                instance_label: policy_name,
            },
        }
    }
}

/// Caller identity as the service expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityContext {
    /// Always `IDENTITY_TYPE_SUB` for this gate
    #[serde(rename = "type")]
    pub identity_type: String,
    /// Subject identifier
    pub identity: String,
}

/// Decision selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyContext {
    /// Decision names to evaluate
    pub decisions: Vec<String>,
    /// Policy module path
    pub path: String,
}

/// Policy instance selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyInstance {
    /// Policy name
    pub name: String,
    /// Instance label (the policy name for hosted policies)
    pub instance_label: String,
}

/// Reply from the policy-decision service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionResponse {
    /// The first decision record, if any; a missing array decodes as empty
    ///
    /// Only the first record carries the verdict, so later records are
    /// skipped on decode and never fail the reply.
    #[serde(default, deserialize_with = "first_decision")]
    pub decisions: Vec<Decision>,
}

impl DecisionResponse {
    /// True only when the first decision is present and affirmative.
    pub fn is_allowed(&self) -> bool {
        self.decisions.first().is_some_and(|d| d.is)
    }
}

/// One decision record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Decision name, echoed back by the service
    #[serde(default, alias = "id")]
    pub decision: String,
    /// The verdict
    #[serde(default)]
    pub is: bool,
}

fn first_decision<'de, D>(deserializer: D) -> Result<Vec<Decision>, D::Error>
where
    D: Deserializer<'de>,
{
    let records = Vec::<Value>::deserialize(deserializer)?;
    match records.into_iter().next() {
        Some(first) => Decision::deserialize(first)
            .map(|decision| vec![decision])
            .map_err(de::Error::custom),
        None => Ok(Vec::new()),
    }
}
