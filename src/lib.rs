//! Request-time relationship-based authorization for API gateway pipelines.
//!
//! For each authenticated request this crate derives a resource triple
//! (object type, object id, relation), asks a remote policy-decision service
//! whether the caller holds that relation, and allows or blocks the request.
//! Every failure fails closed.
//!
//! # Core Types
//!
//! - [`AuthorizationGate`]: runs the check and returns an [`Outcome`]
//! - [`PolicyConfig`]: immutable configuration, loaded from TOML at startup
//! - [`FieldSpec`]: per-field overrides (`literal`, `$header(..)`, `$param(..)`, `$body(..)`)
//! - [`FieldResolver`]: resolves field specs against one request
//! - [`web::RequestContext`]: the read-only request view supplied by the host
//! - [`DecisionClient`]: seam to the policy-decision service
//! - [`Secret<T>`]: keeps the authorizer API key out of logs
//!
//! # Default triple
//!
//! With no overrides configured the gate checks:
//!
//! ```text
//! object_type = "endpoint"
//! object_id   = "{service_name}:{METHOD}:{route pattern}"
//! relation    = "can_invoke"
//! ```
//!
//! # Examples
//!
//! ```
//! use rebac_gate::{AuthorizationGate, Identity, PolicyConfig};
//! use rebac_gate::web::RequestContext;
//! use reqwest::Method;
//! use std::sync::Arc;
//!
//! let config = PolicyConfig::from_toml_str(r#"
//!     tenant_id = "tenant-1"
//!     authorizer_api_key = "key"
//!     policy_name = "policy-todo"
//!     service_name = "catalog"
//! "#).expect("valid config");
//!
//! let gate = AuthorizationGate::from_config(Arc::new(config)).expect("client builds");
//! let ctx = RequestContext::new("req-1", Method::GET, "/items/{id}")
//!     .with_identity(Identity::new("user-1"));
//!
//! let triple = gate.resource_triple(&ctx).expect("no body overrides");
//! assert_eq!(triple.object_id, "catalog:GET:/items/{id}");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
mod client;
mod config;
pub mod decision;
mod error;
mod field;
mod gate;
mod logging;
pub mod problem;
mod request;
mod resolver;
mod secret;
pub mod web;

pub use client::{DecisionClient, HttpDecisionClient, TENANT_ID_HEADER};
pub use config::{PolicyConfig, TimeoutConfig, DEFAULT_AUTHORIZER_URL};
pub use error::{ClientError, ConfigError, FieldSpecError, Violation, ViolationKind};
pub use field::{BodyPath, FieldSpec};
pub use gate::{AuthorizationGate, Outcome};
pub use request::Identity;
pub use resolver::FieldResolver;
pub use secret::Secret;
