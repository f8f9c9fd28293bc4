//! Gateway integration surface.
//!
//! This module is the boundary between a gateway runtime and the gate:
//! - [`RequestContext`]: the read-only request view the gate evaluates
//! - [`ExtractRequestContext`]: implemented by framework-specific request types
//!
//! There is no framework dependency here and no global state. The host builds
//! a context per request, runs its authentication step to attach an
//! [`Identity`](crate::Identity), and hands the context to
//! [`AuthorizationGate`](crate::AuthorizationGate).
//!
//! # Integration Flow
//!
//! ```text
//! HTTP Request
//!   ↓
//! Host authentication sets the identity
//!   ↓
//! ExtractRequestContext::extract_request_context()
//!   ↓
//! AuthorizationGate::authorize()
//!   ↓
//! Outcome::Allow(ctx) → forward upstream
//! Outcome::Deny(violation) → render 401/403 problem response
//! ```

mod context;
mod extract;

pub use context::RequestContext;
pub use extract::ExtractRequestContext;
