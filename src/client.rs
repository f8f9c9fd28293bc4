//! Client for the remote policy-decision service.
//!
//! The gate talks to the service through the [`DecisionClient`] trait so that
//! hosts can swap transports and tests can script verdicts. The production
//! implementation is [`HttpDecisionClient`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;

use crate::config::PolicyConfig;
use crate::decision::{DecisionRequest, DecisionResponse};
use crate::error::ClientError;

/// Header carrying the authorizer tenant.
pub const TENANT_ID_HEADER: &str = "aserto-tenant-id";

/// Policy-decision service interface.
#[async_trait]
pub trait DecisionClient: Send + Sync {
    /// Submits a decision request and returns the decoded reply.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call cannot be completed, the service
    /// answers with a non-success status, or the reply cannot be decoded.
    async fn decide(&self, request: &DecisionRequest) -> Result<DecisionResponse, ClientError>;
}

/// reqwest-backed client for the hosted authorizer.
///
/// # Invariants
/// - Tenant and credential headers are built once, at construction.
/// - The API key never appears in `Debug` output.
pub struct HttpDecisionClient {
    endpoint: String,
    headers: HeaderMap,
    client: Client,
}

impl HttpDecisionClient {
    /// Builds a client from the gate configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the tenant id or API key are not valid
    /// header values, or the HTTP client cannot be built.
    pub fn from_config(config: &PolicyConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(connect) = config.timeouts.connect() {
            builder = builder.connect_timeout(connect);
        }
        if let Some(request) = config.timeouts.request() {
            builder = builder.timeout(request);
        }
        let client = builder
            .build()
            .map_err(|err| ClientError::Build(err.to_string()))?;
        Ok(Self {
            endpoint: config.authorizer_url.clone(),
            headers: build_headers(config)?,
            client,
        })
    }

    /// Returns the decision endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for HttpDecisionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDecisionClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// Builds the fixed request headers for every decision call.
fn build_headers(config: &PolicyConfig) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        TENANT_ID_HEADER,
        HeaderValue::from_str(&config.tenant_id)
            .map_err(|_| ClientError::InvalidHeader(TENANT_ID_HEADER))?,
    );
    let mut auth = HeaderValue::from_str(&format!(
        "basic {}",
        config.authorizer_api_key.expose_secret()
    ))
    .map_err(|_| ClientError::InvalidHeader("authorization"))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);
    Ok(headers)
}

#[async_trait]
impl DecisionClient for HttpDecisionClient {
    async fn decide(&self, request: &DecisionRequest) -> Result<DecisionResponse, ClientError> {
        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .json(request)
            .send()
            .await
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }
        response
            .json::<DecisionResponse>()
            .await
            .map_err(|err| ClientError::Decode(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_carry_tenant_and_basic_key() {
        let config = PolicyConfig::new("tenant-9", "key-9", "p", "svc");
        let headers = build_headers(&config).unwrap();

        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[TENANT_ID_HEADER], "tenant-9");
        assert_eq!(headers[AUTHORIZATION], "basic key-9");
        assert!(headers[AUTHORIZATION].is_sensitive());
    }

    #[test]
    fn invalid_tenant_header_is_rejected() {
        let config = PolicyConfig::new("bad\ntenant", "k", "p", "svc");
        assert!(matches!(
            build_headers(&config),
            Err(ClientError::InvalidHeader(TENANT_ID_HEADER))
        ));
    }

    #[test]
    fn debug_hides_headers() {
        let config = PolicyConfig::new("t", "super-secret-key", "p", "svc");
        let client = HttpDecisionClient::from_config(&config).unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("authorizer.prod.aserto.com"));
        assert!(!debug.contains("super-secret-key"));
    }
}
