//! Gate configuration.
//!
//! Loaded once at startup, validated, then shared read-only behind an `Arc`
//! across every request evaluation.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::field::{self, FieldSpec};
use crate::secret::Secret;

/// Hosted authorizer decision endpoint.
pub const DEFAULT_AUTHORIZER_URL: &str = "https://authorizer.prod.aserto.com/api/v2/authz/is";

/// Upper bound on config file size.
const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;

/// Immutable gate configuration.
///
/// # Examples
///
/// ```
/// use rebac_gate::PolicyConfig;
///
/// let config = PolicyConfig::from_toml_str(r#"
///     tenant_id = "tenant-1"
///     authorizer_api_key = "key"
///     policy_name = "policy-todo"
///     service_name = "catalog"
///     object_id = "$param(id)"
/// "#).unwrap();
///
/// assert_eq!(config.service_name, "catalog");
/// assert!(config.object_id.is_some());
/// assert_eq!(format!("{:?}", config.authorizer_api_key), "[REDACTED]");
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Tenant sent in the `aserto-tenant-id` header
    pub tenant_id: String,
    /// API key sent as `authorization: basic <key>`
    pub authorizer_api_key: Secret<String>,
    /// Policy name and instance label
    pub policy_name: String,
    /// Canonical service name used in the default object id
    #[serde(default)]
    pub service_name: String,
    /// Override for the object type
    #[serde(default, deserialize_with = "field::deserialize_optional")]
    pub object_type: Option<FieldSpec>,
    /// Override for the object id
    #[serde(default, deserialize_with = "field::deserialize_optional")]
    pub object_id: Option<FieldSpec>,
    /// Override for the relation
    #[serde(default, deserialize_with = "field::deserialize_optional")]
    pub relation: Option<FieldSpec>,
    /// Decision endpoint; defaults to the hosted authorizer
    #[serde(default = "default_authorizer_url")]
    pub authorizer_url: String,
    /// Transport timeouts; unset values fall back to reqwest defaults
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

fn default_authorizer_url() -> String {
    DEFAULT_AUTHORIZER_URL.to_string()
}

/// Optional transport timeouts in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeoutConfig {
    /// TCP/TLS connect timeout
    pub connect_ms: Option<u64>,
    /// Whole-request timeout
    pub request_ms: Option<u64>,
}

impl TimeoutConfig {
    /// Connect timeout as a `Duration`.
    pub fn connect(&self) -> Option<Duration> {
        self.connect_ms.map(Duration::from_millis)
    }

    /// Request timeout as a `Duration`.
    pub fn request(&self) -> Option<Duration> {
        self.request_ms.map(Duration::from_millis)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.connect_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "timeouts.connect_ms must be greater than zero".to_string(),
            ));
        }
        if self.request_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "timeouts.request_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl PolicyConfig {
    /// Builds a config in code with no overrides and default transport settings.
    pub fn new(
        tenant_id: impl Into<String>,
        authorizer_api_key: impl Into<String>,
        policy_name: impl Into<String>,
        service_name: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            authorizer_api_key: Secret::new(authorizer_api_key.into()),
            policy_name: policy_name.into(),
            service_name: service_name.into(),
            object_type: None,
            object_id: None,
            relation: None,
            authorizer_url: default_authorizer_url(),
            timeouts: TimeoutConfig::default(),
        }
    }

    /// Sets the object type override.
    pub fn with_object_type(mut self, spec: Option<FieldSpec>) -> Self {
        self.object_type = spec;
        self
    }

    /// Sets the object id override.
    pub fn with_object_id(mut self, spec: Option<FieldSpec>) -> Self {
        self.object_id = spec;
        self
    }

    /// Sets the relation override.
    pub fn with_relation(mut self, spec: Option<FieldSpec>) -> Self {
        self.relation = spec;
        self
    }

    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when reading, parsing, or validation fails.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid(
                "config file exceeds size limit".to_string(),
            ));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or field specs and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_blank("tenant_id", &self.tenant_id)?;
        if self.authorizer_api_key.is_blank() {
            return Err(ConfigError::Invalid(
                "authorizer_api_key must be set".to_string(),
            ));
        }
        require_non_blank("policy_name", &self.policy_name)?;
        // The service name only feeds the default object id, so it may be
        // omitted when every triple field is overridden.
        let fully_overridden =
            self.object_type.is_some() && self.object_id.is_some() && self.relation.is_some();
        if !fully_overridden {
            require_non_blank("service_name", &self.service_name)?;
        }
        require_non_blank("authorizer_url", &self.authorizer_url)?;
        if !self.authorizer_url.starts_with("https://")
            && !self.authorizer_url.starts_with("http://")
        {
            return Err(ConfigError::Invalid(
                "authorizer_url must be an http(s) URL".to_string(),
            ));
        }
        self.timeouts.validate()
    }
}

fn require_non_blank(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{name} must be set")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        tenant_id = "t1"
        authorizer_api_key = "k1"
        policy_name = "p1"
        service_name = "catalog"
    "#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = PolicyConfig::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.tenant_id, "t1");
        assert_eq!(config.authorizer_api_key.expose_secret(), "k1");
        assert!(config.object_type.is_none());
        assert!(config.object_id.is_none());
        assert!(config.relation.is_none());
        assert_eq!(config.authorizer_url, DEFAULT_AUTHORIZER_URL);
        assert_eq!(config.timeouts, TimeoutConfig::default());
    }

    #[test]
    fn empty_override_means_none() {
        let toml = format!("{MINIMAL}\nrelation = \"\"\n");
        let config = PolicyConfig::from_toml_str(&toml).unwrap();
        assert!(config.relation.is_none());
    }

    #[test]
    fn overrides_are_parsed_at_load() {
        let toml = format!(
            "{MINIMAL}\nobject_type = \"document\"\nobject_id = \"$body(doc.id)\"\nrelation = \"$header(x-rel)\"\n"
        );
        let config = PolicyConfig::from_toml_str(&toml).unwrap();
        assert_eq!(
            config.object_type,
            Some(FieldSpec::Literal("document".to_string()))
        );
        assert!(matches!(config.object_id, Some(FieldSpec::Body(_))));
        assert_eq!(config.relation, Some(FieldSpec::Header("x-rel".to_string())));
    }

    #[test]
    fn malformed_override_fails_fast() {
        let toml = format!("{MINIMAL}\nobject_id = \"$param(id\"\n");
        let err = PolicyConfig::from_toml_str(&toml).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(msg) if msg.contains("unterminated")));
    }

    #[test]
    fn missing_service_name_rejected_without_full_overrides() {
        let toml = r#"
            tenant_id = "t1"
            authorizer_api_key = "k1"
            policy_name = "p1"
            relation = "can_read"
        "#;
        let err = PolicyConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("service_name")));
    }

    #[test]
    fn service_name_optional_with_full_overrides() {
        let toml = r#"
            tenant_id = "t1"
            authorizer_api_key = "k1"
            policy_name = "p1"
            object_type = "document"
            object_id = "$param(id)"
            relation = "can_read"
        "#;
        assert!(PolicyConfig::from_toml_str(toml).is_ok());
    }

    #[test]
    fn blank_api_key_rejected() {
        let config = PolicyConfig::new("t1", "  ", "p1", "svc");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("authorizer_api_key")));
    }

    #[test]
    fn zero_timeout_rejected() {
        let toml = format!("{MINIMAL}\n[timeouts]\nrequest_ms = 0\n");
        let err = PolicyConfig::from_toml_str(&toml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("request_ms")));
    }

    #[test]
    fn timeouts_convert_to_durations() {
        let toml = format!("{MINIMAL}\n[timeouts]\nconnect_ms = 250\nrequest_ms = 1500\n");
        let config = PolicyConfig::from_toml_str(&toml).unwrap();
        assert_eq!(config.timeouts.connect(), Some(Duration::from_millis(250)));
        assert_eq!(config.timeouts.request(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn non_http_url_rejected() {
        let toml = format!("{MINIMAL}\nauthorizer_url = \"ftp://example\"\n");
        assert!(PolicyConfig::from_toml_str(&toml).is_err());
    }

    #[test]
    fn unknown_keys_rejected() {
        let toml = format!("{MINIMAL}\nobjectType = \"x\"\n");
        assert!(matches!(
            PolicyConfig::from_toml_str(&toml),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gate.toml");
        fs::write(&path, MINIMAL).unwrap();
        let config = PolicyConfig::load(&path).unwrap();
        assert_eq!(config.policy_name, "p1");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PolicyConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn debug_never_shows_api_key() {
        let config = PolicyConfig::from_toml_str(MINIMAL).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("\"k1\""));
        assert!(debug.contains("[REDACTED]"));
    }
}
