use std::fmt;

use reqwest::StatusCode;

/// A denied authorization check with details about why it was denied.
///
/// Violations are values, not panics: every failure inside the gate is
/// folded into one of these and returned through [`Outcome::Deny`](crate::Outcome).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The kind of violation that occurred
    pub kind: ViolationKind,
    /// Human-readable message explaining the violation
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the stable, machine-readable deny reason.
    pub fn reason(&self) -> &'static str {
        self.kind.reason()
    }

    /// Returns the HTTP status a host should answer with.
    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Violation {}

/// The kind of authorization violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// No identity was attached by an upstream authentication step
    Unauthenticated,
    /// A `$body(..)` field spec was used but the body is not valid JSON
    BodyParseFailure,
    /// The policy-decision service could not be reached or answered garbage
    AuthorizationError,
    /// The policy-decision service returned a negative or missing verdict
    NotAuthorized,
}

impl ViolationKind {
    /// Returns the stable deny reason string for this kind.
    pub fn reason(self) -> &'static str {
        match self {
            ViolationKind::Unauthenticated => "unauthenticated",
            ViolationKind::BodyParseFailure => "body-parse-failure",
            ViolationKind::AuthorizationError => "authorization-error",
            ViolationKind::NotAuthorized => "not-authorized",
        }
    }

    /// Missing identity is a 401; every other deny is a 403.
    pub fn status(self) -> StatusCode {
        match self {
            ViolationKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ViolationKind::BodyParseFailure
            | ViolationKind::AuthorizationError
            | ViolationKind::NotAuthorized => StatusCode::FORBIDDEN,
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Errors produced while parsing a field spec at configuration time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldSpecError {
    /// A `$header(`, `$param(` or `$body(` reference is missing its closing paren.
    #[error("unterminated reference in field spec '{0}'")]
    Unterminated(String),
    /// The reference has nothing between the parens.
    #[error("empty reference name in field spec '{0}'")]
    EmptyName(String),
    /// A body path such as `a..b` has an empty segment.
    #[error("empty segment in body path '{0}'")]
    EmptyPathSegment(String),
}

/// Configuration loading and validation failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<FieldSpecError> for ConfigError {
    fn from(err: FieldSpecError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

/// Failures talking to the policy-decision service.
///
/// The gate maps every variant to [`ViolationKind::AuthorizationError`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP client could not be constructed.
    #[error("decision client build failed: {0}")]
    Build(String),
    /// A header value (tenant id or API key) is not a valid HTTP header.
    #[error("invalid header value for {0}")]
    InvalidHeader(&'static str),
    /// The request could not be completed.
    #[error("decision request failed: {0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("decision service returned status {0}")]
    Status(u16),
    /// The response body could not be decoded.
    #[error("decision response could not be decoded: {0}")]
    Decode(String),
}
