//! The field-spec mini-language.
//!
//! Each triple field (object type, object id, relation) may be overridden in
//! configuration with one of:
//!
//! | Form              | Meaning                                   |
//! |-------------------|-------------------------------------------|
//! | `""` / missing    | no override, the gate applies its default |
//! | `"literal"`       | the string itself                         |
//! | `"$header(NAME)"` | value of request header `NAME`            |
//! | `"$param(NAME)"`  | value of path parameter `NAME`            |
//! | `"$body(a.b.c)"`  | value at `a.b.c` in the JSON request body |
//!
//! Specs are parsed once when configuration loads. A value that starts with a
//! reference prefix but is not a well-formed reference is rejected there, so
//! malformed specs never reach the request path.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::FieldSpecError;

const HEADER_PREFIX: &str = "$header(";
const PARAM_PREFIX: &str = "$param(";
const BODY_PREFIX: &str = "$body(";

/// A parsed, non-empty field spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSpec {
    /// Used verbatim.
    Literal(String),
    /// Looked up in the request headers (case-insensitive).
    Header(String),
    /// Looked up in the route's path parameters.
    Param(String),
    /// Walked through the JSON request body.
    Body(BodyPath),
}

impl FieldSpec {
    /// Parses a raw configuration value.
    ///
    /// Returns `Ok(None)` for the empty string, which means "no override".
    ///
    /// # Errors
    ///
    /// Returns [`FieldSpecError`] when a `$header(`, `$param(` or `$body(`
    /// reference is unterminated or empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebac_gate::FieldSpec;
    ///
    /// assert_eq!(FieldSpec::parse("").unwrap(), None);
    /// assert_eq!(
    ///     FieldSpec::parse("$header(x-tenant)").unwrap(),
    ///     Some(FieldSpec::Header("x-tenant".to_string()))
    /// );
    /// assert!(FieldSpec::parse("$param(id").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Option<Self>, FieldSpecError> {
        if raw.is_empty() {
            return Ok(None);
        }
        if let Some(rest) = raw.strip_prefix(HEADER_PREFIX) {
            return reference_name(raw, rest).map(|name| Some(FieldSpec::Header(name)));
        }
        if let Some(rest) = raw.strip_prefix(PARAM_PREFIX) {
            return reference_name(raw, rest).map(|name| Some(FieldSpec::Param(name)));
        }
        if let Some(rest) = raw.strip_prefix(BODY_PREFIX) {
            let path = reference_name(raw, rest)?;
            return path.parse::<BodyPath>().map(|p| Some(FieldSpec::Body(p)));
        }
        Ok(Some(FieldSpec::Literal(raw.to_string())))
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSpec::Literal(value) => f.write_str(value),
            FieldSpec::Header(name) => write!(f, "{HEADER_PREFIX}{name})"),
            FieldSpec::Param(name) => write!(f, "{PARAM_PREFIX}{name})"),
            FieldSpec::Body(path) => write!(f, "{BODY_PREFIX}{path})"),
        }
    }
}

/// Strips the closing paren and rejects empty names.
fn reference_name(raw: &str, rest: &str) -> Result<String, FieldSpecError> {
    let name = rest
        .strip_suffix(')')
        .ok_or_else(|| FieldSpecError::Unterminated(raw.to_string()))?;
    if name.is_empty() {
        return Err(FieldSpecError::EmptyName(raw.to_string()));
    }
    Ok(name.to_string())
}

/// A dotted path into a JSON body, e.g. `order.customer.id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyPath {
    segments: Vec<String>,
}

impl BodyPath {
    /// Returns the path components in walk order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl FromStr for BodyPath {
    type Err = FieldSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<String> = s.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(FieldSpecError::EmptyPathSegment(s.to_string()));
        }
        Ok(Self { segments })
    }
}

impl fmt::Display for BodyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// Serde adapter for optional field specs in [`PolicyConfig`](crate::PolicyConfig).
///
/// A missing key and an empty string both mean "no override".
pub(crate) fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<FieldSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(raw) => FieldSpec::parse(&raw).map_err(serde::de::Error::custom),
    }
}
