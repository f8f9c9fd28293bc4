use std::fmt;

use serde::{Deserialize, Deserializer};

/// A wrapper that keeps credentials out of logs and formatted output.
///
/// The authorizer API key lives in a `Secret<String>` from the moment the
/// configuration is deserialized until it is written into the outbound
/// `authorization` header. Nothing in between can print it.
///
/// # Security Properties
///
/// - Does NOT implement `Deref`, `AsRef`, `Borrow`, `Clone`, or `Copy`
/// - Debug and Display output is always `[REDACTED]`
/// - Deserializes transparently, so config files need no special syntax
/// - Access requires the explicit [`expose_secret`](Self::expose_secret) call
///
/// # Examples
///
/// ```
/// use rebac_gate::Secret;
///
/// let api_key = Secret::new("aserto-key-123".to_string());
/// assert_eq!(format!("{:?}", api_key), "[REDACTED]");
/// assert_eq!(api_key.expose_secret(), "aserto-key-123");
/// ```
// Do NOT derive Clone or Default: a secret is shared through the Arc'd config, never copied.
pub struct Secret<T> {
    // Must stay private; a public field bypasses redaction (CWE-532).
    inner: T,
}

impl<T> Secret<T> {
    /// Wraps a sensitive value in a `Secret`.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Explicitly exposes the secret value.
    ///
    /// # Security Warning
    ///
    /// The only legitimate caller is the code that builds the outbound
    /// request headers. Never pass the result to a logging macro.
    pub fn expose_secret(&self) -> &T {
        &self.inner
    }
}

impl Secret<String> {
    /// Returns true when the wrapped string is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.inner.trim().is_empty()
    }
}

impl<T> fmt::Debug for Secret<T> {
    /// Unconditionally `[REDACTED]`, even in debug builds.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<T> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Secret<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Secret::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_redacts_debug() {
        let key = Secret::new("hunter2".to_string());
        let debug_output = format!("{:?}", key);

        assert_eq!(debug_output, "[REDACTED]");
        assert!(!debug_output.contains("hunter2"));
        assert!(!debug_output.contains("String"));
    }

    #[test]
    fn secret_redacts_display() {
        let api_key = Secret::new("sk-1234567890");
        let display_output = format!("{}", api_key);

        assert_eq!(display_output, "[REDACTED]");
        assert!(!display_output.contains("sk-"));
    }

    #[test]
    fn secret_deserializes_transparently() {
        #[derive(Deserialize)]
        struct Holder {
            key: Secret<String>,
        }

        let holder: Holder = serde_json::from_str(r#"{"key":"abc"}"#).unwrap();
        assert_eq!(holder.key.expose_secret(), "abc");
    }

    #[test]
    fn blank_detection() {
        assert!(Secret::new("   ".to_string()).is_blank());
        assert!(!Secret::new("k".to_string()).is_blank());
    }
}
