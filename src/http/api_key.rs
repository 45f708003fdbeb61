//! API key newtype.

use std::fmt;

use http::HeaderValue;

/// Secret API key used as a bearer token.
///
/// The `Debug` representation is redacted so keys never reach logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a raw key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the raw key.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Builds the `Authorization: Bearer <key>` header value.
    ///
    /// Returns `None` if the key contains bytes not allowed in a header.
    #[must_use]
    pub fn bearer_header(&self) -> Option<HeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.0)).ok()?;
        value.set_sensitive(true);
        Some(value)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl From<&str> for ApiKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for ApiKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_is_redacted() {
        let key = ApiKey::new("sk_live_secret");

        assert_eq!(format!("{key:?}"), "ApiKey(***)");
    }

    #[test]
    fn bearer_header_is_sensitive() {
        let header = ApiKey::from("sk_test_xxx").bearer_header().unwrap();

        assert_eq!(header, "Bearer sk_test_xxx");
        assert!(header.is_sensitive());
    }

    #[test]
    fn bearer_header_rejects_control_characters() {
        assert!(ApiKey::from("sk\ntest").bearer_header().is_none());
    }
}
