//! API credentials (§3).

/// An immutable `(key, secret)` pair. An empty key or empty secret is
/// tolerated and represents unauthenticated mode: [`Credentials::is_present`]
/// returns `false`, and a request of a security class requiring credentials
/// will fail fast with [`crate::error::Error::MissingCredentials`] instead of
/// being dispatched with a malformed signature.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    key: String,
    secret: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// The empty-sentinel credential pair: unauthenticated mode.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_present(&self) -> bool {
        !self.key.is_empty() && !self.secret.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}
