//! Credential handling with secure memory.
//!
//! Uses the `secrecy` crate to prevent accidental logging of sensitive
//! values (model API keys, host access tokens, image search keys).

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

/// A secret string that won't be logged or displayed.
///
/// Uses `secrecy::SecretBox` so credentials never show up in logs,
/// debug output, or error messages.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    /// Create a new secret string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Expose the secret value for use.
    ///
    /// Only call this at the point of an actual API request.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose().to_string())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Credentials for the publishing host.
#[derive(Clone)]
pub struct HostCredentials {
    /// Blog/site identifier on the host
    pub blog_id: String,

    /// OAuth access token (secret)
    pub access_token: SecretString,
}

impl HostCredentials {
    /// Create new host credentials.
    pub fn new(blog_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            blog_id: blog_id.into(),
            access_token: SecretString::new(access_token),
        }
    }
}

impl fmt::Debug for HostCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostCredentials")
            .field("blog_id", &self.blog_id)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_not_in_debug() {
        let secret = SecretString::new("ya29-super-secret-token");
        let debug = format!("{:?}", secret);
        assert!(!debug.contains("ya29"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_secret_not_in_display() {
        let secret = SecretString::new("ya29-super-secret-token");
        let display = format!("{}", secret);
        assert!(!display.contains("ya29"));
        assert!(display.contains("[REDACTED]"));
    }

    #[test]
    fn test_expose_works() {
        let secret = SecretString::new("ya29-super-secret-token");
        assert_eq!(secret.expose(), "ya29-super-secret-token");
    }

    #[test]
    fn test_host_credentials_debug() {
        let creds = HostCredentials::new("8675309", "ya29-secret");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("ya29-secret"));
        assert!(debug.contains("8675309"));
    }
}
