//! Login credential types.

use core::fmt;

use serde::Deserialize;

use super::lenient::optional_text;

/// Maximum length, in characters, of each credential parameter.
pub const MAX_CREDENTIAL_CHARS: usize = 1000;

/// Username and password submitted to `POST /login`.
///
/// Both values are handed to the credential-check procedure untouched apart
/// from length bounding; nothing here hashes or compares them.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, Default, Deserialize)]
pub struct LoginCredentials {
    #[serde(default, deserialize_with = "optional_text")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub password: Option<String>,
}

impl LoginCredentials {
    /// Username cut to [`MAX_CREDENTIAL_CHARS`].
    #[must_use]
    pub fn bounded_username(&self) -> Option<&str> {
        self.username
            .as_deref()
            .map(|s| truncate_chars(s, MAX_CREDENTIAL_CHARS))
    }

    /// Password cut to [`MAX_CREDENTIAL_CHARS`].
    #[must_use]
    pub fn bounded_password(&self) -> Option<&str> {
        self.password
            .as_deref()
            .map(|s| truncate_chars(s, MAX_CREDENTIAL_CHARS))
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Cut `s` to at most `max` characters without splitting a character.
#[must_use]
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s.get(..idx).unwrap_or(s),
        None => s,
    }
}
