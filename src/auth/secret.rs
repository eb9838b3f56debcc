//! Redacted wrapper for access, id, and refresh tokens.

// crates.io
use http::HeaderValue;
// self
use crate::{_prelude::*, error::ConfigError};

/// Token string that never prints its contents through `Debug` or `Display`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Builds a sensitive `Bearer <token>` header value.
	pub fn bearer(&self) -> Result<HeaderValue, ConfigError> {
		bearer_header(&self.0)
	}
}
impl From<String> for TokenSecret {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl From<&str> for TokenSecret {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Formats `token` as a sensitive `Authorization` header value.
pub fn bearer_header(token: &str) -> Result<HeaderValue, ConfigError> {
	let mut value =
		HeaderValue::try_from(format!("Bearer {token}")).map_err(|_| ConfigError::InvalidToken)?;

	value.set_sensitive(true);

	Ok(value)
}

/// Extracts the token from a `Bearer <token>` header value.
pub fn parse_bearer(value: &HeaderValue) -> Option<&str> {
	value.to_str().ok()?.strip_prefix("Bearer ").filter(|token| !token.is_empty())
}
