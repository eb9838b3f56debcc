//! Client configuration: base URLs, login entry point, and refresh coordination mode.

// self
use crate::{_prelude::*, error::ConfigError};

/// Default base URL for both the general and the auth API.
pub const DEFAULT_API_URL: &str = "https://api.listbackup.ai";
/// Environment variable overriding the general API base URL.
pub const API_URL_ENV: &str = "NEXT_PUBLIC_API_URL";
/// Environment variable overriding the auth API base URL.
pub const AUTH_API_URL_ENV: &str = "NEXT_PUBLIC_AUTH_API_URL";
/// Default login entry point announced when a session is dropped.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// How concurrent `401` responses share refresh work.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshMode {
	/// One refresh at a time; callers that queued behind a completed rotation reuse its token.
	#[default]
	Coalesced,
	/// Every `401` triggers its own refresh call.
	Independent,
}

/// Settings shared by both client instances.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// General API base URL.
	pub api_url: Url,
	/// Auth API base URL.
	pub auth_api_url: Url,
	/// Path announced through [`SessionEvent::Unauthenticated`](crate::auth::SessionEvent).
	pub login_path: String,
	/// Refresh coordination mode.
	pub refresh_mode: RefreshMode,
}
impl ClientConfig {
	/// Creates a config with explicit base URLs and default login path and refresh mode.
	pub fn new(api_url: Url, auth_api_url: Url) -> Self {
		Self {
			api_url,
			auth_api_url,
			login_path: DEFAULT_LOGIN_PATH.into(),
			refresh_mode: RefreshMode::default(),
		}
	}

	/// Loads base URLs from the process environment, falling back to [`DEFAULT_API_URL`].
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Loads base URLs through `lookup`, treating blank values as unset.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let resolve = |name: &str| {
			let raw = lookup(name)
				.map(|value| value.trim().to_owned())
				.filter(|value| !value.is_empty())
				.unwrap_or_else(|| DEFAULT_API_URL.to_owned());

			parse_base_url(name, &raw)
		};

		Ok(Self::new(resolve(API_URL_ENV)?, resolve(AUTH_API_URL_ENV)?))
	}

	/// Overrides the general API base URL.
	pub fn with_api_url(mut self, url: Url) -> Self {
		self.api_url = url;

		self
	}

	/// Overrides the auth API base URL.
	pub fn with_auth_api_url(mut self, url: Url) -> Self {
		self.auth_api_url = url;

		self
	}

	/// Overrides the login path announced on session loss.
	pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
		self.login_path = path.into();

		self
	}

	/// Overrides the refresh coordination mode.
	pub fn with_refresh_mode(mut self, mode: RefreshMode) -> Self {
		self.refresh_mode = mode;

		self
	}
}

/// Parses a base URL and checks that request paths can be appended to it.
pub fn parse_base_url(name: &str, raw: &str) -> Result<Url, ConfigError> {
	let url = Url::parse(raw)
		.map_err(|source| ConfigError::InvalidUrl { name: name.to_owned(), source })?;

	if url.cannot_be_a_base() {
		return Err(ConfigError::CannotBeABase { url: url.into() });
	}

	Ok(url)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn missing_or_blank_variables_use_default() {
		let config = ClientConfig::from_lookup(|name| match name {
			API_URL_ENV => Some("  ".into()),
			_ => None,
		})
		.expect("Defaults should produce a valid config.");

		assert_eq!(config.api_url.as_str(), "https://api.listbackup.ai/");
		assert_eq!(config.auth_api_url, config.api_url);
		assert_eq!(config.login_path, "/login");
		assert_eq!(config.refresh_mode, RefreshMode::Coalesced);
	}

	#[test]
	fn variables_override_each_base_url() {
		let config = ClientConfig::from_lookup(|name| match name {
			API_URL_ENV => Some("https://api.example.com/v1".into()),
			AUTH_API_URL_ENV => Some("https://auth.example.com".into()),
			_ => None,
		})
		.expect("Overrides should produce a valid config.");

		assert_eq!(config.api_url.as_str(), "https://api.example.com/v1");
		assert_eq!(config.auth_api_url.as_str(), "https://auth.example.com/");
	}

	#[test]
	fn invalid_urls_name_the_variable() {
		let err = ClientConfig::from_lookup(|name| {
			(name == AUTH_API_URL_ENV).then(|| "not a url".to_owned())
		})
		.expect_err("Invalid URL should be rejected.");

		assert!(
			matches!(&err, ConfigError::InvalidUrl { name, .. } if name == AUTH_API_URL_ENV),
			"Unexpected error: {err:?}"
		);
		assert!(matches!(
			parse_base_url("custom", "mailto:ops@listbackup.ai"),
			Err(ConfigError::CannotBeABase { .. })
		));
	}
}
