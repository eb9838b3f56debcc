//! Session tokens issued by the auth service.

// self
use crate::{_prelude::*, api::{AccountId, UserId}, auth::TokenSecret};

/// Tokens returned by login, register, and refresh calls.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
	/// Bearer credential attached to API calls.
	pub access_token: TokenSecret,
	/// Identity token, when the auth service issues one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id_token: Option<TokenSecret>,
	/// Long-lived credential exchanged for new access tokens.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<TokenSecret>,
	/// Access token lifetime in seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expires_in: Option<u64>,
	/// Token type reported by the auth service (usually `Bearer`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token_type: Option<String>,
}
impl Session {
	/// Creates a session holding only an access token.
	pub fn new(access_token: impl Into<TokenSecret>) -> Self {
		Self {
			access_token: access_token.into(),
			id_token: None,
			refresh_token: None,
			expires_in: None,
			token_type: None,
		}
	}

	/// Attaches a refresh token.
	pub fn with_refresh_token(mut self, refresh_token: impl Into<TokenSecret>) -> Self {
		self.refresh_token = Some(refresh_token.into());

		self
	}

	/// Computes the expiry instant relative to `issued_at`, if the lifetime is known.
	///
	/// The client never acts on this value; expiry is discovered through `401` responses.
	pub fn expires_at(&self, issued_at: OffsetDateTime) -> Option<OffsetDateTime> {
		let secs = i64::try_from(self.expires_in?).ok()?;

		issued_at.checked_add(Duration::seconds(secs))
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session")
			.field("access_token", &"<redacted>")
			.field("id_token_set", &self.id_token.is_some())
			.field("refresh_token_set", &self.refresh_token.is_some())
			.field("expires_in", &self.expires_in)
			.field("token_type", &self.token_type)
			.finish()
	}
}

/// Authenticated user profile returned alongside a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	/// Server-assigned user identifier.
	pub user_id: UserId,
	/// Login email.
	pub email: String,
	/// Display name.
	#[serde(default)]
	pub name: Option<String>,
	/// Account the user currently acts on.
	#[serde(default)]
	pub current_account_id: Option<AccountId>,
	/// Fields not modeled explicitly.
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}

/// Payload of login and register responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
	/// Issued tokens.
	#[serde(flatten)]
	pub session: Session,
	/// Authenticated user, when included.
	#[serde(default)]
	pub user: Option<User>,
}

/// Credentials posted to `/auth/login`.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
	/// Login email.
	pub email: String,
	/// Plain-text password; sent over TLS only.
	pub password: String,
}
impl Debug for LoginRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginRequest")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Sign-up payload posted to `/auth/register`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
	/// Login email.
	pub email: String,
	/// Plain-text password; sent over TLS only.
	pub password: String,
	/// Display name.
	pub name: String,
	/// Company or workspace name for the initial account.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub company: Option<String>,
}
impl Debug for RegisterRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RegisterRequest")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.field("name", &self.name)
			.field("company", &self.company)
			.finish()
	}
}

/// Session status reported by `/auth/status`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
	/// Whether the bearer token is accepted.
	pub authenticated: bool,
	/// Authenticated user, when known.
	#[serde(default)]
	pub user: Option<User>,
}
