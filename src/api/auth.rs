//! Auth service endpoints.
//!
//! Every call here goes through the auth client instance, so a `401` drops the session instead of
//! triggering a refresh. Successful login and register calls replace whatever the store held.

// crates.io
use serde::de::IgnoredAny;
// self
use crate::{
	_prelude::*,
	auth::{AuthResponse, AuthStatus, LoginRequest, RegisterRequest, Session},
	client::{ApiClient, ApiRequest, ClientKind, UnauthorizedPolicy},
	transport::HttpTransport,
};

/// Auth-service path for password login.
pub const LOGIN_PATH: &str = "/auth/login";
/// Auth-service path for sign-up.
pub const REGISTER_PATH: &str = "/auth/register";
/// Auth-service path ending the session server-side.
pub const LOGOUT_PATH: &str = "/auth/logout";
/// Auth-service path reporting whether the bearer token is accepted.
pub const STATUS_PATH: &str = "/auth/status";

/// Handle for `/auth` endpoints.
pub struct AuthApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) client: &'a ApiClient<T>,
}
impl<T> AuthApi<'_, T>
where
	T: ?Sized + HttpTransport,
{
	/// Logs in with email and password and stores the issued session.
	pub async fn login(
		&self,
		email: impl Into<String>,
		password: impl Into<String>,
	) -> Result<AuthResponse> {
		let body = LoginRequest { email: email.into(), password: password.into() };

		self.authenticate(ApiRequest::post(LOGIN_PATH).with_json(&body)?).await
	}

	/// Creates an account and stores the issued session.
	pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
		self.authenticate(ApiRequest::post(REGISTER_PATH).with_json(request)?).await
	}

	/// Rotates the session now; see [`ApiClient::refresh_session`].
	pub async fn refresh(&self) -> Result<Session> {
		self.client.refresh_session().await
	}

	/// Ends the session.
	///
	/// The store is cleared and [`crate::auth::SessionEvent::LoggedOut`] is emitted even when the
	/// backend call fails; the backend outcome is returned afterwards. A `401` here does not
	/// announce a lost session, so the listener sees exactly one event.
	pub async fn logout(&self) -> Result<()> {
		let request = ApiRequest::post(LOGOUT_PATH);
		let outcome = async {
			self.client
				.execute(ClientKind::Auth, UnauthorizedPolicy::Passthrough, request)
				.await?
				.json::<IgnoredAny>()
				.map(|_| ())
		}
		.await;

		self.client.end_session()?;

		outcome
	}

	/// Asks the auth service whether the stored access token is still accepted.
	pub async fn status(&self) -> Result<AuthStatus> {
		self.client.send_auth(ApiRequest::get(STATUS_PATH)).await?.json()
	}

	async fn authenticate(&self, request: ApiRequest) -> Result<AuthResponse> {
		let response = self.client.send_auth(request).await?.json::<AuthResponse>()?;

		self.client.establish_session(&response.session)?;

		Ok(response)
	}
}
