//! Client instances and the facade that routes requests through them.
//!
//! [`ApiClient`] owns two [`HttpClient`] instances built over one shared [`TokenStore`]: the
//! general API client, whose `401` responses trigger a session refresh and a single retry, and
//! the auth API client, whose `401` responses drop the session outright. Nothing here is a
//! global; hosts build as many isolated clients as they need.

mod instance;
mod interceptor;
mod request;

pub use instance::*;
pub use interceptor::*;
pub use request::*;

// crates.io
use http::StatusCode;
// self
use crate::{
	_prelude::*,
	auth::{NoopListener, SessionEvent, SessionListener, UnauthenticatedReason},
	config::ClientConfig,
	flows::RefreshCoordinator,
	obs::{self, CallOutcome, CallSpan},
	store::TokenStore,
	transport::HttpTransport,
};
#[cfg(feature = "reqwest")] use crate::transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

/// Authenticated ListBackup client.
///
/// Share it behind an `Arc` when several tasks issue requests; the refresh coordinator inside
/// makes concurrent `401` recoveries safe.
pub struct ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Token store shared by both client instances.
	pub store: Arc<dyn TokenStore>,
	/// Refresh state machine, single-flight guard, and counters.
	pub refresh: RefreshCoordinator,
	api_http: HttpClient<T>,
	auth_http: HttpClient<T>,
	listener: Arc<dyn SessionListener>,
	login_path: String,
}
impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client whose two instances share `transport` and `store`.
	pub fn with_transport(
		config: ClientConfig,
		store: Arc<dyn TokenStore>,
		transport: impl Into<Arc<T>>,
	) -> Self {
		let transport = transport.into();
		let api_http =
			HttpClient::new(ClientKind::Api, config.api_url, transport.clone(), store.clone());
		let auth_http =
			HttpClient::new(ClientKind::Auth, config.auth_api_url, transport, store.clone());

		Self {
			api_http,
			auth_http,
			refresh: RefreshCoordinator::new(config.refresh_mode),
			store,
			listener: Arc::new(NoopListener),
			login_path: config.login_path,
		}
	}

	/// Registers the listener that receives session lifecycle events.
	pub fn with_listener(mut self, listener: impl SessionListener + 'static) -> Self {
		self.listener = Arc::new(listener);

		self
	}

	/// Appends a request interceptor to one of the two instances.
	pub fn with_interceptor(
		mut self,
		kind: ClientKind,
		interceptor: impl RequestInterceptor + 'static,
	) -> Self {
		match kind {
			ClientKind::Api => self.api_http = self.api_http.with_interceptor(interceptor),
			ClientKind::Auth => self.auth_http = self.auth_http.with_interceptor(interceptor),
		}

		self
	}

	/// Returns the instance serving `kind`.
	pub fn http(&self, kind: ClientKind) -> &HttpClient<T> {
		match kind {
			ClientKind::Api => &self.api_http,
			ClientKind::Auth => &self.auth_http,
		}
	}

	/// Login path announced when the session is dropped.
	pub fn login_path(&self) -> &str {
		&self.login_path
	}

	/// Sends a request through the general API client.
	///
	/// A `401` is recovered once: the session is refreshed and the request re-dispatched with
	/// the new token. Whatever the retry returns is handed back unchanged, including a second
	/// `401`. Every other non-`2xx` status surfaces as [`Error::Status`].
	pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
		self.execute(ClientKind::Api, ClientKind::Api.unauthorized_policy(), request).await
	}

	/// Sends a request through the auth API client.
	///
	/// A `401` clears the store and notifies the listener without attempting a refresh; the
	/// status error is still returned to the caller.
	pub async fn send_auth(&self, request: ApiRequest) -> Result<ApiResponse> {
		self.execute(ClientKind::Auth, ClientKind::Auth.unauthorized_policy(), request).await
	}

	/// Dispatches `request` through the `kind` instance, handling `401` per `policy`.
	pub(crate) async fn execute(
		&self,
		kind: ClientKind,
		policy: UnauthorizedPolicy,
		mut request: ApiRequest,
	) -> Result<ApiResponse> {
		let call = kind.call_kind();
		let span = CallSpan::new(call, "execute");

		obs::record_call_outcome(call, CallOutcome::Attempt);

		let result = span
			.instrument(async {
				let client = self.http(kind);

				loop {
					let generation = self.refresh.generation();
					let dispatched = client.dispatch(&request).await?;

					if dispatched.response.status != StatusCode::UNAUTHORIZED {
						return dispatched.response.error_for_status();
					}

					match policy {
						UnauthorizedPolicy::Terminal => {
							self.drop_session(UnauthenticatedReason::AuthRejected);

							return dispatched.response.error_for_status();
						},
						UnauthorizedPolicy::Passthrough =>
							return dispatched.response.error_for_status(),
						UnauthorizedPolicy::Refresh if request.is_retried() =>
							return dispatched.response.error_for_status(),
						UnauthorizedPolicy::Refresh => {
							request.mark_retried();

							let token = self
								.recover_session(dispatched.sent_token.as_deref(), generation)
								.await?;

							request.set_bearer(&token)?;
							obs::record_call_outcome(call, CallOutcome::Retried);
						},
					}
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(call, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(call, CallOutcome::Failure),
		}

		result
	}

	pub(crate) fn emit(&self, event: SessionEvent) {
		obs::record_session_event(&event);
		self.listener.on_session_event(&event);
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestTransport> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Self {
		Self::with_transport(config, store, ReqwestTransport::default())
	}
}
impl<T> Debug for ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("api", &self.api_http)
			.field("auth", &self.auth_http)
			.field("refresh", &self.refresh)
			.field("login_path", &self.login_path)
			.finish()
	}
}
