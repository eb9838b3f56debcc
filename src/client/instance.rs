//! A single configured dispatcher: base URL, transport, and interceptor chain.

// crates.io
use http::header::AUTHORIZATION;
// self
use crate::{
	_prelude::*,
	auth,
	client::{ApiRequest, ApiResponse, BearerAuth, JsonContentType, RequestInterceptor},
	error::ConfigError,
	obs::CallKind,
	store::TokenStore,
	transport::HttpTransport,
};

/// Which backend service a client instance talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClientKind {
	/// General REST API (sources, jobs, tags, ...).
	Api,
	/// Auth service (login, register, refresh, logout).
	Auth,
}
impl ClientKind {
	/// Returns the `401` policy applied to this kind of client.
	pub const fn unauthorized_policy(self) -> UnauthorizedPolicy {
		match self {
			Self::Api => UnauthorizedPolicy::Refresh,
			Self::Auth => UnauthorizedPolicy::Terminal,
		}
	}

	pub(crate) const fn call_kind(self) -> CallKind {
		match self {
			Self::Api => CallKind::Api,
			Self::Auth => CallKind::Auth,
		}
	}
}

/// Response-side handling of `401 Unauthorized`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnauthorizedPolicy {
	/// Refresh the session and retry the request once.
	Refresh,
	/// Drop the session immediately; never refresh.
	Terminal,
	/// Return the `401` untouched; the caller owns session cleanup.
	Passthrough,
}

/// Outcome of a single dispatch, before any status interpretation.
#[derive(Clone, Debug)]
pub struct Dispatched {
	/// Raw response.
	pub response: ApiResponse,
	/// Access token the request carried, if any.
	pub sent_token: Option<String>,
}

/// Configured request dispatcher.
///
/// The client owns no session state: [`BearerAuth`] reads the shared store on every dispatch,
/// so two instances built over the same store always agree on the current token.
pub struct HttpClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Service this instance talks to.
	pub kind: ClientKind,
	/// Base URL every request path is appended to.
	pub base_url: Url,
	/// Transport used for every dispatch.
	pub transport: Arc<T>,
	interceptors: Vec<Arc<dyn RequestInterceptor>>,
}
impl<T> HttpClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client with the default chain: [`BearerAuth`] then [`JsonContentType`].
	pub fn new(
		kind: ClientKind,
		base_url: Url,
		transport: impl Into<Arc<T>>,
		store: Arc<dyn TokenStore>,
	) -> Self {
		Self {
			kind,
			base_url,
			transport: transport.into(),
			interceptors: vec![Arc::new(BearerAuth::new(store)), Arc::new(JsonContentType)],
		}
	}

	/// Appends an interceptor that runs after the built-in ones.
	pub fn with_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
		self.interceptors.push(Arc::new(interceptor));

		self
	}

	/// Returns the `401` policy for this instance.
	pub fn unauthorized_policy(&self) -> UnauthorizedPolicy {
		self.kind.unauthorized_policy()
	}

	/// Resolves `path` and `query` against the base URL, keeping any base path prefix.
	pub fn url_for(&self, path: &str, query: &[(String, String)]) -> Url {
		let mut url = self.base_url.clone();
		let joined =
			format!("{}/{}", url.path().trim_end_matches('/'), path.trim_start_matches('/'));

		url.set_path(&joined);

		if !query.is_empty() {
			let mut pairs = url.query_pairs_mut();

			for (key, value) in query {
				pairs.append_pair(key, value);
			}
		}

		url
	}

	/// Runs the interceptor chain and sends the request, returning the response as-is.
	pub async fn dispatch(&self, request: &ApiRequest) -> Result<Dispatched> {
		let mut outgoing = request.clone();

		for interceptor in &self.interceptors {
			interceptor.intercept(&mut outgoing)?;
		}

		let sent_token =
			outgoing.headers.get(AUTHORIZATION).and_then(auth::parse_bearer).map(str::to_owned);
		let url = self.url_for(&outgoing.path, &outgoing.query);
		let mut http_request = http::Request::builder()
			.method(outgoing.method)
			.uri(url.as_str())
			.body(outgoing.body.unwrap_or_default())
			.map_err(ConfigError::from)?;

		http_request.headers_mut().extend(outgoing.headers);

		let (parts, body) = self.transport.execute(http_request).await?.into_parts();

		Ok(Dispatched {
			response: ApiResponse { status: parts.status, headers: parts.headers, body },
			sent_token,
		})
	}
}
impl<T> Debug for HttpClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HttpClient")
			.field("kind", &self.kind)
			.field("base_url", &self.base_url.as_str())
			.field("interceptors", &self.interceptors.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		store::MemoryStore,
		transport::{HttpRequest, HttpResponse, TransportFuture},
	};

	struct EchoTransport;
	impl HttpTransport for EchoTransport {
		fn execute(&self, request: HttpRequest) -> TransportFuture<'_> {
			Box::pin(async move {
				let mut response = HttpResponse::new(request.uri().to_string().into_bytes());

				*response.headers_mut() = request.headers().clone();

				Ok(response)
			})
		}
	}

	fn client(base: &str) -> HttpClient<EchoTransport> {
		HttpClient::new(
			ClientKind::Api,
			Url::parse(base).expect("Fixture base URL should parse."),
			EchoTransport,
			Arc::new(MemoryStore::default()),
		)
	}

	#[test]
	fn url_for_keeps_base_path_prefix() {
		let prefixed = client("https://api.example.com/v1/");
		let bare = client("https://api.example.com");

		assert_eq!(
			prefixed.url_for("/sources/s1", &[]).as_str(),
			"https://api.example.com/v1/sources/s1"
		);
		assert_eq!(bare.url_for("jobs", &[]).as_str(), "https://api.example.com/jobs");
	}

	#[test]
	fn url_for_encodes_query_pairs() {
		let url = client("https://api.example.com")
			.url_for("/activity", &[("type".into(), "job run".into()), ("limit".into(), "5".into())]);

		assert_eq!(url.as_str(), "https://api.example.com/activity?type=job+run&limit=5");
	}

	#[tokio::test]
	async fn dispatch_runs_interceptors_on_a_copy() {
		let client = client("https://api.example.com").with_interceptor(
			|request: &mut ApiRequest| -> Result<()> {
				request.headers.insert("x-client", http::HeaderValue::from_static("listbackup"));

				Ok(())
			},
		);
		let request = ApiRequest::get("/platforms");
		let dispatched = client.dispatch(&request).await.expect("Dispatch should succeed.");

		assert_eq!(dispatched.response.body, b"https://api.example.com/platforms");
		assert_eq!(dispatched.response.headers["x-client"], "listbackup");
		assert_eq!(dispatched.response.headers["content-type"], "application/json");
		assert!(dispatched.sent_token.is_none());
		assert!(request.headers.is_empty(), "Caller request must not be mutated.");
	}
}
