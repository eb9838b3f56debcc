//! Request interceptors applied to every dispatch, in registration order.

// crates.io
use http::{
	HeaderValue,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
// self
use crate::{_prelude::*, auth, client::ApiRequest, store::TokenStore};

/// Mutates an outgoing request right before it reaches the transport.
///
/// Interceptors run on a per-dispatch copy of the request, so changes never leak into the
/// caller's [`ApiRequest`] or into a later retry.
pub trait RequestInterceptor
where
	Self: Send + Sync,
{
	/// Applies the interceptor to `request`.
	fn intercept(&self, request: &mut ApiRequest) -> Result<()>;
}
impl<F> RequestInterceptor for F
where
	F: Send + Sync + Fn(&mut ApiRequest) -> Result<()>,
{
	fn intercept(&self, request: &mut ApiRequest) -> Result<()> {
		self(request)
	}
}

/// Attaches `Authorization: Bearer <accessToken>` read from the store on every call.
///
/// Requests that already carry an `Authorization` header are left untouched; the refresh flow
/// relies on this to pin the rotated token on its retry. No header is added when the store holds
/// no access token.
#[derive(Clone)]
pub struct BearerAuth {
	store: Arc<dyn TokenStore>,
}
impl BearerAuth {
	/// Creates an interceptor reading from `store`.
	pub fn new(store: Arc<dyn TokenStore>) -> Self {
		Self { store }
	}
}
impl RequestInterceptor for BearerAuth {
	fn intercept(&self, request: &mut ApiRequest) -> Result<()> {
		if request.headers.contains_key(AUTHORIZATION) {
			return Ok(());
		}
		if let Some(token) = self.store.access_token()? {
			request.headers.insert(AUTHORIZATION, auth::bearer_header(&token)?);
		}

		Ok(())
	}
}
impl Debug for BearerAuth {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("BearerAuth(..)")
	}
}

/// Declares JSON request and response bodies unless the caller chose otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonContentType;
impl RequestInterceptor for JsonContentType {
	fn intercept(&self, request: &mut ApiRequest) -> Result<()> {
		let json = HeaderValue::from_static("application/json");

		request.headers.entry(CONTENT_TYPE).or_insert_with(|| json.clone());
		request.headers.entry(ACCEPT).or_insert(json);

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::{MemoryStore, StoreKey};

	fn store_with(token: Option<&str>) -> Arc<dyn TokenStore> {
		let store = MemoryStore::default();

		if let Some(token) = token {
			store.set(StoreKey::AccessToken, token).expect("Seeding the store should succeed.");
		}

		Arc::new(store)
	}

	#[test]
	fn bearer_reads_the_store_on_every_call() {
		let store = store_with(Some("T1"));
		let interceptor = BearerAuth::new(store.clone());
		let mut first = ApiRequest::get("/sources");

		interceptor.intercept(&mut first).expect("Interceptor should succeed.");
		store.set(StoreKey::AccessToken, "T2").expect("Rotating the token should succeed.");

		let mut second = ApiRequest::get("/sources");

		interceptor.intercept(&mut second).expect("Interceptor should succeed.");

		assert_eq!(first.headers[AUTHORIZATION], "Bearer T1");
		assert_eq!(second.headers[AUTHORIZATION], "Bearer T2");
	}

	#[test]
	fn bearer_keeps_pinned_headers_and_skips_empty_store() {
		let interceptor = BearerAuth::new(store_with(Some("T1")));
		let mut pinned = ApiRequest::get("/sources");

		pinned.set_bearer("pinned").expect("Pinning should succeed.");
		interceptor.intercept(&mut pinned).expect("Interceptor should succeed.");

		assert_eq!(pinned.headers[AUTHORIZATION], "Bearer pinned");

		let mut anonymous = ApiRequest::post("/auth/login");

		BearerAuth::new(store_with(None))
			.intercept(&mut anonymous)
			.expect("Interceptor should succeed.");

		assert!(!anonymous.headers.contains_key(AUTHORIZATION));
	}

	#[test]
	fn json_content_type_respects_caller_headers() {
		let mut request = ApiRequest::post("/sources")
			.with_header(CONTENT_TYPE, HeaderValue::from_static("text/csv"));

		JsonContentType.intercept(&mut request).expect("Interceptor should succeed.");

		assert_eq!(request.headers[CONTENT_TYPE], "text/csv");
		assert_eq!(request.headers[ACCEPT], "application/json");
	}
}
