//! Outbound request context and decoded response wrapper.

// crates.io
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, header::AUTHORIZATION};
// self
use crate::{_prelude::*, auth, error::ConfigError};

/// Method, path, query, headers, and body for one logical API call.
///
/// The context also carries the one-shot retry flag: once a `401` has been recovered for this
/// request it is marked retried, and a second `401` is surfaced instead of refreshing again.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Path appended to the client's base URL (leading `/` optional).
	pub path: String,
	/// Query parameters, encoded in insertion order.
	pub query: Vec<(String, String)>,
	/// Headers set by the caller; interceptors add to these per dispatch.
	pub headers: HeaderMap,
	/// Serialized request body.
	pub body: Option<Vec<u8>>,
	retried: bool,
}
impl ApiRequest {
	/// Creates a request without query, headers, or body.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: Vec::new(),
			headers: HeaderMap::new(),
			body: None,
			retried: false,
		}
	}

	/// Shorthand for a `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, path)
	}

	/// Shorthand for a `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, path)
	}

	/// Shorthand for a `PUT` request.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::PUT, path)
	}

	/// Shorthand for a `DELETE` request.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::DELETE, path)
	}

	/// Appends a query parameter.
	pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		self.query.push((key.into(), value.to_string()));

		self
	}

	/// Appends a query parameter when `value` is present.
	pub fn with_optional_query<V>(self, key: impl Into<String>, value: Option<V>) -> Self
	where
		V: ToString,
	{
		match value {
			Some(value) => self.with_query(key, value),
			None => self,
		}
	}

	/// Sets a header, replacing any previous value.
	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Serializes `body` as JSON.
	pub fn with_json<B>(mut self, body: &B) -> Result<Self>
	where
		B: ?Sized + Serialize,
	{
		let bytes =
			serde_json::to_vec(body).map_err(|source| ConfigError::RequestBody { source })?;

		self.body = Some(bytes);

		Ok(self)
	}

	/// Returns `true` once a `401` has been recovered for this request.
	pub fn is_retried(&self) -> bool {
		self.retried
	}

	pub(crate) fn mark_retried(&mut self) {
		self.retried = true;
	}

	/// Pins the `Authorization` header to `token`, bypassing the store lookup.
	pub(crate) fn set_bearer(&mut self, token: &str) -> Result<(), ConfigError> {
		self.headers.insert(AUTHORIZATION, auth::bearer_header(token)?);

		Ok(())
	}
}

/// Raw response returned by a dispatch.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Returns `true` for `2xx` statuses.
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	/// Converts non-`2xx` responses into [`Error::Status`], leaving the body untouched.
	pub fn error_for_status(self) -> Result<Self> {
		if self.is_success() {
			return Ok(self);
		}

		let body = String::from_utf8_lossy(&self.body).into_owned();
		let message = serde_json::from_str::<serde_json::Value>(&body)
			.ok()
			.as_ref()
			.and_then(envelope_message);

		Err(Error::Status { status: self.status.as_u16(), message, body })
	}

	/// Decodes the body as `T`, unwrapping the backend's `{ success, data }` envelope.
	///
	/// A JSON object with a boolean `success` field is treated as an envelope: `true` yields
	/// `data` (or `null` when absent), `false` becomes [`Error::Rejected`]. Any other body is the
	/// payload itself. An empty body decodes as `null`, which suits `()` and `Option<_>`.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let status = self.status.as_u16();
		let value = if self.body.iter().all(u8::is_ascii_whitespace) {
			serde_json::Value::Null
		} else {
			let mut de = serde_json::Deserializer::from_slice(&self.body);

			serde_path_to_error::deserialize(&mut de)
				.map_err(|source| Error::Decode { status, source })?
		};
		let payload = match value {
			serde_json::Value::Object(mut map)
				if matches!(map.get("success"), Some(serde_json::Value::Bool(_))) =>
			{
				if map.get("success") == Some(&serde_json::Value::Bool(false)) {
					let message = envelope_message(&serde_json::Value::Object(map))
						.unwrap_or_else(|| "request was not successful".into());

					return Err(Error::Rejected { message });
				}

				map.remove("data").unwrap_or(serde_json::Value::Null)
			},
			other => other,
		};

		serde_path_to_error::deserialize(payload)
			.map_err(|source| Error::Decode { status, source })
	}
}

fn envelope_message(value: &serde_json::Value) -> Option<String> {
	["error", "message"].iter().find_map(|field| match value.get(field)? {
		serde_json::Value::String(message) => Some(message.clone()),
		serde_json::Value::Object(inner) =>
			inner.get("message").and_then(serde_json::Value::as_str).map(str::to_owned),
		_ => None,
	})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn response(status: u16, body: &str) -> ApiResponse {
		ApiResponse {
			status: StatusCode::from_u16(status).expect("Fixture status should be valid."),
			headers: HeaderMap::new(),
			body: body.as_bytes().to_vec(),
		}
	}

	#[derive(Debug, Deserialize, PartialEq)]
	struct Item {
		id: String,
	}

	#[test]
	fn envelope_data_is_unwrapped() {
		let items: Vec<Item> = response(200, r#"{"success":true,"data":[{"id":"a"}]}"#)
			.json()
			.expect("Envelope should decode.");

		assert_eq!(items, vec![Item { id: "a".into() }]);
	}

	#[test]
	fn bare_payloads_decode_directly() {
		let items: Vec<Item> =
			response(200, r#"[{"id":"s1"}]"#).json().expect("Bare array should decode.");

		assert_eq!(items, vec![Item { id: "s1".into() }]);
	}

	#[test]
	fn objects_with_non_boolean_success_are_payloads() {
		#[derive(Debug, Deserialize)]
		struct Probe {
			success: String,
		}

		let probe: Probe =
			response(200, r#"{"success":"partial"}"#).json().expect("Object should decode.");

		assert_eq!(probe.success, "partial");
	}

	#[test]
	fn unsuccessful_envelopes_are_rejected() {
		let err = response(200, r#"{"success":false,"error":"Quota exceeded"}"#)
			.json::<serde_json::Value>()
			.expect_err("success=false should be rejected.");

		assert!(matches!(err, Error::Rejected { ref message } if message == "Quota exceeded"));
	}

	#[test]
	fn empty_bodies_decode_as_unit() {
		response(204, "").json::<()>().expect("Empty body should decode as unit.");
	}

	#[test]
	fn decode_errors_report_the_json_path() {
		let err = response(200, r#"{"success":true,"data":[{"id":7}]}"#)
			.json::<Vec<Item>>()
			.expect_err("Wrong field type should fail.");

		match err {
			Error::Decode { status, source } => {
				assert_eq!(status, 200);
				let path = source.path().to_string();

				assert!(path.contains('0') && path.ends_with("id"), "Unexpected path: {path}");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn error_for_status_extracts_backend_message() {
		let err = response(404, r#"{"success":false,"error":{"message":"Source not found"}}"#)
			.error_for_status()
			.expect_err("404 should be an error.");

		match err {
			Error::Status { status, message, body } => {
				assert_eq!(status, 404);
				assert_eq!(message.as_deref(), Some("Source not found"));
				assert!(body.contains("Source not found"));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn retry_flag_is_one_shot() {
		let mut request = ApiRequest::get("/sources").with_query("limit", 10);

		assert!(!request.is_retried());

		request.mark_retried();

		assert!(request.is_retried());
		assert_eq!(request.query, vec![("limit".to_owned(), "10".to_owned())]);
	}
}
