//! Client-level error types shared across transports, stores, flows, and API modules.

// self
use crate::{_prelude::*, auth::UnauthenticatedReason};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Backend answered with a non-success status; surfaced unmodified.
	#[error("Request failed with HTTP {status}{}.", message_suffix(.message))]
	Status {
		/// HTTP status code.
		status: u16,
		/// `error` or `message` field extracted from a JSON body, if any.
		message: Option<String>,
		/// Raw response body.
		body: String,
	},
	/// Response body could not be decoded into the expected shape.
	#[error("Response body (HTTP {status}) could not be decoded.")]
	Decode {
		/// HTTP status code of the decoded response.
		status: u16,
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Backend envelope reported `success: false`.
	#[error("Backend rejected the request: {message}.")]
	Rejected {
		/// Backend-supplied message.
		message: String,
	},
	/// Session cannot be recovered; the store has been cleared and listeners notified.
	#[error("Session is no longer authenticated: {reason}.")]
	Unauthenticated {
		/// Why the session was dropped.
		reason: UnauthenticatedReason,
		/// Failure that caused the session to be dropped, if any.
		#[source]
		source: Option<Box<Error>>,
	},
}
impl Error {
	/// Returns the HTTP status carried by the error, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } | Self::Decode { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Returns `true` if the backend answered with `401 Unauthorized`.
	pub fn is_unauthorized(&self) -> bool {
		self.status() == Some(401)
	}
}

/// Configuration and request construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] http::Error),
	/// A configured base URL cannot be parsed.
	#[error("`{name}` is not a valid URL.")]
	InvalidUrl {
		/// Setting or environment variable name.
		name: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A base URL cannot carry a path (e.g. `mailto:`).
	#[error("Base URL `{url}` cannot be used as a request base.")]
	CannotBeABase {
		/// Offending URL.
		url: String,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	RequestBody {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// Stored token cannot be placed in an HTTP header.
	#[error("Stored access token is not a valid header value.")]
	InvalidToken,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the backend.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

fn message_suffix(message: &Option<String>) -> String {
	message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn status_error_formats_optional_message() {
		let with_message =
			Error::Status { status: 404, message: Some("Source not found".into()), body: "{}".into() };
		let without_message = Error::Status { status: 500, message: None, body: String::new() };

		assert_eq!(with_message.to_string(), "Request failed with HTTP 404: Source not found.");
		assert_eq!(without_message.to_string(), "Request failed with HTTP 500.");
		assert_eq!(with_message.status(), Some(404));
		assert!(!with_message.is_unauthorized());
	}

	#[test]
	fn unauthenticated_exposes_cause_as_source() {
		let cause = Error::Status { status: 401, message: None, body: String::new() };
		let err = Error::Unauthenticated {
			reason: UnauthenticatedReason::RefreshFailed,
			source: Some(Box::new(cause)),
		};
		let source = StdError::source(&err).expect("Unauthenticated should expose its cause.");

		assert_eq!(source.to_string(), "Request failed with HTTP 401.");
		assert!(err.status().is_none());
	}
}
