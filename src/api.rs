//! Typed wrappers around the ListBackup REST surface.
//!
//! Each module exposes a borrowed handle (`client.sources()`, `client.jobs()`, ...) whose methods
//! map one-to-one onto REST endpoints. Handles hold no state and add no business logic: they
//! build the request, send it through the right client instance, and decode the payload. Errors
//! from the HTTP layer pass through unchanged.

pub mod account;
pub mod activity;
pub mod auth;
pub mod id;
pub mod jobs;
pub mod platforms;
pub mod sources;
pub mod tags;

pub use account::*;
pub use activity::*;
pub use auth::*;
pub use id::*;
pub use jobs::*;
pub use platforms::*;
pub use sources::*;
pub use tags::*;

// crates.io
use serde::de::IgnoredAny;
// self
use crate::{
	_prelude::*,
	client::{ApiClient, ApiRequest},
	transport::HttpTransport,
};

/// Milliseconds since the Unix epoch, as stored by the backend.
pub type Timestamp = i64;

/// Free-form fields the client does not model explicitly.
pub type Extra = BTreeMap<String, serde_json::Value>;

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Login, register, refresh, logout, and status endpoints.
	pub fn auth(&self) -> AuthApi<'_, T> {
		AuthApi { client: self }
	}

	/// Data source endpoints.
	pub fn sources(&self) -> SourcesApi<'_, T> {
		SourcesApi { client: self }
	}

	/// Backup job endpoints.
	pub fn jobs(&self) -> JobsApi<'_, T> {
		JobsApi { client: self }
	}

	/// Activity feed endpoint.
	pub fn activity(&self) -> ActivityApi<'_, T> {
		ActivityApi { client: self }
	}

	/// Account endpoints.
	pub fn account(&self) -> AccountApi<'_, T> {
		AccountApi { client: self }
	}

	/// Tag endpoints.
	pub fn tags(&self) -> TagsApi<'_, T> {
		TagsApi { client: self }
	}

	/// Platform catalog endpoints.
	pub fn platforms(&self) -> PlatformsApi<'_, T> {
		PlatformsApi { client: self }
	}

	/// Sends `request` through the general API client and decodes the payload.
	pub(crate) async fn fetch<R>(&self, request: ApiRequest) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.send(request).await?.json()
	}

	/// Sends `request` through the general API client, checking only the envelope.
	pub(crate) async fn fetch_unit(&self, request: ApiRequest) -> Result<()> {
		self.send(request).await?.json::<IgnoredAny>().map(|_| ())
	}
}
