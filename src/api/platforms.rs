//! Catalog of integration platforms a source can connect to.

// self
use crate::{
	_prelude::*,
	api::{Extra, PlatformId},
	client::{ApiClient, ApiRequest},
	transport::HttpTransport,
};

/// An integration platform (Keap, Stripe, GoHighLevel, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
	/// Catalog identifier.
	pub platform_id: PlatformId,
	/// Display name.
	#[serde(default)]
	pub name: String,
	/// Catalog category (`crm`, `payments`, ...).
	#[serde(default)]
	pub category: Option<String>,
	/// Credential scheme (`oauth`, `api_key`, ...).
	#[serde(default)]
	pub auth_type: Option<String>,
	/// Short description.
	#[serde(default)]
	pub description: Option<String>,
	/// Logo URL.
	#[serde(default)]
	pub logo: Option<String>,
	/// Catalog status (`active`, `beta`, ...).
	#[serde(default)]
	pub status: Option<String>,
	/// Fields not modeled explicitly.
	#[serde(flatten)]
	pub extra: Extra,
}

/// Handle for `/platforms` endpoints.
pub struct PlatformsApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) client: &'a ApiClient<T>,
}
impl<T> PlatformsApi<'_, T>
where
	T: ?Sized + HttpTransport,
{
	/// `GET /platforms`.
	pub async fn list(&self) -> Result<Vec<Platform>> {
		self.client.fetch(ApiRequest::get("/platforms")).await
	}

	/// `GET /platforms/{id}`.
	pub async fn get(&self, id: &PlatformId) -> Result<Platform> {
		self.client.fetch(ApiRequest::get(format!("/platforms/{id}"))).await
	}
}
