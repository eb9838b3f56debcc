//! Connected data sources.

// self
use crate::{
	_prelude::*,
	api::{AccountId, Extra, JobRun, PlatformId, SourceId, TagId, Timestamp},
	client::{ApiClient, ApiRequest},
	transport::HttpTransport,
};

/// A platform connection the account backs up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
	/// Server-assigned identifier.
	pub source_id: SourceId,
	/// Owning account.
	#[serde(default)]
	pub account_id: Option<AccountId>,
	/// Display name.
	#[serde(default)]
	pub name: String,
	/// Platform the source connects to.
	#[serde(default)]
	pub platform_id: Option<PlatformId>,
	/// Backend lifecycle status (`active`, `error`, ...).
	#[serde(default)]
	pub status: Option<String>,
	/// Tags attached to the source.
	#[serde(default)]
	pub tags: Vec<TagId>,
	/// Creation time.
	#[serde(default)]
	pub created_at: Option<Timestamp>,
	/// Last modification time.
	#[serde(default)]
	pub updated_at: Option<Timestamp>,
	/// Fields not modeled explicitly.
	#[serde(flatten)]
	pub extra: Extra,
}

/// Payload for `POST /sources`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSource {
	/// Display name.
	pub name: String,
	/// Platform to connect.
	pub platform_id: PlatformId,
	/// Existing platform connection to reuse.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub connection_id: Option<String>,
	/// Platform-specific settings.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub settings: Option<serde_json::Value>,
	/// Tags to attach.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub tags: Vec<TagId>,
}

/// Payload for `PUT /sources/{id}`; unset fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceUpdate {
	/// New display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// New lifecycle status.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
	/// Replacement settings.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub settings: Option<serde_json::Value>,
	/// Replacement tag list.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tags: Option<Vec<TagId>>,
}

/// Result of `POST /sources/{id}/test`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionTest {
	/// Whether the platform accepted the stored credentials.
	#[serde(default)]
	pub connected: bool,
	/// Backend diagnostic.
	#[serde(default)]
	pub message: Option<String>,
}

/// Handle for `/sources` endpoints.
pub struct SourcesApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) client: &'a ApiClient<T>,
}
impl<T> SourcesApi<'_, T>
where
	T: ?Sized + HttpTransport,
{
	/// `GET /sources`.
	pub async fn list(&self) -> Result<Vec<DataSource>> {
		self.client.fetch(ApiRequest::get("/sources")).await
	}

	/// `GET /sources/{id}`.
	pub async fn get(&self, id: &SourceId) -> Result<DataSource> {
		self.client.fetch(ApiRequest::get(format!("/sources/{id}"))).await
	}

	/// `POST /sources`.
	pub async fn create(&self, source: &NewSource) -> Result<DataSource> {
		self.client.fetch(ApiRequest::post("/sources").with_json(source)?).await
	}

	/// `PUT /sources/{id}`.
	pub async fn update(&self, id: &SourceId, update: &SourceUpdate) -> Result<DataSource> {
		self.client.fetch(ApiRequest::put(format!("/sources/{id}")).with_json(update)?).await
	}

	/// `DELETE /sources/{id}`.
	pub async fn delete(&self, id: &SourceId) -> Result<()> {
		self.client.fetch_unit(ApiRequest::delete(format!("/sources/{id}"))).await
	}

	/// `POST /sources/{id}/test`: checks the stored platform credentials.
	pub async fn test(&self, id: &SourceId) -> Result<ConnectionTest> {
		self.client.fetch(ApiRequest::post(format!("/sources/{id}/test"))).await
	}

	/// `POST /sources/{id}/sync`: starts an immediate backup of the source.
	pub async fn sync(&self, id: &SourceId) -> Result<JobRun> {
		self.client.fetch(ApiRequest::post(format!("/sources/{id}/sync"))).await
	}
}
