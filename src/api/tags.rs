//! Tags used to group sources and jobs.

// self
use crate::{
	_prelude::*,
	api::{AccountId, Extra, TagId, Timestamp},
	client::{ApiClient, ApiRequest},
	transport::HttpTransport,
};

/// A label attached to sources and jobs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
	/// Server-assigned identifier.
	pub tag_id: TagId,
	/// Owning account.
	#[serde(default)]
	pub account_id: Option<AccountId>,
	/// Display name.
	#[serde(default)]
	pub name: String,
	/// Display color, usually a hex code.
	#[serde(default)]
	pub color: Option<String>,
	/// Free-text description.
	#[serde(default)]
	pub description: Option<String>,
	/// Creation time.
	#[serde(default)]
	pub created_at: Option<Timestamp>,
	/// Fields not modeled explicitly.
	#[serde(flatten)]
	pub extra: Extra,
}

/// Payload for `POST /tags`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTag {
	/// Display name.
	pub name: String,
	/// Display color.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
	/// Free-text description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

/// Payload for `PUT /tags/{id}`; unset fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagUpdate {
	/// New display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// New display color.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
	/// New description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

/// Handle for `/tags` endpoints.
pub struct TagsApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) client: &'a ApiClient<T>,
}
impl<T> TagsApi<'_, T>
where
	T: ?Sized + HttpTransport,
{
	/// `GET /tags`.
	pub async fn list(&self) -> Result<Vec<Tag>> {
		self.client.fetch(ApiRequest::get("/tags")).await
	}

	/// `GET /tags/{id}`.
	pub async fn get(&self, id: &TagId) -> Result<Tag> {
		self.client.fetch(ApiRequest::get(format!("/tags/{id}"))).await
	}

	/// `POST /tags`.
	pub async fn create(&self, tag: &NewTag) -> Result<Tag> {
		self.client.fetch(ApiRequest::post("/tags").with_json(tag)?).await
	}

	/// `PUT /tags/{id}`.
	pub async fn update(&self, id: &TagId, update: &TagUpdate) -> Result<Tag> {
		self.client.fetch(ApiRequest::put(format!("/tags/{id}")).with_json(update)?).await
	}

	/// `DELETE /tags/{id}`.
	pub async fn delete(&self, id: &TagId) -> Result<()> {
		self.client.fetch_unit(ApiRequest::delete(format!("/tags/{id}"))).await
	}
}
