//! Account activity feed.

// self
use crate::{
	_prelude::*,
	api::{AccountId, EventId, Extra, SourceId, Timestamp, UserId},
	client::{ApiClient, ApiRequest},
	transport::HttpTransport,
};

/// One entry of the activity feed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
	/// Server-assigned identifier.
	pub event_id: EventId,
	/// Owning account.
	#[serde(default)]
	pub account_id: Option<AccountId>,
	/// User that triggered the event, if any.
	#[serde(default)]
	pub user_id: Option<UserId>,
	/// Event category (`backup`, `source`, `auth`, ...).
	#[serde(rename = "type", default)]
	pub event_type: Option<String>,
	/// Action within the category.
	#[serde(default)]
	pub action: Option<String>,
	/// Status of the action.
	#[serde(default)]
	pub status: Option<String>,
	/// Human-readable summary.
	#[serde(default)]
	pub message: Option<String>,
	/// Source the event relates to.
	#[serde(default)]
	pub source_id: Option<SourceId>,
	/// Event time.
	#[serde(default)]
	pub timestamp: Option<Timestamp>,
	/// Fields not modeled explicitly.
	#[serde(flatten)]
	pub extra: Extra,
}

/// Filters for `GET /activity`; unset fields are omitted from the query string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActivityQuery {
	/// Maximum number of events to return.
	pub limit: Option<u32>,
	/// Only events of this category.
	pub event_type: Option<String>,
	/// Only events about this source.
	pub source_id: Option<SourceId>,
	/// Pagination cursor returned by a previous page.
	pub cursor: Option<String>,
}
impl ActivityQuery {
	/// Limits the page size.
	pub fn limit(mut self, limit: u32) -> Self {
		self.limit = Some(limit);

		self
	}

	/// Filters by event category.
	pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
		self.event_type = Some(event_type.into());

		self
	}

	/// Filters by source.
	pub fn source_id(mut self, source_id: SourceId) -> Self {
		self.source_id = Some(source_id);

		self
	}

	/// Continues from a previous page.
	pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
		self.cursor = Some(cursor.into());

		self
	}

	fn apply(&self, request: ApiRequest) -> ApiRequest {
		request
			.with_optional_query("limit", self.limit)
			.with_optional_query("type", self.event_type.as_deref())
			.with_optional_query("sourceId", self.source_id.as_deref())
			.with_optional_query("cursor", self.cursor.as_deref())
	}
}

/// Handle for the `/activity` endpoint.
pub struct ActivityApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) client: &'a ApiClient<T>,
}
impl<T> ActivityApi<'_, T>
where
	T: ?Sized + HttpTransport,
{
	/// `GET /activity`, newest first.
	pub async fn list(&self, query: &ActivityQuery) -> Result<Vec<ActivityEvent>> {
		self.client.fetch(query.apply(ApiRequest::get("/activity"))).await
	}
}
