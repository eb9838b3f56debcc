//! Account profile of the signed-in user.

// self
use crate::{
	_prelude::*,
	api::{AccountId, Extra, Timestamp, UserId},
	client::{ApiClient, ApiRequest},
	transport::HttpTransport,
};

/// Account the bearer token acts on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
	/// Server-assigned identifier.
	pub account_id: AccountId,
	/// Display name.
	#[serde(default)]
	pub name: String,
	/// Company name.
	#[serde(default)]
	pub company: Option<String>,
	/// Owning user.
	#[serde(default)]
	pub owner_user_id: Option<UserId>,
	/// Parent account in an account hierarchy.
	#[serde(default)]
	pub parent_account_id: Option<AccountId>,
	/// Subscription plan.
	#[serde(default)]
	pub plan: Option<String>,
	/// Backend lifecycle status.
	#[serde(default)]
	pub status: Option<String>,
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

/// Payload for `PUT /account`; unset fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
	/// New display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// New company name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub company: Option<String>,
	/// Replacement settings.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub settings: Option<serde_json::Value>,
}

/// Handle for `/account` endpoints.
pub struct AccountApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) client: &'a ApiClient<T>,
}
impl<T> AccountApi<'_, T>
where
	T: ?Sized + HttpTransport,
{
	/// `GET /account`.
	pub async fn get(&self) -> Result<Account> {
		self.client.fetch(ApiRequest::get("/account")).await
	}

	/// `PUT /account`.
	pub async fn update(&self, update: &AccountUpdate) -> Result<Account> {
		self.client.fetch(ApiRequest::put("/account").with_json(update)?).await
	}
}
