//! Token storage contract and built-in store implementations.
//!
//! Stores are plain synchronous key-value maps over three fixed keys. They do not track expiry;
//! the client learns that a token is stale from a `401` response. Clients hold the store behind
//! `Arc<dyn TokenStore>` and read it on every request, so a rotation is visible to the very next
//! call without any copy going stale.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::Session};

/// Fixed keys under which session tokens are persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StoreKey {
	/// Token the backend treats as the service credential (mirrors the access token).
	#[serde(rename = "serviceToken")]
	ServiceToken,
	/// Bearer credential attached to API calls.
	#[serde(rename = "accessToken")]
	AccessToken,
	/// Credential exchanged for new access tokens.
	#[serde(rename = "refreshToken")]
	RefreshToken,
}
impl StoreKey {
	/// Every key, in the order they are cleared.
	pub const ALL: [StoreKey; 3] = [Self::ServiceToken, Self::AccessToken, Self::RefreshToken];

	/// Returns the persisted key name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::ServiceToken => "serviceToken",
			Self::AccessToken => "accessToken",
			Self::RefreshToken => "refreshToken",
		}
	}
}
impl Display for StoreKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Key-value persistence for session tokens.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns the value stored under `key`, if any.
	fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError>;

	/// Stores `value` under `key`, replacing any previous value.
	fn set(&self, key: StoreKey, value: &str) -> Result<(), StoreError>;

	/// Removes every stored token.
	fn clear(&self) -> Result<(), StoreError>;
}
impl dyn TokenStore {
	/// Returns the stored access token.
	pub fn access_token(&self) -> Result<Option<String>, StoreError> {
		self.get(StoreKey::AccessToken)
	}

	/// Returns the stored refresh token.
	pub fn refresh_token(&self) -> Result<Option<String>, StoreError> {
		self.get(StoreKey::RefreshToken)
	}

	/// Persists a freshly issued session.
	///
	/// `serviceToken` and `accessToken` both receive the access token. The refresh token is only
	/// overwritten when the session carries one, so rotations that omit it keep the previous
	/// value.
	pub fn save_session(&self, session: &Session) -> Result<(), StoreError> {
		let access = session.access_token.expose();

		self.set(StoreKey::ServiceToken, access)?;
		self.set(StoreKey::AccessToken, access)?;

		if let Some(refresh) = &session.refresh_token {
			self.set(StoreKey::RefreshToken, refresh.expose())?;
		}

		Ok(())
	}
}
