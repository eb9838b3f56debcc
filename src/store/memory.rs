//! Thread-safe in-memory [`TokenStore`] for tests and short-lived processes.

// self
use crate::{
	_prelude::*,
	store::{StoreError, StoreKey, TokenStore},
};

/// Keeps tokens in-process; everything is lost when the value is dropped.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<HashMap<StoreKey, String>>>);
impl MemoryStore {
	/// Returns `true` when no token is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl TokenStore for MemoryStore {
	fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
		Ok(self.0.read().get(&key).cloned())
	}

	fn set(&self, key: StoreKey, value: &str) -> Result<(), StoreError> {
		self.0.write().insert(key, value.to_owned());

		Ok(())
	}

	fn clear(&self) -> Result<(), StoreError> {
		self.0.write().clear();

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn clones_share_state() {
		let store = MemoryStore::default();
		let view = store.clone();

		store.set(StoreKey::AccessToken, "T1").expect("Set should succeed.");

		assert_eq!(view.get(StoreKey::AccessToken).expect("Get should succeed."), Some("T1".into()));

		view.clear().expect("Clear should succeed.");

		assert!(store.is_empty());
	}
}
