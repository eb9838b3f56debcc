//! Typed ListBackup API client that injects bearer tokens into every request and transparently
//! refreshes expired sessions behind a single-flight guard.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]
#![cfg_attr(test, allow(unused_crate_dependencies))]

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod flows;
pub mod obs;
pub mod store;
pub mod transport;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{SessionEvent, SessionListener},
		client::{ApiClient, ReqwestApiClient},
		config::ClientConfig,
		store::{MemoryStore, StoreKey, TokenStore},
		transport::ReqwestTransport,
	};

	/// Listener that keeps every emitted session event for later assertions.
	#[derive(Clone, Debug, Default)]
	pub struct RecordingListener(Arc<Mutex<Vec<SessionEvent>>>);
	impl RecordingListener {
		/// Returns a snapshot of the recorded events.
		pub fn events(&self) -> Vec<SessionEvent> {
			self.0.lock().clone()
		}
	}
	impl SessionListener for RecordingListener {
		fn on_session_event(&self, event: &SessionEvent) {
			self.0.lock().push(event.clone());
		}
	}

	/// Builds a config pointing both the general and the auth API at `base_url`.
	pub fn test_config(base_url: &str) -> ClientConfig {
		let url = Url::parse(base_url).expect("Mock server URL should parse.");

		ClientConfig::new(url.clone(), url)
	}

	/// Seeds the store with an access/refresh token pair.
	pub fn seed_tokens(store: &dyn TokenStore, access: &str, refresh: Option<&str>) {
		store.set(StoreKey::ServiceToken, access).expect("Seeding service token should succeed.");
		store.set(StoreKey::AccessToken, access).expect("Seeding access token should succeed.");

		if let Some(refresh) = refresh {
			store
				.set(StoreKey::RefreshToken, refresh)
				.expect("Seeding refresh token should succeed.");
		}
	}

	/// Constructs a reqwest-backed client with an in-memory store and a recording listener.
	pub fn build_reqwest_test_client(
		config: ClientConfig,
	) -> (ReqwestApiClient, Arc<MemoryStore>, RecordingListener) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn TokenStore> = store_backend.clone();
		let listener = RecordingListener::default();
		let client = ApiClient::with_transport(config, store, ReqwestTransport::default())
			.with_listener(listener.clone());

		(client, store_backend, listener)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use http;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};

#[cfg(feature = "reqwest")] pub use client::ReqwestApiClient;
pub use client::ApiClient;
