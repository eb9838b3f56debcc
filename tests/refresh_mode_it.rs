#![cfg(feature = "reqwest")]

// std
use std::sync::atomic::{AtomicUsize, Ordering};
// crates.io
use http::{StatusCode, header::AUTHORIZATION};
use tokio::sync::Barrier;
// self
use listbackup_client::{
	ApiClient,
	_preludet::*,
	auth::{SessionEvent, UnauthenticatedReason},
	config::RefreshMode,
	flows::RefreshState,
	store::{MemoryStore, StoreKey, TokenStore},
	transport::{HttpRequest, HttpResponse, HttpTransport, TransportFuture},
};

/// Holds every request carrying the stale token until both callers have been rejected.
struct GatedBackend {
	gate: Arc<Barrier>,
	refreshes: AtomicUsize,
	refresh_rejected: bool,
}
impl GatedBackend {
	fn new(refresh_rejected: bool) -> Arc<Self> {
		Arc::new(Self {
			gate: Arc::new(Barrier::new(2)),
			refreshes: AtomicUsize::new(0),
			refresh_rejected,
		})
	}
}
impl HttpTransport for GatedBackend {
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_> {
		let bearer = request
			.headers()
			.get(AUTHORIZATION)
			.and_then(|value| value.to_str().ok())
			.map(str::to_owned);
		let path = request.uri().path().to_owned();

		Box::pin(async move {
			let (status, body): (u16, &str) = match (path.as_str(), bearer.as_deref()) {
				("/auth/refresh", _) => {
					let n = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;

					tokio::time::sleep(std::time::Duration::from_millis(20)).await;

					match n {
						_ if self.refresh_rejected => (401, r#"{"error":"Refresh token revoked"}"#),
						1 => (200, r#"{"accessToken":"T1","refreshToken":"R1"}"#),
						_ => (200, r#"{"accessToken":"T2","refreshToken":"R2"}"#),
					}
				},
				(_, Some("Bearer T0")) => {
					self.gate.wait().await;

					(401, "")
				},
				_ => (200, "[]"),
			};
			let mut response = HttpResponse::new(body.as_bytes().to_vec());

			*response.status_mut() =
				StatusCode::from_u16(status).expect("Scripted status should be valid.");

			Ok(response)
		})
	}
}

fn build(mode: RefreshMode) -> (ApiClient<GatedBackend>, Arc<GatedBackend>, Arc<MemoryStore>) {
	build_with(mode, false)
}

fn build_with(
	mode: RefreshMode,
	refresh_rejected: bool,
) -> (ApiClient<GatedBackend>, Arc<GatedBackend>, Arc<MemoryStore>) {
	let backend = GatedBackend::new(refresh_rejected);
	let store = Arc::new(MemoryStore::default());
	let config = test_config("https://api.test").with_refresh_mode(mode);
	let client =
		ApiClient::with_transport(config, store.clone() as Arc<dyn TokenStore>, backend.clone());

	seed_tokens(&*store, "T0", Some("R0"));

	(client, backend, store)
}

#[tokio::test]
async fn coalesced_mode_refreshes_once_for_concurrent_rejections() {
	let (client, backend, store) = build(RefreshMode::Coalesced);
	let jobs = client.jobs();
	let sources = client.sources();
	let (first, second) = tokio::join!(jobs.list(), sources.list());

	first.expect("Job list should succeed after refresh.");
	second.expect("Source list should succeed after refresh.");

	assert_eq!(backend.refreshes.load(Ordering::SeqCst), 1);
	assert_eq!(client.refresh.metrics().coalesced(), 1);
	assert_eq!(
		store.get(StoreKey::AccessToken).expect("Store read should succeed.").as_deref(),
		Some("T1")
	);
	assert_eq!(client.refresh.state(), RefreshState::Normal);
}

#[tokio::test]
async fn independent_mode_refreshes_per_rejection() {
	let (client, backend, _) = build(RefreshMode::Independent);
	let jobs = client.jobs();
	let sources = client.sources();
	let (first, second) = tokio::join!(jobs.list(), sources.list());

	first.expect("Job list should succeed after refresh.");
	second.expect("Source list should succeed after refresh.");

	assert_eq!(backend.refreshes.load(Ordering::SeqCst), 2);
	assert_eq!(client.refresh.metrics().coalesced(), 0);
	assert_eq!(client.refresh.state(), RefreshState::Normal);
}

#[tokio::test]
async fn coalesced_waiters_share_a_failed_refresh() {
	let (client, backend, store) = build_with(RefreshMode::Coalesced, true);
	let listener = RecordingListener::default();
	let client = client.with_listener(listener.clone());
	let sources_a = client.sources();
	let sources_b = client.sources();
	let (first, second) = tokio::join!(sources_a.list(), sources_b.list());

	for result in [first.map(|_| ()), second.map(|_| ())] {
		let err = result.expect_err("Both callers should lose the session.");

		assert!(
			matches!(
				err,
				Error::Unauthenticated { reason: UnauthenticatedReason::RefreshFailed, .. }
			),
			"Unexpected error: {err:?}."
		);
	}

	assert_eq!(backend.refreshes.load(Ordering::SeqCst), 1);
	assert_eq!(client.refresh.metrics().attempts(), 1);
	assert_eq!(client.refresh.metrics().coalesced(), 1);
	assert_eq!(listener.events(), vec![SessionEvent::Unauthenticated {
		redirect_to: "/login".into(),
		reason: UnauthenticatedReason::RefreshFailed,
	}]);
	assert!(store.is_empty());
	assert_eq!(client.refresh.state(), RefreshState::Failed);
}
