//! Session refresh orchestration with single-flight coalescing, state tracking, and metrics.
//!
//! A `401` from the general API client lands in [`ApiClient::recover_session`]. The coordinator
//! reads the refresh token, exchanges it at `POST /auth/refresh` through the auth client, stores
//! the rotated tokens, and hands the new access token back so the original request can be
//! re-dispatched exactly once. A missing refresh token or a failed exchange drops the session:
//! the store is cleared and [`SessionEvent::Unauthenticated`] is emitted.
//!
//! In [`RefreshMode::Coalesced`] exchanges are serialized behind an async mutex. A caller that
//! acquires it after someone else already rotated the session (the stored access token no longer
//! matches the one its request carried) reuses the stored token instead of exchanging again.

mod metrics;

pub use metrics::RefreshMetrics;

// std
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
// self
use crate::{
	_prelude::*,
	auth::{Session, SessionEvent, UnauthenticatedReason},
	client::{ApiClient, ApiRequest, ClientKind},
	config::RefreshMode,
	obs::{self, CallKind, CallOutcome, CallSpan},
	transport::HttpTransport,
};

/// Auth-service path exchanging a refresh token for a new session.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Observable refresh state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshState {
	/// No exchange in flight; the last exchange (if any) succeeded.
	Normal,
	/// At least one exchange is in flight.
	Refreshing,
	/// The session was dropped and no new one has been established.
	Failed,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
	refresh_token: &'a str,
}

/// Shared refresh bookkeeping owned by an [`ApiClient`].
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
	mode: RefreshMode,
	in_flight: AtomicUsize,
	failed: AtomicBool,
	generation: AtomicU64,
	last_failure: Mutex<Option<UnauthenticatedReason>>,
	metrics: RefreshMetrics,
	singleflight: AsyncMutex<()>,
}
impl RefreshCoordinator {
	/// Creates a coordinator in the `Normal` state.
	pub fn new(mode: RefreshMode) -> Self {
		Self { mode, ..Default::default() }
	}

	/// Configured coordination mode.
	pub fn mode(&self) -> RefreshMode {
		self.mode
	}

	/// Current state.
	pub fn state(&self) -> RefreshState {
		if self.in_flight.load(Ordering::Acquire) > 0 {
			RefreshState::Refreshing
		} else if self.failed.load(Ordering::Acquire) {
			RefreshState::Failed
		} else {
			RefreshState::Normal
		}
	}

	/// Refresh counters.
	pub fn metrics(&self) -> &RefreshMetrics {
		&self.metrics
	}

	/// Number of refresh exchanges that have finished, successfully or not.
	pub fn generation(&self) -> u64 {
		self.generation.load(Ordering::Acquire)
	}

	pub(crate) fn mark_established(&self) {
		*self.last_failure.lock() = None;
		self.failed.store(false, Ordering::Release);
	}

	pub(crate) fn mark_failed(&self, reason: UnauthenticatedReason) {
		*self.last_failure.lock() = Some(reason);
		self.failed.store(true, Ordering::Release);
	}

	fn last_failure(&self) -> Option<UnauthenticatedReason> {
		*self.last_failure.lock()
	}

	fn begin(&self) -> InFlight<'_> {
		self.in_flight.fetch_add(1, Ordering::AcqRel);

		InFlight(&self.in_flight)
	}
}

struct InFlight<'a>(&'a AtomicUsize);
impl Drop for InFlight<'_> {
	fn drop(&mut self) {
		self.0.fetch_sub(1, Ordering::AcqRel);
	}
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Exchanges the stored refresh token for a new session.
	///
	/// In coalesced mode the exchange waits for any in-flight one to finish first.
	pub async fn refresh_session(&self) -> Result<Session> {
		let span = CallSpan::new(CallKind::Refresh, "refresh_session");

		span.instrument(async {
			let _singleflight = match self.refresh.mode {
				RefreshMode::Coalesced => Some(self.refresh.singleflight.lock().await),
				RefreshMode::Independent => None,
			};

			self.rotate().await
		})
		.await
	}

	/// Produces a usable access token after `sent_token` was rejected with `401`.
	///
	/// `observed` is the coordinator generation read before the rejected request was sent. In
	/// coalesced mode a waiter that finds a newer generation shares that exchange's outcome: the
	/// rotated token on success, or the same `Unauthenticated` reason on failure without a second
	/// session drop.
	pub(crate) async fn recover_session(
		&self,
		sent_token: Option<&str>,
		observed: u64,
	) -> Result<String> {
		let span = CallSpan::new(CallKind::Refresh, "recover_session");

		span.instrument(async {
			if self.refresh.mode == RefreshMode::Independent {
				let session = self.rotate().await?;

				return Ok(session.access_token.expose().to_owned());
			}

			let _singleflight = self.refresh.singleflight.lock().await;
			let rotated =
				self.store.access_token()?.filter(|current| Some(current.as_str()) != sent_token);

			if let Some(current) = rotated {
				self.refresh.metrics.record_coalesced();

				return Ok(current);
			}
			let shared_failure = (self.refresh.generation() != observed)
				.then(|| self.refresh.last_failure())
				.flatten();

			if let Some(reason) = shared_failure {
				self.refresh.metrics.record_coalesced();

				return Err(Error::Unauthenticated { reason, source: None });
			}

			self.rotate().await.map(|session| session.access_token.expose().to_owned())
		})
		.await
	}

	async fn rotate(&self) -> Result<Session> {
		const KIND: CallKind = CallKind::Refresh;

		obs::record_call_outcome(KIND, CallOutcome::Attempt);
		self.refresh.metrics.record_attempt();

		let _in_flight = self.refresh.begin();
		let result = self.rotate_inner().await;

		self.refresh.generation.fetch_add(1, Ordering::AcqRel);

		match &result {
			Ok(_) => {
				self.refresh.metrics.record_success();
				obs::record_call_outcome(KIND, CallOutcome::Success);
			},
			Err(_) => {
				self.refresh.metrics.record_failure();
				obs::record_call_outcome(KIND, CallOutcome::Failure);
			},
		}

		result
	}

	async fn rotate_inner(&self) -> Result<Session> {
		let Some(refresh_token) = self.store.refresh_token()? else {
			self.drop_session(UnauthenticatedReason::MissingRefreshToken);

			return Err(Error::Unauthenticated {
				reason: UnauthenticatedReason::MissingRefreshToken,
				source: None,
			});
		};
		let exchange = async {
			let request = ApiRequest::post(REFRESH_PATH)
				.with_json(&RefreshRequest { refresh_token: &refresh_token })?;

			self.http(ClientKind::Auth)
				.dispatch(&request)
				.await?
				.response
				.error_for_status()?
				.json::<Session>()
		};
		let mut session = match exchange.await {
			Ok(session) => session,
			Err(err) => {
				self.drop_session(UnauthenticatedReason::RefreshFailed);

				return Err(Error::Unauthenticated {
					reason: UnauthenticatedReason::RefreshFailed,
					source: Some(Box::new(err)),
				});
			},
		};

		if session.refresh_token.is_none() {
			session.refresh_token = Some(refresh_token.into());
		}

		self.store.save_session(&session)?;
		self.refresh.mark_established();
		self.emit(SessionEvent::Refreshed);

		Ok(session)
	}

	/// Clears the store, enters `Failed`, and notifies the listener.
	pub(crate) fn drop_session(&self, reason: UnauthenticatedReason) {
		self.refresh.mark_failed(reason);

		if let Err(err) = self.store.clear() {
			#[cfg(feature = "tracing")]
			tracing::error!(error = %err, "failed to clear token store while dropping session");
			#[cfg(not(feature = "tracing"))]
			let _ = err;
		}

		self.emit(SessionEvent::Unauthenticated {
			redirect_to: self.login_path().to_owned(),
			reason,
		});
	}

	/// Replaces whatever the store holds with `session` and leaves the `Failed` state.
	pub(crate) fn establish_session(&self, session: &Session) -> Result<()> {
		self.store.clear()?;
		self.store.save_session(session)?;
		self.refresh.mark_established();
		self.emit(SessionEvent::Established);

		Ok(())
	}

	/// Clears the store after an explicit logout.
	pub(crate) fn end_session(&self) -> Result<()> {
		self.store.clear()?;
		self.emit(SessionEvent::LoggedOut);

		Ok(())
	}
}
