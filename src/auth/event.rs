//! Session lifecycle notifications delivered to the hosting application.
//!
//! The client never navigates on its own. When a session becomes unrecoverable it clears the
//! token store and emits [`SessionEvent::Unauthenticated`] carrying the configured login path;
//! the host decides how (and whether) to route there.

// self
use crate::_prelude::*;

/// Why a session was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnauthenticatedReason {
	/// A `401` arrived and no refresh token was stored.
	MissingRefreshToken,
	/// The refresh call failed.
	RefreshFailed,
	/// An auth-service endpoint answered `401`.
	AuthRejected,
}
impl UnauthenticatedReason {
	/// Returns a stable label suitable for logs.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::MissingRefreshToken => "missing_refresh_token",
			Self::RefreshFailed => "refresh_failed",
			Self::AuthRejected => "auth_rejected",
		}
	}
}
impl Display for UnauthenticatedReason {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Lifecycle events emitted by [`ApiClient`](crate::client::ApiClient).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
	/// Login or register stored a new session.
	Established,
	/// The access token was rotated by a refresh call.
	Refreshed,
	/// The session was cleared; the host should send the user to `redirect_to`.
	Unauthenticated {
		/// Configured login entry point.
		redirect_to: String,
		/// Cause of the failure.
		reason: UnauthenticatedReason,
	},
	/// The user logged out explicitly.
	LoggedOut,
}
impl SessionEvent {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::Established => "established",
			Self::Refreshed => "refreshed",
			Self::Unauthenticated { .. } => "unauthenticated",
			Self::LoggedOut => "logged_out",
		}
	}
}

/// Receives session lifecycle events.
pub trait SessionListener
where
	Self: Send + Sync,
{
	/// Called synchronously after the store reflects the event.
	fn on_session_event(&self, event: &SessionEvent);
}
impl<F> SessionListener for F
where
	F: Send + Sync + Fn(&SessionEvent),
{
	fn on_session_event(&self, event: &SessionEvent) {
		self(event)
	}
}

/// Listener that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopListener;
impl SessionListener for NoopListener {
	fn on_session_event(&self, _: &SessionEvent) {}
}
