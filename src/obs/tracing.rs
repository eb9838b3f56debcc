// self
use crate::{_prelude::*, auth::SessionEvent, obs::CallKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used around dispatches and refreshes.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided call kind + stage.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("listbackup_client.call", call = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs a session lifecycle event; session loss is a warning, everything else is info.
pub fn record_session_event(event: &SessionEvent) {
	#[cfg(feature = "tracing")]
	{
		match event {
			SessionEvent::Unauthenticated { redirect_to, reason } => tracing::warn!(
				event = event.as_str(),
				reason = reason.as_str(),
				redirect_to = redirect_to.as_str(),
				"session dropped"
			),
			_ => tracing::info!(event = event.as_str(), "session updated"),
		}
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = event;
	}
}
