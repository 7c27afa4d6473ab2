// self
use crate::{_prelude::*, obs::CallKind};

/// Future returned by [`CallSpan::instrument`]; a plain passthrough without the `tracing` feature.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`CallSpan::instrument`]; a plain passthrough without the `tracing` feature.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// Span around one token exchange or API dispatch of a tenant's session.
///
/// Carries the call `kind`, the session `tenant` (the configured client id), and the request
/// `path` relative to the server root, so exchanges and dispatches of different tenants can be
/// told apart in one subscriber.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Opens a span for a token exchange against the auth server.
	pub fn exchange(kind: CallKind, tenant: &str) -> Self {
		Self::new(kind, tenant, "/connect/token")
	}

	/// Opens a span for an API dispatch to `path`.
	pub fn dispatch(tenant: &str, path: &str) -> Self {
		Self::new(CallKind::Dispatch, tenant, path)
	}

	fn new(kind: CallKind, tenant: &str, path: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("anymate_client.call", kind = kind.as_str(), tenant, path);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, tenant, path);

			Self {}
		}
	}

	/// Runs `fut` inside the span; no guard is held across `.await` points.
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

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn exchange_and_dispatch_spans_pass_output_through() {
		let exchange = CallSpan::exchange(CallKind::PasswordGrant, "acme");
		let dispatch = CallSpan::dispatch("acme", "/TakeNext/proc1");

		assert_eq!(exchange.instrument(async { "token" }).await, "token");
		assert_eq!(dispatch.instrument(async { 7 }).await, 7);
	}
}
