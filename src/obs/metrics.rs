// self
use crate::obs::{CallKind, CallOutcome};

/// Counts a call outcome as `anymate_client_call_total{kind,outcome}`.
pub fn record_call_outcome(kind: CallKind, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"anymate_client_call_total",
			"kind" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Counts the HTTP status the auth server or the API answered with, as
/// `anymate_client_http_status_total{kind,class}`.
/// Statuses are bucketed into classes (`2xx`, `4xx`, ...).
pub fn record_http_status(kind: CallKind, status: u16) {
	let class = status_class(status);

	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"anymate_client_http_status_total",
			"kind" => kind.as_str(),
			"class" => class
		)
		.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, class);
	}
}

fn status_class(status: u16) -> &'static str {
	match status {
		100..=199 => "1xx",
		200..=299 => "2xx",
		300..=399 => "3xx",
		400..=499 => "4xx",
		500..=599 => "5xx",
		_ => "other",
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn statuses_collapse_into_classes() {
		assert_eq!(status_class(200), "2xx");
		assert_eq!(status_class(204), "2xx");
		assert_eq!(status_class(400), "4xx");
		assert_eq!(status_class(503), "5xx");
		assert_eq!(status_class(999), "other");
	}

	#[test]
	fn recording_without_a_recorder_is_a_noop() {
		record_call_outcome(CallKind::Dispatch, CallOutcome::Failure);
		record_http_status(CallKind::RefreshGrant, 401);
	}
}
