//! Optional observability helpers for session calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `anymate_client.call` with the `kind` (grant
//!   or dispatch), `tenant`, and `path` fields.
//! - Enable `metrics` to increment `anymate_client_call_total{kind,outcome}` for every call and
//!   `anymate_client_http_status_total{kind,class}` for every answer received.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, auth::GrantType};

/// Outbound call kinds observed by the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// Token exchange using the password grant.
	PasswordGrant,
	/// Token exchange using the refresh-token grant.
	RefreshGrant,
	/// Authenticated API dispatch.
	Dispatch,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::PasswordGrant => "password_grant",
			CallKind::RefreshGrant => "refresh_grant",
			CallKind::Dispatch => "dispatch",
		}
	}

	/// Returns the logical endpoint name used in transport error messages.
	pub const fn endpoint(self) -> &'static str {
		match self {
			CallKind::PasswordGrant | CallKind::RefreshGrant => "the token endpoint",
			CallKind::Dispatch => "the API",
		}
	}
}
impl From<GrantType> for CallKind {
	fn from(grant: GrantType) -> Self {
		match grant {
			GrantType::Password => CallKind::PasswordGrant,
			GrantType::RefreshToken => CallKind::RefreshGrant,
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a session call.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records the terminal outcome of `result` for `kind`.
pub(crate) fn record_result<T>(kind: CallKind, result: &Result<T>) {
	match result {
		Ok(_) => record_call_outcome(kind, CallOutcome::Success),
		Err(_) => record_call_outcome(kind, CallOutcome::Failure),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn grant_types_map_to_call_kinds() {
		assert_eq!(CallKind::from(GrantType::Password), CallKind::PasswordGrant);
		assert_eq!(CallKind::from(GrantType::RefreshToken).as_str(), "refresh_grant");
		assert_eq!(CallKind::Dispatch.endpoint(), "the API");
	}
}
