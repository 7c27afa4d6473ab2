//! Session-level error types shared by the token manager, the dispatcher, and the API catalog.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical session error exposed by public APIs.
///
/// Every variant aborts the current logical operation. The session never retries on its own.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Payload or response body could not be encoded or decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// A credential required for the next grant is absent; raised before any network call.
	#[error("Credential `{field}` is missing.")]
	MissingCredential {
		/// Name of the missing form field (`client_id`, `client_secret`, ...).
		field: &'static str,
	},
	/// The auth endpoint rejected the grant exchange.
	#[error("Could not authenticate, token endpoint answered {status} - {reason}.")]
	AuthenticationFailed {
		/// HTTP status code returned by the auth endpoint.
		status: u16,
		/// Reason phrase for the status code.
		reason: String,
	},
	/// The access token does not carry the claim needed for tenant routing.
	#[error("Access token lacks the `{claim}` claim.")]
	TokenClaimMissing {
		/// Claim name that was expected.
		claim: &'static str,
	},
	/// An authenticated API call returned a non-success status.
	#[error("Remote call to `{path}` failed with {status} - {reason}.")]
	RemoteCallFailed {
		/// Operation path that was dispatched.
		path: String,
		/// HTTP status code returned by the API.
		status: u16,
		/// Reason phrase for the status code.
		reason: String,
	},
}

/// Configuration and validation failures raised by the session.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A configured or derived base URL is not a valid absolute URL.
	#[error("The {endpoint} URL `{url}` is invalid.")]
	InvalidUrl {
		/// Which URL failed validation (`api`, `auth`, ...).
		endpoint: &'static str,
		/// The offending value.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A configured base URL uses a scheme other than `http`/`https`.
	#[error("The {endpoint} URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Which URL failed validation.
		endpoint: &'static str,
		/// The offending value.
		url: String,
	},
	/// A tenant key cannot be used as a host label.
	#[error(transparent)]
	InvalidTenantKey(#[from] crate::auth::TenantKeyError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Encoding and decoding failures around JSON bodies.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Token endpoint answered 2xx with a body that is not a token response.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Caller payload could not be serialized.
	#[error("Request payload could not be serialized.")]
	Payload {
		/// Serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// API response body did not match the requested shape.
	#[error("Response from `{path}` could not be decoded.")]
	Response {
		/// Operation path the body came from.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {endpoint}.")]
	Network {
		/// Logical endpoint that was being called.
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The fixed per-call timeout elapsed.
	#[error("Request to {endpoint} timed out.")]
	Timeout {
		/// Logical endpoint that was being called.
		endpoint: &'static str,
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during transport.")]
	Io(#[from] std::io::Error),
	/// Transport failed without a structured error.
	#[error("HTTP client error occurred while calling {endpoint}: {message}.")]
	Other {
		/// Logical endpoint that was being called.
		endpoint: &'static str,
		/// Transport-supplied description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(
		endpoint: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Timeout { endpoint, source: Box::new(src) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn status_errors_render_status_line() {
		let err = Error::AuthenticationFailed { status: 400, reason: "Bad Request".into() };

		assert_eq!(
			err.to_string(),
			"Could not authenticate, token endpoint answered 400 - Bad Request."
		);

		let err = Error::RemoteCallFailed {
			path: "/TakeNext/proc1".into(),
			status: 404,
			reason: "Not Found".into(),
		};

		assert_eq!(err.to_string(), "Remote call to `/TakeNext/proc1` failed with 404 - Not Found.");
	}

	#[test]
	fn missing_credential_names_the_field() {
		let err = Error::MissingCredential { field: "client_secret" };

		assert_eq!(err.to_string(), "Credential `client_secret` is missing.");
	}
}
