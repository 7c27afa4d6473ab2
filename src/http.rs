//! Transport primitives shared by token exchanges and API dispatches.
//!
//! [`SessionHttpClient`] is the session's only dependency on an HTTP stack. Requests and
//! responses use the `oauth2` crate's `http` aliases so custom transports do not need to pull in
//! another request model. Transport failures come back as [`HttpClientError`] and are converted
//! into session errors by a [`TransportErrorMapper`].

// std
use std::{ops::Deref, time::Duration as StdDuration};
// crates.io
use oauth2::{HttpClientError, HttpRequest, HttpResponse};
// self
use crate::{_prelude::*, obs::CallKind};

/// Boxed future returned by [`SessionHttpClient::execute`].
pub type HttpFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, HttpClientError<E>>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing session requests.
///
/// Implementations must be `Send + Sync + 'static` so one transport can back a session that is
/// shared across tasks. Non-2xx responses are returned as `Ok`; classification is the
/// session's job.
pub trait SessionHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Executes `request` and buffers the whole response body.
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError>;
}

/// Maps HTTP transport failures into session [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted while performing `kind` into a session error.
	fn map_transport_error(&self, kind: CallKind, error: HttpClientError<E>) -> Error;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Neither the token endpoint nor the API answers with redirects, so clients built here never
/// follow them. Custom clients passed to [`ReqwestHttpClient::with_client`] should do the same.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a pooled client that applies `timeout` to every call and ignores redirects.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.redirect(reqwest::redirect::Policy::none())
			.build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl SessionHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(&self, kind: CallKind, err: HttpClientError<ReqwestError>) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(kind, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) =>
				TransportError::Other { endpoint: kind.endpoint(), message }.into(),
			_ => TransportError::Other {
				endpoint: kind.endpoint(),
				message: "unrecognized transport failure".into(),
			}
			.into(),
		}
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(kind: CallKind, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransportError::timeout(kind.endpoint(), err).into();
	}

	TransportError::network(kind.endpoint(), err).into()
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;

	#[test]
	fn other_and_io_failures_keep_their_shape() {
		let mapper = ReqwestTransportErrorMapper;
		let err = mapper.map_transport_error(
			CallKind::Dispatch,
			HttpClientError::Other("connection reset".into()),
		);

		assert!(matches!(
			err,
			Error::Transport(TransportError::Other { endpoint: "the API", ref message })
				if message == "connection reset"
		));

		let err = mapper.map_transport_error(
			CallKind::PasswordGrant,
			HttpClientError::Io(std::io::Error::other("broken pipe")),
		);

		assert!(matches!(err, Error::Transport(TransportError::Io(_))));
	}

	#[tokio::test]
	async fn unreachable_hosts_map_to_network_errors() {
		let client = ReqwestHttpClient::with_timeout(StdDuration::from_secs(2))
			.expect("Client should build.");
		let request = oauth2::http::Request::builder()
			.uri("http://127.0.0.1:1/api/TakeNext/proc1")
			.body(Vec::new())
			.expect("Request should build.");
		let err = client.execute(request).await.expect_err("Port 1 should refuse connections.");
		let mapped = ReqwestTransportErrorMapper.map_transport_error(CallKind::Dispatch, err);

		assert!(matches!(
			mapped,
			Error::Transport(TransportError::Network { endpoint: "the API", .. })
		));
	}
}
