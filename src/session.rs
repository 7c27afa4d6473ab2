//! The session: one logical client owning credentials, configuration, and the token pair.
//!
//! A [`Session`] combines the token manager ([`token`]) and the request dispatcher
//! ([`dispatch`]). Every remote operation flows through [`Session::send`], which first asks
//! [`Session::ensure_valid`] for a usable token, then routes the call to the tenant named by that
//! token.

pub mod dispatch;
pub mod token;

mod metrics;

pub use metrics::SessionMetrics;
pub use oauth2::http::Method;

// crates.io
use oauth2::http::StatusCode;
// self
use crate::{
	_prelude::*,
	auth::{Credentials, TokenState},
	config::ClientConfig,
	http::{SessionHttpClient, TransportErrorMapper},
};
#[cfg(feature = "reqwest")]
use crate::http::{ReqwestHttpClient, ReqwestTransportErrorMapper};

/// Session specialized for the crate's default reqwest transport stack.
#[cfg(feature = "reqwest")]
pub type ReqwestSession = Session<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Authenticated client for one tenant.
///
/// Clones share the HTTP client, the metrics, and the token pair, so renewals performed through
/// any clone are observed by all of them. Credentials and configuration are fixed at
/// construction.
pub struct Session<C, M>
where
	C: ?Sized + SessionHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client used for every token exchange and API dispatch.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// In-process counters for exchanges and dispatches.
	pub metrics: Arc<SessionMetrics>,
	credentials: Credentials,
	config: ClientConfig,
	token: Arc<AsyncMutex<TokenState>>,
}
impl<C, M> Session<C, M>
where
	C: ?Sized + SessionHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a session that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		credentials: Credentials,
		config: ClientConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			metrics: Default::default(),
			credentials,
			config,
			token: Default::default(),
		}
	}

	/// Starts the session from a previously issued token pair instead of an empty state.
	pub fn with_token_state(self, state: TokenState) -> Self {
		Self { token: Arc::new(AsyncMutex::new(state)), ..self }
	}

	/// Credentials the session renews tokens with.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	/// Configuration fixed at construction.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}
}
#[cfg(feature = "reqwest")]
impl Session<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a session backed by a pooled reqwest client honoring the configured timeout.
	pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::with_timeout(config.request_timeout)?;

		Ok(Self::with_http_client(
			credentials,
			config,
			http_client,
			Arc::new(ReqwestTransportErrorMapper),
		))
	}
}
impl<C, M> Clone for Session<C, M>
where
	C: ?Sized + SessionHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			transport_mapper: Arc::clone(&self.transport_mapper),
			metrics: Arc::clone(&self.metrics),
			credentials: self.credentials.clone(),
			config: self.config.clone(),
			token: Arc::clone(&self.token),
		}
	}
}
impl<C, M> Debug for Session<C, M>
where
	C: ?Sized + SessionHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session")
			.field("tenant", &self.credentials.tenant())
			.field("config", &self.config)
			.field("metrics", &self.metrics)
			.finish_non_exhaustive()
	}
}

fn reason_phrase(status: StatusCode) -> String {
	status.canonical_reason().unwrap_or("Unknown Status").to_owned()
}

fn decode_json<T>(bytes: &[u8]) -> Result<T, serde_path_to_error::Error<serde_json::Error>>
where
	T: DeserializeOwned,
{
	let bytes = if bytes.iter().all(u8::is_ascii_whitespace) { b"null".as_slice() } else { bytes };
	let mut deserializer = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut deserializer)
}
