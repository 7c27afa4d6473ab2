//! Demonstrates registering a custom HTTP client and mapper that emit non-reqwest errors.
//!
//! 1. Implement [`SessionHttpClient`] so the transport answers session requests.
//! 2. Provide a [`TransportErrorMapper`] that understands the transport's own error type.
//! 3. Wrap both in `Arc` and pass them to [`Session::with_http_client`].
//! 4. Observe the resulting [`HttpClientError`] variants come back as session [`Error`]s.

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::Arc,
};
// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use color_eyre::Result;
use time::{Duration, OffsetDateTime};
// self
use anymate_client::{
	auth::{Credentials, TENANT_CLAIM},
	config::ClientConfig,
	error::{Error, TransportError},
	http::{HttpFuture, SessionHttpClient, TransportErrorMapper},
	oauth2::{HttpClientError, HttpRequest, HttpResponse},
	obs::CallKind,
	session::Session,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let mapper = <Arc<MockTransportErrorMapper>>::new(MockTransportErrorMapper);
	let session: Session<MockHttpClient, MockTransportErrorMapper> = Session::with_http_client(
		Credentials::password("acme", "demo-secret", "robot", "hunter2"),
		ClientConfig::cloud(),
		Arc::new(MockHttpClient::default()),
		Arc::clone(&mapper),
	);
	let run = session.start_or_get_run("invoices").await?;

	println!("Run issued by the mock transport: {}.", run.run_id);

	let failing_client =
		Arc::new(MockHttpClient::transport_error(MockTransportError::DnsFailure {
			host: "acme.auth.anymate.app",
		}));
	let failing_session: Session<MockHttpClient, MockTransportErrorMapper> =
		Session::with_http_client(
			Credentials::password("acme", "demo-secret", "robot", "hunter2"),
			ClientConfig::cloud(),
			failing_client,
			Arc::clone(&mapper),
		);

	match failing_session.start_or_get_run("invoices").await {
		Ok(_) => println!("Mock transport unexpectedly succeeded."),
		Err(e) => println!("Transport error mapped by the session: {e}."),
	}

	let other_client = Arc::new(MockHttpClient::other_error("upstream connection closed"));
	let other_session: Session<MockHttpClient, MockTransportErrorMapper> =
		Session::with_http_client(
			Credentials::password("acme", "demo-secret", "robot", "hunter2"),
			ClientConfig::cloud(),
			other_client,
			mapper,
		);

	match other_session.authenticate().await {
		Ok(_) => println!("Mock transport unexpectedly produced a token."),
		Err(e) => println!("An HttpClientError::Other variant made it through the mapper: {e}."),
	}

	Ok(())
}

#[derive(Clone, Debug)]
enum MockTransportError {
	DnsFailure {
		host: &'static str,
	},
	#[allow(unused)]
	BackendTimeout,
}
impl Display for MockTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::DnsFailure { host } => write!(f, "DNS lookup failed for {host}"),
			Self::BackendTimeout => write!(f, "Backend timed out"),
		}
	}
}
impl StdError for MockTransportError {}

#[derive(Clone)]
enum MockBehavior {
	Success,
	TransportError(MockTransportError),
	Other(&'static str),
}

#[derive(Clone)]
struct MockHttpClient {
	behavior: MockBehavior,
}
impl MockHttpClient {
	fn success() -> Self {
		Self { behavior: MockBehavior::Success }
	}

	fn transport_error(error: MockTransportError) -> Self {
		Self { behavior: MockBehavior::TransportError(error) }
	}

	fn other_error(message: &'static str) -> Self {
		Self { behavior: MockBehavior::Other(message) }
	}
}
impl Default for MockHttpClient {
	fn default() -> Self {
		Self::success()
	}
}
impl SessionHttpClient for MockHttpClient {
	type TransportError = MockTransportError;

	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
		let behavior = self.behavior.clone();

		Box::pin(async move {
			match behavior {
				MockBehavior::Success if request.uri().path() == "/connect/token" => {
					let body = serde_json::json!({ "access_token": mock_access_token() });

					Ok(HttpResponse::new(body.to_string().into_bytes()))
				},
				MockBehavior::Success => Ok(HttpResponse::new(b"{\"RunId\":42}".to_vec())),
				// The oauth2 crate keeps the `Reqwest` variant name even though the boxed
				// payload can be any transport error.
				MockBehavior::TransportError(error) =>
					Err(HttpClientError::Reqwest(Box::new(error))),
				MockBehavior::Other(message) => Err(HttpClientError::Other(message.to_owned())),
			}
		})
	}
}

#[derive(Clone, Default)]
struct MockTransportErrorMapper;
impl TransportErrorMapper<MockTransportError> for MockTransportErrorMapper {
	fn map_transport_error(
		&self,
		kind: CallKind,
		error: HttpClientError<MockTransportError>,
	) -> Error {
		let endpoint = kind.endpoint();

		match error {
			HttpClientError::Reqwest(inner) => match *inner {
				MockTransportError::BackendTimeout =>
					TransportError::timeout(endpoint, MockTransportError::BackendTimeout).into(),
				other => TransportError::network(endpoint, other).into(),
			},
			HttpClientError::Other(message) => TransportError::Other { endpoint, message }.into(),
			_ => TransportError::Other { endpoint, message: format!("{kind} failed") }.into(),
		}
	}
}

fn mock_access_token() -> String {
	let exp = (OffsetDateTime::now_utc() + Duration::hours(1)).unix_timestamp();
	let claims = serde_json::json!({ "exp": exp, TENANT_CLAIM: "acme" });

	format!(
		"{}.{}.",
		URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#),
		URL_SAFE_NO_PAD.encode(claims.to_string())
	)
}
