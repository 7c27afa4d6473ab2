//! Request dispatcher: the one authenticated call path behind every remote operation.

// crates.io
use oauth2::http::{
	Method, Request,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	http::{SessionHttpClient, TransportErrorMapper},
	obs::{self, CallKind, CallOutcome, CallSpan},
	route::TenantRoute,
	session::{self, Session},
};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

impl<C, M> Session<C, M>
where
	C: ?Sized + SessionHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Sends one authenticated request and returns the raw response body.
	///
	/// `path` is relative to the tenant's `/api` root, e.g. `/StartOrGetRun/proc1`. The token is
	/// validated (and renewed if needed) first, and the tenant base URL is derived from its
	/// claims. Token and routing failures abort before the API is contacted. Any non-2xx answer
	/// becomes [`Error::RemoteCallFailed`].
	pub async fn send(
		&self,
		method: Method,
		path: &str,
		payload: Option<Vec<u8>>,
	) -> Result<Vec<u8>> {
		const KIND: CallKind = CallKind::Dispatch;

		let span = CallSpan::dispatch(self.credentials.tenant(), path);

		obs::record_call_outcome(KIND, CallOutcome::Attempt);
		self.metrics.record_dispatch();

		let result = span.instrument(self.dispatch(method, path, payload)).await;

		if result.is_err() {
			self.metrics.record_dispatch_failure();
		}

		obs::record_result(KIND, &result);

		result
	}

	/// Serializes `payload` as JSON and sends it.
	pub async fn send_json<P>(&self, method: Method, path: &str, payload: &P) -> Result<Vec<u8>>
	where
		P: ?Sized + Serialize,
	{
		let body = encode_payload(payload)?;

		self.send(method, path, Some(body)).await
	}

	/// Sends an optional JSON payload and decodes the JSON response into `R`.
	///
	/// An empty response body decodes as JSON `null`.
	pub async fn call<P, R>(&self, method: Method, path: &str, payload: Option<&P>) -> Result<R>
	where
		P: ?Sized + Serialize,
		R: DeserializeOwned,
	{
		let body = payload.map(encode_payload).transpose()?;
		let bytes = self.send(method, path, body).await?;

		session::decode_json(&bytes)
			.map_err(|source| DecodeError::Response { path: path.to_owned(), source }.into())
	}

	async fn dispatch(
		&self,
		method: Method,
		path: &str,
		payload: Option<Vec<u8>>,
	) -> Result<Vec<u8>> {
		let token = self.ensure_valid().await?;
		let route = TenantRoute::resolve(&self.config.deployment, token.tenant_claim()?)?;
		let url = route.api_url(path)?;
		let mut request = Request::builder()
			.method(method)
			.uri(url.as_str())
			.header(ACCEPT, "application/json")
			.header(AUTHORIZATION, format!("Bearer {}", token.secret()));
		let body = match payload {
			Some(bytes) => {
				request = request.header(CONTENT_TYPE, JSON_CONTENT_TYPE);

				bytes
			},
			None => Vec::new(),
		};
		let request = request.body(body).map_err(ConfigError::from)?;
		let response = self
			.http_client
			.execute(request)
			.await
			.map_err(|e| self.transport_mapper.map_transport_error(CallKind::Dispatch, e))?;
		let status = response.status();

		obs::record_http_status(CallKind::Dispatch, status.as_u16());

		if !status.is_success() {
			return Err(Error::RemoteCallFailed {
				path: path.to_owned(),
				status: status.as_u16(),
				reason: session::reason_phrase(status),
			});
		}

		Ok(response.into_body())
	}
}

fn encode_payload<P>(payload: &P) -> Result<Vec<u8>>
where
	P: ?Sized + Serialize,
{
	serde_json::to_vec(payload).map_err(|source| DecodeError::Payload { source }.into())
}
