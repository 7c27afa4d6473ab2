//! Token manager: cached-token evaluation, single-flight renewal, and grant exchanges.
//!
//! The token pair lives behind one async mutex. [`Session::ensure_valid`] holds it across the
//! status check and the exchange, so concurrent callers that find the token stale wait for the
//! one in-flight renewal and then reuse its result instead of sending their own.

// crates.io
use oauth2::{
	RefreshToken,
	http::{
		Method, Request,
		header::{ACCEPT, CONTENT_TYPE},
	},
};
// self
use crate::{
	_prelude::*,
	auth::{GrantMaterial, GrantRequest, SessionToken, TokenState, TokenStatus},
	http::{SessionHttpClient, TransportErrorMapper},
	obs::{self, CallKind, CallOutcome, CallSpan},
	route,
	session::{self, Session},
};

#[derive(Deserialize)]
struct TokenResponse {
	access_token: String,
	#[serde(default)]
	refresh_token: Option<String>,
}

impl<C, M> Session<C, M>
where
	C: ?Sized + SessionHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Returns a usable access token, renewing it first when it is missing, undecodable, or
	/// inside the expiry margin.
	///
	/// Renewal uses the refresh grant when a refresh token is known and the password grant
	/// otherwise. Missing credentials are reported before any network call.
	pub async fn ensure_valid(&self) -> Result<SessionToken> {
		let mut state = self.token.lock().await;

		if let Some(token) = state.usable_at(OffsetDateTime::now_utc(), self.config.expiry_margin)
		{
			return Ok(token.clone());
		}

		self.renew_locked(&mut state).await
	}

	/// Eagerly obtains a token so that later dispatches start authenticated.
	pub async fn authenticate(&self) -> Result<()> {
		self.ensure_valid().await.map(|_| ())
	}

	/// Renews the token pair regardless of the cached token's status.
	pub async fn renew(&self) -> Result<SessionToken> {
		let mut state = self.token.lock().await;

		self.renew_locked(&mut state).await
	}

	/// Performs one grant exchange and stores its result.
	///
	/// On any failure the cached pair is cleared, leaving the session unauthenticated.
	pub async fn exchange(&self, grant: &GrantRequest<'_>) -> Result<SessionToken> {
		let mut state = self.token.lock().await;

		self.exchange_locked(&mut state, grant).await
	}

	/// Returns the cached access token, if any, without validating it.
	pub async fn access_token(&self) -> Option<SessionToken> {
		self.token.lock().await.access.clone()
	}

	/// Replaces the cached access token, keeping the refresh token.
	///
	/// The token is decoded leniently; one without a usable expiry is renewed on next use.
	pub async fn set_access_token(&self, raw: impl Into<String>) {
		self.token.lock().await.access = Some(SessionToken::new(raw));
	}

	/// Drops the cached token pair.
	pub async fn clear_token(&self) {
		self.token.lock().await.clear();
	}

	/// Returns the cached token's status at the current instant.
	pub async fn token_status(&self) -> TokenStatus {
		self.token.lock().await.status_at(OffsetDateTime::now_utc(), self.config.expiry_margin)
	}

	/// Returns `true` when the credentials are complete enough to attempt a renewal.
	pub fn has_auth_credentials(&self) -> bool {
		self.credentials.is_complete()
	}

	async fn renew_locked(&self, state: &mut TokenState) -> Result<SessionToken> {
		let rotated = state.refresh_token.clone();
		let grant = self.credentials.grant_request(rotated.as_ref())?;

		self.exchange_locked(state, &grant).await
	}

	async fn exchange_locked(
		&self,
		state: &mut TokenState,
		grant: &GrantRequest<'_>,
	) -> Result<SessionToken> {
		let kind = CallKind::from(grant.grant_type());
		let span = CallSpan::exchange(kind, self.credentials.tenant());

		obs::record_call_outcome(kind, CallOutcome::Attempt);
		self.metrics.record_exchange();

		let result = span.instrument(self.request_token(kind, grant)).await.map(
			|(token, refresh_token)| {
				*state = TokenState { access: Some(token.clone()), refresh_token };

				token
			},
		);

		if result.is_err() {
			state.clear();
			self.metrics.record_exchange_failure();
		}

		obs::record_result(kind, &result);

		result
	}

	async fn request_token(
		&self,
		kind: CallKind,
		grant: &GrantRequest<'_>,
	) -> Result<(SessionToken, Option<RefreshToken>)> {
		let url = route::token_url(&self.config.deployment, grant.client_id.as_str())?;
		let request = Request::builder()
			.method(Method::POST)
			.uri(url.as_str())
			.header(ACCEPT, "application/json")
			.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
			.body(grant.to_form_body().into_bytes())
			.map_err(ConfigError::from)?;
		let response = self
			.http_client
			.execute(request)
			.await
			.map_err(|e| self.transport_mapper.map_transport_error(kind, e))?;
		let status = response.status();

		obs::record_http_status(kind, status.as_u16());

		if !status.is_success() {
			return Err(Error::AuthenticationFailed {
				status: status.as_u16(),
				reason: session::reason_phrase(status),
			});
		}

		let body: TokenResponse = session::decode_json(response.body())
			.map_err(|source| DecodeError::TokenResponse { source })?;
		let refresh_token = body
			.refresh_token
			.filter(|value| !value.trim().is_empty())
			.map(RefreshToken::new)
			.or_else(|| match grant.material {
				GrantMaterial::RefreshToken(used) => Some(used.clone()),
				GrantMaterial::Password { .. } => None,
			});

		Ok((SessionToken::new(body.access_token), refresh_token))
	}
}
