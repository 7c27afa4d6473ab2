//! Cached token pair and the access-token wrapper handed to the dispatcher.

// crates.io
use oauth2::{AccessToken, RefreshToken};
// self
use crate::{
	_prelude::*,
	auth::{TenantKey, TokenClaims},
};

/// Lifecycle status of the cached access token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenStatus {
	/// No access token is cached.
	Missing,
	/// The token is expired, inside the guard window, or carries no decodable expiry.
	NeedsRenewal,
	/// The token can be used without contacting the auth server.
	Active,
}

/// Access token plus the claims decoded from it.
#[derive(Clone)]
pub struct SessionToken {
	access_token: AccessToken,
	claims: TokenClaims,
}
impl SessionToken {
	/// Wraps a raw access token, decoding its claims.
	///
	/// Undecodable tokens are kept with empty claims so that they are treated as expired.
	pub fn new(raw: impl Into<String>) -> Self {
		let raw = raw.into();
		let claims = TokenClaims::decode(&raw).unwrap_or_default();

		Self { access_token: AccessToken::new(raw), claims }
	}

	/// Returns the raw bearer value. Callers must avoid logging it.
	pub fn secret(&self) -> &str {
		self.access_token.secret()
	}

	/// Returns the decoded claims.
	pub fn claims(&self) -> &TokenClaims {
		&self.claims
	}

	/// Returns the expiry instant, if the token declares one.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.claims.expires_at
	}

	/// Returns the raw tenant claim carried by the token.
	pub fn tenant_claim(&self) -> Result<&str> {
		self.claims.tenant_claim()
	}

	/// Returns the tenant claim validated as a host label.
	pub fn tenant_key(&self) -> Result<TenantKey> {
		self.claims.tenant_key()
	}

	/// Returns `true` when the token must be renewed at `now` given a safety `margin`.
	pub fn needs_renewal_at(&self, now: OffsetDateTime, margin: Duration) -> bool {
		self.claims.needs_renewal_at(now, margin)
	}
}
impl Debug for SessionToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionToken")
			.field("access_token", &"<redacted>")
			.field("claims", &self.claims)
			.finish()
	}
}

/// The single authoritative token pair of a session.
#[derive(Clone, Default)]
pub struct TokenState {
	/// Current access token, if any.
	pub access: Option<SessionToken>,
	/// Refresh token returned by the last exchange, if any.
	pub refresh_token: Option<RefreshToken>,
}
impl TokenState {
	/// Builds the state produced by a successful exchange.
	pub fn issued(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
		Self {
			access: Some(SessionToken::new(access_token)),
			refresh_token: refresh_token.map(RefreshToken::new),
		}
	}

	/// Computes the token status at `now` given a safety `margin`.
	pub fn status_at(&self, now: OffsetDateTime, margin: Duration) -> TokenStatus {
		match &self.access {
			None => TokenStatus::Missing,
			Some(token) if token.secret().trim().is_empty() => TokenStatus::Missing,
			Some(token) if token.needs_renewal_at(now, margin) => TokenStatus::NeedsRenewal,
			Some(_) => TokenStatus::Active,
		}
	}

	/// Returns the access token when it is usable at `now`.
	pub fn usable_at(&self, now: OffsetDateTime, margin: Duration) -> Option<&SessionToken> {
		match self.status_at(now, margin) {
			TokenStatus::Active => self.access.as_ref(),
			TokenStatus::Missing | TokenStatus::NeedsRenewal => None,
		}
	}

	/// Drops both tokens.
	pub fn clear(&mut self) {
		*self = Self::default();
	}
}
impl Debug for TokenState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenState")
			.field("access", &self.access)
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::unsigned_jwt, auth::TENANT_CLAIM};

	fn token_expiring_in(delta: Duration) -> String {
		let exp = (OffsetDateTime::now_utc() + delta).unix_timestamp();

		unsigned_jwt(&serde_json::json!({ "exp": exp, TENANT_CLAIM: "acme" }))
	}

	#[test]
	fn status_follows_expiry_and_margin() {
		let now = OffsetDateTime::now_utc();
		let margin = Duration::seconds(60);

		assert_eq!(TokenState::default().status_at(now, margin), TokenStatus::Missing);
		assert_eq!(
			TokenState::issued(token_expiring_in(Duration::hours(1)), None).status_at(now, margin),
			TokenStatus::Active
		);
		assert_eq!(
			TokenState::issued(token_expiring_in(Duration::seconds(10)), None)
				.status_at(now, margin),
			TokenStatus::NeedsRenewal
		);
		assert_eq!(
			TokenState::issued("not-a-jwt", None).status_at(now, margin),
			TokenStatus::NeedsRenewal
		);
		assert_eq!(TokenState::issued("", None).status_at(now, margin), TokenStatus::Missing);
	}

	#[test]
	fn clear_drops_both_tokens() {
		let mut state =
			TokenState::issued(token_expiring_in(Duration::hours(1)), Some("refresh".into()));

		state.clear();

		assert!(state.access.is_none());
		assert!(state.refresh_token.is_none());
	}

	#[test]
	fn debug_output_redacts_tokens() {
		let state = TokenState::issued(token_expiring_in(Duration::hours(1)), Some("r-9".into()));
		let rendered = format!("{state:?}");

		assert!(!rendered.contains("r-9"));
		assert!(!rendered.contains(state.access.as_ref().map(SessionToken::secret).unwrap_or("?")));
	}
}
