//! Unverified JWT claim decoding for expiry checks and tenant routing.
//!
//! Signatures are NOT verified. Access tokens are only ever obtained directly from the
//! tenant's auth server over TLS, so the session trusts whatever the issuer put in the
//! payload segment and uses it for two decisions: when to renew, and where to route.

// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::Value;
// self
use crate::{_prelude::*, auth::TenantKey};

/// Claim carrying the customer key of the tenant that issued the token.
pub const TENANT_CLAIM: &str = "auth.anymate.app/CustomerKey";
/// Registered JWT expiry claim (seconds since the Unix epoch).
pub const EXPIRY_CLAIM: &str = "exp";

/// Errors raised while decoding the payload segment of an access token.
#[derive(Debug, ThisError)]
pub enum ClaimsError {
	/// The token does not have the `header.payload.signature` shape.
	#[error("Access token is not a three-segment JWT.")]
	Malformed,
	/// The payload segment is not base64url.
	#[error("Access token payload is not valid base64url.")]
	Encoding(#[from] base64::DecodeError),
	/// The payload segment is not a JSON object.
	#[error("Access token payload is not a JSON object.")]
	Payload(#[from] serde_json::Error),
}

/// Claims the session cares about, decoded from an access token.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenClaims {
	/// Expiry instant, when the token carries a usable `exp` claim.
	pub expires_at: Option<OffsetDateTime>,
	/// Raw tenant claim value, when present and non-blank.
	pub tenant: Option<String>,
}
impl TokenClaims {
	/// Decodes the payload segment of `token` without verifying its signature.
	pub fn decode(token: &str) -> Result<Self, ClaimsError> {
		let mut segments = token.split('.');
		let (Some(_header), Some(payload), Some(_signature), None) =
			(segments.next(), segments.next(), segments.next(), segments.next())
		else {
			return Err(ClaimsError::Malformed);
		};
		let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
		let raw: RawClaims = serde_json::from_slice(&bytes)?;

		Ok(Self {
			expires_at: raw.exp.as_ref().and_then(expiry_from_value),
			tenant: raw.tenant.as_ref().and_then(tenant_from_value),
		})
	}

	/// Returns the raw tenant claim, failing when it is absent or blank.
	pub fn tenant_claim(&self) -> Result<&str> {
		self.tenant.as_deref().ok_or(Error::TokenClaimMissing { claim: TENANT_CLAIM })
	}

	/// Returns the tenant claim validated as a host label.
	pub fn tenant_key(&self) -> Result<TenantKey> {
		TenantKey::new(self.tenant_claim()?).map_err(|e| ConfigError::from(e).into())
	}

	/// Returns `true` when the token must be renewed at `now` given a safety `margin`.
	///
	/// Tokens without a decodable expiry always need renewal.
	pub fn needs_renewal_at(&self, now: OffsetDateTime, margin: Duration) -> bool {
		match self.expires_at {
			Some(expires_at) => expires_at.checked_sub(margin).is_none_or(|guard| guard <= now),
			None => true,
		}
	}
}

#[derive(Deserialize)]
struct RawClaims {
	#[serde(default)]
	exp: Option<Value>,
	#[serde(default, rename = "auth.anymate.app/CustomerKey")]
	tenant: Option<Value>,
}

fn expiry_from_value(value: &Value) -> Option<OffsetDateTime> {
	let secs = match value {
		Value::Number(number) =>
			number.as_i64().or_else(|| number.as_f64().map(|secs| secs.trunc() as i64))?,
		Value::String(text) => text.trim().parse::<i64>().ok()?,
		_ => return None,
	};

	OffsetDateTime::from_unix_timestamp(secs).ok()
}

// Repeated claims arrive as arrays; the first non-blank entry wins.
fn tenant_from_value(value: &Value) -> Option<String> {
	match value {
		Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_owned()),
		Value::Array(items) => items.iter().find_map(tenant_from_value),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::unsigned_jwt;

	#[test]
	fn decodes_expiry_and_tenant() {
		let token = unsigned_jwt(&serde_json::json!({ "exp": 1_900_000_000, TENANT_CLAIM: "acme" }));
		let claims = TokenClaims::decode(&token).expect("Claims should decode.");

		assert_eq!(
			claims.expires_at,
			Some(OffsetDateTime::from_unix_timestamp(1_900_000_000).expect("Valid timestamp."))
		);
		assert_eq!(claims.tenant.as_deref(), Some("acme"));
		assert_eq!(
			claims.tenant_key().expect("Tenant claim should be routable.").as_ref(),
			"acme"
		);
	}

	#[test]
	fn tolerates_string_expiry_and_array_tenant() {
		let token = unsigned_jwt(
			&serde_json::json!({ "exp": "1900000000", TENANT_CLAIM: ["", "globex"] }),
		);
		let claims = TokenClaims::decode(&token).expect("Claims should decode.");

		assert!(claims.expires_at.is_some());
		assert_eq!(claims.tenant.as_deref(), Some("globex"));
	}

	#[test]
	fn missing_tenant_claim_is_reported() {
		let token = unsigned_jwt(&serde_json::json!({ "exp": 1_900_000_000 }));
		let claims = TokenClaims::decode(&token).expect("Claims should decode.");
		let err = claims.tenant_key().expect_err("Missing tenant claim must fail.");

		assert!(matches!(err, Error::TokenClaimMissing { claim: TENANT_CLAIM }));

		let blank = TokenClaims { tenant: None, ..claims };

		assert!(blank.tenant_key().is_err());

		let blank =
			unsigned_jwt(&serde_json::json!({ "exp": 1_900_000_000, TENANT_CLAIM: "  " }));
		let claims = TokenClaims::decode(&blank).expect("Claims should decode.");

		assert!(matches!(claims.tenant_claim(), Err(Error::TokenClaimMissing { .. })));
	}

	#[test]
	fn raw_tenant_claim_is_kept_when_it_is_not_a_host_label() {
		let token =
			unsigned_jwt(&serde_json::json!({ "exp": 1_900_000_000, TENANT_CLAIM: "Acme_Corp" }));
		let claims = TokenClaims::decode(&token).expect("Claims should decode.");

		assert_eq!(claims.tenant_claim().expect("Claim is present."), "Acme_Corp");
		assert!(matches!(
			claims.tenant_key(),
			Err(Error::Config(ConfigError::InvalidTenantKey(_)))
		));
	}

	#[test]
	fn rejects_non_jwt_tokens() {
		assert!(matches!(TokenClaims::decode("opaque-token"), Err(ClaimsError::Malformed)));
		assert!(matches!(TokenClaims::decode("a.b.c.d"), Err(ClaimsError::Malformed)));
		assert!(matches!(TokenClaims::decode("a.%%%.c"), Err(ClaimsError::Encoding(_))));
	}

	#[test]
	fn renewal_respects_margin_and_missing_expiry() {
		let now = OffsetDateTime::now_utc();
		let margin = Duration::seconds(60);
		let fresh = TokenClaims { expires_at: Some(now + Duration::hours(1)), tenant: None };
		let expiring = TokenClaims { expires_at: Some(now + Duration::seconds(30)), tenant: None };
		let expired = TokenClaims { expires_at: Some(now - Duration::seconds(1)), tenant: None };

		assert!(!fresh.needs_renewal_at(now, margin));
		assert!(expiring.needs_renewal_at(now, margin));
		assert!(expired.needs_renewal_at(now, margin));
		assert!(TokenClaims::default().needs_renewal_at(now, margin));
	}
}
