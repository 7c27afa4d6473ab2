//! Tenant key identifier used to route calls to a customer's backend instance.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const TENANT_KEY_MAX_LEN: usize = 63;

/// Error returned when tenant key validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum TenantKeyError {
	/// The key was empty.
	#[error("Tenant key cannot be empty.")]
	Empty,
	/// The key contains a character that is not allowed in a host label.
	#[error("Tenant key contains the invalid character {ch:?}.")]
	InvalidCharacter {
		/// First offending character.
		ch: char,
	},
	/// The key starts or ends with a hyphen.
	#[error("Tenant key cannot start or end with a hyphen.")]
	EdgeHyphen,
	/// The key exceeded the host label length.
	#[error("Tenant key exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Customer key of an Anymate tenant; doubles as the OAuth `client_id` and as the leftmost
/// host label of the tenant's cloud URLs.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantKey(String);
impl TenantKey {
	/// Creates a new tenant key after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, TenantKeyError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for TenantKey {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for TenantKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for TenantKey {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<TenantKey> for String {
	fn from(value: TenantKey) -> Self {
		value.0
	}
}
impl TryFrom<String> for TenantKey {
	type Error = TenantKeyError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Debug for TenantKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Tenant({})", self.0)
	}
}
impl Display for TenantKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for TenantKey {
	type Err = TenantKeyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), TenantKeyError> {
	if view.is_empty() {
		return Err(TenantKeyError::Empty);
	}
	if let Some(ch) = view.chars().find(|ch| !(ch.is_ascii_alphanumeric() || *ch == '-')) {
		return Err(TenantKeyError::InvalidCharacter { ch });
	}
	if view.starts_with('-') || view.ends_with('-') {
		return Err(TenantKeyError::EdgeHyphen);
	}
	if view.len() > TENANT_KEY_MAX_LEN {
		return Err(TenantKeyError::TooLong { max: TENANT_KEY_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn tenant_keys_must_be_host_labels() {
		let tenant = TenantKey::new("acme-corp").expect("Tenant fixture should be considered valid.");

		assert_eq!(tenant.as_ref(), "acme-corp");
		assert_eq!(TenantKey::new(""), Err(TenantKeyError::Empty));
		assert_eq!(TenantKey::new(" acme"), Err(TenantKeyError::InvalidCharacter { ch: ' ' }));
		assert_eq!(
			TenantKey::new("acme.evil.com"),
			Err(TenantKeyError::InvalidCharacter { ch: '.' })
		);
		assert_eq!(TenantKey::new("-acme"), Err(TenantKeyError::EdgeHyphen));
	}

	#[test]
	fn length_limit_matches_host_label() {
		let exact = "a".repeat(TENANT_KEY_MAX_LEN);

		TenantKey::new(&exact).expect("Exact length should succeed.");

		assert_eq!(
			TenantKey::new("a".repeat(TENANT_KEY_MAX_LEN + 1)),
			Err(TenantKeyError::TooLong { max: TENANT_KEY_MAX_LEN })
		);
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let tenant: TenantKey =
			serde_json::from_str("\"acme\"").expect("Tenant should deserialize successfully.");

		assert_eq!(tenant.as_ref(), "acme");
		assert!(serde_json::from_str::<TenantKey>("\"ac me\"").is_err());
	}
}
