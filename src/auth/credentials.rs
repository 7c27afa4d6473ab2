//! Credential material owned by a session for its whole lifetime.

// crates.io
use oauth2::{ClientId, ClientSecret, RefreshToken, ResourceOwnerPassword, ResourceOwnerUsername};
// self
use crate::{
	_prelude::*,
	auth::{GrantMaterial, GrantRequest},
};

/// Tenant key, client secret, and the owner material used to obtain tokens.
///
/// Values are accepted as-is; blank fields are reported as
/// [`Error::MissingCredential`] when a renewal needs them, before any network call.
/// Secrets are redacted in `Debug` output.
#[derive(Clone, Debug)]
pub struct Credentials {
	/// Tenant key, sent as the OAuth `client_id`.
	pub client_id: ClientId,
	/// OAuth client secret.
	pub client_secret: ClientSecret,
	/// Worker account name for the password grant.
	pub username: Option<ResourceOwnerUsername>,
	/// Worker account password for the password grant.
	pub password: Option<ResourceOwnerPassword>,
	/// Refresh token supplied up front; preferred over the password grant.
	pub refresh_token: Option<RefreshToken>,
}
impl Credentials {
	/// Credentials for the password grant.
	pub fn password(
		tenant: impl Into<String>,
		secret: impl Into<String>,
		username: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		Self {
			client_id: ClientId::new(tenant.into()),
			client_secret: ClientSecret::new(secret.into()),
			username: Some(ResourceOwnerUsername::new(username.into())),
			password: Some(ResourceOwnerPassword::new(password.into())),
			refresh_token: None,
		}
	}

	/// Credentials for the refresh-token grant.
	pub fn refresh_token(
		tenant: impl Into<String>,
		secret: impl Into<String>,
		refresh_token: impl Into<String>,
	) -> Self {
		Self {
			client_id: ClientId::new(tenant.into()),
			client_secret: ClientSecret::new(secret.into()),
			username: None,
			password: None,
			refresh_token: Some(RefreshToken::new(refresh_token.into())),
		}
	}

	/// Adds or replaces the up-front refresh token.
	pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
		self.refresh_token = Some(RefreshToken::new(refresh_token.into()));

		self
	}

	/// Adds or replaces the worker account used by the password grant.
	pub fn with_owner(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
		self.username = Some(ResourceOwnerUsername::new(username.into()));
		self.password = Some(ResourceOwnerPassword::new(password.into()));

		self
	}

	/// Tenant key as configured (may be blank).
	pub fn tenant(&self) -> &str {
		self.client_id.as_str()
	}

	/// Returns `true` when a renewal could be attempted without a missing-credential error.
	pub fn is_complete(&self) -> bool {
		self.grant_request(None).is_ok()
	}

	/// Builds the next grant request.
	///
	/// A refresh token (the rotated one from the last exchange first, then the up-front one)
	/// selects the refresh grant; otherwise a complete username/password pair is required.
	pub fn grant_request<'a>(
		&'a self,
		rotated: Option<&'a RefreshToken>,
	) -> Result<GrantRequest<'a>> {
		if is_blank(self.client_id.as_str()) {
			return Err(Error::MissingCredential { field: "client_id" });
		}
		if is_blank(self.client_secret.secret()) {
			return Err(Error::MissingCredential { field: "client_secret" });
		}

		let refresh = rotated
			.into_iter()
			.chain(self.refresh_token.as_ref())
			.find(|token| !is_blank(token.secret()));
		let material = match refresh {
			Some(token) => GrantMaterial::RefreshToken(token),
			None => {
				let username = self
					.username
					.as_ref()
					.filter(|value| !is_blank(value.as_str()))
					.ok_or(Error::MissingCredential { field: "username" })?;
				let password = self
					.password
					.as_ref()
					.filter(|value| !is_blank(value.secret()))
					.ok_or(Error::MissingCredential { field: "password" })?;

				GrantMaterial::Password { username, password }
			},
		};

		Ok(GrantRequest {
			client_id: &self.client_id,
			client_secret: &self.client_secret,
			material,
		})
	}
}

fn is_blank(value: &str) -> bool {
	value.trim().is_empty()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::GrantType;

	#[test]
	fn refresh_token_wins_over_password() {
		let credentials = Credentials::password("acme", "s", "u", "p").with_refresh_token("r");
		let request = credentials.grant_request(None).expect("Grant should build.");

		assert_eq!(request.grant_type(), GrantType::RefreshToken);
		assert!(request.form_pairs().iter().all(|(key, _)| *key != "password"));
	}

	#[test]
	fn rotated_refresh_token_is_preferred() {
		let credentials = Credentials::refresh_token("acme", "s", "initial");
		let rotated = RefreshToken::new("rotated".into());
		let request = credentials.grant_request(Some(&rotated)).expect("Grant should build.");

		assert!(request.form_pairs().contains(&("refresh_token", "rotated")));
	}

	#[test]
	fn password_grant_without_refresh_token() {
		let credentials = Credentials::password("acme", "s", "u", "p");
		let request = credentials.grant_request(None).expect("Grant should build.");

		assert_eq!(request.grant_type(), GrantType::Password);
		assert!(credentials.is_complete());
	}

	#[test]
	fn blank_fields_are_missing_credentials() {
		let cases = [
			(Credentials::password(" ", "s", "u", "p"), "client_id"),
			(Credentials::password("acme", "", "u", "p"), "client_secret"),
			(Credentials::password("acme", "s", "", "p"), "username"),
			(Credentials::password("acme", "s", "u", " "), "password"),
			(Credentials::refresh_token("acme", "s", ""), "username"),
		];

		for (credentials, expected) in cases {
			let err = credentials.grant_request(None).expect_err("Blank credential must fail.");

			assert!(
				matches!(err, Error::MissingCredential { field } if field == expected),
				"Expected `{expected}` to be reported, got {err:?}."
			);
			assert!(!credentials.is_complete());
		}
	}

	#[test]
	fn debug_output_redacts_secrets() {
		let rendered =
			format!("{:?}", Credentials::password("acme", "top-secret", "u", "hunter2"));

		assert!(!rendered.contains("top-secret"));
		assert!(!rendered.contains("hunter2"));
	}
}
