//! Grant types and the transient form request sent to the token endpoint.

// crates.io
use oauth2::{ClientId, ClientSecret, RefreshToken, ResourceOwnerPassword, ResourceOwnerUsername};
use url::form_urlencoded::Serializer;
// self
use crate::_prelude::*;

/// OAuth 2.0 grant types the session can perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
	/// Resource Owner Password Credentials grant.
	Password,
	/// Refresh Token grant.
	RefreshToken,
}
impl GrantType {
	/// Returns the RFC 6749 identifier for the grant type.
	pub const fn as_str(self) -> &'static str {
		match self {
			GrantType::Password => "password",
			GrantType::RefreshToken => "refresh_token",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Grant-specific fields of a [`GrantRequest`].
#[derive(Clone, Copy)]
pub enum GrantMaterial<'a> {
	/// Username and password of the worker account.
	Password {
		/// Account name.
		username: &'a ResourceOwnerUsername,
		/// Account password.
		password: &'a ResourceOwnerPassword,
	},
	/// Refresh token obtained from an earlier exchange or supplied up front.
	RefreshToken(&'a RefreshToken),
}

/// One token-endpoint exchange attempt, built per renewal and never persisted.
#[derive(Clone, Copy)]
pub struct GrantRequest<'a> {
	/// OAuth client identifier (the tenant key).
	pub client_id: &'a ClientId,
	/// OAuth client secret.
	pub client_secret: &'a ClientSecret,
	/// Grant-specific fields.
	pub material: GrantMaterial<'a>,
}
impl<'a> GrantRequest<'a> {
	/// Returns the grant type implied by the material.
	pub fn grant_type(&self) -> GrantType {
		match self.material {
			GrantMaterial::Password { .. } => GrantType::Password,
			GrantMaterial::RefreshToken(_) => GrantType::RefreshToken,
		}
	}

	/// Returns the form fields in wire order.
	pub fn form_pairs(&self) -> Vec<(&'static str, &'a str)> {
		let mut pairs = vec![
			("client_id", self.client_id.as_str()),
			("client_secret", self.client_secret.secret().as_str()),
			("grant_type", self.grant_type().as_str()),
		];

		match self.material {
			GrantMaterial::Password { username, password } => {
				pairs.push(("username", username.as_str()));
				pairs.push(("password", password.secret().as_str()));
			},
			GrantMaterial::RefreshToken(token) => pairs.push(("refresh_token", token.secret().as_str())),
		}

		pairs
	}

	/// Encodes the form fields as an `application/x-www-form-urlencoded` body.
	pub fn to_form_body(&self) -> String {
		Serializer::new(String::new()).extend_pairs(self.form_pairs()).finish()
	}
}
impl Debug for GrantRequest<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GrantRequest")
			.field("client_id", &self.client_id.as_str())
			.field("grant_type", &self.grant_type())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn password_form_carries_owner_credentials() {
		let client_id = ClientId::new("acme".into());
		let client_secret = ClientSecret::new("s3cret".into());
		let username = ResourceOwnerUsername::new("robot@acme".into());
		let password = ResourceOwnerPassword::new("p&ss word".into());
		let request = GrantRequest {
			client_id: &client_id,
			client_secret: &client_secret,
			material: GrantMaterial::Password { username: &username, password: &password },
		};

		assert_eq!(request.grant_type(), GrantType::Password);
		assert_eq!(
			request.to_form_body(),
			"client_id=acme&client_secret=s3cret&grant_type=password&username=robot%40acme&password=p%26ss+word"
		);
	}

	#[test]
	fn refresh_form_omits_owner_credentials() {
		let client_id = ClientId::new("acme".into());
		let client_secret = ClientSecret::new("s".into());
		let refresh = RefreshToken::new("r-1".into());
		let request = GrantRequest {
			client_id: &client_id,
			client_secret: &client_secret,
			material: GrantMaterial::RefreshToken(&refresh),
		};
		let body = request.to_form_body();

		assert_eq!(body, "client_id=acme&client_secret=s&grant_type=refresh_token&refresh_token=r-1");
		assert!(!format!("{request:?}").contains("r-1"));
	}
}
