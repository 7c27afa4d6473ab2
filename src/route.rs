//! Tenant routing: base URL derivation for API and auth calls.

// self
use crate::{_prelude::*, auth::TenantKey, config::Deployment};

/// Path prefix under which every API operation lives.
pub const API_PREFIX: &str = "api";
/// Token endpoint path on the auth server.
pub const TOKEN_PATH: &str = "connect/token";

/// API route derived from an access token at dispatch time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TenantRoute {
	/// Tenant claim of the token the route was derived from.
	pub tenant: String,
	/// Base URL of the tenant's API server.
	pub api_base: String,
}
impl TenantRoute {
	/// Resolves the API base for the `tenant` claim.
	///
	/// Cloud deployments need the claim to be a host label. On-premises deployments route to the
	/// fixed API URL whatever the claim holds.
	pub fn resolve(deployment: &Deployment, tenant: &str) -> Result<Self> {
		let api_base = match deployment {
			Deployment::Cloud { domain } => {
				let key = TenantKey::new(tenant).map_err(ConfigError::from)?;

				format!("https://{key}.{domain}")
			},
			Deployment::OnPremises { api, .. } => api.clone(),
		};

		Ok(Self { tenant: tenant.to_owned(), api_base })
	}

	/// Builds the absolute URL of an API operation path such as `/StartOrGetRun/proc1`.
	///
	/// Path segments are percent-encoded; a trailing slash is preserved.
	pub fn api_url(&self, path: &str) -> Result<Url> {
		join_segments("api", &self.api_base, API_PREFIX, path)
	}
}

/// Returns the token endpoint for the tenant named by `client_id`.
pub fn token_url(deployment: &Deployment, client_id: &str) -> Result<Url> {
	match deployment {
		Deployment::Cloud { domain } => {
			let tenant = TenantKey::new(client_id.trim()).map_err(ConfigError::from)?;

			join_segments("auth", &format!("https://{tenant}.auth.{domain}"), "", TOKEN_PATH)
		},
		Deployment::OnPremises { auth, .. } => join_segments("auth", auth, "", TOKEN_PATH),
	}
}

fn join_segments(endpoint: &'static str, base: &str, prefix: &str, path: &str) -> Result<Url> {
	let mut url = Url::parse(base).map_err(|source| ConfigError::InvalidUrl {
		endpoint,
		url: base.to_owned(),
		source,
	})?;

	{
		let mut segments = url
			.path_segments_mut()
			.map_err(|_| ConfigError::UnsupportedScheme { endpoint, url: base.to_owned() })?;

		segments.pop_if_empty();

		if !prefix.is_empty() {
			segments.push(prefix);
		}

		segments.extend(path.trim_start_matches('/').split('/'));
	}

	Ok(url)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn cloud_routes_follow_the_tenant() {
		let route = TenantRoute::resolve(&Deployment::default(), "acme")
			.expect("Host-label tenants should route.");
		let url = route.api_url("/StartOrGetRun/proc1").expect("API URL should build.");

		assert_eq!(url.as_str(), "https://acme.anymate.app/api/StartOrGetRun/proc1");
		assert_eq!(
			route.api_url("Failure/").expect("API URL should build.").as_str(),
			"https://acme.anymate.app/api/Failure/"
		);
	}

	#[test]
	fn on_premises_routes_ignore_the_tenant() {
		let deployment = Deployment::on_premises("http://10.0.0.5:8080/anymate/", "http://10.0.0.6")
			.expect("On-premises deployment should validate.");
		let route = TenantRoute::resolve(&deployment, "Acme Corp")
			.expect("On-premises routing should accept any tenant claim.");

		assert_eq!(
			route.api_url("/TakeNext/proc 1").expect("API URL should build.").as_str(),
			"http://10.0.0.5:8080/anymate/api/TakeNext/proc%201"
		);
		assert_eq!(route.tenant, "Acme Corp");
		assert_eq!(
			token_url(&deployment, "ignored").expect("Token URL should build.").as_str(),
			"http://10.0.0.6/connect/token"
		);
	}

	#[test]
	fn cloud_routes_reject_claims_that_are_not_host_labels() {
		assert!(matches!(
			TenantRoute::resolve(&Deployment::default(), "Acme_Corp"),
			Err(Error::Config(ConfigError::InvalidTenantKey(_)))
		));
	}

	#[test]
	fn cloud_token_url_uses_auth_subdomain() {
		assert_eq!(
			token_url(&Deployment::default(), "acme").expect("Token URL should build.").as_str(),
			"https://acme.auth.anymate.app/connect/token"
		);
		assert!(matches!(
			token_url(&Deployment::default(), "acme.evil.com"),
			Err(Error::Config(ConfigError::InvalidTenantKey(_)))
		));
	}
}
