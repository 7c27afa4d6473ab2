//! Construction-time session configuration.
//!
//! Every session owns its [`ClientConfig`]; nothing is shared between instances. The
//! deployment decides how base URLs are found: cloud sessions derive them from the tenant key,
//! on-premises sessions use two fixed URLs supplied here.

// std
use std::time::Duration as StdDuration;
// self
use crate::_prelude::*;

/// Platform domain used by cloud tenants.
pub const DEFAULT_PLATFORM_DOMAIN: &str = "anymate.app";
/// Upper bound on the duration of every HTTP call.
pub const DEFAULT_REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(5 * 60);
/// Tokens expiring within this window are renewed before use.
pub const DEFAULT_EXPIRY_MARGIN: Duration = Duration::seconds(60);

/// Where the API and auth servers live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Deployment {
	/// Hosted platform: `https://{tenant}.{domain}` and `https://{tenant}.auth.{domain}`.
	Cloud {
		/// Platform domain, `anymate.app` unless overridden.
		domain: String,
	},
	/// Self-hosted installation with fixed base URLs (trimmed, no trailing slash).
	OnPremises {
		/// Base URL of the API server, e.g. `https://anymate.internal`.
		api: String,
		/// Base URL of the auth server, e.g. `https://auth.anymate.internal`.
		auth: String,
	},
}
impl Deployment {
	/// Validates and normalizes an on-premises URL pair.
	pub fn on_premises(api: &str, auth: &str) -> Result<Self, ConfigError> {
		Ok(Self::OnPremises {
			api: normalize_base_url("api", api)?,
			auth: normalize_base_url("auth", auth)?,
		})
	}
}
impl Default for Deployment {
	fn default() -> Self {
		Self::Cloud { domain: DEFAULT_PLATFORM_DOMAIN.into() }
	}
}

/// Session configuration, enumerated once at construction.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// Cloud or on-premises routing.
	pub deployment: Deployment,
	/// Fixed client-side timeout applied to every HTTP call.
	pub request_timeout: StdDuration,
	/// Safety margin subtracted from a token's expiry when deciding to renew.
	pub expiry_margin: Duration,
}
impl ClientConfig {
	/// Configuration for the hosted platform.
	pub fn cloud() -> Self {
		Self {
			deployment: Deployment::default(),
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
			expiry_margin: DEFAULT_EXPIRY_MARGIN,
		}
	}

	/// Configuration for a self-hosted installation.
	///
	/// Both URLs are trimmed and stripped of trailing slashes, then validated.
	pub fn on_premises(api_url: &str, auth_url: &str) -> Result<Self, ConfigError> {
		Ok(Self { deployment: Deployment::on_premises(api_url, auth_url)?, ..Self::cloud() })
	}

	/// Overrides the platform domain of a cloud deployment; no effect on-premises.
	pub fn with_platform_domain(mut self, domain: impl Into<String>) -> Self {
		if let Deployment::Cloud { domain: current } = &mut self.deployment {
			*current = domain.into().trim().trim_matches('.').to_owned();
		}

		self
	}

	/// Overrides the per-call timeout (defaults to five minutes).
	pub fn with_request_timeout(mut self, timeout: StdDuration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Overrides the expiry safety margin (defaults to 60 seconds).
	pub fn with_expiry_margin(mut self, margin: Duration) -> Self {
		self.expiry_margin = if margin.is_negative() { Duration::ZERO } else { margin };

		self
	}

	/// Returns `true` for on-premises deployments.
	pub fn is_on_premises(&self) -> bool {
		matches!(self.deployment, Deployment::OnPremises { .. })
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self::cloud()
	}
}

fn normalize_base_url(endpoint: &'static str, raw: &str) -> Result<String, ConfigError> {
	let trimmed = raw.trim().trim_end_matches('/');
	let url = Url::parse(trimmed).map_err(|source| ConfigError::InvalidUrl {
		endpoint,
		url: raw.to_owned(),
		source,
	})?;

	if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
		return Err(ConfigError::UnsupportedScheme { endpoint, url: raw.to_owned() });
	}

	Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn on_premises_urls_are_trimmed() {
		let config = ClientConfig::on_premises(
			"  https://anymate.internal/ ",
			"https://auth.anymate.internal//",
		)
		.expect("On-premises URLs should validate.");

		assert!(config.is_on_premises());
		assert_eq!(
			config.deployment,
			Deployment::OnPremises {
				api: "https://anymate.internal".into(),
				auth: "https://auth.anymate.internal".into(),
			}
		);
	}

	#[test]
	fn on_premises_rejects_bad_urls() {
		assert!(matches!(
			ClientConfig::on_premises("anymate.internal", "https://auth.internal"),
			Err(ConfigError::InvalidUrl { endpoint: "api", .. })
		));
		assert!(matches!(
			ClientConfig::on_premises("https://anymate.internal", "ftp://auth.internal"),
			Err(ConfigError::UnsupportedScheme { endpoint: "auth", .. })
		));
	}

	#[test]
	fn cloud_defaults_and_overrides() {
		let config = ClientConfig::default()
			.with_platform_domain(" staging.anymate.app. ")
			.with_expiry_margin(Duration::seconds(-5))
			.with_request_timeout(StdDuration::from_secs(10));

		assert_eq!(config.deployment, Deployment::Cloud { domain: "staging.anymate.app".into() });
		assert_eq!(config.expiry_margin, Duration::ZERO);
		assert_eq!(config.request_timeout, StdDuration::from_secs(10));
		assert!(!config.is_on_premises());
	}
}
