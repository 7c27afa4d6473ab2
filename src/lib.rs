//! Async client core for the Anymate automation platform: OAuth2 password and refresh grants,
//! claim-based token expiry, tenant routing, and one authenticated dispatch path shared by every
//! remote operation.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod route;
pub mod session;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// crates.io
	use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
	// self
	use crate::auth::{EXPIRY_CLAIM, TENANT_CLAIM};
	#[cfg(feature = "reqwest")]
	use crate::{
		auth::Credentials,
		config::ClientConfig,
		http::{ReqwestHttpClient, ReqwestTransportErrorMapper},
		session::{ReqwestSession, Session},
	};

	/// Encodes `claims` as an unsigned JWT (`alg: none`, empty signature segment).
	pub fn unsigned_jwt(claims: &serde_json::Value) -> String {
		let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
		let payload = URL_SAFE_NO_PAD.encode(claims.to_string());

		format!("{header}.{payload}.")
	}

	/// Builds an access token for `tenant` that expires `expires_in` from now.
	pub fn jwt_for(tenant: &str, expires_in: Duration) -> String {
		let exp = (OffsetDateTime::now_utc() + expires_in).unix_timestamp();

		unsigned_jwt(&serde_json::json!({ EXPIRY_CLAIM: exp, TENANT_CLAIM: tenant }))
	}

	/// Builds a reqwest HTTP client with a short timeout suited to mock servers.
	#[cfg(feature = "reqwest")]
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		ReqwestHttpClient::with_timeout(std::time::Duration::from_secs(5))
			.expect("Failed to build Reqwest client for tests.")
	}

	/// Constructs an on-premises [`Session`] whose API and auth servers both live at `base_url`
	/// (typically an `httpmock` server).
	#[cfg(feature = "reqwest")]
	pub fn build_reqwest_test_session(base_url: &str, credentials: Credentials) -> ReqwestSession {
		let config = ClientConfig::on_premises(base_url, base_url)
			.expect("Failed to build on-premises config for tests.");

		Session::with_http_client(
			credentials,
			config,
			test_reqwest_http_client(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{ConfigError, DecodeError, Error, Result, TransportError};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, parking_lot as _, tokio as _};
