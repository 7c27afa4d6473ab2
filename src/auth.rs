//! Auth-domain models: credentials, tenant keys, grant requests, token claims, and token state.

pub mod claims;
pub mod credentials;
pub mod grant;
pub mod tenant;
pub mod token;

pub use claims::*;
pub use credentials::*;
pub use grant::*;
pub use tenant::*;
pub use token::*;
