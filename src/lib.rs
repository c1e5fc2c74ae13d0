//! OpenID credential extraction for pluggable authentication pipelines.
//!
//! This crate decides, for each inbound request, whether it:
//! - carries nothing to authenticate (empty credentials),
//! - carries an OpenID provider response (credentials copied from the
//!   `openid.*` form fields), or
//! - asks to start a new OpenID login (a redirect to the provider).
//!
//! It does not speak the OpenID protocol itself: verifying the extracted
//! response and discovering providers belong to other stages of the host.
//!
//! # Core Types
//!
//! - [`FormParameters`]: Form data of one request
//! - [`RequestContext`]: Request ID plus form, passed explicitly
//! - [`AllowedProviders`]: Identity URLs permitted to start a login
//! - [`CredentialExtractor`]: The decision procedure
//! - [`Extraction`]: Either a [`CredentialsRecord`] or a [`RedirectSignal`]
//! - [`LoginUrlBuilder`]: Turns an identity URL into a provider login URL
//! - [`ExtractorConfig`]: JSON configuration for a ready-made extractor
//!
//! # Examples
//!
//! ```
//! use openid_credentials::{Extraction, ExtractorConfig, RequestContext};
//!
//! let extractor = ExtractorConfig::from_json(
//!     r#"{ "trust_root": "http://portal.example.com/" }"#,
//! )
//! .unwrap()
//! .build()
//! .unwrap();
//!
//! let request = RequestContext::new("req-123")
//!     .with_field("__ac_identity_url", "http://plone.myopenid.com");
//!
//! match extractor.extract_request(&request) {
//!     Extraction::Redirect(signal) => {
//!         // the host answers with an HTTP redirect to the provider
//!         assert_eq!(signal.target().host_str(), Some("plone.myopenid.com"));
//!     }
//!     Extraction::Credentials(_) => unreachable!(),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod credentials;
mod error;
mod extractor;
pub mod form;
mod login;
mod providers;
mod request;

#[cfg(test)]
mod test_utils;

pub use config::ExtractorConfig;
pub use credentials::CredentialsRecord;
pub use error::{ConfigError, Error, LoginUrlError, LoginUrlErrorKind};
pub use extractor::{extract_credentials, CredentialExtractor, Extraction, RedirectSignal};
pub use form::FormParameters;
pub use login::{normalize_identity_url, CheckIdSetupUrlBuilder, LoginRequest, LoginUrlBuilder};
pub use providers::AllowedProviders;
pub use request::RequestContext;
