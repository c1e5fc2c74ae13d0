//! Deserializable extractor configuration.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ConfigError, Error};
use crate::extractor::CredentialExtractor;
use crate::login::CheckIdSetupUrlBuilder;
use crate::providers::AllowedProviders;

/// Configuration for an extractor using [`CheckIdSetupUrlBuilder`].
///
/// ```json
/// {
///   "trust_root": "http://portal.example.com/",
///   "allowed_providers": ["http://plone.myopenid.com"]
/// }
/// ```
///
/// `allowed_providers` may be omitted, which places no restriction.
///
/// # Examples
///
/// ```
/// use openid_credentials::ExtractorConfig;
///
/// let config = ExtractorConfig::from_json(
///     r#"{ "trust_root": "http://portal.example.com/" }"#,
/// ).unwrap();
/// assert!(config.allowed_providers.is_unrestricted());
///
/// let extractor = config.build().unwrap();
/// assert_eq!(extractor.builder().trust_root().as_str(), "http://portal.example.com/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractorConfig {
    /// Absolute URL of the realm providers are asked to trust
    pub trust_root: String,
    /// Identity URLs permitted to start a login
    #[serde(default)]
    pub allowed_providers: AllowedProviders,
}

impl ExtractorConfig {
    /// Parses a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the document is malformed, lacks
    /// `trust_root`, or carries unknown fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses the trust root into a URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTrustRoot`] if it is not an absolute URL.
    pub fn trust_root_url(&self) -> Result<Url, ConfigError> {
        Ok(Url::parse(&self.trust_root)?)
    }

    /// Builds an extractor from this configuration.
    ///
    /// # Errors
    ///
    /// Fails if the trust root is not an absolute http(s) URL.
    pub fn build(self) -> Result<CredentialExtractor<CheckIdSetupUrlBuilder>, Error> {
        let builder = CheckIdSetupUrlBuilder::new(self.trust_root_url()?)?;
        tracing::debug!(
            trust_root = %builder.trust_root(),
            allowed_providers = self.allowed_providers.as_slice().len(),
            "configured credential extractor"
        );
        Ok(CredentialExtractor::new(builder).with_allowed_providers(self.allowed_providers))
    }
}
