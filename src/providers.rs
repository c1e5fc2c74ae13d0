use serde::{Deserialize, Serialize};

/// Identity URLs permitted to start an OpenID login.
///
/// An empty list places no restriction. Membership is exact string
/// equality: no normalization, no prefix matching.
///
/// # Examples
///
/// ```
/// use openid_credentials::AllowedProviders;
///
/// let open = AllowedProviders::unrestricted();
/// assert!(open.permits("http://any.example.com"));
///
/// let restricted = AllowedProviders::new(["http://plone.myopenid.com"]);
/// assert!(restricted.permits("http://plone.myopenid.com"));
/// assert!(!restricted.permits("http://plone.mywrongopenid.com"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowedProviders {
    providers: Vec<String>,
}

impl AllowedProviders {
    /// Creates an allow-list from the given identity URLs, keeping their order.
    pub fn new<I, S>(providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            providers: providers.into_iter().map(Into::into).collect(),
        }
    }

    /// An empty allow-list, permitting every identity URL.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Returns `true` when no restriction is configured.
    pub fn is_unrestricted(&self) -> bool {
        self.providers.is_empty()
    }

    /// Whether `identity_url` may be used to start a login.
    pub fn permits(&self, identity_url: &str) -> bool {
        self.is_unrestricted() || self.providers.iter().any(|p| p == identity_url)
    }

    /// The configured identity URLs in order.
    pub fn as_slice(&self) -> &[String] {
        &self.providers
    }
}
