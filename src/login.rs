//! Construction of provider login URLs.
//!
//! The extractor decides *whether* a login has to start; a [`LoginUrlBuilder`]
//! decides *where* the user is sent. Hosts that perform full OpenID discovery
//! and association implement the trait themselves. [`CheckIdSetupUrlBuilder`]
//! covers the simple case where the identity URL is the provider endpoint.

use url::Url;

use crate::error::{LoginUrlError, LoginUrlErrorKind};

/// Marker left in a return-to URL by a previous login round-trip. Reusing such
/// a URL makes the provider append a second set of response fields.
const STALE_NONCE_MARKER: &str = "janrain_nonce";

/// Input for building a login URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginRequest<'a> {
    /// The identity URL the user asked to log in with (never empty)
    pub identity_url: &'a str,
    /// The page to return to after login, from the `came_from` form field
    pub came_from: Option<&'a str>,
}

impl<'a> LoginRequest<'a> {
    /// Creates a login request without a return page.
    pub fn new(identity_url: &'a str) -> Self {
        Self {
            identity_url,
            came_from: None,
        }
    }

    /// Sets the page to return to after login.
    pub fn came_from(mut self, came_from: Option<&'a str>) -> Self {
        self.came_from = came_from;
        self
    }
}

/// Builds the URL a user is redirected to in order to log in with a provider.
///
/// Implementations must be shareable across request-handling threads.
pub trait LoginUrlBuilder: Send + Sync {
    /// Builds the provider login URL for `request`.
    ///
    /// # Errors
    ///
    /// Returns a [`LoginUrlError`] when no login URL can be produced for the
    /// identity. The extractor then answers with empty credentials.
    fn build_login_url(&self, request: &LoginRequest<'_>) -> Result<Url, LoginUrlError>;
}

impl<B: LoginUrlBuilder + ?Sized> LoginUrlBuilder for Box<B> {
    fn build_login_url(&self, request: &LoginRequest<'_>) -> Result<Url, LoginUrlError> {
        (**self).build_login_url(request)
    }
}

impl<B: LoginUrlBuilder + ?Sized> LoginUrlBuilder for std::sync::Arc<B> {
    fn build_login_url(&self, request: &LoginRequest<'_>) -> Result<Url, LoginUrlError> {
        (**self).build_login_url(request)
    }
}

/// Sends the user straight to the identity URL with a `checkid_setup` request.
///
/// No discovery takes place: the identity URL is treated as the provider
/// endpoint. The provider is asked to trust the configured trust root, and to
/// send the user back to the `came_from` page when that page lies under the
/// trust root, or to the trust root itself otherwise.
///
/// # Examples
///
/// ```
/// use openid_credentials::{CheckIdSetupUrlBuilder, LoginRequest, LoginUrlBuilder};
/// use url::Url;
///
/// let trust_root = Url::parse("http://portal.example.com/").unwrap();
/// let builder = CheckIdSetupUrlBuilder::new(trust_root).unwrap();
///
/// let url = builder
///     .build_login_url(&LoginRequest::new("plone.myopenid.com"))
///     .unwrap();
///
/// assert_eq!(url.host_str(), Some("plone.myopenid.com"));
/// assert!(url.query_pairs().any(|(k, v)| k == "openid.mode" && v == "checkid_setup"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckIdSetupUrlBuilder {
    trust_root: Url,
}

impl CheckIdSetupUrlBuilder {
    /// Creates a builder for the given trust root.
    ///
    /// # Errors
    ///
    /// The trust root doubles as the default return-to URL, so it must be an
    /// http or https URL; anything else is rejected with
    /// [`LoginUrlErrorKind::InvalidReturnTo`].
    pub fn new(trust_root: Url) -> Result<Self, LoginUrlError> {
        if !is_http(&trust_root) {
            return Err(LoginUrlError::new(
                LoginUrlErrorKind::InvalidReturnTo,
                format!("trust root must be an http(s) URL, got '{}'", trust_root.scheme()),
            ));
        }
        Ok(Self { trust_root })
    }

    /// The realm the provider is asked to trust.
    pub fn trust_root(&self) -> &Url {
        &self.trust_root
    }

    /// Picks the URL the provider should send the user back to.
    fn return_to(&self, came_from: Option<&str>) -> Url {
        came_from
            .filter(|c| !c.is_empty() && !c.contains(STALE_NONCE_MARKER))
            .and_then(|c| Url::parse(c).ok())
            .filter(|url| is_http(url) && self.covers(url))
            .unwrap_or_else(|| self.trust_root.clone())
    }

    /// Whether `url` lies under the trust root, matching on whole path
    /// segments: `/plone` covers `/plone/page` but not `/plone-evil`.
    fn covers(&self, url: &Url) -> bool {
        let root = self.trust_root.as_str();
        match url.as_str().strip_prefix(root) {
            Some(rest) => {
                root.ends_with('/') || rest.is_empty() || rest.starts_with(['/', '?', '#'])
            }
            None => false,
        }
    }
}

impl LoginUrlBuilder for CheckIdSetupUrlBuilder {
    fn build_login_url(&self, request: &LoginRequest<'_>) -> Result<Url, LoginUrlError> {
        let identity = normalize_identity_url(request.identity_url)?;
        let return_to = self.return_to(request.came_from);

        let mut target = identity.clone();
        target
            .query_pairs_mut()
            .append_pair("openid.mode", "checkid_setup")
            .append_pair("openid.identity", identity.as_str())
            .append_pair("openid.return_to", return_to.as_str())
            .append_pair("openid.trust_root", self.trust_root.as_str());

        Ok(target)
    }
}

/// Normalizes a user-supplied identity URL.
///
/// Surrounding whitespace is dropped and `http://` is assumed when no scheme
/// is given, so `plone.myopenid.com` becomes `http://plone.myopenid.com/`.
///
/// # Errors
///
/// Returns [`LoginUrlErrorKind::InvalidIdentityUrl`] for blank or unparseable
/// input and input without a host, and [`LoginUrlErrorKind::UnsupportedScheme`]
/// for schemes other than http and https.
pub fn normalize_identity_url(identity_url: &str) -> Result<Url, LoginUrlError> {
    let trimmed = identity_url.trim();
    if trimmed.is_empty() {
        return Err(LoginUrlError::new(
            LoginUrlErrorKind::InvalidIdentityUrl,
            "identity URL is blank",
        ));
    }

    let parsed = match explicit_scheme(trimmed) {
        Some(scheme)
            if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") =>
        {
            return Err(LoginUrlError::new(
                LoginUrlErrorKind::UnsupportedScheme,
                format!("scheme '{}' is not http or https", scheme),
            ));
        }
        Some(_) => Url::parse(trimmed),
        None => Url::parse(&format!("http://{}", trimmed)),
    };

    let url = parsed.map_err(|e| {
        LoginUrlError::new(
            LoginUrlErrorKind::InvalidIdentityUrl,
            format!("'{}' is not a URL: {}", trimmed, e),
        )
    })?;

    if !is_http(&url) {
        return Err(LoginUrlError::new(
            LoginUrlErrorKind::UnsupportedScheme,
            format!("scheme '{}' is not http or https", url.scheme()),
        ));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(LoginUrlError::new(
            LoginUrlErrorKind::InvalidIdentityUrl,
            format!("'{}' has no host", trimmed),
        ));
    }

    Ok(url)
}

/// The scheme `input` starts with, if any.
///
/// A leading `name:` only counts as a scheme when `name` is a valid scheme
/// name and is not a bare `host:port`, so `localhost:8080/id` and
/// `id.example.com/?next=http://x` have none while `mailto:a@b` has one.
fn explicit_scheme(input: &str) -> Option<&str> {
    let (scheme, rest) = input.split_once(':')?;

    let mut chars = scheme.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid {
        return None;
    }

    if !rest.starts_with("//") && rest.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    Some(scheme)
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> CheckIdSetupUrlBuilder {
        let trust_root = Url::parse("http://portal.example.com/").unwrap();
        CheckIdSetupUrlBuilder::new(trust_root).unwrap()
    }

    fn query_value(url: &Url, key: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn normalize_adds_missing_scheme() {
        let url = normalize_identity_url("plone.myopenid.com").unwrap();
        assert_eq!(url.as_str(), "http://plone.myopenid.com/");
    }

    #[test]
    fn normalize_trims_whitespace() {
        let url = normalize_identity_url("  https://id.example.com/alice \n").unwrap();
        assert_eq!(url.as_str(), "https://id.example.com/alice");
    }

    #[test]
    fn normalize_rejects_blank() {
        let err = normalize_identity_url("   ").unwrap_err();
        assert_eq!(err.kind, LoginUrlErrorKind::InvalidIdentityUrl);
    }

    #[test]
    fn normalize_rejects_other_schemes() {
        let err = normalize_identity_url("ftp://id.example.com/").unwrap_err();
        assert_eq!(err.kind, LoginUrlErrorKind::UnsupportedScheme);
    }

    #[test]
    fn normalize_rejects_garbage() {
        let err = normalize_identity_url("http://exa mple.com").unwrap_err();
        assert_eq!(err.kind, LoginUrlErrorKind::InvalidIdentityUrl);
    }

    #[test]
    fn normalize_ignores_scheme_inside_query() {
        let url = normalize_identity_url("plone.myopenid.com/?next=http://x").unwrap();
        assert_eq!(url.host_str(), Some("plone.myopenid.com"));
        assert_eq!(url.query(), Some("next=http://x"));
    }

    #[test]
    fn normalize_rejects_scheme_without_slashes() {
        for identity in ["mailto:a@b", "javascript:alert(1)", "xri:=alice"] {
            let err = normalize_identity_url(identity).unwrap_err();
            assert_eq!(err.kind, LoginUrlErrorKind::UnsupportedScheme, "{}", identity);
        }
    }

    #[test]
    fn normalize_keeps_host_with_port() {
        let url = normalize_identity_url("localhost:8080/id").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/id");
    }

    #[test]
    fn normalize_accepts_uppercase_scheme() {
        let url = normalize_identity_url("HTTPS://id.example.com/").unwrap();
        assert_eq!(url.scheme(), "https");
    }

    #[test]
    fn trust_root_must_be_http() {
        let err = CheckIdSetupUrlBuilder::new(Url::parse("mailto:admin@example.com").unwrap())
            .unwrap_err();
        assert_eq!(err.kind, LoginUrlErrorKind::InvalidReturnTo);
    }

    #[test]
    fn login_url_carries_checkid_setup_parameters() {
        let url = builder()
            .build_login_url(&LoginRequest::new("http://plone.myopenid.com"))
            .unwrap();

        assert_eq!(url.host_str(), Some("plone.myopenid.com"));
        assert_eq!(query_value(&url, "openid.mode").as_deref(), Some("checkid_setup"));
        assert_eq!(
            query_value(&url, "openid.identity").as_deref(),
            Some("http://plone.myopenid.com/")
        );
        assert_eq!(
            query_value(&url, "openid.return_to").as_deref(),
            Some("http://portal.example.com/")
        );
        assert_eq!(
            query_value(&url, "openid.trust_root").as_deref(),
            Some("http://portal.example.com/")
        );
    }

    #[test]
    fn login_url_keeps_existing_query() {
        let url = builder()
            .build_login_url(&LoginRequest::new("https://id.example.com/server?user=alice"))
            .unwrap();

        assert_eq!(query_value(&url, "user").as_deref(), Some("alice"));
        assert_eq!(query_value(&url, "openid.mode").as_deref(), Some("checkid_setup"));
    }

    #[test]
    fn came_from_under_trust_root_becomes_return_to() {
        let request = LoginRequest::new("http://plone.myopenid.com")
            .came_from(Some("http://portal.example.com/news/item"));
        let url = builder().build_login_url(&request).unwrap();

        assert_eq!(
            query_value(&url, "openid.return_to").as_deref(),
            Some("http://portal.example.com/news/item")
        );
    }

    #[test]
    fn came_from_with_stale_nonce_falls_back_to_trust_root() {
        let request = LoginRequest::new("http://plone.myopenid.com")
            .came_from(Some("http://portal.example.com/?janrain_nonce=2008-01-01"));
        let url = builder().build_login_url(&request).unwrap();

        assert_eq!(
            query_value(&url, "openid.return_to").as_deref(),
            Some("http://portal.example.com/")
        );
    }

    #[test]
    fn came_from_must_match_whole_path_segments() {
        let trust_root = Url::parse("http://portal.example.com/plone").unwrap();
        let builder = CheckIdSetupUrlBuilder::new(trust_root).unwrap();

        let cases = [
            ("http://portal.example.com/plone-evil/steal", "http://portal.example.com/plone"),
            ("http://portal.example.com/plone/page", "http://portal.example.com/plone/page"),
            ("http://portal.example.com/plone?tab=2", "http://portal.example.com/plone?tab=2"),
            ("http://portal.example.com/plone", "http://portal.example.com/plone"),
        ];

        for (came_from, expected) in cases {
            let request = LoginRequest::new("http://plone.myopenid.com").came_from(Some(came_from));
            let url = builder.build_login_url(&request).unwrap();
            assert_eq!(
                query_value(&url, "openid.return_to").as_deref(),
                Some(expected),
                "came_from {:?}",
                came_from
            );
        }
    }

    #[test]
    fn came_from_outside_trust_root_falls_back_to_trust_root() {
        for came_from in ["", "http://elsewhere.example.com/", "javascript:alert(1)", "/relative"] {
            let request = LoginRequest::new("http://plone.myopenid.com").came_from(Some(came_from));
            let url = builder().build_login_url(&request).unwrap();

            assert_eq!(
                query_value(&url, "openid.return_to").as_deref(),
                Some("http://portal.example.com/"),
                "came_from {:?} should not be used",
                came_from
            );
        }
    }

    #[test]
    fn boxed_builder_delegates() {
        let boxed: Box<dyn LoginUrlBuilder> = Box::new(builder());
        let url = boxed
            .build_login_url(&LoginRequest::new("http://plone.myopenid.com"))
            .unwrap();
        assert_eq!(url.host_str(), Some("plone.myopenid.com"));
    }
}
