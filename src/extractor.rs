//! The credential extraction decision procedure.
//!
//! For every request the extractor decides between three outcomes:
//!
//! ```text
//! __ac_identity_url non-empty and permitted ──> Redirect(login URL)
//!          │ absent, empty or not permitted
//!          ▼
//! openid.mode absent or "cancel" ────────────> Credentials(empty)
//!          │ any other mode
//!          ▼
//!                                              Credentials(openid.* fields)
//! ```
//!
//! A fresh login request always wins over a provider response submitted in
//! the same form.

use url::Url;

use crate::credentials::CredentialsRecord;
use crate::form::{FormParameters, CAME_FROM_FIELD, CANCEL_MODE};
use crate::login::{LoginRequest, LoginUrlBuilder};
use crate::providers::AllowedProviders;
use crate::request::RequestContext;

/// Instruction for the host to abort normal processing and redirect the
/// client to a provider's login endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectSignal {
    target: Url,
    identity_url: String,
}

impl RedirectSignal {
    /// The provider login URL to redirect to.
    pub fn target(&self) -> &Url {
        &self.target
    }

    /// The identity URL that triggered the login, as submitted.
    pub fn identity_url(&self) -> &str {
        &self.identity_url
    }

    /// Consumes the signal, returning the redirect target.
    pub fn into_target(self) -> Url {
        self.target
    }
}

/// Outcome of a single extraction.
///
/// A redirect and non-empty credentials can never occur together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Credentials for downstream authentication; empty when the request
    /// carries nothing to authenticate.
    Credentials(CredentialsRecord),
    /// A new login has to begin at the provider.
    Redirect(RedirectSignal),
}

impl Extraction {
    /// The extracted credentials, or `None` for a redirect.
    pub fn credentials(&self) -> Option<&CredentialsRecord> {
        match self {
            Extraction::Credentials(creds) => Some(creds),
            Extraction::Redirect(_) => None,
        }
    }

    /// The redirect signal, or `None` for credentials.
    pub fn redirect(&self) -> Option<&RedirectSignal> {
        match self {
            Extraction::Credentials(_) => None,
            Extraction::Redirect(signal) => Some(signal),
        }
    }

    /// Returns `true` if a login redirect was requested.
    pub fn is_redirect(&self) -> bool {
        matches!(self, Extraction::Redirect(_))
    }

    /// Consumes the outcome, returning the credentials or the redirect as
    /// an error value for hosts that propagate redirects with `?`.
    pub fn into_result(self) -> Result<CredentialsRecord, RedirectSignal> {
        match self {
            Extraction::Credentials(creds) => Ok(creds),
            Extraction::Redirect(signal) => Err(signal),
        }
    }
}

/// Extracts OpenID credentials from requests, or asks for a login redirect.
///
/// The extractor holds only immutable configuration and can be shared across
/// threads (for example behind an `Arc`) whenever its builder can.
///
/// # Examples
///
/// ```
/// use openid_credentials::{
///     AllowedProviders, CheckIdSetupUrlBuilder, CredentialExtractor, Extraction, FormParameters,
/// };
/// use url::Url;
///
/// let builder = CheckIdSetupUrlBuilder::new(Url::parse("http://portal.example.com/").unwrap())
///     .unwrap();
/// let extractor = CredentialExtractor::new(builder)
///     .with_allowed_providers(AllowedProviders::new(["http://plone.myopenid.com"]));
///
/// // A provider response becomes credentials
/// let form = FormParameters::new()
///     .with("openid.mode", "id_res")
///     .with("openid.identity", "http://plone.myopenid.com");
/// let creds = extractor.extract(&form).into_result().unwrap();
/// assert_eq!(creds.get("openid.identity"), Some("http://plone.myopenid.com"));
///
/// // A login request becomes a redirect
/// let form = FormParameters::new().with("__ac_identity_url", "http://plone.myopenid.com");
/// assert!(matches!(extractor.extract(&form), Extraction::Redirect(_)));
/// ```
#[derive(Debug, Clone)]
pub struct CredentialExtractor<B> {
    allowed_providers: AllowedProviders,
    builder: B,
}

impl<B: LoginUrlBuilder> CredentialExtractor<B> {
    /// Creates an unrestricted extractor using `builder` for login URLs.
    pub fn new(builder: B) -> Self {
        Self {
            allowed_providers: AllowedProviders::unrestricted(),
            builder,
        }
    }

    /// Restricts which identity URLs may start a login.
    pub fn with_allowed_providers(mut self, allowed_providers: AllowedProviders) -> Self {
        self.allowed_providers = allowed_providers;
        self
    }

    /// The configured allow-list.
    pub fn allowed_providers(&self) -> &AllowedProviders {
        &self.allowed_providers
    }

    /// The login URL builder.
    pub fn builder(&self) -> &B {
        &self.builder
    }

    /// Decides the outcome for a form.
    pub fn extract(&self, form: &FormParameters) -> Extraction {
        extract_credentials(form, &self.allowed_providers, &self.builder)
    }

    /// Decides the outcome for a request, logging within a span that carries
    /// the request ID.
    pub fn extract_request(&self, request: &RequestContext) -> Extraction {
        let span = tracing::info_span!("extract_credentials", request_id = %request.request_id);
        let _guard = span.enter();
        self.extract(&request.form)
    }
}

/// Decides the outcome for `form` against an allow-list and login URL builder.
///
/// This never fails: missing or malformed fields yield empty credentials. A
/// builder error while starting a login is logged and also yields empty
/// credentials, without looking at any provider response in the form.
pub fn extract_credentials<B>(
    form: &FormParameters,
    allowed_providers: &AllowedProviders,
    builder: &B,
) -> Extraction
where
    B: LoginUrlBuilder + ?Sized,
{
    if let Some(identity_url) = requested_identity(form, allowed_providers) {
        return start_login(form, identity_url, builder);
    }

    match form.openid_mode() {
        None => {
            tracing::debug!("no login requested and no provider response");
            Extraction::Credentials(CredentialsRecord::empty())
        }
        Some(CANCEL_MODE) => {
            tracing::debug!("provider response cancelled, ignoring");
            Extraction::Credentials(CredentialsRecord::empty())
        }
        Some(mode) => {
            let creds = CredentialsRecord::from_openid_fields(form);
            tracing::debug!(mode = %mode, fields = creds.len(), "extracted provider response");
            Extraction::Credentials(creds)
        }
    }
}

/// The identity URL to start a login with, if the form requests one that the
/// allow-list permits. An empty value counts as no request.
fn requested_identity<'a>(
    form: &'a FormParameters,
    allowed_providers: &AllowedProviders,
) -> Option<&'a str> {
    let identity_url = form.identity_url().filter(|url| !url.is_empty())?;

    if !allowed_providers.permits(identity_url) {
        tracing::debug!(
            identity_url = %identity_url,
            "identity URL not in allowed providers, ignoring"
        );
        return None;
    }

    Some(identity_url)
}

fn start_login<B>(form: &FormParameters, identity_url: &str, builder: &B) -> Extraction
where
    B: LoginUrlBuilder + ?Sized,
{
    let request = LoginRequest::new(identity_url).came_from(form.get(CAME_FROM_FIELD));

    match builder.build_login_url(&request) {
        Ok(target) => {
            tracing::debug!(
                identity_url = %identity_url,
                target = %target,
                "redirecting to provider login"
            );
            Extraction::Redirect(RedirectSignal {
                target,
                identity_url: identity_url.to_owned(),
            })
        }
        Err(error) => {
            tracing::info!(
                identity_url = %identity_url,
                error = %error,
                "unable to start OpenID login"
            );
            Extraction::Credentials(CredentialsRecord::empty())
        }
    }
}
