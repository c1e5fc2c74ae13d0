use std::fmt;

/// Errors that can occur while setting up or driving an extractor.
///
/// Extraction itself never fails; these errors come from configuration
/// loading and from login URL builders.
#[derive(Debug)]
pub enum Error {
    /// The extractor configuration could not be loaded
    Config(ConfigError),
    /// A provider login URL could not be built
    LoginUrl(LoginUrlError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Invalid configuration: {}", e),
            Error::LoginUrl(e) => write!(f, "Login URL error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => Some(e),
            Error::LoginUrl(e) => Some(e),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<LoginUrlError> for Error {
    fn from(e: LoginUrlError) -> Self {
        Error::LoginUrl(e)
    }
}

/// Failure to build a provider login URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginUrlError {
    /// The kind of failure
    pub kind: LoginUrlErrorKind,
    /// Human-readable message explaining the failure
    pub message: String,
}

impl LoginUrlError {
    /// Creates a new login URL error.
    pub fn new(kind: LoginUrlErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for LoginUrlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for LoginUrlError {}

/// The kind of login URL failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginUrlErrorKind {
    /// The identity URL does not parse, even after normalization
    InvalidIdentityUrl,
    /// The identity URL uses a scheme other than http or https
    UnsupportedScheme,
    /// The return-to URL could not be constructed
    InvalidReturnTo,
}

impl fmt::Display for LoginUrlErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginUrlErrorKind::InvalidIdentityUrl => write!(f, "invalid identity URL"),
            LoginUrlErrorKind::UnsupportedScheme => write!(f, "unsupported scheme"),
            LoginUrlErrorKind::InvalidReturnTo => write!(f, "invalid return-to URL"),
        }
    }
}

/// Failure to load an [`ExtractorConfig`](crate::ExtractorConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration document is not valid JSON or has the wrong shape
    Json(serde_json::Error),
    /// The configured trust root is not an absolute URL
    InvalidTrustRoot(url::ParseError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "failed to parse configuration: {}", e),
            ConfigError::InvalidTrustRoot(e) => write!(f, "invalid trust root: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            ConfigError::InvalidTrustRoot(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl From<url::ParseError> for ConfigError {
    fn from(e: url::ParseError) -> Self {
        ConfigError::InvalidTrustRoot(e)
    }
}
