//! Form parameters submitted with an inbound request.

use std::collections::HashMap;

/// Form field carrying the identity URL a user wants to log in with.
pub const IDENTITY_URL_FIELD: &str = "__ac_identity_url";

/// Form field naming the page to return to once login completes.
pub const CAME_FROM_FIELD: &str = "came_from";

/// Form field carrying the mode of an OpenID provider response.
pub const OPENID_MODE_FIELD: &str = "openid.mode";

/// Literal prefix of every OpenID response field. Matching is case-sensitive.
pub const OPENID_PREFIX: &str = "openid.";

/// Mode sent by a provider when the user declined to authenticate.
pub const CANCEL_MODE: &str = "cancel";

/// String-keyed form data of a single request.
///
/// `FormParameters` holds plain owned data so that any web framework can
/// populate it from its own request type. Key order is irrelevant; inserting
/// an existing key replaces its value.
///
/// # Examples
///
/// ```
/// use openid_credentials::FormParameters;
///
/// let mut form = FormParameters::new();
/// form.insert("openid.mode", "id_res");
/// form.insert("openid.identity", "http://plone.myopenid.com");
///
/// assert_eq!(form.get("openid.mode"), Some("id_res"));
/// assert_eq!(form.openid_fields().count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParameters {
    fields: HashMap<String, String>,
}

impl FormParameters {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a form field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns the value of a field, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Returns `true` if the field is present, even with an empty value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of fields in the form.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the form has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over all fields in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterates over the fields in the `openid.` namespace.
    pub fn openid_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(k, _)| k.starts_with(OPENID_PREFIX))
    }

    /// The requested identity URL: `None` when the field is absent, `Some("")`
    /// when it was submitted empty.
    pub fn identity_url(&self) -> Option<&str> {
        self.get(IDENTITY_URL_FIELD)
    }

    /// The `openid.mode` of a provider response, if present.
    pub fn openid_mode(&self) -> Option<&str> {
        self.get(OPENID_MODE_FIELD)
    }
}

impl<K, V> FromIterator<(K, V)> for FormParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K, V> Extend<(K, V)> for FormParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}
