use std::collections::BTreeMap;

use crate::form::{FormParameters, OPENID_MODE_FIELD};

/// Credentials extracted from a request.
///
/// Either empty (nothing to authenticate) or an exact copy of the request's
/// `openid.` fields, ready for a downstream verification stage. Keys are kept
/// sorted so the record prints deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialsRecord {
    fields: BTreeMap<String, String>,
}

impl CredentialsRecord {
    /// An empty record.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Copies every `openid.`-prefixed field of `form`, values verbatim.
    pub(crate) fn from_openid_fields(form: &FormParameters) -> Self {
        Self {
            fields: form
                .openid_fields()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
        }
    }

    /// Returns `true` if no credentials were extracted.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields in the record.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns the value of a field, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Returns `true` if the record holds the field.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// The `openid.mode` the provider answered with.
    pub fn mode(&self) -> Option<&str> {
        self.get(OPENID_MODE_FIELD)
    }

    /// Iterates over the fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
