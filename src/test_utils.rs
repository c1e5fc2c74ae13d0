//! Shared proptest strategies for unit tests.

use proptest::prelude::*;

use crate::form::{FormParameters, IDENTITY_URL_FIELD, OPENID_MODE_FIELD};

/// Keys in the `openid.` namespace, including the mode field.
pub(crate) fn arb_openid_key() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(OPENID_MODE_FIELD.to_string()),
        Just("openid.identity".to_string()),
        Just("openid.return_to".to_string()),
        Just("openid.sig".to_string()),
        prop::string::string_regex("openid\\.[a-z_.]{1,12}").unwrap(),
    ]
}

/// Keys outside the `openid.` namespace, including near misses.
pub(crate) fn arb_other_key() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(IDENTITY_URL_FIELD.to_string()),
        Just("nonce".to_string()),
        Just("came_from".to_string()),
        Just("OpenID.mode".to_string()),
        Just("openid".to_string()),
        prop::string::string_regex("[a-z_]{1,12}").unwrap(),
    ]
}

/// Form values, sometimes empty and sometimes `cancel`.
pub(crate) fn arb_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("cancel".to_string()),
        Just("id_res".to_string()),
        prop::string::string_regex("[ -~]{0,24}").unwrap(),
    ]
}

/// Arbitrary forms mixing OpenID and unrelated fields.
pub(crate) fn arb_form() -> impl Strategy<Value = FormParameters> {
    prop::collection::vec(
        (prop_oneof![arb_openid_key(), arb_other_key()], arb_value()),
        0..12,
    )
    .prop_map(|pairs| pairs.into_iter().collect())
}

/// Non-empty identity URLs.
pub(crate) fn arb_identity_url() -> impl Strategy<Value = String> {
    prop::string::string_regex("https?://[a-z]{1,10}\\.example\\.com(/[a-z]{0,8})?").unwrap()
}
