//! Canonical content of a parameter set: fields sorted by name, key and value
//! form-encoded, pairs joined with `&`.
//!
//! Form encoding keeps `[A-Za-z0-9-_.~]`, writes a space as `+` and percent-encodes
//! every other byte of the UTF-8 input, upper-case hex. The vendor signs and
//! verifies over exactly these bytes.

use std::collections::BTreeMap;

/// Field carrying the signature itself
pub const SIGN_FIELD: &str = "sign";
/// Field naming the signature algorithm, excluded from callback content
pub const SIGN_TYPE_FIELD: &str = "sign_type";

/// Encode `fields` in key order, skipping any key in `excluded`.
///
/// Input order never matters: fields are re-sorted here. Duplicate keys keep
/// the last value seen.
pub fn canonical_content<'a, I>(fields: I, excluded: &[&str]) -> String
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let sorted: BTreeMap<&str, &str> = fields
        .into_iter()
        .filter(|(key, _)| !excluded.contains(&key.as_str()))
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();

    encode_sorted(&sorted)
}

/// Content signed on outbound requests: everything but `sign`.
pub fn request_content<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    canonical_content(fields, &[SIGN_FIELD])
}

/// Content verified on callbacks: everything but `sign` and `sign_type`.
pub fn callback_content<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    canonical_content(fields, &[SIGN_FIELD, SIGN_TYPE_FIELD])
}

fn encode_sorted(sorted: &BTreeMap<&str, &str>) -> String {
    let mut out = String::new();
    for (key, value) in sorted {
        if !out.is_empty() {
            out.push('&');
        }
        out.push_str(&form_encode(key));
        out.push('=');
        out.push_str(&form_encode(value));
    }
    out
}

/// `application/x-www-form-urlencoded` escaping of one key or value
pub fn form_encode(value: &str) -> String {
    // a literal '+' is already escaped to %2B, so only real spaces become '+'
    urlencoding::encode(value).replace("%20", "+")
}
