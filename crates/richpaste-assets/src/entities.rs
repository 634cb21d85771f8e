//! Decoding of HTML character references in attribute values.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(?:#[xX]([0-9a-fA-F]{1,6})|#([0-9]{1,7})|([a-zA-Z]+));").unwrap());

/// Decode numeric references and the named entities an escaper emits.
///
/// Unknown names and invalid code points are left as written.
pub(crate) fn decode(value: &str) -> Cow<'_, str> {
    if !value.contains('&') {
        return Cow::Borrowed(value);
    }
    ENTITY_RE.replace_all(value, |caps: &Captures| {
        let decoded = if let Some(hex) = caps.get(1) {
            u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
        } else if let Some(dec) = caps.get(2) {
            dec.as_str().parse().ok().and_then(char::from_u32)
        } else {
            caps.get(3).and_then(|name| named(name.as_str()))
        };
        decoded.map_or_else(|| caps[0].to_owned(), String::from)
    })
}

fn named(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => None,
    }
}
