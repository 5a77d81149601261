use std::{borrow::Cow, sync::LazyLock};

use chrono::{DateTime, NaiveDateTime, Utc};
use memchr::memmem;
use regex::Regex;

macro_rules! finder {
    ($needle:expr) => {{
        static FINDER: LazyLock<memmem::Finder> =
            LazyLock::new(|| memmem::Finder::new($needle.as_bytes()));
        &FINDER
    }};
}

/// Remove all closed HTML comments (`<!-- ... -->`) from `text`.
///
/// Identifiers inside comments must never be counted, so every scanner expects its
/// input to have gone through this first. An unterminated `<!--` is left as is.
///
/// This function is optimized for the (very common) case where the text contains no comments
/// at all: no allocation takes place and the input is returned borrowed.
pub fn strip_comments(text: &str) -> Cow<'_, str> {
    static REGEX_COMMENT: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

    if finder!("<!--").find(text.as_bytes()).is_none() {
        return Cow::Borrowed(text);
    }

    REGEX_COMMENT.replace_all(text, "")
}

pub fn to_lowercase(input: &str) -> String {
    #[cfg(feature = "optimized-str")]
    {
        to_lowercase_opt(input)
    }
    #[cfg(not(feature = "optimized-str"))]
    {
        // for languages that have very little unicode (so basically: english), this is probably faster
        input.to_lowercase()
    }
}

#[cfg(feature = "optimized-str")]
#[doc(hidden)] /* only public for benchmarking */
pub fn to_lowercase_opt(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for c in input.chars() {
        match unicode_case_mapping::to_lowercase(c) {
            [0, 0] => result.push(c),
            [l, 0] => result.extend(char::from_u32(l)),
            [l, l2] => {
                result.extend(char::from_u32(l));
                result.extend(char::from_u32(l2));
            }
        }
    }
    result
}

/// Parse a revision timestamp as found in MediaWiki dumps.
///
/// Both the ISO form used in XML dumps (`2003-12-05T06:41:50Z`) and the compact form
/// used by the database and the API (`20031205064150`) are accepted.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    // Source: https://github.com/mediawiki-utilities/python-mwtypes/blob/523a93f98fe1372938fc15872b5abb1f267cc643/mwtypes/timestamp.py#L12
    const TIMESTAMP_FORMAT_LONG: &str = "%Y-%m-%dT%H:%M:%SZ";
    const TIMESTAMP_FORMAT_SHORT: &str = "%Y%m%d%H%M%S";

    let text = text.trim();
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT_SHORT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT_LONG))
        .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
        .ok()
}
