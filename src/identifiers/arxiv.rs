//! arXiv identifiers.
//!
//! Regular expressions adapted from `python-mwcites` by Aaron Halfaker
//! (https://github.com/mediawiki-utilities/python-mwcites), identifier shapes from
//! http://arxiv.org/help/arxiv_identifier.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use super::{Identifier, IdentifierKind};
use crate::span::{Capture, Span};

// <category>/<7 digits>, e.g. `hep-th/9901001` or `math.GT/0309136`; the category is optional
const OLD_ID_PATTERN: &str = r"-?(?P<old_id>(?:[a-z]+(?:[.\-][a-z]+)?/)?[0-9]{7})";
// <4 digits>.<4+ digits>, the version suffix is matched but not captured
const NEW_ID_PATTERN: &str = r"(?P<new_id>[0-9]{4}\.[0-9]{4,})(?:v[0-9]+)?";

const PREFIXES: [&str; 3] = [r"arxiv\s*=\s*", r"//arxiv\.org/(?:abs/)?", r"arxiv:\s?"];

static ARXIV_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    PREFIXES
        .iter()
        .map(|prefix| {
            RegexBuilder::new(&format!(
                "(?:{prefix})(?:{NEW_ID_PATTERN}|{OLD_ID_PATTERN})"
            ))
            .case_insensitive(true)
            .build()
            .unwrap()
        })
        .collect()
});

/// Extract arXiv identifiers, one prefix family (`arxiv=`, `arxiv.org/abs/`, `arxiv:`) after the other.
///
/// When both identifier shapes could apply the new-style id wins. Ids are lower-cased.
pub fn extract(text: &str) -> impl Iterator<Item = Capture<Identifier>> + '_ {
    ARXIV_REGEXES.iter().flat_map(move |regex| {
        regex.captures_iter(text).filter_map(|captures| {
            let m = captures
                .name("new_id")
                .or_else(|| captures.name("old_id"))?;
            Some(Capture::new(
                Identifier::new(IdentifierKind::Arxiv, m.as_str()),
                Span::from_match(&m),
            ))
        })
    })
}
