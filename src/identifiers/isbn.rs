//! ISBNs, adapted from `python-mwcites`.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use super::{Identifier, IdentifierKind};
use crate::span::{Capture, Span};

static ISBN_RE: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"isbn\s*[=:]?\s*([0-9\-Xx]+)")
        .case_insensitive(true)
        .build()
        .unwrap()
});

/// Extract ISBNs. The span covers the digits as written, the id has its hyphens removed.
pub fn extract(text: &str) -> impl Iterator<Item = Capture<Identifier>> + '_ {
    ISBN_RE.captures_iter(text).filter_map(|captures| {
        let m = captures.get(1)?;
        let identifier = Identifier::new(IdentifierKind::Isbn, m.as_str());
        if identifier.id.is_empty() {
            // only hyphens, e.g. `ISBN --`
            return None;
        }
        Some(Capture::new(identifier, Span::from_match(&m)))
    })
}
