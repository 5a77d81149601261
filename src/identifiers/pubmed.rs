//! PubMed (`pmid`) and PubMed Central (`pmc`) identifiers, adapted from `python-mwcites`.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use super::{Identifier, IdentifierKind};
use crate::span::{Capture, Span};

fn case_insensitive(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap()
}

// template fields, a redundant `pmc` prefix in front of the number is tolerated
static PMID_TEMPLATE_RE: LazyLock<Regex> =
    LazyLock::new(|| case_insensitive(r"\bpmid\s*=\s*(?:pmc)?([0-9]+)\b"));
static PMC_TEMPLATE_RE: LazyLock<Regex> =
    LazyLock::new(|| case_insensitive(r"\bpmc\s*=\s*(?:pmc)?([0-9]+)\b"));

static PMID_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| case_insensitive(r"//www\.ncbi\.nlm\.nih\.gov/pubmed/([0-9]+)\b"));
static PMC_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    case_insensitive(r"//www\.ncbi\.nlm\.nih\.gov/pmc/articles/PMC([0-9]+)\b")
});

fn extract_with<'a>(
    regex: &'static Regex,
    kind: IdentifierKind,
    text: &'a str,
) -> impl Iterator<Item = Capture<Identifier>> + 'a {
    regex.captures_iter(text).filter_map(move |captures| {
        let m = captures.get(1)?;
        Some(Capture::new(
            Identifier::new(kind, m.as_str()),
            Span::from_match(&m),
        ))
    })
}

/// Extract PubMed and PubMed Central ids.
///
/// Template fields and NCBI links are matched separately; the results are concatenated
/// (pmid fields, pmid links, pmc fields, pmc links) rather than interleaved by position.
pub fn extract(text: &str) -> impl Iterator<Item = Capture<Identifier>> + '_ {
    extract_with(&PMID_TEMPLATE_RE, IdentifierKind::Pmid, text)
        .chain(extract_with(&PMID_URL_RE, IdentifierKind::Pmid, text))
        .chain(extract_with(&PMC_TEMPLATE_RE, IdentifierKind::Pmc, text))
        .chain(extract_with(&PMC_URL_RE, IdentifierKind::Pmc, text))
}
