//! Scanners for bibliographic identifiers (DOI, ISBN, PubMed, PubMed Central, arXiv).
//!
//! Every scanner is a total function over the revision text: it never fails, and finding
//! nothing simply yields an empty iterator. Scanners are independent of one another and
//! expect comments to be stripped already (see [`crate::utils::strip_comments`]).
//!
//! Identifiers are yielded once per occurrence, so the same id may be reported several
//! times for one text. Deduplication across a revision happens in [`crate::diff`].

use std::fmt::{Debug, Display};

use compact_str::CompactString;

use crate::span::Capture;

pub mod arxiv;
pub mod doi;
pub mod isbn;
pub mod pubmed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentifierKind {
    Doi,
    Isbn,
    Pmid,
    Pmc,
    Arxiv,
}

impl IdentifierKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::Doi => "doi",
            IdentifierKind::Isbn => "isbn",
            IdentifierKind::Pmid => "pmid",
            IdentifierKind::Pmc => "pmc",
            IdentifierKind::Arxiv => "arxiv",
        }
    }
}

impl Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized bibliographic identifier.
///
/// Equality is by `(kind, id)` only, the surface text it was found as is not kept.
/// Use [`Identifier::new`] to go through the per-kind normalization.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    pub kind: IdentifierKind,
    pub id: CompactString,
}

impl Identifier {
    pub fn new(kind: IdentifierKind, raw: &str) -> Self {
        Self {
            kind,
            id: normalize(kind, raw),
        }
    }
}

impl Debug for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Identifier({}:{:?})", self.kind, self.id)
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Bring a raw id into its canonical form. Idempotent.
pub fn normalize(kind: IdentifierKind, raw: &str) -> CompactString {
    match kind {
        IdentifierKind::Isbn => raw.chars().filter(|&c| c != '-').collect(),
        IdentifierKind::Doi | IdentifierKind::Arxiv => {
            CompactString::from(crate::utils::to_lowercase(raw))
        }
        IdentifierKind::Pmid | IdentifierKind::Pmc => CompactString::from(raw),
    }
}

/// Run all identifier scanners over `text`.
///
/// Results are grouped by scanner (arXiv, DOI, ISBN, PubMed), each group in scan order.
pub fn extract_all(text: &str) -> impl Iterator<Item = Capture<Identifier>> + '_ {
    arxiv::extract(text)
        .chain(doi::extract(text))
        .chain(isbn::extract(text))
        .chain(pubmed::extract(text))
}
