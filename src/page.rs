//! The pages and revisions handed to the extractor by whatever reads the dump.

use compact_str::CompactString;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Contributor {
    pub username: CompactString,
    /// `None` for anonymous edits, `username` is the IP address then.
    pub id: Option<i32>,
}

impl Contributor {
    pub fn is_anonymous(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision {
    pub id: u64,
    pub parent_id: Option<u64>,
    /// `None` if the user was suppressed.
    pub contributor: Option<Contributor>,
    /// Raw timestamp as found in the dump, see [`crate::utils::parse_timestamp`] for the
    /// accepted formats.
    pub timestamp: String,
    /// `None` if the text was deleted, treated like an empty text.
    pub text: Option<String>,
}

/// One page of a dump.
///
/// `revisions` is pulled lazily, so a streaming reader can hand out pages without
/// materializing their whole history. Revisions are expected in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Page<R> {
    pub id: u64,
    pub title: CompactString,
    pub namespace: i32,
    pub revisions: R,
}

impl<R> Page<R> {
    /// Main namespace, i.e. encyclopedia articles.
    pub fn is_article(&self) -> bool {
        self.namespace == 0
    }
}
