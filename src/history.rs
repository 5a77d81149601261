//! Lifetimes of identifiers over the history of a page: in which revision an identifier was
//! added, and in which one it was removed again (if ever).

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use tracing::instrument;

use crate::{
    diff::{diff, DiffAction},
    extractor::ExtractionError,
    identifiers::{self, Identifier},
    page::{Page, Revision},
    utils,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RevisionEvent {
    pub timestamp: DateTime<Utc>,
    pub revision_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentifierLifetime {
    pub identifier: Identifier,
    pub added: RevisionEvent,
    /// `None` if the identifier is still present in the last revision.
    pub removed: Option<RevisionEvent>,
}

/// Pair up the add and remove events of every identifier.
///
/// `revisions` holds the identifiers of each revision and must already be in chronological
/// order. The first revision is diffed against an empty one. The result is sorted by
/// identifier, then by the time it was added.
pub fn identifier_lifetimes(
    revisions: &[(RevisionEvent, Vec<Identifier>)],
) -> Vec<IdentifierLifetime> {
    let mut open: FxHashMap<Identifier, RevisionEvent> = FxHashMap::default();
    let mut lifetimes = Vec::new();
    let mut previous: &[Identifier] = &[];

    for (event, current) in revisions {
        for record in diff(previous, current) {
            match record.action {
                DiffAction::Added => {
                    open.insert(record.value, *event);
                }
                DiffAction::Removed => {
                    if let Some(added) = open.remove(&record.value) {
                        lifetimes.push(IdentifierLifetime {
                            identifier: record.value,
                            added,
                            removed: Some(*event),
                        });
                    }
                }
            }
        }
        previous = current;
    }

    lifetimes.extend(
        open.into_iter()
            .map(|(identifier, added)| IdentifierLifetime {
                identifier,
                added,
                removed: None,
            }),
    );
    lifetimes.sort_unstable_by(|a, b| {
        a.identifier
            .cmp(&b.identifier)
            .then_with(|| a.added.cmp(&b.added))
    });
    lifetimes
}

/// Scan every revision of `page` (comments stripped, no section filtering) and compute the
/// [`IdentifierLifetime`]s of all identifiers that ever appeared in it.
///
/// Unlike the [`Extractor`](crate::extractor::Extractor) this collects the whole history
/// first, since revisions are ordered by `(timestamp, id)` before diffing.
#[instrument(skip(page), fields(page_id = page.id, title = page.title.as_str()))]
pub fn collect_page_history<R>(page: Page<R>) -> Result<Vec<IdentifierLifetime>, ExtractionError>
where
    R: IntoIterator<Item = Revision>,
{
    let mut revisions = Vec::new();
    for revision in page.revisions {
        let Some(timestamp) = utils::parse_timestamp(&revision.timestamp) else {
            tracing::warn!(
                message = "Found invalid revision timestamp",
                revision_id = revision.id,
                timestamp = revision.timestamp.as_str()
            );
            return Err(ExtractionError::InvalidTimestamp {
                revision_id: revision.id,
                timestamp: revision.timestamp,
            });
        };

        let text = utils::strip_comments(revision.text.as_deref().unwrap_or_default());
        let identifiers: Vec<Identifier> = identifiers::extract_all(&text)
            .map(|capture| capture.value)
            .collect();

        let event = RevisionEvent {
            timestamp,
            revision_id: revision.id,
        };
        revisions.push((event, identifiers));
    }

    // RevisionEvent orders by (timestamp, id)
    revisions.sort_by_key(|(event, _)| *event);
    tracing::debug!(message = "Collected revisions", revisions = revisions.len());

    Ok(identifier_lifetimes(&revisions))
}
