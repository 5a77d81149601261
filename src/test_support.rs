use chrono::DateTime;

use crate::page::{Contributor, Page, Revision};

pub mod prelude {
    pub(crate) use super::proptest as proptest_support;
    pub(crate) use super::{
        dummy_revision, dummy_revision_with, page_from_revisions, page_from_texts, timestamp_for,
    };
    pub(crate) use proptest::prelude::*;
}

/// Long dump format timestamp, one minute per revision id so that ids order like times.
pub fn timestamp_for(id: u64) -> String {
    let seconds = 1_600_000_000 + 60 * id as i64;
    DateTime::from_timestamp(seconds, 0)
        .unwrap()
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
}

pub fn dummy_revision() -> Revision {
    Revision {
        id: 0,
        parent_id: None,
        contributor: Some(Contributor {
            id: None,
            username: "127.0.0.1".into(),
        }),
        timestamp: timestamp_for(0),
        text: None,
    }
}

pub fn dummy_revision_with(id: u64, timestamp: &str, text: &str) -> Revision {
    Revision {
        id,
        parent_id: id.checked_sub(1).filter(|&parent| parent > 0),
        timestamp: timestamp.to_string(),
        text: Some(text.to_string()),
        ..dummy_revision()
    }
}

pub fn page_from_revisions(revisions: Vec<Revision>) -> Page<Vec<Revision>> {
    Page {
        id: 20,
        title: "Pagetitle".into(),
        namespace: 0,
        revisions,
    }
}

/// A page with one revision per text, ids counting up from 1.
pub fn page_from_texts(texts: &[&str]) -> Page<Vec<Revision>> {
    page_from_revisions(
        (1..)
            .zip(texts)
            .map(|(id, text)| dummy_revision_with(id, &timestamp_for(id), text))
            .collect(),
    )
}

pub mod proptest {
    use proptest::prelude::*;
    use proptest::strategy::Strategy;

    use super::{dummy_revision, page_from_revisions, timestamp_for};
    use crate::page::{Page, Revision};

    /// Snippets of wikitext that exercise every scanner, glued together at random.
    pub fn wikitext() -> impl Strategy<Value = String> {
        let fragment = prop_oneof![
            3 => "[a-z ]{0,12}",
            1 => Just("\n".to_string()),
            1 => Just("\n== Bibliography ==\n".to_string()),
            1 => Just("\n= History =\n".to_string()),
            1 => Just("<ref>".to_string()),
            1 => Just("</ref>".to_string()),
            1 => Just("<ref name=\"a\" />".to_string()),
            1 => Just("{{cite journal|".to_string()),
            1 => Just("}}".to_string()),
            1 => Just("<!--".to_string()),
            1 => Just("-->".to_string()),
            2 => "doi=10\\.[0-9]{4}/[a-z]{1,3}",
            1 => "isbn=[0-9]{3}-[0-9]{7}",
            1 => "pmid=[0-9]{1,4}",
            1 => "arxiv:[0-9]{4}\\.[0-9]{5}",
        ];
        prop::collection::vec(fragment, 0..40).prop_map(|fragments| fragments.concat())
    }

    pub fn maybe_text() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            1 => Just(None),
            6 => wikitext().prop_map(Some)
        ]
    }

    prop_compose! {
        pub fn correct_revision(id: u64)
                (text in maybe_text())
        -> Revision {
            Revision {
                id, /* must be unique */
                timestamp: timestamp_for(id),
                text,
                ..dummy_revision()
            }
        }
    }

    pub fn correct_revision_vec(max_revisions: u64) -> impl Strategy<Value = Vec<Revision>> {
        (1..max_revisions).prop_flat_map(|num_revisions| {
            (1..=num_revisions)
                .map(correct_revision)
                .collect::<Vec<_>>()
        })
    }

    prop_compose! {
        pub fn correct_page(max_revisions: u64)
                (revisions in correct_revision_vec(max_revisions))
        -> Page<Vec<Revision>> {
            page_from_revisions(revisions)
        }
    }
}
