use crate::{
    appearance::AppearanceBucket,
    diff::{Diff, DiffAction},
    extractor::{ExtractionError, Extractor, ExtractorConfig, SectionFilter},
    identifiers::{Identifier, IdentifierKind},
    languages::MatchPolicy,
    page::Revision,
    stats::Stats,
    test_support::prelude::*,
};

fn english() -> ExtractorConfig {
    ExtractorConfig::new("en").unwrap()
}

fn doi(id: &str) -> Identifier {
    Identifier::new(IdentifierKind::Doi, id)
}

#[test]
fn test_identifiers_across_revisions() {
    let page = page_from_texts(&[
        "Intro {{cite journal|doi=10.0000/a}}",
        "Intro {{cite journal|doi=10.0000/a}} and <ref>10.0000/b</ref>",
        "Intro <ref>10.0000/b</ref>",
    ]);
    let extractor = Extractor::new(english());
    let mut stats = Stats::new();

    let revisions: Vec<_> = extractor
        .extract_page(page, &mut stats)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(revisions.len(), 3);
    assert_eq!(revisions[0].identifiers_diff, vec![Diff::added(doi("10.0000/a"))]);
    assert_eq!(revisions[1].identifiers_diff, vec![Diff::added(doi("10.0000/b"))]);
    assert_eq!(
        revisions[2].identifiers_diff,
        vec![Diff::removed(doi("10.0000/a"))]
    );

    assert_eq!(
        revisions[1].references_diff,
        vec![Diff::added("<ref>10.0000/b</ref>".to_string())]
    );
    assert!(revisions[2].references_diff.is_empty());

    let global = &stats.identifiers.global;
    assert_eq!(global[AppearanceBucket::OnlyInTemplate], 2);
    assert_eq!(global[AppearanceBucket::OnlyInTagRef], 2);
    assert_eq!(global.total(), 4);

    let last = &stats.identifiers.last_revision;
    assert_eq!(last[AppearanceBucket::OnlyInTagRef], 1);
    assert_eq!(last.total(), 1);

    assert_eq!(stats.performance.revisions_analyzed, 3);
    assert_eq!(stats.performance.pages_analyzed, 1);
}

#[test]
fn test_bibliography_filter() {
    let page = page_from_texts(&[
        "Lead 10.0000/lead\n== Bibliography ==\n* 10.0000/book\n== Links ==\n10.0000/link\n",
    ]);
    let extractor = Extractor::new(
        english()
            .with_section_filter(SectionFilter::Bibliography)
            .with_bibliography_policy(MatchPolicy::Fuzzy),
    );
    let mut stats = Stats::new();

    let revision = extractor
        .extract_page(page, &mut stats)
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    assert_eq!(revision.sections.len(), 1);
    assert_eq!(revision.sections[0].name, " Bibliography ");
    assert_eq!(revision.bibliography_text, "* 10.0000/book");
    assert_eq!(
        revision.identifiers_diff,
        vec![Diff::added(doi("10.0000/book"))]
    );

    let global = &stats.identifiers.global;
    assert_eq!(global[AppearanceBucket::OnlyInFilteredSections], 1);
    assert_eq!(global[AppearanceBucket::OnlyInRawText], 2);
    assert_eq!(stats.section_names.global.get(" Bibliography "), 1);
    assert_eq!(stats.section_names.last_revision.get(" Bibliography "), 1);
}

#[test]
fn test_all_sections() {
    let page = page_from_texts(&["Lead 10.0000/lead\n== Links ==\n10.0000/link\n"]);
    let extractor = Extractor::new(english());
    let mut stats = Stats::new();

    let revision = extractor
        .extract_page(page, &mut stats)
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    // the preamble is filtered too, but not reported as a section
    assert_eq!(revision.sections.len(), 1);
    assert_eq!(revision.identifiers_diff.len(), 2);
    assert!(revision.bibliography_text.is_empty());
    assert_eq!(
        stats.identifiers.global[AppearanceBucket::OnlyInFilteredSections],
        2
    );
}

#[test]
fn test_only_last_revision() {
    let page = page_from_texts(&["10.0000/a", "10.0000/b", "10.0000/c"]);
    let extractor = Extractor::new(english().with_only_last_revision(true));
    let mut stats = Stats::new();

    let revisions: Vec<_> = extractor
        .extract_page(page, &mut stats)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(revisions.len(), 1);
    assert_eq!(revisions[0].id, 3);
    assert_eq!(revisions[0].identifiers_diff, vec![Diff::added(doi("10.0000/c"))]);
    assert_eq!(stats.performance.revisions_analyzed, 1);
    assert_eq!(stats.identifiers.global, stats.identifiers.last_revision);
}

#[test]
fn test_invalid_timestamp_stops_page() {
    let mut page = page_from_texts(&["10.0000/a", "10.0000/b", "10.0000/c"]);
    page.revisions[1].timestamp = "not a time".to_string();

    let extractor = Extractor::new(english());
    let mut stats = Stats::new();
    let mut revisions = extractor.extract_page(page, &mut stats).unwrap();

    assert!(revisions.next().unwrap().is_ok());
    let error = revisions.next().unwrap().unwrap_err();
    assert!(matches!(
        error,
        ExtractionError::InvalidTimestamp { revision_id: 2, ref timestamp } if timestamp == "not a time"
    ));
    assert!(revisions.next().is_none());
    drop(revisions);

    assert_eq!(stats.performance.revisions_analyzed, 1);

    // the next page is not affected
    let revisions: Vec<_> = extractor
        .extract_page(page_from_texts(&["10.0000/d"]), &mut stats)
        .unwrap()
        .collect();
    assert_eq!(revisions.len(), 1);
    assert!(revisions[0].is_ok());
    assert_eq!(stats.performance.pages_analyzed, 2);
}

#[test]
fn test_missing_text_is_empty() {
    let page = page_from_revisions(vec![
        dummy_revision_with(1, &timestamp_for(1), "<ref>10.0000/a</ref>"),
        Revision {
            id: 2,
            timestamp: timestamp_for(2),
            ..dummy_revision()
        },
    ]);
    let extractor = Extractor::new(english());
    let mut stats = Stats::new();

    let revisions: Vec<_> = extractor
        .extract_page(page, &mut stats)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(revisions[1].identifiers_diff, vec![Diff::removed(doi("10.0000/a"))]);
    assert_eq!(
        revisions[1].references_diff,
        vec![Diff::removed("<ref>10.0000/a</ref>".to_string())]
    );
    assert!(revisions[1].sections.is_empty());
}

#[test]
fn test_comments_are_ignored() {
    let page = page_from_texts(&["<!-- {{cite journal|doi=10.0000/a}} -->\n<ref>x</ref>"]);
    let extractor = Extractor::new(english());
    let mut stats = Stats::new();

    let revision = extractor
        .extract_page(page, &mut stats)
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    assert!(revision.identifiers_diff.is_empty());
    assert_eq!(stats.identifiers.global.total(), 0);
}

#[test]
fn test_stats_merge_matches_sequential_run() {
    let texts = [
        &["<ref>10.0000/a</ref>", "{{cite|doi=10.0000/a}}"][..],
        &["== Bibliography ==\nisbn 0-306-40615-2"][..],
    ];
    let extractor = Extractor::new(english());

    let mut sequential = Stats::new();
    let mut merged = Stats::new();
    for texts in texts {
        let mut per_page = Stats::new();
        for stats in [&mut sequential, &mut per_page] {
            for revision in extractor.extract_page(page_from_texts(texts), stats).unwrap() {
                revision.unwrap();
            }
        }
        merged.merge(&per_page);
    }

    assert_eq!(merged, sequential);
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    })]
    #[test]
    fn page_extraction_is_consistent(page in proptest_support::correct_page(8)) {
        let extractor = Extractor::new(english());
        let mut stats = Stats::new();
        let num_revisions = page.revisions.len();
        let last_text = page.revisions.last().and_then(|r| r.text.clone()).unwrap_or_default();

        let revisions: Vec<_> = extractor
            .extract_page(page, &mut stats)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        prop_assert_eq!(revisions.len(), num_revisions);

        // replaying the identifier diffs yields the identifiers of the last revision
        let mut present = std::collections::BTreeSet::new();
        for revision in &revisions {
            for record in &revision.identifiers_diff {
                match record.action {
                    DiffAction::Added => prop_assert!(present.insert(record.value.clone())),
                    DiffAction::Removed => prop_assert!(present.remove(&record.value)),
                }
            }
        }
        let expected: std::collections::BTreeSet<_> = extractor
            .analyze_text(&last_text)
            .identifiers_in_sections()
            .cloned()
            .collect();
        prop_assert_eq!(present, expected);

        prop_assert_eq!(stats.performance.revisions_analyzed, num_revisions as u64);
        prop_assert!(stats.identifiers.last_revision.total() <= stats.identifiers.global.total());
    }
}
