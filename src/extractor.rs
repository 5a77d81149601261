//! The per-revision driver: scans every revision of a page, classifies where its identifiers
//! appear, diffs it against the previous revision and keeps the [`Stats`] up to date.

use std::{iter::Peekable, str::FromStr};

use chrono::{DateTime, Utc};

use crate::{
    appearance::{where_appears, AppearanceBucket, Appearances, Context},
    diff::{diff, Diff},
    identifiers::{self, Identifier},
    languages::{self, ConfigError, Language, MatchPolicy},
    markup::{self, Section},
    page::{Contributor, Page, Revision},
    span::{Capture, Span},
    stats::Stats,
    utils,
};

/// Which sections count as the "filtered sections" of a revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionFilter {
    #[default]
    All,
    Bibliography,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub language: Language,
    pub section_filter: SectionFilter,
    pub bibliography_policy: MatchPolicy,
    /// Skip every revision except the last one of each page.
    pub only_last_revision: bool,
    /// Skip pages outside the main namespace.
    pub only_articles: bool,
}

impl ExtractorConfig {
    /// Default configuration for the wiki language `language` (e.g. `"en"`).
    pub fn new(language: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            language: Language::from_str(language)?,
            section_filter: SectionFilter::default(),
            bibliography_policy: MatchPolicy::default(),
            only_last_revision: false,
            only_articles: true,
        })
    }

    pub fn with_section_filter(mut self, section_filter: SectionFilter) -> Self {
        self.section_filter = section_filter;
        self
    }

    pub fn with_bibliography_policy(mut self, policy: MatchPolicy) -> Self {
        self.bibliography_policy = policy;
        self
    }

    pub fn with_only_last_revision(mut self, only_last_revision: bool) -> Self {
        self.only_last_revision = only_last_revision;
        self
    }

    pub fn with_only_articles(mut self, only_articles: bool) -> Self {
        self.only_articles = only_articles;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("invalid timestamp {timestamp:?} in revision {revision_id}")]
    InvalidTimestamp { revision_id: u64, timestamp: String },
}

/// Everything the scanners found in one (comment-stripped) revision text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextAnalysis {
    /// Sections accepted by the section filter, the preamble first if it was accepted.
    pub sections: Vec<Capture<Section>>,
    pub references: Vec<Capture<String>>,
    pub templates: Vec<Span>,
    pub identifiers: Vec<(Capture<Identifier>, Appearances)>,
    /// Bodies of all bibliography sections, concatenated in document order.
    pub bibliography_text: String,
}

impl TextAnalysis {
    /// Identifiers that lie inside one of the accepted sections.
    pub fn identifiers_in_sections(&self) -> impl Iterator<Item = &Identifier> {
        self.identifiers
            .iter()
            .filter(|(_, appearances)| appearances.contains(Context::Sections))
            .map(|(capture, _)| &capture.value)
    }
}

/// One analysed revision, ready to be serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRevision {
    pub id: u64,
    pub parent_id: Option<u64>,
    pub contributor: Option<Contributor>,
    pub timestamp: DateTime<Utc>,
    /// Accepted sections, without the preamble.
    pub sections: Vec<Section>,
    pub bibliography_text: String,
    pub references_diff: Vec<Diff<String>>,
    pub identifiers_diff: Vec<Diff<Identifier>>,
}

#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Strip comments from `text` and run every scanner over it.
    pub fn analyze_text(&self, text: &str) -> TextAnalysis {
        let text = utils::strip_comments(text);
        let text = text.as_ref();
        let language = self.config.language;

        let mut sections = Vec::new();
        let mut bibliography_text = String::new();
        for capture in markup::sections(text, true) {
            let section = &capture.value;
            let is_bibliography = !section.is_preamble()
                && languages::is_section_bibliography(
                    &section.name,
                    language,
                    self.config.bibliography_policy,
                );
            if is_bibliography {
                bibliography_text.push_str(&section.body);
            }

            let accepted = match self.config.section_filter {
                SectionFilter::All => true,
                SectionFilter::Bibliography => is_bibliography,
            };
            if accepted {
                sections.push(capture);
            }
        }

        let references: Vec<_> = markup::references(text)
            .map(|capture| capture.map(str::to_string))
            .collect();
        let templates: Vec<_> = markup::templates(text).map(|capture| capture.span).collect();

        let reference_spans: Vec<_> = references.iter().map(|capture| capture.span).collect();
        let section_spans: Vec<_> = sections.iter().map(|capture| capture.span).collect();
        let contexts = [
            (Context::References, reference_spans.as_slice()),
            (Context::Templates, templates.as_slice()),
            (Context::Sections, section_spans.as_slice()),
        ];

        let identifiers = identifiers::extract_all(text)
            .map(|capture| {
                let appearances = where_appears(capture.span, &contexts);
                (capture, appearances)
            })
            .collect();

        TextAnalysis {
            sections,
            references,
            templates,
            identifiers,
            bibliography_text,
        }
    }

    /// Start extracting the revisions of `page`, or return `None` if the page is skipped.
    ///
    /// Revisions are analysed lazily as the returned iterator is pulled; stats are updated
    /// along the way, so `stats` is only complete once the iterator is exhausted.
    pub fn extract_page<'a, R>(
        &'a self,
        page: Page<R>,
        stats: &'a mut Stats,
    ) -> Option<PageRevisions<'a, R::IntoIter>>
    where
        R: IntoIterator<Item = Revision>,
    {
        if self.config.only_articles && !page.is_article() {
            tracing::info!(
                message = "Skipping page outside the main namespace",
                page_id = page.id,
                title = page.title.as_str(),
                namespace = page.namespace
            );
            return None;
        }

        let span = tracing::span!(
            tracing::Level::INFO,
            "extract_page",
            page_id = page.id,
            title = page.title.as_str()
        );
        stats.performance.pages_analyzed += 1;

        Some(PageRevisions {
            extractor: self,
            stats,
            revisions: page.revisions.into_iter().peekable(),
            previous_identifiers: Vec::new(),
            previous_references: Vec::new(),
            span,
            failed: false,
        })
    }
}

/// Iterator over the analysed revisions of one page, see [`Extractor::extract_page`].
///
/// After the first error the iterator is exhausted.
#[derive(Debug)]
pub struct PageRevisions<'a, I: Iterator<Item = Revision>> {
    extractor: &'a Extractor,
    stats: &'a mut Stats,
    revisions: Peekable<I>,
    previous_identifiers: Vec<Identifier>,
    previous_references: Vec<String>,
    span: tracing::Span,
    failed: bool,
}

impl<'a, I: Iterator<Item = Revision>> PageRevisions<'a, I> {
    fn process(
        &mut self,
        revision: Revision,
        is_last_revision: bool,
    ) -> Result<ExtractedRevision, ExtractionError> {
        let Some(timestamp) = utils::parse_timestamp(&revision.timestamp) else {
            tracing::warn!(
                message = "Found invalid revision timestamp, giving up on this page",
                revision_id = revision.id,
                timestamp = revision.timestamp.as_str()
            );
            return Err(ExtractionError::InvalidTimestamp {
                revision_id: revision.id,
                timestamp: revision.timestamp,
            });
        };

        let text = match revision.text.as_deref() {
            Some(text) => text,
            None => {
                tracing::debug!(
                    message = "Revision has no text, treating it as empty",
                    revision_id = revision.id
                );
                ""
            }
        };

        let analysis = self.extractor.analyze_text(text);
        tracing::debug!(
            message = "Analyzed revision",
            revision_id = revision.id,
            identifiers = analysis.identifiers.len(),
            references = analysis.references.len(),
            sections = analysis.sections.len()
        );

        for (_, appearances) in &analysis.identifiers {
            self.stats
                .record_identifier(AppearanceBucket::from(*appearances), is_last_revision);
        }

        let identifiers: Vec<Identifier> = analysis.identifiers_in_sections().cloned().collect();
        let identifiers_diff = diff(&self.previous_identifiers, &identifiers);
        self.previous_identifiers = identifiers;

        let references: Vec<String> = analysis
            .references
            .into_iter()
            .map(|capture| capture.value)
            .collect();
        let references_diff = diff(&self.previous_references, &references);
        self.previous_references = references;

        let sections: Vec<Section> = analysis
            .sections
            .into_iter()
            .map(|capture| capture.value)
            .filter(|section| !section.is_preamble())
            .collect();
        for section in &sections {
            self.stats
                .record_section_name(&section.name, is_last_revision);
        }

        self.stats.performance.revisions_analyzed += 1;

        Ok(ExtractedRevision {
            id: revision.id,
            parent_id: revision.parent_id,
            contributor: revision.contributor,
            timestamp,
            sections,
            bibliography_text: analysis.bibliography_text,
            references_diff,
            identifiers_diff,
        })
    }
}

impl<'a, I: Iterator<Item = Revision>> Iterator for PageRevisions<'a, I> {
    type Item = Result<ExtractedRevision, ExtractionError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let span = self.span.clone();
        let _entered = span.enter();

        loop {
            let revision = self.revisions.next()?;
            let is_last_revision = self.revisions.peek().is_none();
            if self.extractor.config.only_last_revision && !is_last_revision {
                continue;
            }

            let result = self.process(revision, is_last_revision);
            self.failed = result.is_err();
            return Some(result);
        }
    }
}
