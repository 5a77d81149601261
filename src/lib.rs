// SPDX-License-Identifier: MPL-2.0
//! # wikidump
//!
//! Extract citations, bibliographic identifiers, sections and references from the revision history of Wikipedia pages, and track where they appear and when they come and go.
//!
//! ## Overview
//!
//! `wikidump` is a library for mining the references of encyclopedia articles out of full-history Wikimedia dumps. For every revision of a page it finds:
//!
//! - **Bibliographic identifiers**: DOIs, ISBNs, PubMed and PubMed Central ids and arXiv ids, normalized so that the same work is recognized regardless of how it was written.
//! - **Structure**: `<ref>` tags, `{{templates}}` and `== sections ==`, each with the exact byte span it covers.
//! - **Appearance**: for every identifier, whether it was cited inside a reference tag, a citation template, a bibliography section, or just mentioned in the raw text.
//! - **Changes**: which identifiers and references were added or removed compared to the previous revision.
//!
//! **Key Features:**
//!
//! - **Streaming**: Revisions are pulled one at a time, so pages with hundreds of thousands of revisions never have to be held in memory.
//! - **Forgiving**: Wikitext is always a little broken. Scanners never fail, ambiguous markup is resolved by simple documented rules.
//! - **Parallel Friendly**: All state lives in a caller-owned [`Stats`](stats::Stats) value that can be kept per worker and merged afterwards.
//!
//! ## Getting Started
//!
//! ### Installation
//!
//! Add `wikidump` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! wikidump = "0.1.0"  # Update with the actual version once released
//! ```
//!
//! ### Basic Usage
//!
//! Reading the dump itself (decompression, XML) is left to you; hand the pages to an [`Extractor`](extractor::Extractor) as [`Page`](page::Page)s:
//!
//! ```rust
//! use wikidump::extractor::{Extractor, ExtractorConfig, SectionFilter};
//! use wikidump::page::{Page, Revision};
//! use wikidump::stats::Stats;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractorConfig::new("en")?.with_section_filter(SectionFilter::Bibliography);
//!     let extractor = Extractor::new(config);
//!     let mut stats = Stats::new();
//!
//!     let page = Page {
//!         id: 1,
//!         title: "Example".into(),
//!         namespace: 0,
//!         revisions: vec![Revision {
//!             id: 10,
//!             parent_id: None,
//!             contributor: None,
//!             timestamp: "2020-01-01T00:00:00Z".to_string(),
//!             text: Some("== Bibliography ==\n* {{cite journal|doi=10.1000/182}}".to_string()),
//!         }],
//!     };
//!
//!     stats.start();
//!     if let Some(revisions) = extractor.extract_page(page, &mut stats) {
//!         for revision in revisions {
//!             let revision = revision?;
//!             for record in &revision.identifiers_diff {
//!                 println!("{} {} in revision {}", record.action, record.value, revision.id);
//!             }
//!         }
//!     }
//!     stats.finish();
//!
//!     for (bucket, count) in stats.identifiers.global.iter() {
//!         println!("{bucket}: {count}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Parallel Processing
//!
//! Pages are independent of each other. Give every worker its own `Stats` and fold them together with [`Stats::merge`](stats::Stats::merge) once all workers are done.
//!
//! ## Modules and API
//!
//! ### Scanners
//!
//! - [`identifiers`]: one scanner per identifier kind, plus [`identifiers::extract_all`].
//! - [`markup`]: references, templates (including citation templates) and sections.
//! - [`utils::strip_comments`]: must run first, identifiers inside `<!-- -->` are not counted.
//!
//! Every scanner is a function from text to an iterator of [`Capture`](span::Capture)s: the value that was found plus its [`Span`](span::Span) in the text.
//!
//! ```rust
//! use wikidump::identifiers::doi;
//!
//! let text = "{{cite|...|doi=10.0000/m1}}";
//! let capture = doi::extract(text).next().unwrap();
//! assert_eq!(capture.value.to_string(), "doi:10.0000/m1");
//! assert_eq!(capture.span.slice(text), Some("10.0000/m1"));
//! ```
//!
//! ### Classification
//!
//! - [`languages`]: what counts as a bibliography section or a citation template, per wiki language, with exact or fuzzy matching.
//! - [`appearance`]: which structures contain an identifier, and the single statistics bucket it is counted in.
//! - [`diff`]: added/removed records between two revisions.
//!
//! ### Driver
//!
//! - [`extractor`]: runs everything above over each revision of a page.
//! - [`history`]: pairs up additions and removals into the lifetime of each identifier on a page.
//!
//! ## Limitations
//!
//! - **Not a Parser**: Templates are matched up to the first `}}`, so nested templates are cut short. Sections are returned as a flat list, rebuild the hierarchy from their `level` if needed.
//! - **Offsets**: Spans are byte offsets into the text after comments were stripped.
//! - **Languages**: Only English (`en`) and Italian (`it`) vocabularies are included.
//! - **Wikilinks**: `[[links]]` are not extracted, they stay part of the raw text.
//!
//! ## Features and Configuration
//!
//! ### Lower-casing
//!
//! Identifier normalization and section name matching lower-case a lot of short strings. The `optimized-str` feature switches to a table-based implementation that is faster for text with a lot of non-ASCII characters:
//!
//! ```toml
//! [dependencies]
//! wikidump = { version = "0.1.0", features = ["optimized-str"] }
//! ```
//!
//! ### Logging and Error Handling
//!
//! - Uses the `tracing` crate: one span per page, debug events per revision, warnings for malformed input.
//! - A revision with an invalid timestamp ends its page with an [`ExtractionError`](extractor::ExtractionError); other pages are not affected. An unsupported language is rejected when the configuration is built.
//!
//! ## Licensing
//!
//! This project is primarily licensed under the Mozilla Public License 2.0.
//!
//! The identifier patterns are derived from [`python-mwcites`](https://github.com/mediawiki-utilities/python-mwcites), which is licensed under the MIT License. For these parts of the project the MIT License applies additionally.

pub mod appearance;
pub mod diff;
pub mod extractor;
pub mod history;
pub mod identifiers;
#[cfg(test)]
mod integration_tests;
pub mod languages;
pub mod markup;
pub mod page;
pub mod span;
pub mod stats;
#[cfg(test)]
mod test_support;
pub mod utils;
