//! Scanners for the structural constructs of wikitext: `<ref>` tags, `{{templates}}` and
//! `== section ==` headers.
//!
//! None of these is a parser. Each one recognizes the outer delimiters of a construct on a
//! best-effort basis and returns the raw text together with its span; wikitext is always
//! somewhat broken, so ambiguous input is resolved by the nearest-match rules documented
//! on each function and never reported as an error.

use std::sync::LazyLock;

use memchr::memchr_iter;
use regex::Regex;

use crate::{
    languages::{self, Language},
    span::{Capture, Span},
};

/// Find `<ref ...>...</ref>` tags.
///
/// The opening tag ends at its first `>`. Quoted attribute values may contain `=`, whitespace or
/// the other kind of quote, but never `>` or a line break, and a lone quote (`name=O'Brien`) is an
/// ordinary character. Whitespace (even blank lines) is allowed around the tag names, and the tag
/// name is matched case-insensitively. The body ends at the nearest `</ref>`. Self-closing tags
/// (`<ref name="x" />`) are not references in this sense and are skipped.
pub fn references(text: &str) -> impl Iterator<Item = Capture<&str>> + '_ {
    static REGEX_REF: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r#"(?is)<\s*ref\b(?:[^>"'/]|"[^">\n]*"|'[^'>\n]*'|["']|/+[^>/"'])*>.*?<\s*/\s*ref\s*>"#,
        )
        .unwrap()
    });

    REGEX_REF
        .find_iter(text)
        .map(|m| Capture::new(m.as_str(), Span::from_match(&m)))
}

/// Find `{{...}}` templates.
///
/// The first `}}` closes the template, so nested templates are cut short:
/// `{{a|{{b}}|c}}` yields `{{a|{{b}}`. Interior whitespace and newlines are unrestricted.
pub fn templates(text: &str) -> impl Iterator<Item = Capture<&str>> + '_ {
    static REGEX_TEMPLATE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)\{\{.*?\}\}").unwrap());

    REGEX_TEMPLATE
        .find_iter(text)
        .map(|m| Capture::new(m.as_str(), Span::from_match(&m)))
}

/// The name of a template as captured by [`templates`]: the trimmed text between `{{` and the
/// first `|` (or the closing braces).
pub fn template_name(template: &str) -> &str {
    let inner = template.strip_prefix("{{").unwrap_or(template);
    let inner = inner.strip_suffix("}}").unwrap_or(inner);
    inner.split('|').next().unwrap_or_default().trim()
}

/// Templates whose name is one of the citation templates of `language`.
pub fn citation_templates(
    text: &str,
    language: Language,
) -> impl Iterator<Item = Capture<&str>> + '_ {
    templates(text).filter(move |capture| languages::is_citation_template(capture.value, language))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Section {
    pub name: String,
    /// Number of `=` around the name; `0` for the synthetic preamble.
    pub level: usize,
    pub body: String,
}

impl Section {
    pub fn is_preamble(&self) -> bool {
        self.level == 0
    }
}

#[derive(Debug, Clone, Copy)]
struct Header {
    /// Offset of the first `=`.
    start: usize,
    /// Offset of the `\n` terminating the header line, or the end of the text.
    line_end: usize,
    level: usize,
    name_begin: usize,
    name_end: usize,
}

/// Check whether `line` (without its `\n`) is a section header, i.e. `=+<name>=+` with runs of
/// equal length and optional trailing whitespace.
///
/// The longest run that fits wins, the name is whatever lies between the runs (it may contain
/// `=` itself, and must not be empty).
fn parse_header_line(line: &str) -> Option<(usize, usize, usize)> {
    let trimmed = line.trim_end_matches([' ', '\t', '\r', '\x0b', '\x0c']).as_bytes();
    let run = trimmed.iter().take_while(|&&b| b == b'=').count();

    (1..=run).rev().find_map(|level| {
        let closes = trimmed.len() > 2 * level
            && trimmed[trimmed.len() - level..].iter().all(|&b| b == b'=');
        closes.then_some((level, level, trimmed.len() - level))
    })
}

fn find_header(text: &str, from: usize) -> Option<Header> {
    let mut line_start = from;
    let line_ends = memchr_iter(b'\n', &text.as_bytes()[from..])
        .map(|offset| from + offset)
        .chain(std::iter::once(text.len()));

    for line_end in line_ends {
        if line_start > text.len() {
            break;
        }
        let line = &text[line_start..line_end];
        if line.starts_with('=') {
            if let Some((level, name_begin, name_end)) = parse_header_line(line) {
                return Some(Header {
                    start: line_start,
                    line_end,
                    level,
                    name_begin: line_start + name_begin,
                    name_end: line_start + name_end,
                });
            }
        }
        line_start = line_end + 1;
    }

    None
}

/// Iterator over the sections of a text, see [`sections`].
#[derive(Debug)]
pub struct Sections<'a> {
    text: &'a str,
    next_header: Option<Header>,
    pending_preamble: bool,
}

impl<'a> Sections<'a> {
    fn body_end(&self) -> usize {
        match self.next_header {
            // the newline right before the next header is not part of the body
            Some(next) => next.start.saturating_sub(1),
            None => self.text.len(),
        }
    }
}

impl<'a> Iterator for Sections<'a> {
    type Item = Capture<Section>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pending_preamble {
            self.pending_preamble = false;
            let body_end = self.body_end();
            return Some(Capture::new(
                Section {
                    name: String::new(),
                    level: 0,
                    body: self.text[..body_end].to_string(),
                },
                Span::new(0, body_end),
            ));
        }

        let header = self.next_header.take()?;
        let body_begin = (header.line_end + 1).min(self.text.len());
        self.next_header = find_header(self.text, body_begin);
        let body_end = self.body_end().max(header.line_end);

        let body = if body_begin < body_end {
            &self.text[body_begin..body_end]
        } else {
            ""
        };

        Some(Capture::new(
            Section {
                name: self.text[header.name_begin..header.name_end].to_string(),
                level: header.level,
                body: body.to_string(),
            },
            Span::new(header.start, body_end),
        ))
    }
}

/// Split `text` into sections.
///
/// All headers are returned in document order as one flat sequence regardless of their level;
/// the body of a section runs from the line after its header up to (excluding) the newline
/// before the next header of any level, or to the end of the text. The span of a section
/// covers its header and body.
///
/// With `include_preamble`, a synthetic section of level `0` with an empty name is yielded
/// first, covering everything before the first header (the whole text if there is none).
pub fn sections(text: &str, include_preamble: bool) -> Sections<'_> {
    Sections {
        text,
        next_header: find_header(text, 0),
        pending_preamble: include_preamble,
    }
}
