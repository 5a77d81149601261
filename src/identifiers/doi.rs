//! Digital Object Identifiers.
//!
//! A DOI starts with `10.<registrant>/` (at least four registrant digits) and its suffix
//! may contain almost anything, including brackets. The suffix is therefore read
//! token-wise, the way `python-mwcites` does it: brackets are balanced, and the id ends at
//! whitespace, a pipe, an unbalanced closing bracket, a comment or a known HTML tag.
//! This covers bare DOIs, `doi=` template fields and `dx.doi.org/` links alike.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use super::{Identifier, IdentifierKind};
use crate::span::{Capture, Span};

static DOI_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"10\.[0-9]{4,}/").unwrap());

// tags that can be glued to the end of a DOI in wikitext, e.g. `doi: 10.1177/000276</ref>`
const HTML_TAGS: [&str; 20] = [
    "ref",
    "span",
    "div",
    "table",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "b",
    "u",
    "i",
    "s",
    "ins",
    "del",
    "code",
    "tt",
    "blockquote",
    "pre",
];

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(&format!(
        r"^<(?:/\s*)?(?:{})(?:\s[^>\n\r]*)?/?>",
        HTML_TAGS.join("|")
    ))
    .case_insensitive(true)
    .build()
    .unwrap()
});

/// Extract DOIs. Nested or overlapping matches are not reported twice.
pub fn extract(text: &str) -> impl Iterator<Item = Capture<Identifier>> + '_ {
    let mut last_end = 0;

    DOI_START.find_iter(text).filter_map(move |start| {
        // a DOI start inside the suffix of the previous DOI is part of that DOI
        if start.start() < last_end {
            return None;
        }

        let end = read_suffix(text, start.end());
        if end == start.end() {
            // `10.1234/` followed by nothing usable
            return None;
        }
        last_end = end;

        let span = Span::new(start.start(), end);
        Some(Capture::new(
            Identifier::new(IdentifierKind::Doi, &text[span.range()]),
            span,
        ))
    })
}

#[derive(Default)]
struct Depth {
    paren: usize,
    bracket: usize,
    curly: usize,
}

/// Return the end offset of the DOI suffix beginning at `begin`.
fn read_suffix(text: &str, begin: usize) -> usize {
    let mut depth = Depth::default();
    let mut end = begin;

    for (offset, c) in text[begin..].char_indices() {
        let position = begin + offset;

        let counter = match c {
            '(' | ')' => &mut depth.paren,
            '[' | ']' => &mut depth.bracket,
            '{' | '}' => &mut depth.curly,
            '<' => {
                let rest = &text[position..];
                if rest.starts_with("<!--") || HTML_TAG.is_match(rest) {
                    break;
                }
                end = position + c.len_utf8();
                continue;
            }
            '-' if text[position..].starts_with("-->") => break,
            '|' | '"' | '?' | '#' => break,
            c if c.is_whitespace() => break,
            _ => {
                end = position + c.len_utf8();
                continue;
            }
        };

        match c {
            '(' | '[' | '{' => *counter += 1,
            _ if *counter == 0 => break, /* closes something opened before the DOI */
            _ => *counter -= 1,
        }
        end = position + c.len_utf8();
    }

    // punctuation right before the end belongs to the sentence, not to the DOI
    let trimmed = text[begin..end].trim_end_matches(['.', ',', ';', ':', '!', '\'']);
    begin + trimmed.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const INPUT_TEXT: &str = r#"
This is a doi randomly placed in the text 10.0000/m1
Here's a typo that might be construed as a doi 10.60 people were there.
{{cite|...|doi=10.0000/m2|pmid=10559875}}
<ref>Halfaker, A., Geiger, R. S., Morgan, J. T., & Riedl, J. (2012).
The rise and decline of an open collaboration system: How Wikipedia's
reaction to popularity is causing its decline.
American Behavioral Scientist,
0002764212469365 doi: 10.1177/0002764212469365</ref>.  Hats pants and banana
[http://dx.doi.org/10.1170/foo<bar>(herp)derp]
[http://dx.doi.org/10.1170/foo<bar>(herp)derp[waffles]]
{{cite|...|doi=10.1098/rspb.2008.1131|issue=1656}}
http://www.google.com/sky/#latitude=3.362&longitude=160.1238441&zoom=
10.2387/234310.2347/39423
<!--
    10.2387/234310.2347/39423-->
"#;

    #[test]
    fn test_extract() {
        let mut found: HashMap<String, usize> = HashMap::new();
        for capture in extract(INPUT_TEXT) {
            *found.entry(capture.value.id.to_string()).or_default() += 1;

            assert!(capture.span.begin < INPUT_TEXT.len());
            assert!(capture.span.end <= INPUT_TEXT.len());
            assert_eq!(
                capture.span.slice(INPUT_TEXT).map(str::to_lowercase).as_deref(),
                Some(capture.value.id.as_str())
            );
        }

        let expected: HashMap<String, usize> = [
            ("10.0000/m1", 1),
            ("10.0000/m2", 1),
            ("10.1177/0002764212469365", 1),
            ("10.1170/foo<bar>(herp)derp", 1),
            ("10.1170/foo<bar>(herp)derp[waffles]", 1),
            ("10.1098/rspb.2008.1131", 1),
            // once in the text and once in the (unstripped) comment
            ("10.2387/234310.2347/39423", 2),
        ]
        .into_iter()
        .map(|(id, count)| (id.to_string(), count))
        .collect();

        assert_eq!(found, expected);
    }

    #[test]
    fn test_span_in_template_field() {
        let text = "{{cite|...|doi=10.0000/m1}}";
        let captures: Vec<_> = extract(text).collect();

        assert_eq!(captures.len(), 1);
        assert_eq!(
            captures[0].value,
            Identifier::new(IdentifierKind::Doi, "10.0000/m1")
        );
        assert_eq!(captures[0].span.slice(text), Some("10.0000/m1"));
    }

    #[test]
    fn test_trailing_punctuation() {
        let text = "As shown in 10.1000/abc.def. Next sentence; or 10.1000/xyz, too.";
        let ids: Vec<_> = extract(text).map(|c| c.value.id.to_string()).collect();
        assert_eq!(ids, vec!["10.1000/abc.def", "10.1000/xyz"]);
    }

    #[test]
    fn test_lowercased() {
        let text = "[https://doi.org/10.1093/NAR/GKV1234 full text]";
        let ids: Vec<_> = extract(text).map(|c| c.value.id.to_string()).collect();
        assert_eq!(ids, vec!["10.1093/nar/gkv1234"]);
    }

    #[test]
    fn test_empty_suffix_is_ignored() {
        assert_eq!(extract("prefix 10.1234/ alone").count(), 0);
        assert_eq!(extract("10.12/short registrant").count(), 0);
    }
}
