//! Locale vocabulary: which section names mean "bibliography" and which template names are
//! citations, per supported wiki language.

use std::{fmt, str::FromStr};

use crate::{markup, utils};

/// Minimum fuzzy score (out of 100) for a section name to count as a bibliography header.
pub const FUZZY_MATCH_CUTOFF: u8 = 91;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported language: {0:?}")]
    UnsupportedLanguage(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    En,
    It,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::It => "it",
        }
    }

    pub fn bibliography_synonyms(self) -> &'static [&'static str] {
        match self {
            Language::En => &["bibliography"],
            Language::It => &["bibliografia"],
        }
    }

    pub fn citation_synonyms(self) -> &'static [&'static str] {
        match self {
            Language::En => &["citation", "cite", "vcite"],
            Language::It => &["cita"],
        }
    }
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "en" => Ok(Language::En),
            "it" => Ok(Language::It),
            _ => Err(ConfigError::UnsupportedLanguage(tag.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How section names are compared against the bibliography synonyms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Lower-cased, trimmed name must equal a synonym.
    #[default]
    Exact,
    /// Best [`fuzzy_ratio`] against the synonyms must reach [`FUZZY_MATCH_CUTOFF`].
    Fuzzy,
}

// lower-case, every non-alphanumeric character becomes a space, trimmed
fn process(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    utils::to_lowercase(replaced.trim())
}

/// Similarity of two names from 0 to 100, based on the normalized Levenshtein distance of
/// their processed forms. Names that process to nothing score 0.
pub fn fuzzy_ratio(a: &str, b: &str) -> u8 {
    let (a, b) = (process(a), process(b));
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    (strsim::normalized_levenshtein(&a, &b) * 100.0).round() as u8
}

pub fn is_section_bibliography(name: &str, language: Language, policy: MatchPolicy) -> bool {
    let synonyms = language.bibliography_synonyms();
    match policy {
        MatchPolicy::Exact => {
            let name = utils::to_lowercase(name.trim());
            synonyms.contains(&name.as_str())
        }
        MatchPolicy::Fuzzy => synonyms
            .iter()
            .map(|synonym| fuzzy_ratio(name, synonym))
            .max()
            .is_some_and(|score| score >= FUZZY_MATCH_CUTOFF),
    }
}

/// Whether a raw template (as captured by [`markup::templates`]) is a citation template,
/// e.g. `{{Citation|...}}` or `{{cite journal|...}}`.
pub fn is_citation_template(template: &str, language: Language) -> bool {
    let name = utils::to_lowercase(markup::template_name(template));
    language.citation_synonyms().iter().any(|synonym| {
        name.strip_prefix(*synonym)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    })
}
