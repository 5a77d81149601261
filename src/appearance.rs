//! Where does an identifier appear? Inside a `<ref>` tag, a citation template, one of the
//! sections the caller is interested in, or just somewhere in the raw text.

use std::fmt::Display;

use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    References,
    Templates,
    Sections,
}

impl Context {
    pub const ALL: [Context; 3] = [Context::References, Context::Templates, Context::Sections];

    pub const fn as_str(self) -> &'static str {
        match self {
            Context::References => "references",
            Context::Templates => "templates",
            Context::Sections => "sections",
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// The set of [`Context`]s an identifier falls into.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Appearances(u8);

impl Appearances {
    pub const NONE: Appearances = Appearances(0);

    pub fn insert(&mut self, context: Context) {
        self.0 |= context.bit();
    }

    pub const fn contains(self, context: Context) -> bool {
        self.0 & context.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Context> {
        Context::ALL
            .into_iter()
            .filter(move |&context| self.contains(context))
    }
}

impl FromIterator<Context> for Appearances {
    fn from_iter<I: IntoIterator<Item = Context>>(iter: I) -> Self {
        let mut appearances = Appearances::NONE;
        for context in iter {
            appearances.insert(context);
        }
        appearances
    }
}

impl std::fmt::Debug for Appearances {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set()
            .entries(self.iter().map(Context::as_str))
            .finish()
    }
}

/// Collect every context that has at least one span containing `span`.
///
/// This is a plain scan over all structural spans, which is fine for the handful of
/// references, templates and sections a revision has.
pub fn where_appears(span: Span, contexts: &[(Context, &[Span])]) -> Appearances {
    contexts
        .iter()
        .filter(|(_, spans)| spans.iter().any(|outer| outer.contains(&span)))
        .map(|&(context, _)| context)
        .collect()
}

/// The single statistics bucket an identifier is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AppearanceBucket {
    InTagRefAndTemplate,
    OnlyInTemplate,
    OnlyInTagRef,
    OnlyInFilteredSections,
    OnlyInRawText,
}

impl AppearanceBucket {
    pub const ALL: [AppearanceBucket; 5] = [
        AppearanceBucket::InTagRefAndTemplate,
        AppearanceBucket::OnlyInTemplate,
        AppearanceBucket::OnlyInTagRef,
        AppearanceBucket::OnlyInFilteredSections,
        AppearanceBucket::OnlyInRawText,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            AppearanceBucket::InTagRefAndTemplate => "in_tag_ref_and_template",
            AppearanceBucket::OnlyInTemplate => "only_in_template",
            AppearanceBucket::OnlyInTagRef => "only_in_tag_ref",
            AppearanceBucket::OnlyInFilteredSections => "only_in_filtered_sections",
            AppearanceBucket::OnlyInRawText => "only_in_raw_text",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl Display for AppearanceBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Appearances> for AppearanceBucket {
    /// First matching rule wins: ref and template, template, ref, filtered section, raw.
    fn from(appearances: Appearances) -> Self {
        let in_references = appearances.contains(Context::References);
        let in_templates = appearances.contains(Context::Templates);

        if in_references && in_templates {
            AppearanceBucket::InTagRefAndTemplate
        } else if in_templates {
            AppearanceBucket::OnlyInTemplate
        } else if in_references {
            AppearanceBucket::OnlyInTagRef
        } else if appearances.contains(Context::Sections) {
            AppearanceBucket::OnlyInFilteredSections
        } else {
            AppearanceBucket::OnlyInRawText
        }
    }
}
