use std::{fmt::Debug, ops::Range};

/// Half-open byte range `[begin, end)` into the text a scanner was run on.
///
/// Offsets always fall on `char` boundaries of that text, so `&text[span.range()]`
/// never panics as long as the span is used with the text that produced it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(begin: usize, end: usize) -> Self {
        debug_assert!(begin <= end);
        Self { begin, end }
    }

    pub fn from_match(m: &regex::Match<'_>) -> Self {
        Self::new(m.start(), m.end())
    }

    pub const fn len(&self) -> usize {
        self.end - self.begin
    }

    pub const fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Whether `other` lies within `self`.
    ///
    /// Reflexive: a span contains itself. Identifier spans regularly coincide with
    /// the span of the structure around them, so this must not be a strict test.
    #[inline]
    pub const fn contains(&self, other: &Span) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }

    pub const fn range(&self) -> Range<usize> {
        self.begin..self.end
    }

    /// The slice of `text` covered by this span, or `None` if it doesn't fit.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.range())
    }
}

impl Debug for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.begin, self.end)
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// A value found by a scanner together with the span of text that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Capture<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Capture<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Capture<U> {
        Capture {
            value: f(self.value),
            span: self.span,
        }
    }

    pub fn into_parts(self) -> (T, Span) {
        (self.value, self.span)
    }
}
