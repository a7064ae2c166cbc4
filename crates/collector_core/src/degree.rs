use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::Degree;

/// Characters of context taken on each side of a degree mention.
pub const CONTEXT_WINDOW: usize = 50;

const REQUIRED_HINTS: &[&str] = &[
    "require",
    "required",
    "must",
    "minimum",
    "at least",
    "need",
    "looking for",
];

const PREFERRED_HINTS: &[&str] = &[
    "prefer",
    "preferred",
    "advantage",
    "nice to have",
    "plus",
    "bonus",
];

static DEGREE_PATTERNS: LazyLock<[(Degree, Regex); 3]> = LazyLock::new(|| {
    [
        (
            Degree::Bachelor,
            compile(r"(?i)\b(b\.?\s*sc|b\.?\s*s\.?|b\.?\s*a\.?|bachelor'?s?)\b"),
        ),
        (Degree::Master, compile(r"(?i)\b(m\.?\s*sc|m\.?\s*s\.?|master'?s?)\b")),
        (Degree::PhD, compile(r"(?i)\b(ph\.?\s*d\.?|doctorate|doctoral)\b")),
    ]
});

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static degree pattern")
}

/// How strongly the text around a degree mention asks for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextTier {
    Required,
    Neutral,
    Preferred,
}

impl ContextTier {
    /// Order in which tiers are consulted when resolving a degree.
    pub const PRECEDENCE: [ContextTier; 3] = [
        ContextTier::Required,
        ContextTier::Neutral,
        ContextTier::Preferred,
    ];
}

/// Classifies the lowercase window around `span` (byte range of a match in `text`).
pub fn classify_context(text: &str, span: Range<usize>) -> ContextTier {
    let window = context_window(text, span).to_lowercase();
    if REQUIRED_HINTS.iter().any(|hint| window.contains(hint)) {
        ContextTier::Required
    } else if PREFERRED_HINTS.iter().any(|hint| window.contains(hint)) {
        ContextTier::Preferred
    } else {
        ContextTier::Neutral
    }
}

fn context_window(text: &str, span: Range<usize>) -> &str {
    let start = text[..span.start]
        .char_indices()
        .rev()
        .take(CONTEXT_WINDOW)
        .last()
        .map_or(span.start, |(idx, _)| idx);
    let end = text[span.end..]
        .char_indices()
        .nth(CONTEXT_WINDOW)
        .map_or(text.len(), |(idx, _)| span.end + idx);
    &text[start..end]
}

/// Infers the degree a description asks for.
///
/// Every mention is tiered by its context; the first non-empty tier in
/// [`ContextTier::PRECEDENCE`] decides, and within it the most permissive
/// degree wins.
pub fn extract_degree(text: &str) -> Degree {
    let mentions: Vec<(Degree, ContextTier)> = DEGREE_PATTERNS
        .iter()
        .flat_map(|(degree, pattern)| {
            pattern
                .find_iter(text)
                .map(move |found| (*degree, classify_context(text, found.range())))
        })
        .collect();

    ContextTier::PRECEDENCE
        .iter()
        .find_map(|tier| {
            mentions
                .iter()
                .filter(|(_, found_tier)| found_tier == tier)
                .map(|(degree, _)| *degree)
                .min_by_key(|degree| degree.rank())
        })
        .unwrap_or(Degree::NotSpecified)
}
