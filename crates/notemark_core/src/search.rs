//! Substring search and match highlighting.
//!
//! # Responsibility
//! - Decide which notes match a search query.
//! - Locate query occurrences in display text for highlight rendering.
//! - Derive the truncated list snippet from note content.
//!
//! # Invariants
//! - Matching is case-insensitive substring containment over title and
//!   content; there is no tokenization or ranking.
//! - Query text is treated literally: regex metacharacters never reach the
//!   match pattern unescaped.

use crate::model::note::Note;
use regex::{Regex, RegexBuilder};

/// Maximum snippet length in characters before truncation.
pub const SNIPPET_MAX_CHARS: usize = 100;

/// One segment of highlighted display text, in byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub is_match: bool,
}

/// Returns whether the note's title or content contains `query`
/// case-insensitively. Blank queries match everything.
pub fn query_matches(note: &Note, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    note.title.to_lowercase().contains(&needle) || note.content.to_lowercase().contains(&needle)
}

/// Splits `text` into plain and matching spans for the given query.
///
/// Returns a single plain span covering the whole text when the query is
/// blank or does not compile (the latter cannot happen for escaped input,
/// but the fallback keeps display rendering total).
pub fn highlight_spans(text: &str, query: &str) -> Vec<HighlightSpan> {
    let whole = vec![HighlightSpan {
        start: 0,
        end: text.len(),
        is_match: false,
    }];

    let Some(pattern) = query_pattern(query) else {
        return whole;
    };

    let mut spans = Vec::new();
    let mut cursor = 0;
    for found in pattern.find_iter(text) {
        if found.start() > cursor {
            spans.push(HighlightSpan {
                start: cursor,
                end: found.start(),
                is_match: false,
            });
        }
        spans.push(HighlightSpan {
            start: found.start(),
            end: found.end(),
            is_match: true,
        });
        cursor = found.end();
    }

    if spans.is_empty() {
        return whole;
    }
    if cursor < text.len() {
        spans.push(HighlightSpan {
            start: cursor,
            end: text.len(),
            is_match: false,
        });
    }
    spans
}

/// Wraps every query occurrence in `text` with the given markers.
pub fn wrap_matches(text: &str, query: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for span in highlight_spans(text, query) {
        if span.is_match {
            out.push_str(open);
            out.push_str(&text[span.start..span.end]);
            out.push_str(close);
        } else {
            out.push_str(&text[span.start..span.end]);
        }
    }
    out
}

/// Derives the list snippet: the first [`SNIPPET_MAX_CHARS`] characters of
/// content, with `...` appended when truncated.
pub fn snippet(content: &str) -> String {
    let mut out: String = content.chars().take(SNIPPET_MAX_CHARS).collect();
    if content.chars().count() > SNIPPET_MAX_CHARS {
        out.push_str("...");
    }
    out
}

fn query_pattern(query: &str) -> Option<Regex> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(trimmed))
        .case_insensitive(true)
        .build()
        .ok()
}
