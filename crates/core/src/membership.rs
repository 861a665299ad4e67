//! Title duplicate suppression.
//!
//! A detected title usually appears again as the largest line on page 1. This
//! module decides whether an outline candidate is that repetition.

use std::collections::BTreeSet;

use crate::normalize::collapse_whitespace;

/// Candidates shorter than this are only suppressed on an exact match.
const PARTIAL_MIN_CHARS: usize = 8;
/// A candidate inside the title must cover this share of the title.
const CANDIDATE_IN_TITLE_RATIO: f32 = 0.4;
/// A title inside the candidate must cover this share of the candidate.
const TITLE_IN_CANDIDATE_RATIO: f32 = 0.6;

fn fold(text: &str) -> String {
    collapse_whitespace(text).to_lowercase()
}

fn covers(part: &str, whole: &str, ratio: f32) -> bool {
    whole.contains(part) && part.chars().count() as f32 >= whole.chars().count() as f32 * ratio
}

/// Whether `text` repeats the document title or one of its components.
pub fn is_part_of_title(text: &str, title: &str, components: &BTreeSet<String>) -> bool {
    let text = fold(text);
    let title = fold(title);
    if text.is_empty() || title.is_empty() {
        return false;
    }

    if text == title || components.iter().any(|c| fold(c) == text) {
        return true;
    }

    if text.chars().count() >= PARTIAL_MIN_CHARS {
        return covers(&text, &title, CANDIDATE_IN_TITLE_RATIO)
            || covers(&title, &text, TITLE_IN_CANDIDATE_RATIO);
    }

    false
}
