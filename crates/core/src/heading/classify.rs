//! Heading level assignment.
//!
//! Lexical numbering wins over typography. Lines without a recognised
//! numbering pattern fall through to font-ratio tiers.

use std::sync::OnceLock;

use regex::Regex;

use crate::stats::{DEFAULT_LARGE_THRESHOLD, DEFAULT_MEDIUM_THRESHOLD};
use crate::types::{DocumentStats, HeadingLevel};

/// A bold line qualifies for a tier at this fraction of the tier's ratio.
const BOLD_DISCOUNT: f32 = 0.9;

/// Numbered items longer than this read like list entries.
const NUMBERED_MAX_WORDS: usize = 8;
/// Numbered items this short are top-level sections.
const NUMBERED_H1_MAX_WORDS: usize = 5;

/// Ratios used when only a body size is known.
const STANDARD_H1_RATIO: f32 = 1.5;
const STANDARD_H1_BOLD_RATIO: f32 = 1.3;
const STANDARD_H2_RATIO: f32 = 1.2;
const STANDARD_H2_BOLD_RATIO: f32 = 1.1;

/// Point sizes used when no body size is known at all.
const ABSOLUTE_H1_SIZE: f32 = 14.0;
const ABSOLUTE_H2_SIZE: f32 = 12.0;

fn chapter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(Chapter|Section|Part|Round)\s+\d+").unwrap())
}

fn numbered_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\s+[A-Z]").unwrap())
}

fn subsection_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\d+\s+[A-Z]").unwrap())
}

fn subsubsection_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\d+\.\d+\s+").unwrap())
}

/// Words marking a numbered line as a worked example or list entry.
fn list_entry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(sample|provided|working|git|dockerfile|solution)\b").unwrap()
    })
}

/// Level implied by the line's numbering alone, if any.
pub fn classify_by_pattern(text: &str) -> Option<HeadingLevel> {
    if chapter_re().is_match(text) {
        return Some(HeadingLevel::H1);
    }

    if numbered_item_re().is_match(text) {
        let word_count = text.split_whitespace().count();
        let ends_with_period = text.ends_with('.');

        let prose_like = word_count > NUMBERED_MAX_WORDS
            || text.matches(',').count() > 1
            || ends_with_period
            || list_entry_re().is_match(text);
        if prose_like {
            return Some(HeadingLevel::H3);
        }

        if word_count <= NUMBERED_H1_MAX_WORDS {
            return Some(HeadingLevel::H1);
        }
        return Some(HeadingLevel::H2);
    }

    if subsection_re().is_match(text) {
        return Some(HeadingLevel::H2);
    }

    if subsubsection_re().is_match(text) {
        return Some(HeadingLevel::H3);
    }

    None
}

fn tier(ratio: f32, bold: bool, full: f32, with_bold: f32) -> bool {
    ratio >= full || (bold && ratio >= with_bold)
}

fn usable(threshold: f32, fallback: f32) -> f32 {
    if threshold.is_finite() && threshold > 0.0 {
        threshold
    } else {
        fallback
    }
}

/// Level implied by typography alone.
pub fn classify_by_font(
    font_size: f32,
    bold: bool,
    body_size: f32,
    stats: Option<&DocumentStats>,
) -> HeadingLevel {
    if body_size > 0.0 {
        let ratio = font_size / body_size;

        let (h1, h1_bold, h2, h2_bold) = match stats {
            Some(s) => {
                let large = usable(s.large_font_threshold, DEFAULT_LARGE_THRESHOLD);
                let medium = usable(s.medium_font_threshold, DEFAULT_MEDIUM_THRESHOLD);
                (
                    large,
                    large * BOLD_DISCOUNT,
                    medium,
                    medium * BOLD_DISCOUNT,
                )
            }
            None => (
                STANDARD_H1_RATIO,
                STANDARD_H1_BOLD_RATIO,
                STANDARD_H2_RATIO,
                STANDARD_H2_BOLD_RATIO,
            ),
        };

        return if tier(ratio, bold, h1, h1_bold) {
            HeadingLevel::H1
        } else if tier(ratio, bold, h2, h2_bold) {
            HeadingLevel::H2
        } else {
            HeadingLevel::H3
        };
    }

    if bold && font_size >= ABSOLUTE_H1_SIZE {
        HeadingLevel::H1
    } else if bold || font_size >= ABSOLUTE_H2_SIZE {
        HeadingLevel::H2
    } else {
        HeadingLevel::H3
    }
}

/// Assign a level to a line already accepted as a heading.
pub fn classify_level(
    text: &str,
    font_size: f32,
    bold: bool,
    body_size: f32,
    stats: Option<&DocumentStats>,
) -> HeadingLevel {
    classify_by_pattern(text).unwrap_or_else(|| classify_by_font(font_size, bold, body_size, stats))
}
