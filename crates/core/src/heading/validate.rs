//! Score-based heading validation.
//!
//! A line is first screened by hard rejections (length, stopwords, the
//! exclusion patterns in [`crate::lexicon`], prose shape). Survivors are
//! scored on lexical ("content") and typographic ("font") features and
//! accepted when the combined score reaches a length-dependent bar.

use std::sync::OnceLock;

use log::trace;
use regex::Regex;

use super::font_ratio;
use crate::lexicon;
use crate::normalize::normalize;
use crate::types::{DocumentStats, Script};

const MIN_CHARS: usize = 3;
const MAX_CHARS: usize = 200;

/// Lines with more words than this are prose unless they are numbered.
const MAX_WORDS: usize = 15;

/// Maximum share of `.,;:!?` among all characters.
const MAX_PUNCTUATION_RATIO: f32 = 0.1;

/// Title-case lines only score when they are this short.
const TITLE_CASE_MAX_WORDS: usize = 8;

/// Thresholds used when the caller supplies no document statistics.
const FALLBACK_LARGE_THRESHOLD: f32 = 1.3;
const FALLBACK_MEDIUM_THRESHOLD: f32 = 1.2;

const CHAPTER_WEIGHT: u32 = 6;
const NUMBERED_WEIGHT: u32 = 4;
const KEYWORD_WEIGHT: u32 = 3;
const TITLE_CASE_WEIGHT: u32 = 2;
const ALL_CAPS_WEIGHT: u32 = 2;
const CAPITAL_WEIGHT: u32 = 1;

const LARGE_FONT_WEIGHT: u32 = 4;
const NOTABLE_FONT_WEIGHT: u32 = 3;
const BOLD_WEIGHT: u32 = 2;

/// Why a line was rejected before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Length,
    Stopword,
    /// Name of the matching exclusion pattern.
    Excluded(&'static str),
    TooManyWords,
    DensePunctuation,
}

/// Named inputs to the weighted score.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingFeatures {
    pub word_count: usize,
    pub has_chapter_pattern: bool,
    pub has_numbered_section: bool,
    pub has_semantic_keyword: bool,
    pub is_title_case: bool,
    pub is_all_caps: bool,
    pub starts_with_capital: bool,
    pub font_ratio: f32,
    pub is_large_font: bool,
    pub is_notable_font: bool,
    pub is_bold: bool,
}

impl HeadingFeatures {
    pub fn extract(
        text: &str,
        font_size: f32,
        bold: bool,
        body_size: f32,
        script: Script,
        stats: Option<&DocumentStats>,
    ) -> Self {
        let word_count = text.split_whitespace().count();
        let char_count = text.chars().count();
        let lowered = normalize(text, script).to_lowercase();

        let (large, medium) = stats
            .map(|s| (s.large_font_threshold, s.medium_font_threshold))
            .unwrap_or((FALLBACK_LARGE_THRESHOLD, FALLBACK_MEDIUM_THRESHOLD));
        let ratio = font_ratio(font_size, body_size);

        HeadingFeatures {
            word_count,
            has_chapter_pattern: chapter_re().is_match(text),
            has_numbered_section: numbered_re().is_match(text),
            has_semantic_keyword: lexicon::has_semantic_keyword(&lowered),
            is_title_case: is_title_case(text) && word_count <= TITLE_CASE_MAX_WORDS,
            is_all_caps: is_all_caps(text) && char_count > 3 && char_count < 50,
            starts_with_capital: text.chars().next().is_some_and(|c| c.is_uppercase()),
            font_ratio: ratio,
            is_large_font: ratio >= large,
            is_notable_font: ratio >= medium && bold,
            is_bold: bold,
        }
    }

    pub fn content_score(&self) -> u32 {
        weight(self.has_chapter_pattern, CHAPTER_WEIGHT)
            + weight(self.has_numbered_section, NUMBERED_WEIGHT)
            + weight(self.has_semantic_keyword, KEYWORD_WEIGHT)
            + weight(self.is_title_case, TITLE_CASE_WEIGHT)
            + weight(self.is_all_caps, ALL_CAPS_WEIGHT)
            + weight(self.starts_with_capital, CAPITAL_WEIGHT)
    }

    pub fn font_score(&self) -> u32 {
        weight(self.is_large_font, LARGE_FONT_WEIGHT)
            + weight(self.is_notable_font, NOTABLE_FONT_WEIGHT)
            + weight(self.is_bold, BOLD_WEIGHT)
    }

    /// Longer lines need more evidence.
    pub fn required_score(&self) -> u32 {
        match self.word_count {
            0..=5 => 5,
            6..=10 => 6,
            _ => 7,
        }
    }
}

fn weight(flag: bool, w: u32) -> u32 {
    if flag {
        w
    } else {
        0
    }
}

/// Outcome of evaluating one line, with the intermediate values kept.
#[derive(Debug, Clone, PartialEq)]
pub enum HeadingVerdict {
    Rejected(Rejection),
    Scored {
        features: HeadingFeatures,
        content_score: u32,
        font_score: u32,
        required_score: u32,
    },
}

impl HeadingVerdict {
    pub fn is_accepted(&self) -> bool {
        match self {
            HeadingVerdict::Rejected(_) => false,
            HeadingVerdict::Scored {
                content_score,
                font_score,
                required_score,
                ..
            } => content_score + font_score >= *required_score,
        }
    }
}

fn chapter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(Chapter|Section|Part)\s+\d+").unwrap())
}

/// "1 ", "1. ", "1.1 ", "1.2.3. "
fn numbered_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+(\.\d+)*\.?\s+").unwrap())
}

fn numbered_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.").unwrap())
}

/// Title case: every cased run starts with an uppercase letter followed only
/// by lowercase letters, and at least one cased letter exists.
pub(crate) fn is_title_case(text: &str) -> bool {
    let mut cased = false;
    let mut prev_cased = false;
    for c in text.chars() {
        if c.is_uppercase() {
            if prev_cased {
                return false;
            }
            prev_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !prev_cased {
                return false;
            }
            prev_cased = true;
            cased = true;
        } else {
            prev_cased = false;
        }
    }
    cased
}

/// At least one uppercase letter and no lowercase ones.
pub(crate) fn is_all_caps(text: &str) -> bool {
    text.chars().any(|c| c.is_uppercase()) && !text.chars().any(|c| c.is_lowercase())
}

fn punctuation_ratio(text: &str) -> f32 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let punct = text.chars().filter(|c| ".,;:!?".contains(*c)).count();
    punct as f32 / total as f32
}

fn screen(text: &str) -> Option<Rejection> {
    let char_count = text.chars().count();
    if !(MIN_CHARS..=MAX_CHARS).contains(&char_count) {
        return Some(Rejection::Length);
    }
    if lexicon::is_stopword(text) {
        return Some(Rejection::Stopword);
    }
    if let Some(name) = lexicon::matching_exclusion(text) {
        return Some(Rejection::Excluded(name));
    }
    if text.split_whitespace().count() > MAX_WORDS && !numbered_item_re().is_match(text) {
        return Some(Rejection::TooManyWords);
    }
    if punctuation_ratio(text) > MAX_PUNCTUATION_RATIO {
        return Some(Rejection::DensePunctuation);
    }
    None
}

/// Screen and score `text` as a heading candidate.
pub fn evaluate_heading(
    text: &str,
    font_size: f32,
    bold: bool,
    body_size: f32,
    script: Script,
    stats: Option<&DocumentStats>,
) -> HeadingVerdict {
    if let Some(rejection) = screen(text) {
        return HeadingVerdict::Rejected(rejection);
    }

    let features = HeadingFeatures::extract(text, font_size, bold, body_size, script, stats);
    HeadingVerdict::Scored {
        content_score: features.content_score(),
        font_score: features.font_score(),
        required_score: features.required_score(),
        features,
    }
}

/// Whether `text`, set at `font_size`, qualifies as a heading.
pub fn is_valid_heading(
    text: &str,
    font_size: f32,
    bold: bool,
    body_size: f32,
    script: Script,
    stats: Option<&DocumentStats>,
) -> bool {
    let verdict = evaluate_heading(text, font_size, bold, body_size, script, stats);
    trace!("heading candidate {:?}: {:?}", text, verdict);
    verdict.is_accepted()
}
