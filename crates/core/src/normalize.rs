use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::types::Script;

/// Texts shorter than this (after trimming) are too short to classify.
const MIN_DETECTION_CHARS: usize = 10;

fn single_char(c: char, re: &Regex) -> bool {
    let mut buf = [0u8; 4];
    re.is_match(c.encode_utf8(&mut buf))
}

fn is_arabic(c: char) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^\p{Arabic}$").unwrap());
    ('\u{0600}'..='\u{06FF}').contains(&c) || single_char(c, re)
}

fn is_hebrew(c: char) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^\p{Hebrew}$").unwrap());
    ('\u{0590}'..='\u{05FF}').contains(&c) || single_char(c, re)
}

/// Detect the dominant script family of `text`.
///
/// The first Arabic or Hebrew character decides; text without either is
/// Latin. Whitespace and digits are skipped.
pub fn detect_script(text: &str) -> Script {
    if text.trim().chars().count() < MIN_DETECTION_CHARS {
        return Script::Unknown;
    }

    for c in text.chars() {
        if c.is_whitespace() || c.is_numeric() {
            continue;
        }
        if is_arabic(c) {
            return Script::Arabic;
        }
        if is_hebrew(c) {
            return Script::Hebrew;
        }
    }

    Script::Latin
}

/// Canonicalize `text` for comparison and output.
///
/// Strips bidi control marks for right-to-left scripts, applies NFC, then
/// collapses whitespace runs to a single space and trims. Idempotent.
pub fn normalize(text: &str, script: Script) -> String {
    if text.is_empty() {
        return String::new();
    }

    let stripped: String = if script.is_rtl() {
        text.chars().filter(|c| !is_bidi_control(*c)).collect()
    } else {
        text.to_string()
    };

    let composed: String = stripped.nfc().collect();
    collapse_whitespace(&composed)
}

/// Collapse every whitespace run to one space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// LRM, RLM and the embedding/override controls U+202A..=U+202E.
fn is_bidi_control(c: char) -> bool {
    matches!(c, '\u{200E}' | '\u{200F}' | '\u{202A}'..='\u{202E}')
}
