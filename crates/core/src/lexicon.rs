//! Read-only word lists and exclusion patterns shared by the heuristics.
//!
//! Every pattern is compiled once on first use and never mutated. Patterns
//! are kept as independent named entries so each one can be tested, added or
//! removed on its own.

use std::sync::OnceLock;

use regex::Regex;

/// Keywords whose presence suggests a structural heading.
pub const SEMANTIC_KEYWORDS: &[&str] = &[
    "introduction",
    "conclusion",
    "summary",
    "overview",
    "background",
    "methodology",
    "results",
    "discussion",
    "references",
    "appendix",
    "chapter",
    "section",
    "part",
    "goals",
    "objectives",
];

/// Lines consisting of only one of these words are never headings.
pub const STOPWORDS: &[&str] = &[
    "the", "and", "or", "of", "in", "on", "at", "to", "for", "with", "by",
];

/// A named, case-insensitive pattern.
#[derive(Debug)]
pub struct Pattern {
    pub name: &'static str,
    pub regex: Regex,
}

impl Pattern {
    fn new(name: &'static str, pattern: &str) -> Self {
        Pattern {
            name,
            regex: Regex::new(&format!("(?i){pattern}")).unwrap(),
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Patterns for lines that look like headings typographically but are page
/// furniture, contact details, form fields or list items.
pub fn heading_exclusions() -> &'static [Pattern] {
    static PATTERNS: OnceLock<Vec<Pattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            Pattern::new("contact", r"(address|phone|email|www\.|\.com|http)"),
            Pattern::new(
                "street_address",
                r"\d+\s+\w*\s*(street|ave|road|blvd|parkway|way|drive|lane)",
            ),
            Pattern::new(
                "street_address_upper",
                r"^\d{3,5}\s+[A-Z]+\s*(PARKWAY|STREET|AVE|ROAD|BLVD)",
            ),
            Pattern::new("postal_code", r"^[A-Z]{2}\s+\d{5}"),
            Pattern::new("phone_number", r"^\(\d{3}\)\s*\d{3}-\d{4}"),
            Pattern::new("form_field", r"(rsvp|fill|sign|date|name).*[-_]{3,}"),
            Pattern::new("directional", r"^(near|on the|in the)\s+"),
            Pattern::new(
                "duration",
                r"^\d+\s+(pages?|minutes?|hours?|days?|months?|years?)$",
            ),
            Pattern::new("reference", r"^(page|figure|table|chart|diagram)\s+\d+"),
            Pattern::new("currency_or_percent", r"^\d+\s*[%$€£¥]"),
            Pattern::new("short_code", r"^[A-Z]{2,}\s*\d+$"),
            Pattern::new(
                "table_header",
                r"^(criteria|max|points|total|description|constraint|requirement)$",
            ),
            Pattern::new("parenthesized_word", r"^\w+\)$"),
            Pattern::new(
                "boilerplate_section",
                r"^(why this matters|the journey ahead|your mission)$",
            ),
            Pattern::new("article_list_item", r"^\d+\.\s+(a|an|the)\s+"),
            Pattern::new("sample_list_item", r"^\d+\.\s+sample\s+"),
            Pattern::new("git_repository", r"[\w-]+\.git$"),
        ]
    })
}

/// Return the name of the first exclusion pattern matching `text`.
pub fn matching_exclusion(text: &str) -> Option<&'static str> {
    heading_exclusions()
        .iter()
        .find(|p| p.is_match(text))
        .map(|p| p.name)
}

/// Page furniture that can never be a document title.
pub fn title_exclusion() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(Page|Chapter|\d+\.?$|Table|Figure|Copyright|©)").unwrap()
    })
}

/// Whether `text` is, case-insensitively, exactly one stopword.
pub fn is_stopword(text: &str) -> bool {
    let lower = text.to_lowercase();
    STOPWORDS.iter().any(|w| *w == lower)
}

/// Whether the lowercase `text` contains a semantic keyword.
pub fn has_semantic_keyword(lowercase_text: &str) -> bool {
    SEMANTIC_KEYWORDS
        .iter()
        .any(|k| lowercase_text.contains(k))
}
