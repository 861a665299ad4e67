//! Document title detection.
//!
//! The metadata `Title` entry wins when present. Otherwise the first pages are
//! scanned for the most visually dominant phrase near the top of the page.

use log::debug;

use crate::config::OutlineConfig;
use crate::grouping::group_spans;
use crate::layout::{DocumentSource, Page};
use crate::lexicon::title_exclusion;
use crate::normalize::collapse_whitespace;
use crate::types::{SpanGroup, TextSpan, TitleResult, TitleSource};

/// Metadata titles must be longer than this to be trusted.
const METADATA_MIN_CHARS: usize = 3;
/// Raw spans shorter than this (trimmed) are ignored.
const SPAN_MIN_CHARS: usize = 3;
/// Candidates must start within this fraction of the page height.
const TOP_REGION: f32 = 0.4;
/// Candidates must be set at this fraction of the page's largest size.
const DOMINANT_SIZE_RATIO: f32 = 0.9;
const MIN_WORDS: usize = 2;
const MIN_CHARS: usize = 8;

const STRAY_QUOTES: &[char] = &['"', '\u{201C}', '\u{201D}'];

/// Detect the title of `source`.
pub fn extract_title(source: &dyn DocumentSource, config: &OutlineConfig) -> TitleResult {
    if source.page_count() == 0 {
        return TitleResult::none();
    }

    if let Some(title) = source.metadata_title() {
        let title = title.trim();
        if title.chars().count() > METADATA_MIN_CHARS {
            return TitleResult::new(title, TitleSource::Metadata);
        }
    }

    let scan = source.page_count().min(config.title_scan_pages);
    for index in 0..scan {
        let page = match source.load_page(index) {
            Ok(page) => page,
            Err(e) => {
                debug!("skipping page {} in title scan: {}", index + 1, e);
                continue;
            }
        };

        if let Some(title) = title_from_page(&page, config) {
            return TitleResult::new(title, TitleSource::Heuristic);
        }
    }

    TitleResult::none()
}

/// Spans of `page` eligible for title grouping, in the grouper's shape.
fn title_spans(page: &Page) -> Vec<TextSpan> {
    page.spans()
        .filter_map(|span| {
            let text = span.text.trim();
            if text.chars().count() < SPAN_MIN_CHARS {
                return None;
            }
            Some(TextSpan {
                text: text.to_string(),
                x: span.bbox.x0,
                y: span.bbox.y0,
                font_size: span.size,
                bold: span.is_bold(),
                bbox: span.bbox,
            })
        })
        .collect()
}

fn is_candidate(group: &SpanGroup, page_height: f32, max_size: f32) -> bool {
    group.y < page_height * TOP_REGION
        && group.font_size >= max_size * DOMINANT_SIZE_RATIO
        && !title_exclusion().is_match(&group.text)
        && group.text.split_whitespace().count() >= MIN_WORDS
        && group.text.chars().count() >= MIN_CHARS
}

fn has_hint(text: &str, hints: &[String]) -> bool {
    let lower = text.to_lowercase();
    hints.iter().any(|h| lower.contains(h.as_str()))
}

/// Best title candidate on one page, already cleaned.
fn title_from_page(page: &Page, config: &OutlineConfig) -> Option<String> {
    let spans = title_spans(page);
    if spans.is_empty() {
        return None;
    }

    let max_size = spans
        .iter()
        .map(|s| s.font_size)
        .fold(f32::NEG_INFINITY, f32::max);

    let mut candidates: Vec<SpanGroup> =
        group_spans(&spans, config.line_threshold, config.word_threshold)
            .into_iter()
            .filter(|g| is_candidate(g, page.height, max_size))
            .filter(|g| g.font_size == max_size || has_hint(&g.text, &config.title_hints))
            .collect();

    candidates.sort_by(|a, b| {
        b.font_size
            .total_cmp(&a.font_size)
            .then(a.y.total_cmp(&b.y))
    });

    let best = candidates.into_iter().next()?;
    let title = clean_title(&best.text, &config.title_prefixes);
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Collapse whitespace, drop stray quotes and strip boilerplate prefixes.
pub fn clean_title(text: &str, prefixes: &[String]) -> String {
    let mut title: String = collapse_whitespace(text)
        .chars()
        .filter(|c| !STRAY_QUOTES.contains(c))
        .collect();

    for prefix in prefixes {
        if let Some(rest) = title.strip_prefix(prefix.as_str()) {
            title = rest.to_string();
        }
    }

    title.trim().to_string()
}
