//! Per-document font statistics.
//!
//! Heading sizes are judged relative to the body size of the document itself,
//! so the thresholds here are ratios, not points.

use log::debug;

use crate::layout::{DocumentSource, Page};
use crate::types::DocumentStats;

/// Body size assumed when no span is long enough to be prose.
pub const DEFAULT_BODY_SIZE: f32 = 12.0;
pub const DEFAULT_LARGE_THRESHOLD: f32 = 1.5;
pub const DEFAULT_MEDIUM_THRESHOLD: f32 = 1.2;
pub const DEFAULT_AVG_TEXT_LENGTH: f32 = 50.0;

/// Floors for the adaptive thresholds.
const MIN_LARGE_THRESHOLD: f32 = 1.4;
const MIN_MEDIUM_THRESHOLD: f32 = 1.2;

/// Adaptive thresholds sit just under the observed size ratios.
const THRESHOLD_DISCOUNT: f32 = 0.9;

/// Spans with more trimmed characters than this count as body text.
const BODY_MIN_CHARS: usize = 10;

/// Number of distinct sizes kept for diagnostics.
const TOP_SIZES: usize = 5;

impl Default for DocumentStats {
    fn default() -> Self {
        Self {
            body_size: DEFAULT_BODY_SIZE,
            large_font_threshold: DEFAULT_LARGE_THRESHOLD,
            medium_font_threshold: DEFAULT_MEDIUM_THRESHOLD,
            avg_text_length: DEFAULT_AVG_TEXT_LENGTH,
            font_sizes: Vec::new(),
        }
    }
}

/// Sample the first `sample_pages` pages of `source` and derive statistics.
///
/// Pages that fail to extract contribute nothing.
pub fn analyze(source: &dyn DocumentSource, sample_pages: usize) -> DocumentStats {
    let count = source.page_count().min(sample_pages);
    let pages: Vec<Page> = (0..count)
        .filter_map(|i| match source.load_page(i) {
            Ok(page) => Some(page),
            Err(e) => {
                debug!("skipping page {} in font analysis: {}", i + 1, e);
                None
            }
        })
        .collect();

    analyze_pages(&pages)
}

/// Derive statistics from already extracted pages.
pub fn analyze_pages(pages: &[Page]) -> DocumentStats {
    let mut all_sizes: Vec<f32> = Vec::new();
    let mut body_sizes: Vec<f32> = Vec::new();
    let mut lengths: Vec<usize> = Vec::new();

    for span in pages.iter().flat_map(|p| p.spans()) {
        all_sizes.push(span.size);

        let len = span.text.trim().chars().count();
        if len > BODY_MIN_CHARS {
            body_sizes.push(span.size);
            lengths.push(len);
        }
    }

    let mut distinct = all_sizes;
    distinct.sort_by(|a, b| b.total_cmp(a));
    distinct.dedup();
    let font_sizes: Vec<f32> = distinct.iter().take(TOP_SIZES).copied().collect();

    if body_sizes.is_empty() {
        return DocumentStats {
            font_sizes,
            ..DocumentStats::default()
        };
    }

    body_sizes.sort_by(|a, b| a.total_cmp(b));
    // Upper median for even counts.
    let body_size = body_sizes[body_sizes.len() / 2];

    let (large_font_threshold, medium_font_threshold) = if distinct.len() >= 3 && body_size > 0.0 {
        let largest = distinct[0];
        let second = distinct[1];
        (
            MIN_LARGE_THRESHOLD.max(largest / body_size * THRESHOLD_DISCOUNT),
            MIN_MEDIUM_THRESHOLD.max(second / body_size * THRESHOLD_DISCOUNT),
        )
    } else {
        (DEFAULT_LARGE_THRESHOLD, DEFAULT_MEDIUM_THRESHOLD)
    };

    let avg_text_length = lengths.iter().sum::<usize>() as f32 / lengths.len() as f32;

    DocumentStats {
        body_size,
        large_font_threshold,
        medium_font_threshold,
        avg_text_length,
        font_sizes,
    }
}
