//! Per-document orchestration: title, statistics, script, then headings page
//! by page.

use log::{debug, warn};
use serde::Serialize;

use crate::config::OutlineConfig;
use crate::heading::{classify_level, is_valid_heading};
use crate::layout::{DocumentSource, Line};
use crate::membership::is_part_of_title;
use crate::normalize::{detect_script, normalize};
use crate::stats::analyze;
use crate::types::{DocumentStats, HeadingEntry, OutlineResult, Script, TitleResult};
use crate::title::extract_title;

/// One physical line reduced to the features the heading heuristics use.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub font_size: f32,
    pub bold: bool,
}

impl TextLine {
    /// Join the non-blank spans of `line`. Returns `None` when every span is
    /// blank.
    pub fn from_line(line: &Line) -> Option<Self> {
        let mut parts: Vec<&str> = Vec::new();
        let mut font_size: f32 = 0.0;
        let mut bold = false;

        for span in line.spans.iter().filter(|s| !s.text.trim().is_empty()) {
            parts.push(&span.text);
            font_size = font_size.max(span.size);
            bold |= span.is_bold();
        }

        if parts.is_empty() {
            return None;
        }

        Some(Self {
            text: parts.join(" ").trim().to_string(),
            font_size,
            bold,
        })
    }
}

/// Concatenate the head of each of the first pages for script detection.
fn script_sample(source: &dyn DocumentSource, config: &OutlineConfig) -> String {
    let count = source.page_count().min(config.script_sample_pages);
    let mut sample = String::new();
    for index in 0..count {
        match source.load_page(index) {
            Ok(page) => sample.extend(page.plain_text().chars().take(config.script_sample_chars)),
            Err(e) => debug!("skipping page {} in script sample: {}", index + 1, e),
        }
    }
    sample
}

/// Infer the outline of `source`.
///
/// Page failures are logged and the page contributes nothing; this function
/// itself never fails.
pub fn build_outline(source: &dyn DocumentSource, config: &OutlineConfig) -> OutlineResult {
    let page_count = source.page_count();
    if page_count > config.max_pages {
        warn!(
            "document has {} pages, processing first {} only",
            page_count, config.max_pages
        );
    }

    let title = extract_title(source, config);
    let stats = analyze(source, config.stats_sample_pages);
    let script = detect_script(&script_sample(source, config));
    debug!(
        "title {:?} ({:?}), body size {}, script {}",
        title.title, title.source, stats.body_size, script
    );

    let mut outline = Vec::new();
    for index in 0..page_count.min(config.max_pages) {
        let page = match source.load_page(index) {
            Ok(page) => page,
            Err(e) => {
                debug!("skipping page {}: {}", index + 1, e);
                continue;
            }
        };

        for line in page.lines().filter_map(TextLine::from_line) {
            if let Some(entry) = heading_entry(&line, index + 1, &title, &stats, script) {
                outline.push(entry);
            }
        }
    }

    OutlineResult {
        title: title.title,
        outline,
    }
}

fn heading_entry(
    line: &TextLine,
    page: usize,
    title: &TitleResult,
    stats: &DocumentStats,
    script: Script,
) -> Option<HeadingEntry> {
    if is_part_of_title(&line.text, &title.title, &title.components) {
        return None;
    }

    if !is_valid_heading(
        &line.text,
        line.font_size,
        line.bold,
        stats.body_size,
        script,
        Some(stats),
    ) {
        return None;
    }

    let level = classify_level(
        &line.text,
        line.font_size,
        line.bold,
        stats.body_size,
        Some(stats),
    );

    Some(HeadingEntry {
        level,
        text: normalize(&line.text, script),
        page,
    })
}

/// Diagnostics for one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentReport {
    pub page_count: usize,
    pub stats: DocumentStats,
    pub script: Script,
    pub title: TitleResult,
}

/// Run the document-level analyzers without building the outline.
pub fn inspect(source: &dyn DocumentSource, config: &OutlineConfig) -> DocumentReport {
    DocumentReport {
        page_count: source.page_count(),
        stats: analyze(source, config.stats_sample_pages),
        script: detect_script(&script_sample(source, config)),
        title: extract_title(source, config),
    }
}
