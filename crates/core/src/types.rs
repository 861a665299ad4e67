use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::layout::BBox;

/// Coarse script family used to pick a normalization mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Arabic,
    Hebrew,
    Latin,
    Unknown,
}

impl Script {
    /// Right-to-left scripts get their directional control marks stripped.
    pub fn is_rtl(&self) -> bool {
        matches!(self, Script::Arabic | Script::Hebrew)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Script::Arabic => write!(f, "arabic"),
            Script::Hebrew => write!(f, "hebrew"),
            Script::Latin => write!(f, "latin"),
            Script::Unknown => write!(f, "unknown"),
        }
    }
}

/// A positioned, styled span as seen by the title extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub bold: bool,
    pub bbox: BBox,
}

/// Spans merged because they sit on the same visual line or phrase.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanGroup {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub bold: bool,
    pub bbox: BBox,
}

/// Font statistics sampled from the first pages of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Median size of spans long enough to be prose.
    pub body_size: f32,
    /// Font ratio at or above which a line counts as "large".
    pub large_font_threshold: f32,
    /// Font ratio at or above which a line counts as "medium".
    pub medium_font_threshold: f32,
    pub avg_text_length: f32,
    /// Top distinct sizes, descending. Diagnostics only.
    pub font_sizes: Vec<f32>,
}

/// Where a detected title came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleSource {
    Metadata,
    Heuristic,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleResult {
    pub title: String,
    /// Normalized fragments used for duplicate suppression.
    pub components: BTreeSet<String>,
    pub source: TitleSource,
}

impl TitleResult {
    pub fn new(title: impl Into<String>, source: TitleSource) -> Self {
        let title = title.into();
        let components = BTreeSet::from([title.clone()]);
        Self {
            title,
            components,
            source,
        }
    }

    pub fn none() -> Self {
        Self {
            title: String::new(),
            components: BTreeSet::new(),
            source: TitleSource::None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Numeric depth, 1 for `H1`.
    pub fn depth(&self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.depth())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingEntry {
    pub level: HeadingLevel,
    pub text: String,
    /// 1-based page number.
    pub page: usize,
}

/// The per-document output record. Field names and order are part of the
/// output format consumed downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineResult {
    pub title: String,
    pub outline: Vec<HeadingEntry>,
}

impl OutlineResult {
    /// The record emitted for a document that could not be processed.
    pub fn empty() -> Self {
        Self {
            title: String::new(),
            outline: Vec::new(),
        }
    }
}
