//! Text extraction and line/block assembly.
//!
//! This module walks a page's content stream through a simplified PDF
//! text-state machine and rebuilds the `block -> line -> span` tree the
//! outline heuristics consume. Side effects (parsing, decompression) live
//! behind the [`PdfBackend`] trait provided by the caller.
//!
//! # Pipeline
//!
//! ```text
//! content ops  ->  RawSpan[]  ->  RawLine[]  ->  Block[]  ->  Page
//!   (per page)      extract        group_spans    group_lines  to_page
//! ```

use log::debug;
use pdfoutline_core::layout::{BBox, Block, Line, Page, Span};

use super::backend::{
    decode_text_simple, get_number_from_value, BackendFontInfo, PageBox, PageId, PdfBackend,
    PdfValue,
};
use crate::cleanup::clean_span_text;
use crate::PdfError;

// ---------------------------------------------------------------------------
// Intermediate types
// ---------------------------------------------------------------------------

/// A single run of text in PDF user space (origin bottom-left, `y` is the
/// baseline).
#[derive(Debug, Clone, PartialEq)]
pub struct RawSpan {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub font_size: f32,
    pub font_name: String,
}

/// Spans sharing (approximately) one baseline, left to right.
#[derive(Debug, Clone)]
pub struct RawLine {
    pub spans: Vec<RawSpan>,
    pub y: f32,
    pub font_size: f32,
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Two spans whose baselines differ by less than this share a line.
const Y_TOLERANCE: f32 = 1.0;

/// Approximate character width as a fraction of font size when no better
/// metric is available.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Minimum gap (in points) between adjacent fragments before a space is
/// inserted.
const MIN_WORD_GAP: f32 = 1.5;

/// A vertical gap larger than this multiple of the previous line's size
/// starts a new block.
const BLOCK_GAP_FACTOR: f32 = 1.4;

/// Fragments closer than this in size are considered the same font run.
const SAME_SIZE_EPSILON: f32 = 0.5;

/// Glyph box above and below the baseline, as fractions of the font size.
const ASCENT_RATIO: f32 = 0.8;
const DESCENT_RATIO: f32 = 0.2;

// ---------------------------------------------------------------------------
// Spaceless-script helper
// ---------------------------------------------------------------------------

/// Returns `true` if `c` belongs to a script that does not use inter-word
/// spaces (CJK ideographs, kana, Hangul, Thai).
pub fn is_spaceless_script_char(c: char) -> bool {
    matches!(
        c as u32,
        0x4E00..=0x9FFF
            | 0x3400..=0x4DBF
            | 0xF900..=0xFAFF
            | 0x3040..=0x30FF
            | 0xAC00..=0xD7AF
            | 0x3000..=0x303F
            | 0x0E00..=0x0E7F
    )
}

// ---------------------------------------------------------------------------
// Internal: PDF text-state machine
// ---------------------------------------------------------------------------

/// Mutable state tracked while walking a page's content stream.
#[derive(Debug, Clone)]
struct TextState {
    /// Current font resource name (the `/F1`-style key, not the full name).
    font_key: Vec<u8>,
    /// Resolved base-font name for the current font.
    font_name: String,
    font_size: f32,
    /// Elements [a, b, c, d, tx, ty] of the current text matrix.
    text_matrix: [f32; 6],
    /// Text line matrix, set by BT and updated by Td/TD/T*/Tm.
    line_matrix: [f32; 6],
    /// Horizontal scaling factor (percent / 100).
    horiz_scale: f32,
    char_spacing: f32,
    word_spacing: f32,
    text_rise: f32,
    leading: f32,
}

/// The identity 2x3 text matrix: [a, b, c, d, tx, ty].
const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 0.0,
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    fn x(&self) -> f32 {
        self.text_matrix[4]
    }

    fn y(&self) -> f32 {
        self.text_matrix[5]
    }

    /// Rendered size: `font_size * sqrt(b^2 + d^2)` of the text matrix.
    fn effective_font_size(&self) -> f32 {
        let scale = (self.text_matrix[1].powi(2) + self.text_matrix[3].powi(2)).sqrt();
        (self.font_size * scale).abs()
    }

    /// Horizontal scale of the text matrix, applied to estimated widths.
    fn matrix_x_scale(&self) -> f32 {
        (self.text_matrix[0].powi(2) + self.text_matrix[1].powi(2)).sqrt()
    }

    /// Advance the text matrix horizontally by `dx` text-space units.
    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    /// Multiply the text line matrix by a translation (used by Td / TD).
    fn translate_line(&mut self, tx: f32, ty: f32) {
        let new_tx = self.line_matrix[0] * tx + self.line_matrix[2] * ty + self.line_matrix[4];
        let new_ty = self.line_matrix[1] * tx + self.line_matrix[3] * ty + self.line_matrix[5];
        self.line_matrix[4] = new_tx;
        self.line_matrix[5] = new_ty;
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.translate_line(0.0, -self.leading);
    }
}

fn resolve_font<'a>(key: &[u8], fonts: &'a [BackendFontInfo]) -> Option<&'a BackendFontInfo> {
    fonts.iter().find(|info| info.name == key)
}

/// Estimated rendered width in user space. Glyph widths are not read, so
/// each character counts as half an em.
fn estimate_text_width(text: &str, state: &TextState) -> f32 {
    let n = text.chars().count() as f32;
    n * state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale * state.matrix_x_scale()
}

/// Advance the text matrix after rendering `text`.
fn advance_after_show(text: &str, state: &mut TextState) {
    let mut total_dx: f32 = 0.0;
    for ch in text.chars() {
        total_dx += state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale;
        total_dx += state.char_spacing;
        if ch == ' ' {
            total_dx += state.word_spacing;
        }
    }
    state.advance_x(total_dx);
}

fn decode_string(
    val: &PdfValue,
    backend: &dyn PdfBackend,
    page_id: PageId,
    font_key: &[u8],
) -> String {
    let PdfValue::Str(bytes) = val else {
        return String::new();
    };
    let decoded = backend.decode_text(page_id, font_key, bytes);
    let decoded = if decoded.is_empty() {
        decode_text_simple(bytes)
    } else {
        decoded
    };
    clean_span_text(&decoded)
}

// ---------------------------------------------------------------------------
// Public API: span extraction
// ---------------------------------------------------------------------------

/// Walk a single page's content stream and produce a flat list of
/// [`RawSpan`]s.
///
/// | Operator | Action |
/// |----------|--------|
/// | `BT`     | Begin text object, reset matrices |
/// | `Tf`     | Set font and size |
/// | `Tm`     | Set text matrix directly |
/// | `Td`     | Translate text position |
/// | `TD`     | Translate and set leading |
/// | `T*`     | Move to start of next line |
/// | `TL` `Tc` `Tw` `Tz` `Ts` | Leading, spacing, scaling, rise |
/// | `Tj`     | Show a string |
/// | `TJ`     | Show strings with kerning adjustments |
/// | `'` `"`  | Move to next line and show string |
pub fn extract_page_spans(
    backend: &dyn PdfBackend,
    page_id: PageId,
) -> Result<Vec<RawSpan>, PdfError> {
    let raw_content = backend.page_content(page_id)?;
    let ops = backend.decode_content(&raw_content)?;
    let fonts = backend.page_fonts(page_id).unwrap_or_default();

    let mut state = TextState::default();
    let mut spans: Vec<RawSpan> = Vec::new();

    for op in &ops {
        let number = |i: usize| op.operands.get(i).and_then(get_number_from_value);

        match op.operator.as_str() {
            "BT" => {
                state.text_matrix = IDENTITY_MATRIX;
                state.line_matrix = IDENTITY_MATRIX;
            }
            "Tf" => handle_tf(&op.operands, &fonts, &mut state),
            "Tm" => handle_tm(&op.operands, &mut state),
            "Td" => {
                if let (Some(tx), Some(ty)) = (number(0), number(1)) {
                    state.translate_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (number(0), number(1)) {
                    state.leading = -ty;
                    state.translate_line(tx, ty);
                }
            }
            "T*" => state.next_line(),
            "TL" => {
                if let Some(v) = number(0) {
                    state.leading = v;
                }
            }
            "Tc" => {
                if let Some(v) = number(0) {
                    state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = number(0) {
                    state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = number(0) {
                    state.horiz_scale = v / 100.0;
                }
            }
            "Ts" => {
                if let Some(v) = number(0) {
                    state.text_rise = v;
                }
            }
            "Tj" => {
                if let Some(first) = op.operands.first() {
                    emit_show_string(first, backend, page_id, &mut state, &mut spans);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(arr)) = op.operands.first() {
                    handle_tj_array(arr, backend, page_id, &mut state, &mut spans);
                }
            }
            "'" => {
                state.next_line();
                if let Some(first) = op.operands.first() {
                    emit_show_string(first, backend, page_id, &mut state, &mut spans);
                }
            }
            "\"" => {
                if op.operands.len() >= 3 {
                    if let Some(aw) = number(0) {
                        state.word_spacing = aw;
                    }
                    if let Some(ac) = number(1) {
                        state.char_spacing = ac;
                    }
                    state.next_line();
                    emit_show_string(&op.operands[2], backend, page_id, &mut state, &mut spans);
                }
            }
            _ => {}
        }
    }

    Ok(spans)
}

fn handle_tf(operands: &[PdfValue], fonts: &[BackendFontInfo], state: &mut TextState) {
    if operands.len() < 2 {
        return;
    }
    let key = match &operands[0] {
        PdfValue::Name(n) => n.clone(),
        PdfValue::Str(s) => s.clone(),
        _ => return,
    };

    state.font_size = get_number_from_value(&operands[1]).unwrap_or(0.0);
    state.font_name = match resolve_font(&key, fonts).and_then(|f| f.base_font.as_deref()) {
        Some(base) => base.to_string(),
        // Font not in the resource dict; the key is the best name we have.
        None => String::from_utf8_lossy(&key).into_owned(),
    };
    state.font_key = key;
}

fn handle_tm(operands: &[PdfValue], state: &mut TextState) {
    let vals: Vec<f32> = operands
        .iter()
        .take(6)
        .filter_map(get_number_from_value)
        .collect();
    if let [a, b, c, d, e, f] = vals[..] {
        state.text_matrix = [a, b, c, d, e, f];
        state.line_matrix = state.text_matrix;
    }
}

fn push_span(text: String, x: f32, y: f32, state: &TextState, spans: &mut Vec<RawSpan>) {
    let width = estimate_text_width(&text, state);
    spans.push(RawSpan {
        text,
        x,
        y,
        width,
        font_size: state.effective_font_size(),
        font_name: state.font_name.clone(),
    });
}

/// Shared by `Tj`, `'` and `"`.
fn emit_show_string(
    operand: &PdfValue,
    backend: &dyn PdfBackend,
    page_id: PageId,
    state: &mut TextState,
    spans: &mut Vec<RawSpan>,
) {
    let text = decode_string(operand, backend, page_id, &state.font_key);
    if text.is_empty() {
        return;
    }
    let (x, y) = (state.x(), state.y() + state.text_rise);
    advance_after_show(&text, state);
    push_span(text, x, y, state, spans);
}

/// Process a `TJ` array: strings to render interleaved with kerning
/// adjustments in thousandths of a text-space unit. Large negative
/// adjustments read as word gaps.
fn handle_tj_array(
    arr: &[PdfValue],
    backend: &dyn PdfBackend,
    page_id: PageId,
    state: &mut TextState,
    spans: &mut Vec<RawSpan>,
) {
    let mut buf = String::new();
    let mut span_x = state.x();
    let span_y = state.y() + state.text_rise;

    for elem in arr {
        if let PdfValue::Str(_) = elem {
            let fragment = decode_string(elem, backend, page_id, &state.font_key);
            if buf.is_empty() {
                span_x = state.x();
            }
            buf.push_str(&fragment);
            advance_after_show(&fragment, state);
        } else if let Some(adj) = get_number_from_value(elem) {
            let dx = -adj / 1000.0 * state.font_size * state.horiz_scale;
            let gap_threshold = state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale * 0.3;
            if dx > gap_threshold && !buf.is_empty() && !buf.ends_with(' ') {
                buf.push(' ');
            }
            state.advance_x(dx);
        }
    }

    let text = buf.trim_end();
    if !text.is_empty() {
        push_span(text.to_string(), span_x, span_y, state, spans);
    }
}

// ---------------------------------------------------------------------------
// Public API: span -> line grouping
// ---------------------------------------------------------------------------

/// Group spans into lines, top of the page first.
///
/// Spans whose baselines are within [`Y_TOLERANCE`] points share a line.
/// Within a line, adjacent fragments of the same font run are merged so that
/// a line yields one span per style change, not one per show operator.
pub fn group_spans_into_lines(mut spans: Vec<RawSpan>) -> Vec<RawLine> {
    spans.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<RawLine> = Vec::new();
    let mut current: Vec<RawSpan> = Vec::new();
    let mut current_y = f32::NAN;

    for span in spans {
        if !current.is_empty() && (span.y - current_y).abs() > Y_TOLERANCE {
            lines.push(assemble_line(std::mem::take(&mut current)));
        }
        if current.is_empty() {
            current_y = span.y;
        }
        current.push(span);
    }

    if !current.is_empty() {
        lines.push(assemble_line(current));
    }

    lines
}

fn same_run(prev: &RawSpan, next: &RawSpan) -> bool {
    prev.font_name == next.font_name && (prev.font_size - next.font_size).abs() < SAME_SIZE_EPSILON
}

fn boundary_is_spaceless(prev: &RawSpan, next: &RawSpan) -> bool {
    match (prev.text.chars().next_back(), next.text.chars().next()) {
        (Some(l), Some(f)) => is_spaceless_script_char(l) && is_spaceless_script_char(f),
        _ => false,
    }
}

fn assemble_line(mut spans: Vec<RawSpan>) -> RawLine {
    spans.sort_by(|a, b| a.x.total_cmp(&b.x));

    let mut merged: Vec<RawSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        if let Some(prev) = merged.last_mut() {
            let gap = span.x - (prev.x + prev.width);
            if same_run(prev, &span) && gap > -prev.font_size && gap < prev.font_size * 2.0 {
                let needs_space = gap >= MIN_WORD_GAP
                    && !prev.text.ends_with(' ')
                    && !span.text.starts_with(' ')
                    && !boundary_is_spaceless(prev, &span);
                if needs_space {
                    prev.text.push(' ');
                }
                prev.text.push_str(&span.text);
                prev.width = (span.x + span.width) - prev.x;
                continue;
            }
        }
        merged.push(span);
    }

    let y = merged.first().map(|s| s.y).unwrap_or(0.0);
    let font_size = merged.iter().map(|s| s.font_size).fold(0.0, f32::max);

    RawLine {
        spans: merged,
        y,
        font_size,
    }
}

// ---------------------------------------------------------------------------
// Public API: line -> block grouping
// ---------------------------------------------------------------------------

/// Split top-to-bottom lines into blocks wherever the baseline gap exceeds
/// [`BLOCK_GAP_FACTOR`] times the previous line's size.
pub fn group_lines_into_blocks(lines: Vec<RawLine>) -> Vec<Vec<RawLine>> {
    let mut blocks: Vec<Vec<RawLine>> = Vec::new();
    let mut current: Vec<RawLine> = Vec::new();

    for line in lines {
        let gap_break = current
            .last()
            .is_some_and(|prev| (prev.y - line.y).abs() > prev.font_size * BLOCK_GAP_FACTOR);
        if gap_break {
            blocks.push(std::mem::take(&mut current));
        }
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

// ---------------------------------------------------------------------------
// Public API: page assembly
// ---------------------------------------------------------------------------

/// Convert a span to top-down page coordinates relative to the MediaBox.
fn to_span(raw: RawSpan, page_box: &PageBox) -> Span {
    let page_width = page_box.width();
    let start = raw.x - page_box.llx;
    let x0 = start.max(0.0).min(page_width);
    let x1 = (start + raw.width).min(page_width).max(x0);
    let top = page_box.ury - raw.y - raw.font_size * ASCENT_RATIO;
    let bottom = page_box.ury - raw.y + raw.font_size * DESCENT_RATIO;
    Span {
        bbox: BBox::new(x0, top, x1, bottom),
        size: raw.font_size,
        font: raw.font_name,
        text: raw.text,
    }
}

/// Assemble extracted spans into the page tree.
pub fn to_page(spans: Vec<RawSpan>, page_box: &PageBox) -> Page {
    let blocks = group_lines_into_blocks(group_spans_into_lines(spans))
        .into_iter()
        .map(|lines| Block {
            lines: lines
                .into_iter()
                .map(|line| Line {
                    spans: line
                        .spans
                        .into_iter()
                        .map(|s| to_span(s, page_box))
                        .collect(),
                })
                .collect(),
        })
        .collect();

    Page {
        height: page_box.height(),
        blocks,
    }
}

/// Extract one page into the `block -> line -> span` tree.
pub fn extract_page(backend: &dyn PdfBackend, page_id: PageId) -> Result<Page, PdfError> {
    let page_box = backend.page_box(page_id).unwrap_or_else(|e| {
        debug!("page {:?}: {}; assuming US Letter", page_id, e);
        PageBox::LETTER
    });
    let spans = extract_page_spans(backend, page_id)?;
    Ok(to_page(spans, &page_box))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::super::backend::ContentOp;
    use super::*;

    // -- Helpers for building test data -----------------------------------

    fn make_span(text: &str, x: f32, y: f32, font_size: f32) -> RawSpan {
        RawSpan {
            text: text.to_string(),
            x,
            y,
            width: text.chars().count() as f32 * font_size * APPROX_CHAR_WIDTH_RATIO,
            font_size,
            font_name: "Helvetica".to_string(),
        }
    }

    /// A minimal mock backend for testing the state machine.
    struct MockBackend {
        fonts: Vec<BackendFontInfo>,
        page_box: Option<PageBox>,
        /// Raw content bytes are unused; we store pre-decoded ops directly.
        ops: Vec<ContentOp>,
    }

    impl MockBackend {
        fn new(ops: Vec<ContentOp>) -> Self {
            Self {
                fonts: fonts(),
                page_box: Some(PageBox::LETTER),
                ops,
            }
        }
    }

    impl PdfBackend for MockBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            BTreeMap::from([(1, (1, 0))])
        }

        fn page_fonts(&self, _page_id: PageId) -> Result<Vec<BackendFontInfo>, PdfError> {
            Ok(self.fonts.clone())
        }

        fn page_box(&self, _page_id: PageId) -> Result<PageBox, PdfError> {
            self.page_box
                .ok_or_else(|| PdfError::Parse("MediaBox not found for page".into()))
        }

        fn page_content(&self, _page_id: PageId) -> Result<Vec<u8>, PdfError> {
            Ok(vec![])
        }

        fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>, PdfError> {
            Ok(self.ops.clone())
        }

        fn decode_text(&self, _page: PageId, _font_name: &[u8], data: &[u8]) -> String {
            decode_text_simple(data)
        }
    }

    fn make_op(operator: &str, operands: Vec<PdfValue>) -> ContentOp {
        ContentOp {
            operator: operator.to_string(),
            operands,
        }
    }

    fn fonts() -> Vec<BackendFontInfo> {
        vec![
            BackendFontInfo {
                name: b"F1".to_vec(),
                base_font: Some("Helvetica".to_string()),
            },
            BackendFontInfo {
                name: b"F2".to_vec(),
                base_font: Some("Helvetica-Bold".to_string()),
            },
        ]
    }

    fn bt_op() -> ContentOp {
        make_op("BT", vec![])
    }

    fn et_op() -> ContentOp {
        make_op("ET", vec![])
    }

    fn tf_op(font: &[u8], size: f32) -> ContentOp {
        make_op(
            "Tf",
            vec![PdfValue::Name(font.to_vec()), PdfValue::Real(size)],
        )
    }

    fn tm_op(a: f32, d: f32, tx: f32, ty: f32) -> ContentOp {
        make_op(
            "Tm",
            [a, 0.0, 0.0, d, tx, ty]
                .into_iter()
                .map(PdfValue::Real)
                .collect(),
        )
    }

    fn td_op(tx: f32, ty: f32) -> ContentOp {
        make_op("Td", vec![PdfValue::Real(tx), PdfValue::Real(ty)])
    }

    fn tj_op(text: &[u8]) -> ContentOp {
        make_op("Tj", vec![PdfValue::Str(text.to_vec())])
    }

    fn tj_array_op(elements: Vec<PdfValue>) -> ContentOp {
        make_op("TJ", vec![PdfValue::Array(elements)])
    }

    // -- extract_page_spans ------------------------------------------------

    #[test]
    fn test_extract_simple_tj() {
        let backend = MockBackend::new(vec![
            bt_op(),
            tf_op(b"F1", 12.0),
            tm_op(1.0, 1.0, 72.0, 700.0),
            tj_op(b"Hello World"),
            et_op(),
        ]);

        let spans = extract_page_spans(&backend, (1, 0)).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Hello World");
        assert!((spans[0].x - 72.0).abs() < 0.01);
        assert!((spans[0].y - 700.0).abs() < 0.01);
        assert!((spans[0].font_size - 12.0).abs() < 0.01);
        assert_eq!(spans[0].font_name, "Helvetica");
    }

    #[test]
    fn test_extract_resolves_base_font_name() {
        let backend = MockBackend::new(vec![
            bt_op(),
            tf_op(b"F2", 14.0),
            tj_op(b"Bold Title"),
            tf_op(b"F9", 14.0),
            tj_op(b"Unknown"),
            et_op(),
        ]);

        let spans = extract_page_spans(&backend, (1, 0)).unwrap();
        assert_eq!(spans[0].font_name, "Helvetica-Bold");
        assert_eq!(spans[1].font_name, "F9");
    }

    #[test]
    fn test_extract_scaled_matrix_font_size() {
        // 1pt font scaled by the text matrix to 24pt.
        let backend = MockBackend::new(vec![
            bt_op(),
            tf_op(b"F1", 1.0),
            tm_op(24.0, 24.0, 72.0, 700.0),
            tj_op(b"Big"),
            et_op(),
        ]);

        let spans = extract_page_spans(&backend, (1, 0)).unwrap();
        assert!((spans[0].font_size - 24.0).abs() < 0.01);
        assert!((spans[0].width - 36.0).abs() < 0.01);
    }

    #[test]
    fn test_extract_tj_array_kerning() {
        let backend = MockBackend::new(vec![
            bt_op(),
            tf_op(b"F1", 12.0),
            tm_op(1.0, 1.0, 72.0, 700.0),
            tj_array_op(vec![
                PdfValue::Str(b"Hel".to_vec()),
                PdfValue::Integer(-10),
                PdfValue::Str(b"lo".to_vec()),
                PdfValue::Integer(-500),
                PdfValue::Str(b"World".to_vec()),
            ]),
            et_op(),
        ]);

        let spans = extract_page_spans(&backend, (1, 0)).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Hello World");
    }

    #[test]
    fn test_extract_td_and_t_star() {
        let backend = MockBackend::new(vec![
            bt_op(),
            tf_op(b"F1", 12.0),
            td_op(72.0, 700.0),
            tj_op(b"First"),
            make_op("TL", vec![PdfValue::Real(14.0)]),
            make_op("T*", vec![]),
            tj_op(b"Second"),
            make_op("'", vec![PdfValue::Str(b"Third".to_vec())]),
            et_op(),
        ]);

        let spans = extract_page_spans(&backend, (1, 0)).unwrap();
        let ys: Vec<f32> = spans.iter().map(|s| s.y).collect();
        assert_eq!(ys, vec![700.0, 686.0, 672.0]);
        assert!(spans.iter().all(|s| (s.x - 72.0).abs() < 0.01));
    }

    #[test]
    fn test_extract_td_capital_sets_leading() {
        let backend = MockBackend::new(vec![
            bt_op(),
            tf_op(b"F1", 10.0),
            td_op(50.0, 500.0),
            make_op("TD", vec![PdfValue::Real(0.0), PdfValue::Real(-12.0)]),
            tj_op(b"A"),
            make_op("T*", vec![]),
            tj_op(b"B"),
            et_op(),
        ]);

        let spans = extract_page_spans(&backend, (1, 0)).unwrap();
        assert_eq!(spans[0].y, 488.0);
        assert_eq!(spans[1].y, 476.0);
    }

    #[test]
    fn test_extract_cleans_ligatures_and_drops_empty() {
        let backend = MockBackend::new(vec![
            bt_op(),
            tf_op(b"F1", 12.0),
            tj_op("\u{FB01}nal".as_bytes()),
            tj_op(b""),
            et_op(),
        ]);

        let spans = extract_page_spans(&backend, (1, 0)).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "final");
    }

    // -- grouping ----------------------------------------------------------

    #[test]
    fn test_group_spans_same_baseline_merges_run() {
        // "Hello" at 12pt is 30pt wide; "World" starts after a small gap.
        let lines = group_spans_into_lines(vec![
            make_span("World", 105.0, 700.0, 12.0),
            make_span("Hello", 72.0, 700.4, 12.0),
        ]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans.len(), 1);
        assert_eq!(lines[0].spans[0].text, "Hello World");
    }

    #[test]
    fn test_group_spans_adjacent_fragments_concatenate() {
        let lines = group_spans_into_lines(vec![
            make_span("Intro", 72.0, 700.0, 12.0),
            make_span("duction", 102.0, 700.0, 12.0),
        ]);
        assert_eq!(lines[0].spans[0].text, "Introduction");
    }

    #[test]
    fn test_group_spans_font_change_splits_spans() {
        let mut bold = make_span("Note:", 72.0, 700.0, 12.0);
        bold.font_name = "Helvetica-Bold".to_string();
        let lines = group_spans_into_lines(vec![bold, make_span("read this", 105.0, 700.0, 12.0)]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans.len(), 2);
    }

    #[test]
    fn test_group_spans_different_baselines() {
        let lines = group_spans_into_lines(vec![
            make_span("Bottom", 72.0, 600.0, 12.0),
            make_span("Top", 72.0, 700.0, 12.0),
        ]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].text, "Top");
        assert_eq!(lines[1].spans[0].text, "Bottom");
    }

    #[test]
    fn test_group_spans_empty() {
        assert!(group_spans_into_lines(vec![]).is_empty());
    }

    #[test]
    fn test_cjk_fragments_join_without_space() {
        let lines = group_spans_into_lines(vec![
            make_span("\u{65E5}\u{672C}", 72.0, 700.0, 12.0),
            make_span("\u{8A9E}", 72.0 + 12.0 + 3.0, 700.0, 12.0),
        ]);
        assert_eq!(lines[0].spans[0].text, "\u{65E5}\u{672C}\u{8A9E}");
    }

    #[test]
    fn test_group_lines_gap_breaks_block() {
        let lines = group_spans_into_lines(vec![
            make_span("Line one", 72.0, 700.0, 12.0),
            make_span("Line two", 72.0, 686.0, 12.0),
            make_span("Far below", 72.0, 600.0, 12.0),
        ]);
        let blocks = group_lines_into_blocks(lines);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].len(), 2);
        assert_eq!(blocks[1].len(), 1);
    }

    // -- page assembly -----------------------------------------------------

    #[test]
    fn test_to_page_uses_top_down_coordinates() {
        let page_box = PageBox {
            llx: 0.0,
            lly: 0.0,
            urx: 612.0,
            ury: 792.0,
        };
        let page = to_page(
            vec![
                make_span("Near the bottom", 72.0, 50.0, 10.0),
                make_span("Near the top", 72.0, 742.0, 20.0),
            ],
            &page_box,
        );

        assert_eq!(page.height, 792.0);
        let spans: Vec<&Span> = page.spans().collect();
        assert_eq!(spans[0].text, "Near the top");
        // 792 - 742 - 20 * 0.8
        assert!((spans[0].bbox.y0 - 34.0).abs() < 0.01);
        assert!(spans[0].bbox.y0 < page.height * 0.4);
        assert!(spans[1].bbox.y0 > page.height * 0.4);
        assert!(spans[0].bbox.x1 > spans[0].bbox.x0);
    }

    #[test]
    fn test_to_page_clamps_x_to_page_width() {
        let page_box = PageBox {
            llx: 18.0,
            lly: 0.0,
            urx: 630.0,
            ury: 792.0,
        };
        let page = to_page(
            vec![
                make_span("Running off the right edge", 560.0, 700.0, 12.0),
                make_span("Bleed", 6.0, 600.0, 12.0),
            ],
            &page_box,
        );

        let spans: Vec<&Span> = page.spans().collect();
        assert_eq!(spans[0].text, "Running off the right edge");
        assert!((spans[0].bbox.x0 - 542.0).abs() < 0.01);
        assert_eq!(spans[0].bbox.x1, 612.0);
        assert_eq!(spans[1].text, "Bleed");
        assert_eq!(spans[1].bbox.x0, 0.0);
        // 6 - 18 + 5 * 12 * 0.5
        assert!((spans[1].bbox.x1 - 18.0).abs() < 0.01);
    }

    #[test]
    fn test_extract_page_falls_back_to_letter() {
        let mut backend = MockBackend::new(vec![
            bt_op(),
            tf_op(b"F2", 18.0),
            tm_op(1.0, 1.0, 72.0, 720.0),
            tj_op(b"Overview"),
            et_op(),
        ]);
        backend.page_box = None;

        let page = extract_page(&backend, (1, 0)).unwrap();
        assert_eq!(page.height, 792.0);
        let span = page.spans().next().unwrap();
        assert!(span.is_bold());
        assert_eq!(span.size, 18.0);
    }
}
