//! The page-text contract between the heuristic core and whatever extracts
//! text from a PDF.
//!
//! An extractor yields, per page, a `block -> line -> span` tree plus the page
//! height, and per document a page count and an optional metadata title.
//! Coordinates are top-down: `y0` is the distance from the top of the page.

use crate::error::LayoutError;

/// Axis-aligned box `(x0, y0, x1, y1)` in page space, origin at the top-left.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

/// Smallest run of uniformly styled text reported by the extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub bbox: BBox,
    pub size: f32,
    pub font: String,
}

impl Span {
    /// Bold is inferred from the font name, e.g. `Helvetica-Bold`.
    pub fn is_bold(&self) -> bool {
        self.font.to_lowercase().contains("bold")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub spans: Vec<Span>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub height: f32,
    pub blocks: Vec<Block>,
}

impl Page {
    /// A page with no text, used when extraction fails.
    pub fn blank(height: f32) -> Self {
        Self {
            height,
            blocks: Vec::new(),
        }
    }

    /// Iterate every span on the page in block, line, span order.
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.blocks
            .iter()
            .flat_map(|b| b.lines.iter())
            .flat_map(|l| l.spans.iter())
    }

    /// Iterate every physical line on the page.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.blocks.iter().flat_map(|b| b.lines.iter())
    }

    /// Plain text of the page: span texts concatenated per line, one line per
    /// row, blocks separated by newlines.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            for line in &block.lines {
                for span in &line.spans {
                    out.push_str(&span.text);
                }
                out.push('\n');
            }
        }
        out
    }
}

/// Abstraction over a text-extraction backend.
///
/// This trait exists so that the heuristic core can be tested against
/// in-memory fixtures without pulling in a PDF parser.
pub trait DocumentSource {
    /// Total number of pages in the document.
    fn page_count(&self) -> usize;

    /// The `Title` entry of the document metadata, if any.
    fn metadata_title(&self) -> Option<String>;

    /// Extract the page at the 0-based `index`.
    fn load_page(&self, index: usize) -> Result<Page, LayoutError>;
}

/// A [`DocumentSource`] over pages that were already extracted.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    pub title: Option<String>,
    pub pages: Vec<Page>,
}

impl MemoryDocument {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { title: None, pages }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl DocumentSource for MemoryDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn metadata_title(&self) -> Option<String> {
        self.title.clone()
    }

    fn load_page(&self, index: usize) -> Result<Page, LayoutError> {
        self.pages
            .get(index)
            .cloned()
            .ok_or(LayoutError::PageOutOfRange(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, font: &str) -> Span {
        Span {
            text: text.to_string(),
            bbox: BBox::new(0.0, 0.0, 10.0, 10.0),
            size: 12.0,
            font: font.to_string(),
        }
    }

    #[test]
    fn test_bold_from_font_name() {
        assert!(span("x", "Helvetica-Bold").is_bold());
        assert!(span("x", "ARIALBOLDMT").is_bold());
        assert!(!span("x", "Times-Roman").is_bold());
    }

    #[test]
    fn test_page_plain_text() {
        let page = Page {
            height: 792.0,
            blocks: vec![Block {
                lines: vec![
                    Line {
                        spans: vec![span("Hello ", "F"), span("World", "F")],
                    },
                    Line {
                        spans: vec![span("Again", "F")],
                    },
                ],
            }],
        };
        assert_eq!(page.plain_text(), "Hello World\nAgain\n");
        assert_eq!(page.spans().count(), 3);
        assert_eq!(page.lines().count(), 2);
    }

    #[test]
    fn test_memory_document_out_of_range() {
        let doc = MemoryDocument::new(vec![Page::blank(792.0)]);
        assert_eq!(doc.page_count(), 1);
        assert!(doc.load_page(0).is_ok());
        assert!(matches!(
            doc.load_page(3),
            Err(LayoutError::PageOutOfRange(3))
        ));
    }
}
