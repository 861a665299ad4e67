use std::path::Path;

use log::debug;
use pdfoutline_core::layout::{DocumentSource, Page};
use pdfoutline_core::{
    build_outline, inspect, DocumentReport, LayoutError, OutlineConfig, OutlineResult,
};
use thiserror::Error;

use parser::backend::{LopdfBackend, PageId, PdfBackend};

pub mod cleanup;
pub mod parser;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("Document is encrypted")]
    Encrypted,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PdfError> for LayoutError {
    fn from(e: PdfError) -> Self {
        LayoutError::Extraction(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// An opened PDF, ready to serve pages to the outline heuristics.
///
/// Constructed via [`PdfDocument::open`] or [`PdfDocument::from_bytes`].
/// Pages are extracted lazily on each [`DocumentSource::load_page`] call.
pub struct PdfDocument {
    backend: LopdfBackend,
    /// Page ids in document order.
    pages: Vec<PageId>,
}

impl PdfDocument {
    /// Read and parse the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Parse PDF bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        let backend = LopdfBackend::load_bytes(bytes)?;
        let pages = backend.pages().into_values().collect();
        Ok(PdfDocument { backend, pages })
    }
}

impl DocumentSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn metadata_title(&self) -> Option<String> {
        self.backend.metadata_title()
    }

    fn load_page(&self, index: usize) -> Result<Page, LayoutError> {
        let page_id = *self
            .pages
            .get(index)
            .ok_or(LayoutError::PageOutOfRange(index))?;
        let page = parser::layout::extract_page(&self.backend, page_id)?;
        debug!("page {}: {} blocks", index + 1, page.blocks.len());
        Ok(page)
    }
}

// ---------------------------------------------------------------------------
// Convenience free functions
// ---------------------------------------------------------------------------

/// Open `path` and infer its outline.
pub fn outline_file(
    path: impl AsRef<Path>,
    config: &OutlineConfig,
) -> Result<OutlineResult, PdfError> {
    let doc = PdfDocument::open(path)?;
    Ok(build_outline(&doc, config))
}

/// Open `path` and report the document-level analysis without the outline.
pub fn inspect_file(
    path: impl AsRef<Path>,
    config: &OutlineConfig,
) -> Result<DocumentReport, PdfError> {
    let doc = PdfDocument::open(path)?;
    Ok(inspect(&doc, config))
}

#[cfg(test)]
mod tests {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};
    use pdfoutline_core::{HeadingLevel, TitleSource};

    use super::*;

    /// One page per entry; each line is `(font key, size, y, text)`.
    fn build_pdf(title: Option<&str>, pages: &[Vec<(&str, f32, f32, &str)>]) -> Vec<u8> {
        let mut doc = lopdf::Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let resources = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => regular, "F2" => bold },
        });

        let mut kids: Vec<Object> = Vec::new();
        for lines in pages {
            let mut operations = Vec::new();
            for (font, size, y, text) in lines {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec![(*font).into(), (*size).into()]));
                operations.push(Operation::new("Td", vec![72.into(), (*y).into()]));
                operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
                operations.push(Operation::new("ET", vec![]));
            }
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources,
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => kids.len() as i64,
                "Kids" => kids,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        if let Some(title) = title {
            let info_id = doc.add_object(dictionary! {
                "Title" => Object::string_literal(title),
            });
            doc.trailer.set("Info", info_id);
        }

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn report_pdf() -> Vec<u8> {
        build_pdf(
            None,
            &[
                vec![
                    ("F2", 26.0, 720.0, "Quarterly Business Review"),
                    ("F1", 10.0, 600.0, "This opening paragraph is set in the body font."),
                    ("F1", 10.0, 586.0, "It continues for a few more lines of prose"),
                    ("F1", 10.0, 572.0, "so that the document has a clear body size."),
                    ("F2", 24.0, 520.0, "Executive Summary"),
                    ("F1", 10.0, 490.0, "Revenue grew in every region this quarter."),
                ],
                vec![
                    ("F2", 14.0, 720.0, "2.1 Regional Results"),
                    ("F1", 10.0, 690.0, "Each region reported its numbers in time."),
                    ("F1", 10.0, 676.0, "The figures below summarize the results."),
                ],
            ],
        )
    }

    #[test]
    fn test_document_source_reads_pages() {
        let doc = PdfDocument::from_bytes(&report_pdf()).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.metadata_title(), None);

        let page = doc.load_page(0).unwrap();
        assert_eq!(page.height, 792.0);
        let first = page.spans().next().unwrap();
        assert_eq!(first.text, "Quarterly Business Review");
        assert!(first.is_bold());
        assert_eq!(first.size, 26.0);
        assert!(first.bbox.y0 < page.height * 0.4);

        assert!(matches!(
            doc.load_page(5),
            Err(LayoutError::PageOutOfRange(5))
        ));
    }

    #[test]
    fn test_outline_from_pdf_bytes() {
        let doc = PdfDocument::from_bytes(&report_pdf()).unwrap();
        let result = build_outline(&doc, &OutlineConfig::default());

        assert_eq!(result.title, "Quarterly Business Review");
        let headings: Vec<(HeadingLevel, &str, usize)> = result
            .outline
            .iter()
            .map(|e| (e.level, e.text.as_str(), e.page))
            .collect();
        assert_eq!(
            headings,
            vec![
                (HeadingLevel::H1, "Executive Summary", 1),
                (HeadingLevel::H2, "2.1 Regional Results", 2),
            ]
        );
    }

    #[test]
    fn test_metadata_title_is_used() {
        let bytes = build_pdf(
            Some("Annual Report 2023"),
            &[vec![("F2", 26.0, 720.0, "Something Else Entirely")]],
        );
        let doc = PdfDocument::from_bytes(&bytes).unwrap();
        let report = inspect(&doc, &OutlineConfig::default());
        assert_eq!(report.title.title, "Annual Report 2023");
        assert_eq!(report.title.source, TitleSource::Metadata);
    }

    #[test]
    fn test_garbage_bytes_fail_to_open() {
        assert!(matches!(
            PdfDocument::from_bytes(b"garbage bytes, not a document"),
            Err(PdfError::Parse(_))
        ));
    }

    #[test]
    fn test_outline_file_missing_path() {
        let err = outline_file("/definitely/not/here.pdf", &OutlineConfig::default()).unwrap_err();
        assert!(matches!(err, PdfError::Io(_)));
    }
}
