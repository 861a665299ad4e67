use thiserror::Error;

/// Failure to extract one page. The core recovers by treating the page as
/// empty.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Page {0} is out of range")]
    PageOutOfRange(usize),
    #[error("Text extraction failed: {0}")]
    Extraction(String),
}
