//! Core library for pdfoutline
//!
//! This crate implements the **Functional Core** of the pdfoutline application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The pdfoutline project uses a three-crate architecture:
//!
//! - **`pdfoutline_core`** (this crate): Pure structure-inference functions with zero I/O
//! - **`pdf`**: The `lopdf`-backed extraction layer implementing [`layout::DocumentSource`]
//! - **`pdfoutline`**: File traversal, batch orchestration and JSON output (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! - **Pure functions**: Same spans in, same outline out
//! - **No side effects**: The only shared state is the read-only [`lexicon`]
//! - **Testable**: Every heuristic runs against fixture spans, no PDF required
//!
//! # Module Organization
//!
//! Leaves first:
//!
//! - [`normalize`]: Unicode canonicalization and coarse script detection
//! - [`grouping`]: Merges adjacent spans into visual line groups
//! - [`stats`]: Body font size and adaptive size thresholds
//! - [`title`]: Metadata-first title detection with a typographic fallback
//! - [`heading`]: Heading validation (scoring) and level classification
//! - [`membership`]: Title duplicate suppression
//! - [`outline`]: Orchestrates the above across the pages of one document
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use pdfoutline_core::{build_outline, OutlineConfig};
//!
//! // `doc` is anything implementing `DocumentSource`, e.g. `pdf::PdfDocument`.
//! let result = build_outline(&doc, &OutlineConfig::default());
//! println!("{}", result.title);
//! for entry in &result.outline {
//!     println!("{} {} (page {})", entry.level, entry.text, entry.page);
//! }
//! ```

pub mod config;
pub mod error;
pub mod grouping;
pub mod heading;
pub mod layout;
pub mod lexicon;
pub mod membership;
pub mod normalize;
pub mod outline;
pub mod stats;
pub mod title;
pub mod types;

pub use config::OutlineConfig;
pub use error::LayoutError;
pub use layout::DocumentSource;
pub use outline::{build_outline, inspect, DocumentReport};
pub use types::*;
