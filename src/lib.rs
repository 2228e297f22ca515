// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::manual_range_contains)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # Disclosure Oxide
//!
//! Layout recovery for scanned financial-disclosure reports.
//!
//! Given the page rasters of a scanned report, this crate finds where every
//! fillable field, table row and section checkbox sits, which of the eight
//! sections it belongs to, and whether the filer marked the section empty.
//! The result is a [`DocumentStructure`] that a text-recognition stage can
//! crop and read.
//!
//! ## Pipeline
//!
//! - **Mask**: green channel, tile-local contrast equalisation, Gaussian
//!   adaptive threshold ([`imaging::MaskBuilder`])
//! - **Classify**: contour tracing and geometric classification per page
//!   ([`layout::ShapeClassifier`])
//! - **Accumulate**: page results merged in page order, checkbox ordinals
//!   assigned ([`layout::ShapeAccumulator`])
//! - **Map**: entry lines resolved to sections by the nearest checkbox above
//!   ([`layout::resolve_section`])
//! - **Group**: shapes banded into rows, rows with the wrong column count
//!   dropped ([`layout::group_rows`])
//! - **Retry**: one more pass under the alternate hypothesis when checkboxes
//!   are missing ([`extractor::LayoutExtractor`])
//!
//! Field crops can then be checked for redaction blocks
//! ([`redaction::RedactionDetector`]) and cleaned of table rules
//! ([`imaging::clean_field_crop`]).
//!
//! ## Quick Start
//!
//! ```ignore
//! use disclosure_oxide::{ExtractorConfig, LayoutExtractor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pages: Vec<image::RgbImage> = load_pages("report.pdf")?;
//!
//! let extractor = LayoutExtractor::new(ExtractorConfig::default());
//! let structure = extractor.extract(&pages)?;
//!
//! for (kind, section) in &structure.sections {
//!     println!("{}: {} rows, empty={}", kind, section.rows.len(), section.empty);
//! }
//! println!("{}", structure.to_json()?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Geometry
pub mod geometry;

// Raster preprocessing
pub mod imaging;

// Shape detection and grouping
pub mod layout;

// Output model
pub mod structure;

// Page aggregation and retry
pub mod extractor;

// Redaction detection on field crops
pub mod redaction;

// Debug overlays
pub mod debug;

// Re-exports
pub use config::{ExtractorConfig, Polarity, RetryStrategy};
pub use error::{Error, Result};
pub use extractor::{extract_document_structure, Attempt, Hypothesis, LayoutExtractor};
pub use redaction::RedactionDetector;
pub use structure::{
    Checkbox, DocumentStructure, FieldBox, FieldKind, FilerSelections, Row, Section, SectionKind,
};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
