//! Error types for the layout extractor.
//!
//! Only conditions that invalidate a whole document are errors. Per-shape and
//! per-row anomalies (malformed rows, lines with no checkbox above them) are
//! absorbed where they occur and only show up in the debug log.

/// Result type alias for extractor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while recovering a document structure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Too few section checkboxes were located, even after the retry.
    ///
    /// The page geometry does not look like the expected form, so no partial
    /// structure is returned.
    #[error("Section checkboxes not found: located {found} of {required}")]
    CheckboxesNotFound {
        /// Checkboxes located by the last attempt
        found: usize,
        /// Checkboxes required for a usable structure
        required: usize,
    },

    /// No pages were supplied
    #[error("Document has no pages")]
    EmptyDocument,

    /// A page raster cannot be analysed
    #[error("Invalid page {page}: {reason}")]
    InvalidPage {
        /// Zero-based page index
        page: usize,
        /// Why the page was rejected
        reason: String,
    },

    /// The embedded section template is malformed
    #[error("Section template error: {0}")]
    Template(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Number of checkboxes found when structural detection failed.
    pub fn found_count(&self) -> Option<usize> {
        match self {
            Error::CheckboxesNotFound { found, .. } => Some(*found),
            _ => None,
        }
    }
}
