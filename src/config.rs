//! Configuration for layout extraction.
//!
//! The thresholds below were tuned against scanned copies of the disclosure
//! form and have no analytic derivation. They are kept as named constants so a
//! change to any of them shows up as a deliberate behaviour change that needs
//! re-validation against known-good documents.

use serde::{Deserialize, Serialize};

/// Minimum aspect ratio (w/h) of a checkbox.
pub const CHECKBOX_MIN_ASPECT: f32 = 0.9;
/// Maximum aspect ratio (w/h) of a checkbox.
pub const CHECKBOX_MAX_ASPECT: f32 = 1.1;
/// Minimum fill extent of a checkbox (exclusive).
pub const CHECKBOX_MIN_EXTENT: f32 = 0.8;
/// Fraction of the page width that holds the section checkbox column.
pub const CHECKBOX_COLUMN_FRACTION: f32 = 0.2;
/// Mean brightness below which a section checkbox counts as ticked.
pub const SECTION_DARKNESS_THRESHOLD: f32 = 230.0;
/// Mean brightness below which a filer-type selector counts as ticked.
pub const SELECTOR_DARKNESS_THRESHOLD: f32 = 220.0;
/// Selector height band in pixels (exclusive bounds).
pub const SELECTOR_HEIGHT: (u32, u32) = (20, 50);

/// Table-cell aspect ratio band (exclusive bounds).
pub const CELL_ASPECT: (f32, f32) = (0.9, 10.0);
/// Table-cell height band in pixels (exclusive bounds).
pub const CELL_HEIGHT: (u32, u32) = (40, 150);

/// Minimum aspect ratio of a text-entry line (exclusive).
pub const LINE_MIN_ASPECT: f32 = 7.0;
/// Minimum width of a text-entry line in pixels (exclusive).
pub const LINE_MIN_WIDTH: u32 = 150;

/// Minimum height of a page-1 header box in pixels (exclusive).
pub const HEADER_MIN_HEIGHT: u32 = 50;

/// Number of checkboxes the form carries, one per section.
pub const REQUIRED_CHECKBOXES: usize = 8;

/// Vertical band, in pixels, that shapes of one row must start within.
pub const ROW_BAND: u32 = 10;
/// Right-most x a text row's first cell may start at.
pub const ROW_MAX_LEFT_X: u32 = 120;
/// Pixels above a text-entry line that hold the handwritten or typed answer.
pub const TEXT_LINE_LIFT: u32 = 60;

/// Neighbourhood of the adaptive threshold, in pixels.
pub const ADAPTIVE_BLOCK_SIZE: u32 = 41;
/// Constant subtracted from the local mean by the adaptive threshold.
pub const ADAPTIVE_C: f32 = 2.0;
/// Histogram clip limit of the tile-local contrast equalisation.
pub const CLAHE_CLIP_LIMIT: f32 = 1.0;
/// Tile grid (columns, rows) of the tile-local contrast equalisation.
pub const CLAHE_GRID: (u32, u32) = (3, 3);

/// Redaction block aspect ratio band (inclusive bounds).
pub const REDACTION_ASPECT: (f32, f32) = (0.9, 10.1);
/// Redaction block height band in pixels (exclusive bounds).
pub const REDACTION_HEIGHT: (u32, u32) = (20, 50);

/// Canonical page resolution used by the rescale hypothesis.
pub const CANONICAL_PAGE_SIZE: (u32, u32) = (1653, 2180);

/// Which contour nesting level is treated as the real checkbox outline.
///
/// Depending on the scanner, the printed checkbox shows up either as the
/// white interior of the box (a top-level region) or as the hole cut by the
/// box outline into the page (a nested region).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Checkboxes are top-level regions (first-pass hypothesis)
    #[default]
    TopLevel,
    /// Checkboxes are nested regions
    Nested,
}

impl Polarity {
    /// The opposite hypothesis.
    pub fn flipped(self) -> Self {
        match self {
            Polarity::TopLevel => Polarity::Nested,
            Polarity::Nested => Polarity::TopLevel,
        }
    }
}

/// Alternate hypothesis tried when the first pass finds too few checkboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStrategy {
    /// Rerun with the flipped [`Polarity`]
    FlipPolarity,
    /// Rerun with every page resized to a fixed resolution
    Rescale {
        /// Target width in pixels
        width: u32,
        /// Target height in pixels
        height: u32,
    },
}

impl RetryStrategy {
    /// Rescale to [`CANONICAL_PAGE_SIZE`].
    pub fn canonical_rescale() -> Self {
        RetryStrategy::Rescale {
            width: CANONICAL_PAGE_SIZE.0,
            height: CANONICAL_PAGE_SIZE.1,
        }
    }
}

/// Extractor configuration.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Polarity of the first attempt.
    pub polarity: Polarity,

    /// Hypothesis used by the single retry.
    pub retry: RetryStrategy,

    /// Classify pages on the rayon pool.
    pub parallel: bool,

    /// Checkboxes required to accept a structure.
    pub required_checkboxes: usize,

    /// Brightness threshold for "section empty" checkboxes.
    pub section_darkness_threshold: f32,

    /// Brightness threshold for page-1 selectors.
    pub selector_darkness_threshold: f32,

    /// Row band for the grouping engine.
    pub row_band: u32,

    /// Right-most start x of a text row.
    pub row_max_left_x: u32,

    /// Pixels above a text line included in its crop.
    pub text_line_lift: u32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            polarity: Polarity::TopLevel,
            retry: RetryStrategy::FlipPolarity,
            parallel: true,
            required_checkboxes: REQUIRED_CHECKBOXES,
            section_darkness_threshold: SECTION_DARKNESS_THRESHOLD,
            selector_darkness_threshold: SELECTOR_DARKNESS_THRESHOLD,
            row_band: ROW_BAND,
            row_max_left_x: ROW_MAX_LEFT_X,
            text_line_lift: TEXT_LINE_LIFT,
        }
    }

    /// Set the first-pass polarity.
    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Set the retry hypothesis.
    pub fn with_retry(mut self, retry: RetryStrategy) -> Self {
        self.retry = retry;
        self
    }

    /// Enable or disable parallel page classification.
    pub fn with_parallel(mut self, enable: bool) -> Self {
        self.parallel = enable;
        self
    }

    /// Override the row band.
    pub fn with_row_band(mut self, band: u32) -> Self {
        self.row_band = band.max(1);
        self
    }

    /// Override the text-line crop lift.
    pub fn with_text_line_lift(mut self, lift: u32) -> Self {
        self.text_line_lift = lift;
        self
    }
}
