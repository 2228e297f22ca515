//! Debug overlays for layout extraction.
//!
//! Draws what the extractor found on top of a page raster, colour-coded by
//! element kind, so a misdetected checkbox or a dropped row can be spotted
//! by eye.
//!
//! ## Example
//!
//! ```ignore
//! use disclosure_oxide::debug::render_overlay;
//! use disclosure_oxide::extract_document_structure;
//!
//! let structure = extract_document_structure(&pages)?;
//! render_overlay(&pages[0], 0, &structure).save("page1_debug.png")?;
//! ```

mod overlay;

pub use overlay::{render_overlay, render_overlay_with, OverlayColors};
