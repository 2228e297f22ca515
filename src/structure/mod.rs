//! Document structure model.
//!
//! ## Overview
//!
//! The structure is the hand-off point to text recognition. It names, for each
//! of the eight form sections, the columns a row has and the page regions
//! holding each row's fields:
//!
//! ```text
//! sections[name] = {order, fields, empty, rows: {row_index: {field: {x, y, w, h, page, section}}}}
//! ```
//!
//! It also carries the page-1 header boxes, the filer-type selections, the
//! number of section checkboxes found, and the free-text addendum region.
//!
//! Sections come from a fixed template that is parsed afresh for every
//! extraction attempt.

mod template;
mod types;

pub use template::{load_sections, parse_sections};
pub use types::{
    Checkbox, DocumentStructure, FieldBox, FieldKind, FilerSelections, HeaderBox, HeaderField,
    PageRegion, Row, Section, SectionKind,
};
