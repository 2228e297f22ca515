//! Layout recovery from page masks.
//!
//! This module turns the binary masks of scanned pages into form structure:
//! - Contour tracing into [`Shape`]s
//! - Per-page classification into checkboxes, cells, lines and header boxes
//! - Cross-page accumulation with checkbox ordinals
//! - Section resolution for entry lines
//! - Row grouping with a per-section column-count filter

pub mod accumulator;
pub mod classifier;
pub mod row_grouping;
pub mod section_mapper;
pub mod shape;

// Re-export main types
pub use accumulator::ShapeAccumulator;
pub use classifier::{mean_darkness, CheckboxCandidate, PageGeometry, PageScan, ShapeClass, ShapeClassifier};
pub use row_grouping::{assign_investment_rows, assign_text_rows, group_rows};
pub use section_mapper::{map_cells, map_lines, resolve_section, section_emptiness, ClassifiedShape};
pub use shape::{extract_shapes, Nesting, Shape};
