//! Raster preprocessing.
//!
//! Page binarisation for shape detection, and clean-up of field crops before
//! they go to text recognition.

pub mod clahe;
pub mod cleanup;
pub mod mask;

pub use cleanup::clean_field_crop;
pub use mask::{adaptive_threshold_gaussian, HsvRange, MaskBuilder};
