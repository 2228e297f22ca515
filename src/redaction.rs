//! Redaction detection on field crops.
//!
//! Redacted entries carry a solid block printed over the text. Such blocks
//! trace as dense, short, not-too-elongated boxes, which typed or handwritten
//! text almost never does.

use image::RgbImage;
use rayon::prelude::*;

use crate::config::{CHECKBOX_MIN_EXTENT, REDACTION_ASPECT, REDACTION_HEIGHT};
use crate::imaging::MaskBuilder;
use crate::layout::{extract_shapes, Shape};

/// Detects solid overlay blocks in field crops.
#[derive(Debug, Clone)]
pub struct RedactionDetector {
    masks: MaskBuilder,
    aspect: (f32, f32),
    height: (u32, u32),
}

impl Default for RedactionDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl RedactionDetector {
    /// Create a detector with the tuned bands.
    pub fn new() -> Self {
        Self {
            masks: MaskBuilder::new(),
            aspect: REDACTION_ASPECT,
            height: REDACTION_HEIGHT,
        }
    }

    /// Whether any shape in the crop looks like a redaction block.
    pub fn contains_redaction(&self, crop: &RgbImage) -> bool {
        if crop.width() == 0 || crop.height() == 0 {
            return false;
        }
        let mask = self.masks.build(crop);
        extract_shapes(&mask, 0).iter().any(|s| self.is_block(s))
    }

    /// Check a batch of crops in parallel. Results are in input order.
    pub fn scan_crops(&self, crops: &[RgbImage]) -> Vec<bool> {
        crops
            .par_iter()
            .map(|crop| self.contains_redaction(crop))
            .collect()
    }

    fn is_block(&self, shape: &Shape) -> bool {
        let aspect = shape.aspect_ratio();
        aspect >= self.aspect.0
            && aspect <= self.aspect.1
            && shape.extent() > CHECKBOX_MIN_EXTENT
            && shape.rect.h > self.height.0
            && shape.rect.h < self.height.1
    }
}
