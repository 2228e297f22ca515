//! Binary mask builder.
//!
//! Turns a colour page raster into a single-channel bitmap in which paper is
//! foreground (255) and printed ink (rules, box outlines, filled blocks) is
//! background (0). Thresholding is local: every pixel is compared against a
//! Gaussian-weighted mean of its own neighbourhood, so a page that is darker
//! at one end than the other still binarises cleanly.

use image::{GrayImage, Luma, RgbImage};
use imageproc::filter::gaussian_blur_f32;

use crate::config::{ADAPTIVE_BLOCK_SIZE, ADAPTIVE_C, CLAHE_CLIP_LIMIT, CLAHE_GRID};
use crate::imaging::clahe::equalize_tiles;

/// An inclusive HSV box in OpenCV's 8-bit convention
/// (hue 0..=180, saturation and value 0..=255).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvRange {
    /// Lower (h, s, v) bound
    pub lower: [u8; 3],
    /// Upper (h, s, v) bound
    pub upper: [u8; 3],
}

impl HsvRange {
    /// Create a range from explicit bounds.
    pub fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    /// A range covering every colour.
    pub fn full() -> Self {
        Self::new([0, 0, 0], [255, 255, 255])
    }

    /// True when no colour can fall outside the range.
    pub fn is_full(&self) -> bool {
        self.lower == [0, 0, 0] && self.upper[0] >= 180 && self.upper[1] == 255 && self.upper[2] == 255
    }

    /// Check whether an HSV triple lies inside the range.
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|i| hsv[i] >= self.lower[i] && hsv[i] <= self.upper[i])
    }
}

impl Default for HsvRange {
    fn default() -> Self {
        Self::full()
    }
}

/// Convert an RGB pixel to 8-bit HSV (hue halved to fit 0..=180).
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(|c| c as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max > 0.0 { delta * 255.0 / max } else { 0.0 };
    let mut h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if h < 0.0 {
        h += 360.0;
    }

    [(h / 2.0).round() as u8, s.round() as u8, max as u8]
}

/// Builds binary masks from page rasters.
#[derive(Debug, Clone)]
pub struct MaskBuilder {
    /// Colour filter applied before channel extraction
    pub hsv_range: HsvRange,
    /// Contrast equalisation clip limit
    pub clip_limit: f32,
    /// Contrast equalisation tile grid
    pub grid: (u32, u32),
    /// Adaptive threshold neighbourhood (odd, in pixels)
    pub block_size: u32,
    /// Constant subtracted from the local mean
    pub c: f32,
}

impl Default for MaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MaskBuilder {
    /// Create a builder with the tuned defaults.
    pub fn new() -> Self {
        Self {
            hsv_range: HsvRange::full(),
            clip_limit: CLAHE_CLIP_LIMIT,
            grid: CLAHE_GRID,
            block_size: ADAPTIVE_BLOCK_SIZE,
            c: ADAPTIVE_C,
        }
    }

    /// Restrict the colour filter.
    pub fn with_hsv_range(mut self, range: HsvRange) -> Self {
        self.hsv_range = range;
        self
    }

    /// Build the binary mask of a page.
    ///
    /// The output always has the input's dimensions.
    pub fn build(&self, page: &RgbImage) -> GrayImage {
        let channel = self.filtered_green(page);
        let equalized = equalize_tiles(&channel, self.clip_limit, self.grid);
        adaptive_threshold_gaussian(&equalized, self.block_size, self.c)
    }

    /// Green channel of the pixels inside the colour range, 0 elsewhere.
    fn filtered_green(&self, page: &RgbImage) -> GrayImage {
        let (width, height) = page.dimensions();
        if self.hsv_range.is_full() {
            return GrayImage::from_fn(width, height, |x, y| Luma([page.get_pixel(x, y)[1]]));
        }
        GrayImage::from_fn(width, height, |x, y| {
            let rgb = page.get_pixel(x, y).0;
            if self.hsv_range.contains(rgb_to_hsv(rgb)) {
                Luma([rgb[1]])
            } else {
                Luma([0])
            }
        })
    }
}

/// Binarise against a Gaussian-weighted local mean.
///
/// A pixel becomes 255 when it is brighter than `mean - c`, where the mean is
/// taken over a `block_size` window. The Gaussian sigma follows the usual
/// derivation from the window size.
pub fn adaptive_threshold_gaussian(image: &GrayImage, block_size: u32, c: f32) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }
    let sigma = 0.3 * ((block_size.max(3) as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let local_mean = gaussian_blur_f32(image, sigma);

    GrayImage::from_fn(width, height, |x, y| {
        let src = image.get_pixel(x, y)[0] as f32;
        let mean = local_mean.get_pixel(x, y)[0] as f32;
        if src > mean - c {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}
