//! Field-crop cleaner.
//!
//! Cell and line crops usually carry pieces of the surrounding table: the
//! rule above or below the entry, the column separators on either side. Those
//! strokes confuse text recognition, so they are painted out, and the crop is
//! then tightened to the ink that is left.

use image::{imageops, GrayImage, Luma, Rgb, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::contrast::otsu_level;
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{close, grayscale_open, open, Mask};

use crate::geometry::PixelRect;
use crate::layout::shape::bounding_rect;

/// Length of the structuring element used to find table rules.
const RULE_KERNEL: u32 = 10;
/// Opening iterations used to find table rules.
const RULE_ITERATIONS: u32 = 2;
/// Horizontal rules this close to the top or bottom edge are erased.
const EDGE_BAND: u32 = 10;
/// Blur applied before locating the remaining ink (25 px window).
const INK_BLUR_SIGMA: f32 = 4.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Remove table rules from a crop and trim it to its content.
///
/// Horizontal rules are only erased near the top and bottom edges, where they
/// belong to the neighbouring table rows; vertical rules are erased wherever
/// they are found. A crop with no ink left is returned unchanged.
pub fn clean_field_crop(crop: &RgbImage) -> RgbImage {
    let (width, height) = crop.dimensions();
    if width == 0 || height == 0 {
        return crop.clone();
    }

    let gray = imageops::grayscale(crop);
    if is_flat(&gray) {
        return crop.clone();
    }
    let ink = ink_mask(&gray, otsu_level(&gray));
    let mut cleaned = crop.clone();

    let horizontal = open_rules(&ink, Axis::Horizontal);
    for rect in component_bounds(&horizontal) {
        let inside = rect.y > EDGE_BAND && rect.y + EDGE_BAND < height;
        if !inside {
            erase(&mut cleaned, rect);
        }
    }

    let vertical = open_rules(&ink, Axis::Vertical);
    for rect in component_bounds(&vertical) {
        erase(&mut cleaned, rect);
    }

    match content_bounds(&cleaned) {
        Some(rect) => imageops::crop_imm(&cleaned, rect.x, rect.y, rect.w, rect.h).to_image(),
        None => cleaned,
    }
}

/// Bounding box of the ink blob left after blurring and morphological
/// clean-up, or `None` for a blank crop.
fn content_bounds(image: &RgbImage) -> Option<PixelRect> {
    let gray = imageops::grayscale(image);
    if is_flat(&gray) {
        return None;
    }
    let blurred = gaussian_blur_f32(&gray, INK_BLUR_SIGMA);
    let level = otsu_level(&blurred);
    let ink = ink_mask(&blurred, level);

    // 3x3 open twice, then 7x7 close three times.
    let closed = close(&open(&ink, Norm::LInf, 2), Norm::LInf, 9);

    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, p) in closed.enumerate_pixels() {
        if p[0] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds.map(|(x0, y0, x1, y1)| PixelRect::from_corners(x0, y0, x1, y1))
}

fn is_flat(gray: &GrayImage) -> bool {
    let mut pixels = gray.pixels();
    match pixels.next() {
        Some(first) => pixels.all(|p| p[0] == first[0]),
        None => true,
    }
}

/// 255 where the pixel is at or below `level`.
fn ink_mask(gray: &GrayImage, level: u8) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y)[0] > level {
            Luma([0])
        } else {
            Luma([255])
        }
    })
}

/// Opening with a 1-pixel-thick line element, repeated erosions included.
///
/// Eroding `RULE_ITERATIONS` times with a `RULE_KERNEL` line equals one
/// erosion with a line of `RULE_ITERATIONS * (RULE_KERNEL - 1) + 1` pixels,
/// so a single opening with the longer, centred element is used.
fn open_rules(mask: &GrayImage, axis: Axis) -> GrayImage {
    grayscale_open(mask, &rule_element(axis))
}

fn rule_element(axis: Axis) -> Mask {
    let len = RULE_ITERATIONS * (RULE_KERNEL - 1) + 1;
    let center = (len / 2) as u8;
    match axis {
        Axis::Horizontal => Mask::from_image(&GrayImage::from_pixel(len, 1, Luma([255])), center, 0),
        Axis::Vertical => Mask::from_image(&GrayImage::from_pixel(1, len, Luma([255])), 0, center),
    }
}

/// Bounding boxes of the outermost foreground components.
fn component_bounds(mask: &GrayImage) -> Vec<PixelRect> {
    find_contours::<u32>(mask)
        .iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .filter_map(|c| bounding_rect(&c.points))
        .collect()
}

/// Paint a rectangle, grown by one pixel, white.
fn erase(image: &mut RgbImage, rect: PixelRect) {
    let (width, height) = image.dimensions();
    let x0 = rect.x.saturating_sub(1);
    let y0 = rect.y.saturating_sub(1);
    let x1 = (rect.right() + 1).min(width);
    let y1 = (rect.bottom() + 1).min(height);
    for y in y0..y1 {
        for x in x0..x1 {
            image.put_pixel(x, y, Rgb([255, 255, 255]));
        }
    }
}
