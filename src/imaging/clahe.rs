//! Contrast-limited adaptive histogram equalisation.
//!
//! The page is split into a coarse tile grid. Each tile gets its own
//! equalisation lookup table built from a clipped histogram, and every pixel
//! is mapped through a bilinear blend of the four nearest tile tables. This
//! evens out scans where one part of the sheet was lit much better than the
//! rest.

use image::GrayImage;

const BINS: usize = 256;

/// Equalise `image` over a `grid` of (columns, rows) tiles.
///
/// # Arguments
///
/// * `image` - Single-channel input
/// * `clip_limit` - Histogram clip limit, relative to a flat histogram.
///   Values `<= 0` disable clipping.
/// * `grid` - Number of tiles across and down; clamped to the image size
///
/// # Returns
///
/// A new image of the same dimensions.
pub fn equalize_tiles(image: &GrayImage, clip_limit: f32, grid: (u32, u32)) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let tile_w = width.div_ceil(grid.0.clamp(1, width));
    let tile_h = height.div_ceil(grid.1.clamp(1, height));
    let tiles_x = width.div_ceil(tile_w);
    let tiles_y = height.div_ceil(tile_h);

    let mut luts = Vec::with_capacity((tiles_x * tiles_y) as usize);
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let x0 = tx * tile_w;
            let y0 = ty * tile_h;
            let x1 = (x0 + tile_w).min(width);
            let y1 = (y0 + tile_h).min(height);
            luts.push(tile_lut(image, x0, y0, x1, y1, clip_limit));
        }
    }

    let lut_at = |tx: u32, ty: u32| &luts[(ty * tiles_x + tx) as usize];

    GrayImage::from_fn(width, height, |x, y| {
        let (ty1, ty2, ya) = neighbours(y, tile_h, tiles_y);
        let (tx1, tx2, xa) = neighbours(x, tile_w, tiles_x);
        let v = image.get_pixel(x, y)[0] as usize;

        let top = lut_at(tx1, ty1)[v] as f32 * (1.0 - xa) + lut_at(tx2, ty1)[v] as f32 * xa;
        let bottom = lut_at(tx1, ty2)[v] as f32 * (1.0 - xa) + lut_at(tx2, ty2)[v] as f32 * xa;
        let value = top * (1.0 - ya) + bottom * ya;
        image::Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}

/// Tile indices on either side of a pixel centre, plus the blend weight
/// towards the second one.
fn neighbours(pos: u32, tile: u32, tiles: u32) -> (u32, u32, f32) {
    let f = pos as f32 / tile as f32 - 0.5;
    let first = f.floor();
    let weight = f - first;
    let last = tiles as i64 - 1;
    let t1 = (first as i64).clamp(0, last) as u32;
    let t2 = (first as i64 + 1).clamp(0, last) as u32;
    (t1, t2, weight)
}

fn tile_lut(image: &GrayImage, x0: u32, y0: u32, x1: u32, y1: u32, clip_limit: f32) -> [u8; BINS] {
    let mut hist = [0u32; BINS];
    for y in y0..y1 {
        for x in x0..x1 {
            hist[image.get_pixel(x, y)[0] as usize] += 1;
        }
    }
    let area = (x1 - x0) * (y1 - y0);

    if clip_limit > 0.0 {
        let limit = ((clip_limit * area as f32 / BINS as f32) as u32).max(1);
        let mut clipped = 0u32;
        for count in hist.iter_mut() {
            if *count > limit {
                clipped += *count - limit;
                *count = limit;
            }
        }

        // Spread the excess evenly, then hand out what is left one bin at a time.
        let batch = clipped / BINS as u32;
        let mut residual = clipped - batch * BINS as u32;
        for count in hist.iter_mut() {
            *count += batch;
        }
        if residual > 0 {
            let step = (BINS as u32 / residual).max(1) as usize;
            for count in hist.iter_mut().step_by(step) {
                if residual == 0 {
                    break;
                }
                *count += 1;
                residual -= 1;
            }
        }
    }

    let scale = 255.0 / area as f32;
    let mut lut = [0u8; BINS];
    let mut sum = 0u32;
    for (bin, count) in hist.iter().enumerate() {
        sum += count;
        lut[bin] = (sum as f32 * scale).round().min(255.0) as u8;
    }
    lut
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_preserves_dimensions() {
        let img = GrayImage::from_pixel(37, 23, Luma([128]));
        let out = equalize_tiles(&img, 1.0, (3, 3));
        assert_eq!(out.dimensions(), (37, 23));
    }

    #[test]
    fn test_empty_image() {
        let img = GrayImage::new(0, 0);
        let out = equalize_tiles(&img, 1.0, (3, 3));
        assert_eq!(out.dimensions(), (0, 0));
    }

    #[test]
    fn test_mapping_is_monotonic_within_tile() {
        let img = GrayImage::from_fn(64, 64, |x, _| Luma([(x * 4) as u8]));
        let out = equalize_tiles(&img, 1.0, (1, 1));
        for x in 1..64 {
            assert!(out.get_pixel(x, 10)[0] >= out.get_pixel(x - 1, 10)[0]);
        }
    }

    #[test]
    fn test_ink_stays_darker_than_paper() {
        let mut img = GrayImage::from_pixel(90, 90, Luma([250]));
        for y in 40..50 {
            for x in 10..80 {
                img.put_pixel(x, y, Luma([20]));
            }
        }
        let out = equalize_tiles(&img, 1.0, (3, 3));
        assert!(out.get_pixel(45, 45)[0] < out.get_pixel(45, 5)[0]);
        assert!(out.get_pixel(45, 5)[0] > 200);
    }

    #[test]
    fn test_grid_larger_than_image() {
        let img = GrayImage::from_pixel(2, 2, Luma([10]));
        let out = equalize_tiles(&img, 1.0, (8, 8));
        assert_eq!(out.dimensions(), (2, 2));
    }

    #[test]
    fn test_neighbours_clamp_at_edges() {
        assert_eq!(neighbours(0, 10, 3).0, 0);
        assert_eq!(neighbours(29, 10, 3).1, 2);
        let (t1, t2, w) = neighbours(15, 10, 3);
        assert_eq!((t1, t2), (1, 2));
        assert!(w.abs() < 1e-6);
    }
}
