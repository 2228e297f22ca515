//! Synthetic form pages for integration tests.
//!
//! Pages are white with black printed furniture drawn at known positions:
//! outlined section checkboxes in the left margin, entry lines, and rows of
//! investment grid cells.

#![allow(dead_code)]

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

pub const PAGE_W: u32 = 1000;
pub const PAGE_H: u32 = 1400;

/// Stroke width of printed outlines.
pub const STROKE: u32 = 3;

pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn blank_page() -> RgbImage {
    RgbImage::from_pixel(PAGE_W, PAGE_H, WHITE)
}

pub fn fill(page: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    draw_filled_rect_mut(page, Rect::at(x as i32, y as i32).of_size(w, h), color);
}

fn outline(page: &mut RgbImage, x: u32, y: u32, w: u32, h: u32) {
    for inset in 0..STROKE {
        let rect = Rect::at((x + inset) as i32, (y + inset) as i32).of_size(w - 2 * inset, h - 2 * inset);
        draw_hollow_rect_mut(page, rect, BLACK);
    }
}

/// A printed 30x30 box with a white (or `fill`-shaded) interior.
pub fn outlined_box(page: &mut RgbImage, x: u32, y: u32, shade: Option<u8>) {
    outline(page, x, y, 30, 30);
    if let Some(v) = shade {
        fill(page, x + STROKE, y + STROKE, 30 - 2 * STROKE, 30 - 2 * STROKE, Rgb([v, v, v]));
    }
}

/// A solid black 24x24 square.
pub fn filled_box(page: &mut RgbImage, x: u32, y: u32) {
    fill(page, x, y, 24, 24, BLACK);
}

/// A horizontal entry line.
pub fn entry_line(page: &mut RgbImage, x: u32, y: u32, w: u32) {
    fill(page, x, y, w, STROKE, BLACK);
}

/// A row of `count` adjacent grid cells sharing their borders.
pub fn grid_row(page: &mut RgbImage, x: u32, y: u32, count: u32) {
    for i in 0..count {
        outline(page, x + i * 88, y, 91, 70);
    }
}

/// Left-margin x of the section checkboxes.
pub const CHECKBOX_X: u32 = 40;

/// A three-page form with all eight section checkboxes.
///
/// - page 0: sections 1-4 at y 200/500/800/1100, the fourth shaded as
///   ticked; one Positions row, one Agreements row plus a three-line noise
///   row, one Non-Investment Income row; two header boxes and five
///   selector boxes with only "amended" ticked
/// - page 1: sections 5-8 at the same heights; one Gifts row
/// - page 2: two complete investment rows and one nine-cell row
pub fn sample_form() -> Vec<RgbImage> {
    let mut first = blank_page();
    for (i, y) in [200, 500, 800, 1100].into_iter().enumerate() {
        let shade = if i == 3 { Some(225) } else { None };
        outlined_box(&mut first, CHECKBOX_X, y, shade);
    }
    // header boxes, upper right
    outline(&mut first, 550, 60, 400, 80);
    outline(&mut first, 820, 500, 160, 60);
    // selectors: nomination, initial, annual, final, amended
    outlined_box(&mut first, 500, 180, None);
    outlined_box(&mut first, 400, 260, None);
    outlined_box(&mut first, 600, 260, None);
    outlined_box(&mut first, 800, 260, None);
    outlined_box(&mut first, 500, 340, Some(200));
    // Positions
    entry_line(&mut first, 60, 420, 300);
    entry_line(&mut first, 500, 420, 300);
    // Agreements, then a noise row
    entry_line(&mut first, 60, 650, 300);
    entry_line(&mut first, 500, 650, 300);
    for x in [60, 380, 700] {
        entry_line(&mut first, x, 730, 250);
    }
    // Non-Investment Income
    for x in [60, 380, 700] {
        entry_line(&mut first, x, 950, 250);
    }

    let mut second = blank_page();
    for y in [200, 500, 800, 1100] {
        outlined_box(&mut second, CHECKBOX_X, y, None);
    }
    // Gifts
    for x in [60, 380, 700] {
        entry_line(&mut second, x, 650, 250);
    }

    let mut third = blank_page();
    grid_row(&mut third, 60, 200, 10);
    grid_row(&mut third, 60, 330, 10);
    grid_row(&mut third, 60, 460, 9);

    vec![first, second, third]
}

/// A single page whose checkboxes only show up as solid squares.
pub fn solid_checkbox_page(count: u32) -> RgbImage {
    let mut page = blank_page();
    for i in 0..count {
        filled_box(&mut page, 50, 100 + i * 150);
    }
    page
}

/// A single page with `count` outlined checkboxes at the given heights.
pub fn outlined_checkbox_page(ys: &[u32]) -> RgbImage {
    let mut page = blank_page();
    for &y in ys {
        outlined_box(&mut page, CHECKBOX_X, y, None);
    }
    page
}
