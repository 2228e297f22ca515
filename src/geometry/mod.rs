//! Geometric primitives in page-pixel space.
//!
//! Everything the extractor reports is an axis-aligned box on a page raster,
//! with the origin at the top-left corner and y growing downwards.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in page pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelRect {
    /// X coordinate of the left edge
    pub x: u32,
    /// Y coordinate of the top edge
    pub y: u32,
    /// Width in pixels
    pub w: u32,
    /// Height in pixels
    pub h: u32,
}

impl PixelRect {
    /// Create a new rectangle from position and dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use disclosure_oxide::geometry::PixelRect;
    ///
    /// let rect = PixelRect::new(10, 20, 100, 50);
    /// assert_eq!(rect.right(), 110);
    /// assert_eq!(rect.bottom(), 70);
    /// ```
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Create a rectangle from its inclusive corner pixels.
    ///
    /// # Examples
    ///
    /// ```
    /// use disclosure_oxide::geometry::PixelRect;
    ///
    /// let rect = PixelRect::from_corners(10, 20, 19, 29);
    /// assert_eq!(rect.w, 10);
    /// assert_eq!(rect.h, 10);
    /// ```
    pub fn from_corners(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        let (left, right) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (top, bottom) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Self {
            x: left,
            y: top,
            w: right - left + 1,
            h: bottom - top + 1,
        }
    }

    /// Get the left edge x-coordinate.
    pub fn left(&self) -> u32 {
        self.x
    }

    /// Get the right edge x-coordinate (exclusive).
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// Get the top edge y-coordinate.
    pub fn top(&self) -> u32 {
        self.y
    }

    /// Get the bottom edge y-coordinate (exclusive).
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    /// Area in pixels.
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    /// Width over height. Zero-height rectangles report 0.
    pub fn aspect_ratio(&self) -> f32 {
        if self.h == 0 {
            return 0.0;
        }
        self.w as f32 / self.h as f32
    }

    /// Check if this rectangle intersects with another.
    ///
    /// # Examples
    ///
    /// ```
    /// use disclosure_oxide::geometry::PixelRect;
    ///
    /// let a = PixelRect::new(0, 0, 100, 100);
    /// assert!(a.intersects(&PixelRect::new(50, 50, 100, 100)));
    /// assert!(!a.intersects(&PixelRect::new(100, 0, 10, 10)));
    /// ```
    pub fn intersects(&self, other: &PixelRect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Clip the rectangle to an image of the given size.
    ///
    /// Returns `None` when nothing of the rectangle lies on the image.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<PixelRect> {
        if self.x >= width || self.y >= height || self.w == 0 || self.h == 0 {
            return None;
        }
        let right = self.right().min(width);
        let bottom = self.bottom().min(height);
        Some(PixelRect::new(self.x, self.y, right - self.x, bottom - self.y))
    }

    /// Scale every coordinate, rounding to the nearest pixel.
    pub fn scaled(&self, sx: f32, sy: f32) -> PixelRect {
        PixelRect::new(
            (self.x as f32 * sx).round() as u32,
            (self.y as f32 * sy).round() as u32,
            (self.w as f32 * sx).round() as u32,
            (self.h as f32 * sy).round() as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = PixelRect::new(10, 20, 100, 50);
        assert_eq!(r.left(), 10);
        assert_eq!(r.right(), 110);
        assert_eq!(r.top(), 20);
        assert_eq!(r.bottom(), 70);
        assert_eq!(r.area(), 5000);
    }

    #[test]
    fn test_rect_from_corners_swapped() {
        let r = PixelRect::from_corners(19, 29, 10, 20);
        assert_eq!(r, PixelRect::new(10, 20, 10, 10));
    }

    #[test]
    fn test_aspect_ratio() {
        assert_eq!(PixelRect::new(0, 0, 300, 30).aspect_ratio(), 10.0);
        assert_eq!(PixelRect::new(0, 0, 30, 0).aspect_ratio(), 0.0);
    }

    #[test]
    fn test_rect_intersects_touching_edges() {
        let a = PixelRect::new(0, 0, 10, 10);
        let b = PixelRect::new(10, 0, 10, 10);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&PixelRect::new(9, 9, 5, 5)));
    }

    #[test]
    fn test_clamp_to() {
        let r = PixelRect::new(90, 90, 20, 20);
        assert_eq!(r.clamp_to(100, 100), Some(PixelRect::new(90, 90, 10, 10)));
        assert_eq!(r.clamp_to(50, 50), None);
    }

    #[test]
    fn test_scaled() {
        let r = PixelRect::new(100, 200, 50, 10);
        assert_eq!(r.scaled(0.5, 2.0), PixelRect::new(50, 400, 25, 20));
    }
}
