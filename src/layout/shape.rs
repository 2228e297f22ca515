//! Contour extraction.
//!
//! Every closed boundary in a page mask becomes a [`Shape`]: its bounding box,
//! the area enclosed by the traced boundary, and whether the boundary is the
//! outside of a paper region or a hole cut into one.

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::point::Point;
use serde::{Deserialize, Serialize};

use crate::config::Polarity;
use crate::geometry::PixelRect;

/// Nesting level of a boundary in the two-level region hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nesting {
    /// Outer boundary of a foreground region
    TopLevel,
    /// Boundary of a hole inside a foreground region
    Nested,
}

impl Nesting {
    /// Whether this nesting level is the one `polarity` treats as a checkbox.
    pub fn matches(self, polarity: Polarity) -> bool {
        matches!(
            (self, polarity),
            (Nesting::TopLevel, Polarity::TopLevel) | (Nesting::Nested, Polarity::Nested)
        )
    }
}

/// A closed boundary detected on one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Bounding box in page pixels
    pub rect: PixelRect,
    /// Zero-based page index
    pub page: usize,
    /// Area enclosed by the boundary polygon
    pub area: f32,
    /// Nesting level of the boundary
    pub nesting: Nesting,
}

impl Shape {
    /// Create a shape.
    pub fn new(rect: PixelRect, page: usize, area: f32, nesting: Nesting) -> Self {
        Self {
            rect,
            page,
            area,
            nesting,
        }
    }

    /// Create a shape whose boundary fills its bounding box exactly.
    ///
    /// # Examples
    ///
    /// ```
    /// use disclosure_oxide::geometry::PixelRect;
    /// use disclosure_oxide::layout::{Nesting, Shape};
    ///
    /// let shape = Shape::solid(PixelRect::new(10, 10, 30, 30), 0, Nesting::TopLevel);
    /// assert_eq!(shape.extent(), 1.0);
    /// assert_eq!(shape.aspect_ratio(), 1.0);
    /// ```
    pub fn solid(rect: PixelRect, page: usize, nesting: Nesting) -> Self {
        Self::new(rect, page, rect.area() as f32, nesting)
    }

    /// Enclosed area over bounding-box area.
    pub fn extent(&self) -> f32 {
        let rect_area = self.rect.area();
        if rect_area == 0 {
            return 0.0;
        }
        self.area / rect_area as f32
    }

    /// Width over height of the bounding box.
    pub fn aspect_ratio(&self) -> f32 {
        self.rect.aspect_ratio()
    }

    /// Whether the nesting level matches `polarity`.
    pub fn matches(&self, polarity: Polarity) -> bool {
        self.nesting.matches(polarity)
    }

    /// Whether the shape is the outer boundary of a region.
    pub fn is_top_level(&self) -> bool {
        self.nesting == Nesting::TopLevel
    }
}

/// Trace every boundary of a binary mask.
///
/// Foreground is any non-zero pixel. Shapes come back in the order the
/// tracer meets them, which is a raster scan of their starting pixels.
pub fn extract_shapes(mask: &GrayImage, page: usize) -> Vec<Shape> {
    find_contours::<u32>(mask)
        .iter()
        .filter_map(|contour| shape_from_contour(contour, page))
        .collect()
}

fn shape_from_contour(contour: &Contour<u32>, page: usize) -> Option<Shape> {
    let rect = bounding_rect(&contour.points)?;
    let nesting = match contour.border_type {
        BorderType::Outer => Nesting::TopLevel,
        BorderType::Hole => Nesting::Nested,
    };
    Some(Shape::new(rect, page, contour_area(&contour.points), nesting))
}

/// Smallest rectangle holding every point, or `None` for no points.
pub fn bounding_rect(points: &[Point<u32>]) -> Option<PixelRect> {
    let first = points.first()?;
    let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        x0 = x0.min(p.x);
        y0 = y0.min(p.y);
        x1 = x1.max(p.x);
        y1 = y1.max(p.y);
    }
    Some(PixelRect::from_corners(x0, y0, x1, y1))
}

/// Area of the polygon through `points` (shoelace formula).
pub fn contour_area(points: &[Point<u32>]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0f64;
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        twice_area += p.x as f64 * q.y as f64 - q.x as f64 * p.y as f64;
    }
    (twice_area.abs() / 2.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn pt(x: u32, y: u32) -> Point<u32> {
        Point::new(x, y)
    }

    #[test]
    fn test_bounding_rect() {
        let points = vec![pt(5, 7), pt(9, 3), pt(2, 10)];
        assert_eq!(bounding_rect(&points), Some(PixelRect::new(2, 3, 8, 8)));
        assert_eq!(bounding_rect(&[]), None);
    }

    #[test]
    fn test_contour_area_square() {
        let square = vec![pt(0, 0), pt(10, 0), pt(10, 10), pt(0, 10)];
        assert_eq!(contour_area(&square), 100.0);
        assert_eq!(contour_area(&square[..2]), 0.0);
    }

    #[test]
    fn test_extent_and_aspect() {
        let shape = Shape::new(PixelRect::new(0, 0, 20, 10), 0, 100.0, Nesting::Nested);
        assert_eq!(shape.extent(), 0.5);
        assert_eq!(shape.aspect_ratio(), 2.0);
        assert!(!shape.is_top_level());
        let flat = Shape::new(PixelRect::new(0, 0, 20, 0), 0, 0.0, Nesting::Nested);
        assert_eq!(flat.extent(), 0.0);
    }

    #[test]
    fn test_nesting_matches_polarity() {
        assert!(Nesting::TopLevel.matches(Polarity::TopLevel));
        assert!(Nesting::Nested.matches(Polarity::Nested));
        assert!(!Nesting::TopLevel.matches(Polarity::Nested));
        assert!(!Nesting::Nested.matches(Polarity::TopLevel));
    }

    #[test]
    fn test_extract_shapes_region_with_hole() {
        // White 40x40 region with a 10x10 black hole in the middle.
        let mut mask = GrayImage::new(60, 60);
        for y in 10..50 {
            for x in 10..50 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        for y in 25..35 {
            for x in 25..35 {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
        let shapes = extract_shapes(&mask, 3);
        assert_eq!(shapes.len(), 2);
        assert!(shapes.iter().all(|s| s.page == 3));

        let outer = shapes.iter().find(|s| s.is_top_level()).map(|s| s.rect);
        assert_eq!(outer, Some(PixelRect::new(10, 10, 40, 40)));

        let hole = shapes
            .iter()
            .find(|s| s.nesting == Nesting::Nested)
            .map(|s| s.rect);
        let hole = hole.map(|r| (r.aspect_ratio(), r.intersects(&PixelRect::new(25, 25, 10, 10))));
        assert_eq!(hole, Some((1.0, true)));
    }

    #[test]
    fn test_extract_shapes_blank_mask() {
        let mask = GrayImage::new(20, 20);
        assert!(extract_shapes(&mask, 0).is_empty());
    }
}
