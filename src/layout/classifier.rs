//! Shape classifier.
//!
//! Sorts the shapes of one page into the form elements the rest of the
//! pipeline cares about, by geometry alone:
//!
//! - section checkboxes: near-square, nearly solid, in the left margin
//! - filer-type selectors: the small boxes on page 1 right of the margin
//! - table cells: the investment grid
//! - text-entry lines: long flat strokes
//! - header boxes: page-1 boxes in the header bands
//!
//! A shape may satisfy several rules and is then recorded once per rule.
//! Anything else is noise. Classification only looks at one page; gates that
//! depend on other pages (how many checkboxes were already found) are applied
//! when page results are merged, see [`ShapeAccumulator`](super::ShapeAccumulator).

use image::RgbImage;

use super::shape::{extract_shapes, Shape};
use crate::config::{
    Polarity, CELL_ASPECT, CELL_HEIGHT, CHECKBOX_COLUMN_FRACTION, CHECKBOX_MAX_ASPECT,
    CHECKBOX_MIN_ASPECT, CHECKBOX_MIN_EXTENT, HEADER_MIN_HEIGHT, LINE_MIN_ASPECT, LINE_MIN_WIDTH,
    SELECTOR_HEIGHT,
};
use crate::geometry::PixelRect;
use crate::imaging::MaskBuilder;

/// Index and pixel size of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
    /// Zero-based page index
    pub index: usize,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl PageGeometry {
    /// Create a page geometry.
    pub fn new(index: usize, width: u32, height: u32) -> Self {
        Self {
            index,
            width,
            height,
        }
    }

    fn is_first(&self) -> bool {
        self.index == 0
    }

    fn x_fraction(&self, fraction: f32) -> f32 {
        self.width as f32 * fraction
    }

    fn y_fraction(&self, fraction: f32) -> f32 {
        self.height as f32 * fraction
    }
}

/// What a shape was recognised as.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeClass {
    /// Section marker in the left margin
    SectionCheckbox {
        /// Mean brightness inside the box
        darkness: f32,
    },
    /// Page-1 filer-type box
    Selector {
        /// Mean brightness inside the box
        darkness: f32,
    },
    /// Investment grid cell
    TableCell,
    /// Text-entry line
    TextLine,
    /// Page-1 header box
    HeaderBox,
    /// Nothing of interest
    Noise,
}

/// A checkbox-like shape with its fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckboxCandidate {
    /// Detected box
    pub shape: Shape,
    /// Mean brightness inside the box
    pub darkness: f32,
}

/// Classified shapes of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageScan {
    /// The page the shapes came from
    pub geometry: PageGeometry,
    /// Section checkboxes, top to bottom
    pub checkboxes: Vec<CheckboxCandidate>,
    /// Filer-type selectors
    pub selectors: Vec<CheckboxCandidate>,
    /// Table cells, top to bottom
    pub cells: Vec<Shape>,
    /// Text-entry lines, top to bottom
    pub lines: Vec<Shape>,
    /// Header boxes, top to bottom
    pub header_boxes: Vec<Shape>,
    /// Shapes that matched no rule
    pub noise: usize,
}

impl PageScan {
    fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            checkboxes: Vec::new(),
            selectors: Vec::new(),
            cells: Vec::new(),
            lines: Vec::new(),
            header_boxes: Vec::new(),
            noise: 0,
        }
    }

    /// Y of the highest section checkbox on the page, 0 if there is none.
    pub fn top_checkbox_y(&self) -> u32 {
        self.checkboxes
            .iter()
            .map(|c| c.shape.rect.y)
            .min()
            .unwrap_or(0)
    }
}

/// Classifies the shapes of a page under one nesting hypothesis.
#[derive(Debug, Clone)]
pub struct ShapeClassifier {
    polarity: Polarity,
    masks: MaskBuilder,
}

impl ShapeClassifier {
    /// Create a classifier for `polarity` with the default mask builder.
    pub fn new(polarity: Polarity) -> Self {
        Self {
            polarity,
            masks: MaskBuilder::new(),
        }
    }

    /// Mask, trace and classify one page.
    pub fn scan_page(&self, index: usize, page: &RgbImage) -> PageScan {
        let mask = self.masks.build(page);
        let shapes = extract_shapes(&mask, index);
        let geometry = PageGeometry::new(index, page.width(), page.height());
        let scan = self.scan_shapes(geometry, &shapes, page);
        log::debug!(
            "Page {}: {} shapes, {} checkboxes, {} selectors, {} cells, {} lines, {} header boxes",
            index,
            shapes.len(),
            scan.checkboxes.len(),
            scan.selectors.len(),
            scan.cells.len(),
            scan.lines.len(),
            scan.header_boxes.len()
        );
        scan
    }

    /// Classify already extracted shapes of one page.
    ///
    /// Every output list is ordered top to bottom, then left to right.
    pub fn scan_shapes(&self, geometry: PageGeometry, shapes: &[Shape], pixels: &RgbImage) -> PageScan {
        let mut scan = PageScan::new(geometry);
        for shape in shapes {
            for class in self.classify(shape, &geometry, pixels) {
                match class {
                    ShapeClass::SectionCheckbox { darkness } => scan.checkboxes.push(CheckboxCandidate {
                        shape: *shape,
                        darkness,
                    }),
                    ShapeClass::Selector { darkness } => scan.selectors.push(CheckboxCandidate {
                        shape: *shape,
                        darkness,
                    }),
                    ShapeClass::TableCell => scan.cells.push(*shape),
                    ShapeClass::TextLine => scan.lines.push(*shape),
                    ShapeClass::HeaderBox => scan.header_boxes.push(*shape),
                    ShapeClass::Noise => scan.noise += 1,
                }
            }
        }

        let reading_order = |s: &Shape| (s.rect.y, s.rect.x);
        scan.checkboxes.sort_by_key(|c| reading_order(&c.shape));
        scan.selectors.sort_by_key(|c| reading_order(&c.shape));
        scan.cells.sort_by_key(reading_order);
        scan.lines.sort_by_key(reading_order);
        scan.header_boxes.sort_by_key(reading_order);
        scan
    }

    /// Every class `shape` belongs to; `[Noise]` when it matches no rule.
    ///
    /// # Examples
    ///
    /// ```
    /// use disclosure_oxide::config::Polarity;
    /// use disclosure_oxide::geometry::PixelRect;
    /// use disclosure_oxide::layout::{Nesting, PageGeometry, Shape, ShapeClass, ShapeClassifier};
    /// use image::{Rgb, RgbImage};
    ///
    /// let page = RgbImage::from_pixel(1000, 1400, Rgb([255, 255, 255]));
    /// let geometry = PageGeometry::new(2, 1000, 1400);
    /// let line = Shape::solid(PixelRect::new(100, 700, 600, 4), 2, Nesting::Nested);
    ///
    /// let classes = ShapeClassifier::new(Polarity::TopLevel).classify(&line, &geometry, &page);
    /// assert_eq!(classes, vec![ShapeClass::TextLine]);
    /// ```
    pub fn classify(&self, shape: &Shape, page: &PageGeometry, pixels: &RgbImage) -> Vec<ShapeClass> {
        let rect = shape.rect;
        let x = rect.x as f32;
        let y = rect.y as f32;
        let aspect = shape.aspect_ratio();
        let square = (CHECKBOX_MIN_ASPECT..=CHECKBOX_MAX_ASPECT).contains(&aspect)
            && shape.extent() > CHECKBOX_MIN_EXTENT;
        let in_margin = x < page.x_fraction(CHECKBOX_COLUMN_FRACTION);

        let mut classes = Vec::new();

        if square && in_margin && shape.matches(self.polarity) {
            classes.push(ShapeClass::SectionCheckbox {
                darkness: mean_darkness(pixels, rect),
            });
        }

        if page.is_first()
            && square
            && x > page.x_fraction(CHECKBOX_COLUMN_FRACTION)
            && rect.h > SELECTOR_HEIGHT.0
            && rect.h < SELECTOR_HEIGHT.1
            && shape.is_top_level()
        {
            classes.push(ShapeClass::Selector {
                darkness: mean_darkness(pixels, rect),
            });
        }

        if shape.is_top_level()
            && aspect > CELL_ASPECT.0
            && aspect < CELL_ASPECT.1
            && rect.h > CELL_HEIGHT.0
            && rect.h < CELL_HEIGHT.1
        {
            classes.push(ShapeClass::TableCell);
        }

        if aspect > LINE_MIN_ASPECT && rect.w > LINE_MIN_WIDTH {
            classes.push(ShapeClass::TextLine);
        }

        let in_header_band = (y < page.y_fraction(0.5) && x > page.x_fraction(0.5))
            || (y > page.y_fraction(0.05) && y < page.y_fraction(0.1));
        if page.is_first() && shape.is_top_level() && rect.h > HEADER_MIN_HEIGHT && in_header_band {
            classes.push(ShapeClass::HeaderBox);
        }

        if classes.is_empty() {
            classes.push(ShapeClass::Noise);
        }
        classes
    }
}

/// Mean brightness over all channels of the pixels inside `rect`.
///
/// A rectangle that lies off the image reads as white.
pub fn mean_darkness(pixels: &RgbImage, rect: PixelRect) -> f32 {
    let Some(rect) = rect.clamp_to(pixels.width(), pixels.height()) else {
        return 255.0;
    };
    let mut sum = 0u64;
    for y in rect.top()..rect.bottom() {
        for x in rect.left()..rect.right() {
            let p = pixels.get_pixel(x, y);
            sum += p[0] as u64 + p[1] as u64 + p[2] as u64;
        }
    }
    sum as f32 / (rect.area() * 3) as f32
}
