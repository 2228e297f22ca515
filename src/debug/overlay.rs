//! Overlay renderer.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::config::TEXT_LINE_LIFT;
use crate::geometry::PixelRect;
use crate::structure::{DocumentStructure, FieldKind};

/// Colours for the element kinds.
#[derive(Debug, Clone)]
pub struct OverlayColors {
    /// Section checkboxes of non-empty sections
    pub checkbox: Rgb<u8>,
    /// Section checkboxes marking a section empty
    pub empty_checkbox: Rgb<u8>,
    /// Page-1 header boxes
    pub header: Rgb<u8>,
    /// Investment grid cells
    pub table_cell: Rgb<u8>,
    /// Text-entry lines, drawn with their read window
    pub text_line: Rgb<u8>,
    /// Stroke width in pixels
    pub thickness: u32,
}

impl Default for OverlayColors {
    fn default() -> Self {
        Self {
            checkbox: Rgb([220, 30, 30]),       // red
            empty_checkbox: Rgb([150, 0, 150]), // purple
            header: Rgb([30, 60, 220]),         // blue
            table_cell: Rgb([20, 160, 40]),     // green
            text_line: Rgb([240, 140, 0]),      // orange
            thickness: 2,
        }
    }
}

/// Draw the elements found on `page_index` over a copy of `page`.
pub fn render_overlay(page: &RgbImage, page_index: usize, structure: &DocumentStructure) -> RgbImage {
    render_overlay_with(page, page_index, structure, &OverlayColors::default())
}

/// Like [`render_overlay`] with custom colours.
pub fn render_overlay_with(
    page: &RgbImage,
    page_index: usize,
    structure: &DocumentStructure,
    colors: &OverlayColors,
) -> RgbImage {
    let mut canvas = page.clone();

    for checkbox in structure.checkboxes.iter().filter(|c| c.shape.page == page_index) {
        let color = if checkbox.is_section_empty {
            colors.empty_checkbox
        } else {
            colors.checkbox
        };
        draw_box(&mut canvas, checkbox.shape.rect, color, colors.thickness);
    }

    if page_index == 0 {
        for header in &structure.first_four {
            draw_box(&mut canvas, header.crop_region(), colors.header, colors.thickness);
        }
    }

    let fields = structure
        .sections
        .values()
        .flat_map(|section| section.rows.values())
        .flat_map(|row| row.iter().map(|(_, field)| field))
        .filter(|field| field.page == page_index);
    for field in fields {
        match field.kind {
            FieldKind::TableCell => draw_box(&mut canvas, field.rect(), colors.table_cell, colors.thickness),
            FieldKind::TextLine => {
                draw_box(&mut canvas, field.crop_region(0), colors.text_line, colors.thickness);
                draw_box(&mut canvas, field.crop_region(TEXT_LINE_LIFT), colors.text_line, 1);
            },
            FieldKind::HeaderInfo => draw_box(&mut canvas, field.rect(), colors.header, colors.thickness),
        }
    }

    canvas
}

/// Hollow rectangle `thickness` pixels wide, growing inwards.
fn draw_box(canvas: &mut RgbImage, rect: PixelRect, color: Rgb<u8>, thickness: u32) {
    let Some(rect) = rect.clamp_to(canvas.width(), canvas.height()) else {
        return;
    };
    for inset in 0..thickness.max(1) {
        if rect.w <= inset * 2 || rect.h <= inset * 2 {
            break;
        }
        let outline = Rect::at((rect.x + inset) as i32, (rect.y + inset) as i32)
            .of_size(rect.w - inset * 2, rect.h - inset * 2);
        draw_hollow_rect_mut(canvas, outline, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Polarity;
    use crate::layout::{Nesting, Shape};
    use crate::structure::{load_sections, Checkbox, SectionKind};

    fn structure_with_checkbox(page: usize, empty: bool) -> DocumentStructure {
        DocumentStructure {
            sections: load_sections().unwrap(),
            first_four: Vec::new(),
            found_count: 1,
            selections: None,
            checkboxes: vec![Checkbox {
                shape: Shape::solid(PixelRect::new(10, 10, 20, 20), page, Nesting::TopLevel),
                ordinal: 1,
                section: SectionKind::Positions,
                is_section_empty: empty,
                fill_darkness: 250.0,
            }],
            page_count: 2,
            addendum: None,
            canonical_size: None,
            polarity: Polarity::TopLevel,
        }
    }

    #[test]
    fn test_checkbox_outline_drawn() {
        let page = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        let colors = OverlayColors::default();
        let out = render_overlay(&page, 0, &structure_with_checkbox(0, false));
        assert_eq!(*out.get_pixel(10, 10), colors.checkbox);
        assert_eq!(*out.get_pixel(20, 20), Rgb([255, 255, 255]));

        let empty = render_overlay(&page, 0, &structure_with_checkbox(0, true));
        assert_eq!(*empty.get_pixel(10, 10), colors.empty_checkbox);
    }

    #[test]
    fn test_other_pages_untouched() {
        let page = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        let out = render_overlay(&page, 1, &structure_with_checkbox(0, false));
        assert_eq!(out, page);
    }

    #[test]
    fn test_draw_box_off_canvas_is_noop() {
        let mut canvas = RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]));
        draw_box(&mut canvas, PixelRect::new(20, 20, 5, 5), Rgb([255, 0, 0]), 2);
        assert!(canvas.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }
}
