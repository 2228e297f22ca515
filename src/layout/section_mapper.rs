//! Section mapper.
//!
//! The form's sections always run top to bottom, each opened by its
//! checkbox, so an entry line belongs to the section of the nearest checkbox
//! above it on the same page. A line at the top of a page, before any
//! checkbox, continues the last section opened so far.

use std::collections::HashMap;

use super::shape::Shape;
use crate::structure::{Checkbox, FieldKind, SectionKind};

/// A shape with its element kind and owning section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedShape {
    /// Detected shape
    pub shape: Shape,
    /// Element kind
    pub kind: FieldKind,
    /// Owning section
    pub section: SectionKind,
}

/// The checkbox whose section `line` belongs to.
///
/// Among checkboxes on the line's page that sit above it, the lowest one
/// wins. Without one, the checkbox with the highest ordinal on the line's
/// page or an earlier one is used. `None` when there is no such checkbox.
///
/// # Examples
///
/// ```
/// use disclosure_oxide::geometry::PixelRect;
/// use disclosure_oxide::layout::{resolve_section, Nesting, Shape};
/// use disclosure_oxide::structure::{Checkbox, SectionKind};
///
/// let checkbox = |y, ordinal| Checkbox {
///     shape: Shape::solid(PixelRect::new(50, y, 30, 30), 0, Nesting::TopLevel),
///     ordinal,
///     section: SectionKind::from_ordinal(ordinal).unwrap(),
///     is_section_empty: false,
///     fill_darkness: 250.0,
/// };
/// let checkboxes = vec![checkbox(100, 3), checkbox(600, 4)];
/// let line = Shape::solid(PixelRect::new(100, 400, 500, 3), 0, Nesting::Nested);
///
/// let owner = resolve_section(&line, &checkboxes).map(|c| c.section);
/// assert_eq!(owner, Some(SectionKind::NonInvestmentIncome));
/// ```
pub fn resolve_section<'a>(line: &Shape, checkboxes: &'a [Checkbox]) -> Option<&'a Checkbox> {
    let above = checkboxes
        .iter()
        .filter(|c| c.shape.page == line.page && c.shape.rect.y < line.rect.y)
        .max_by_key(|c| c.shape.rect.y);
    if above.is_some() {
        return above;
    }

    let fallback = checkboxes
        .iter()
        .filter(|c| c.shape.page <= line.page)
        .max_by_key(|c| c.ordinal);
    if let Some(checkbox) = fallback {
        log::debug!(
            "Line at page {} y={} has no checkbox above it, continuing section {}",
            line.page,
            line.rect.y,
            checkbox.section
        );
    }
    fallback
}

/// Resolve the section of every text line.
///
/// Lines that cannot be resolved are dropped.
pub fn map_lines(lines: &[Shape], checkboxes: &[Checkbox]) -> Vec<ClassifiedShape> {
    lines
        .iter()
        .filter_map(|line| match resolve_section(line, checkboxes) {
            Some(checkbox) => Some(ClassifiedShape {
                shape: *line,
                kind: FieldKind::TextLine,
                section: checkbox.section,
            }),
            None => {
                log::debug!("Dropping line at page {} y={}: no checkbox known", line.page, line.rect.y);
                None
            },
        })
        .collect()
}

/// Tag table cells with the investments section.
pub fn map_cells(cells: &[Shape]) -> Vec<ClassifiedShape> {
    cells
        .iter()
        .map(|cell| ClassifiedShape {
            shape: *cell,
            kind: FieldKind::TableCell,
            section: SectionKind::InvestmentsAndTrusts,
        })
        .collect()
}

/// Emptiness flag of each section, from its checkbox.
///
/// When the ordinal cap makes several checkboxes share a section, the last
/// one found decides.
pub fn section_emptiness(checkboxes: &[Checkbox]) -> HashMap<SectionKind, bool> {
    checkboxes
        .iter()
        .map(|c| (c.section, c.is_section_empty))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PixelRect;
    use crate::layout::Nesting;

    fn checkbox(page: usize, y: u32, ordinal: u8) -> Checkbox {
        Checkbox {
            shape: Shape::solid(PixelRect::new(50, y, 30, 30), page, Nesting::TopLevel),
            ordinal,
            section: SectionKind::from_ordinal(ordinal).unwrap(),
            is_section_empty: false,
            fill_darkness: 250.0,
        }
    }

    fn line(page: usize, y: u32) -> Shape {
        Shape::solid(PixelRect::new(100, y, 500, 3), page, Nesting::Nested)
    }

    #[test]
    fn test_nearest_checkbox_above_wins() {
        let boxes = vec![checkbox(0, 100, 1), checkbox(0, 500, 2), checkbox(0, 900, 3)];
        assert_eq!(resolve_section(&line(0, 600), &boxes).map(|c| c.ordinal), Some(2));
        assert_eq!(resolve_section(&line(0, 1000), &boxes).map(|c| c.ordinal), Some(3));
    }

    #[test]
    fn test_checkbox_on_same_y_is_not_above() {
        let boxes = vec![checkbox(0, 100, 1), checkbox(0, 500, 2)];
        assert_eq!(resolve_section(&line(0, 500), &boxes).map(|c| c.ordinal), Some(1));
    }

    #[test]
    fn test_falls_back_to_highest_ordinal_so_far() {
        let boxes = vec![
            checkbox(0, 100, 1),
            checkbox(0, 500, 2),
            checkbox(1, 800, 3),
            checkbox(2, 300, 4),
        ];
        // top of page 1, above its only checkbox
        assert_eq!(resolve_section(&line(1, 200), &boxes).map(|c| c.ordinal), Some(3));
        // page with no checkbox at all
        assert_eq!(resolve_section(&line(3, 200), &boxes).map(|c| c.ordinal), Some(4));
    }

    #[test]
    fn test_no_checkbox_known() {
        let boxes = vec![checkbox(2, 100, 1)];
        assert!(resolve_section(&line(0, 500), &boxes).is_none());
        assert!(map_lines(&[line(0, 500)], &boxes).is_empty());
    }

    #[test]
    fn test_map_lines_tags_sections() {
        let boxes = vec![checkbox(0, 100, 1), checkbox(0, 500, 2)];
        let mapped = map_lines(&[line(0, 300), line(0, 700)], &boxes);
        let sections: Vec<_> = mapped.iter().map(|m| m.section).collect();
        assert_eq!(sections, vec![SectionKind::Positions, SectionKind::Agreements]);
        assert!(mapped.iter().all(|m| m.kind == FieldKind::TextLine));
    }

    #[test]
    fn test_section_emptiness_last_wins() {
        let mut a = checkbox(0, 100, 8);
        a.is_section_empty = true;
        let b = checkbox(1, 100, 8);
        let flags = section_emptiness(&[a, b]);
        assert_eq!(flags.get(&SectionKind::InvestmentsAndTrusts), Some(&false));
        assert_eq!(flags.len(), 1);
    }
}
