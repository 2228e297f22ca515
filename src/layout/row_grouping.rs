//! Row grouping engine.
//!
//! Shapes are sorted by page and top edge and swept once. Each shape claims
//! the band `[y, y + band)`; the next shape joins the current row when it
//! starts inside the band of the shape before it and a new row starts
//! otherwise. Rows never cross pages.
//!
//! A row is only accepted when it has exactly as many members as its section
//! has columns. Anything else is scan noise and is dropped whole.

use std::collections::HashMap;

use indexmap::IndexMap;

use super::section_mapper::ClassifiedShape;
use crate::structure::{FieldBox, Row, Section, SectionKind};

/// Split shapes into vertical bands.
///
/// The input order is only used to break ties between shapes with the same
/// page and top edge.
///
/// # Examples
///
/// ```
/// use disclosure_oxide::geometry::PixelRect;
/// use disclosure_oxide::layout::{group_rows, ClassifiedShape, Nesting, Shape};
/// use disclosure_oxide::structure::{FieldKind, SectionKind};
///
/// let cell = |x, y| ClassifiedShape {
///     shape: Shape::solid(PixelRect::new(x, y, 80, 50), 0, Nesting::TopLevel),
///     kind: FieldKind::TableCell,
///     section: SectionKind::InvestmentsAndTrusts,
/// };
/// let groups = group_rows(&[cell(0, 100), cell(100, 104), cell(0, 200)], 10);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].len(), 2);
/// ```
pub fn group_rows(shapes: &[ClassifiedShape], band: u32) -> Vec<Vec<ClassifiedShape>> {
    let mut sorted = shapes.to_vec();
    sorted.sort_by_key(|s| (s.shape.page, s.shape.rect.y));

    let mut groups: Vec<Vec<ClassifiedShape>> = Vec::new();
    let mut previous: Option<&ClassifiedShape> = None;
    for shape in &sorted {
        let same_row = previous.is_some_and(|prev| {
            prev.shape.page == shape.shape.page && shape.shape.rect.y < prev.shape.rect.y + band
        });
        match groups.last_mut() {
            Some(group) if same_row => group.push(*shape),
            _ => groups.push(vec![*shape]),
        }
        previous = Some(shape);
    }
    groups
}

fn left_to_right(mut members: Vec<ClassifiedShape>) -> Vec<ClassifiedShape> {
    members.sort_by_key(|m| m.shape.rect.x);
    members
}

fn build_row(section: &Section, members: &[ClassifiedShape]) -> Row {
    let fields = members
        .iter()
        .map(|m| FieldBox::from_shape(&m.shape, section.kind, m.kind));
    Row::from_columns(&section.fields, fields)
}

/// Turn investment grid cells into rows.
///
/// Rows are numbered from 0 in the order they are found. Returns the number
/// of rows added.
pub fn assign_investment_rows(
    sections: &mut IndexMap<SectionKind, Section>,
    cells: &[ClassifiedShape],
    band: u32,
    emptiness: &HashMap<SectionKind, bool>,
) -> usize {
    let Some(section) = sections.get_mut(&SectionKind::InvestmentsAndTrusts) else {
        return 0;
    };

    let mut row_index = 0;
    for group in group_rows(cells, band) {
        if group.len() != section.field_count() {
            log::debug!(
                "Dropping {}-cell row on page {} at y={}",
                group.len(),
                group[0].shape.page,
                group[0].shape.rect.y
            );
            continue;
        }
        let row = build_row(section, &left_to_right(group));
        section.rows.insert(row_index, row);
        section.empty = emptiness.get(&section.kind).copied().unwrap_or(false);
        row_index += 1;
    }
    row_index
}

/// Turn mapped text lines into rows of the text sections.
///
/// Lines of the investments section are ignored. The row belongs to the
/// section of its first line and must have that section's column count, at
/// least two lines, and a first column starting no further right than
/// `max_left_x`. Row numbers run on across sections and restart at 0 when a
/// section gets its first row. Returns the number of rows added.
pub fn assign_text_rows(
    sections: &mut IndexMap<SectionKind, Section>,
    lines: &[ClassifiedShape],
    band: u32,
    max_left_x: u32,
    emptiness: &HashMap<SectionKind, bool>,
) -> usize {
    let mut row_index = 0;
    let mut added = 0;
    for group in group_rows(lines, band) {
        let members: Vec<ClassifiedShape> = group
            .into_iter()
            .filter(|m| m.section != SectionKind::InvestmentsAndTrusts)
            .collect();
        if members.len() < 2 {
            continue;
        }
        let Some(section) = sections.get_mut(&members[0].section) else {
            continue;
        };
        if section.rows.is_empty() {
            row_index = 0;
        }
        if members.len() != section.field_count() {
            log::debug!(
                "Dropping {}-line row of {} on page {}: expected {} columns",
                members.len(),
                section.kind,
                members[0].shape.page,
                section.field_count()
            );
            continue;
        }
        let members = left_to_right(members);
        if members[0].shape.rect.x > max_left_x {
            log::debug!(
                "Dropping row of {} on page {}: starts at x={}",
                section.kind,
                members[0].shape.page,
                members[0].shape.rect.x
            );
            continue;
        }

        // Never overwrite a row the section already has.
        if section.rows.contains_key(&row_index) {
            row_index = section.rows.keys().next_back().map_or(0, |last| last + 1);
        }
        let row = build_row(section, &members);
        section.rows.insert(row_index, row);
        section.empty = emptiness.get(&section.kind).copied().unwrap_or(false);
        row_index += 1;
        added += 1;
    }
    added
}
