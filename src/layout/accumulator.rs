//! Cross-page accumulation of classified shapes.
//!
//! Pages can be classified in any order and on any thread, but checkbox
//! ordinals depend on discovery order and two of the classification gates
//! depend on how many checkboxes earlier pages produced. Page scans are
//! therefore merged one at a time, in page order, into a single accumulator
//! owned by the extraction attempt.

use super::classifier::{CheckboxCandidate, PageScan};
use super::shape::Shape;
use crate::config::ExtractorConfig;
use crate::geometry::PixelRect;
use crate::structure::{Checkbox, FilerSelections, SectionKind};

/// Append-only store of everything found so far in one attempt.
#[derive(Debug, Clone)]
pub struct ShapeAccumulator {
    required_checkboxes: usize,
    section_darkness_threshold: f32,
    selector_darkness_threshold: f32,
    checkboxes: Vec<Checkbox>,
    cells: Vec<Shape>,
    lines: Vec<Shape>,
    header_boxes: Vec<Shape>,
    selector_marks: Vec<(PixelRect, f32)>,
    pages_merged: usize,
}

impl ShapeAccumulator {
    /// Create an empty accumulator.
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            required_checkboxes: config.required_checkboxes,
            section_darkness_threshold: config.section_darkness_threshold,
            selector_darkness_threshold: config.selector_darkness_threshold,
            checkboxes: Vec::new(),
            cells: Vec::new(),
            lines: Vec::new(),
            header_boxes: Vec::new(),
            selector_marks: Vec::new(),
            pages_merged: 0,
        }
    }

    /// Merge the scan of the next page.
    ///
    /// Checkboxes get the next ordinals (capped at the number of sections).
    /// Table cells are only kept once the required number of checkboxes is
    /// known, since grid-like shapes before that point are page furniture.
    /// Text lines are only kept when some checkbox is known and the line sits
    /// below the page's highest checkbox.
    pub fn merge(&mut self, scan: PageScan) {
        let top_y = scan.top_checkbox_y();
        let page = scan.geometry.index;

        for candidate in &scan.checkboxes {
            self.push_checkbox(candidate);
        }

        if self.checkboxes.len() >= self.required_checkboxes {
            self.cells.extend(scan.cells);
        } else if !scan.cells.is_empty() {
            log::debug!(
                "Page {}: ignoring {} cells, only {} checkboxes known",
                page,
                scan.cells.len(),
                self.checkboxes.len()
            );
        }

        if !self.checkboxes.is_empty() {
            self.lines
                .extend(scan.lines.into_iter().filter(|line| line.rect.y > top_y));
        }

        self.header_boxes.extend(scan.header_boxes);
        self.selector_marks
            .extend(scan.selectors.iter().map(|s| (s.shape.rect, s.darkness)));
        self.pages_merged += 1;
    }

    fn push_checkbox(&mut self, candidate: &CheckboxCandidate) {
        let max = SectionKind::ALL.len();
        let ordinal = (self.checkboxes.len() + 1).min(max) as u8;
        let section = SectionKind::from_ordinal(ordinal).unwrap_or(SectionKind::InvestmentsAndTrusts);
        self.checkboxes.push(Checkbox {
            shape: candidate.shape,
            ordinal,
            section,
            is_section_empty: candidate.darkness < self.section_darkness_threshold,
            fill_darkness: candidate.darkness,
        });
    }

    /// Section checkboxes found so far.
    pub fn found_count(&self) -> usize {
        self.checkboxes.len()
    }

    /// Number of pages merged.
    pub fn pages_merged(&self) -> usize {
        self.pages_merged
    }

    /// Section checkboxes in discovery order.
    pub fn checkboxes(&self) -> &[Checkbox] {
        &self.checkboxes
    }

    /// Accepted table cells.
    pub fn cells(&self) -> &[Shape] {
        &self.cells
    }

    /// Accepted text-entry lines.
    pub fn lines(&self) -> &[Shape] {
        &self.lines
    }

    /// Header boxes, in page-1 reading order.
    pub fn header_boxes(&self) -> &[Shape] {
        &self.header_boxes
    }

    /// Filer-type selections, when exactly five selector boxes were found.
    pub fn selections(&self) -> Option<FilerSelections> {
        FilerSelections::from_marks(&self.selector_marks, self.selector_darkness_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::classifier::PageGeometry;
    use crate::layout::Nesting;

    fn rect_shape(x: u32, y: u32, w: u32, h: u32, page: usize) -> Shape {
        Shape::solid(PixelRect::new(x, y, w, h), page, Nesting::TopLevel)
    }

    fn scan(page: usize, checkbox_ys: &[u32]) -> PageScan {
        PageScan {
            geometry: PageGeometry::new(page, 1000, 1400),
            checkboxes: checkbox_ys
                .iter()
                .map(|&y| CheckboxCandidate {
                    shape: rect_shape(50, y, 30, 30, page),
                    darkness: 250.0,
                })
                .collect(),
            selectors: Vec::new(),
            cells: Vec::new(),
            lines: Vec::new(),
            header_boxes: Vec::new(),
            noise: 0,
        }
    }

    #[test]
    fn test_ordinals_follow_discovery_and_cap() {
        let mut acc = ShapeAccumulator::new(&ExtractorConfig::default());
        acc.merge(scan(0, &[100, 400, 900]));
        acc.merge(scan(1, &[200, 600]));
        acc.merge(scan(2, &[100, 300, 500, 700, 900]));

        let ordinals: Vec<u8> = acc.checkboxes().iter().map(|c| c.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3, 4, 5, 6, 7, 8, 8, 8]);
        assert_eq!(acc.checkboxes()[3].section, SectionKind::SpouseNonInvestmentIncome);
        assert_eq!(acc.found_count(), 10);
        assert_eq!(acc.pages_merged(), 3);
    }

    #[test]
    fn test_dark_checkbox_marks_section_empty() {
        let mut page = scan(0, &[100, 200]);
        page.checkboxes[1].darkness = 120.0;
        let mut acc = ShapeAccumulator::new(&ExtractorConfig::default());
        acc.merge(page);
        assert!(!acc.checkboxes()[0].is_section_empty);
        assert!(acc.checkboxes()[1].is_section_empty);
        assert_eq!(acc.checkboxes()[1].fill_darkness, 120.0);
    }

    #[test]
    fn test_cells_wait_for_all_checkboxes() {
        let mut acc = ShapeAccumulator::new(&ExtractorConfig::default());
        let mut early = scan(0, &[100, 200, 300, 400, 500, 600, 700]);
        early.cells.push(rect_shape(300, 800, 90, 60, 0));
        acc.merge(early);
        assert!(acc.cells().is_empty());

        let mut later = scan(1, &[100]);
        later.cells.push(rect_shape(300, 800, 90, 60, 1));
        acc.merge(later);
        assert_eq!(acc.cells().len(), 1);
        assert_eq!(acc.cells()[0].page, 1);
    }

    #[test]
    fn test_lines_need_a_checkbox_above() {
        let mut acc = ShapeAccumulator::new(&ExtractorConfig::default());
        let mut first = scan(0, &[]);
        first.lines.push(rect_shape(100, 500, 400, 3, 0));
        acc.merge(first);
        assert!(acc.lines().is_empty());

        let mut second = scan(1, &[300]);
        second.lines.push(rect_shape(100, 200, 400, 3, 1));
        second.lines.push(rect_shape(100, 500, 400, 3, 1));
        acc.merge(second);
        assert_eq!(acc.lines().len(), 1);
        assert_eq!(acc.lines()[0].rect.y, 500);

        // no checkbox on this page: anything below the top edge counts
        let mut third = scan(2, &[]);
        third.lines.push(rect_shape(100, 50, 400, 3, 2));
        acc.merge(third);
        assert_eq!(acc.lines().len(), 2);
    }

    #[test]
    fn test_selections_need_five_marks() {
        let mut acc = ShapeAccumulator::new(&ExtractorConfig::default());
        let mut page = scan(0, &[]);
        for (x, y) in [(500, 100), (400, 200), (600, 200), (800, 200), (500, 300)] {
            page.selectors.push(CheckboxCandidate {
                shape: rect_shape(x, y, 30, 30, 0),
                darkness: if y == 300 { 50.0 } else { 250.0 },
            });
        }
        acc.merge(page);
        let selections = acc.selections().unwrap();
        assert!(selections.amended);
        assert!(!selections.nomination && !selections.initial);

        let empty = ShapeAccumulator::new(&ExtractorConfig::default());
        assert_eq!(empty.selections(), None);
    }
}
