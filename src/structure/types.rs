//! Output types of the document structure.
//!
//! The serialized form of [`DocumentStructure`] is the contract handed to the
//! text-recognition stage: for every section, its column names, whether it was
//! marked empty, and the page regions of each recovered row.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::Polarity;
use crate::error::Result;
use crate::geometry::PixelRect;
use crate::layout::Shape;

/// The eight fixed sections of the form, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SectionKind {
    /// I. Positions
    #[serde(rename = "Positions")]
    Positions,
    /// II. Agreements
    #[serde(rename = "Agreements")]
    Agreements,
    /// III-A. Filer's non-investment income
    #[serde(rename = "Non-Investment Income")]
    NonInvestmentIncome,
    /// III-B. Spouse's non-investment income
    #[serde(rename = "Spouse Non-Investment Income")]
    SpouseNonInvestmentIncome,
    /// IV. Reimbursements
    #[serde(rename = "Reimbursements")]
    Reimbursements,
    /// V. Gifts
    #[serde(rename = "Gifts")]
    Gifts,
    /// VI. Liabilities
    #[serde(rename = "Liabilities")]
    Liabilities,
    /// VII. Investments and trusts
    #[serde(rename = "Investments and Trusts")]
    InvestmentsAndTrusts,
}

impl SectionKind {
    /// Every section, ordered by ordinal.
    pub const ALL: [SectionKind; 8] = [
        SectionKind::Positions,
        SectionKind::Agreements,
        SectionKind::NonInvestmentIncome,
        SectionKind::SpouseNonInvestmentIncome,
        SectionKind::Reimbursements,
        SectionKind::Gifts,
        SectionKind::Liabilities,
        SectionKind::InvestmentsAndTrusts,
    ];

    /// One-based position of the section on the form.
    pub fn ordinal(self) -> u8 {
        match self {
            SectionKind::Positions => 1,
            SectionKind::Agreements => 2,
            SectionKind::NonInvestmentIncome => 3,
            SectionKind::SpouseNonInvestmentIncome => 4,
            SectionKind::Reimbursements => 5,
            SectionKind::Gifts => 6,
            SectionKind::Liabilities => 7,
            SectionKind::InvestmentsAndTrusts => 8,
        }
    }

    /// Section for a one-based ordinal.
    ///
    /// # Examples
    ///
    /// ```
    /// use disclosure_oxide::structure::SectionKind;
    ///
    /// assert_eq!(SectionKind::from_ordinal(3), Some(SectionKind::NonInvestmentIncome));
    /// assert_eq!(SectionKind::from_ordinal(9), None);
    /// ```
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get((ordinal as usize).checked_sub(1)?).copied()
    }

    /// Printed section title.
    pub fn name(self) -> &'static str {
        match self {
            SectionKind::Positions => "Positions",
            SectionKind::Agreements => "Agreements",
            SectionKind::NonInvestmentIncome => "Non-Investment Income",
            SectionKind::SpouseNonInvestmentIncome => "Spouse Non-Investment Income",
            SectionKind::Reimbursements => "Reimbursements",
            SectionKind::Gifts => "Gifts",
            SectionKind::Liabilities => "Liabilities",
            SectionKind::InvestmentsAndTrusts => "Investments and Trusts",
        }
    }

    /// Look a section up by its printed title.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What kind of form element a field region came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Cell of the investments grid
    TableCell,
    /// Entry line of a text section
    TextLine,
    /// Page-1 header box
    HeaderInfo,
}

/// A field region handed to text recognition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldBox {
    /// X coordinate of the left edge
    pub x: u32,
    /// Y coordinate of the top edge
    pub y: u32,
    /// Width in pixels
    pub w: u32,
    /// Height in pixels
    pub h: u32,
    /// Zero-based page index
    pub page: usize,
    /// Owning section
    pub section: SectionKind,
    /// Source element kind
    pub kind: FieldKind,
}

impl FieldBox {
    /// Build a field from a detected shape.
    pub fn from_shape(shape: &Shape, section: SectionKind, kind: FieldKind) -> Self {
        Self {
            x: shape.rect.x,
            y: shape.rect.y,
            w: shape.rect.w,
            h: shape.rect.h,
            page: shape.page,
            section,
            kind,
        }
    }

    /// The detected box.
    pub fn rect(&self) -> PixelRect {
        PixelRect::new(self.x, self.y, self.w, self.h)
    }

    /// The region text recognition should read.
    ///
    /// Answers are written above an entry line, so text lines reach `lift`
    /// pixels up from the line; table cells read their own box.
    ///
    /// # Examples
    ///
    /// ```
    /// use disclosure_oxide::structure::{FieldBox, FieldKind, SectionKind};
    ///
    /// let line = FieldBox {
    ///     x: 100, y: 500, w: 400, h: 4, page: 1,
    ///     section: SectionKind::Gifts,
    ///     kind: FieldKind::TextLine,
    /// };
    /// let crop = line.crop_region(60);
    /// assert_eq!((crop.y, crop.h), (440, 64));
    /// ```
    pub fn crop_region(&self, lift: u32) -> PixelRect {
        match self.kind {
            FieldKind::TextLine => {
                let top = self.y.saturating_sub(lift);
                PixelRect::new(self.x, top, self.w, self.y + self.h - top)
            },
            FieldKind::TableCell | FieldKind::HeaderInfo => self.rect(),
        }
    }
}

/// One recovered record: column name to field region, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: IndexMap<String, FieldBox>,
}

impl Row {
    /// Zip column names with fields ordered left to right.
    pub fn from_columns<'a>(
        columns: impl IntoIterator<Item = &'a String>,
        fields: impl IntoIterator<Item = FieldBox>,
    ) -> Self {
        Self {
            cells: columns.into_iter().cloned().zip(fields).collect(),
        }
    }

    /// Number of filled columns.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Field of a column.
    pub fn get(&self, column: &str) -> Option<&FieldBox> {
        self.cells.get(column)
    }

    /// Columns in order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldBox)> {
        self.cells.iter()
    }
}

/// One section of the form with its recovered rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    /// Which section this is
    #[serde(skip)]
    pub kind: SectionKind,
    /// One-based position on the form
    pub order: u8,
    /// Column names, left to right
    pub fields: Vec<String>,
    /// The filer ticked this section's "none" box
    pub empty: bool,
    /// Rows by row index
    pub rows: BTreeMap<usize, Row>,
}

impl Section {
    /// Create a section with no rows.
    pub fn new(kind: SectionKind, fields: Vec<String>) -> Self {
        Self {
            kind,
            order: kind.ordinal(),
            fields,
            empty: false,
            rows: BTreeMap::new(),
        }
    }

    /// Number of columns a valid row has.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// A section checkbox found on a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Checkbox {
    /// Detected box
    pub shape: Shape,
    /// One-based discovery ordinal, at most 8
    pub ordinal: u8,
    /// Section the ordinal stands for
    pub section: SectionKind,
    /// The box is ticked, so the section has no entries
    pub is_section_empty: bool,
    /// Mean brightness inside the box
    pub fill_darkness: f32,
}

/// Filer-type selections from the five small page-1 boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilerSelections {
    /// Nomination report
    pub nomination: bool,
    /// Initial report
    pub initial: bool,
    /// Annual report
    pub annual: bool,
    /// Final report
    #[serde(rename = "final")]
    pub final_report: bool,
    /// Amended report
    pub amended: bool,
}

impl FilerSelections {
    /// Read the selections from exactly five marks of `(box, brightness)`.
    ///
    /// The top-most mark is the nomination box and the bottom-most the
    /// amended box; the middle three, left to right, are initial, annual and
    /// final. A mark darker than `threshold` is ticked. Any other number of
    /// marks yields `None`.
    pub fn from_marks(marks: &[(PixelRect, f32)], threshold: f32) -> Option<Self> {
        if marks.len() != 5 {
            return None;
        }
        let mut by_y = marks.to_vec();
        by_y.sort_by_key(|(rect, _)| (rect.y, rect.x));
        let mut middle = by_y[1..4].to_vec();
        middle.sort_by_key(|(rect, _)| (rect.x, rect.y));

        let ticked = |mark: &(PixelRect, f32)| mark.1 < threshold;
        Some(Self {
            nomination: ticked(&by_y[0]),
            initial: ticked(&middle[0]),
            annual: ticked(&middle[1]),
            final_report: ticked(&middle[2]),
            amended: ticked(&by_y[4]),
        })
    }
}

/// The named page-1 header fields, bottom box first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderField {
    /// Reporting period
    ReportingPeriod,
    /// Date of report
    DateOfReport,
    /// Court or organisation
    Court,
    /// Filer name
    Judge,
}

impl HeaderField {
    /// Header fields from the lowest box upwards.
    pub const ALL: [HeaderField; 4] = [
        HeaderField::ReportingPeriod,
        HeaderField::DateOfReport,
        HeaderField::Court,
        HeaderField::Judge,
    ];
}

/// A page-1 header box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeaderBox {
    /// Which header field the box holds
    pub field: HeaderField,
    /// Detected box
    pub rect: PixelRect,
}

impl HeaderBox {
    /// Name detected header boxes.
    ///
    /// Fields are handed out from the bottom of the page upwards, so the
    /// lowest box holds the reporting period. Boxes beyond the fourth are
    /// left unnamed and dropped.
    pub fn name_boxes(rects: &[PixelRect]) -> Vec<HeaderBox> {
        let mut bottom_up = rects.to_vec();
        bottom_up.sort_by_key(|r| std::cmp::Reverse((r.y, r.x)));
        HeaderField::ALL
            .iter()
            .zip(bottom_up)
            .map(|(field, rect)| HeaderBox { field: *field, rect })
            .collect()
    }

    /// The region text recognition should read.
    ///
    /// Only the reporting-period box is read as detected; the others carry
    /// their printed label at the top, so the read window is pushed down and
    /// shortened.
    pub fn crop_region(&self) -> PixelRect {
        match self.field {
            HeaderField::ReportingPeriod => self.rect,
            _ => PixelRect::new(
                self.rect.x,
                (self.rect.y as f32 * 1.2).round() as u32,
                self.rect.w,
                (self.rect.h as f32 * 0.7).round() as u32,
            ),
        }
    }
}

/// A full-width band of one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageRegion {
    /// Zero-based page index
    pub page: usize,
    /// Region in page pixels
    pub rect: PixelRect,
}

impl PageRegion {
    /// The free-text addendum: the second-to-last page (the only page of a
    /// one-page document), from 15% to 95% of its height.
    pub fn addendum(page_sizes: &[(u32, u32)]) -> Option<Self> {
        let page = page_sizes.len().checked_sub(2).or_else(|| page_sizes.len().checked_sub(1))?;
        let (width, height) = page_sizes[page];
        let top = (height as f32 * 0.15).round() as u32;
        let bottom = (height as f32 * 0.95).round() as u32;
        Some(Self {
            page,
            rect: PixelRect::new(0, top, width, bottom.saturating_sub(top)),
        })
    }
}

/// The recovered layout of one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentStructure {
    /// Sections by kind, in form order
    pub sections: IndexMap<SectionKind, Section>,
    /// Page-1 header boxes
    pub first_four: Vec<HeaderBox>,
    /// Number of section checkboxes found
    pub found_count: usize,
    /// Filer-type selections, when all five boxes were found
    pub selections: Option<FilerSelections>,
    /// Section checkboxes in discovery order
    pub checkboxes: Vec<Checkbox>,
    /// Number of pages processed
    pub page_count: usize,
    /// Free-text addendum region
    pub addendum: Option<PageRegion>,
    /// Page size the coordinates refer to when pages were rescaled
    pub canonical_size: Option<(u32, u32)>,
    /// Nesting hypothesis that produced the structure
    pub polarity: Polarity,
}

impl DocumentStructure {
    /// Section of a kind.
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.get(&kind)
    }

    /// Total rows across all sections.
    pub fn row_count(&self) -> usize {
        self.sections.values().map(|s| s.rows.len()).sum()
    }

    /// Map a rectangle of this structure onto a page raster of `page_size`.
    ///
    /// Coordinates refer to `canonical_size` when pages were rescaled; this
    /// brings them back to the caller's rasters. Otherwise the rectangle is
    /// returned as is.
    pub fn to_page_rect(&self, rect: PixelRect, page_size: (u32, u32)) -> PixelRect {
        match self.canonical_size {
            Some((width, height)) if (width, height) != page_size && width > 0 && height > 0 => rect.scaled(
                page_size.0 as f32 / width as f32,
                page_size.1 as f32 / height as f32,
            ),
            _ => rect,
        }
    }

    /// Render the structure as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
