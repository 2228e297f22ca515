//! Page aggregation and the retry controller.
//!
//! An extraction runs the whole pipeline (mask, classify, merge, map, group)
//! under one hypothesis about how the scanner rendered the checkboxes. If the
//! first pass does not find every section checkbox, the pipeline runs once
//! more under the alternate hypothesis, starting from a fresh section
//! template. A second miss is reported as [`Error::CheckboxesNotFound`].
//!
//! ```text
//! FirstPass(h0) --found < required--> Retry(h1) --found < required--> error
//!       |                                  |
//!       +------------- ok -----------------+--> DocumentStructure
//! ```

use std::borrow::Cow;

use image::imageops::{self, FilterType};
use image::RgbImage;
use rayon::prelude::*;

use crate::config::{ExtractorConfig, Polarity, RetryStrategy};
use crate::error::{Error, Result};
use crate::layout::{
    assign_investment_rows, assign_text_rows, map_cells, map_lines, section_emptiness, PageScan,
    ShapeAccumulator, ShapeClassifier,
};
use crate::structure::{load_sections, DocumentStructure, HeaderBox, HeaderField, PageRegion};

/// Assumptions one extraction attempt runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hypothesis {
    /// Nesting level treated as the checkbox outline
    pub polarity: Polarity,
    /// Size every page is resized to first, if any
    pub page_size: Option<(u32, u32)>,
}

/// State of the retry controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// The first pass
    FirstPass(Hypothesis),
    /// The single retry
    Retry(Hypothesis),
}

impl Attempt {
    /// The first attempt for `config`.
    pub fn first(config: &ExtractorConfig) -> Self {
        Attempt::FirstPass(Hypothesis {
            polarity: config.polarity,
            page_size: None,
        })
    }

    /// The attempt to make after this one failed, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use disclosure_oxide::config::{ExtractorConfig, Polarity};
    /// use disclosure_oxide::extractor::Attempt;
    ///
    /// let config = ExtractorConfig::default();
    /// let retry = Attempt::first(&config).next(&config).unwrap();
    /// assert_eq!(retry.hypothesis().polarity, Polarity::Nested);
    /// assert!(retry.next(&config).is_none());
    /// ```
    pub fn next(self, config: &ExtractorConfig) -> Option<Attempt> {
        match self {
            Attempt::FirstPass(h) => {
                let alternate = match config.retry {
                    RetryStrategy::FlipPolarity => Hypothesis {
                        polarity: h.polarity.flipped(),
                        ..h
                    },
                    RetryStrategy::Rescale { width, height } => Hypothesis {
                        page_size: Some((width, height)),
                        ..h
                    },
                };
                Some(Attempt::Retry(alternate))
            },
            Attempt::Retry(_) => None,
        }
    }

    /// Hypothesis of this attempt.
    pub fn hypothesis(&self) -> Hypothesis {
        match self {
            Attempt::FirstPass(h) | Attempt::Retry(h) => *h,
        }
    }

    /// Whether this is the retry.
    pub fn is_retry(&self) -> bool {
        matches!(self, Attempt::Retry(_))
    }
}

/// Recovers the [`DocumentStructure`] of a scanned form.
#[derive(Debug, Clone, Default)]
pub struct LayoutExtractor {
    config: ExtractorConfig,
}

impl LayoutExtractor {
    /// Create an extractor.
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Recover the structure of a document from its page rasters.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyDocument`] for no pages
    /// - [`Error::InvalidPage`] for a page with no pixels
    /// - [`Error::CheckboxesNotFound`] when neither hypothesis finds every
    ///   section checkbox
    pub fn extract(&self, pages: &[RgbImage]) -> Result<DocumentStructure> {
        validate_pages(pages)?;

        let mut attempt = Attempt::first(&self.config);
        loop {
            let hypothesis = attempt.hypothesis();
            log::info!(
                "Extracting structure of {} pages ({}, polarity {:?}, rescale {:?})",
                pages.len(),
                if attempt.is_retry() { "retry" } else { "first pass" },
                hypothesis.polarity,
                hypothesis.page_size
            );

            let structure = self.run_attempt(pages, hypothesis)?;
            log::info!(
                "Found {} of {} section checkboxes, {} rows",
                structure.found_count,
                self.config.required_checkboxes,
                structure.row_count()
            );
            if structure.found_count >= self.config.required_checkboxes {
                return Ok(structure);
            }

            match attempt.next(&self.config) {
                Some(next) => {
                    log::warn!(
                        "Only {} section checkboxes found, retrying with {:?}",
                        structure.found_count,
                        next.hypothesis()
                    );
                    attempt = next;
                },
                None => {
                    log::warn!("Section checkboxes not found after retry ({})", structure.found_count);
                    return Err(Error::CheckboxesNotFound {
                        found: structure.found_count,
                        required: self.config.required_checkboxes,
                    });
                },
            }
        }
    }

    /// Run the pipeline once under `hypothesis`, without judging the result.
    pub fn run_attempt(&self, pages: &[RgbImage], hypothesis: Hypothesis) -> Result<DocumentStructure> {
        let mut sections = load_sections()?;
        let classifier = ShapeClassifier::new(hypothesis.polarity);

        let scan = |(index, page): (usize, &RgbImage)| -> PageScan {
            let page = prepare_page(page, hypothesis.page_size);
            classifier.scan_page(index, &page)
        };
        let scans: Vec<PageScan> = if self.config.parallel {
            pages.par_iter().enumerate().map(scan).collect()
        } else {
            pages.iter().enumerate().map(scan).collect()
        };

        let page_sizes: Vec<(u32, u32)> = scans
            .iter()
            .map(|s| (s.geometry.width, s.geometry.height))
            .collect();

        let mut accumulator = ShapeAccumulator::new(&self.config);
        for scan in scans {
            accumulator.merge(scan);
        }

        let checkboxes = accumulator.checkboxes().to_vec();
        let emptiness = section_emptiness(&checkboxes);
        let cells = map_cells(accumulator.cells());
        let lines = map_lines(accumulator.lines(), &checkboxes);

        let band = self.config.row_band;
        let investment_rows = assign_investment_rows(&mut sections, &cells, band, &emptiness);
        let text_rows =
            assign_text_rows(&mut sections, &lines, band, self.config.row_max_left_x, &emptiness);
        log::debug!(
            "{} cells, {} lines -> {} investment rows, {} text rows",
            cells.len(),
            lines.len(),
            investment_rows,
            text_rows
        );

        let header_rects: Vec<_> = accumulator.header_boxes().iter().map(|s| s.rect).collect();
        if header_rects.len() > HeaderField::ALL.len() {
            log::debug!("Ignoring {} extra header boxes", header_rects.len() - HeaderField::ALL.len());
        }
        let first_four = HeaderBox::name_boxes(&header_rects);

        Ok(DocumentStructure {
            sections,
            first_four,
            found_count: checkboxes.len(),
            selections: accumulator.selections(),
            checkboxes,
            page_count: pages.len(),
            addendum: PageRegion::addendum(&page_sizes),
            canonical_size: hypothesis.page_size,
            polarity: hypothesis.polarity,
        })
    }
}

/// Recover a document structure with the default configuration.
pub fn extract_document_structure(pages: &[RgbImage]) -> Result<DocumentStructure> {
    LayoutExtractor::default().extract(pages)
}

fn validate_pages(pages: &[RgbImage]) -> Result<()> {
    if pages.is_empty() {
        return Err(Error::EmptyDocument);
    }
    for (page, image) in pages.iter().enumerate() {
        if image.width() == 0 || image.height() == 0 {
            return Err(Error::InvalidPage {
                page,
                reason: format!("{}x{} raster", image.width(), image.height()),
            });
        }
    }
    Ok(())
}

fn prepare_page(page: &RgbImage, size: Option<(u32, u32)>) -> Cow<'_, RgbImage> {
    match size {
        Some((width, height)) if page.dimensions() != (width, height) => {
            Cow::Owned(imageops::resize(page, width, height, FilterType::CatmullRom))
        },
        _ => Cow::Borrowed(page),
    }
}
