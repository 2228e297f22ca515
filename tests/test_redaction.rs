//! Redaction detection and crop cleanup on field crops cut from extracted pages.

mod common;

use common::*;
use disclosure_oxide::config::TEXT_LINE_LIFT;
use disclosure_oxide::imaging::clean_field_crop;
use disclosure_oxide::structure::{FieldBox, SectionKind};
use disclosure_oxide::{extract_document_structure, RedactionDetector};
use image::{imageops, RgbImage};

fn crop(page: &RgbImage, field: &FieldBox) -> RgbImage {
    let rect = field.crop_region(TEXT_LINE_LIFT);
    imageops::crop_imm(page, rect.x, rect.y, rect.w, rect.h).to_image()
}

/// The sample form with a solid block printed over the Positions answer.
fn redacted_form() -> Vec<RgbImage> {
    let mut pages = sample_form();
    fill(&mut pages[0], 100, 385, 120, 26, BLACK);
    pages
}

#[test]
fn test_redacted_answer_detected() {
    init_logging();
    let pages = redacted_form();
    let structure = extract_document_structure(&pages).unwrap();
    let row = &structure.section(SectionKind::Positions).unwrap().rows[&0];

    let position = crop(&pages[0], row.get("Position").unwrap());
    let organization = crop(&pages[0], row.get("Name of Organization").unwrap());

    let detector = RedactionDetector::new();
    assert!(detector.contains_redaction(&position));
    assert!(!detector.contains_redaction(&organization));
    assert_eq!(detector.scan_crops(&[organization, position]), vec![false, true]);
}

#[test]
fn test_block_does_not_disturb_layout() {
    let plain = extract_document_structure(&sample_form()).unwrap();
    let redacted = extract_document_structure(&redacted_form()).unwrap();
    assert_eq!(plain.row_count(), redacted.row_count());
    assert_eq!(plain.found_count, redacted.found_count);
}

#[test]
fn test_clean_crop_drops_entry_line() {
    let mut pages = sample_form();
    // pen strokes above the Gifts source line
    for x in [120, 135, 150, 165] {
        fill(&mut pages[1], x, 612, 6, 6, BLACK);
    }
    let structure = extract_document_structure(&pages).unwrap();
    let row = &structure.section(SectionKind::Gifts).unwrap().rows[&0];

    let raw = crop(&pages[1], row.get("Source").unwrap());
    let cleaned = clean_field_crop(&raw);
    assert!(cleaned.height() < raw.height());
    assert!(cleaned.width() < raw.width());
}
