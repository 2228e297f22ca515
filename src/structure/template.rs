//! Section template.
//!
//! Column names and order of the eight sections ship with the crate as JSON.
//! Every extraction attempt starts from a freshly parsed copy.

use indexmap::IndexMap;
use serde::Deserialize;

use super::types::{Section, SectionKind};
use crate::error::{Error, Result};

const TEMPLATE_JSON: &str = include_str!("template.json");

#[derive(Debug, Deserialize)]
struct TemplateEntry {
    order: u8,
    fields: Vec<String>,
}

/// Load the built-in section template.
///
/// # Examples
///
/// ```
/// use disclosure_oxide::structure::{load_sections, SectionKind};
///
/// let sections = load_sections().unwrap();
/// assert_eq!(sections.len(), 8);
/// assert_eq!(sections[&SectionKind::InvestmentsAndTrusts].fields.len(), 10);
/// ```
pub fn load_sections() -> Result<IndexMap<SectionKind, Section>> {
    parse_sections(TEMPLATE_JSON)
}

/// Parse a section template.
///
/// The template maps section titles to `{order, fields}`. Every section must
/// be present exactly once with its form ordinal and at least one column.
/// Sections come back in ordinal order whatever the order in the JSON.
pub fn parse_sections(json: &str) -> Result<IndexMap<SectionKind, Section>> {
    let entries: IndexMap<String, TemplateEntry> = serde_json::from_str(json)?;

    let mut sections = IndexMap::with_capacity(SectionKind::ALL.len());
    for (name, entry) in entries {
        let kind = SectionKind::from_name(&name)
            .ok_or_else(|| Error::Template(format!("unknown section '{}'", name)))?;
        if entry.order != kind.ordinal() {
            return Err(Error::Template(format!(
                "section '{}' has order {}, expected {}",
                name,
                entry.order,
                kind.ordinal()
            )));
        }
        if entry.fields.is_empty() {
            return Err(Error::Template(format!("section '{}' has no fields", name)));
        }
        if sections.insert(kind, Section::new(kind, entry.fields)).is_some() {
            return Err(Error::Template(format!("section '{}' listed twice", name)));
        }
    }

    if let Some(missing) = SectionKind::ALL.iter().find(|k| !sections.contains_key(*k)) {
        return Err(Error::Template(format!("section '{}' missing", missing)));
    }
    sections.sort_by(|a, _, b, _| a.cmp(b));
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_template() {
        let sections = load_sections().unwrap();
        let kinds: Vec<_> = sections.keys().copied().collect();
        assert_eq!(kinds, SectionKind::ALL.to_vec());
        for (kind, section) in &sections {
            assert_eq!(section.kind, *kind);
            assert_eq!(section.order, kind.ordinal());
            assert!(!section.empty);
            assert!(section.rows.is_empty());
        }
        assert_eq!(sections[&SectionKind::Positions].fields, vec!["Position", "Name of Organization"]);
        assert_eq!(sections[&SectionKind::Reimbursements].field_count(), 5);
    }

    #[test]
    fn test_missing_section_rejected() {
        let json = r#"{"Positions": {"order": 1, "fields": ["Position"]}}"#;
        let err = parse_sections(json).unwrap_err();
        assert!(matches!(err, Error::Template(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_wrong_order_rejected() {
        let json = r#"{"Gifts": {"order": 2, "fields": ["Source"]}}"#;
        assert!(matches!(parse_sections(json), Err(Error::Template(_))));
    }

    #[test]
    fn test_unknown_section_rejected() {
        let json = r#"{"Addendum": {"order": 9, "fields": ["Text"]}}"#;
        assert!(matches!(parse_sections(json), Err(Error::Template(_))));
    }

    #[test]
    fn test_bad_json_is_json_error() {
        assert!(matches!(parse_sections("{"), Err(Error::Json(_))));
    }
}
