//! Per-collection configuration
//!
//! Each collection (awards, journals, ...) lives in one worksheet and is
//! described by a [`CollectionSpec`]: where its sheet is, how many header rows
//! precede the data and which field each column holds.

use crate::error::{PortalError, PortalResult};
use crate::mapper::TabularDataset;
use crate::types::{text_row, RawRow};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Configuration of one record collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSpec {
    /// URL identifier, e.g. `research-grants`
    pub id: String,
    /// Caption written into the first header row of a seeded sheet
    pub title: String,
    /// Worksheet name
    pub sheet: String,
    pub header_rows: usize,
    /// Column order: position i of a data row holds `fields[i]`
    pub fields: Vec<String>,
    /// Fields that must be present and non-blank on insert
    #[serde(default)]
    pub required: Vec<String>,
    /// Boolean form fields stored as "Yes"/"No"
    #[serde(default)]
    pub flags: Vec<String>,
    /// Column captions for the last header row; falls back to field names
    #[serde(default)]
    pub captions: Vec<String>,
}

impl CollectionSpec {
    pub fn new(id: &str, title: &str, sheet: &str, header_rows: usize, fields: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            sheet: sheet.to_string(),
            header_rows,
            fields: fields.iter().map(|f| f.to_string()).collect(),
            required: Vec::new(),
            flags: Vec::new(),
            captions: Vec::new(),
        }
    }

    pub fn with_required(mut self, fields: &[&str]) -> Self {
        self.required = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_flags(mut self, fields: &[&str]) -> Self {
        self.flags = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_captions(mut self, captions: &[&str]) -> Self {
        self.captions = captions.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn is_flag(&self, field: &str) -> bool {
        self.flags.iter().any(|f| f == field)
    }

    /// Wrap a raw grid loaded for this collection.
    pub fn dataset(&self, rows: Vec<RawRow>) -> PortalResult<TabularDataset> {
        TabularDataset::builder()
            .header_rows(self.header_rows)
            .fields(self.fields.iter().cloned())
            .rows(rows)
            .build()
    }

    /// Header block for a freshly created sheet.
    ///
    /// Title first, captions last, blank rows in between.
    pub fn seed_header(&self) -> Vec<RawRow> {
        match self.header_rows {
            0 => Vec::new(),
            1 => vec![text_row(&[&self.title])],
            n => {
                let captions = if self.captions.is_empty() {
                    &self.fields
                } else {
                    &self.captions
                };
                let mut rows = Vec::with_capacity(n);
                rows.push(text_row(&[&self.title]));
                rows.resize(n - 1, Vec::new());
                rows.push(text_row(captions.as_slice()));
                rows
            }
        }
    }

    /// Check that required/flag/caption lists agree with `fields`.
    pub fn validate(&self) -> PortalResult<()> {
        if self.id.trim().is_empty() {
            return Err(PortalError::Config("collection id must not be empty".to_string()));
        }
        if self.sheet.trim().is_empty() {
            return Err(PortalError::Config(format!(
                "collection '{}' has no sheet name",
                self.id
            )));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.as_str()) {
                return Err(PortalError::Config(format!(
                    "collection '{}' lists field '{}' twice",
                    self.id, field
                )));
            }
        }

        for (kind, list) in [("required", &self.required), ("flag", &self.flags)] {
            if let Some(unknown) = list.iter().find(|f| !seen.contains(f.as_str())) {
                return Err(PortalError::Config(format!(
                    "collection '{}': {} field '{}' is not in fields",
                    self.id, kind, unknown
                )));
            }
        }

        if !self.captions.is_empty() && self.captions.len() != self.fields.len() {
            return Err(PortalError::Config(format!(
                "collection '{}' has {} captions for {} fields",
                self.id,
                self.captions.len(),
                self.fields.len()
            )));
        }

        Ok(())
    }
}

/// Ordered set of collections, looked up by id.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionRegistry {
    specs: Vec<CollectionSpec>,
}

impl CollectionRegistry {
    /// Build a registry, validating each spec and rejecting duplicate ids.
    pub fn new(specs: Vec<CollectionSpec>) -> PortalResult<Self> {
        let mut ids = HashSet::new();
        for spec in &specs {
            spec.validate()?;
            if !ids.insert(spec.id.as_str()) {
                return Err(PortalError::Config(format!(
                    "duplicate collection id '{}'",
                    spec.id
                )));
            }
        }
        Ok(Self { specs })
    }

    /// The collections served by the portal out of the box.
    pub fn builtin() -> Self {
        Self {
            specs: builtin_specs(),
        }
    }

    pub fn get(&self, id: &str) -> PortalResult<&CollectionSpec> {
        self.specs
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| PortalError::NotFound(format!("collection '{}'", id)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollectionSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for CollectionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_specs() -> Vec<CollectionSpec> {
    vec![
        CollectionSpec::new(
            "awards",
            "3.3.3 Number of awards and recognitions received for research/innovations by the institution/teachers/research scholars/students during the last five years",
            "3.3.3",
            3,
            &["year", "title", "awardeeName", "awardingAgencyName", "category"],
        )
        .with_required(&["year", "title", "awardeeName"])
        .with_captions(&[
            "Year of Award",
            "Title of the innovation",
            "Name of the Awardee",
            "Name of the Awarding Agency",
            "Category",
        ]),
        CollectionSpec::new(
            "journals",
            "3.4.5 Number of research papers per teacher in the Journals notified on UGC website during the last five years  (15)",
            "3.4.5",
            4,
            &[
                "title",
                "authorName",
                "teacherDepartment",
                "journalName",
                "publicationYear",
                "issnNumber",
                "linkWebsite",
                "linkDocs",
                "isListed",
                "abstract",
                "keywords",
                "titleDomain",
            ],
        )
        .with_required(&["title", "authorName", "journalName"])
        .with_flags(&["isListed"]),
        CollectionSpec::new(
            "conferences",
            "3.4.6 Number of books and  chapters in edited volumes published per teacher during the last five years (15)",
            "3.4.6",
            3,
            &[
                "slno",
                "facultyName",
                "titleBook",
                "titlePaper",
                "titleConference",
                "publicationYear",
                "issnNumber",
                "isSameInstitution",
                "publisherName",
                "abstract",
                "keywords",
                "titleDomain",
            ],
        )
        .with_required(&["facultyName"]),
        CollectionSpec::new(
            "patents",
            "3.4.3 Number of Patents published/awarded during the last five years (10)",
            "3.4.3",
            3,
            &["facultyName", "patentNumber", "patentTitle", "patentPublish", "link"],
        )
        .with_required(&["facultyName", "patentTitle"]),
        CollectionSpec::new(
            "research-grants",
            "3.1.6 Grants for research projects sponsored by the non-government sources during the last five years",
            "3.1.6",
            5,
            &[
                "projectName",
                "principalInvestigator",
                "fundingAgency",
                "type",
                "department",
                "awardYear",
                "fundProvided",
                "projectDuration",
            ],
        )
        .with_required(&["projectName", "principalInvestigator"]),
        CollectionSpec::new(
            "research-support",
            "6.3.2 Teachers provided with financial support to attend conferences/workshops and towards membership fee of professional bodies",
            "6.3.2",
            2,
            &[
                "year",
                "facultyName",
                "conferenceName",
                "professionalbodyName",
                "amount",
            ],
        )
        .with_required(&["year", "facultyName"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_registry_is_valid() {
        let registry = CollectionRegistry::builtin();
        let rebuilt = CollectionRegistry::new(registry.iter().cloned().collect()).unwrap();
        assert_eq!(rebuilt, registry);
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_builtin_header_windows() {
        let registry = CollectionRegistry::builtin();
        let windows: Vec<(&str, &str, usize, usize)> = registry
            .iter()
            .map(|s| (s.id.as_str(), s.sheet.as_str(), s.header_rows, s.fields.len()))
            .collect();
        assert_eq!(
            windows,
            vec![
                ("awards", "3.3.3", 3, 5),
                ("journals", "3.4.5", 4, 12),
                ("conferences", "3.4.6", 3, 12),
                ("patents", "3.4.3", 3, 5),
                ("research-grants", "3.1.6", 5, 8),
                ("research-support", "6.3.2", 2, 5),
            ]
        );
    }

    #[test]
    fn test_get_unknown_collection() {
        let err = CollectionRegistry::builtin().get("theses").unwrap_err();
        assert!(matches!(err, PortalError::NotFound(_)));
    }

    #[test]
    fn test_seed_header_shape() {
        let registry = CollectionRegistry::builtin();
        let grants = registry.get("research-grants").unwrap();
        let header = grants.seed_header();

        assert_eq!(header.len(), 5);
        assert_eq!(header[0], text_row(&[&grants.title]));
        assert!(header[1..4].iter().all(|row| row.is_empty()));
        assert_eq!(header[4].len(), grants.fields.len());
        assert_eq!(header[4][0], Some(CellValue::from("projectName")));

        let awards = registry.get("awards").unwrap().seed_header();
        assert_eq!(awards[2][0], Some(CellValue::from("Year of Award")));
    }

    #[test]
    fn test_seed_header_small_windows() {
        let mut spec = CollectionSpec::new("x", "X", "x", 0, &["a"]);
        assert!(spec.seed_header().is_empty());
        spec.header_rows = 1;
        assert_eq!(spec.seed_header(), vec![text_row(&["X"])]);
    }

    #[test]
    fn test_validate_rejects_unknown_required_field() {
        let spec = CollectionSpec::new("x", "X", "x", 1, &["a"]).with_required(&["b"]);
        let err = spec.validate().unwrap_err();
        assert!(err.to_string().contains("required field 'b'"));
    }

    #[test]
    fn test_validate_rejects_caption_mismatch() {
        let spec = CollectionSpec::new("x", "X", "x", 2, &["a", "b"]).with_captions(&["A"]);
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_registry_rejects_duplicate_ids() {
        let a = CollectionSpec::new("x", "X", "x1", 1, &["a"]);
        let b = CollectionSpec::new("x", "X", "x2", 1, &["a"]);
        assert!(matches!(
            CollectionRegistry::new(vec![a, b]),
            Err(PortalError::Config(_))
        ));
    }

    #[test]
    fn test_spec_yaml_defaults() {
        let yaml = r#"
id: theses
title: Theses
sheet: "3.9"
header_rows: 1
fields: [student, guide]
"#;
        let spec: CollectionSpec = serde_yaml::from_str(yaml).unwrap();
        assert!(spec.required.is_empty());
        assert!(spec.flags.is_empty());
        assert!(spec.validate().is_ok());
    }
}
