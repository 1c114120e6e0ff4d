//! Exported document shapes
//!
//! These are the JSON units written to the output area: one
//! [`ExportDocument`] per section-level reference, grouped under a
//! [`GroupedDocument`] when a work's top-level unit is not itself a section.
//! Field names are part of the published bundle format.

use super::work::{non_empty, Version, PRIMARY_LANGUAGE, TRANSLATION_LANGUAGE};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Materialized content of one section-level reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    #[serde(rename = "ref")]
    pub reference: String,
    pub he_ref: String,
    pub index_title: String,
    pub he_title: String,
    pub section_ref: String,

    /// Emitted as `null` at structural boundaries
    pub next: Option<String>,

    /// Emitted as `null` at structural boundaries
    pub prev: Option<String>,

    #[serde(flatten)]
    pub attribution: AttributionFields,

    pub content: Vec<SegmentRecord>,
}

/// Top-level document written for one top-level reference of a work
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TopLevelDocument {
    /// The top-level reference is itself section-level
    Section(ExportDocument),

    /// The top-level reference contains sections
    Group(GroupedDocument),
}

impl TopLevelDocument {
    /// Normalized reference that names the document's file
    pub fn reference(&self) -> &str {
        match self {
            TopLevelDocument::Section(doc) => &doc.reference,
            TopLevelDocument::Group(group) => &group.reference,
        }
    }
}

/// Sections of a non-section top-level reference, keyed by section reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedDocument {
    #[serde(rename = "ref")]
    pub reference: String,

    /// Serialized as an object keyed by each section's `ref`, in stored order
    #[serde(serialize_with = "serialize_sections")]
    pub sections: Vec<ExportDocument>,
}

fn serialize_sections<S>(sections: &[ExportDocument], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(sections.len()))?;
    for section in sections {
        map.serialize_entry(&section.reference, section)?;
    }
    map.end()
}

/// One segment of a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentRecord {
    /// 1-based position, as a string
    pub segment_number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub he: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<SimpleLink>>,
}

/// A link reduced to what clients display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleLink {
    pub source_he_ref: String,
    pub source_ref: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Which side of the attribution record a language maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributionSide {
    /// Translation text, unprefixed field names
    Translation,
    /// Primary text, `he`-prefixed field names
    Primary,
}

impl AttributionSide {
    /// Side for a language code; other languages carry no attribution
    pub fn for_language(language: &str) -> Option<Self> {
        match language {
            TRANSLATION_LANGUAGE => Some(AttributionSide::Translation),
            PRIMARY_LANGUAGE => Some(AttributionSide::Primary),
            _ => None,
        }
    }
}

/// Version attribution fields of a document
///
/// Every member is optional and omitted from output when absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub he_version_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub he_version_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub he_license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub he_version_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_title_in_hebrew: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub he_version_title_in_hebrew: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_notes_in_hebrew: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub he_version_notes_in_hebrew: Option<String>,
}

impl AttributionFields {
    /// Whether no attribution field is set
    pub fn is_empty(&self) -> bool {
        *self == AttributionFields::default()
    }

    /// Copies every present attribution member of `version` onto one side
    pub fn apply_version(&mut self, side: AttributionSide, version: &Version) {
        let title = Some(version.title.clone()).filter(|t| !t.is_empty());
        match side {
            AttributionSide::Translation => {
                self.version_title = title;
                self.version_notes = non_empty(&version.notes);
                self.license = non_empty(&version.license);
                self.version_source = non_empty(&version.source);
                self.version_title_in_hebrew = non_empty(&version.title_in_hebrew);
                self.version_notes_in_hebrew = non_empty(&version.notes_in_hebrew);
            }
            AttributionSide::Primary => {
                self.he_version_title = title;
                self.he_version_notes = non_empty(&version.notes);
                self.he_license = non_empty(&version.license);
                self.he_version_source = non_empty(&version.source);
                self.he_version_title_in_hebrew = non_empty(&version.title_in_hebrew);
                self.he_version_notes_in_hebrew = non_empty(&version.notes_in_hebrew);
            }
        }
    }

    /// Marks one side as merged; no other field of that side is emitted
    pub fn apply_merged(&mut self, side: AttributionSide, sources: &[String]) {
        let mut sources: Vec<&str> = sources.iter().map(String::as_str).collect();
        sources.sort_unstable();
        sources.dedup();
        let title = Some(format!("Merged from {}", sources.join(", ")));

        match side {
            AttributionSide::Translation => self.version_title = title,
            AttributionSide::Primary => self.he_version_title = title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(reference: &str) -> ExportDocument {
        ExportDocument {
            reference: reference.to_string(),
            he_ref: String::new(),
            index_title: "Foo".to_string(),
            he_title: String::new(),
            section_ref: reference.to_string(),
            next: None,
            prev: None,
            attribution: AttributionFields::default(),
            content: vec![SegmentRecord {
                segment_number: "1".to_string(),
                text: Some("a".to_string()),
                he: None,
                links: None,
            }],
        }
    }

    #[test]
    fn test_document_serializes_null_navigation_and_omits_attribution() {
        let value = serde_json::to_value(document("Foo 1")).unwrap();

        assert_eq!(value["ref"], "Foo 1");
        assert!(value["next"].is_null());
        assert!(value.as_object().unwrap().contains_key("prev"));
        assert!(!value.as_object().unwrap().contains_key("versionTitle"));
        assert_eq!(value["content"], json!([{"segmentNumber": "1", "text": "a"}]));
    }

    #[test]
    fn test_grouped_document_keys_sections_in_order() {
        let group = TopLevelDocument::Group(GroupedDocument {
            reference: "Foo, Part".to_string(),
            sections: vec![document("Foo, Part 2"), document("Foo, Part 10")],
        });

        let text = serde_json::to_string(&group).unwrap();
        let second = text.find("\"Foo, Part 10\"").unwrap();
        let first = text.find("\"Foo, Part 2\"").unwrap();
        assert!(first < second);
        assert_eq!(group.reference(), "Foo, Part");
    }

    #[test]
    fn test_apply_version_copies_only_present_fields() {
        let version = Version {
            title: "Alt".to_string(),
            language: "he".to_string(),
            license: Some("CC-BY".to_string()),
            notes: Some(String::new()),
            ..Default::default()
        };
        let mut fields = AttributionFields::default();
        fields.apply_version(AttributionSide::Primary, &version);

        let value = serde_json::to_value(&fields).unwrap();
        assert_eq!(value, json!({"heVersionTitle": "Alt", "heLicense": "CC-BY"}));
    }

    #[test]
    fn test_apply_merged_sorts_sources() {
        let mut fields = AttributionFields::default();
        fields.apply_merged(
            AttributionSide::Translation,
            &["Y".to_string(), "X".to_string(), "Y".to_string()],
        );
        assert_eq!(fields.version_title.as_deref(), Some("Merged from X, Y"));
        assert!(fields.version_notes.is_none());
        assert!(fields.license.is_none());
    }

    #[test]
    fn test_side_for_language() {
        assert_eq!(
            AttributionSide::for_language("en"),
            Some(AttributionSide::Translation)
        );
        assert_eq!(
            AttributionSide::for_language("he"),
            Some(AttributionSide::Primary)
        );
        assert_eq!(AttributionSide::for_language("de"), None);
    }
}
