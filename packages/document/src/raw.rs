//! # Raw Inspection Descriptors
//!
//! The shape of field metadata as delivered by the schema-inspection
//! collaborator, before normalization. The builder consumes these once per
//! document; nothing else in the crate touches them.

use serde::Deserialize;

use crate::field::StructuralType;

/// Resolution status of a field's backing type. Only `SUPPORTED` complex
/// types contribute prototypes to the cache; every other status string the
/// inspection service may emit collapses to `Unsupported`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum ResolutionStatus {
    Supported,
    #[default]
    Unsupported,
}

impl From<String> for ResolutionStatus {
    fn from(status: String) -> Self {
        if status == "SUPPORTED" {
            ResolutionStatus::Supported
        } else {
            ResolutionStatus::Unsupported
        }
    }
}

/// Raw field descriptor from the inspection service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawField {
    pub name: String,

    /// Inspection type tag: a primitive tag, `COMPLEX`, or `COLLECTION`.
    #[serde(default)]
    pub field_type: Option<String>,

    /// Structural-type identifier backing a complex or enumerable field.
    #[serde(default)]
    pub class_name: Option<String>,

    #[serde(default)]
    pub status: ResolutionStatus,

    #[serde(default)]
    pub collection: bool,

    #[serde(default)]
    pub enumeration: bool,

    #[serde(default)]
    pub child_fields: Vec<RawField>,
}

impl RawField {
    /// Structural classification, with the safe-default fallback: a field
    /// with missing type metadata is treated as primitive.
    pub fn structural_type(&self) -> StructuralType {
        match self.field_type.as_deref() {
            Some("COMPLEX") => StructuralType::Complex,
            Some("COLLECTION") => StructuralType::Collection,
            Some(tag) => StructuralType::Primitive(tag.to_string()),
            None => StructuralType::Primitive("UNKNOWN".to_string()),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.status == ResolutionStatus::Supported
    }
}

/// Parses the JSON field list of an inspection response.
pub fn parse_raw_fields(json: &str) -> Result<Vec<RawField>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Inspection-level blacklists applied before the tree is built.
#[derive(Debug, Clone, Default)]
pub struct InspectionFilters {
    pub field_name_blacklist: Vec<String>,
    pub class_name_blacklist: Vec<String>,
}

impl InspectionFilters {
    /// Whether a raw field is dropped outright by the blacklists.
    pub fn excludes(&self, raw: &RawField) -> bool {
        if self.field_name_blacklist.iter().any(|name| name == &raw.name) {
            return true;
        }
        match &raw.class_name {
            Some(class) => self.class_name_blacklist.iter().any(|c| c == class),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_raw_fields_defaults_missing_metadata() {
        let fields = parse_raw_fields(r#"[{"name": "id"}]"#).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].status, ResolutionStatus::Unsupported);
        assert!(!fields[0].collection);
        assert!(fields[0].child_fields.is_empty());
        assert_eq!(
            fields[0].structural_type(),
            StructuralType::Primitive("UNKNOWN".to_string())
        );
    }

    #[test]
    fn test_parse_raw_fields_reads_nested_children() {
        let json = r#"[
            {
                "name": "order",
                "fieldType": "COMPLEX",
                "className": "com.example.Order",
                "status": "SUPPORTED",
                "childFields": [
                    {"name": "id", "fieldType": "STRING"}
                ]
            }
        ]"#;
        let fields = parse_raw_fields(json).unwrap();
        assert!(fields[0].is_supported());
        assert_eq!(fields[0].structural_type(), StructuralType::Complex);
        assert_eq!(fields[0].child_fields[0].name, "id");
    }

    #[test]
    fn test_unrecognized_status_degrades_to_unsupported() {
        let fields =
            parse_raw_fields(r#"[{"name": "x", "status": "CACHED"}]"#).unwrap();
        assert!(!fields[0].is_supported());
    }

    #[test]
    fn test_filters_exclude_by_name_and_class() {
        let filters = InspectionFilters {
            field_name_blacklist: vec!["serialVersionUID".to_string()],
            class_name_blacklist: vec!["com.example.Internal".to_string()],
        };
        let fields = parse_raw_fields(
            r#"[
                {"name": "serialVersionUID"},
                {"name": "audit", "className": "com.example.Internal"},
                {"name": "id"}
            ]"#,
        )
        .unwrap();
        assert!(filters.excludes(&fields[0]));
        assert!(filters.excludes(&fields[1]));
        assert!(!filters.excludes(&fields[2]));
    }
}
