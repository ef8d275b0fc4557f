//! # Mapping Model
//!
//! The read-only mapping definitions the overlay engine consumes: which
//! source paths map to which target paths, under which transition mode, and
//! which mapping is currently active.

use serde::{Deserialize, Serialize};

/// How values move from source fields to target fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionMode {
    /// One-to-one copy.
    Direct,

    /// One source value split across several targets.
    Separate,

    /// Enumeration value translation.
    Enum,

    /// Per-element mapping between collections.
    Collection,
}

/// One association between source and target field paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub source_field_paths: Vec<String>,
    pub target_field_paths: Vec<String>,
    pub mode: TransitionMode,
}

impl FieldMapping {
    pub fn new(mode: TransitionMode) -> Self {
        Self {
            source_field_paths: Vec::new(),
            target_field_paths: Vec::new(),
            mode,
        }
    }

    /// The mapped paths on one side of the session.
    pub fn field_paths(&self, is_source: bool) -> &[String] {
        if is_source {
            &self.source_field_paths
        } else {
            &self.target_field_paths
        }
    }

    pub fn field_paths_mut(&mut self, is_source: bool) -> &mut Vec<String> {
        if is_source {
            &mut self.source_field_paths
        } else {
            &mut self.target_field_paths
        }
    }

    pub fn is_field_path_mapped(&self, path: &str, is_source: bool) -> bool {
        self.field_paths(is_source).iter().any(|p| p == path)
    }

    /// Whether this mapping constrains selection to collection rules.
    pub fn is_collection_mode(&self) -> bool {
        self.mode == TransitionMode::Collection
    }

    /// Separate and enum transitions run a transformation over the value.
    pub fn is_transformation(&self) -> bool {
        matches!(self.mode, TransitionMode::Separate | TransitionMode::Enum)
    }
}

/// The ordered mapping set plus the active selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingDefinition {
    mappings: Vec<FieldMapping>,
    active: Option<usize>,
}

impl MappingDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a mapping and returns its index.
    pub fn add_mapping(&mut self, mapping: FieldMapping) -> usize {
        self.mappings.push(mapping);
        self.mappings.len() - 1
    }

    pub fn mappings(&self) -> &[FieldMapping] {
        &self.mappings
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_mapping(&self) -> Option<&FieldMapping> {
        self.active.map(|index| &self.mappings[index])
    }

    pub fn active_mapping_mut(&mut self) -> Option<&mut FieldMapping> {
        self.active.map(|index| &mut self.mappings[index])
    }

    /// Activates the mapping at `index`, or deactivates with `None`.
    /// An out-of-range index deactivates.
    pub fn set_active(&mut self, index: Option<usize>) {
        self.active = index.filter(|&i| i < self.mappings.len());
    }

    /// Every mapping, paired with whether it is the active one.
    pub fn mappings_with_active(&self) -> impl Iterator<Item = (&FieldMapping, bool)> {
        self.mappings
            .iter()
            .enumerate()
            .map(|(index, mapping)| (mapping, self.active == Some(index)))
    }

    /// Every mapping except the active one.
    pub fn mappings_excluding_active(&self) -> impl Iterator<Item = &FieldMapping> {
        self.mappings
            .iter()
            .enumerate()
            .filter(|(index, _)| self.active != Some(*index))
            .map(|(_, mapping)| mapping)
    }
}
