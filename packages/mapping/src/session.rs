//! # Mapping Session
//!
//! Owns both sides of a mapping exercise: the source and target documents,
//! the mapping definition, and the session configuration. User-level
//! commands (field selection, expand/collapse, search) land here and are
//! validated against the overlay state before they mutate anything; the
//! session also dispatches the overlay pass to every document whenever the
//! mapping set changes.

use tracing::debug;

use fieldmap_document::{DocumentDefinition, DocumentResult, InspectionFilters, RawField};

use crate::errors::SelectionError;
use crate::model::MappingDefinition;
use crate::overlay;

/// Session-scoped configuration.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Inspection blacklists applied while building each document.
    pub filters: InspectionFilters,

    /// Logs an indented complex-field summary after each document builds.
    pub debug_parsing: bool,
}

/// Outcome of a terminal-field selection command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// The field joined the current selection.
    Selected,

    /// The field already belongs to the active mapping; nothing changed.
    AlreadyMapped,
}

/// One mapping exercise: documents on both sides plus the mapping set.
#[derive(Debug, Clone, Default)]
pub struct MappingSession {
    pub config: SessionConfig,
    pub source_docs: Vec<DocumentDefinition>,
    pub target_docs: Vec<DocumentDefinition>,
    pub mappings: MappingDefinition,
}

impl MappingSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Builds and registers a document on one side of the session.
    pub fn add_document(
        &mut self,
        name: &str,
        is_source: bool,
        raw_fields: Vec<RawField>,
    ) -> DocumentResult<()> {
        let mut doc = DocumentDefinition::new(name, is_source);
        doc.populate_from_fields(raw_fields, &self.config.filters)?;
        if self.config.debug_parsing {
            debug!("complex fields of '{}':\n{}", name, doc.complex_tree_summary());
        }
        if is_source {
            self.source_docs.push(doc);
        } else {
            self.target_docs.push(doc);
        }
        Ok(())
    }

    /// The primary document of a side, when loaded.
    pub fn document(&self, is_source: bool) -> Option<&DocumentDefinition> {
        if is_source {
            self.source_docs.first()
        } else {
            self.target_docs.first()
        }
    }

    pub fn document_mut(&mut self, is_source: bool) -> Option<&mut DocumentDefinition> {
        if is_source {
            self.source_docs.first_mut()
        } else {
            self.target_docs.first_mut()
        }
    }

    pub fn all_documents(&self) -> impl Iterator<Item = &DocumentDefinition> {
        self.source_docs.iter().chain(self.target_docs.iter())
    }

    pub fn documents_are_loaded(&self) -> bool {
        let mut docs = self.all_documents().peekable();
        docs.peek().is_some() && docs.all(DocumentDefinition::is_initialized)
    }

    /// Runs the overlay pass over every document with the current mapping
    /// set. Call after the mapping set, any mapping's paths, or the active
    /// mapping changes.
    pub fn update_from_mappings(&mut self) {
        for doc in self
            .source_docs
            .iter_mut()
            .chain(self.target_docs.iter_mut())
        {
            overlay::update_document(doc, &self.mappings);
        }
    }

    /// Selects a terminal field for mapping, enforcing the overlay's
    /// eligibility verdict. Fields already in the active mapping are left
    /// alone; starting a fresh selection clears the previous one.
    pub fn select_terminal_field(
        &mut self,
        is_source: bool,
        path: &str,
    ) -> Result<SelectionChange, SelectionError> {
        let already_mapped = self
            .mappings
            .active_mapping()
            .is_some_and(|mapping| mapping.is_field_path_mapped(path, is_source));
        let has_active = self.mappings.active_mapping().is_some();

        let doc = self
            .document_mut(is_source)
            .ok_or(SelectionError::DocumentNotLoaded(is_source))?;
        let id = doc
            .get_field(path)?
            .ok_or_else(|| SelectionError::NotFound(path.to_string()))?;

        let field = doc.field(id);
        if !field.is_terminal() {
            return Err(SelectionError::NotTerminal(field.display_name.clone()));
        }
        if !field.available_for_selection {
            return Err(SelectionError::NotAvailable {
                display_name: field.display_name.clone(),
                reason: field
                    .selection_exclusion_reason
                    .clone()
                    .unwrap_or_else(|| "it is not available".to_string()),
            });
        }
        if already_mapped {
            return Ok(SelectionChange::AlreadyMapped);
        }

        // A fresh selection against an existing mapping starts over.
        if has_active && !doc.selected_fields().is_empty() {
            doc.clear_selected_fields();
        }
        doc.select_fields(&[path.to_string()]);
        Ok(SelectionChange::Selected)
    }

    /// Expands a parent field on demand and flips its collapse state.
    /// Returns the new collapsed value.
    pub fn toggle_field_expansion(
        &mut self,
        is_source: bool,
        path: &str,
    ) -> Result<bool, SelectionError> {
        let doc = self
            .document_mut(is_source)
            .ok_or(SelectionError::DocumentNotLoaded(is_source))?;
        let id = doc
            .get_field(path)?
            .ok_or_else(|| SelectionError::NotFound(path.to_string()))?;
        doc.populate_children(id);
        let field = doc.field_mut(id);
        field.collapsed = !field.collapsed;
        Ok(field.collapsed)
    }

    /// Applies a search filter to one side's visibility flags.
    pub fn search(&mut self, is_source: bool, filter: &str) -> Result<(), SelectionError> {
        let doc = self
            .document_mut(is_source)
            .ok_or(SelectionError::DocumentNotLoaded(is_source))?;
        doc.apply_search_filter(filter);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_document::parse_raw_fields;

    fn session_with_flat_source() -> MappingSession {
        let mut session = MappingSession::new(SessionConfig::default());
        let raw = parse_raw_fields(
            r#"[
                {"name": "a", "fieldType": "STRING"},
                {"name": "b", "fieldType": "STRING"}
            ]"#,
        )
        .unwrap();
        session.add_document("Src", true, raw).unwrap();
        session
    }

    #[test]
    fn test_documents_are_loaded() {
        let mut session = MappingSession::new(SessionConfig::default());
        assert!(!session.documents_are_loaded(), "empty session is not loaded");

        let raw = parse_raw_fields(r#"[{"name": "x"}]"#).unwrap();
        session.add_document("Src", true, raw.clone()).unwrap();
        session.add_document("Tgt", false, raw).unwrap();
        assert!(session.documents_are_loaded());
        assert!(session.document(true).is_some());
        assert!(session.document(false).is_some());
    }

    #[test]
    fn test_select_missing_document_and_field() {
        let mut session = session_with_flat_source();
        assert_eq!(
            session.select_terminal_field(false, "A").unwrap_err(),
            SelectionError::DocumentNotLoaded(false)
        );
        assert_eq!(
            session.select_terminal_field(true, "Nope").unwrap_err(),
            SelectionError::NotFound("Nope".to_string())
        );
    }

    #[test]
    fn test_select_and_reselect() {
        let mut session = session_with_flat_source();
        assert_eq!(
            session.select_terminal_field(true, "A").unwrap(),
            SelectionChange::Selected
        );
        let doc = session.document(true).unwrap();
        assert_eq!(doc.selected_fields().len(), 1);

        // Without an active mapping a second selection accumulates.
        session.select_terminal_field(true, "B").unwrap();
        assert_eq!(session.document(true).unwrap().selected_fields().len(), 2);
    }
}
