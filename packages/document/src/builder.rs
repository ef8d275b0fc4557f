//! # Document Tree Builder
//!
//! One-time normalization of a raw inspection field list into the indexed
//! tree: blacklist filtering, prototype discovery, depth truncation,
//! sibling alphabetization with dedup, path/depth assignment, and the
//! pre-order flattening that seeds every index.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::document::DocumentDefinition;
use crate::errors::{DocumentError, DocumentResult};
use crate::field::{display_name_of, ExpansionState, Field, FieldId, StructuralType, PATH_SEPARATOR};
use crate::raw::{InspectionFilters, RawField};

impl DocumentDefinition {
    /// Builds the tree from the raw field list. Runs exactly once per
    /// document; the tree afterwards only grows through lazy expansion.
    pub fn populate_from_fields(
        &mut self,
        mut raw_fields: Vec<RawField>,
        filters: &InspectionFilters,
    ) -> DocumentResult<()> {
        if self.initialized {
            return Err(DocumentError::AlreadyPopulated(self.name.clone()));
        }

        filter_blacklisted(&mut raw_fields, filters);

        self.discover_prototypes(&raw_fields);
        for raw in &mut raw_fields {
            truncate_grandchildren(raw);
        }
        alphabetize(&mut raw_fields);

        let roots: Vec<FieldId> = raw_fields
            .into_iter()
            .map(|raw| self.insert_subtree(raw, None, "", 0))
            .collect();
        self.roots = roots;
        for root in self.roots.clone() {
            self.index_subtree(root);
        }
        self.field_paths.sort();
        self.initialized = true;

        info!(
            "populated document '{}': {} fields, {} terminal",
            self.name,
            self.all_fields.len(),
            self.terminal_fields.len()
        );
        Ok(())
    }

    /// Walks the raw tree and caches a truncated copy of every supported
    /// complex field by class identifier, first occurrence winning.
    /// Recurses into children regardless of support status.
    fn discover_prototypes(&mut self, raw_fields: &[RawField]) {
        for raw in raw_fields {
            if raw.structural_type().is_expandable() && !raw.enumeration && raw.is_supported() {
                if let Some(class) = raw.class_name.clone() {
                    if !self.complex_prototypes.contains_key(&class) {
                        let mut prototype = raw.clone();
                        truncate_grandchildren(&mut prototype);
                        alphabetize(&mut prototype.child_fields);
                        let id = self.insert_subtree(prototype, None, "", 0);
                        self.complex_prototypes.insert(class, id);
                    }
                }
            }
            self.discover_prototypes(&raw.child_fields);
        }
    }

    /// Converts a raw subtree into arena fields, assigning display names,
    /// paths, and depths top-down. The subtree is not indexed here; detached
    /// prototypes use the same insertion path as the live tree.
    pub(crate) fn insert_subtree(
        &mut self,
        raw: RawField,
        parent: Option<FieldId>,
        parent_path: &str,
        depth: usize,
    ) -> FieldId {
        if raw.field_type.is_none() {
            warn!("field '{}' has no type metadata, treating as primitive", raw.name);
        }
        let structural_type = raw.structural_type();
        let is_collection = raw.collection || structural_type == StructuralType::Collection;
        let expansion = if raw.enumeration || !structural_type.is_expandable() {
            ExpansionState::Leaf
        } else if raw.child_fields.is_empty() {
            ExpansionState::NeedsExpansion
        } else {
            ExpansionState::Expanded
        };

        let mut field = Field::new(raw.name, structural_type);
        field.is_collection = is_collection;
        field.enumeration = raw.enumeration;
        field.class_identifier = raw.class_name;
        field.expansion = expansion;
        field.parent = parent;
        field.depth = depth;
        field.path = if parent_path.is_empty() {
            field.display_name.clone()
        } else {
            format!("{}{}{}", parent_path, PATH_SEPARATOR, field.display_name)
        };

        let id = self.push_field(field);
        let path = self.field(id).path.clone();
        for raw_child in raw.child_fields {
            let child = self.insert_subtree(raw_child, Some(id), &path, depth + 1);
            self.field_mut(id).children.push(child);
        }
        id
    }
}

/// Drops blacklisted fields, recursively.
fn filter_blacklisted(raw_fields: &mut Vec<RawField>, filters: &InspectionFilters) {
    raw_fields.retain(|raw| {
        let keep = !filters.excludes(raw);
        if !keep {
            debug!("filtering out blacklisted field '{}'", raw.name);
        }
        keep
    });
    for raw in raw_fields {
        filter_blacklisted(&mut raw.child_fields, filters);
    }
}

/// Drops grandchildren so at most one level of children stays visible below
/// an unexpanded node. A collection directly beneath a collection is exempt
/// and keeps one extra level, so nested collections remain navigable.
fn truncate_grandchildren(raw: &mut RawField) {
    let parent_is_collection = raw.collection;
    for child in &mut raw.child_fields {
        if parent_is_collection && child.collection {
            truncate_grandchildren(child);
        } else {
            child.child_fields.clear();
        }
    }
}

/// Sorts siblings by case-normalized display name and drops duplicates,
/// first occurrence winning, at every level.
fn alphabetize(raw_fields: &mut Vec<RawField>) {
    let drained = std::mem::take(raw_fields);
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept: Vec<(String, RawField)> = Vec::with_capacity(drained.len());
    for raw in drained {
        let display_name = display_name_of(&raw.name);
        if !seen.insert(display_name.clone()) {
            debug!("dropping duplicate sibling '{}'", display_name);
            continue;
        }
        kept.push((display_name, raw));
    }
    kept.sort_by(|a, b| a.0.cmp(&b.0));
    for (_, mut raw) in kept {
        alphabetize(&mut raw.child_fields);
        raw_fields.push(raw);
    }
}
