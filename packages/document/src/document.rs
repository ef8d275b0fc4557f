//! # Document Definition
//!
//! One side of a mapping session: the indexed field tree of a source or
//! target document, its prototype caches, and the commands the UI layer
//! issues against it.
//!
//! ## Lifecycle
//!
//! ```text
//! new → populate_from_fields → get_field / populate_children → overlay
//!  ↓            ↓                        ↓                        ↓
//! empty   indexed tree + caches   lazy materialization      flag rewrite
//! ```
//!
//! Population happens exactly once; afterwards the tree only grows, and
//! `all_fields` / `fields_by_path` / `field_paths` are append-only.

use std::collections::HashMap;
use std::fmt::Write as _;

use tracing::{debug, warn};

use crate::errors::{DocumentError, DocumentResult};
use crate::field::{
    ExpansionState, Field, FieldId, StructuralType, NONE_FIELD_PATH, PATH_SEPARATOR,
};
use crate::walk;

/// A document's field hierarchy plus every index derived from it.
#[derive(Debug, Clone)]
pub struct DocumentDefinition {
    pub name: String,
    pub is_source: bool,

    pub(crate) arena: Vec<Field>,
    pub(crate) roots: Vec<FieldId>,

    /// Pre-order flattening of everything materialized so far.
    pub(crate) all_fields: Vec<FieldId>,
    pub(crate) terminal_fields: Vec<FieldId>,
    pub(crate) fields_by_path: HashMap<String, FieldId>,

    /// Class identifier → detached one-level subtree, deep-copied on every
    /// materialization.
    pub(crate) complex_prototypes: HashMap<String, FieldId>,
    pub(crate) enum_prototypes: HashMap<String, FieldId>,

    /// Sorted list of all known paths, for prefix and search operations.
    pub(crate) field_paths: Vec<String>,

    pub(crate) none_field: FieldId,
    pub(crate) initialized: bool,
}

impl DocumentDefinition {
    pub fn new(name: impl Into<String>, is_source: bool) -> Self {
        let mut doc = Self {
            name: name.into(),
            is_source,
            arena: Vec::new(),
            roots: Vec::new(),
            all_fields: Vec::new(),
            terminal_fields: Vec::new(),
            fields_by_path: HashMap::new(),
            complex_prototypes: HashMap::new(),
            enum_prototypes: HashMap::new(),
            field_paths: Vec::new(),
            none_field: FieldId(0),
            initialized: false,
        };
        doc.none_field = doc.push_field(Field::none());
        doc
    }

    pub fn field(&self, id: FieldId) -> &Field {
        &self.arena[id.index()]
    }

    pub fn field_mut(&mut self, id: FieldId) -> &mut Field {
        &mut self.arena[id.index()]
    }

    /// Root-level fields in display order.
    pub fn roots(&self) -> &[FieldId] {
        &self.roots
    }

    /// Every materialized field, pre-order.
    pub fn all_fields(&self) -> &[FieldId] {
        &self.all_fields
    }

    pub fn field_count(&self) -> usize {
        self.all_fields.len()
    }

    /// Terminal fields, optionally led by the `[None]` sentinel.
    pub fn terminal_fields(&self, include_none: bool) -> Vec<FieldId> {
        if include_none {
            let mut fields = Vec::with_capacity(self.terminal_fields.len() + 1);
            fields.push(self.none_field);
            fields.extend_from_slice(&self.terminal_fields);
            fields
        } else {
            self.terminal_fields.clone()
        }
    }

    /// All known paths, sorted lexicographically.
    pub fn field_paths(&self) -> &[String] {
        &self.field_paths
    }

    pub fn none_field(&self) -> FieldId {
        self.none_field
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn cached_prototype(&self, class_identifier: &str) -> Option<FieldId> {
        self.complex_prototypes.get(class_identifier).copied()
    }

    pub fn enum_prototype(&self, class_identifier: &str) -> Option<FieldId> {
        self.enum_prototypes.get(class_identifier).copied()
    }

    /// Resolves a path to a field, expanding unmaterialized ancestors on the
    /// way.
    ///
    /// An exact hit returns directly. On a miss the path is walked
    /// segment-by-segment from the root, populating each ancestor's children
    /// before descending; a missing intermediate ancestor is a hard failure,
    /// while a leaf that still does not exist after the walk is an ordinary
    /// `None`.
    pub fn get_field(&mut self, path: &str) -> DocumentResult<Option<FieldId>> {
        if path == NONE_FIELD_PATH {
            return Ok(Some(self.none_field));
        }
        if let Some(&id) = self.fields_by_path.get(path) {
            return Ok(Some(id));
        }
        if !path.contains(PATH_SEPARATOR) {
            return Ok(None);
        }

        let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
        let mut prefix = String::with_capacity(path.len());
        for segment in &segments[..segments.len() - 1] {
            if !prefix.is_empty() {
                prefix.push(PATH_SEPARATOR);
            }
            prefix.push_str(segment);
            debug!("expanding '{}' (for: {})", prefix, path);
            let Some(&ancestor) = self.fields_by_path.get(prefix.as_str()) else {
                return Err(DocumentError::UnresolvablePrefix {
                    prefix,
                    path: path.to_string(),
                });
            };
            self.populate_children(ancestor);
        }
        Ok(self.fields_by_path.get(path).copied())
    }

    /// Best-effort resolution of many paths: unresolved entries are dropped,
    /// input order is preserved.
    pub fn get_fields(&mut self, paths: &[String]) -> Vec<FieldId> {
        let mut fields = Vec::with_capacity(paths.len());
        for path in paths {
            match self.get_field(path) {
                Ok(Some(id)) => fields.push(id),
                Ok(None) => {}
                Err(err) => warn!("skipping field path '{}': {}", path, err),
            }
        }
        fields
    }

    /// Whether every given path resolves to a field.
    pub fn fields_exist(&mut self, paths: &[String]) -> bool {
        paths
            .iter()
            .all(|path| matches!(self.get_field(path), Ok(Some(_))))
    }

    /// Materializes the children of an unexpanded field from the prototype
    /// cache. Idempotent: fields that are terminal or already have children
    /// are left alone.
    ///
    /// A missing prototype is a diagnostic, not a failure; the field
    /// degrades to expanded-empty and becomes terminal.
    pub fn populate_children(&mut self, id: FieldId) {
        if self.field(id).is_terminal() || !self.field(id).children.is_empty() {
            return;
        }

        let (path, depth, class_identifier) = {
            let field = self.field(id);
            (field.path.clone(), field.depth, field.class_identifier.clone())
        };
        let Some(class_identifier) = class_identifier else {
            warn!("field '{}' awaits expansion but has no class identifier", path);
            self.degrade_to_terminal(id);
            return;
        };
        let Some(&prototype) = self.complex_prototypes.get(&class_identifier) else {
            warn!(
                "no cached prototype for class '{}' while expanding '{}'",
                class_identifier, path
            );
            self.degrade_to_terminal(id);
            return;
        };

        debug!("populating children of '{}' ({})", path, class_identifier);
        let prototype_children = self.field(prototype).children.clone();
        for prototype_child in prototype_children {
            let child = self.clone_subtree(prototype_child, Some(id), &path, depth + 1);
            self.field_mut(id).children.push(child);
            self.index_subtree(child);
        }
        self.field_mut(id).expansion = ExpansionState::Expanded;
        self.field_paths.sort();
    }

    /// Marks the selected flag on each resolvable path and uncollapses its
    /// ancestor chain so the selection is visible.
    pub fn select_fields(&mut self, paths: &[String]) {
        for path in paths {
            match self.get_field(path) {
                Ok(Some(id)) => {
                    self.field_mut(id).selected = true;
                    let chain: Vec<FieldId> = walk::ancestors(self, id).collect();
                    for ancestor in chain {
                        self.field_mut(ancestor).collapsed = false;
                    }
                }
                Ok(None) => {}
                Err(err) => warn!("cannot select '{}': {}", path, err),
            }
        }
    }

    pub fn clear_selected_fields(&mut self) {
        for &id in &self.all_fields {
            self.arena[id.index()].selected = false;
        }
    }

    pub fn selected_fields(&self) -> Vec<FieldId> {
        self.all_fields
            .iter()
            .copied()
            .filter(|&id| self.field(id).selected)
            .collect()
    }

    /// Recomputes the `visible` flags for a search filter: matching terminal
    /// fields and their ancestor chains stay visible, everything else is
    /// hidden. An empty filter restores full visibility.
    pub fn apply_search_filter(&mut self, filter: &str) {
        if filter.is_empty() {
            for &id in &self.all_fields {
                self.arena[id.index()].visible = true;
            }
            return;
        }

        let needle = filter.to_lowercase();
        for &id in &self.all_fields {
            self.arena[id.index()].visible = false;
        }
        for id in self.terminal_fields.clone() {
            if !self.field(id).name.to_lowercase().contains(&needle) {
                continue;
            }
            self.field_mut(id).visible = true;
            let chain: Vec<FieldId> = walk::ancestors(self, id).collect();
            for ancestor in chain {
                let field = self.field_mut(ancestor);
                field.visible = true;
                field.collapsed = false;
            }
        }
    }

    /// Indented summary of the complex fields of the tree, for diagnostics.
    pub fn complex_tree_summary(&self) -> String {
        let mut out = String::new();
        self.summarize_complex(&self.roots, 0, &mut out);
        out
    }

    fn summarize_complex(&self, ids: &[FieldId], indent: usize, out: &mut String) {
        for &id in ids {
            let field = self.field(id);
            if field.structural_type != StructuralType::Complex {
                continue;
            }
            for _ in 0..indent {
                out.push('\t');
            }
            let _ = writeln!(
                out,
                "{} ({}) children: {}",
                field.display_name,
                field.class_identifier.as_deref().unwrap_or("-"),
                field.children.len()
            );
            self.summarize_complex(&field.children, indent + 1, out);
        }
    }

    pub(crate) fn push_field(&mut self, field: Field) -> FieldId {
        let id = FieldId(self.arena.len() as u32);
        self.arena.push(field);
        id
    }

    /// Deep-copies a (detached) subtree into a new parent, recomputing path
    /// and depth relative to it. Overlay flags travel along but prototypes
    /// are never mutated, so copies always start clean.
    pub(crate) fn clone_subtree(
        &mut self,
        src: FieldId,
        parent: Option<FieldId>,
        parent_path: &str,
        depth: usize,
    ) -> FieldId {
        let mut field = self.field(src).clone();
        let src_children = std::mem::take(&mut field.children);
        field.parent = parent;
        field.depth = depth;
        field.path = if parent_path.is_empty() {
            field.display_name.clone()
        } else {
            format!("{}{}{}", parent_path, PATH_SEPARATOR, field.display_name)
        };
        let id = self.push_field(field);
        let path = self.field(id).path.clone();
        for src_child in src_children {
            let child = self.clone_subtree(src_child, Some(id), &path, depth + 1);
            self.field_mut(id).children.push(child);
        }
        id
    }

    /// Appends a materialized subtree to every index, pre-order.
    pub(crate) fn index_subtree(&mut self, id: FieldId) {
        let subtree: Vec<FieldId> = walk::descendants(self, id).collect();
        for fid in subtree {
            let (path, terminal, enum_class) = {
                let field = self.field(fid);
                let enum_class = if field.enumeration {
                    field.class_identifier.clone()
                } else {
                    None
                };
                (field.path.clone(), field.is_terminal(), enum_class)
            };
            self.all_fields.push(fid);
            self.field_paths.push(path.clone());
            self.fields_by_path.insert(path, fid);
            if terminal {
                self.terminal_fields.push(fid);
            }
            if let Some(class) = enum_class {
                self.enum_prototypes.entry(class).or_insert(fid);
            }
        }
    }

    fn degrade_to_terminal(&mut self, id: FieldId) {
        self.field_mut(id).expansion = ExpansionState::Expanded;
        self.terminal_fields.push(id);
    }
}
