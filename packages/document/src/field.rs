//! # Field Entity
//!
//! One node of a document's hierarchical schema. Fields live in their
//! document's arena and reference each other by [`FieldId`]; the document
//! owns the storage, parents own their child id lists, and the `parent`
//! handle is never an ownership edge.

use serde::Serialize;

/// Separator between ancestor display names in a field path.
pub const PATH_SEPARATOR: char = '.';

/// Name and path of the `[None]` sentinel field.
pub const NONE_FIELD_PATH: &str = "[None]";

/// Handle to a field in its document's arena.
///
/// The arena is append-only, so ids stay stable for the lifetime of the
/// document. Ids are only meaningful for the document that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FieldId(pub(crate) u32);

impl FieldId {
    /// Position of the field in the document arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Structural classification of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StructuralType {
    /// Scalar field, carrying the inspection type tag ("STRING", "NUMBER", ...).
    Primitive(String),

    /// Structured field whose children are defined by a named prototype.
    Complex,

    /// Repeating field.
    Collection,
}

impl StructuralType {
    /// Whether fields of this type materialize children through the
    /// prototype cache.
    pub fn is_expandable(&self) -> bool {
        matches!(self, StructuralType::Complex | StructuralType::Collection)
    }
}

/// Expansion lifecycle of a field.
///
/// A complex field with zero children is otherwise indistinguishable from an
/// unexpanded one, so the state is tracked explicitly instead of being
/// inferred from child count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExpansionState {
    /// Plain leaf; never had children to materialize.
    Leaf,

    /// Children exist in the type prototype but have not been materialized.
    NeedsExpansion,

    /// Children have been materialized (possibly none).
    Expanded,
}

/// A field in a document's schema tree.
#[derive(Debug, Clone, Serialize)]
pub struct Field {
    /// Raw name as delivered by the inspection service.
    pub name: String,

    /// Name with its first character upper-cased; display-only.
    pub display_name: String,

    /// Dot-separated ancestor display names, root-relative; unique within
    /// the document.
    pub path: String,

    /// 0 at root, parent depth + 1 below.
    pub depth: usize,

    pub structural_type: StructuralType,
    pub is_collection: bool,
    pub enumeration: bool,

    /// Opaque key into the prototype cache; present only on complex and
    /// enumerable fields.
    pub class_identifier: Option<String>,

    pub expansion: ExpansionState,

    /// Ordered child handles; empty until the resolver materializes them.
    pub children: Vec<FieldId>,

    /// Back-handle to the parent; `None` at root.
    pub parent: Option<FieldId>,

    // Transient overlay state, rewritten by every overlay pass.
    pub selected: bool,
    pub part_of_mapping: bool,
    pub part_of_transformation: bool,
    pub has_unmapped_children: bool,
    pub available_for_selection: bool,
    pub selection_exclusion_reason: Option<String>,
    pub visible: bool,
    pub collapsed: bool,
}

impl Field {
    pub(crate) fn new(name: String, structural_type: StructuralType) -> Self {
        let display_name = display_name_of(&name);
        Self {
            name,
            display_name,
            path: String::new(),
            depth: 0,
            structural_type,
            is_collection: false,
            enumeration: false,
            class_identifier: None,
            expansion: ExpansionState::Leaf,
            children: Vec::new(),
            parent: None,
            selected: false,
            part_of_mapping: false,
            part_of_transformation: false,
            has_unmapped_children: false,
            available_for_selection: true,
            selection_exclusion_reason: None,
            visible: true,
            collapsed: true,
        }
    }

    /// The `[None]` sentinel offered alongside real terminal fields.
    /// Constructed once per document and never mutated afterwards.
    pub(crate) fn none() -> Self {
        let mut field = Field::new(
            NONE_FIELD_PATH.to_string(),
            StructuralType::Primitive(String::new()),
        );
        field.display_name = NONE_FIELD_PATH.to_string();
        field.path = NONE_FIELD_PATH.to_string();
        field.collapsed = false;
        field
    }

    /// A field is terminal once it has no children and no expansion pending.
    pub fn is_terminal(&self) -> bool {
        self.children.is_empty() && self.expansion != ExpansionState::NeedsExpansion
    }

    /// Clears the transient overlay state ahead of an overlay pass.
    /// `visible` and `collapsed` survive, they belong to the view state.
    pub fn reset_overlay_flags(&mut self) {
        self.selected = false;
        self.part_of_mapping = false;
        self.part_of_transformation = false;
        self.has_unmapped_children = false;
        self.available_for_selection = true;
        self.selection_exclusion_reason = None;
    }
}

/// Display form of a field name: first character upper-cased.
pub fn display_name_of(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
