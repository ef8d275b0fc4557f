//! # Mapping Overlay Engine
//!
//! Recomputes the transient per-field flags of one document from the
//! current mapping set. The pass runs synchronously on initial load, on
//! every active-mapping change, and on every change to a mapping's path
//! set; it rewrites flags in place and never fails, since unresolvable
//! paths degrade to diagnostics.
//!
//! ## Pass order
//!
//! 1. Reset every field's overlay flags to the optimistic default
//! 2. Determine the collection mode imposed by the active mapping
//! 3. Apply selection eligibility to terminal fields
//! 4. Mark mapped fields and their ancestor chains
//! 5. Recompute the unmapped-descendant flag bottom-up

use tracing::debug;

use fieldmap_document::{walk, DocumentDefinition, FieldId};

use crate::model::MappingDefinition;

/// Eligibility regime imposed by an active collection-mode mapping.
///
/// `Primitive` applies when the first mapped field stands outside any
/// collection; `Scoped` pins further selections to the direct children of
/// the collection the first mapped field lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionMode {
    Inactive,
    Primitive,
    Scoped { root: FieldId },
}

/// Runs the full overlay pass over one document.
pub fn update_document(doc: &mut DocumentDefinition, mappings: &MappingDefinition) {
    // Resolve every mapping's paths up front: eligibility must see the tree
    // fully materialized, not grow it mid-pass.
    for (mapping, _) in mappings.mappings_with_active() {
        let _ = doc.get_fields(mapping.field_paths(doc.is_source));
    }

    for id in doc.all_fields().to_vec() {
        doc.field_mut(id).reset_overlay_flags();
    }

    let mode = determine_collection_mode(doc, mappings);
    apply_collection_eligibility(doc, mode);
    apply_mappings(doc, mappings);
    refresh_unmapped_descendants(doc);
}

/// Derives the collection mode for this document's side of the active
/// mapping. With nothing mapped yet there is nothing to constrain against,
/// so the mode stays inactive.
fn determine_collection_mode(
    doc: &mut DocumentDefinition,
    mappings: &MappingDefinition,
) -> CollectionMode {
    let Some(active) = mappings.active_mapping() else {
        return CollectionMode::Inactive;
    };
    if !active.is_collection_mode() {
        return CollectionMode::Inactive;
    }
    let mapped = doc.get_fields(active.field_paths(doc.is_source));
    let Some(&first) = mapped.first() else {
        return CollectionMode::Inactive;
    };
    match walk::ancestors(doc, first).find(|&a| doc.field(a).is_collection) {
        Some(root) => CollectionMode::Scoped { root },
        None => CollectionMode::Primitive,
    }
}

/// Decides whether a terminal field may join the active mapping under the
/// given collection mode; returns the exclusion reason when it may not.
/// Pure function of the field and the mode.
pub fn selection_eligibility(
    doc: &DocumentDefinition,
    id: FieldId,
    mode: CollectionMode,
) -> Option<String> {
    match mode {
        CollectionMode::Inactive => None,
        CollectionMode::Primitive => {
            let field = doc.field(id);
            let in_collection = field.is_collection
                || walk::ancestors(doc, id).any(|a| doc.field(a).is_collection);
            if in_collection {
                Some("the active mapping maps fields outside of collections".to_string())
            } else {
                None
            }
        }
        CollectionMode::Scoped { root } => {
            if doc.field(id).parent == Some(root) {
                None
            } else {
                Some(format!(
                    "only fields in the '{}' collection can be added to the active mapping",
                    doc.field(root).display_name
                ))
            }
        }
    }
}

fn apply_collection_eligibility(doc: &mut DocumentDefinition, mode: CollectionMode) {
    if mode == CollectionMode::Inactive {
        return;
    }
    debug!("applying collection eligibility ({:?}) to '{}'", mode, doc.name);

    let mut eligible = Vec::new();
    for id in doc.terminal_fields(false) {
        match selection_eligibility(doc, id, mode) {
            None => eligible.push(id),
            Some(reason) => {
                let field = doc.field_mut(id);
                field.available_for_selection = false;
                field.selection_exclusion_reason = Some(reason);
            }
        }
    }
    for id in eligible {
        let chain: Vec<FieldId> = walk::ancestors(doc, id).collect();
        for ancestor in chain {
            doc.field_mut(ancestor).available_for_selection = true;
        }
    }
}

/// Marks mapping membership for every mapping in the set, active or not.
/// Only terminal fields of the active mapping read as selected, and a
/// selection forces its ancestor chain open.
fn apply_mappings(doc: &mut DocumentDefinition, mappings: &MappingDefinition) {
    let is_source = doc.is_source;
    for (mapping, is_active) in mappings.mappings_with_active() {
        let transformation = mapping.is_transformation();
        let resolved = doc.get_fields(mapping.field_paths(is_source));
        for id in resolved {
            let selected = is_active && doc.field(id).is_terminal();
            {
                let field = doc.field_mut(id);
                field.part_of_mapping = true;
                field.part_of_transformation |= transformation;
                field.selected |= selected;
            }
            let chain: Vec<FieldId> = walk::ancestors(doc, id).collect();
            for ancestor in chain {
                let field = doc.field_mut(ancestor);
                field.part_of_mapping = true;
                field.part_of_transformation |= transformation;
                if selected {
                    field.collapsed = false;
                }
            }
        }
    }
}

/// Bottom-up recomputation of `has_unmapped_children`: an unmapped terminal
/// carries the flag itself, a parent carries it when any child does.
/// Runs after the membership pass because it reads final `part_of_mapping`
/// values.
fn refresh_unmapped_descendants(doc: &mut DocumentDefinition) {
    for root in doc.roots().to_vec() {
        let order = walk::post_order(doc, root);
        for id in order {
            let flag = if doc.field(id).is_terminal() {
                !doc.field(id).part_of_mapping
            } else {
                doc.field(id)
                    .children
                    .iter()
                    .any(|&child| doc.field(child).has_unmapped_children)
            };
            doc.field_mut(id).has_unmapped_children = flag;
        }
    }
}
