//! Traversal helpers for the field arena.
//!
//! The tree lives in a per-document arena and nodes reference each other by
//! [`FieldId`], so traversal is expressed as iterators over ids rather than
//! recursive walks over owned nodes. Callers that mutate while traversing
//! collect the ids first.

use crate::document::DocumentDefinition;
use crate::field::FieldId;

/// Iterates a field's ancestor chain, nearest first, root last.
pub fn ancestors(doc: &DocumentDefinition, id: FieldId) -> Ancestors<'_> {
    Ancestors {
        doc,
        next: doc.field(id).parent,
    }
}

pub struct Ancestors<'a> {
    doc: &'a DocumentDefinition,
    next: Option<FieldId>,
}

impl Iterator for Ancestors<'_> {
    type Item = FieldId;

    fn next(&mut self) -> Option<FieldId> {
        let current = self.next?;
        self.next = self.doc.field(current).parent;
        Some(current)
    }
}

/// Iterates a subtree pre-order, starting with the field itself.
pub fn descendants(doc: &DocumentDefinition, id: FieldId) -> Descendants<'_> {
    Descendants {
        doc,
        stack: vec![id],
    }
}

pub struct Descendants<'a> {
    doc: &'a DocumentDefinition,
    stack: Vec<FieldId>,
}

impl Iterator for Descendants<'_> {
    type Item = FieldId;

    fn next(&mut self) -> Option<FieldId> {
        let current = self.stack.pop()?;
        let children = &self.doc.field(current).children;
        self.stack.extend(children.iter().rev().copied());
        Some(current)
    }
}

/// Collects a subtree post-order: every child before its parent.
pub fn post_order(doc: &DocumentDefinition, id: FieldId) -> Vec<FieldId> {
    let mut order = Vec::new();
    collect_post_order(doc, id, &mut order);
    order
}

fn collect_post_order(doc: &DocumentDefinition, id: FieldId, out: &mut Vec<FieldId>) {
    for &child in &doc.field(id).children {
        collect_post_order(doc, child, out);
    }
    out.push(id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentDefinition;
    use crate::raw::{parse_raw_fields, InspectionFilters};

    fn sample_doc() -> DocumentDefinition {
        let raw = parse_raw_fields(
            r#"[
                {
                    "name": "order",
                    "fieldType": "COMPLEX",
                    "className": "Order",
                    "status": "SUPPORTED",
                    "childFields": [
                        {"name": "id", "fieldType": "STRING"},
                        {"name": "total", "fieldType": "NUMBER"}
                    ]
                }
            ]"#,
        )
        .unwrap();
        let mut doc = DocumentDefinition::new("test", true);
        doc.populate_from_fields(raw, &InspectionFilters::default())
            .unwrap();
        doc
    }

    #[test]
    fn test_ancestors_walk_to_root() {
        let mut doc = sample_doc();
        let id = doc.get_field("Order.Total").unwrap().unwrap();
        let chain: Vec<String> = ancestors(&doc, id)
            .map(|a| doc.field(a).path.clone())
            .collect();
        assert_eq!(chain, vec!["Order".to_string()]);
    }

    #[test]
    fn test_descendants_are_pre_order() {
        let mut doc = sample_doc();
        let root = doc.get_field("Order").unwrap().unwrap();
        let paths: Vec<String> = descendants(&doc, root)
            .map(|f| doc.field(f).path.clone())
            .collect();
        assert_eq!(paths, vec!["Order", "Order.Id", "Order.Total"]);
    }

    #[test]
    fn test_post_order_visits_children_first() {
        let mut doc = sample_doc();
        let root = doc.get_field("Order").unwrap().unwrap();
        let paths: Vec<String> = post_order(&doc, root)
            .iter()
            .map(|&f| doc.field(f).path.clone())
            .collect();
        assert_eq!(paths, vec!["Order.Id", "Order.Total", "Order"]);
    }
}
