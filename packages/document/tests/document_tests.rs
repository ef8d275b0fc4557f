//! End-to-end document tests: inspection JSON in, indexed tree out.

use anyhow::Result;
use fieldmap_document::{
    parse_raw_fields, DocumentDefinition, DocumentError, InspectionFilters, NONE_FIELD_PATH,
};

const PURCHASE_ORDER: &str = r#"[
    {
        "name": "order",
        "fieldType": "COMPLEX",
        "className": "com.example.Order",
        "status": "SUPPORTED",
        "childFields": [
            {"name": "id", "fieldType": "STRING"},
            {"name": "total", "fieldType": "NUMBER"},
            {
                "name": "customer",
                "fieldType": "COMPLEX",
                "className": "com.example.Customer",
                "status": "SUPPORTED",
                "childFields": [
                    {"name": "email", "fieldType": "STRING"},
                    {"name": "name", "fieldType": "STRING"},
                    {
                        "name": "address",
                        "fieldType": "COMPLEX",
                        "className": "com.example.Address",
                        "status": "SUPPORTED",
                        "childFields": [
                            {"name": "street", "fieldType": "STRING"},
                            {"name": "city", "fieldType": "STRING"}
                        ]
                    }
                ]
            }
        ]
    },
    {"name": "createdOn", "fieldType": "DATE"}
]"#;

fn purchase_order_doc() -> Result<DocumentDefinition> {
    let mut doc = DocumentDefinition::new("PurchaseOrder", true);
    doc.populate_from_fields(parse_raw_fields(PURCHASE_ORDER)?, &InspectionFilters::default())?;
    Ok(doc)
}

#[test]
fn test_lazy_resolution_round_trip() -> Result<()> {
    let mut doc = purchase_order_doc()?;

    // Customer was truncated to childless at build time.
    let customer = doc.get_field("Order.Customer")?.unwrap();
    assert!(doc.field(customer).children.is_empty());
    let before = doc.field_count();

    let email = doc.get_field("Order.Customer.Email")?.unwrap();
    assert_eq!(doc.field(email).path, "Order.Customer.Email");
    assert_eq!(doc.field(email).parent, Some(customer));

    // Exactly one expansion: Customer gained its prototype children
    // (address, email, name) and nothing else was materialized.
    assert_eq!(doc.field(customer).children.len(), 3);
    assert_eq!(doc.field_count(), before + 3);

    // A second deep lookup hits the index without growing the tree.
    let again = doc.get_field("Order.Customer.Email")?.unwrap();
    assert_eq!(again, email);
    assert_eq!(doc.field_count(), before + 3);
    Ok(())
}

#[test]
fn test_expansion_recurses_through_cached_prototypes() -> Result<()> {
    let mut doc = purchase_order_doc()?;

    // Address is two truncation layers down; each ancestor expands in turn.
    let street = doc.get_field("Order.Customer.Address.Street")?.unwrap();
    assert_eq!(doc.field(street).depth, 3);
    assert!(doc.field(street).is_terminal());

    let address = doc.get_field("Order.Customer.Address")?.unwrap();
    assert_eq!(doc.field(address).children.len(), 2);
    Ok(())
}

#[test]
fn test_depth_consistency_after_expansion() -> Result<()> {
    let mut doc = purchase_order_doc()?;
    doc.get_field("Order.Customer.Address.City")?.unwrap();

    for &id in doc.all_fields() {
        let field = doc.field(id);
        match field.parent {
            Some(parent) => assert_eq!(field.depth, doc.field(parent).depth + 1),
            None => assert_eq!(field.depth, 0),
        }
    }
    Ok(())
}

#[test]
fn test_best_effort_multi_path_resolution() -> Result<()> {
    let mut doc = purchase_order_doc()?;
    let found = doc.get_fields(&[
        "Order.Id".to_string(),
        "NOPE".to_string(),
        "Order.Total".to_string(),
    ]);
    let paths: Vec<&str> = found.iter().map(|&id| doc.field(id).path.as_str()).collect();
    assert_eq!(paths, vec!["Order.Id", "Order.Total"]);
    Ok(())
}

#[test]
fn test_unresolvable_prefix_propagates() -> Result<()> {
    let mut doc = purchase_order_doc()?;
    let err = doc.get_field("Order.Ghost.Leaf").unwrap_err();
    assert!(matches!(err, DocumentError::UnresolvablePrefix { .. }));
    Ok(())
}

#[test]
fn test_none_sentinel_survives_everything() -> Result<()> {
    let mut doc = purchase_order_doc()?;
    let none = doc.get_field(NONE_FIELD_PATH)?.unwrap();
    assert_eq!(doc.field(none).display_name, NONE_FIELD_PATH);

    doc.clear_selected_fields();
    doc.apply_search_filter("email");
    doc.apply_search_filter("");

    let listed = doc.terminal_fields(true);
    assert_eq!(listed[0], none);
    assert!(!doc.all_fields().contains(&none));
    assert!(doc.field(none).visible);
    Ok(())
}

#[test]
fn test_selection_commands() -> Result<()> {
    let mut doc = purchase_order_doc()?;
    doc.select_fields(&[
        "Order.Customer.Email".to_string(),
        "CreatedOn".to_string(),
        "Missing".to_string(),
    ]);
    let selected: Vec<&str> = doc
        .selected_fields()
        .iter()
        .map(|&id| doc.field(id).path.as_str())
        .collect();
    // `selected_fields` reports in `all_fields` (pre-order, then appended
    // expansions) order: CreatedOn was indexed at build time, the email
    // field only materialized during this lookup.
    assert_eq!(selected, vec!["CreatedOn", "Order.Customer.Email"]);

    let order = doc.get_field("Order")?.unwrap();
    assert!(!doc.field(order).collapsed);
    Ok(())
}
