//! Column resolution behavior.

use rowsync_ingest::{ensure_identity_columns, normalize_label, resolve_columns};
use rowsync_model::{CollectionSpec, FieldSpec, IdentitySpec};

fn item_spec() -> CollectionSpec {
    CollectionSpec {
        collection: "Form_Items".to_string(),
        fields: vec![
            FieldSpec::text("Item_Code", &["Item_Code", "Item Code", "Code"]),
            FieldSpec::text("Item_Name", &["Item_Name", "Item Name", "Name"]),
            FieldSpec::text("Unit", &["Unit", "UOM"]),
        ],
        identity: vec![
            IdentitySpec::exact("Item_Code"),
            IdentitySpec::exact("Item_Name"),
        ],
        identity_as_record_id: false,
        relation_field: None,
        address_field: None,
    }
}

fn headers(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|label| (*label).to_string()).collect()
}

#[test]
fn label_normalization_strips_punctuation_and_case() {
    assert_eq!(normalize_label("Item_Code"), "itemcode");
    assert_eq!(normalize_label("Item Code"), "itemcode");
    assert_eq!(normalize_label("ITEMCODE"), "itemcode");
    assert_eq!(normalize_label("  item-code  "), "itemcode");
}

#[test]
fn variant_labels_resolve_to_same_field() {
    for label in ["Item Code", "item_code", "ITEMCODE"] {
        let map = resolve_columns(&headers(&[label]), &item_spec());
        assert_eq!(map.column("Item_Code"), Some(0), "label {label:?}");
    }
}

#[test]
fn first_matching_candidate_wins() {
    // Both "Code" and "Item Code" are present; "Item_Code" is the
    // preferred candidate and should win over the bare "Code" column.
    let map = resolve_columns(&headers(&["Code", "Item Code", "Unit"]), &item_spec());
    assert_eq!(map.column("Item_Code"), Some(1));
    assert_eq!(map.column("Unit"), Some(2));
}

#[test]
fn unmatched_fields_are_absent() {
    let map = resolve_columns(&headers(&["Unit"]), &item_spec());
    assert!(!map.contains("Item_Code"));
    assert!(!map.contains("Item_Name"));
    assert_eq!(map.len(), 1);
}

#[test]
fn missing_identity_columns_is_fatal() {
    let spec = item_spec();
    let map = resolve_columns(&headers(&["Unit", "Quantity"]), &spec);
    let error = ensure_identity_columns(&map, &spec).unwrap_err();
    assert!(error.to_string().contains("Item_Code"));

    let map = resolve_columns(&headers(&["Item"]), &spec);
    // "Item" is not a candidate for Item_Name in this spec.
    assert!(ensure_identity_columns(&map, &spec).is_err());

    let map = resolve_columns(&headers(&["Name"]), &spec);
    assert!(ensure_identity_columns(&map, &spec).is_ok());
}
