//! Document model serde behavior.

use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use bundleflow_api::models::{DeliveryComponentRow, Opportunity};

#[rstest]
#[case(json!(2.5), dec!(2.5))]
#[case(json!(7), dec!(7))]
#[case(json!("3"), dec!(3))]
#[case(json!(" 4.25 "), dec!(4.25))]
#[case(json!("n/a"), Decimal::ZERO)]
#[case(json!(null), Decimal::ZERO)]
#[case(json!(true), Decimal::ZERO)]
fn quantities_coerce_leniently(#[case] raw: Value, #[case] expected: Decimal) {
    let row: DeliveryComponentRow =
        serde_json::from_value(json!({"item": "COMP-X", "qty": raw})).unwrap();
    assert_eq!(row.qty, expected);
}

#[test]
fn missing_tables_deserialize_to_empty() {
    let doc: Opportunity = serde_json::from_value(json!({"name": "OPP-0001"})).unwrap();
    assert!(doc.items.is_empty());
    assert!(doc.bundle_components.is_empty());
    assert_eq!(doc.total, Decimal::ZERO);
}

#[test]
fn optional_fields_are_omitted_when_absent() {
    let row = DeliveryComponentRow {
        item: "COMP-X".to_string(),
        qty: dec!(1),
        ..Default::default()
    };
    let value = serde_json::to_value(&row).unwrap();
    assert!(value.get("item_name").is_none());
    assert!(value.get("parent_product").is_none());
}
