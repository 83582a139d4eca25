//! Property-based tests for the row-propagation and margin invariants.

use std::sync::{Arc, OnceLock};

use proptest::prelude::*;
use rust_decimal::Decimal;
use tokio::runtime::Runtime;

use bundleflow_api::{
    convert::LocalConversionEngine,
    models::{DeliveryComponentRow, Opportunity, OpportunityItem, SalesOrder},
    schema::SchemaCapabilities,
    services::{BundlePropagationService, BundleRollupService},
    store::{DocumentStore, InMemoryDocumentStore},
};

fn rt() -> &'static Runtime {
    static RT: OnceLock<Runtime> = OnceLock::new();
    RT.get_or_init(|| Runtime::new().expect("test runtime"))
}

fn propagation_service(store: Arc<InMemoryDocumentStore>) -> BundlePropagationService {
    let store_dyn: Arc<dyn DocumentStore> = store;
    let engine = Arc::new(LocalConversionEngine::new(store_dyn.clone()));
    BundlePropagationService::new(store_dyn, engine, SchemaCapabilities::default(), None)
}

fn rollup_service(store: Arc<InMemoryDocumentStore>) -> BundleRollupService {
    let store_dyn: Arc<dyn DocumentStore> = store;
    BundleRollupService::new(store_dyn, SchemaCapabilities::default(), None)
}

// Strategies for generating test data
fn item_code_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("   ".to_string()),
        "[A-Z]{3,5}-[0-9]{2,4}".prop_map(|s| s),
    ]
}

fn qty_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000, 0u32..3).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

fn row_strategy() -> impl Strategy<Value = DeliveryComponentRow> {
    (item_code_strategy(), qty_strategy()).prop_map(|(item, qty)| DeliveryComponentRow {
        item,
        qty,
        ..Default::default()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    // Rows without an item identifier never survive propagation, and every
    // surviving row keeps its quantity.
    #[test]
    fn rows_without_item_never_propagate(rows in prop::collection::vec(row_strategy(), 0..12)) {
        let survivors = rt().block_on(async {
            let store = Arc::new(InMemoryDocumentStore::new());
            store.insert_sales_order(SalesOrder {
                name: "SO-PROP".to_string(),
                delivery_bom: rows.clone(),
                ..Default::default()
            });
            propagation_service(store)
                .delivery_bom_from_sales_order("SO-PROP")
                .await
                .unwrap()
        });

        let expected: Vec<&DeliveryComponentRow> =
            rows.iter().filter(|r| !r.item.trim().is_empty()).collect();
        prop_assert_eq!(survivors.len(), expected.len());
        for (survivor, source) in survivors.iter().zip(expected) {
            prop_assert_eq!(survivor.item.as_str(), source.item.trim());
            prop_assert_eq!(survivor.qty, source.qty);
            prop_assert!(!survivor.item.trim().is_empty());
        }
    }

    // Margin is zero whenever the selling rate is zero, regardless of the
    // stored purchase rate; otherwise it matches the percentage formula.
    #[test]
    fn margin_formula_holds(rate in 0i64..10_000, purchase in 0i64..10_000) {
        let rate = Decimal::new(rate, 1);
        let purchase = Decimal::new(purchase, 1);
        let line = rt().block_on(async {
            let store = Arc::new(InMemoryDocumentStore::new());
            let rollup = rollup_service(store);
            let mut doc = Opportunity {
                name: "OPP-PROP".to_string(),
                items: vec![OpportunityItem {
                    item_code: "SINGLE".to_string(),
                    rate,
                    purchase_rate: purchase,
                    ..Default::default()
                }],
                ..Default::default()
            };
            rollup.on_validate(&mut doc).await.unwrap();
            doc.items.remove(0)
        });

        if rate.is_zero() {
            prop_assert_eq!(line.margin, Decimal::ZERO);
        } else {
            let expected = (rate - purchase) / rate * Decimal::new(100, 0);
            prop_assert_eq!(line.margin, expected);
        }
    }

    // Lenient quantity parsing never rejects a document.
    #[test]
    fn arbitrary_qty_json_never_fails(raw in "[ -~]{0,12}") {
        let value = serde_json::json!({"item": "COMP-X", "qty": raw});
        let row: DeliveryComponentRow = serde_json::from_value(value).unwrap();
        let reparsed: Result<Decimal, _> = raw.trim().parse();
        match reparsed {
            Ok(expected) => prop_assert_eq!(row.qty, expected),
            Err(_) => prop_assert_eq!(row.qty, Decimal::ZERO),
        }
    }
}
