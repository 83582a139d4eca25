//! HTTP round trips over the in-memory backend.

mod common;

use axum::http::StatusCode;
use common::TestApp;
use rust_decimal_macros::dec;
use serde_json::json;

use bundleflow_api::models::{
    BundleComponentRow, Opportunity, OpportunityItem, OutstandingInvoice, ProductBundle,
    ProductBundleItem,
};

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::new();
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn quotation_conversion_round_trips() {
    let app = TestApp::new();
    app.store.insert_opportunity(Opportunity {
        name: "OPP-0001".to_string(),
        company: "Initech".to_string(),
        currency: "EUR".to_string(),
        items: vec![OpportunityItem {
            item_code: "ITEM-A".to_string(),
            qty: dec!(1),
            rate: dec!(100),
            ..Default::default()
        }],
        bundle_components: vec![BundleComponentRow {
            item_code: "COMP-X".to_string(),
            qty: dec!(2),
            ..Default::default()
        }],
        ..Default::default()
    });

    let (status, body) = app
        .post_json(
            "/api/v1/bundles/quotation",
            json!({"source_name": "OPP-0001"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let bom = body["document"]["delivery_bom"].as_array().unwrap();
    assert_eq!(bom.len(), 1);
    assert_eq!(bom[0]["item"], "COMP-X");
    assert!(body.get("recompute_warning").is_none());
}

#[tokio::test]
async fn empty_source_name_is_rejected() {
    let app = TestApp::new();
    let (status, _) = app
        .post_json("/api/v1/bundles/quotation", json!({"source_name": ""}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_conversion_source_maps_to_not_found() {
    let app = TestApp::new();
    let (status, body) = app
        .post_json(
            "/api/v1/bundles/quotation",
            json!({"source_name": "OPP-MISSING"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("OPP-MISSING"));
}

#[tokio::test]
async fn delivery_bom_lookup_round_trips() {
    let app = TestApp::new();
    app.store.insert_opportunity(Opportunity {
        name: "OPP-0002".to_string(),
        bundle_components: vec![
            BundleComponentRow {
                item_code: "COMP-X".to_string(),
                qty: dec!(2),
                ..Default::default()
            },
            BundleComponentRow {
                item_code: String::new(),
                qty: dec!(7),
                ..Default::default()
            },
        ],
        ..Default::default()
    });

    let (status, body) = app.get("/api/v1/delivery-bom/opportunity/OPP-0002").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["item"], "COMP-X");
}

#[tokio::test]
async fn rollup_endpoint_returns_rolled_up_document() {
    let app = TestApp::new();
    app.store.insert_product_bundle(ProductBundle {
        name: "BUN-1".to_string(),
        items: vec![ProductBundleItem {
            item_code: "COMP-X".to_string(),
            qty: dec!(2),
            ..Default::default()
        }],
    });

    let document = json!({
        "name": "OPP-0003",
        "items": [{
            "item_code": "ITEM-A",
            "qty": 1,
            "rate": 100,
            "product_bundle": "BUN-1"
        }]
    });
    let (status, body) = app
        .post_json("/api/v1/opportunities/rollup", document)
        .await;

    assert_eq!(status, StatusCode::OK);
    let components = body["bundle_components"].as_array().unwrap();
    assert_eq!(components.len(), 1);
    assert_eq!(components[0]["item_code"], "COMP-X");
    assert_eq!(body["items"][0]["margin"], "100");
}

#[tokio::test]
async fn lenient_quantities_coerce_to_zero_over_http() {
    let app = TestApp::new();
    let document = json!({
        "name": "OPP-0004",
        "items": [{
            "item_code": "ITEM-A",
            "qty": "not-a-number",
            "rate": null
        }]
    });
    let (status, body) = app
        .post_json("/api/v1/opportunities/rollup", document)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["qty"], "0");
    assert_eq!(body["items"][0]["margin"], "0");
}

#[tokio::test]
async fn receivables_listing_round_trips() {
    let app = TestApp::new();
    app.store.insert_invoice(
        "ACME",
        OutstandingInvoice {
            name: "SI-0001".to_string(),
            posting_date: chrono::NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            grand_total: dec!(250),
            outstanding_amount: dec!(250),
        },
    );

    let (status, body) = app.get("/api/v1/receivables/ACME").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "SI-0001");
}
