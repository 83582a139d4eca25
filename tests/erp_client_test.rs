//! ErpClient wire tests against a mock host.

use rust_decimal_macros::dec;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bundleflow_api::convert::ConversionEngine;
use bundleflow_api::errors::ServiceError;
use bundleflow_api::store::{DocumentStore, ErpClient};

async fn client_for(server: &MockServer) -> ErpClient {
    ErpClient::new(
        Url::parse(&server.uri()).unwrap(),
        Some("key:secret".to_string()),
    )
    .unwrap()
}

#[tokio::test]
async fn document_reads_unwrap_the_data_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/resource/Opportunity/OPP-0001"))
        .and(header("Authorization", "token key:secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "name": "OPP-0001",
                "items": [{"item_code": "ITEM-A", "qty": 2, "rate": 100}],
                "bundle_components": [{"item_code": "COMP-X", "qty": "3"}]
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let opportunity = client.opportunity("OPP-0001").await.unwrap().unwrap();
    assert_eq!(opportunity.items[0].qty, dec!(2));
    assert_eq!(opportunity.bundle_components[0].qty, dec!(3));
}

#[tokio::test]
async fn missing_documents_map_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/resource/Opportunity/OPP-GONE"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert!(client.opportunity("OPP-GONE").await.unwrap().is_none());
}

#[tokio::test]
async fn host_failures_propagate_as_external_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/resource/Quotation/QTN-0001"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.quotation("QTN-0001").await;
    assert!(matches!(result, Err(ServiceError::ExternalApiError(_))));
}

#[tokio::test]
async fn conversions_post_source_and_unwrap_the_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(
            "/api/method/erpnext.crm.doctype.opportunity.opportunity.make_quotation",
        ))
        .and(body_partial_json(json!({"source_name": "OPP-0001"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {
                "name": "QTN-0001",
                "items": [{"item_code": "ITEM-A", "qty": 1, "rate": 100, "amount": 100}]
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let quotation = client
        .quotation_from_opportunity("OPP-0001", None)
        .await
        .unwrap();
    assert_eq!(quotation.name, "QTN-0001");
    assert_eq!(quotation.items.len(), 1);
}

#[tokio::test]
async fn outstanding_invoices_call_the_accounts_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(
            "/api/method/erpnext.accounts.utils.get_outstanding_invoices",
        ))
        .and(body_partial_json(json!({
            "doctype": "Sales Invoice",
            "party": "ACME"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": [{
                "name": "SI-0001",
                "posting_date": "2026-03-01",
                "grand_total": 250,
                "outstanding_amount": 100
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let rows = client.outstanding_sales_invoices("ACME").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].grand_total, dec!(250));
}

#[tokio::test]
async fn refresh_swaps_in_the_returned_document() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/method/run_doc_method"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "docs": [{
                "name": "QTN-0001",
                "total": 125
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let mut quotation = bundleflow_api::models::Quotation {
        name: "QTN-0001".to_string(),
        ..Default::default()
    };
    client.refresh_quotation(&mut quotation).await.unwrap();
    assert_eq!(quotation.total, dec!(125));
}
