use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::instrument;
use url::Url;

use crate::convert::ConversionEngine;
use crate::errors::ServiceError;
use crate::models::{
    DeliveryNote, ItemMaster, Opportunity, OutstandingInvoice, ProductBundle, Quotation,
    SalesInvoice, SalesOrder,
};

use super::DocumentStore;

// Host RPC paths for the base conversions. These default to the mapper
// locations of an ERPNext-compatible host; the receivables listing is the
// query the accounts module exposes for outstanding invoices.
const MAKE_QUOTATION: &str = "erpnext.crm.doctype.opportunity.opportunity.make_quotation";
const MAKE_SALES_ORDER: &str = "erpnext.selling.doctype.quotation.quotation.make_sales_order";
const MAKE_DELIVERY_NOTE: &str =
    "erpnext.selling.doctype.sales_order.sales_order.make_delivery_note";
const MAKE_SALES_INVOICE: &str =
    "erpnext.selling.doctype.sales_order.sales_order.make_sales_invoice";
const RUN_DOC_METHOD: &str = "run_doc_method";
const OUTSTANDING_INVOICES: &str = "erpnext.accounts.utils.get_outstanding_invoices";

/// REST client for the host ERP document service.
///
/// Implements both [`DocumentStore`] (resource reads) and
/// [`ConversionEngine`] (mapped-document RPCs and document refresh) against
/// the host's `/api/resource` and `/api/method` surface.
#[derive(Clone)]
pub struct ErpClient {
    base_url: Url,
    client: reqwest::Client,
    auth_token: Option<String>,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct MessageEnvelope<T> {
    message: T,
}

#[derive(Deserialize)]
struct DocsEnvelope<T> {
    docs: Vec<T>,
}

impl ErpClient {
    pub fn new(base_url: Url, auth_token: Option<String>) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(ServiceError::external)?;
        Ok(Self {
            base_url,
            client,
            auth_token,
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.header("Authorization", format!("token {token}")),
            None => request,
        }
    }

    fn resource_url(&self, doctype: &str, name: &str) -> Result<Url, ServiceError> {
        self.base_url
            .join(&format!("api/resource/{doctype}/{name}"))
            .map_err(ServiceError::external)
    }

    fn method_url(&self, method: &str) -> Result<Url, ServiceError> {
        self.base_url
            .join(&format!("api/method/{method}"))
            .map_err(ServiceError::external)
    }

    /// Fetches one document; a 404 from the host maps to `Ok(None)`.
    async fn get_doc<T: DeserializeOwned>(
        &self,
        doctype: &str,
        name: &str,
    ) -> Result<Option<T>, ServiceError> {
        let url = self.resource_url(doctype, name)?;
        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(ServiceError::external)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.error_for_status().map_err(ServiceError::external)?;
        let envelope: DataEnvelope<T> = response.json().await.map_err(ServiceError::external)?;
        Ok(Some(envelope.data))
    }

    /// Invokes a whitelisted host method and unwraps its `message` payload.
    async fn call_method<T: DeserializeOwned>(
        &self,
        method: &str,
        args: &Value,
    ) -> Result<T, ServiceError> {
        let url = self.method_url(method)?;
        let response = self
            .authorize(self.client.post(url).json(args))
            .send()
            .await
            .map_err(ServiceError::external)?
            .error_for_status()
            .map_err(ServiceError::external)?;
        let envelope: MessageEnvelope<T> =
            response.json().await.map_err(ServiceError::external)?;
        Ok(envelope.message)
    }

    async fn convert<T: DeserializeOwned>(
        &self,
        method: &str,
        source_name: &str,
        overrides: Option<Value>,
    ) -> Result<T, ServiceError> {
        let args = json!({
            "source_name": source_name,
            "target_doc": overrides,
        });
        self.call_method(method, &args).await
    }

    /// Runs a named document hook on the host and swaps in the document it
    /// returns. Used for the set-defaults / recompute-totals refresh.
    async fn run_doc_method<T>(&self, document: &mut T, method: &str) -> Result<(), ServiceError>
    where
        T: Serialize + DeserializeOwned,
    {
        let url = self.method_url(RUN_DOC_METHOD)?;
        let args = json!({
            "docs": serde_json::to_value(&*document)?,
            "method": method,
        });
        let response = self
            .authorize(self.client.post(url).json(&args))
            .send()
            .await
            .map_err(ServiceError::external)?
            .error_for_status()
            .map_err(ServiceError::external)?;
        let envelope: DocsEnvelope<T> = response.json().await.map_err(ServiceError::external)?;
        if let Some(updated) = envelope.docs.into_iter().next() {
            *document = updated;
        }
        Ok(())
    }

    async fn refresh<T>(&self, document: &mut T) -> Result<(), ServiceError>
    where
        T: Serialize + DeserializeOwned + Send,
    {
        self.run_doc_method(document, "set_missing_values").await?;
        self.run_doc_method(document, "calculate_taxes_and_totals")
            .await
    }
}

#[async_trait]
impl DocumentStore for ErpClient {
    #[instrument(skip(self))]
    async fn opportunity(&self, name: &str) -> Result<Option<Opportunity>, ServiceError> {
        self.get_doc("Opportunity", name).await
    }

    #[instrument(skip(self))]
    async fn quotation(&self, name: &str) -> Result<Option<Quotation>, ServiceError> {
        self.get_doc("Quotation", name).await
    }

    #[instrument(skip(self))]
    async fn sales_order(&self, name: &str) -> Result<Option<SalesOrder>, ServiceError> {
        self.get_doc("Sales Order", name).await
    }

    #[instrument(skip(self))]
    async fn product_bundle(&self, name: &str) -> Result<Option<ProductBundle>, ServiceError> {
        self.get_doc("Product Bundle", name).await
    }

    #[instrument(skip(self))]
    async fn item(&self, item_code: &str) -> Result<Option<ItemMaster>, ServiceError> {
        self.get_doc("Item", item_code).await
    }

    #[instrument(skip(self))]
    async fn outstanding_sales_invoices(
        &self,
        customer: &str,
    ) -> Result<Vec<OutstandingInvoice>, ServiceError> {
        self.call_method(
            OUTSTANDING_INVOICES,
            &json!({
                "doctype": "Sales Invoice",
                "party_type": "Customer",
                "party": customer,
            }),
        )
        .await
    }
}

#[async_trait]
impl ConversionEngine for ErpClient {
    #[instrument(skip(self, overrides))]
    async fn quotation_from_opportunity(
        &self,
        source_name: &str,
        overrides: Option<Value>,
    ) -> Result<Quotation, ServiceError> {
        self.convert(MAKE_QUOTATION, source_name, overrides).await
    }

    #[instrument(skip(self, overrides))]
    async fn sales_order_from_quotation(
        &self,
        source_name: &str,
        overrides: Option<Value>,
    ) -> Result<SalesOrder, ServiceError> {
        self.convert(MAKE_SALES_ORDER, source_name, overrides).await
    }

    #[instrument(skip(self, overrides))]
    async fn delivery_note_from_sales_order(
        &self,
        source_name: &str,
        overrides: Option<Value>,
    ) -> Result<DeliveryNote, ServiceError> {
        self.convert(MAKE_DELIVERY_NOTE, source_name, overrides)
            .await
    }

    #[instrument(skip(self, overrides))]
    async fn sales_invoice_from_sales_order(
        &self,
        source_name: &str,
        overrides: Option<Value>,
    ) -> Result<SalesInvoice, ServiceError> {
        self.convert(MAKE_SALES_INVOICE, source_name, overrides)
            .await
    }

    async fn refresh_quotation(&self, document: &mut Quotation) -> Result<(), ServiceError> {
        self.refresh(document).await
    }

    async fn refresh_sales_order(&self, document: &mut SalesOrder) -> Result<(), ServiceError> {
        self.refresh(document).await
    }

    async fn refresh_delivery_note(
        &self,
        document: &mut DeliveryNote,
    ) -> Result<(), ServiceError> {
        self.refresh(document).await
    }

    async fn refresh_sales_invoice(
        &self,
        document: &mut SalesInvoice,
    ) -> Result<(), ServiceError> {
        self.refresh(document).await
    }
}
