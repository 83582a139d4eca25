use async_trait::async_trait;
use dashmap::DashMap;

use crate::errors::ServiceError;
use crate::models::{
    ItemMaster, Opportunity, OutstandingInvoice, ProductBundle, Quotation, SalesOrder,
};

use super::DocumentStore;

/// DashMap-backed document store.
///
/// Serves the `memory` backend for local runs and doubles as the fixture
/// store for the test suites. Documents are keyed by their host name.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    opportunities: DashMap<String, Opportunity>,
    quotations: DashMap<String, Quotation>,
    sales_orders: DashMap<String, SalesOrder>,
    bundles: DashMap<String, ProductBundle>,
    items: DashMap<String, ItemMaster>,
    invoices: DashMap<String, InvoiceRecord>,
}

#[derive(Clone, Debug)]
struct InvoiceRecord {
    customer: String,
    row: OutstandingInvoice,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_opportunity(&self, doc: Opportunity) {
        self.opportunities.insert(doc.name.clone(), doc);
    }

    pub fn insert_quotation(&self, doc: Quotation) {
        self.quotations.insert(doc.name.clone(), doc);
    }

    pub fn insert_sales_order(&self, doc: SalesOrder) {
        self.sales_orders.insert(doc.name.clone(), doc);
    }

    pub fn insert_product_bundle(&self, doc: ProductBundle) {
        self.bundles.insert(doc.name.clone(), doc);
    }

    pub fn insert_item(&self, doc: ItemMaster) {
        self.items.insert(doc.item_code.clone(), doc);
    }

    pub fn insert_invoice(&self, customer: impl Into<String>, row: OutstandingInvoice) {
        self.invoices.insert(
            row.name.clone(),
            InvoiceRecord {
                customer: customer.into(),
                row,
            },
        );
    }

    pub fn remove_opportunity(&self, name: &str) {
        self.opportunities.remove(name);
    }

    pub fn remove_sales_order(&self, name: &str) {
        self.sales_orders.remove(name);
    }

    pub fn remove_product_bundle(&self, name: &str) {
        self.bundles.remove(name);
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn opportunity(&self, name: &str) -> Result<Option<Opportunity>, ServiceError> {
        Ok(self.opportunities.get(name).map(|doc| doc.value().clone()))
    }

    async fn quotation(&self, name: &str) -> Result<Option<Quotation>, ServiceError> {
        Ok(self.quotations.get(name).map(|doc| doc.value().clone()))
    }

    async fn sales_order(&self, name: &str) -> Result<Option<SalesOrder>, ServiceError> {
        Ok(self.sales_orders.get(name).map(|doc| doc.value().clone()))
    }

    async fn product_bundle(&self, name: &str) -> Result<Option<ProductBundle>, ServiceError> {
        Ok(self.bundles.get(name).map(|doc| doc.value().clone()))
    }

    async fn item(&self, item_code: &str) -> Result<Option<ItemMaster>, ServiceError> {
        Ok(self.items.get(item_code).map(|doc| doc.value().clone()))
    }

    async fn outstanding_sales_invoices(
        &self,
        customer: &str,
    ) -> Result<Vec<OutstandingInvoice>, ServiceError> {
        let mut rows: Vec<OutstandingInvoice> = self
            .invoices
            .iter()
            .filter(|entry| entry.customer == customer)
            .map(|entry| entry.row.clone())
            .collect();
        rows.sort_by(|a, b| b.posting_date.cmp(&a.posting_date));
        Ok(rows)
    }
}
