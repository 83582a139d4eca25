//! Document access boundary.
//!
//! The host ERP owns persistence, permissions and naming; this crate only
//! ever reads documents through the [`DocumentStore`] trait and hands
//! enriched, unpersisted documents back to the caller.

use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::models::{
    ItemMaster, Opportunity, OutstandingInvoice, ProductBundle, Quotation, SalesOrder,
};

pub mod http;
pub mod memory;

pub use http::ErpClient;
pub use memory::InMemoryDocumentStore;

/// Read-only lookups against the host document service.
///
/// `Ok(None)` means the document does not exist; transport failures surface
/// as `ServiceError::ExternalApiError` and propagate to the caller.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn opportunity(&self, name: &str) -> Result<Option<Opportunity>, ServiceError>;

    async fn quotation(&self, name: &str) -> Result<Option<Quotation>, ServiceError>;

    async fn sales_order(&self, name: &str) -> Result<Option<SalesOrder>, ServiceError>;

    async fn product_bundle(&self, name: &str) -> Result<Option<ProductBundle>, ServiceError>;

    async fn item(&self, item_code: &str) -> Result<Option<ItemMaster>, ServiceError>;

    /// Submitted sales invoices for a customer, newest posting date first.
    async fn outstanding_sales_invoices(
        &self,
        customer: &str,
    ) -> Result<Vec<OutstandingInvoice>, ServiceError>;
}
