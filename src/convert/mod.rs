//! Base document conversions.
//!
//! The host ERP ships field-mapping conversions for each step of the sales
//! pipeline (Opportunity → Quotation, Quotation → Sales Order, Sales Order →
//! Delivery Note / Sales Invoice) plus a per-document refresh hook that
//! fills defaults and recomputes taxes and totals. This crate consumes both
//! through [`ConversionEngine`]; the bundle enrichment happens on top of the
//! converted document.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::models::{DeliveryNote, Quotation, SalesInvoice, SalesOrder};

pub mod local;

pub use local::LocalConversionEngine;

/// Base conversions and refresh hooks provided by the host.
///
/// `overrides` is an opaque payload merged into the target by the host
/// mapper (column defaults, posting dates and the like); it is passed
/// through untouched.
#[async_trait]
pub trait ConversionEngine: Send + Sync {
    async fn quotation_from_opportunity(
        &self,
        source_name: &str,
        overrides: Option<Value>,
    ) -> Result<Quotation, ServiceError>;

    async fn sales_order_from_quotation(
        &self,
        source_name: &str,
        overrides: Option<Value>,
    ) -> Result<SalesOrder, ServiceError>;

    async fn delivery_note_from_sales_order(
        &self,
        source_name: &str,
        overrides: Option<Value>,
    ) -> Result<DeliveryNote, ServiceError>;

    async fn sales_invoice_from_sales_order(
        &self,
        source_name: &str,
        overrides: Option<Value>,
    ) -> Result<SalesInvoice, ServiceError>;

    async fn refresh_quotation(&self, document: &mut Quotation) -> Result<(), ServiceError>;

    async fn refresh_sales_order(&self, document: &mut SalesOrder) -> Result<(), ServiceError>;

    async fn refresh_delivery_note(&self, document: &mut DeliveryNote)
        -> Result<(), ServiceError>;

    async fn refresh_sales_invoice(
        &self,
        document: &mut SalesInvoice,
    ) -> Result<(), ServiceError>;
}

/// A refresh hook failure demoted to a warning.
///
/// Bundle enrichment already succeeded at that point; the conversion is
/// worth more than the recomputed totals, so the document is returned with
/// the warning attached instead of failing the whole call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct RecomputeWarning {
    pub message: String,
}

impl RecomputeWarning {
    pub fn new(error: ServiceError) -> Self {
        Self {
            message: error.to_string(),
        }
    }
}

/// An enriched, not-yet-persisted conversion target together with the
/// refresh warning, when the hook failed.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct ConversionOutcome<T> {
    pub document: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recompute_warning: Option<RecomputeWarning>,
}

impl<T> ConversionOutcome<T> {
    pub fn clean(document: T) -> Self {
        Self {
            document,
            recompute_warning: None,
        }
    }

    pub fn with_warning(document: T, warning: Option<RecomputeWarning>) -> Self {
        Self {
            document,
            recompute_warning: warning,
        }
    }
}
