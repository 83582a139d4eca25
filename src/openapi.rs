use utoipa::OpenApi;

use crate::errors::ErrorResponse;
use crate::handlers;
use crate::handlers::conversions::{ConvertRequest, PurchaseOrderRequest};
use crate::models::{
    BundleComponentRow, DeliveryComponentRow, DeliveryNote, DeliveryNoteItem, ItemMaster,
    Opportunity, OpportunityItem, OutstandingInvoice, ProductBundle, ProductBundleItem,
    PurchaseOrder, PurchaseOrderItem, Quotation, QuotationItem, SalesInvoice, SalesInvoiceItem,
    SalesOrder, SalesOrderItem,
};

/// OpenAPI document for the bundle propagation and rollup surface.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::conversions::make_quotation,
        handlers::conversions::make_sales_order,
        handlers::conversions::make_delivery_note,
        handlers::conversions::make_sales_invoice,
        handlers::conversions::make_purchase_order,
        handlers::delivery_bom::from_opportunity,
        handlers::delivery_bom::from_quotation,
        handlers::delivery_bom::from_sales_order,
        handlers::opportunities::rollup,
        handlers::receivables::outstanding_invoices,
    ),
    components(schemas(
        BundleComponentRow,
        ConvertRequest,
        PurchaseOrderRequest,
        DeliveryComponentRow,
        DeliveryNote,
        DeliveryNoteItem,
        ItemMaster,
        Opportunity,
        OpportunityItem,
        OutstandingInvoice,
        ProductBundle,
        ProductBundleItem,
        PurchaseOrder,
        PurchaseOrderItem,
        Quotation,
        QuotationItem,
        SalesInvoice,
        SalesInvoiceItem,
        SalesOrder,
        SalesOrderItem,
        ErrorResponse,
    )),
    tags(
        (name = "bundles", description = "Document conversions carrying bundle rows"),
        (name = "delivery-bom", description = "Read-only delivery BOM derivation"),
        (name = "opportunities", description = "Opportunity validation hooks"),
        (name = "receivables", description = "Receivables queries"),
    )
)]
pub struct ApiDoc;
