use serde::{Deserialize, Serialize};

/// Describes which optional custom fields and child tables the host ERP's
/// document schemas carry. Every conditional write in the pipeline and the
/// rollup checks this descriptor instead of reflecting over the schema at
/// runtime; a missing capability downgrades the write to a silent skip.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaCapabilities {
    /// Quotation carries a delivery-BOM child table.
    pub quotation_delivery_bom: bool,
    /// Sales Order carries a delivery-BOM child table.
    pub sales_order_delivery_bom: bool,
    /// Opportunity carries the bundle component child table.
    pub opportunity_bundle_table: bool,
    /// Bundle component rows can link back to their parent line item.
    pub bundle_parent_product: bool,
    /// Bundle component rows carry a total-cost field.
    pub bundle_total_cost: bool,
    /// Opportunity lines carry a purchase-rate field.
    pub item_purchase_rate: bool,
    /// Opportunity lines carry a margin field.
    pub item_margin: bool,
    /// Opportunity lines carry an extended-cost field.
    pub item_total_cost: bool,
    /// Opportunity header carries overhead/total-cost/profit fields.
    pub header_cost_totals: bool,
    /// Purchase Order rows support sales-order back-links.
    pub purchase_order_sales_order_links: bool,
}

impl Default for SchemaCapabilities {
    fn default() -> Self {
        Self {
            quotation_delivery_bom: true,
            sales_order_delivery_bom: true,
            opportunity_bundle_table: true,
            bundle_parent_product: true,
            bundle_total_cost: true,
            item_purchase_rate: true,
            item_margin: true,
            item_total_cost: true,
            header_cost_totals: true,
            purchase_order_sales_order_links: true,
        }
    }
}
