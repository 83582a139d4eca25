use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::de;

/// Purchase Order drafted from a Sales Order and its delivery BOM.
/// Unlike the other targets this document is built from scratch rather
/// than through a host base conversion.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PurchaseOrder {
    pub company: String,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_date: Option<NaiveDate>,
    pub items: Vec<PurchaseOrderItem>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PurchaseOrderItem {
    pub item_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uom: Option<String>,
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub qty: Decimal,
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_date: Option<NaiveDate>,
    /// Back-links to the source order, written only when the target
    /// schema supports them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_order_item: Option<String>,
}
