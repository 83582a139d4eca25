use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::de;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct DeliveryNote {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    pub items: Vec<DeliveryNoteItem>,
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub total: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct DeliveryNoteItem {
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
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub discount_percentage: Decimal,
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub discount_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<String>,
    /// Sales order linkage, set by the base conversion on ordered lines.
    /// Component rows appended from the delivery BOM leave both unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub against_sales_order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub so_detail: Option<String>,
}
