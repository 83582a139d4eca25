use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{de, DeliveryComponentRow};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SalesOrder {
    pub name: String,
    pub company: String,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quotation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,
    pub items: Vec<SalesOrderItem>,
    /// Delivery bill of materials carried forward from the Quotation.
    pub delivery_bom: Vec<DeliveryComponentRow>,
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub total: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SalesOrderItem {
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
    pub amount: Decimal,
    /// Host row identity, referenced by downstream `so_detail` /
    /// `sales_order_item` links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_name: Option<String>,
}
