use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{de, DeliveryComponentRow};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Quotation {
    pub name: String,
    pub company: String,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opportunity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    pub items: Vec<QuotationItem>,
    /// Delivery bill of materials carried forward from the Opportunity's
    /// bundle table.
    pub delivery_bom: Vec<DeliveryComponentRow>,
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub total: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct QuotationItem {
    pub item_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub qty: Decimal,
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub rate: Decimal,
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub amount: Decimal,
}
