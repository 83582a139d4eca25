use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::de;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SalesInvoice {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    pub items: Vec<SalesInvoiceItem>,
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub total: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SalesInvoiceItem {
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
    pub sales_order: Option<String>,
}

impl SalesInvoiceItem {
    /// Identity used when merging delivery-BOM rows into an invoice:
    /// item code, quantity and whitespace-trimmed description.
    pub fn merge_key(&self) -> (String, Decimal, String) {
        (
            self.item_code.clone(),
            self.qty,
            self.description.as_deref().unwrap_or("").trim().to_string(),
        )
    }
}

/// Row of the submitted-invoice listing for a customer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OutstandingInvoice {
    pub name: String,
    pub posting_date: NaiveDate,
    pub grand_total: Decimal,
    pub outstanding_amount: Decimal,
}
