use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::de;

/// One entry in a document's delivery bill of materials.
///
/// These rows ride along on Quotations and Sales Orders and are copied or
/// merged forward at each conversion step. Rows without an item identifier
/// are dropped wherever the table is read.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct DeliveryComponentRow {
    pub item: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub qty: Decimal,
    /// Links a component back to the bundle's root item. Only populated on
    /// Sales-Order-stage rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_product: Option<String>,
}

impl DeliveryComponentRow {
    pub fn has_item(&self) -> bool {
        !self.item.trim().is_empty()
    }
}
