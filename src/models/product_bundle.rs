use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::de;

/// Reusable bundle template: component items with per-one quantities.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ProductBundle {
    pub name: String,
    pub items: Vec<ProductBundleItem>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ProductBundleItem {
    pub item_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uom: Option<String>,
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub qty: Decimal,
}

impl ProductBundle {
    /// Set of component item codes, the signature compared against existing
    /// rows to decide whether a parent item's components need a rebuild.
    pub fn component_codes(&self) -> std::collections::BTreeSet<&str> {
        self.items
            .iter()
            .map(|i| i.item_code.trim())
            .filter(|c| !c.is_empty())
            .collect()
    }
}
