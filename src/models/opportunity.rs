use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::de;

/// CRM Opportunity with its line items and the materialized bundle
/// component table the cost rollup maintains.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Opportunity {
    pub name: String,
    pub company: String,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    pub items: Vec<OpportunityItem>,
    /// Materialized per-one component rows, grouped by `product`.
    pub bundle_components: Vec<BundleComponentRow>,
    /// Selling total across line items, computed by the host.
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub total: Decimal,
    /// Flat overhead added on top of the summed line costs.
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub overhead: Decimal,
    /// Derived: sum of line costs plus overhead.
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub total_cost: Decimal,
    /// Derived: selling total minus total cost.
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub total_profit: Decimal,
    /// Derived: total_profit / total_cost * 100, zero on zero cost.
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub profit_margin: Decimal,
}

/// One Opportunity line. `purchase_rate`, `margin` and `total_cost` are
/// rewritten by the rollup for lines whose item carries a bundle; manually
/// priced lines keep their stored values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct OpportunityItem {
    pub item_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub qty: Decimal,
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub rate: Decimal,
    /// Reference to the Product Bundle template driving this line's costs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_bundle: Option<String>,
    /// Per-one cost of the line; Σ of component total costs for bundled
    /// lines, user input otherwise.
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub purchase_rate: Decimal,
    /// Percentage markup of rate over purchase_rate.
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub margin: Decimal,
    /// Extended line cost: qty * purchase_rate.
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub total_cost: Decimal,
}

/// Per-one bundle component materialized on the Opportunity.
///
/// `unit_cost` is user-entered and survives rebuilds; `total_cost` is
/// recomputed on every validation pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct BundleComponentRow {
    pub item_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uom: Option<String>,
    /// Quantity per one unit of the parent item, never scaled by the
    /// parent line's order quantity.
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub qty: Decimal,
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub unit_cost: Decimal,
    #[serde(deserialize_with = "de::lenient_decimal")]
    pub total_cost: Decimal,
    /// Item code of the parent Opportunity line this row belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
}
