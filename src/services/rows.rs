//! Row derivation shared by the propagation operations.
//!
//! Both the conversion endpoints and the read-only delivery-BOM lookups
//! funnel through these helpers, so empty-item filtering and the
//! display-name/UOM fallback chain behave identically everywhere.

use crate::errors::ServiceError;
use crate::models::{BundleComponentRow, DeliveryComponentRow};
use crate::store::DocumentStore;

/// Display name for an item: the row's own name, else the item master's,
/// else the raw item code.
pub(crate) async fn display_name(
    store: &dyn DocumentStore,
    item_code: &str,
    explicit: Option<&str>,
) -> Result<String, ServiceError> {
    if let Some(name) = explicit {
        if !name.trim().is_empty() {
            return Ok(name.to_string());
        }
    }
    Ok(store
        .item(item_code)
        .await?
        .and_then(|master| master.item_name)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| item_code.to_string()))
}

/// UOM for an item: the row's own UOM, else the item master's stock UOM.
pub(crate) async fn resolve_uom(
    store: &dyn DocumentStore,
    item_code: &str,
    explicit: Option<&str>,
) -> Result<Option<String>, ServiceError> {
    if let Some(uom) = explicit {
        if !uom.trim().is_empty() {
            return Ok(Some(uom.to_string()));
        }
    }
    Ok(store.item(item_code).await?.and_then(|master| master.stock_uom))
}

/// Derives delivery-BOM rows from an Opportunity's bundle component table.
/// Rows without an item code are dropped; display names come from the item
/// master.
pub(crate) async fn from_bundle_table(
    store: &dyn DocumentStore,
    components: &[BundleComponentRow],
) -> Result<Vec<DeliveryComponentRow>, ServiceError> {
    let mut rows = Vec::new();
    for component in components {
        let item_code = component.item_code.trim();
        if item_code.is_empty() {
            continue;
        }
        rows.push(DeliveryComponentRow {
            item: item_code.to_string(),
            item_name: Some(display_name(store, item_code, None).await?),
            description: component.description.clone(),
            qty: component.qty,
            parent_product: component.product.clone(),
        });
    }
    Ok(rows)
}

/// Normalizes a document's delivery-BOM table for carrying forward: drops
/// rows without an item and fills missing display names.
pub(crate) async fn from_delivery_bom(
    store: &dyn DocumentStore,
    source: &[DeliveryComponentRow],
) -> Result<Vec<DeliveryComponentRow>, ServiceError> {
    let mut rows = Vec::new();
    for row in source {
        if !row.has_item() {
            continue;
        }
        let item_code = row.item.trim().to_string();
        let item_name = display_name(store, &item_code, row.item_name.as_deref()).await?;
        rows.push(DeliveryComponentRow {
            item: item_code,
            item_name: Some(item_name),
            description: row.description.clone(),
            qty: row.qty,
            parent_product: row.parent_product.clone(),
        });
    }
    Ok(rows)
}

/// Appends the parent-product note to a component description.
pub(crate) fn component_description(
    description: Option<&str>,
    parent_product: Option<&str>,
) -> Option<String> {
    let base = description.unwrap_or("").trim();
    match parent_product.map(str::trim).filter(|p| !p.is_empty()) {
        Some(parent) if base.is_empty() => Some(format!("Component of {parent}")),
        Some(parent) => Some(format!("{base} (Component of {parent})")),
        None => description.map(str::to_string),
    }
}
