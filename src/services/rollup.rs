use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{instrument, warn};

use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{BundleComponentRow, Opportunity};
use crate::schema::SchemaCapabilities;
use crate::store::DocumentStore;

/// Rolls bundle component costs into an Opportunity's line items.
///
/// Runs before every save of an Opportunity, inside the host's save
/// transaction, and mutates only the document it is handed. Re-running it
/// on an unchanged document is a no-op: rows are only regenerated when the
/// referenced bundle's component set actually changed, which is what keeps
/// user-entered unit costs alive across saves.
#[derive(Clone)]
pub struct BundleRollupService {
    store: Arc<dyn DocumentStore>,
    capabilities: SchemaCapabilities,
    event_sender: Option<EventSender>,
}

impl BundleRollupService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        capabilities: SchemaCapabilities,
        event_sender: Option<EventSender>,
    ) -> Self {
        Self {
            store,
            capabilities,
            event_sender,
        }
    }

    /// Validation hook: (re)materialize component rows, recompute their
    /// totals and write purchase rate and margin back onto the line items.
    #[instrument(skip(self, doc), fields(opportunity = %doc.name))]
    pub async fn on_validate(&self, doc: &mut Opportunity) -> Result<(), ServiceError> {
        // Without the bundle table or the row-to-parent link there is
        // nothing to relate; keep silent so saving still works.
        if !self.capabilities.opportunity_bundle_table || !self.capabilities.bundle_parent_product {
            return Ok(());
        }

        let rebuilt = self.rebuild_changed_components(doc).await;

        // Component totals and the per-parent sums.
        let mut cost_per_parent: HashMap<String, Decimal> = HashMap::new();
        for row in &mut doc.bundle_components {
            let Some(parent) = row
                .product
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
            else {
                continue;
            };
            let line_total = row.qty * row.unit_cost;
            if self.capabilities.bundle_total_cost {
                row.total_cost = line_total;
            }
            *cost_per_parent.entry(parent).or_default() += line_total;
        }

        // Line writes: bundled items get the summed cost, manually priced
        // items keep their stored purchase rate.
        let mut summed_line_costs = Decimal::ZERO;
        for line in &mut doc.items {
            let item_code = line.item_code.trim();
            if item_code.is_empty() {
                continue;
            }

            let per_unit_cost = match cost_per_parent.get(item_code) {
                Some(sum) => {
                    if self.capabilities.item_purchase_rate {
                        line.purchase_rate = *sum;
                    }
                    *sum
                }
                None => {
                    if self.capabilities.item_purchase_rate {
                        line.purchase_rate
                    } else {
                        Decimal::ZERO
                    }
                }
            };

            if self.capabilities.item_margin {
                line.margin = if line.rate.is_zero() {
                    Decimal::ZERO
                } else {
                    (line.rate - per_unit_cost) / line.rate * dec!(100)
                };
            }

            let extended_cost = line.qty * per_unit_cost;
            if self.capabilities.item_total_cost {
                line.total_cost = extended_cost;
            }
            summed_line_costs += extended_cost;
        }

        if self.capabilities.header_cost_totals {
            doc.total_cost = summed_line_costs + doc.overhead;
            doc.total_profit = doc.total - doc.total_cost;
            doc.profit_margin = if doc.total_cost.is_zero() {
                Decimal::ZERO
            } else {
                doc.total_profit / doc.total_cost * dec!(100)
            };
        }

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::OpportunityCostsRolledUp {
                    opportunity: doc.name.clone(),
                    rebuilt_items: rebuilt,
                })
                .await;
        }
        Ok(())
    }

    /// Regenerates the component rows of every line whose bundle
    /// composition changed. Returns how many lines were rebuilt.
    ///
    /// A bundle that fails to load leaves that line's rows untouched: a
    /// deleted template must not wipe costs the user already entered.
    async fn rebuild_changed_components(&self, doc: &mut Opportunity) -> usize {
        let bundle_of: HashMap<String, String> = doc
            .items
            .iter()
            .filter_map(|line| {
                let code = line.item_code.trim();
                let bundle = line.product_bundle.as_deref().map(str::trim)?;
                (!code.is_empty() && !bundle.is_empty())
                    .then(|| (code.to_string(), bundle.to_string()))
            })
            .collect();

        let mut rebuilt = 0usize;
        let mut processed: HashSet<String> = HashSet::new();
        let parents: Vec<String> = doc
            .items
            .iter()
            .map(|line| line.item_code.trim().to_string())
            .filter(|code| bundle_of.contains_key(code))
            .collect();

        for parent_item in parents {
            if !processed.insert(parent_item.clone()) {
                continue;
            }
            let bundle_name = &bundle_of[&parent_item];

            let bundle = match self.store.product_bundle(bundle_name).await {
                Ok(found) => found,
                Err(error) => {
                    warn!(%error, bundle = %bundle_name, "bundle lookup failed; leaving existing component rows untouched");
                    None
                }
            };
            let Some(bundle) = bundle else {
                continue;
            };

            let template_codes: BTreeSet<String> = bundle
                .component_codes()
                .into_iter()
                .map(str::to_string)
                .collect();
            let existing_codes: BTreeSet<String> = doc
                .bundle_components
                .iter()
                .filter(|row| row.product.as_deref() == Some(parent_item.as_str()))
                .map(|row| row.item_code.trim().to_string())
                .filter(|code| !code.is_empty())
                .collect();

            let needs_rebuild = existing_codes.is_empty()
                || (!template_codes.is_empty() && template_codes != existing_codes);
            if !needs_rebuild {
                continue;
            }

            doc.bundle_components
                .retain(|row| row.product.as_deref() != Some(parent_item.as_str()));
            for component in &bundle.items {
                let item_code = component.item_code.trim();
                if item_code.is_empty() || component.qty <= Decimal::ZERO {
                    continue;
                }
                doc.bundle_components.push(BundleComponentRow {
                    item_code: item_code.to_string(),
                    description: component.description.clone(),
                    uom: component.uom.clone(),
                    // Per-one quantity, not scaled by the parent line's qty.
                    qty: component.qty,
                    unit_cost: Decimal::ZERO,
                    total_cost: Decimal::ZERO,
                    product: Some(parent_item.clone()),
                });
            }
            rebuilt += 1;
        }
        rebuilt
    }
}
