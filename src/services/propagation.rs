use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{instrument, warn};

use crate::convert::{ConversionEngine, ConversionOutcome, RecomputeWarning};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{
    DeliveryComponentRow, DeliveryNote, DeliveryNoteItem, PurchaseOrder, PurchaseOrderItem,
    Quotation, SalesInvoice, SalesInvoiceItem, SalesOrder,
};
use crate::schema::SchemaCapabilities;
use crate::store::DocumentStore;

use super::rows;

/// Carries delivery-BOM rows across the sales pipeline's document
/// conversions.
///
/// Every operation delegates the base field mapping to the host's
/// [`ConversionEngine`], then merges rows derived from the source document's
/// bundle or delivery-BOM table into the converted target. The enriched
/// document is returned unpersisted; saving it is the caller's business.
#[derive(Clone)]
pub struct BundlePropagationService {
    store: Arc<dyn DocumentStore>,
    engine: Arc<dyn ConversionEngine>,
    capabilities: SchemaCapabilities,
    event_sender: Option<EventSender>,
}

impl BundlePropagationService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        engine: Arc<dyn ConversionEngine>,
        capabilities: SchemaCapabilities,
        event_sender: Option<EventSender>,
    ) -> Self {
        Self {
            store,
            engine,
            capabilities,
            event_sender,
        }
    }

    /// Opportunity → Quotation. The quotation's delivery-BOM table is
    /// cleared and refilled from the opportunity's bundle components.
    #[instrument(skip(self, overrides))]
    pub async fn make_quotation_with_bundle(
        &self,
        source_name: &str,
        overrides: Option<Value>,
    ) -> Result<ConversionOutcome<Quotation>, ServiceError> {
        let mut quotation = self
            .engine
            .quotation_from_opportunity(source_name, overrides)
            .await?;

        let Some(opportunity) = self.store.opportunity(source_name).await? else {
            return Ok(ConversionOutcome::clean(quotation));
        };
        if !self.capabilities.quotation_delivery_bom {
            return Ok(ConversionOutcome::clean(quotation));
        }

        let derived =
            rows::from_bundle_table(self.store.as_ref(), &opportunity.bundle_components).await?;
        let components = derived.len();
        quotation.delivery_bom.clear();
        quotation.delivery_bom.extend(derived);

        let warning = demote_refresh_failure(self.engine.refresh_quotation(&mut quotation).await);
        self.emit(Event::QuotationDrafted {
            opportunity: source_name.to_string(),
            components,
        })
        .await;
        Ok(ConversionOutcome::with_warning(quotation, warning))
    }

    /// Quotation → Sales Order. The order's delivery-BOM table is cleared
    /// and refilled from the quotation's.
    #[instrument(skip(self, overrides))]
    pub async fn make_sales_order_with_bundle(
        &self,
        source_name: &str,
        overrides: Option<Value>,
    ) -> Result<ConversionOutcome<SalesOrder>, ServiceError> {
        let mut order = self
            .engine
            .sales_order_from_quotation(source_name, overrides)
            .await?;

        let Some(quotation) = self.store.quotation(source_name).await? else {
            return Ok(ConversionOutcome::clean(order));
        };
        if !self.capabilities.sales_order_delivery_bom {
            return Ok(ConversionOutcome::clean(order));
        }

        let derived =
            rows::from_delivery_bom(self.store.as_ref(), &quotation.delivery_bom).await?;
        let components = derived.len();
        order.delivery_bom.clear();
        order.delivery_bom.extend(derived);

        let warning = demote_refresh_failure(self.engine.refresh_sales_order(&mut order).await);
        self.emit(Event::SalesOrderDrafted {
            quotation: source_name.to_string(),
            components,
        })
        .await;
        Ok(ConversionOutcome::with_warning(order, warning))
    }

    /// Sales Order → Delivery Note. Component rows are appended to the
    /// base-converted item lines without sales-order linkage and priced at
    /// zero; the parent order line carries the price.
    #[instrument(skip(self, overrides))]
    pub async fn make_delivery_note_merged(
        &self,
        source_name: &str,
        overrides: Option<Value>,
    ) -> Result<ConversionOutcome<DeliveryNote>, ServiceError> {
        let mut note = self
            .engine
            .delivery_note_from_sales_order(source_name, overrides)
            .await?;

        let Some(order) = self.store.sales_order(source_name).await? else {
            return Ok(ConversionOutcome::clean(note));
        };

        let default_warehouse = note.items.iter().find_map(|line| line.warehouse.clone());
        let mut components = 0usize;
        for row in &order.delivery_bom {
            if !row.has_item() {
                continue;
            }
            let item_code = row.item.trim().to_string();
            let item_name =
                rows::display_name(self.store.as_ref(), &item_code, row.item_name.as_deref())
                    .await?;
            let uom = rows::resolve_uom(self.store.as_ref(), &item_code, None).await?;
            note.items.push(DeliveryNoteItem {
                item_code,
                item_name: Some(item_name),
                description: row.description.clone(),
                uom,
                qty: row.qty,
                rate: Decimal::ZERO,
                discount_percentage: Decimal::ZERO,
                discount_amount: Decimal::ZERO,
                warehouse: default_warehouse.clone(),
                against_sales_order: None,
                so_detail: None,
            });
            components += 1;
        }

        let warning = demote_refresh_failure(self.engine.refresh_delivery_note(&mut note).await);
        self.emit(Event::DeliveryNoteDrafted {
            sales_order: source_name.to_string(),
            components,
        })
        .await;
        Ok(ConversionOutcome::with_warning(note, warning))
    }

    /// Sales Order → Sales Invoice. Component rows are appended at zero
    /// rate unless an identical line (item, qty, trimmed description)
    /// already exists on the invoice.
    #[instrument(skip(self, overrides))]
    pub async fn make_sales_invoice_merged(
        &self,
        source_name: &str,
        overrides: Option<Value>,
    ) -> Result<ConversionOutcome<SalesInvoice>, ServiceError> {
        let mut invoice = self
            .engine
            .sales_invoice_from_sales_order(source_name, overrides)
            .await?;

        let Some(order) = self.store.sales_order(source_name).await? else {
            return Ok(ConversionOutcome::clean(invoice));
        };

        let mut seen: HashSet<(String, Decimal, String)> =
            invoice.items.iter().map(SalesInvoiceItem::merge_key).collect();
        let mut components = 0usize;
        for row in &order.delivery_bom {
            if !row.has_item() {
                continue;
            }
            let item_code = row.item.trim().to_string();
            let item_name =
                rows::display_name(self.store.as_ref(), &item_code, row.item_name.as_deref())
                    .await?;
            let uom = rows::resolve_uom(self.store.as_ref(), &item_code, None).await?;
            let candidate = SalesInvoiceItem {
                item_code,
                item_name: Some(item_name),
                description: row.description.clone(),
                uom,
                qty: row.qty,
                rate: Decimal::ZERO,
                discount_percentage: Decimal::ZERO,
                discount_amount: Decimal::ZERO,
                sales_order: None,
            };
            let key = candidate.merge_key();
            if seen.contains(&key) {
                continue;
            }
            seen.insert(key);
            invoice.items.push(candidate);
            components += 1;
        }

        let warning =
            demote_refresh_failure(self.engine.refresh_sales_invoice(&mut invoice).await);
        self.emit(Event::SalesInvoiceDrafted {
            sales_order: source_name.to_string(),
            components,
        })
        .await;
        Ok(ConversionOutcome::with_warning(invoice, warning))
    }

    /// Sales Order → Purchase Order. Built from scratch rather than through
    /// a host conversion: ordered lines and delivery-BOM rows are both
    /// appended at zero rate, skipping rows without an item or a positive
    /// quantity.
    #[instrument(skip(self))]
    pub async fn make_purchase_order_from_sales_order_bundle(
        &self,
        source_name: &str,
    ) -> Result<PurchaseOrder, ServiceError> {
        let order = self
            .store
            .sales_order(source_name)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Sales Order {source_name} not found")))?;

        let schedule_date = order
            .delivery_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let link_sales_order = self.capabilities.purchase_order_sales_order_links;

        let mut po = PurchaseOrder {
            company: order.company.clone(),
            currency: order.currency.clone(),
            supplier: None,
            schedule_date: Some(schedule_date),
            items: Vec::new(),
        };

        for line in &order.items {
            let item_code = line.item_code.trim();
            if item_code.is_empty() || line.qty <= Decimal::ZERO {
                continue;
            }
            let item_name =
                rows::display_name(self.store.as_ref(), item_code, line.item_name.as_deref())
                    .await?;
            let uom = rows::resolve_uom(self.store.as_ref(), item_code, line.uom.as_deref()).await?;
            po.items.push(PurchaseOrderItem {
                item_code: item_code.to_string(),
                item_name: Some(item_name),
                description: line.description.clone(),
                uom,
                qty: line.qty,
                rate: Decimal::ZERO,
                schedule_date: Some(schedule_date),
                sales_order: link_sales_order.then(|| order.name.clone()),
                sales_order_item: if link_sales_order {
                    line.row_name.clone()
                } else {
                    None
                },
            });
        }

        for row in &order.delivery_bom {
            if !row.has_item() || row.qty <= Decimal::ZERO {
                continue;
            }
            let item_code = row.item.trim();
            let item_name =
                rows::display_name(self.store.as_ref(), item_code, row.item_name.as_deref())
                    .await?;
            let uom = rows::resolve_uom(self.store.as_ref(), item_code, None).await?;
            po.items.push(PurchaseOrderItem {
                item_code: item_code.to_string(),
                item_name: Some(item_name),
                description: rows::component_description(
                    row.description.as_deref(),
                    row.parent_product.as_deref(),
                ),
                uom,
                qty: row.qty,
                rate: Decimal::ZERO,
                schedule_date: Some(schedule_date),
                sales_order: link_sales_order.then(|| order.name.clone()),
                sales_order_item: None,
            });
        }

        self.emit(Event::PurchaseOrderDrafted {
            sales_order: source_name.to_string(),
            lines: po.items.len(),
        })
        .await;
        Ok(po)
    }

    /// Delivery-BOM rows an Opportunity's bundle table would contribute,
    /// without performing any conversion.
    #[instrument(skip(self))]
    pub async fn delivery_bom_from_opportunity(
        &self,
        name: &str,
    ) -> Result<Vec<DeliveryComponentRow>, ServiceError> {
        let opportunity = self
            .store
            .opportunity(name)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Opportunity {name} not found")))?;
        rows::from_bundle_table(self.store.as_ref(), &opportunity.bundle_components).await
    }

    /// A Quotation's delivery-BOM table, normalized for carrying forward.
    #[instrument(skip(self))]
    pub async fn delivery_bom_from_quotation(
        &self,
        name: &str,
    ) -> Result<Vec<DeliveryComponentRow>, ServiceError> {
        let quotation = self
            .store
            .quotation(name)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Quotation {name} not found")))?;
        rows::from_delivery_bom(self.store.as_ref(), &quotation.delivery_bom).await
    }

    /// A Sales Order's delivery-BOM table, normalized for carrying forward.
    #[instrument(skip(self))]
    pub async fn delivery_bom_from_sales_order(
        &self,
        name: &str,
    ) -> Result<Vec<DeliveryComponentRow>, ServiceError> {
        let order = self
            .store
            .sales_order(name)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Sales Order {name} not found")))?;
        rows::from_delivery_bom(self.store.as_ref(), &order.delivery_bom).await
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            sender.send_or_log(event).await;
        }
    }
}

/// Demotes a refresh-hook failure to a warning. The enrichment already
/// succeeded, so the document is returned with stale totals instead of
/// failing the conversion.
fn demote_refresh_failure(result: Result<(), ServiceError>) -> Option<RecomputeWarning> {
    match result {
        Ok(()) => None,
        Err(error) => {
            warn!(%error, "document refresh failed; returning document with stale totals");
            Some(RecomputeWarning::new(error))
        }
    }
}
