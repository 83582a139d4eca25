use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::errors::ServiceError;
use crate::models::{
    DeliveryNote, DeliveryNoteItem, Quotation, QuotationItem, SalesInvoice, SalesInvoiceItem,
    SalesOrder, SalesOrderItem,
};
use crate::store::DocumentStore;

use super::ConversionEngine;

/// In-process rendition of the host's base conversions.
///
/// Performs the same straight field mapping the host mappers do (line items
/// carried over one-to-one, linkage fields set, totals summed) so the
/// `memory` backend and the test suites can run the full pipeline without a
/// host ERP. Bundle enrichment stays out of here; that is the propagation
/// service's job.
pub struct LocalConversionEngine {
    store: Arc<dyn DocumentStore>,
}

impl LocalConversionEngine {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Shallow-merges an override payload onto the mapped document, the way
    /// the host mapper folds `target_doc` into its output.
    fn apply_overrides<T>(document: T, overrides: Option<Value>) -> Result<T, ServiceError>
    where
        T: Serialize + DeserializeOwned,
    {
        let Some(Value::Object(patch)) = overrides else {
            return Ok(document);
        };
        let mut value = serde_json::to_value(&document)?;
        if let Value::Object(base) = &mut value {
            for (key, val) in patch {
                base.insert(key, val);
            }
        }
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl ConversionEngine for LocalConversionEngine {
    async fn quotation_from_opportunity(
        &self,
        source_name: &str,
        overrides: Option<Value>,
    ) -> Result<Quotation, ServiceError> {
        let opp = self
            .store
            .opportunity(source_name)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Opportunity {source_name} not found")))?;

        let items = opp
            .items
            .iter()
            .map(|line| QuotationItem {
                item_code: line.item_code.clone(),
                item_name: line.item_name.clone(),
                description: None,
                qty: line.qty,
                rate: line.rate,
                amount: line.qty * line.rate,
            })
            .collect::<Vec<_>>();
        let total = items.iter().map(|i| i.amount).sum();

        let quotation = Quotation {
            name: format!("QTN-{source_name}"),
            company: opp.company.clone(),
            currency: opp.currency.clone(),
            opportunity: Some(opp.name.clone()),
            customer: opp.customer.clone(),
            items,
            delivery_bom: Vec::new(),
            total,
        };
        Self::apply_overrides(quotation, overrides)
    }

    async fn sales_order_from_quotation(
        &self,
        source_name: &str,
        overrides: Option<Value>,
    ) -> Result<SalesOrder, ServiceError> {
        let qtn = self
            .store
            .quotation(source_name)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Quotation {source_name} not found")))?;

        let items = qtn
            .items
            .iter()
            .enumerate()
            .map(|(idx, line)| SalesOrderItem {
                item_code: line.item_code.clone(),
                item_name: line.item_name.clone(),
                description: line.description.clone(),
                uom: None,
                qty: line.qty,
                rate: line.rate,
                amount: line.qty * line.rate,
                row_name: Some(format!("{source_name}-{}", idx + 1)),
            })
            .collect::<Vec<_>>();
        let total = items.iter().map(|i| i.amount).sum();

        let order = SalesOrder {
            name: format!("SO-{source_name}"),
            company: qtn.company.clone(),
            currency: qtn.currency.clone(),
            customer: qtn.customer.clone(),
            quotation: Some(qtn.name.clone()),
            delivery_date: None,
            items,
            delivery_bom: Vec::new(),
            total,
        };
        Self::apply_overrides(order, overrides)
    }

    async fn delivery_note_from_sales_order(
        &self,
        source_name: &str,
        overrides: Option<Value>,
    ) -> Result<DeliveryNote, ServiceError> {
        let so = self
            .store
            .sales_order(source_name)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Sales Order {source_name} not found")))?;

        let items = so
            .items
            .iter()
            .map(|line| DeliveryNoteItem {
                item_code: line.item_code.clone(),
                item_name: line.item_name.clone(),
                description: line.description.clone(),
                uom: line.uom.clone(),
                qty: line.qty,
                rate: line.rate,
                discount_percentage: Decimal::ZERO,
                discount_amount: Decimal::ZERO,
                warehouse: None,
                against_sales_order: Some(so.name.clone()),
                so_detail: line.row_name.clone(),
            })
            .collect::<Vec<_>>();
        let total = items.iter().map(|i| i.qty * i.rate).sum();

        let note = DeliveryNote {
            name: format!("DN-{source_name}"),
            customer: so.customer.clone(),
            items,
            total,
        };
        Self::apply_overrides(note, overrides)
    }

    async fn sales_invoice_from_sales_order(
        &self,
        source_name: &str,
        overrides: Option<Value>,
    ) -> Result<SalesInvoice, ServiceError> {
        let so = self
            .store
            .sales_order(source_name)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Sales Order {source_name} not found")))?;

        let items = so
            .items
            .iter()
            .map(|line| SalesInvoiceItem {
                item_code: line.item_code.clone(),
                item_name: line.item_name.clone(),
                description: line.description.clone(),
                uom: line.uom.clone(),
                qty: line.qty,
                rate: line.rate,
                discount_percentage: Decimal::ZERO,
                discount_amount: Decimal::ZERO,
                sales_order: Some(so.name.clone()),
            })
            .collect::<Vec<_>>();
        let total = items.iter().map(|i| i.qty * i.rate).sum();

        let invoice = SalesInvoice {
            name: format!("SI-{source_name}"),
            customer: so.customer.clone(),
            items,
            total,
        };
        Self::apply_overrides(invoice, overrides)
    }

    async fn refresh_quotation(&self, document: &mut Quotation) -> Result<(), ServiceError> {
        for line in &mut document.items {
            line.amount = line.qty * line.rate;
        }
        document.total = document.items.iter().map(|i| i.amount).sum();
        Ok(())
    }

    async fn refresh_sales_order(&self, document: &mut SalesOrder) -> Result<(), ServiceError> {
        for line in &mut document.items {
            line.amount = line.qty * line.rate;
        }
        document.total = document.items.iter().map(|i| i.amount).sum();
        Ok(())
    }

    async fn refresh_delivery_note(
        &self,
        document: &mut DeliveryNote,
    ) -> Result<(), ServiceError> {
        document.total = document.items.iter().map(|i| i.qty * i.rate).sum();
        Ok(())
    }

    async fn refresh_sales_invoice(
        &self,
        document: &mut SalesInvoice,
    ) -> Result<(), ServiceError> {
        document.total = document.items.iter().map(|i| i.qty * i.rate).sum();
        Ok(())
    }
}
