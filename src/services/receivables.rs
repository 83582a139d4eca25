use std::sync::Arc;

use tracing::instrument;

use crate::errors::ServiceError;
use crate::models::OutstandingInvoice;
use crate::store::DocumentStore;

/// Read-side receivables queries.
#[derive(Clone)]
pub struct ReceivablesService {
    store: Arc<dyn DocumentStore>,
}

impl ReceivablesService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Lists every submitted sales invoice for a customer, newest posting
    /// date first.
    #[instrument(skip(self))]
    pub async fn outstanding_sales_invoices(
        &self,
        customer: &str,
    ) -> Result<Vec<OutstandingInvoice>, ServiceError> {
        if customer.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "customer must not be empty".to_string(),
            ));
        }
        self.store.outstanding_sales_invoices(customer.trim()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryDocumentStore;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn lists_invoices_newest_first() {
        let store = Arc::new(InMemoryDocumentStore::new());
        for (name, date) in [
            ("SI-0001", NaiveDate::from_ymd_opt(2026, 1, 10).unwrap()),
            ("SI-0002", NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()),
        ] {
            store.insert_invoice(
                "ACME",
                OutstandingInvoice {
                    name: name.to_string(),
                    posting_date: date,
                    grand_total: dec!(100),
                    outstanding_amount: dec!(40),
                },
            );
        }
        let service = ReceivablesService::new(store);

        let rows = service.outstanding_sales_invoices("ACME").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "SI-0002");
        assert_eq!(rows[1].name, "SI-0001");
    }

    #[tokio::test]
    async fn empty_customer_is_rejected() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let service = ReceivablesService::new(store);
        let result = service.outstanding_sales_invoices("  ").await;
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    }
}
