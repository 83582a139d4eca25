use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Domain events emitted as documents move through the pipeline.
///
/// Delivery is fire-and-forget; a full channel or dropped receiver never
/// blocks or fails the operation that produced the event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    QuotationDrafted {
        opportunity: String,
        components: usize,
    },
    SalesOrderDrafted {
        quotation: String,
        components: usize,
    },
    DeliveryNoteDrafted {
        sales_order: String,
        components: usize,
    },
    SalesInvoiceDrafted {
        sales_order: String,
        components: usize,
    },
    PurchaseOrderDrafted {
        sales_order: String,
        lines: usize,
    },
    OpportunityCostsRolledUp {
        opportunity: String,
        rebuilt_items: usize,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of propagating a delivery failure.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!("Event delivery failed: {}", e);
        }
    }
}

/// Creates a bounded event channel.
pub fn channel(capacity: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(capacity);
    (EventSender::new(tx), rx)
}

/// Drains the event channel, logging each event. Spawned once at startup.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        info!(?event, "Processing event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_or_log_swallows_closed_channel() {
        let (sender, receiver) = channel(1);
        drop(receiver);
        // Must not panic or error out.
        sender
            .send_or_log(Event::QuotationDrafted {
                opportunity: "OPP-0001".to_string(),
                components: 2,
            })
            .await;
    }

    #[tokio::test]
    async fn events_round_trip_through_channel() {
        let (sender, mut receiver) = channel(4);
        sender
            .send(Event::PurchaseOrderDrafted {
                sales_order: "SO-0001".to_string(),
                lines: 3,
            })
            .await
            .unwrap();
        match receiver.recv().await {
            Some(Event::PurchaseOrderDrafted { sales_order, lines }) => {
                assert_eq!(sales_order, "SO-0001");
                assert_eq!(lines, 3);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
