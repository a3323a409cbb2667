use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
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
}

// Define the various events that can occur in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Sale events
    SaleCompleted {
        invoice_id: Uuid,
        total: Decimal,
        item_count: usize,
    },

    // Catalog events
    ProductCreated(Uuid),
    ProductUpdated(Uuid),
    ProductDeleted(Uuid),
    VariantCreated {
        product_id: Option<Uuid>,
        variant_id: Uuid,
    },
    LowStock {
        product_id: Uuid,
        stock: i32,
        reorder_point: i32,
    },

    // Customer events
    CustomerCreated(Uuid),
    CustomerUpdated(Uuid),

    // Procurement events
    PurchaseOrderCreated(Uuid),
    PurchaseOrderReceived {
        purchase_order_id: Uuid,
        moves_recorded: usize,
    },
    StockMoveRecorded {
        stock_move_id: Uuid,
        quantity: i32,
    },

    // Generic event for custom messages
    Generic {
        message: String,
        timestamp: DateTime<Utc>,
        metadata: serde_json::Value,
    },
}

impl Event {
    /// Create a generic event with string data
    pub fn with_data(data: String) -> Self {
        Event::Generic {
            message: data,
            timestamp: Utc::now(),
            metadata: serde_json::Value::Null,
        }
    }
}

// Function to process incoming events and distribute them to handlers.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        info!("Received event: {:?}", event);

        match event {
            Event::SaleCompleted {
                invoice_id,
                total,
                item_count,
            } => {
                if let Err(e) = handle_sale_completed(invoice_id, total, item_count).await {
                    error!(
                        "Failed to handle sale completed event: invoice_id={}, error={}",
                        invoice_id, e
                    );
                }
            }
            Event::LowStock {
                product_id,
                stock,
                reorder_point,
            } => {
                if let Err(e) = handle_low_stock(product_id, stock, reorder_point).await {
                    error!(
                        "Failed to handle low stock event: product_id={}, error={}",
                        product_id, e
                    );
                }
            }
            Event::PurchaseOrderReceived {
                purchase_order_id,
                moves_recorded,
            } => {
                if let Err(e) =
                    handle_purchase_order_received(purchase_order_id, moves_recorded).await
                {
                    error!(
                        "Failed to handle purchase order received event: purchase_order_id={}, error={}",
                        purchase_order_id, e
                    );
                }
            }
            Event::ProductDeleted(product_id) => {
                info!("Product deleted: {}", product_id);
            }
            _ => {
                info!("No specific handler for event: {:?}", event);
            }
        }
    }

    warn!("Event processing loop has ended");
}

// Handler functions for specific events
async fn handle_sale_completed(
    invoice_id: Uuid,
    total: Decimal,
    item_count: usize,
) -> Result<(), String> {
    info!(
        "Processing sale completed event: invoice={}, total={}, items={}",
        invoice_id, total, item_count
    );

    // Downstream integrations (receipt printing, accounting export) hook in here.
    Ok(())
}

async fn handle_low_stock(
    product_id: Uuid,
    stock: i32,
    reorder_point: i32,
) -> Result<(), String> {
    warn!(
        "Low stock alert: product {} has {} units remaining (reorder point {})",
        product_id, stock, reorder_point
    );

    // Could trigger a draft purchase order for the product's supplier.
    Ok(())
}

async fn handle_purchase_order_received(
    purchase_order_id: Uuid,
    moves_recorded: usize,
) -> Result<(), String> {
    info!(
        "Processing purchase order received event: purchase_order={}, moves={}",
        purchase_order_id, moves_recorded
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn events_arrive_intact() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        let product_id = Uuid::new_v4();
        sender
            .send(Event::ProductCreated(product_id))
            .await
            .expect("send succeeds");
        sender
            .send(Event::PurchaseOrderReceived {
                purchase_order_id: product_id,
                moves_recorded: 3,
            })
            .await
            .expect("send succeeds");

        assert_matches!(rx.recv().await, Some(Event::ProductCreated(id)) if id == product_id);
        assert_matches!(
            rx.recv().await,
            Some(Event::PurchaseOrderReceived { moves_recorded: 3, .. })
        );
    }

    #[tokio::test]
    async fn send_fails_once_receiver_is_gone() {
        let (tx, rx) = mpsc::channel(1);
        let sender = EventSender::new(tx);
        drop(rx);

        let result = sender.send(Event::with_data("late".into())).await;
        assert_matches!(result, Err(msg) if msg.starts_with("Failed to send event"));
    }
}
