use chrono::Utc;
use metrics::counter;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use slog::Logger;
use std::sync::Arc;
use tracing::{error, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{
        inventory_setting, purchase_order, purchase_order_item, stock_location, stock_move,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Outcome of receiving a purchase order.
#[derive(Debug, Clone)]
pub struct ReceiveOutcome {
    pub purchase_order: purchase_order::Model,
    pub moves_recorded: usize,
}

/// Service for receiving purchase orders into the default warehouse.
#[derive(Clone)]
pub struct ReceivingService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    logger: Logger,
}

impl ReceivingService {
    /// Creates a new receiving service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, logger: Logger) -> Self {
        Self {
            db_pool,
            event_sender,
            logger,
        }
    }

    /// Receives a pending purchase order.
    ///
    /// Writes one stock move per order line, from the supplier
    /// location into the configured default warehouse, and flips the
    /// order to received. The moves and the status change commit in
    /// one transaction, and an order that is already received is
    /// rejected before any move is written.
    #[instrument(skip(self))]
    pub async fn receive_purchase_order(
        &self,
        purchase_order_id: Uuid,
    ) -> Result<ReceiveOutcome, ServiceError> {
        let db = &*self.db_pool;

        let order = purchase_order::Entity::find_by_id(purchase_order_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound("Purchase order not found".to_string()))?;

        if order.status == purchase_order::PurchaseOrderStatus::Received {
            return Err(ServiceError::InvalidOperation(
                "Purchase order has already been received".to_string(),
            ));
        }

        // Settings are read per request so a warehouse change takes
        // effect without a restart.
        let settings = inventory_setting::Entity::find_by_id(inventory_setting::Model::SINGLETON_ID)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        let warehouse_name = settings
            .and_then(|s| s.default_warehouse)
            .ok_or_else(|| {
                ServiceError::BadRequest(
                    "Default warehouse not configured in inventory settings".to_string(),
                )
            })?;

        let supplier_location = stock_location::Entity::find()
            .filter(stock_location::Column::IsSupplierLocation.eq(true))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::BadRequest(
                    "Supplier location not found. Please configure a location with isSupplierLocation=true"
                        .to_string(),
                )
            })?;

        let warehouse_location = stock_location::Entity::find()
            .filter(stock_location::Column::Name.eq(warehouse_name.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::BadRequest(format!(
                    "Default warehouse location '{}' not found",
                    warehouse_name
                ))
            })?;

        let items = purchase_order_item::Entity::find()
            .filter(purchase_order_item::Column::PurchaseOrderId.eq(order.id))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let mut moves_recorded = 0;
        for item in &items {
            let stock_move = stock_move::ActiveModel {
                id: Set(Uuid::new_v4()),
                product_variant_id: Set(item.product_variant_id),
                quantity: Set(item.quantity),
                source_location_id: Set(supplier_location.id),
                destination_location_id: Set(warehouse_location.id),
                purchase_order_id: Set(Some(order.id)),
                ..Default::default()
            };
            stock_move
                .insert(&txn)
                .await
                .map_err(ServiceError::db_error)?;
            moves_recorded += 1;
        }

        let mut order_update: purchase_order::ActiveModel = order.into();
        order_update.status = Set(purchase_order::PurchaseOrderStatus::Received);
        order_update.received_at = Set(Some(Utc::now()));
        let updated = order_update
            .update(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        counter!("pos.purchase_orders.received", 1);

        if let Err(e) = self
            .event_sender
            .send(Event::PurchaseOrderReceived {
                purchase_order_id: updated.id,
                moves_recorded,
            })
            .await
        {
            error!("Failed to send purchase order received event: {}", e);
        }

        slog::info!(
            self.logger,
            "purchase order received";
            "purchase_order_id" => %updated.id,
            "reference" => %updated.reference,
            "moves" => moves_recorded,
            "warehouse" => %warehouse_name,
        );

        Ok(ReceiveOutcome {
            purchase_order: updated,
            moves_recorded,
        })
    }
}
