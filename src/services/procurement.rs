use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use slog::Logger;
use std::sync::Arc;
use tracing::{error, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{product_variant, purchase_order, purchase_order_item},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// One requested line on a new purchase order.
#[derive(Debug, Clone)]
pub struct PurchaseOrderLine {
    pub product_variant_id: Option<Uuid>,
    pub quantity: i32,
}

/// Service for managing purchase orders
#[derive(Clone)]
pub struct ProcurementService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    logger: Logger,
}

impl ProcurementService {
    /// Creates a new procurement service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, logger: Logger) -> Self {
        Self {
            db_pool,
            event_sender,
            logger,
        }
    }

    /// Creates a new purchase order with its lines.
    ///
    /// Orders start pending; stock does not change until they are
    /// received. A missing reference gets a generated one.
    #[instrument(skip(self, lines))]
    pub async fn create_purchase_order(
        &self,
        reference: Option<String>,
        supplier_name: Option<String>,
        lines: Vec<PurchaseOrderLine>,
    ) -> Result<purchase_order::Model, ServiceError> {
        let db = &*self.db_pool;

        // Validate variant references before opening the transaction.
        for line in &lines {
            if let Some(variant_id) = line.product_variant_id {
                product_variant::Entity::find_by_id(variant_id)
                    .one(db)
                    .await
                    .map_err(ServiceError::db_error)?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!(
                            "Product variant with ID {} not found",
                            variant_id
                        ))
                    })?;
            }
        }

        let order_id = Uuid::new_v4();
        let reference = reference.unwrap_or_else(|| {
            format!("PO-{}", order_id.to_string()[..8].to_uppercase())
        });

        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let new_order = purchase_order::ActiveModel {
            id: Set(order_id),
            reference: Set(reference),
            status: Set(purchase_order::PurchaseOrderStatus::Pending),
            supplier_name: Set(supplier_name),
            received_at: Set(None),
            ..Default::default()
        };
        let created = new_order
            .insert(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        for line in &lines {
            let order_line = purchase_order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                purchase_order_id: Set(order_id),
                product_variant_id: Set(line.product_variant_id),
                quantity: Set(line.quantity),
                ..Default::default()
            };
            order_line
                .insert(&txn)
                .await
                .map_err(ServiceError::db_error)?;
        }

        txn.commit().await.map_err(ServiceError::db_error)?;

        if let Err(e) = self
            .event_sender
            .send(Event::PurchaseOrderCreated(created.id))
            .await
        {
            error!("Failed to send purchase order created event: {}", e);
        }

        slog::info!(
            self.logger,
            "purchase order created";
            "purchase_order_id" => %created.id,
            "reference" => %created.reference,
            "lines" => lines.len(),
        );

        Ok(created)
    }

    /// Gets a purchase order by ID
    #[instrument(skip(self))]
    pub async fn get_purchase_order(
        &self,
        po_id: &Uuid,
    ) -> Result<Option<purchase_order::Model>, ServiceError> {
        let db = &*self.db_pool;
        let order = purchase_order::Entity::find_by_id(*po_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(order)
    }

    /// Gets a purchase order together with its lines
    #[instrument(skip(self))]
    pub async fn get_purchase_order_with_items(
        &self,
        po_id: &Uuid,
    ) -> Result<Option<(purchase_order::Model, Vec<purchase_order_item::Model>)>, ServiceError>
    {
        let db = &*self.db_pool;
        let order = purchase_order::Entity::find_by_id(*po_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        match order {
            Some(header) => {
                let items = purchase_order_item::Entity::find()
                    .filter(purchase_order_item::Column::PurchaseOrderId.eq(header.id))
                    .order_by_asc(purchase_order_item::Column::CreatedAt)
                    .all(db)
                    .await
                    .map_err(ServiceError::db_error)?;
                Ok(Some((header, items)))
            }
            None => Ok(None),
        }
    }

    /// Lists purchase orders with pagination, optionally by status
    #[instrument(skip(self))]
    pub async fn list_purchase_orders(
        &self,
        page: u64,
        limit: u64,
        status: Option<purchase_order::PurchaseOrderStatus>,
    ) -> Result<(Vec<purchase_order::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = purchase_order::Entity::find();

        if let Some(status) = status {
            query = query.filter(purchase_order::Column::Status.eq(status));
        }

        query = query.order_by_desc(purchase_order::Column::CreatedAt);

        let paginator = query.paginate(db, limit);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::db_error)?;

        let orders = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((orders, total))
    }
}
