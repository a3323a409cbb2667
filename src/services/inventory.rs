use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use slog::Logger;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{inventory_setting, stock_location, stock_move},
    errors::ServiceError,
};

/// Filters for listing stock moves.
#[derive(Debug, Clone, Default)]
pub struct StockMoveFilter {
    pub product_variant_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub purchase_order_id: Option<Uuid>,
}

/// Service for stock locations, the stock move ledger and inventory settings
#[derive(Clone)]
pub struct InventoryService {
    db_pool: Arc<DbPool>,
    logger: Logger,
}

impl InventoryService {
    /// Creates a new inventory service instance
    pub fn new(db_pool: Arc<DbPool>, logger: Logger) -> Self {
        Self { db_pool, logger }
    }

    /// Creates a stock location
    #[instrument(skip(self))]
    pub async fn create_location(
        &self,
        name: String,
        is_supplier_location: bool,
    ) -> Result<stock_location::Model, ServiceError> {
        let db = &*self.db_pool;

        let new_location = stock_location::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            is_supplier_location: Set(is_supplier_location),
            ..Default::default()
        };

        let created = new_location
            .insert(db)
            .await
            .map_err(ServiceError::db_error)?;

        slog::info!(
            self.logger,
            "stock location created";
            "location_id" => %created.id,
            "name" => %created.name,
            "is_supplier_location" => created.is_supplier_location,
        );

        Ok(created)
    }

    /// Gets a stock location by ID
    #[instrument(skip(self))]
    pub async fn get_location(
        &self,
        location_id: &Uuid,
    ) -> Result<Option<stock_location::Model>, ServiceError> {
        let db = &*self.db_pool;
        let location = stock_location::Entity::find_by_id(*location_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(location)
    }

    /// Lists all stock locations
    #[instrument(skip(self))]
    pub async fn list_locations(&self) -> Result<Vec<stock_location::Model>, ServiceError> {
        let db = &*self.db_pool;
        let locations = stock_location::Entity::find()
            .order_by_asc(stock_location::Column::Name)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(locations)
    }

    /// Updates a stock location's name or supplier flag
    #[instrument(skip(self))]
    pub async fn update_location(
        &self,
        location_id: &Uuid,
        name: Option<String>,
        is_supplier_location: Option<bool>,
    ) -> Result<stock_location::Model, ServiceError> {
        let db = &*self.db_pool;

        let location = stock_location::Entity::find_by_id(*location_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Stock location with ID {} not found", location_id))
            })?;

        let mut active_model: stock_location::ActiveModel = location.into();

        if let Some(name) = name {
            active_model.name = Set(name);
        }
        if let Some(flag) = is_supplier_location {
            active_model.is_supplier_location = Set(flag);
        }

        let updated = active_model
            .update(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(updated)
    }

    /// Deletes a stock location.
    ///
    /// Fails if any stock move references the location, since the
    /// ledger must stay intact.
    #[instrument(skip(self))]
    pub async fn delete_location(&self, location_id: &Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let location = stock_location::Entity::find_by_id(*location_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Stock location with ID {} not found", location_id))
            })?;

        let referenced = stock_move::Entity::find()
            .filter(
                stock_move::Column::SourceLocationId
                    .eq(*location_id)
                    .or(stock_move::Column::DestinationLocationId.eq(*location_id)),
            )
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;

        if referenced > 0 {
            return Err(ServiceError::InvalidOperation(format!(
                "Stock location '{}' has recorded stock moves and cannot be deleted",
                location.name
            )));
        }

        location.delete(db).await.map_err(ServiceError::db_error)?;

        slog::info!(
            self.logger,
            "stock location deleted";
            "location_id" => %location_id,
        );

        Ok(())
    }

    /// Gets a stock move by ID
    #[instrument(skip(self))]
    pub async fn get_stock_move(
        &self,
        move_id: &Uuid,
    ) -> Result<Option<stock_move::Model>, ServiceError> {
        let db = &*self.db_pool;
        let found = stock_move::Entity::find_by_id(*move_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(found)
    }

    /// Lists stock moves with pagination, newest first
    #[instrument(skip(self))]
    pub async fn list_stock_moves(
        &self,
        page: u64,
        limit: u64,
        filter: StockMoveFilter,
    ) -> Result<(Vec<stock_move::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = stock_move::Entity::find();

        if let Some(variant_id) = filter.product_variant_id {
            query = query.filter(stock_move::Column::ProductVariantId.eq(variant_id));
        }
        if let Some(location_id) = filter.location_id {
            query = query.filter(
                stock_move::Column::SourceLocationId
                    .eq(location_id)
                    .or(stock_move::Column::DestinationLocationId.eq(location_id)),
            );
        }
        if let Some(po_id) = filter.purchase_order_id {
            query = query.filter(stock_move::Column::PurchaseOrderId.eq(po_id));
        }

        query = query.order_by_desc(stock_move::Column::CreatedAt);

        let paginator = query.paginate(db, limit);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::db_error)?;

        let moves = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((moves, total))
    }

    /// Gets the inventory settings row, if one has been saved
    #[instrument(skip(self))]
    pub async fn get_settings(&self) -> Result<Option<inventory_setting::Model>, ServiceError> {
        let db = &*self.db_pool;
        let settings = inventory_setting::Entity::find_by_id(inventory_setting::Model::SINGLETON_ID)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(settings)
    }

    /// Creates or updates the single inventory settings row
    #[instrument(skip(self))]
    pub async fn upsert_settings(
        &self,
        default_warehouse: Option<String>,
    ) -> Result<inventory_setting::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing =
            inventory_setting::Entity::find_by_id(inventory_setting::Model::SINGLETON_ID)
                .one(db)
                .await
                .map_err(ServiceError::db_error)?;

        let saved = match existing {
            Some(settings) => {
                let mut active_model: inventory_setting::ActiveModel = settings.into();
                active_model.default_warehouse = Set(default_warehouse);
                active_model
                    .update(db)
                    .await
                    .map_err(ServiceError::db_error)?
            }
            None => {
                let new_settings = inventory_setting::ActiveModel {
                    id: Set(inventory_setting::Model::SINGLETON_ID),
                    default_warehouse: Set(default_warehouse),
                    ..Default::default()
                };
                new_settings
                    .insert(db)
                    .await
                    .map_err(ServiceError::db_error)?
            }
        };

        slog::info!(
            self.logger,
            "inventory settings saved";
            "default_warehouse" => saved.default_warehouse.as_deref().unwrap_or("<unset>"),
        );

        Ok(saved)
    }
}
