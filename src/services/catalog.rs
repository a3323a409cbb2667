use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use slog::Logger;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{
        product::{self, Column as ProductColumn, Entity as Product},
        product_variant::{self, Column as VariantColumn, Entity as ProductVariant},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Service for managing the product catalog
#[derive(Clone)]
pub struct CatalogService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    logger: Logger,
}

impl CatalogService {
    /// Creates a new catalog service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, logger: Logger) -> Self {
        Self {
            db_pool,
            event_sender,
            logger,
        }
    }

    /// Create a new product
    #[instrument(skip(self))]
    pub async fn create_product(
        &self,
        name: String,
        price: Decimal,
        cost: Option<Decimal>,
        stock: Option<i32>,
        reorder_point: Option<i32>,
    ) -> Result<product::Model, ServiceError> {
        let db = &*self.db_pool;

        let product_id = Uuid::new_v4();
        let new_product = product::ActiveModel {
            id: Set(product_id),
            name: Set(name.clone()),
            price: Set(price),
            cost: Set(cost.unwrap_or(Decimal::ZERO)),
            stock: Set(stock.unwrap_or(0)),
            reorder_point: Set(reorder_point),
            created_at: Set(Utc::now()),
            updated_at: Set(Some(Utc::now())),
        };

        let created = new_product.insert(db).await.map_err(|e| {
            let msg = format!("Failed to create product: {}", e);
            error!(%msg);
            ServiceError::db_error(msg)
        })?;

        if let Err(e) = self.event_sender.send(Event::ProductCreated(created.id)).await {
            error!("Failed to send product created event: {}", e);
        }

        info!(product_id = %created.id, name = %name, "Product created successfully");

        Ok(created)
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &Uuid) -> Result<Option<product::Model>, ServiceError> {
        let db = &*self.db_pool;

        let found = Product::find_by_id(*id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(found)
    }

    /// List products with pagination, optionally filtered by a name search
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        page: u64,
        limit: u64,
        search_term: Option<String>,
    ) -> Result<(Vec<product::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = Product::find();

        if let Some(search_term) = search_term {
            query = query.filter(ProductColumn::Name.contains(&search_term));
        }

        query = query.order_by_desc(ProductColumn::CreatedAt);

        let paginator = query.paginate(db, limit);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::db_error)?;

        let products = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((products, total))
    }

    /// Update a product
    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: Uuid,
        name: Option<String>,
        price: Option<Decimal>,
        cost: Option<Decimal>,
        stock: Option<i32>,
        reorder_point: Option<i32>,
    ) -> Result<product::Model, ServiceError> {
        let db = &*self.db_pool;

        let found = Product::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Product with ID {} not found", id)))?;

        let mut active: product::ActiveModel = found.into();

        if let Some(name) = name {
            active.name = Set(name);
        }

        if let Some(price) = price {
            active.price = Set(price);
        }

        if let Some(cost) = cost {
            active.cost = Set(cost);
        }

        if let Some(stock) = stock {
            active.stock = Set(stock);
        }

        if let Some(reorder_point) = reorder_point {
            active.reorder_point = Set(Some(reorder_point));
        }

        let updated = active.update(db).await.map_err(ServiceError::db_error)?;

        if let Err(e) = self.event_sender.send(Event::ProductUpdated(updated.id)).await {
            error!("Failed to send product updated event: {}", e);
        }

        Ok(updated)
    }

    /// Delete a product. Invoice lines keep their snapshots; variants
    /// lose the back reference.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let found = Product::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Product with ID {} not found", id)))?;

        found.delete(db).await.map_err(ServiceError::db_error)?;

        if let Err(e) = self.event_sender.send(Event::ProductDeleted(id)).await {
            error!("Failed to send product deleted event: {}", e);
        }

        slog::info!(self.logger, "product deleted"; "product_id" => %id);

        Ok(())
    }

    /// Create a product variant
    #[instrument(skip(self))]
    pub async fn create_variant(
        &self,
        name: String,
        sku: Option<String>,
        product_id: Option<Uuid>,
    ) -> Result<product_variant::Model, ServiceError> {
        let db = &*self.db_pool;

        if let Some(product_id) = product_id {
            Product::find_by_id(product_id)
                .one(db)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Product with ID {} not found", product_id))
                })?;
        }

        let variant_id = Uuid::new_v4();
        let new_variant = product_variant::ActiveModel {
            id: Set(variant_id),
            name: Set(name),
            sku: Set(sku),
            product_id: Set(product_id),
            created_at: Set(Utc::now()),
        };

        let created = new_variant.insert(db).await.map_err(ServiceError::db_error)?;

        if let Err(e) = self
            .event_sender
            .send(Event::VariantCreated {
                product_id,
                variant_id: created.id,
            })
            .await
        {
            error!("Failed to send variant created event: {}", e);
        }

        Ok(created)
    }

    /// Get a variant by ID
    #[instrument(skip(self))]
    pub async fn get_variant(
        &self,
        id: &Uuid,
    ) -> Result<Option<product_variant::Model>, ServiceError> {
        let db = &*self.db_pool;

        let found = ProductVariant::find_by_id(*id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(found)
    }

    /// List variants with pagination, optionally scoped to one product
    #[instrument(skip(self))]
    pub async fn list_variants(
        &self,
        page: u64,
        limit: u64,
        product_id: Option<Uuid>,
    ) -> Result<(Vec<product_variant::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = ProductVariant::find();

        if let Some(product_id) = product_id {
            query = query.filter(VariantColumn::ProductId.eq(product_id));
        }

        query = query.order_by_desc(VariantColumn::CreatedAt);

        let paginator = query.paginate(db, limit);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::db_error)?;

        let variants = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((variants, total))
    }

    /// Delete a variant
    #[instrument(skip(self))]
    pub async fn delete_variant(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let found = ProductVariant::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Variant with ID {} not found", id)))?;

        found.delete(db).await.map_err(ServiceError::db_error)?;

        Ok(())
    }
}
