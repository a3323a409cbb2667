use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use slog::Logger;
use std::sync::Arc;
use tracing::{error, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::customer,
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Service for managing customers
#[derive(Clone)]
pub struct CustomerService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    logger: Logger,
}

impl CustomerService {
    /// Creates a new customer service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, logger: Logger) -> Self {
        Self {
            db_pool,
            event_sender,
            logger,
        }
    }

    /// Creates a new customer
    #[instrument(skip(self))]
    pub async fn create_customer(
        &self,
        name: String,
        email: Option<String>,
        phone: Option<String>,
    ) -> Result<customer::Model, ServiceError> {
        let db = &*self.db_pool;

        let customer_id = Uuid::new_v4();
        let new_customer = customer::ActiveModel {
            id: Set(customer_id),
            name: Set(name),
            email: Set(email),
            phone: Set(phone),
            created_at: Set(Utc::now()),
            updated_at: Set(Some(Utc::now())),
        };

        let created = new_customer.insert(db).await.map_err(ServiceError::db_error)?;

        if let Err(e) = self.event_sender.send(Event::CustomerCreated(created.id)).await {
            error!("Failed to send customer created event: {}", e);
        }

        Ok(created)
    }

    /// Gets a customer by ID
    #[instrument(skip(self))]
    pub async fn get_customer(
        &self,
        customer_id: &Uuid,
    ) -> Result<Option<customer::Model>, ServiceError> {
        let db = &*self.db_pool;
        let found = customer::Entity::find_by_id(*customer_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(found)
    }

    /// Gets a customer by email
    #[instrument(skip(self))]
    pub async fn get_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<customer::Model>, ServiceError> {
        let db = &*self.db_pool;
        let found = customer::Entity::find()
            .filter(customer::Column::Email.eq(email))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(found)
    }

    /// Lists customers with pagination
    #[instrument(skip(self))]
    pub async fn list_customers(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<customer::Model>, ServiceError> {
        let db = &*self.db_pool;
        let customers = customer::Entity::find()
            .order_by_desc(customer::Column::CreatedAt)
            .limit(Some(limit))
            .offset(offset)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(customers)
    }

    /// Counts total customers
    #[instrument(skip(self))]
    pub async fn count_customers(&self) -> Result<u64, ServiceError> {
        let db = &*self.db_pool;
        let count = customer::Entity::find()
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(count)
    }

    /// Updates an existing customer
    #[instrument(skip(self))]
    pub async fn update_customer(
        &self,
        id: Uuid,
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
    ) -> Result<customer::Model, ServiceError> {
        let db = &*self.db_pool;

        let found = customer::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Customer with ID {} not found", id)))?;

        let mut active: customer::ActiveModel = found.into();

        if let Some(name) = name {
            active.name = Set(name);
        }

        if let Some(email) = email {
            active.email = Set(Some(email));
        }

        if let Some(phone) = phone {
            active.phone = Set(Some(phone));
        }

        let updated = active.update(db).await.map_err(ServiceError::db_error)?;

        if let Err(e) = self.event_sender.send(Event::CustomerUpdated(updated.id)).await {
            error!("Failed to send customer updated event: {}", e);
        }

        Ok(updated)
    }

    /// Deletes a customer. Their invoices survive with the reference
    /// cleared.
    #[instrument(skip(self))]
    pub async fn delete_customer(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let found = customer::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Customer with ID {} not found", id)))?;

        found.delete(db).await.map_err(ServiceError::db_error)?;

        slog::info!(self.logger, "customer deleted"; "customer_id" => %id);

        Ok(())
    }
}
