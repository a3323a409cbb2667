use chrono::Utc;
use metrics::{counter, histogram};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use slog::Logger;
use std::sync::Arc;
use tracing::{error, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{invoice, invoice_item, product},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// A single cart line submitted for sale processing.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Service for ringing up sales and reading back invoices.
#[derive(Clone)]
pub struct SalesService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    logger: Logger,
}

impl SalesService {
    /// Creates a new sales service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, logger: Logger) -> Self {
        Self {
            db_pool,
            event_sender,
            logger,
        }
    }

    /// Processes a cart into a completed invoice.
    ///
    /// The whole sale runs in one transaction: the invoice, its line
    /// items, and the stock decrements land together or not at all.
    /// An empty cart is rejected up front; any failure past that point
    /// surfaces as a processing failure carrying the underlying cause.
    #[instrument(skip(self, lines))]
    pub async fn process_sale(
        &self,
        lines: Vec<CartLine>,
        customer_id: Option<Uuid>,
    ) -> Result<(invoice::Model, Vec<invoice_item::Model>), ServiceError> {
        if lines.is_empty() {
            return Err(ServiceError::InvalidInput("Cart cannot be empty.".to_string()));
        }

        match self.process_sale_inner(&lines, customer_id).await {
            Ok((created, items)) => {
                counter!("pos.sales.processed", 1);
                histogram!(
                    "pos.sales.total_amount",
                    created.total.to_f64().unwrap_or(0.0)
                );

                slog::info!(
                    self.logger,
                    "sale processed";
                    "invoice_id" => %created.id,
                    "total" => %created.total,
                    "lines" => items.len(),
                );

                Ok((created, items))
            }
            Err(err) => {
                error!("Sale processing failed: {}", err);
                counter!("pos.sales.failed", 1);
                Err(ServiceError::ProcessingFailed {
                    message: "Failed to process sale.".to_string(),
                    details: err.to_string(),
                })
            }
        }
    }

    async fn process_sale_inner(
        &self,
        lines: &[CartLine],
        customer_id: Option<Uuid>,
    ) -> Result<(invoice::Model, Vec<invoice_item::Model>), ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        // Price every line from the current catalog before writing
        // anything, so the invoice totals and snapshots agree.
        let mut total = Decimal::ZERO;
        let mut priced: Vec<(product::Model, i32, Decimal)> = Vec::with_capacity(lines.len());

        for line in lines {
            let item = product::Entity::find_by_id(line.product_id)
                .one(&txn)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Product with ID {} not found", line.product_id))
                })?;

            let subtotal = item.price * Decimal::from(line.quantity);
            total += subtotal;
            priced.push((item, line.quantity, subtotal));
        }

        let invoice_id = Uuid::new_v4();
        let new_invoice = invoice::ActiveModel {
            id: Set(invoice_id),
            total: Set(total),
            status: Set(invoice::InvoiceStatus::Completed),
            sale_date: Set(Utc::now()),
            customer_id: Set(customer_id),
            ..Default::default()
        };
        let created = new_invoice
            .insert(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        let mut created_items = Vec::with_capacity(priced.len());
        for (item, quantity, subtotal) in &priced {
            let invoice_line = invoice_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                invoice_id: Set(invoice_id),
                product_id: Set(Some(item.id)),
                product_name: Set(item.name.clone()),
                price: Set(item.price),
                quantity: Set(*quantity),
                subtotal: Set(*subtotal),
                ..Default::default()
            };
            let created_line = invoice_line
                .insert(&txn)
                .await
                .map_err(ServiceError::db_error)?;
            created_items.push(created_line);
        }

        // Decrement stock in place, clamped at zero. The CASE runs
        // inside the UPDATE so concurrent sales cannot drive stock
        // negative between a read and a write.
        for (item, quantity, _) in &priced {
            product::Entity::update_many()
                .col_expr(
                    product::Column::Stock,
                    Expr::case(
                        Expr::col(product::Column::Stock).gte(*quantity),
                        Expr::col(product::Column::Stock).sub(*quantity),
                    )
                    .finally(0)
                    .into(),
                )
                .filter(product::Column::Id.eq(item.id))
                .exec(&txn)
                .await
                .map_err(ServiceError::db_error)?;
        }

        txn.commit().await.map_err(ServiceError::db_error)?;

        if let Err(e) = self
            .event_sender
            .send(Event::SaleCompleted {
                invoice_id,
                total,
                item_count: priced.len(),
            })
            .await
        {
            error!("Failed to send sale completed event: {}", e);
        }

        for (item, quantity, _) in &priced {
            let remaining = (item.stock - quantity).max(0);
            if let Some(reorder_point) = item.reorder_point {
                if remaining <= reorder_point {
                    if let Err(e) = self
                        .event_sender
                        .send(Event::LowStock {
                            product_id: item.id,
                            stock: remaining,
                            reorder_point,
                        })
                        .await
                    {
                        error!("Failed to send low stock event: {}", e);
                    }
                }
            }
        }

        Ok((created, created_items))
    }

    /// Gets an invoice by ID
    #[instrument(skip(self))]
    pub async fn get_invoice(
        &self,
        invoice_id: &Uuid,
    ) -> Result<Option<invoice::Model>, ServiceError> {
        let db = &*self.db_pool;
        let found = invoice::Entity::find_by_id(*invoice_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(found)
    }

    /// Gets an invoice together with its line items
    #[instrument(skip(self))]
    pub async fn get_invoice_with_items(
        &self,
        invoice_id: &Uuid,
    ) -> Result<Option<(invoice::Model, Vec<invoice_item::Model>)>, ServiceError> {
        let db = &*self.db_pool;
        let found = invoice::Entity::find_by_id(*invoice_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        match found {
            Some(header) => {
                let items = invoice_item::Entity::find()
                    .filter(invoice_item::Column::InvoiceId.eq(header.id))
                    .order_by_asc(invoice_item::Column::CreatedAt)
                    .all(db)
                    .await
                    .map_err(ServiceError::db_error)?;
                Ok(Some((header, items)))
            }
            None => Ok(None),
        }
    }

    /// Lists invoices, newest sale first
    #[instrument(skip(self))]
    pub async fn list_invoices(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<invoice::Model>, ServiceError> {
        let db = &*self.db_pool;
        let invoices = invoice::Entity::find()
            .order_by_desc(invoice::Column::SaleDate)
            .limit(Some(limit))
            .offset(offset)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(invoices)
    }

    /// Counts total invoices
    #[instrument(skip(self))]
    pub async fn count_invoices(&self) -> Result<u64, ServiceError> {
        let db = &*self.db_pool;
        let count = invoice::Entity::find()
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(count)
    }
}
