use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect};
use slog::Logger;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{invoice, invoice_item, product},
    errors::ServiceError,
};

/// Aggregated dashboard figures, all in catalog currency.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardTotals {
    /// Sum of every invoice total ever written.
    pub total_sales: Decimal,
    /// Realized margin over completed invoices, priced against each
    /// line's snapshot and the product's current cost.
    pub total_profit: Decimal,
    /// Retail value of stock on hand.
    pub total_inventory_value: Decimal,
    /// Margin locked up in stock on hand.
    pub total_potential_profit: Decimal,
}

/// Service computing the point-of-sale dashboard aggregates.
#[derive(Clone)]
pub struct DashboardService {
    db_pool: Arc<DbPool>,
    logger: Logger,
}

impl DashboardService {
    /// Creates a new dashboard service instance
    pub fn new(db_pool: Arc<DbPool>, logger: Logger) -> Self {
        Self { db_pool, logger }
    }

    /// Computes the four dashboard totals in one pass.
    ///
    /// Figures are computed fresh on every call. Profit on a line
    /// whose product has been deleted treats the cost as zero, keeping
    /// historical invoices countable after catalog cleanup.
    #[instrument(skip(self))]
    pub async fn get_dashboard_totals(&self) -> Result<DashboardTotals, ServiceError> {
        let db = &*self.db_pool;

        let products = product::Entity::find()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let invoice_totals: Vec<Decimal> = invoice::Entity::find()
            .select_only()
            .column(invoice::Column::Total)
            .into_tuple()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let completed_items = invoice_item::Entity::find()
            .inner_join(invoice::Entity)
            .filter(invoice::Column::Status.eq(invoice::InvoiceStatus::Completed))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let total_sales: Decimal = invoice_totals.into_iter().sum();

        let total_inventory_value: Decimal = products
            .iter()
            .map(|p| p.price * Decimal::from(p.stock))
            .sum();

        let total_potential_profit: Decimal = products
            .iter()
            .map(|p| (p.price - p.cost) * Decimal::from(p.stock))
            .sum();

        let cost_by_product: HashMap<Uuid, Decimal> =
            products.iter().map(|p| (p.id, p.cost)).collect();

        let total_profit: Decimal = completed_items
            .iter()
            .map(|item| {
                let cost = item
                    .product_id
                    .and_then(|product_id| cost_by_product.get(&product_id).copied())
                    .unwrap_or(Decimal::ZERO);
                (item.price - cost) * Decimal::from(item.quantity)
            })
            .sum();

        slog::debug!(
            self.logger,
            "dashboard totals computed";
            "total_sales" => %total_sales,
            "total_profit" => %total_profit,
        );

        Ok(DashboardTotals {
            total_sales,
            total_profit,
            total_inventory_value,
            total_potential_profit,
        })
    }
}
