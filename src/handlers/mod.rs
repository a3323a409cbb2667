pub mod common;
pub mod customers;
pub mod invoices;
pub mod product_variants;
pub mod products;
pub mod purchase_orders;
pub mod settings;
pub mod stock_locations;
pub mod stock_moves;

use crate::db::DbPool;
use crate::events::EventSender;
use slog::Logger;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub sales: Arc<crate::services::SalesService>,
    pub dashboard: Arc<crate::services::DashboardService>,
    pub catalog: Arc<crate::services::CatalogService>,
    pub customers: Arc<crate::services::CustomerService>,
    pub procurement: Arc<crate::services::ProcurementService>,
    pub receiving: Arc<crate::services::ReceivingService>,
    pub inventory: Arc<crate::services::InventoryService>,
}

impl AppServices {
    /// Build the service container, deriving a component logger per service.
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        base_logger: &Logger,
    ) -> Self {
        let sales_logger = base_logger.new(slog::o!("component" => "sales_service"));
        let dashboard_logger = base_logger.new(slog::o!("component" => "dashboard_service"));
        let catalog_logger = base_logger.new(slog::o!("component" => "catalog_service"));
        let customers_logger = base_logger.new(slog::o!("component" => "customer_service"));
        let procurement_logger =
            base_logger.new(slog::o!("component" => "procurement_service"));
        let receiving_logger = base_logger.new(slog::o!("component" => "receiving_service"));
        let inventory_logger = base_logger.new(slog::o!("component" => "inventory_service"));

        let sales = Arc::new(crate::services::SalesService::new(
            db_pool.clone(),
            event_sender.clone(),
            sales_logger,
        ));
        let dashboard = Arc::new(crate::services::DashboardService::new(
            db_pool.clone(),
            dashboard_logger,
        ));
        let catalog = Arc::new(crate::services::CatalogService::new(
            db_pool.clone(),
            event_sender.clone(),
            catalog_logger,
        ));
        let customers = Arc::new(crate::services::CustomerService::new(
            db_pool.clone(),
            event_sender.clone(),
            customers_logger,
        ));
        let procurement = Arc::new(crate::services::ProcurementService::new(
            db_pool.clone(),
            event_sender.clone(),
            procurement_logger,
        ));
        let receiving = Arc::new(crate::services::ReceivingService::new(
            db_pool.clone(),
            event_sender,
            receiving_logger,
        ));
        let inventory = Arc::new(crate::services::InventoryService::new(
            db_pool,
            inventory_logger,
        ));

        Self {
            sales,
            dashboard,
            catalog,
            customers,
            procurement,
            receiving,
            inventory,
        }
    }
}
