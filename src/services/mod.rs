// Core services
pub mod catalog;
pub mod customers;
pub mod sales;

// Purchasing and stock
pub mod inventory;
pub mod procurement;
pub mod receiving;

// Reporting
pub mod dashboard;

pub use catalog::CatalogService;
pub use customers::CustomerService;
pub use dashboard::DashboardService;
pub use inventory::InventoryService;
pub use procurement::ProcurementService;
pub use receiving::ReceivingService;
pub use sales::SalesService;
