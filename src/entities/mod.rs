//! SeaORM entities for the POS data model.

pub mod customer;
pub mod inventory_setting;
pub mod invoice;
pub mod invoice_item;
pub mod product;
pub mod product_variant;
pub mod purchase_order;
pub mod purchase_order_item;
pub mod stock_location;
pub mod stock_move;
