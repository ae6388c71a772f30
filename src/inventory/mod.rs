mod client;
mod device_list;
mod fetcher;

pub use client::new_client;
pub use fetcher::{HttpInventory, Inventory, InventoryError};
