pub mod inventory;
pub mod trip;

pub use inventory::{InventoryError, TripInventory};
pub use trip::Trip;
