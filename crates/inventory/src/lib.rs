//! Inventory: items, their single `use` capability, and the five-slot bar.
//!
//! # Invariants
//! - The selected slot index is always in `[0, SLOT_COUNT)`.
//! - Stamina is always within `[0, 1]`.
//! - Inserting never fails; when every slot is full the selected slot is
//!   overwritten and the displaced item is handed back to the caller.

mod inventory;
mod item;
mod stamina;

pub use inventory::{Inventory, InventoryError, Placement, SLOT_COUNT, UseOutcome};
pub use item::{Item, ItemBehavior};
pub use stamina::Stamina;

pub fn crate_info() -> &'static str {
    "gridwalk-inventory v0.1.0"
}
