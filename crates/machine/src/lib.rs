//! Vending machine domain module.
//!
//! An inventory of priced items, a running coin balance, and the `vend`
//! operation that validates a selection and commits it all-or-nothing. Pure
//! domain logic; the only side effect is the caller-supplied [`Dispenser`].

pub mod config;
pub mod dispenser;
pub mod error;
pub mod favorites;
pub mod item;
pub mod machine;
pub mod shared;

pub use config::{ConfigError, ItemConfig, MachineConfig};
pub use dispenser::{BusDispenser, Dispensed, Dispenser, LogDispenser, RecordingDispenser};
pub use error::{MachineError, Shortfall, VendError};
pub use favorites::{DEFAULT_SNACK, Favorites, buy_favorite_snack};
pub use item::{Inventory, Item};
pub use machine::{
    CoinsDeposited, DepositCoins, ItemStocked, ItemVended, MachineCommand, MachineEvent,
    MachineSnapshot, StockItem, VendItem, VendingMachine,
};
pub use shared::{SharedMachine, SharedMachineError};
