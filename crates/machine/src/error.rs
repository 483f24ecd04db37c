//! Vend error taxonomy.

use core::num::NonZeroU64;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vendomat_core::DomainError;

/// Coins still needed to afford an item. Always at least one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shortfall(NonZeroU64);

impl Shortfall {
    /// `price - balance`, or `None` when the balance already covers the price.
    pub fn between(price: u64, balance: u64) -> Option<Self> {
        price
            .checked_sub(balance)
            .and_then(NonZeroU64::new)
            .map(Self)
    }

    pub fn coins(self) -> u64 {
        self.0.get()
    }
}

impl core::fmt::Display for Shortfall {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Why a vend was refused. Every variant is an expected, user-facing outcome.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VendError {
    /// No item with the requested name is stocked.
    #[error("invalid selection")]
    InvalidSelection,

    /// The item exists but none are left.
    #[error("out of stock")]
    OutOfStock,

    /// The item is available but the deposited coins do not cover it.
    #[error("insufficient funds: insert an additional {coins_needed} coins")]
    InsufficientFunds { coins_needed: Shortfall },
}

/// Error type of the machine aggregate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MachineError {
    #[error(transparent)]
    Vend(#[from] VendError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
