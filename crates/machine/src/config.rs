//! Machine configuration (initial stock and float).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use vendomat_core::MachineId;
use vendomat_events::execute;

use crate::error::MachineError;
use crate::machine::{DEFAULT_STOCK, DepositCoins, MachineCommand, StockItem, VendingMachine};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid machine config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemConfig {
    pub price: u64,
    #[serde(default)]
    pub count: u64,
}

/// Initial state of a machine, loadable from JSON:
///
/// ```json
/// {
///   "initial_balance": 0,
///   "inventory": {
///     "Chips": { "price": 10, "count": 4 }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineConfig {
    #[serde(default)]
    pub initial_balance: u64,
    #[serde(default)]
    pub inventory: BTreeMap<String, ItemConfig>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        let inventory = DEFAULT_STOCK
            .iter()
            .map(|&(name, price, count)| (name.to_string(), ItemConfig { price, count }))
            .collect();

        Self {
            initial_balance: 0,
            inventory,
        }
    }
}

impl MachineConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Build a machine by running the configured stock and deposit through
    /// the same command validation as any other caller.
    pub fn build(&self, id: MachineId) -> Result<VendingMachine, MachineError> {
        let mut machine = VendingMachine::empty(id);
        let now = Utc::now();

        for (name, item) in &self.inventory {
            execute(
                &mut machine,
                &MachineCommand::StockItem(StockItem {
                    name: name.clone(),
                    price: item.price,
                    count: item.count,
                    occurred_at: now,
                }),
            )?;
        }

        if self.initial_balance > 0 {
            execute(
                &mut machine,
                &MachineCommand::DepositCoins(DepositCoins {
                    coins: self.initial_balance,
                    occurred_at: now,
                }),
            )?;
        }

        tracing::debug!(
            machine_id = %id,
            items = machine.inventory().len(),
            balance = machine.balance(),
            "machine built from config"
        );
        Ok(machine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;
    use vendomat_core::DomainError;

    #[test]
    fn default_config_builds_the_default_machine() {
        let id = MachineId::new();
        let built = MachineConfig::default().build(id).unwrap();
        let reference = VendingMachine::with_default_inventory(id);
        assert_eq!(built.snapshot(), reference.snapshot());
    }

    #[test]
    fn default_config_lists_factory_stock() {
        let config = MachineConfig::default();
        assert_eq!(config.initial_balance, 0);
        assert_eq!(
            config.inventory.get("Candy Bar"),
            Some(&ItemConfig { price: 12, count: 7 })
        );
        assert_eq!(
            config.inventory.get("Chips"),
            Some(&ItemConfig { price: 10, count: 4 })
        );
        assert_eq!(
            config.inventory.get("Pretzels"),
            Some(&ItemConfig { price: 7, count: 11 })
        );
        assert_eq!(config.inventory.len(), 3);
    }

    #[test]
    fn parses_json() {
        let config = MachineConfig::from_json_str(
            r#"{ "initial_balance": 8, "inventory": { "Chips": { "price": 10, "count": 4 }, "Gum": { "price": 2 } } }"#,
        )
        .unwrap();

        let machine = config.build(MachineId::new()).unwrap();
        assert_eq!(machine.balance(), 8);
        assert_eq!(machine.item("Chips"), Some(&Item::new(10, 4)));
        assert_eq!(machine.item("Gum"), Some(&Item::new(2, 0)));
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = MachineConfig::from_json_str(r#"{ "coins": 3 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_negative_prices() {
        let err =
            MachineConfig::from_json_str(r#"{ "inventory": { "Chips": { "price": -1 } } }"#)
                .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn blank_item_names_fail_validation() {
        let config = MachineConfig::from_json_str(
            r#"{ "inventory": { " ": { "price": 1, "count": 1 } } }"#,
        )
        .unwrap();
        let err = config.build(MachineId::new()).unwrap_err();
        assert!(matches!(err, MachineError::Domain(DomainError::Validation(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = MachineConfig::from_path("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
