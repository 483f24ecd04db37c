use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vendomat_core::{Aggregate, AggregateRoot, DomainError, MachineId};
use vendomat_events::Event;

use crate::dispenser::Dispenser;
use crate::error::{MachineError, Shortfall, VendError};
use crate::item::{Inventory, Item};

/// Stock a fresh machine starts with: (name, price, count).
pub(crate) const DEFAULT_STOCK: [(&str, u64, u64); 3] =
    [("Candy Bar", 12, 7), ("Chips", 10, 4), ("Pretzels", 7, 11)];

/// Aggregate root: VendingMachine.
///
/// Owns the inventory and the coin balance together; both change only through
/// applied events, so a rejected command can never leave them half-updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendingMachine {
    id: MachineId,
    inventory: Inventory,
    balance: u64,
    version: u64,
}

impl VendingMachine {
    /// An empty machine: no items, no coins.
    pub fn empty(id: MachineId) -> Self {
        Self {
            id,
            inventory: Inventory::new(),
            balance: 0,
            version: 0,
        }
    }

    /// Candy Bar (12 coins, 7 left), Chips (10, 4) and Pretzels (7, 11).
    pub fn with_default_inventory(id: MachineId) -> Self {
        let mut machine = Self::empty(id);
        let now = Utc::now();
        for (name, price, count) in DEFAULT_STOCK {
            machine.apply(&MachineEvent::ItemStocked(ItemStocked {
                machine_id: id,
                name: name.to_string(),
                price,
                count,
                occurred_at: now,
            }));
        }
        machine
    }

    pub fn id_typed(&self) -> MachineId {
        self.id
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn item(&self, name: &str) -> Option<&Item> {
        self.inventory.get(name)
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            id: self.id,
            balance: self.balance,
            inventory: self.inventory.clone(),
        }
    }

    /// Vend one `name`, charging its price and handing it to `dispenser`.
    ///
    /// Checks run in a fixed order and the first failure wins: unknown name,
    /// then empty stock, then insufficient balance. On failure nothing changes
    /// and the dispenser is not called.
    pub fn vend<D>(&mut self, name: &str, dispenser: &mut D) -> Result<(), VendError>
    where
        D: Dispenser + ?Sized,
    {
        let events = self.decide_vend(name, Utc::now()).inspect_err(|err| {
            tracing::debug!(machine_id = %self.id, item = name, reason = %err, "vend rejected");
        })?;
        self.commit(&events);

        tracing::info!(
            machine_id = %self.id,
            item = name,
            balance = self.balance,
            "item vended"
        );
        dispenser.dispense(name);
        Ok(())
    }

    /// Add `coins` to the balance.
    pub fn deposit(&mut self, coins: u64) -> Result<(), DomainError> {
        let events = self.decide_deposit(coins, Utc::now())?;
        self.commit(&events);
        tracing::info!(machine_id = %self.id, coins, balance = self.balance, "coins deposited");
        Ok(())
    }

    /// Register a new item or replenish an existing one at its current price.
    pub fn stock(&mut self, name: &str, price: u64, count: u64) -> Result<(), DomainError> {
        let events = self.decide_stock(name, price, count, Utc::now())?;
        self.commit(&events);
        tracing::debug!(machine_id = %self.id, item = name, price, count, "item stocked");
        Ok(())
    }

    fn commit(&mut self, events: &[MachineEvent]) {
        for ev in events {
            self.apply(ev);
        }
    }
}

/// Point-in-time copy of a machine's observable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub id: MachineId,
    pub balance: u64,
    pub inventory: Inventory,
}

impl AggregateRoot for VendingMachine {
    type Id = MachineId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: DepositCoins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositCoins {
    pub coins: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: VendItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendItem {
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: StockItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    pub name: String,
    pub price: u64,
    pub count: u64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineCommand {
    DepositCoins(DepositCoins),
    VendItem(VendItem),
    StockItem(StockItem),
}

/// Event: CoinsDeposited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinsDeposited {
    pub machine_id: MachineId,
    pub coins: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemVended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemVended {
    pub machine_id: MachineId,
    pub name: String,
    pub price: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemStocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStocked {
    pub machine_id: MachineId,
    pub name: String,
    pub price: u64,
    pub count: u64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineEvent {
    CoinsDeposited(CoinsDeposited),
    ItemVended(ItemVended),
    ItemStocked(ItemStocked),
}

impl Event for MachineEvent {
    fn event_type(&self) -> &'static str {
        match self {
            MachineEvent::CoinsDeposited(_) => "machine.coins.deposited",
            MachineEvent::ItemVended(_) => "machine.item.vended",
            MachineEvent::ItemStocked(_) => "machine.item.stocked",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            MachineEvent::CoinsDeposited(e) => e.occurred_at,
            MachineEvent::ItemVended(e) => e.occurred_at,
            MachineEvent::ItemStocked(e) => e.occurred_at,
        }
    }
}

impl Aggregate for VendingMachine {
    type Command = MachineCommand;
    type Event = MachineEvent;
    type Error = MachineError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            MachineEvent::CoinsDeposited(e) => {
                self.balance = self.balance.saturating_add(e.coins);
            }
            MachineEvent::ItemVended(e) => {
                self.balance = self.balance.saturating_sub(e.price);
                if let Some(item) = self.inventory.get_mut(&e.name) {
                    item.take_one();
                }
            }
            MachineEvent::ItemStocked(e) => match self.inventory.get_mut(&e.name) {
                Some(item) => item.add(e.count),
                None => self.inventory.insert(e.name.clone(), Item::new(e.price, e.count)),
            },
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            MachineCommand::DepositCoins(cmd) => Ok(self.decide_deposit(cmd.coins, cmd.occurred_at)?),
            MachineCommand::VendItem(cmd) => Ok(self.decide_vend(&cmd.name, cmd.occurred_at)?),
            MachineCommand::StockItem(cmd) => {
                Ok(self.decide_stock(&cmd.name, cmd.price, cmd.count, cmd.occurred_at)?)
            }
        }
    }
}

impl VendingMachine {
    fn decide_vend(
        &self,
        name: &str,
        occurred_at: DateTime<Utc>,
    ) -> Result<Vec<MachineEvent>, VendError> {
        let item = self.inventory.get(name).ok_or(VendError::InvalidSelection)?;

        if !item.in_stock() {
            return Err(VendError::OutOfStock);
        }
        if let Some(coins_needed) = Shortfall::between(item.price(), self.balance) {
            return Err(VendError::InsufficientFunds { coins_needed });
        }

        Ok(vec![MachineEvent::ItemVended(ItemVended {
            machine_id: self.id,
            name: name.to_string(),
            price: item.price(),
            occurred_at,
        })])
    }

    fn decide_deposit(
        &self,
        coins: u64,
        occurred_at: DateTime<Utc>,
    ) -> Result<Vec<MachineEvent>, DomainError> {
        if coins == 0 {
            return Err(DomainError::validation("deposit must be at least one coin"));
        }
        if self.balance.checked_add(coins).is_none() {
            return Err(DomainError::invariant("balance would overflow"));
        }

        Ok(vec![MachineEvent::CoinsDeposited(CoinsDeposited {
            machine_id: self.id,
            coins,
            occurred_at,
        })])
    }

    fn decide_stock(
        &self,
        name: &str,
        price: u64,
        count: u64,
        occurred_at: DateTime<Utc>,
    ) -> Result<Vec<MachineEvent>, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }

        // New items may be listed sold out; replenishing needs at least one unit.
        if let Some(existing) = self.inventory.get(name) {
            if count == 0 {
                return Err(DomainError::validation("restock count cannot be zero"));
            }
            if existing.price() != price {
                return Err(DomainError::conflict(format!(
                    "{name} is priced at {}, not {price}",
                    existing.price()
                )));
            }
            if existing.count().checked_add(count).is_none() {
                return Err(DomainError::invariant("stock count would overflow"));
            }
        }

        Ok(vec![MachineEvent::ItemStocked(ItemStocked {
            machine_id: self.id,
            name: name.to_string(),
            price,
            count,
            occurred_at,
        })])
    }
}
