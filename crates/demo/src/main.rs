use std::sync::Arc;

use anyhow::Context;

use vendomat_core::MachineId;
use vendomat_events::{EventBus, InMemoryEventBus};
use vendomat_machine::{
    BusDispenser, Dispensed, Favorites, LogDispenser, MachineConfig, VendError, VendingMachine,
    buy_favorite_snack,
};

const CONFIG_ENV: &str = "VENDOMAT_CONFIG";

fn main() -> anyhow::Result<()> {
    vendomat_observability::init();

    let config = load_config()?;

    // Eight coins are not enough for Chips.
    let mut machine = fresh_machine(&config, 8)?;
    report("Chips", machine.vend("Chips", &mut LogDispenser));

    // Eve wants Pretzels but only brought four coins; Bob's Licorice isn't stocked.
    let favorites = Favorites::sample();
    let mut machine = fresh_machine(&config, 4)?;
    for person in ["Eve", "Bob"] {
        let outcome = buy_favorite_snack(person, &favorites, &mut machine, &mut LogDispenser);
        report(favorites.snack_for(person), outcome);
    }

    // Plenty of coins; the dispense notice goes out over the bus.
    let mut machine = fresh_machine(&config, 100)?;
    let bus: Arc<InMemoryEventBus<Dispensed>> = Arc::new(InMemoryEventBus::new());
    let notices = bus.subscribe();
    let mut dispenser = BusDispenser::new(Arc::clone(&bus), machine.id_typed());
    report("Chips", machine.vend("Chips", &mut dispenser));

    for notice in notices.drain() {
        tracing::info!(item = %notice.item, machine_id = %notice.machine_id, "release confirmed");
    }

    let snapshot = serde_json::to_string(&machine.snapshot()).context("serializing snapshot")?;
    tracing::info!(%snapshot, "final state");

    Ok(())
}

fn load_config() -> anyhow::Result<MachineConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => MachineConfig::from_path(&path)
            .with_context(|| format!("loading machine config from {CONFIG_ENV}={path}")),
        Err(_) => {
            tracing::warn!("{CONFIG_ENV} not set; using factory inventory");
            Ok(MachineConfig::default())
        }
    }
}

fn fresh_machine(config: &MachineConfig, coins: u64) -> anyhow::Result<VendingMachine> {
    let mut machine = config
        .build(MachineId::new())
        .context("building machine from config")?;
    machine.deposit(coins).context("depositing coins")?;
    Ok(machine)
}

fn report(item: &str, outcome: Result<(), VendError>) {
    match outcome {
        Ok(()) => tracing::info!(item, "enjoy"),
        Err(VendError::InvalidSelection) => tracing::info!(item, "Invalid Selection."),
        Err(VendError::OutOfStock) => tracing::info!(item, "Out of Stock."),
        Err(VendError::InsufficientFunds { coins_needed }) => tracing::info!(
            item,
            coins_needed = coins_needed.coins(),
            "Insufficient funds. Please insert an additional {coins_needed} coins."
        ),
    }
}
