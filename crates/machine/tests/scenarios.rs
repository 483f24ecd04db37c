//! End-to-end walk through the vending scenarios a customer runs into.

use std::sync::Arc;
use std::thread;

use vendomat_core::MachineId;
use vendomat_events::{EventBus, InMemoryEventBus};
use vendomat_machine::{
    BusDispenser, Dispensed, Favorites, MachineConfig, RecordingDispenser, SharedMachine,
    SharedMachineError, VendError, VendingMachine, buy_favorite_snack,
};

fn describe(err: &VendError) -> String {
    match err {
        VendError::InvalidSelection => "Invalid Selection.".to_string(),
        VendError::OutOfStock => "Out of Stock.".to_string(),
        VendError::InsufficientFunds { coins_needed } => {
            format!("Insufficient funds. Please insert an additional {coins_needed} coins.")
        }
    }
}

#[test]
fn eight_coins_then_top_up() {
    let mut machine = VendingMachine::with_default_inventory(MachineId::new());
    let mut dispenser = RecordingDispenser::default();
    machine.deposit(8).unwrap();

    let err = machine.vend("Chips", &mut dispenser).unwrap_err();
    assert_eq!(
        describe(&err),
        "Insufficient funds. Please insert an additional 2 coins."
    );

    // The caller decides to retry after topping up.
    machine.deposit(2).unwrap();
    machine.vend("Chips", &mut dispenser).unwrap();

    assert_eq!(machine.balance(), 0);
    assert_eq!(machine.item("Chips").unwrap().count(), 3);
    assert_eq!(dispenser.dispensed(), ["Chips"]);
}

#[test]
fn favourites_walkthrough() {
    let favorites = Favorites::sample();

    let mut machine = VendingMachine::with_default_inventory(MachineId::new());
    machine.deposit(4).unwrap();
    let err = buy_favorite_snack("Eve", &favorites, &mut machine, &mut |_: &str| {}).unwrap_err();
    assert_eq!(
        describe(&err),
        "Insufficient funds. Please insert an additional 3 coins."
    );

    let err = buy_favorite_snack("Bob", &favorites, &mut machine, &mut |_: &str| {}).unwrap_err();
    assert_eq!(describe(&err), "Invalid Selection.");

    machine.deposit(6).unwrap();
    let mut dispenser = RecordingDispenser::default();
    buy_favorite_snack("Alice", &favorites, &mut machine, &mut dispenser).unwrap();
    assert_eq!(dispenser.dispensed(), ["Chips"]);
    assert_eq!(machine.balance(), 0);
}

#[test]
fn selling_out_from_config() {
    let config = MachineConfig::from_json_str(
        r#"{ "initial_balance": 30, "inventory": { "Chips": { "price": 10, "count": 2 } } }"#,
    )
    .unwrap();
    let mut machine = config.build(MachineId::new()).unwrap();

    machine.vend("Chips", &mut |_: &str| {}).unwrap();
    machine.vend("Chips", &mut |_: &str| {}).unwrap();
    let err = machine.vend("Chips", &mut |_: &str| {}).unwrap_err();

    assert_eq!(describe(&err), "Out of Stock.");
    assert_eq!(machine.balance(), 10);
}

#[test]
fn shared_machine_notifies_over_bus() {
    let id = MachineId::new();
    let shared = SharedMachine::new(VendingMachine::with_default_inventory(id));
    shared.deposit(7 * 3).unwrap();

    let bus: Arc<InMemoryEventBus<Dispensed>> = Arc::new(InMemoryEventBus::new());
    let notices = bus.subscribe();

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let shared = shared.clone();
            let bus = Arc::clone(&bus);
            thread::spawn(move || {
                let mut dispenser = BusDispenser::new(bus, id);
                shared.vend("Pretzels", &mut dispenser)
            })
        })
        .collect();
    let results: Vec<Result<(), SharedMachineError>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 3);
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(matches!(
            err,
            SharedMachineError::Vend(VendError::InsufficientFunds { coins_needed }) if coins_needed.coins() == 7
        ));
    }

    let dispensed = notices.drain();
    assert_eq!(dispensed.len(), 3);
    assert!(dispensed.iter().all(|n| n.item == "Pretzels" && n.machine_id == id));

    let snapshot = shared.snapshot().unwrap();
    assert_eq!(snapshot.balance, 0);
    assert_eq!(snapshot.inventory.get("Pretzels").unwrap().count(), 8);
}
