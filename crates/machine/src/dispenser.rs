//! The dispense collaborator.
//!
//! A dispenser is told which item to physically release after a vend has
//! committed. It returns nothing and must not fail; implementations that can
//! fail internally log and carry on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vendomat_core::MachineId;
use vendomat_events::EventBus;

pub trait Dispenser {
    fn dispense(&mut self, item: &str);
}

impl<F> Dispenser for F
where
    F: FnMut(&str),
{
    fn dispense(&mut self, item: &str) {
        self(item)
    }
}

/// Reports each release as a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDispenser;

impl Dispenser for LogDispenser {
    fn dispense(&mut self, item: &str) {
        tracing::info!(item, "dispensing");
    }
}

/// Keeps the names of everything released, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingDispenser {
    dispensed: Vec<String>,
}

impl RecordingDispenser {
    pub fn dispensed(&self) -> &[String] {
        &self.dispensed
    }
}

impl Dispenser for RecordingDispenser {
    fn dispense(&mut self, item: &str) {
        self.dispensed.push(item.to_string());
    }
}

/// Notice published by [`BusDispenser`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispensed {
    pub machine_id: MachineId,
    pub item: String,
    pub occurred_at: DateTime<Utc>,
}

/// Publishes a [`Dispensed`] notice for whoever drives the hardware.
#[derive(Debug)]
pub struct BusDispenser<B> {
    bus: B,
    machine_id: MachineId,
}

impl<B> BusDispenser<B>
where
    B: EventBus<Dispensed>,
{
    pub fn new(bus: B, machine_id: MachineId) -> Self {
        Self { bus, machine_id }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<B> Dispenser for BusDispenser<B>
where
    B: EventBus<Dispensed>,
{
    fn dispense(&mut self, item: &str) {
        let notice = Dispensed {
            machine_id: self.machine_id,
            item: item.to_string(),
            occurred_at: Utc::now(),
        };
        if let Err(err) = self.bus.publish(notice) {
            tracing::warn!(machine_id = %self.machine_id, item, error = ?err, "dispense notice dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use vendomat_events::InMemoryEventBus;

    #[test]
    fn closures_are_dispensers() {
        let mut seen = Vec::new();
        {
            let mut dispenser = |item: &str| seen.push(item.to_uppercase());
            dispenser.dispense("Chips");
        }
        assert_eq!(seen, vec!["CHIPS"]);
    }

    #[test]
    fn recording_dispenser_keeps_order() {
        let mut dispenser = RecordingDispenser::default();
        dispenser.dispense("Chips");
        dispenser.dispense("Pretzels");
        assert_eq!(dispenser.dispensed(), ["Chips", "Pretzels"]);
    }

    #[test]
    fn bus_dispenser_publishes_notice() {
        let bus: Arc<InMemoryEventBus<Dispensed>> = Arc::new(InMemoryEventBus::new());
        let subscription = bus.subscribe();
        let machine_id = MachineId::new();
        let mut dispenser = BusDispenser::new(Arc::clone(&bus), machine_id);

        dispenser.dispense("Candy Bar");

        let notice = subscription.try_recv().unwrap();
        assert_eq!(notice.machine_id, machine_id);
        assert_eq!(notice.item, "Candy Bar");
    }

    #[test]
    fn bus_dispenser_without_subscribers_is_silent() {
        let mut dispenser = BusDispenser::new(InMemoryEventBus::new(), MachineId::new());
        dispenser.dispense("Chips");
        assert_eq!(dispenser.bus().subscriber_count(), Ok(0));
    }
}
