//! A machine shared between callers.
//!
//! One mutex guards inventory and balance together so the
//! read-validate-mutate sequence of a vend runs as a unit.

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use vendomat_core::DomainError;

use crate::dispenser::Dispenser;
use crate::error::VendError;
use crate::machine::{MachineSnapshot, VendingMachine};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedMachineError {
    /// A previous holder panicked while the machine was locked.
    #[error("machine lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Vend(#[from] VendError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Clone)]
pub struct SharedMachine {
    inner: Arc<Mutex<VendingMachine>>,
}

impl SharedMachine {
    pub fn new(machine: VendingMachine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(machine)),
        }
    }

    /// Vend under the lock; the dispenser runs after the lock is released.
    pub fn vend<D>(&self, name: &str, dispenser: &mut D) -> Result<(), SharedMachineError>
    where
        D: Dispenser + ?Sized,
    {
        {
            let mut machine = self.lock()?;
            machine.vend(name, &mut |_: &str| {})?;
        }
        dispenser.dispense(name);
        Ok(())
    }

    pub fn deposit(&self, coins: u64) -> Result<(), SharedMachineError> {
        self.lock()?.deposit(coins)?;
        Ok(())
    }

    pub fn stock(&self, name: &str, price: u64, count: u64) -> Result<(), SharedMachineError> {
        self.lock()?.stock(name, price, count)?;
        Ok(())
    }

    pub fn snapshot(&self) -> Result<MachineSnapshot, SharedMachineError> {
        Ok(self.lock()?.snapshot())
    }

    fn lock(&self) -> Result<MutexGuard<'_, VendingMachine>, SharedMachineError> {
        self.inner.lock().map_err(|_| SharedMachineError::Poisoned)
    }
}
