//! Buying on someone's behalf from a table of favourite snacks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dispenser::Dispenser;
use crate::error::VendError;
use crate::machine::VendingMachine;

/// What people without a recorded favourite get.
pub const DEFAULT_SNACK: &str = "Candy Bar";

/// Person → favourite snack name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites(BTreeMap<String, String>);

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alice likes Chips, Bob likes Licorice, Eve likes Pretzels.
    pub fn sample() -> Self {
        [("Alice", "Chips"), ("Bob", "Licorice"), ("Eve", "Pretzels")]
            .into_iter()
            .collect()
    }

    pub fn insert(&mut self, person: impl Into<String>, snack: impl Into<String>) {
        self.0.insert(person.into(), snack.into());
    }

    /// The person's favourite, or [`DEFAULT_SNACK`].
    pub fn snack_for(&self, person: &str) -> &str {
        self.0.get(person).map_or(DEFAULT_SNACK, String::as_str)
    }
}

impl<P, S> FromIterator<(P, S)> for Favorites
where
    P: Into<String>,
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (P, S)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(person, snack)| (person.into(), snack.into()))
                .collect(),
        )
    }
}

/// Vend `person`'s favourite snack; vend errors go back to the caller untouched.
pub fn buy_favorite_snack<D>(
    person: &str,
    favorites: &Favorites,
    machine: &mut VendingMachine,
    dispenser: &mut D,
) -> Result<(), VendError>
where
    D: Dispenser + ?Sized,
{
    let snack = favorites.snack_for(person);
    tracing::debug!(person, snack, "buying favourite snack");
    machine.vend(snack, dispenser)
}
