//! Domain events and the plumbing that carries them.
//!
//! - [`Event`]: the facts an aggregate emits.
//! - [`execute`]: decide-then-apply for a single command.
//! - [`EventBus`]: pub/sub for notifying collaborators after a change.

pub mod bus;
pub mod event;
pub mod handler;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use handler::execute;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
