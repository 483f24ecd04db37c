//! Event publishing/subscription abstraction (mechanics only).
//!
//! The bus distributes notices to any number of consumers after the owning
//! aggregate has already committed its change. It is transport-agnostic and
//! makes no persistence promises.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvError, TryRecvError};

/// A subscription to a bus.
///
/// Each subscription receives a copy of every message published after it was
/// created (broadcast semantics). Intended for consumption by one thread.
///
/// ```ignore
/// let subscription = bus.subscribe();
/// while let Ok(notice) = subscription.recv() {
///     release(notice);
/// }
/// ```
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Drain everything currently queued without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Domain-agnostic pub/sub abstraction.
///
/// `publish()` may fail (e.g. poisoned lock, broken transport). Callers decide
/// whether that matters; notifications that must never fail log and move on.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
