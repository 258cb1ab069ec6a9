// Redraw notifications - Tells the presentation layer which surface changed
//
// Subscribers register a callback and get a SubscriptionId back. Publishing
// delivers the event on the publishing thread to every subscriber registered
// at the time of the call. The subscriber list is snapshotted first, so a
// callback may subscribe or unsubscribe without deadlocking.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Surface that needs to be redrawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedrawEvent {
    Console,
    Emulator,
    Controller,
}

/// Handle returned by `RedrawHub::subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Arc<dyn Fn(RedrawEvent) + Send + Sync>;

/// One-to-many fan-out of redraw events
#[derive(Default)]
pub struct RedrawHub {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(SubscriptionId, Callback)>>,
}

impl RedrawHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn subscribers(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Callback)>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a callback for every published event
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(RedrawEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers().push((id, Arc::new(callback)));
        id
    }

    /// Remove a subscription
    ///
    /// # Returns
    /// false if the id was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    /// Deliver `event` to every current subscriber, in subscription order
    pub fn publish(&self, event: RedrawEvent) {
        let snapshot: Vec<Callback> = self
            .subscribers()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        log::trace!("Publishing {:?} to {} subscriber(s)", event, snapshot.len());
        for callback in snapshot {
            callback(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers().len()
    }
}

impl fmt::Debug for RedrawHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedrawHub")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
