use crate::Event;

/// Notification queue owned by a single round.
///
/// Producers publish during a tick and the round drains the queue once the
/// tick has been applied, so listeners never outlive the round that created
/// the bus.
#[derive(Debug, Default)]
pub struct EventBus {
    pending: Vec<Event>,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an event for the next drain.
    pub fn publish(&mut self, event: Event) {
        self.pending.push(event);
    }

    /// Removes and returns every queued event in publish order.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending)
    }

    /// Events queued since the last drain.
    #[must_use]
    pub fn pending(&self) -> &[Event] {
        &self.pending
    }

    /// Reports whether no events are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
