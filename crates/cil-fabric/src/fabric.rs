use std::sync::RwLock;

use tokio::sync::broadcast;
use tracing::debug;

use cil_ledger::Block;

use crate::event::{ChainEvent, EventKind, EventPayload};

/// Filter for subscribing to a subset of fabric events.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    /// If set, only events of these kinds are delivered.
    pub kinds: Option<Vec<EventKind>>,
    /// If set, only block events at or above this chain index are delivered.
    pub min_index: Option<u64>,
}

impl EventFilter {
    /// Returns `true` if the given event matches this filter.
    pub fn matches(&self, event: &ChainEvent) -> bool {
        if let Some(ref kinds) = self.kinds {
            if !kinds.contains(&event.kind) {
                return false;
            }
        }
        if let Some(min_index) = self.min_index {
            if let Some(index) = event.payload.block_index() {
                if index < min_index {
                    return false;
                }
            }
        }
        true
    }
}

/// A broadcast channel receiver for fabric events.
pub type EventStream = broadcast::Receiver<ChainEvent>;

/// Internal subscriber: a filter paired with a broadcast sender.
struct Subscriber {
    filter: EventFilter,
    sender: broadcast::Sender<ChainEvent>,
}

/// Fan-out event bus that delivers finalized chain activity to subscribers.
///
/// Publication happens only after the chain store has durably appended, so
/// a subscriber never observes a block that later fails to commit.
pub struct EventFabric {
    subscribers: RwLock<Vec<Subscriber>>,
    channel_capacity: usize,
}

impl EventFabric {
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            channel_capacity,
        }
    }

    /// Register a subscriber; returns a receiver for matching events.
    pub fn subscribe(&self, filter: EventFilter) -> EventStream {
        let (tx, rx) = broadcast::channel(self.channel_capacity);
        self.subscribers
            .write()
            .expect("fabric lock poisoned")
            .push(Subscriber { filter, sender: tx });
        rx
    }

    /// Publish an event to all matching subscribers.
    /// Subscribers whose channels are closed are pruned.
    pub fn publish(&self, event: ChainEvent) {
        debug!(id = %event.id, kind = %event.kind, "publishing fabric event");
        let mut subs = self.subscribers.write().expect("fabric lock poisoned");
        subs.retain(|sub| {
            if sub.filter.matches(&event) {
                // If send fails (no receivers), the subscriber is stale.
                sub.sender.send(event.clone()).is_ok()
            } else {
                // Keep non-matching subscribers; they may match future
                // events. Only prune if the channel itself is closed.
                sub.sender.receiver_count() > 0
            }
        });
    }

    /// Publish a `BlockAppended` event for a freshly sealed block.
    pub fn publish_block_appended(&self, block: Block) {
        self.publish(ChainEvent::new(
            EventKind::BlockAppended,
            EventPayload::Block(block),
        ));
    }

    /// Publish a `ChainAudited` event summarizing a completed audit.
    pub fn publish_audit(&self, blocks_checked: u64, finding_count: u64) {
        self.publish(ChainEvent::new(
            EventKind::ChainAudited,
            EventPayload::Audit {
                blocks_checked,
                finding_count,
            },
        ));
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().expect("fabric lock poisoned").len()
    }
}

impl Default for EventFabric {
    fn default() -> Self {
        Self::new(1024)
    }
}
