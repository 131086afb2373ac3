//! Event fabric for the Civic Integrity Log.
//!
//! Publish/subscribe notification of chain activity. Events fire only after
//! a successful, durable append: subscribers receive the finalized block,
//! never a partially-committed one.

pub mod event;
pub mod fabric;

pub use event::{ChainEvent, EventId, EventKind, EventPayload};
pub use fabric::{EventFabric, EventFilter, EventStream};
