use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use cil_ledger::Block;

/// Unique identifier for a fabric event, derived from its content hash.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId {
    pub hash: [u8; 32],
}

impl EventId {
    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self { hash }
    }

    /// Short hex representation (first 8 hex chars).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.hash[..4])
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "evt:{}", self.short_hex())
    }
}

/// Classification of fabric events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A block has been durably appended to the chain.
    BlockAppended,
    /// An on-demand chain audit has completed.
    ChainAudited,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BlockAppended => "BlockAppended",
            Self::ChainAudited => "ChainAudited",
        };
        write!(f, "{s}")
    }
}

/// Payload data carried by a fabric event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPayload {
    /// The finalized, sealed block.
    Block(Block),
    /// Summary of a completed audit.
    Audit {
        blocks_checked: u64,
        finding_count: u64,
    },
}

impl EventPayload {
    /// The chain index this payload pertains to, if any.
    pub fn block_index(&self) -> Option<u64> {
        match self {
            Self::Block(block) => Some(block.index),
            Self::Audit { .. } => None,
        }
    }
}

/// A single event flowing through the fabric.
///
/// Carries a content-addressed ID, a wall-clock emission time, a
/// classification kind, a payload, and a BLAKE3 integrity hash computed
/// over the serialized (kind, payload, emitted_at_ms).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEvent {
    pub id: EventId,
    /// Milliseconds since the UNIX epoch at emission.
    pub emitted_at_ms: u64,
    pub kind: EventKind,
    pub payload: EventPayload,
    pub integrity_hash: [u8; 32],
}

impl ChainEvent {
    /// Build a new event, computing its integrity hash and event ID.
    pub fn new(kind: EventKind, payload: EventPayload) -> Self {
        let emitted_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        let integrity_hash = Self::compute_integrity(&kind, &payload, emitted_at_ms);
        Self {
            id: EventId::from_hash(integrity_hash),
            emitted_at_ms,
            kind,
            payload,
            integrity_hash,
        }
    }

    /// Verify the event's integrity hash matches its content.
    pub fn verify_integrity(&self) -> bool {
        self.integrity_hash
            == Self::compute_integrity(&self.kind, &self.payload, self.emitted_at_ms)
    }

    fn compute_integrity(kind: &EventKind, payload: &EventPayload, emitted_at_ms: u64) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"cil-fabric-event-v1:");
        hasher.update(&emitted_at_ms.to_le_bytes());
        if let Ok(kind_bytes) = bincode::serialize(kind) {
            hasher.update(&kind_bytes);
        }
        if let Ok(payload_bytes) = bincode::serialize(payload) {
            hasher.update(&payload_bytes);
        }
        *hasher.finalize().as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cil_types::{ParentLink, ReportPayload};

    fn block() -> Block {
        Block::seal(0, 1700000000, ReportPayload::bootstrap(), ParentLink::Sentinel).unwrap()
    }

    #[test]
    fn new_event_verifies() {
        let event = ChainEvent::new(EventKind::BlockAppended, EventPayload::Block(block()));
        assert!(event.verify_integrity());
        assert_eq!(event.id.hash, event.integrity_hash);
    }

    #[test]
    fn altered_payload_fails_integrity() {
        let mut event = ChainEvent::new(
            EventKind::ChainAudited,
            EventPayload::Audit {
                blocks_checked: 10,
                finding_count: 0,
            },
        );
        event.payload = EventPayload::Audit {
            blocks_checked: 10,
            finding_count: 3,
        };
        assert!(!event.verify_integrity());
    }

    #[test]
    fn block_index_accessor() {
        let event = ChainEvent::new(EventKind::BlockAppended, EventPayload::Block(block()));
        assert_eq!(event.payload.block_index(), Some(0));

        let audit = ChainEvent::new(
            EventKind::ChainAudited,
            EventPayload::Audit {
                blocks_checked: 1,
                finding_count: 0,
            },
        );
        assert_eq!(audit.payload.block_index(), None);
    }

    #[test]
    fn display_formats() {
        let event = ChainEvent::new(EventKind::BlockAppended, EventPayload::Block(block()));
        assert!(format!("{}", event.id).starts_with("evt:"));
        assert_eq!(format!("{}", EventKind::BlockAppended), "BlockAppended");
    }
}
