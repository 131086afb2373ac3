use serde::{Deserialize, Serialize};

use cil_crypto::BlockHasher;
use cil_types::{Digest, ParentLink, ReportPayload};

use crate::error::ChainError;

/// One immutable unit of the integrity log.
///
/// A block is a value type: it is sealed once, at append time, and never
/// mutated afterwards. Its `hash` covers every other field via the canonical
/// serialization defined in `cil-crypto`, and its `previous_hash` links it
/// to its predecessor (the sentinel `"0"` at genesis).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain, contiguous from 0.
    pub index: u64,
    /// Seconds since the UNIX epoch, non-decreasing across the chain.
    pub timestamp: u64,
    /// The report payload.
    pub data: ReportPayload,
    /// Digest of the predecessor block.
    pub previous_hash: ParentLink,
    /// Digest of this block's own canonical serialization.
    pub hash: Digest,
}

impl Block {
    /// Seal a new block, computing its digest from the given fields.
    pub fn seal(
        index: u64,
        timestamp: u64,
        data: ReportPayload,
        previous_hash: ParentLink,
    ) -> Result<Self, ChainError> {
        let hash = BlockHasher::block_digest(index, timestamp, &data, &previous_hash)
            .map_err(|e| ChainError::Serialization(e.to_string()))?;
        Ok(Self {
            index,
            timestamp,
            data,
            previous_hash,
            hash,
        })
    }

    /// Recompute the digest of this block's hashable fields.
    pub fn compute_hash(&self) -> Result<Digest, ChainError> {
        BlockHasher::block_digest(self.index, self.timestamp, &self.data, &self.previous_hash)
            .map_err(|e| ChainError::Serialization(e.to_string()))
    }

    /// Returns `true` if the stored `hash` matches the recomputed digest.
    pub fn hash_is_valid(&self) -> Result<bool, ChainError> {
        Ok(self.compute_hash()? == self.hash)
    }

    /// Returns `true` for the genesis block (index 0, sentinel parent).
    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.previous_hash.is_sentinel()
    }
}
