use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use cil_types::{ParentLink, ReportPayload};

use crate::block::Block;
use crate::error::ChainError;
use crate::traits::{ChainReader, ChainWriter};

/// In-memory chain store for services, tests, and embedding.
///
/// Appends take the write lock, so at most one append is in flight
/// system-wide; readers share the read lock and always observe fully-formed
/// blocks. The first append on an empty chain produces the genesis block
/// (index 0, sentinel parent).
pub struct InMemoryChain {
    inner: RwLock<Vec<Block>>,
}

impl InMemoryChain {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Vec::new()),
        }
    }

    /// Rehydrate a store from previously persisted blocks.
    ///
    /// The blocks are trusted as-is; run the verifier afterwards if the
    /// source is untrusted.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self {
            inner: RwLock::new(blocks),
        }
    }

    fn append_locked(
        chain: &mut Vec<Block>,
        payload: ReportPayload,
    ) -> Result<Block, ChainError> {
        let index = chain.len() as u64;
        let previous_hash = match chain.last() {
            None => ParentLink::Sentinel,
            Some(tip) => ParentLink::Block(tip.hash),
        };
        // Timestamps never run backwards across the chain, even if the
        // wall clock does.
        let timestamp = chain
            .last()
            .map(|tip| tip.timestamp)
            .unwrap_or(0)
            .max(unix_now());

        let block = Block::seal(index, timestamp, payload, previous_hash)?;
        chain.push(block.clone());
        debug!(index, hash = %block.hash.short_hex(), "block appended");
        Ok(block)
    }
}

impl Default for InMemoryChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainWriter for InMemoryChain {
    fn append(&self, payload: ReportPayload) -> Result<Block, ChainError> {
        let mut chain = self.inner.write().map_err(|_| ChainError::LockPoisoned)?;
        Self::append_locked(&mut chain, payload)
    }

    fn append_expecting(
        &self,
        expected_tip: ParentLink,
        payload: ReportPayload,
    ) -> Result<Block, ChainError> {
        let mut chain = self.inner.write().map_err(|_| ChainError::LockPoisoned)?;

        let actual_tip = match chain.last() {
            None => ParentLink::Sentinel,
            Some(tip) => ParentLink::Block(tip.hash),
        };
        if actual_tip != expected_tip {
            return Err(ChainError::InvalidAppend {
                index: chain.len() as u64,
                reason: format!(
                    "tip moved: expected {expected_tip}, found {actual_tip}; refresh and retry"
                ),
            });
        }

        Self::append_locked(&mut chain, payload)
    }
}

impl ChainReader for InMemoryChain {
    fn len(&self) -> Result<u64, ChainError> {
        let chain = self.inner.read().map_err(|_| ChainError::LockPoisoned)?;
        Ok(chain.len() as u64)
    }

    fn tip(&self) -> Result<Option<Block>, ChainError> {
        let chain = self.inner.read().map_err(|_| ChainError::LockPoisoned)?;
        Ok(chain.last().cloned())
    }

    fn get(&self, index: u64) -> Result<Block, ChainError> {
        let chain = self.inner.read().map_err(|_| ChainError::LockPoisoned)?;
        chain
            .get(index as usize)
            .cloned()
            .ok_or(ChainError::NotFound { index })
    }

    fn range(&self, start: u64, end: u64) -> Result<Vec<Block>, ChainError> {
        if start > end {
            return Err(ChainError::InvalidRange { start, end });
        }
        let chain = self.inner.read().map_err(|_| ChainError::LockPoisoned)?;
        let start = (start as usize).min(chain.len());
        let end = (end as usize).min(chain.len());
        Ok(chain[start..end].to_vec())
    }

    fn tail(&self, n: u64) -> Result<Vec<Block>, ChainError> {
        let chain = self.inner.read().map_err(|_| ChainError::LockPoisoned)?;
        let skip = chain.len().saturating_sub(n as usize);
        Ok(chain[skip..].to_vec())
    }

    fn all(&self) -> Result<Vec<Block>, ChainError> {
        let chain = self.inner.read().map_err(|_| ChainError::LockPoisoned)?;
        Ok(chain.clone())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
