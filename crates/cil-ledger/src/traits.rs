use cil_types::{ParentLink, ReportPayload};

use crate::block::Block;
use crate::error::ChainError;

/// Read boundary for chain query operations.
///
/// Readers may run concurrently with each other and with the serialized
/// writer; they observe either the pre- or post-append state but never a
/// partially-written block.
pub trait ChainReader: Send + Sync {
    /// Number of blocks in the chain.
    fn len(&self) -> Result<u64, ChainError>;

    fn is_empty(&self) -> Result<bool, ChainError> {
        Ok(self.len()? == 0)
    }

    /// The highest-index block, or `None` on an empty chain.
    fn tip(&self) -> Result<Option<Block>, ChainError>;

    /// The block at `index`, or [`ChainError::NotFound`].
    fn get(&self, index: u64) -> Result<Block, ChainError>;

    /// Blocks in `[start, end)` index order. Indices past the tip are
    /// clamped; an inverted range is [`ChainError::InvalidRange`].
    fn range(&self, start: u64, end: u64) -> Result<Vec<Block>, ChainError>;

    /// The last `n` blocks in index order.
    fn tail(&self, n: u64) -> Result<Vec<Block>, ChainError>;

    /// The full chain in index order.
    fn all(&self) -> Result<Vec<Block>, ChainError>;
}

/// Write boundary for chain append operations.
///
/// There are no update or delete operations by design: the only way to
/// correct history is appending a new block referencing the error.
pub trait ChainWriter: Send + Sync {
    /// Append a payload as the next block.
    ///
    /// The store serializes writers: the new block's index is the current
    /// chain length, its parent the current tip's hash, its timestamp
    /// clamped non-decreasing.
    fn append(&self, payload: ReportPayload) -> Result<Block, ChainError>;

    /// Conditional append: succeeds only if `expected_tip` still names the
    /// current tip (`ParentLink::Sentinel` for an expected-empty chain).
    ///
    /// Two callers racing from the same observed tip get exactly one
    /// success; the loser receives [`ChainError::InvalidAppend`] and must
    /// refresh the tip before retrying.
    fn append_expecting(
        &self,
        expected_tip: ParentLink,
        payload: ReportPayload,
    ) -> Result<Block, ChainError>;
}
