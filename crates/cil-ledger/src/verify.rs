use serde::{Deserialize, Serialize};
use tracing::debug;

use cil_types::ParentLink;

use crate::block::Block;
use crate::error::ChainError;
use crate::traits::ChainReader;

/// Why a block failed verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultKind {
    /// The stored hash does not match the recomputed canonical digest.
    HashMismatch,
    /// The parent link does not match the trusted predecessor digest, or an
    /// ancestor was found tampered (which severs trust for all descendants).
    LinkageBroken,
    /// The block's index is not the expected contiguous value.
    IndexGap,
}

/// A single verification finding, anchored to a block index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub index: u64,
    pub kind: FaultKind,
    pub detail: String,
}

/// Result of auditing a chain or chain segment.
///
/// Findings are data, not errors: a broken chain is an expected, reportable
/// business condition. Callers decide how to surface it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainAudit {
    pub blocks_checked: u64,
    pub findings: Vec<Finding>,
}

impl ChainAudit {
    pub fn is_valid(&self) -> bool {
        self.findings.is_empty()
    }

    /// The overall verdict: `Valid`, or `Invalid` at the first finding.
    pub fn verdict(&self) -> Verdict {
        match self.findings.first() {
            None => Verdict::Valid,
            Some(f) => Verdict::Invalid {
                at_index: f.index,
                fault: f.kind,
            },
        }
    }
}

/// Condensed audit verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Valid,
    Invalid { at_index: u64, fault: FaultKind },
}

/// Chain integrity verifier.
///
/// Walks blocks in index order, recomputing each block's canonical digest
/// and checking parent linkage against the *recomputed* digest of the
/// predecessor. Verification is idempotent and side-effect free; it can be
/// re-run at any time, from genesis or from any segment boundary.
pub struct ChainVerifier;

impl ChainVerifier {
    /// Audit the full chain held by `reader`, from genesis.
    pub fn audit<R: ChainReader>(reader: &R) -> Result<ChainAudit, ChainError> {
        let blocks = reader.all()?;
        Ok(Self::audit_segment(&blocks, 0, &ParentLink::Sentinel))
    }

    /// Audit a contiguous segment of blocks.
    ///
    /// `start_index` is the expected index of `blocks[0]`; `trusted_prev` is
    /// the trusted digest of the block before the segment (the sentinel at
    /// genesis). Segments may be audited in parallel and stitched: pass each
    /// boundary block's recomputed digest as the next segment's
    /// `trusted_prev`.
    pub fn audit_segment(
        blocks: &[Block],
        start_index: u64,
        trusted_prev: &ParentLink,
    ) -> ChainAudit {
        let mut findings = Vec::new();
        let mut expected_index = start_index;
        let mut trusted_prev = *trusted_prev;
        let mut lineage_intact = true;

        for block in blocks {
            if block.index != expected_index {
                findings.push(Finding {
                    index: block.index,
                    kind: FaultKind::IndexGap,
                    detail: format!("expected index {expected_index}, found {}", block.index),
                });
                expected_index = block.index;
                lineage_intact = false;
            }

            let recomputed = block.compute_hash();
            let self_consistent = match &recomputed {
                Ok(digest) => *digest == block.hash,
                // A payload that cannot be canonically serialized cannot
                // have produced the stored hash.
                Err(_) => false,
            };
            if !self_consistent {
                findings.push(Finding {
                    index: block.index,
                    kind: FaultKind::HashMismatch,
                    detail: "stored hash does not match recomputed digest".into(),
                });
            }

            if lineage_intact {
                let link_ok = block.previous_hash == trusted_prev;
                if !link_ok {
                    findings.push(Finding {
                        index: block.index,
                        kind: FaultKind::LinkageBroken,
                        detail: match trusted_prev {
                            ParentLink::Sentinel => {
                                "genesis block must carry the sentinel parent link".into()
                            }
                            ParentLink::Block(expected) => format!(
                                "parent link does not match predecessor digest {}",
                                expected.short_hex()
                            ),
                        },
                    });
                    lineage_intact = false;
                }
            } else {
                // Trust was severed upstream: every descendant's linkage is
                // broken by definition, even if its own fields are
                // self-consistent.
                findings.push(Finding {
                    index: block.index,
                    kind: FaultKind::LinkageBroken,
                    detail: "descends from a tampered or missing ancestor".into(),
                });
            }

            if !self_consistent {
                lineage_intact = false;
            }

            trusted_prev = match recomputed {
                Ok(digest) => ParentLink::Block(digest),
                Err(_) => ParentLink::Block(block.hash),
            };
            expected_index += 1;
        }

        debug!(
            blocks_checked = blocks.len(),
            findings = findings.len(),
            "chain audit complete"
        );

        ChainAudit {
            blocks_checked: blocks.len() as u64,
            findings,
        }
    }
}
