use cil_ledger::{Block, ChainAudit, ChainVerifier};
use cil_types::ParentLink;

/// Audit blocks received from a remote before trusting them.
///
/// A full chain (starting at index 0) is audited from the genesis sentinel.
/// A filtered page cannot prove its first link — the predecessor was not
/// fetched — so the first block's stated parent is taken as the trust
/// anchor and the page is checked for internal consistency from there.
pub fn audit_fetched(blocks: &[Block]) -> ChainAudit {
    match blocks.first() {
        None => ChainVerifier::audit_segment(&[], 0, &ParentLink::Sentinel),
        Some(first) if first.index == 0 => {
            ChainVerifier::audit_segment(blocks, 0, &ParentLink::Sentinel)
        }
        Some(first) => ChainVerifier::audit_segment(blocks, first.index, &first.previous_hash),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cil_ledger::{ChainReader, ChainWriter, FaultKind, InMemoryChain, Verdict};
    use cil_types::{Digest, ReportPayload, SubmitterRef};

    fn build_blocks(count: usize) -> Vec<Block> {
        let chain = InMemoryChain::new();
        for i in 0..count {
            chain
                .append(ReportPayload::new(
                    SubmitterRef::anonymous(),
                    Digest::of_bytes(&[i as u8]),
                    vec![],
                    "{}",
                ))
                .unwrap();
        }
        chain.all().unwrap()
    }

    #[test]
    fn full_fetch_audits_from_genesis() {
        let blocks = build_blocks(6);
        assert!(audit_fetched(&blocks).is_valid());
    }

    #[test]
    fn filtered_page_audits_internally() {
        let blocks = build_blocks(10);
        let page = &blocks[5..];
        assert!(audit_fetched(page).is_valid());
    }

    #[test]
    fn tampered_page_is_detected() {
        let mut blocks = build_blocks(10);
        blocks[7].data.record = "tampered".into();
        let page = &blocks[5..];

        let audit = audit_fetched(page);
        assert_eq!(
            audit.verdict(),
            Verdict::Invalid {
                at_index: 7,
                fault: FaultKind::HashMismatch
            }
        );
    }

    #[test]
    fn empty_fetch_is_valid() {
        assert!(audit_fetched(&[]).is_valid());
    }
}
