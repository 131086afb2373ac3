use serde_json::json;

use cil_types::{Digest, ParentLink, ReportPayload};

use crate::canonical::canonical_json;

/// Digests for blocks and report content.
///
/// A block digest covers every block field except `hash` itself:
/// the canonical JSON document
/// `{"data": …, "index": …, "previous_hash": …, "timestamp": …}`
/// hashed with SHA-256. Recomputing this digest and comparing it with the
/// stored `hash` is how tampering is detected.
pub struct BlockHasher;

impl BlockHasher {
    /// Compute the digest of a block's hashable fields.
    pub fn block_digest(
        index: u64,
        timestamp: u64,
        data: &ReportPayload,
        previous_hash: &ParentLink,
    ) -> Result<Digest, HasherError> {
        let document = json!({
            "data": data,
            "index": index,
            "previous_hash": previous_hash,
            "timestamp": timestamp,
        });
        let encoded = canonical_json(&document)?;
        Ok(Digest::of_bytes(&encoded))
    }

    /// Content digest over a report's text and attachment identifiers.
    ///
    /// This is the producer-side digest carried in `data.report_hash`:
    /// SHA-256 over the report text concatenated with every attachment
    /// identifier, in order. The chain core itself never computes it.
    pub fn report_digest(text: &str, media: &[String]) -> Digest {
        let mut combined = String::with_capacity(
            text.len() + media.iter().map(String::len).sum::<usize>(),
        );
        combined.push_str(text);
        for link in media {
            combined.push_str(link);
        }
        Digest::of_bytes(combined.as_bytes())
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use cil_types::SubmitterRef;
    use proptest::prelude::*;

    fn payload(digest_seed: &[u8], record: &str) -> ReportPayload {
        ReportPayload::new(
            SubmitterRef::anonymous(),
            Digest::of_bytes(digest_seed),
            vec!["a.jpg".into()],
            record,
        )
    }

    #[test]
    fn block_digest_is_deterministic() {
        let data = payload(b"d0", "{}");
        let link = ParentLink::Sentinel;
        let d1 = BlockHasher::block_digest(0, 1700000000, &data, &link).unwrap();
        let d2 = BlockHasher::block_digest(0, 1700000000, &data, &link).unwrap();
        assert_eq!(d1, d2);
    }

    #[test]
    fn every_field_affects_the_digest() {
        let data = payload(b"d0", "{}");
        let link = ParentLink::Sentinel;
        let base = BlockHasher::block_digest(5, 1700000000, &data, &link).unwrap();

        let other_index = BlockHasher::block_digest(6, 1700000000, &data, &link).unwrap();
        assert_ne!(base, other_index);

        let other_ts = BlockHasher::block_digest(5, 1700000001, &data, &link).unwrap();
        assert_ne!(base, other_ts);

        let other_data = payload(b"d1", "{}");
        let changed_data = BlockHasher::block_digest(5, 1700000000, &other_data, &link).unwrap();
        assert_ne!(base, changed_data);

        let other_link = ParentLink::Block(Digest::of_bytes(b"tip"));
        let changed_link =
            BlockHasher::block_digest(5, 1700000000, &data, &other_link).unwrap();
        assert_ne!(base, changed_link);
    }

    #[test]
    fn report_digest_concatenates_text_and_media() {
        let media = vec!["a.jpg".to_string(), "b.jpg".to_string()];
        let d = BlockHasher::report_digest("report body", &media);
        assert_eq!(d, Digest::of_bytes(b"report bodya.jpgb.jpg"));
    }

    #[test]
    fn report_digest_is_order_sensitive() {
        let forward = vec!["a.jpg".to_string(), "b.jpg".to_string()];
        let reversed = vec!["b.jpg".to_string(), "a.jpg".to_string()];
        assert_ne!(
            BlockHasher::report_digest("t", &forward),
            BlockHasher::report_digest("t", &reversed)
        );
    }

    proptest! {
        #[test]
        fn digest_deterministic_over_arbitrary_records(
            record in ".{0,200}",
            index in 0u64..1_000_000,
            timestamp in 0u64..4_000_000_000,
        ) {
            let data = payload(b"seed", &record);
            let link = ParentLink::Sentinel;
            let d1 = BlockHasher::block_digest(index, timestamp, &data, &link).unwrap();
            let d2 = BlockHasher::block_digest(index, timestamp, &data, &link).unwrap();
            prop_assert_eq!(d1, d2);
        }

        #[test]
        fn timestamp_shift_always_changes_digest(
            timestamp in 0u64..4_000_000_000,
            shift in 1u64..1_000,
        ) {
            let data = payload(b"seed", "{}");
            let link = ParentLink::Sentinel;
            let a = BlockHasher::block_digest(1, timestamp, &data, &link).unwrap();
            let b = BlockHasher::block_digest(1, timestamp + shift, &data, &link).unwrap();
            prop_assert_ne!(a, b);
        }
    }
}
