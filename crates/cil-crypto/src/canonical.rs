use serde::Serialize;

use crate::hasher::HasherError;

/// Encode a value as canonical JSON.
///
/// The canonical form is what block digests are computed over, so it must be
/// reproducible by any implementation in any language:
///
/// - UTF-8 JSON with compact separators (no whitespace)
/// - object keys sorted lexicographically at every nesting level
/// - no floating-point values in hashed documents (indices, timestamps, and
///   digests are integers and strings)
///
/// Sorting falls out of routing the value through [`serde_json::Value`],
/// whose object representation keeps keys ordered.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<Vec<u8>, HasherError> {
    let value =
        serde_json::to_value(value).map_err(|e| HasherError::Serialization(e.to_string()))?;
    serde_json::to_vec(&value).map_err(|e| HasherError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_are_sorted() {
        let value = json!({"zeta": 1, "alpha": 2, "mid": {"b": 1, "a": 2}});
        let encoded = canonical_json(&value).unwrap();
        assert_eq!(
            String::from_utf8(encoded).unwrap(),
            r#"{"alpha":2,"mid":{"a":2,"b":1},"zeta":1}"#
        );
    }

    #[test]
    fn encoding_is_compact() {
        let encoded = canonical_json(&json!({"a": [1, 2, 3], "b": "x"})).unwrap();
        let text = String::from_utf8(encoded).unwrap();
        assert!(!text.contains(' '));
        assert!(!text.contains('\n'));
    }

    #[test]
    fn struct_field_order_does_not_matter() {
        // Two shapes of the same document canonicalize identically.
        #[derive(serde::Serialize)]
        struct Forward {
            index: u64,
            timestamp: u64,
        }
        #[derive(serde::Serialize)]
        struct Backward {
            timestamp: u64,
            index: u64,
        }

        let a = canonical_json(&Forward {
            index: 3,
            timestamp: 99,
        })
        .unwrap();
        let b = canonical_json(&Backward {
            timestamp: 99,
            index: 3,
        })
        .unwrap();
        assert_eq!(a, b);
    }
}
