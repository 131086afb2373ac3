use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::digest::Digest;

/// Sentinel value a genesis block carries instead of a predecessor digest.
pub const GENESIS_SENTINEL: &str = "0";

/// A block's link to its predecessor.
///
/// Every block except the genesis block links to its predecessor by digest.
/// The genesis block carries the sentinel string `"0"` on the wire, which is
/// what existing consumers of this chain format expect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParentLink {
    /// No predecessor: this is the genesis block.
    Sentinel,
    /// Digest of the predecessor block.
    Block(Digest),
}

impl ParentLink {
    /// The predecessor digest, or `None` at genesis.
    pub fn digest(&self) -> Option<&Digest> {
        match self {
            Self::Sentinel => None,
            Self::Block(d) => Some(d),
        }
    }

    /// Returns `true` for the genesis sentinel.
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::Sentinel)
    }
}

impl From<Digest> for ParentLink {
    fn from(digest: Digest) -> Self {
        Self::Block(digest)
    }
}

impl fmt::Display for ParentLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sentinel => f.write_str(GENESIS_SENTINEL),
            Self::Block(d) => write!(f, "{d}"),
        }
    }
}

impl Serialize for ParentLink {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Sentinel => serializer.serialize_str(GENESIS_SENTINEL),
            Self::Block(d) => d.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ParentLink {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LinkVisitor;

        impl Visitor<'_> for LinkVisitor {
            type Value = ParentLink;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("\"0\" or a 64-character hex string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ParentLink, E> {
                if v == GENESIS_SENTINEL {
                    return Ok(ParentLink::Sentinel);
                }
                Digest::from_hex(v)
                    .map(ParentLink::Block)
                    .map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(LinkVisitor)
    }
}
