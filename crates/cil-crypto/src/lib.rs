//! Hashing for the Civic Integrity Log.
//!
//! Provides the canonical JSON encoding and the SHA-256 digests computed
//! over it: block digests (the hash chain) and report content digests
//! (computed by producers before append).
//!
//! All crypto operations wrap established libraries — no custom cryptography.

pub mod canonical;
pub mod hasher;

pub use canonical::canonical_json;
pub use hasher::{BlockHasher, HasherError};
