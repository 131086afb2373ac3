//! HTTP client for the Civic Integrity Log.
//!
//! Consumers of a remote chain must distinguish three conditions:
//! - *cannot reach the chain* — transient, retried here with bounded backoff
//! - *chain is provably tampered* — non-retryable, surfaced as data
//! - *one block's record didn't parse* — per-block, does not invalidate
//!   the chain
//!
//! The client applies a timeout to every request and never silently retries
//! submissions (a masked duplicate append is worse than a surfaced failure).

pub mod error;
pub mod http;
pub mod retry;
pub mod verifier;

pub use error::{ClientError, ClientResult};
pub use http::{ClientConfig, HttpChain, RemoteChain};
pub use retry::RetryPolicy;
pub use verifier::audit_fetched;
