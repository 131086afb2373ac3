//! Foundation types for the Civic Integrity Log (CIL).
//!
//! This crate provides the identity and wire-format types shared by every
//! other CIL crate.
//!
//! # Key Types
//!
//! - [`Digest`] — SHA-256 digest rendered as lowercase hex on the wire
//! - [`ParentLink`] — a block's link to its predecessor (`"0"` at genesis)
//! - [`ReportPayload`] — the `data` object embedded in every block
//! - [`ReportRecord`] — the domain record carried JSON-encoded in `data.text`
//! - [`SubmitterRef`] — pseudonymous submitter identifier
//!
//! Wire field names (`user_id`, `report_hash`, `media`, `text`,
//! `previous_hash`) are preserved exactly for interoperability with the
//! explorer consumers that already read this chain.

pub mod digest;
pub mod error;
pub mod link;
pub mod payload;
pub mod record;

pub use digest::Digest;
pub use error::TypeError;
pub use link::ParentLink;
pub use payload::{ReportPayload, ReportSubmission, SubmitterRef};
pub use record::ReportRecord;
