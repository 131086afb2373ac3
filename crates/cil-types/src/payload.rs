use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::digest::Digest;

/// Pseudonymous submitter identifier.
///
/// Submitters are referenced by an opaque identifier, usually a UUID issued
/// by the account system. Anonymous and system submissions are normalized to
/// the nil UUID so the chain never carries free-form placeholder strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmitterRef(String);

impl SubmitterRef {
    /// Normalize a raw submitter identifier.
    ///
    /// UUIDs are canonicalized to lowercase hyphenated form; the aliases
    /// `"anonymous"`, `"system"`, and the empty string map to the nil UUID.
    /// Anything else is kept verbatim as an opaque reference.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match raw.trim() {
            "" | "anonymous" | "system" => Self::anonymous(),
            trimmed => match Uuid::parse_str(trimmed) {
                Ok(uuid) => Self(uuid.hyphenated().to_string()),
                Err(_) => Self(trimmed.to_string()),
            },
        }
    }

    /// The nil-UUID reference used for anonymous submissions.
    pub fn anonymous() -> Self {
        Self(Uuid::nil().hyphenated().to_string())
    }

    /// Returns `true` if this is the anonymous (nil UUID) reference.
    pub fn is_anonymous(&self) -> bool {
        self.0 == Uuid::nil().hyphenated().to_string()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmitterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The `data` object embedded in every block.
///
/// Field names on the wire (`user_id`, `report_hash`, `media`, `text`) are
/// fixed by the existing consumers and must not change. `text` carries a
/// JSON-encoded [`ReportRecord`](crate::ReportRecord) that is decoded lazily;
/// `media` entries may themselves be JSON-encoded arrays requiring a second
/// decode pass (see the query layer's attachment decoding).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPayload {
    /// Pseudonymous submitter reference.
    #[serde(rename = "user_id")]
    pub submitter: SubmitterRef,
    /// Content digest over the report text and attachment identifiers,
    /// computed by the producer before append.
    #[serde(rename = "report_hash")]
    pub content_digest: Digest,
    /// Ordered attachment identifiers.
    #[serde(rename = "media")]
    pub attachments: Vec<String>,
    /// JSON-encoded domain record.
    #[serde(rename = "text")]
    pub record: String,
}

impl ReportPayload {
    pub fn new(
        submitter: SubmitterRef,
        content_digest: Digest,
        attachments: Vec<String>,
        record: impl Into<String>,
    ) -> Self {
        Self {
            submitter,
            content_digest,
            attachments,
            record: record.into(),
        }
    }

    /// Payload for bootstrap blocks appended before any real report.
    ///
    /// Consumers hide bootstrap blocks below their display threshold; the
    /// marker text is never rendered as a report.
    pub fn bootstrap() -> Self {
        let record = "Genesis Block".to_string();
        Self {
            submitter: SubmitterRef::anonymous(),
            content_digest: Digest::of_bytes(record.as_bytes()),
            attachments: Vec::new(),
            record,
        }
    }
}

/// An inbound report submission, before it becomes a block payload.
///
/// This is the request shape accepted by the HTTP API and sent by the
/// client. The producer derives the payload's content digest from `text`
/// and `media_links`; the chain core never hashes uploaded media itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSubmission {
    pub text: String,
    #[serde(default)]
    pub media_links: Vec<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}
