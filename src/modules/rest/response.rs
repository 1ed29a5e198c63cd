use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Machine-readable outcome for mailbox operations without a binary payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Object)]
pub struct OperationResult {
    /// Outcome marker: "copied", "moved" or "flagged".
    pub status: String,
    /// The UID of the affected message.
    pub uid: u32,
    /// The mailbox the message was filed into, when applicable.
    pub target_mailbox: Option<String>,
}

/// Returned when a traversal finished without finding a single PDF part.
/// Distinct from a failure: the message was fetched and walked successfully.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Object)]
pub struct NoAttachmentsResult {
    /// Always "no_attachments_found".
    pub status: String,
    /// The identifier the request supplied, echoed back.
    pub uid: String,
}
