//! Decoding of the acknowledgement returned by `PUT /rest/bug/{id}`.

use crate::error::{BugzillaError, Result};
use crate::model::BugId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What the server actually changed on one bug.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateResponse {
    pub id: BugId,
    pub alias: Vec<String>,
    /// New concurrency token of the bug.
    pub last_change_time: DateTime<Utc>,
    /// Field name to the values added and removed.
    pub changes: BTreeMap<String, FieldChange>,
}

/// Added and removed values of one field, comma separated for lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldChange {
    pub added: String,
    pub removed: String,
}

impl UpdateResponse {
    /// True when the server reports no field changes.
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct UpdateEnvelope {
    #[serde(default)]
    bugs: Vec<UpdateResponse>,
}

/// Decode the reply to a single-bug update.
///
/// Exactly one acknowledgement is expected; any other count means the reply
/// does not belong to the request that was sent.
pub fn decode_update_response(body: &[u8]) -> Result<UpdateResponse> {
    let envelope: UpdateEnvelope = serde_json::from_slice(body)?;
    let count = envelope.bugs.len();
    let mut bugs = envelope.bugs.into_iter();
    match (bugs.next(), count) {
        (Some(ack), 1) => Ok(ack),
        _ => Err(BugzillaError::Connection(format!(
            "got an unexpected number of update responses: {}",
            count
        ))),
    }
}
