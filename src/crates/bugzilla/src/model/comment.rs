use super::{AttachmentId, BugId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment on a bug. `count` is its position, the description being 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    pub id: u64,
    pub bug_id: BugId,
    pub attachment_id: Option<AttachmentId>,
    pub count: u32,
    pub text: String,
    pub creator: String,
    pub time: DateTime<Utc>,
    pub creation_time: DateTime<Utc>,
    pub is_private: bool,
    pub tags: Vec<String>,
}
