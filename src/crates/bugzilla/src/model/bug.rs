use super::{Attachment, BugId, Comment, Flag, FlagId, User};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// A bug record as served by `GET /rest/bug/{id}`.
///
/// `comments` and `attachments` are only populated by a full fetch
/// ([`crate::Client::get_bug`]). Custom fields (`cf_*`) end up in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bug {
    pub id: BugId,
    pub alias: Vec<String>,
    pub summary: String,
    pub status: String,
    pub resolution: String,
    pub priority: String,
    pub severity: String,
    pub whiteboard: String,
    pub url: String,
    pub keywords: Vec<String>,

    pub classification: String,
    pub product: String,
    pub component: String,
    pub version: String,
    pub platform: String,
    pub op_sys: String,
    pub target_milestone: String,
    pub groups: Vec<String>,

    pub assigned_to: String,
    pub assigned_to_detail: Option<User>,
    pub creator: String,
    pub creator_detail: Option<User>,
    pub qa_contact: String,
    pub qa_contact_detail: Option<User>,
    pub cc: Vec<String>,
    pub cc_detail: Vec<User>,

    pub blocks: Vec<BugId>,
    pub depends_on: Vec<BugId>,
    pub dupe_of: Option<BugId>,
    pub see_also: Vec<String>,

    pub is_open: bool,
    pub is_confirmed: bool,
    pub is_cc_accessible: bool,
    pub is_creator_accessible: bool,

    pub creation_time: DateTime<Utc>,
    /// Token for optimistic concurrency checks.
    pub last_change_time: DateTime<Utc>,
    pub deadline: Option<String>,
    pub actual_time: f64,
    pub estimated_time: f64,
    pub remaining_time: f64,
    pub update_token: String,

    pub flags: Vec<Flag>,
    pub comments: Vec<Comment>,
    pub attachments: Vec<Attachment>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Bug {
    /// Decode a single bug document, such as a cached copy.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Open needinfo flags, in the order the server listed them.
    pub fn open_needinfos(&self) -> impl Iterator<Item = &Flag> {
        self.flags
            .iter()
            .filter(|flag| flag.is_needinfo() && flag.is_open())
    }

    /// IDs of the open needinfo flags addressed to `email`.
    ///
    /// Matching ignores case; an empty `email` matches every open needinfo.
    pub fn open_needinfos_for(&self, email: &str) -> Vec<FlagId> {
        self.open_needinfos()
            .filter(|flag| flag.is_requested_from(email))
            .map(|flag| flag.id)
            .collect()
    }

    /// Whether `email` already has an open needinfo on this bug.
    pub fn has_open_needinfo_for(&self, email: &str) -> bool {
        !email.is_empty()
            && self
                .open_needinfos()
                .any(|flag| flag.is_requested_from(email))
    }
}
