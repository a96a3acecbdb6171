//! The set of changes a caller wants applied to one bug.
//!
//! Everything is absent by default and absent means "leave it alone". Empty
//! strings count as absent too, so a blank value can never wipe a field on
//! the server by accident.
//!
//! ```rust,ignore
//! use bugzilla::Changes;
//!
//! let changes = Changes::new()
//!     .set_needinfo("dev@example.com")
//!     .add_comment("Can you take a look?")
//!     .set_priority("P1");
//! let ack = client.update(1047068, &changes).await?;
//! ```

use crate::model::BugId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Changes to be performed by [`crate::Client::update`] on a single bug.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Changes {
    /// Ask this address for more information, unless it is already asked.
    pub set_needinfo: Option<String>,
    /// Clear every open needinfo addressed to this address.
    pub remove_needinfo: Option<String>,

    /// Clear the single open needinfo of the bug.
    pub clear_needinfo: bool,
    /// With `clear_needinfo`: clear all open needinfos instead of refusing
    /// when there are several.
    pub clear_all_needinfos: bool,
    /// With `clear_needinfo`: only clear needinfos addressed to the
    /// configured account.
    pub clear_my_needinfos: bool,

    pub add_comment: Option<String>,
    pub comment_is_private: bool,

    pub set_url: Option<String>,
    pub set_assignee: Option<String>,
    /// Short priority code, `P0` to `P5`.
    pub set_priority: Option<String>,
    /// New summary line of the bug.
    pub set_description: Option<String>,
    pub set_whiteboard: Option<String>,
    pub set_status: Option<String>,
    pub set_resolution: Option<String>,
    /// Mark the bug as a duplicate of another one.
    pub set_duplicate: Option<BugId>,

    pub add_cc: Option<String>,
    pub remove_cc: Option<String>,
    /// Add the configured account to the CC list.
    pub cc_myself: bool,

    /// Refuse the update unless the bug's last change time is exactly this.
    pub delta_ts: Option<DateTime<Utc>>,
}

impl Changes {
    /// Start from an empty change-set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_needinfo(mut self, email: impl Into<String>) -> Self {
        self.set_needinfo = Some(email.into());
        self
    }

    pub fn remove_needinfo(mut self, email: impl Into<String>) -> Self {
        self.remove_needinfo = Some(email.into());
        self
    }

    pub fn clear_needinfo(mut self) -> Self {
        self.clear_needinfo = true;
        self
    }

    /// Clear every open needinfo on the bug.
    pub fn clear_all_needinfos(mut self) -> Self {
        self.clear_needinfo = true;
        self.clear_all_needinfos = true;
        self
    }

    /// Clear the open needinfos addressed to the configured account.
    pub fn clear_my_needinfos(mut self) -> Self {
        self.clear_needinfo = true;
        self.clear_my_needinfos = true;
        self
    }

    pub fn add_comment(mut self, body: impl Into<String>) -> Self {
        self.add_comment = Some(body.into());
        self
    }

    /// Add a comment visible only to the insider group.
    pub fn add_private_comment(mut self, body: impl Into<String>) -> Self {
        self.add_comment = Some(body.into());
        self.comment_is_private = true;
        self
    }

    pub fn set_url(mut self, url: impl Into<String>) -> Self {
        self.set_url = Some(url.into());
        self
    }

    pub fn set_assignee(mut self, email: impl Into<String>) -> Self {
        self.set_assignee = Some(email.into());
        self
    }

    pub fn set_priority(mut self, code: impl Into<String>) -> Self {
        self.set_priority = Some(code.into());
        self
    }

    pub fn set_description(mut self, summary: impl Into<String>) -> Self {
        self.set_description = Some(summary.into());
        self
    }

    pub fn set_whiteboard(mut self, whiteboard: impl Into<String>) -> Self {
        self.set_whiteboard = Some(whiteboard.into());
        self
    }

    pub fn set_status(mut self, status: impl Into<String>) -> Self {
        self.set_status = Some(status.into());
        self
    }

    pub fn set_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.set_resolution = Some(resolution.into());
        self
    }

    pub fn set_duplicate(mut self, bug_id: BugId) -> Self {
        self.set_duplicate = Some(bug_id);
        self
    }

    pub fn add_cc(mut self, email: impl Into<String>) -> Self {
        self.add_cc = Some(email.into());
        self
    }

    pub fn remove_cc(mut self, email: impl Into<String>) -> Self {
        self.remove_cc = Some(email.into());
        self
    }

    pub fn cc_myself(mut self) -> Self {
        self.cc_myself = true;
        self
    }

    /// Fail with a collision error unless the bug was last changed at
    /// exactly `last_change_time`.
    pub fn check_delta_ts(mut self, last_change_time: DateTime<Utc>) -> Self {
        self.delta_ts = Some(last_change_time);
        self
    }

    /// Whether building the update needs the configured account's address.
    pub fn needs_own_email(&self) -> bool {
        self.cc_myself || (self.wants_needinfo_cleared() && self.clear_my_needinfos)
    }

    pub(crate) fn wants_needinfo_cleared(&self) -> bool {
        self.clear_needinfo || non_empty(&self.remove_needinfo).is_some()
    }
}

/// The value of an optional string field, if it is set and not blank.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}
