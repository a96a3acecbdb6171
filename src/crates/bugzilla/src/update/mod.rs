//! Turning a [`Changes`] request into a partial update and submitting it.
//!
//! An update runs in three phases:
//!
//! 1. [`UpdatePlan::prepare`] validates everything that needs no server
//!    state (own e-mail address, priority code). Nothing has touched the
//!    network yet, so a bad request costs nothing.
//! 2. The bug is fetched and [`UpdatePlan::check_collision`] compares its
//!    last change time against the caller's token.
//! 3. [`UpdatePlan::build`] derives the [`WireUpdate`] from the snapshot,
//!    which is then submitted for that one bug.
//!
//! Any error aborts the whole update. There is exactly one read and one
//! write, and no retry.

mod priority;
mod wire;

pub use priority::Priority;
pub use wire::{
    CommentChange, ExistingFlagEdit, FlagChange, ListChange, NewFlagRequest, WireUpdate,
};

use crate::changes::{non_empty, Changes};
use crate::config::account_email;
use crate::error::{BugzillaError, Result};
use crate::model::{Bug, BugId, FlagId};
use crate::response::UpdateResponse;
use crate::transport::BugTransport;
use tracing::debug;

/// Fetch the bug, check for collisions, build the update and submit it.
///
/// `username` is the configured account; it is only consulted when the
/// changes refer to "myself".
pub async fn submit<T>(
    transport: &T,
    username: &str,
    bug_id: BugId,
    changes: &Changes,
) -> Result<UpdateResponse>
where
    T: BugTransport + ?Sized,
{
    let plan = UpdatePlan::prepare(changes, username)?;
    let bug = transport.fetch_bug(bug_id).await?;
    plan.check_collision(&bug)?;
    let update = plan.build(bug_id, &bug)?;
    debug!(
        bug_id,
        flags = update.flags.len(),
        noop = update.is_noop(),
        "Submitting bug update"
    );
    transport.submit_update(bug_id, &update).await
}

/// A validated [`Changes`] waiting for the bug's current state.
#[derive(Debug, Clone)]
pub struct UpdatePlan<'a> {
    changes: &'a Changes,
    own_email: Option<String>,
    priority: Option<Priority>,
}

impl<'a> UpdatePlan<'a> {
    /// Validate the parts of `changes` that need no server state.
    pub fn prepare(changes: &'a Changes, username: &str) -> Result<Self> {
        let own_email = if changes.needs_own_email() {
            Some(account_email(username)?)
        } else {
            None
        };
        let priority = non_empty(&changes.set_priority)
            .map(str::parse::<Priority>)
            .transpose()?;

        Ok(Self {
            changes,
            own_email,
            priority,
        })
    }

    /// Refuse to go on if the bug moved since the caller's last read.
    ///
    /// Equality is exact; a token that is off by a fraction of a second is a
    /// collision too.
    pub fn check_collision(&self, bug: &Bug) -> Result<()> {
        match self.changes.delta_ts {
            Some(expected) if expected != bug.last_change_time => Err(BugzillaError::Collision {
                last_change_time: bug.last_change_time,
            }),
            _ => Ok(()),
        }
    }

    /// Derive the minimal update for `bug_id` given its current state.
    pub fn build(&self, bug_id: BugId, bug: &Bug) -> Result<WireUpdate> {
        let changes = self.changes;
        let mut update = WireUpdate::for_bug(bug_id);

        if let Some(email) = non_empty(&changes.set_needinfo) {
            if !bug.has_open_needinfo_for(email) {
                update.flags.push(FlagChange::needinfo(email));
            }
        }

        if changes.wants_needinfo_cleared() {
            for id in self.needinfos_to_clear(bug)? {
                update.flags.push(FlagChange::clear(id));
            }
        }

        update.url = non_empty(&changes.set_url).map(str::to_string);
        update.assigned_to = non_empty(&changes.set_assignee).map(str::to_string);
        update.summary = non_empty(&changes.set_description).map(str::to_string);
        update.whiteboard = non_empty(&changes.set_whiteboard).map(str::to_string);
        update.status = non_empty(&changes.set_status).map(str::to_string);
        update.resolution = non_empty(&changes.set_resolution).map(str::to_string);
        update.priority = self.priority.map(|p| p.label().to_string());
        update.dupe_of = changes.set_duplicate;

        if let Some(email) = non_empty(&changes.add_cc) {
            update.cc.add.push(email.to_string());
        }
        if let Some(email) = non_empty(&changes.remove_cc) {
            update.cc.remove.push(email.to_string());
        }
        if changes.cc_myself {
            update.cc.add.push(self.own_email()?.to_string());
        }

        if let Some(body) = non_empty(&changes.add_comment) {
            update.comment = Some(CommentChange {
                body: body.to_string(),
                is_private: changes.comment_is_private,
            });
        }

        Ok(update)
    }

    /// IDs of the open needinfo flags the request asks to clear.
    fn needinfos_to_clear(&self, bug: &Bug) -> Result<Vec<FlagId>> {
        let changes = self.changes;
        let explicit = non_empty(&changes.remove_needinfo);
        let target = if changes.clear_my_needinfos {
            self.own_email()?
        } else {
            // Empty matches every requestee.
            explicit.unwrap_or("")
        };

        let ids = bug.open_needinfos_for(target);
        if ids.len() > 1 && !changes.clear_all_needinfos && explicit.is_none() {
            return Err(BugzillaError::Request(
                "more than one needinfo found".to_string(),
            ));
        }
        Ok(ids)
    }

    fn own_email(&self) -> Result<&str> {
        self.own_email.as_deref().ok_or_else(|| {
            BugzillaError::Request("account e-mail address not resolved".to_string())
        })
    }
}
