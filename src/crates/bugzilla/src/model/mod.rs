//! Entities as returned by the Bugzilla REST API.
//!
//! These are read-only snapshots: the client never edits them in place, it
//! fetches a fresh copy whenever it needs current server state.

mod attachment;
mod bug;
mod comment;
mod flag;
mod serde_helpers;
mod user;

pub use attachment::{Attachment, PostAttachment};
pub use bug::Bug;
pub use comment::Comment;
pub use flag::{Flag, FlagStatus, NEEDINFO};
pub use user::User;

/// Identifier of a bug.
pub type BugId = u64;

/// Identifier of a flag attached to a bug or attachment.
pub type FlagId = u64;

/// Identifier of an attachment.
pub type AttachmentId = u64;
