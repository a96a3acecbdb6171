//! Client for the Bugzilla REST API.
//!
//! Reads bugs with their flags, comments and attachments, and applies
//! partial updates with mid-air collision detection.
//!
//! # Modules
//!
//! ## Changes (`changes`) and Update (`update`)
//!
//! A [`Changes`] lists what the caller wants; the update builder reads the
//! bug's current state and turns the request into the smallest write the
//! server needs:
//!
//! ```rust,ignore
//! use bugzilla::{Changes, Client, Config};
//!
//! let client = Client::new(Config::from_env("BUGZILLA")?)?;
//! let bug = client.get_bug(1047068).await?;
//!
//! let changes = Changes::new()
//!     .set_needinfo("someone@example.com")
//!     .add_comment("Can you take a look?")
//!     .check_delta_ts(bug.last_change_time);
//! let ack = client.update(bug.id, &changes).await?;
//! ```
//!
//! ## Model (`model`)
//!
//! Bugs, flags, comments, attachments and users as the server returns them.
//!
//! ## Client (`client`) and Transport (`transport`)
//!
//! [`Client`] talks HTTP. It implements [`BugTransport`], the two calls the
//! update builder needs.
//!
//! ## Config (`config`) and Cache (`cache`)
//!
//! Connection settings from code, environment or file, and an optional
//! [`CacheSink`] that receives every fetched bug.

pub mod cache;
pub mod changes;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod response;
pub mod transport;
pub mod update;

// Re-export commonly used types
pub use cache::{CacheSink, DirCache};
pub use changes::Changes;
pub use client::{AttachmentDownload, Client};
pub use config::{Config, FromEnv, ValidateConfig};
pub use error::{BugzillaError, Result};
pub use model::{
    Attachment, AttachmentId, Bug, BugId, Comment, Flag, FlagId, FlagStatus, PostAttachment,
    User, NEEDINFO,
};
pub use response::{FieldChange, UpdateResponse};
pub use transport::BugTransport;
pub use update::{Priority, WireUpdate};
