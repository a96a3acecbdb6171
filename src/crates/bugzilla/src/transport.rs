//! The two server operations the update builder depends on.

use crate::error::Result;
use crate::model::{Bug, BugId};
use crate::response::UpdateResponse;
use crate::update::WireUpdate;
use async_trait::async_trait;

/// Reads bug state and writes partial updates.
///
/// [`crate::Client`] implements this over HTTP. Keeping it a trait lets the
/// update logic run against anything that can hand out a bug snapshot.
#[async_trait]
pub trait BugTransport: Send + Sync {
    /// Fetch the bug record alone, without comments or attachments.
    async fn fetch_bug(&self, id: BugId) -> Result<Bug>;

    /// Submit `update` for bug `id` and return the server acknowledgement.
    async fn submit_update(&self, id: BugId, update: &WireUpdate) -> Result<UpdateResponse>;
}
