use super::serde_helpers::{base64_bytes, int_bool, is_false};
use super::{AttachmentId, BugId, Flag};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Attachment metadata, plus its contents when they were requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attachment {
    pub id: AttachmentId,
    pub bug_id: BugId,
    pub creator: String,
    /// Decoded contents. Empty unless the attachment was fetched on its own.
    #[serde(with = "base64_bytes", skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<u8>,
    #[serde(with = "int_bool")]
    pub is_obsolete: bool,
    #[serde(with = "int_bool")]
    pub is_patch: bool,
    #[serde(with = "int_bool")]
    pub is_private: bool,
    pub creation_time: DateTime<Utc>,
    pub last_change_time: DateTime<Utc>,
    pub content_type: String,
    pub summary: String,
    pub file_name: String,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub flags: Vec<Flag>,
}

/// A new attachment to upload with [`crate::Client::upload_attachment`].
///
/// The target bug is filled in by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PostAttachment {
    pub(crate) ids: Vec<BugId>,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    pub file_name: String,
    pub summary: String,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub is_patch: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_private: bool,
}

impl PostAttachment {
    /// Create an upload from raw contents.
    pub fn new(
        data: impl Into<Vec<u8>>,
        file_name: impl Into<String>,
        summary: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            ids: Vec::new(),
            data: data.into(),
            file_name: file_name.into(),
            summary: summary.into(),
            content_type: content_type.into(),
            comment: None,
            is_patch: false,
            is_private: false,
        }
    }

    /// Add a comment to post along with the attachment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Mark the attachment as a patch.
    pub fn as_patch(mut self) -> Self {
        self.is_patch = true;
        self
    }

    /// Mark the attachment as private.
    pub fn as_private(mut self) -> Self {
        self.is_private = true;
        self
    }

    pub(crate) fn for_bug(&self, bug_id: BugId) -> Self {
        let mut upload = self.clone();
        upload.ids = vec![bug_id];
        upload
    }
}
