use super::{service_error, Client};
use crate::error::{BugzillaError, Result};
use crate::model::{Attachment, AttachmentId, BugId, PostAttachment};
use reqwest::Response;
use serde::Deserialize;
use std::collections::HashMap;

impl Client {
    /// Fetch one attachment including its decoded contents.
    pub async fn get_attachment(&self, id: AttachmentId) -> Result<Attachment> {
        let url = self.url(&format!("/rest/bug/attachment/{}", id), &[]);
        let body = self.send(self.http.get(url)).await?;
        decode_single_attachment(&body, id)
    }

    /// Start downloading an attachment.
    ///
    /// The response is handed back unread so large attachments can be
    /// streamed; pass the full body to
    /// [`AttachmentDownload::data_from_download`] to get the contents.
    pub async fn download_attachment(
        &self,
        id: AttachmentId,
    ) -> Result<(AttachmentDownload, Response)> {
        let url = self.url(
            &format!("/rest/bug/attachment/{}", id),
            &[("include_fields", "data")],
        );
        let response = self.execute(self.http.get(url)).await?;
        let status = response.status();
        if !status.is_success() {
            let body = self.read_body(response).await?;
            return Err(service_error(status, &body));
        }
        Ok((AttachmentDownload { id }, response))
    }

    /// Attach `attachment` to bug `bug_id` and return the new attachment ID.
    pub async fn upload_attachment(
        &self,
        bug_id: BugId,
        attachment: &PostAttachment,
    ) -> Result<AttachmentId> {
        let url = self.bugs_url(&[bug_id], "/attachment", &[])?;
        let payload = serde_json::to_vec(&attachment.for_bug(bug_id))
            .map_err(|e| BugzillaError::Request(format!("cannot encode attachment: {}", e)))?;
        let body = self.send(self.http.post(url).body(payload)).await?;

        let created: CreatedIds = serde_json::from_slice(&body)?;
        created.ids.first().copied().ok_or_else(|| {
            BugzillaError::Connection("no attachment ID returned".to_string())
        })
    }
}

/// Handle returned by [`Client::download_attachment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentDownload {
    id: AttachmentId,
}

impl AttachmentDownload {
    /// The attachment being downloaded.
    pub fn id(&self) -> AttachmentId {
        self.id
    }

    /// Decode the contents out of a fully read download response.
    pub fn data_from_download(&self, raw: &[u8]) -> Result<Vec<u8>> {
        decode_single_attachment(raw, self.id).map(|attachment| attachment.data)
    }
}

#[derive(Debug, Deserialize)]
struct AttachmentsEnvelope {
    #[serde(default)]
    attachments: HashMap<String, Attachment>,
}

#[derive(Debug, Deserialize)]
struct CreatedIds {
    #[serde(default)]
    ids: Vec<AttachmentId>,
}

/// Pick attachment `id` out of `{"attachments": {"<id>": {...}}}`.
fn decode_single_attachment(body: &[u8], id: AttachmentId) -> Result<Attachment> {
    let mut envelope: AttachmentsEnvelope = serde_json::from_slice(body)?;
    envelope.attachments.remove(&id.to_string()).ok_or_else(|| {
        BugzillaError::Connection(format!(
            "unexpected number of attachments returned: {}",
            envelope.attachments.len()
        ))
    })
}
