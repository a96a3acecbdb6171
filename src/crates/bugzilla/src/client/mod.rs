//! HTTP client for the Bugzilla REST API.
//!
//! # Example
//!
//! ```rust,ignore
//! use bugzilla::{Changes, Client, Config};
//!
//! let client = Client::new(
//!     Config::new("https://bugzilla.example.com")
//!         .with_username("me@example.com")
//!         .with_api_key(api_key),
//! )?;
//!
//! let bug = client.get_bug(1047068).await?;
//! let ack = client
//!     .update(bug.id, &Changes::new().set_priority("P1").check_delta_ts(bug.last_change_time))
//!     .await?;
//! ```

mod attachments;

pub use attachments::AttachmentDownload;

use crate::changes::Changes;
use crate::config::{Config, ValidateConfig};
use crate::error::{BugzillaError, Result};
use crate::model::{Attachment, Bug, BugId, Comment};
use crate::response::{decode_update_response, UpdateResponse};
use crate::transport::BugTransport;
use crate::update::{self, WireUpdate};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use tracing::{debug, warn};

/// Name of the query parameter carrying the API key.
const API_KEY_PARAM: &str = "Bugzilla_api_key";

/// A client for one Bugzilla instance.
///
/// Holds no mutable state and can be shared between tasks.
pub struct Client {
    config: Config,
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    /// Create a client. The configuration is validated first.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| BugzillaError::Request(format!("invalid base URL: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers);
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let http = builder
            .build()
            .map_err(|e| BugzillaError::Request(format!("cannot create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            base_url,
            http,
        })
    }

    /// Get the configuration this client was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ---- Bugs ----

    /// Fetch a bug together with its comments and attachment metadata.
    pub async fn get_bug(&self, id: BugId) -> Result<Bug> {
        self.get_bug_ex(id, true, true).await
    }

    /// Fetch a bug, optionally with its comments and attachment metadata.
    ///
    /// A failure in either follow-up request is reported as a connection
    /// error, since the bug itself was readable.
    pub async fn get_bug_ex(
        &self,
        id: BugId,
        with_comments: bool,
        with_attachments: bool,
    ) -> Result<Bug> {
        let mut bug = self.fetch_bug_record(id).await?;
        if with_comments {
            bug.comments = self.get_comments(&[id]).await.map_err(as_connection_error)?;
        }
        if with_attachments {
            bug.attachments = self
                .get_attachments_info(&[id])
                .await
                .map_err(as_connection_error)?;
        }
        self.cache_bug(&bug);
        Ok(bug)
    }

    /// Decode a single bug document, e.g. one written by the cache.
    pub fn get_bug_from_json(&self, source: impl Read) -> Result<Bug> {
        Bug::from_reader(source)
    }

    /// Apply `changes` to bug `id`.
    ///
    /// See [`crate::update`] for how the request is validated and built.
    pub async fn update(&self, id: BugId, changes: &Changes) -> Result<UpdateResponse> {
        update::submit(self, &self.config.username, id, changes).await
    }

    async fn fetch_bug_record(&self, id: BugId) -> Result<Bug> {
        let url = self.bugs_url(&[id], "", &[])?;
        let body = self.send(self.http.get(url)).await?;

        let envelope: BugsEnvelope = serde_json::from_slice(&body)?;
        let count = envelope.bugs.len();
        let mut bugs = envelope.bugs.into_iter();
        match (bugs.next(), count) {
            (Some(bug), 1) => Ok(bug),
            _ => Err(BugzillaError::Connection(format!(
                "unexpected number of bugs returned: {}",
                count
            ))),
        }
    }

    // ---- Comments and attachments ----

    /// Comments of the given bugs, in the order the bugs were listed.
    pub async fn get_comments(&self, bug_ids: &[BugId]) -> Result<Vec<Comment>> {
        let url = self.bugs_url(bug_ids, "/comment", &[])?;
        let body = self.send(self.http.get(url)).await?;

        let mut envelope: CommentsEnvelope = serde_json::from_slice(&body)?;
        Ok(bug_ids
            .iter()
            .filter_map(|id| envelope.bugs.remove(&id.to_string()))
            .flat_map(|bug| bug.comments)
            .collect())
    }

    /// Attachment metadata of the given bugs, without the attachment data.
    pub async fn get_attachments_info(&self, bug_ids: &[BugId]) -> Result<Vec<Attachment>> {
        let url = self.bugs_url(bug_ids, "/attachment", &[("exclude_fields", "data")])?;
        let body = self.send(self.http.get(url)).await?;

        let mut envelope: BugAttachmentsEnvelope = serde_json::from_slice(&body)?;
        Ok(bug_ids
            .iter()
            .filter_map(|id| envelope.bugs.remove(&id.to_string()))
            .flatten()
            .collect())
    }

    // ---- Plumbing ----

    /// `{base}/rest/bug/{first id}{suffix}?ids=..`
    fn bugs_url(&self, ids: &[BugId], suffix: &str, params: &[(&str, &str)]) -> Result<Url> {
        let first = ids
            .first()
            .ok_or_else(|| BugzillaError::Request("not enough IDs passed".to_string()))?;

        let mut url = self.url(&format!("/rest/bug/{}{}", first, suffix), params);
        {
            let mut query = url.query_pairs_mut();
            for id in ids {
                query.append_pair("ids", &id.to_string());
            }
        }
        Ok(url)
    }

    /// Join `path` onto the base URL and add `params` and the API key.
    fn url(&self, path: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!("{}{}", url.path().trim_end_matches('/'), path);
        url.set_path(&joined);
        url.set_query(None);
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            query.append_pair(API_KEY_PARAM, &self.config.api_key);
        }
        url
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>> {
        let response = self.execute(request).await?;
        self.collect(response).await
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let request = request.build()?;
        debug!(method = %request.method(), path = request.url().path(), "Sending request");
        let response = self.http.execute(request).await?;
        debug!(status = response.status().as_u16(), "Received response");
        Ok(response)
    }

    /// Read the body and turn non-2xx statuses into service errors.
    async fn collect(&self, response: Response) -> Result<Vec<u8>> {
        let status = response.status();
        let body = self.read_body(response).await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(service_error(status, &body))
        }
    }

    /// Read the whole body, refusing anything over the configured ceiling.
    async fn read_body(&self, mut response: Response) -> Result<Vec<u8>> {
        let limit = self.config.max_response_bytes;
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > limit {
                return Err(BugzillaError::Connection(format!(
                    "response body exceeds {} bytes",
                    limit
                )));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    /// Hand `bug` to the cache sink, if any. Failures are only logged.
    fn cache_bug(&self, bug: &Bug) {
        let Some(cache) = &self.config.cache else {
            return;
        };
        let key = bug.id.to_string();
        let stored = serde_json::to_vec(bug)
            .map_err(|e| e.to_string())
            .and_then(|body| cache.store(&key, &body).map_err(|e| e.to_string()));
        if let Err(e) = stored {
            warn!(bug_id = bug.id, error = %e, "Failed to cache bug");
        }
    }
}

#[async_trait]
impl BugTransport for Client {
    async fn fetch_bug(&self, id: BugId) -> Result<Bug> {
        let bug = self.fetch_bug_record(id).await?;
        self.cache_bug(&bug);
        Ok(bug)
    }

    async fn submit_update(&self, id: BugId, update: &WireUpdate) -> Result<UpdateResponse> {
        let url = self.bugs_url(&[id], "", &[])?;
        let body = serde_json::to_vec(update)
            .map_err(|e| BugzillaError::Request(format!("cannot encode update: {}", e)))?;
        let reply = self
            .send(self.http.request(Method::PUT, url).body(body))
            .await?;
        decode_update_response(&reply)
    }
}

/// The structured error in `body` if there is one, else the status text.
fn service_error(status: StatusCode, body: &[u8]) -> BugzillaError {
    let error = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            code,
            message: Some(message),
        }) => BugzillaError::Service { code, message },
        _ => BugzillaError::Service {
            code: None,
            message: status
                .canonical_reason()
                .unwrap_or_else(|| status.as_str())
                .to_string(),
        },
    };
    debug!(status = status.as_u16(), error = %error, "Request failed");
    error
}

fn as_connection_error(error: BugzillaError) -> BugzillaError {
    match error {
        BugzillaError::Connection(_) => error,
        other => BugzillaError::Connection(other.to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BugsEnvelope {
    #[serde(default)]
    bugs: Vec<Bug>,
}

#[derive(Debug, Deserialize)]
struct CommentsEnvelope {
    #[serde(default)]
    bugs: HashMap<String, BugComments>,
}

#[derive(Debug, Deserialize)]
struct BugComments {
    #[serde(default)]
    comments: Vec<Comment>,
}

#[derive(Debug, Deserialize)]
struct BugAttachmentsEnvelope {
    #[serde(default)]
    bugs: HashMap<String, Vec<Attachment>>,
}
