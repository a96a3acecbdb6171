//! Common test utilities: a canned Bugzilla instance on top of wiremock.

#![allow(dead_code)]

use bugzilla::{CacheSink, Client, Config};
use serde_json::{json, Value};
use std::io;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const BUG_ID: u64 = 1047068;
pub const UPDATE_ID: u64 = 101234;
pub const API_KEY: &str = "xxxxxx";
pub const ATTACHMENT_ID: u64 = 766288;

/// A client for `server` without a username.
pub fn client(server: &MockServer) -> Client {
    Client::new(config(server)).expect("valid test config")
}

/// A client for `server` logged in as `username`.
pub fn client_as(server: &MockServer, username: &str) -> Client {
    Client::new(config(server).with_username(username)).expect("valid test config")
}

pub fn config(server: &MockServer) -> Config {
    Config::new(server.uri()).with_api_key(API_KEY)
}

pub fn bug_doc(id: u64) -> Value {
    json!({
        "actual_time": 0,
        "alias": [],
        "assigned_to": "user1@foobarcorp.example.com",
        "assigned_to_detail": {
            "email": "user1@foobarcorp.example.com",
            "id": 63803,
            "name": "user1@foobarcorp.example.com",
            "real_name": "Firstname1 LastName1"
        },
        "blocks": [],
        "cc": [
            "561726581864@foobarcorp.example.com",
            "user2@foobarcorp.example.com",
            "user1@foobarcorp.example.com",
            "user3@foobarcorp.example.com"
        ],
        "cf_foundby": "---",
        "classification": "Enterprise Frobnicator",
        "component": "Basesystem",
        "creation_time": "2017-07-03T13:29:15Z",
        "creator": "user1@foobarcorp.example.com",
        "deadline": null,
        "depends_on": [],
        "dupe_of": null,
        "flags": [
            {
                "creation_date": "2022-04-26T07:53:49Z",
                "id": 264343,
                "modification_date": "2022-04-26T07:53:49Z",
                "name": "needinfo",
                "requestee": "user1@foobarcorp.example.com",
                "setter": "user1@foobarcorp.example.com",
                "status": "?",
                "type_id": 4
            },
            {
                "creation_date": "2022-06-14T15:54:28Z",
                "id": 266294,
                "modification_date": "2022-06-14T15:54:28Z",
                "name": "needinfo",
                "requestee": "user3@foobarcorp.example.com",
                "setter": "user3@foobarcorp.example.com",
                "status": "?",
                "type_id": 4
            },
            {
                "creation_date": "2022-06-14T15:54:28Z",
                "id": 266299,
                "modification_date": "2022-06-14T15:54:28Z",
                "name": "needinfo",
                "requestee": "user3@foobarcorp.example.com",
                "setter": "user3@foobarcorp.example.com",
                "status": "?",
                "type_id": 4
            },
            {
                "creation_date": "2019-03-27T13:50:29Z",
                "id": 201663,
                "modification_date": "2019-03-27T13:50:29Z",
                "name": "SHIP_STOPPER",
                "requestee": "user1@foobarcorp.example.com",
                "setter": "user1@foobarcorp.example.com",
                "status": "?",
                "type_id": 2
            },
            {
                "creation_date": "2022-04-26T08:05:37Z",
                "id": 264345,
                "modification_date": "2022-04-26T08:05:37Z",
                "name": "CCB_Review",
                "setter": "user2@foobarcorp.example.com",
                "status": "+",
                "type_id": 3
            }
        ],
        "groups": [],
        "id": id,
        "is_cc_accessible": true,
        "is_confirmed": true,
        "is_creator_accessible": true,
        "is_open": true,
        "keywords": [],
        "last_change_time": "2023-04-12T01:02:03Z",
        "op_sys": "Other",
        "platform": "Other",
        "priority": "P2 - High",
        "product": "Enterprise Frobnicator 9000.1",
        "qa_contact": "user1@foobarcorp.example.com",
        "remaining_time": 0,
        "resolution": "",
        "see_also": [],
        "severity": "Major",
        "status": "REOPENED",
        "summary": "L4: test cloud bug123",
        "target_milestone": "FROB90001Maint-Upd",
        "update_token": "1683306765-PMQ3v1SB5rHQwTPnDeSPrCAmChAk5itzZn7A_WfGgq4",
        "url": "https://xxxxxx.foobarcorp.example.com/incident/9999999",
        "version": "FROB90001Maint-Upd",
        "whiteboard": "wasXXXFLAG:48626 zzz é com acento QE_REVIEW l3bs:c1,c2,c9"
    })
}

pub fn bugs_json(id: u64) -> Value {
    json!({ "bugs": [bug_doc(id)], "faults": [] })
}

pub fn comments_json(id: u64) -> Value {
    let comment = |cid: u64, count: u32, creator: &str, private: bool, text: &str, time: &str| {
        json!({
            "attachment_id": null,
            "bug_id": id,
            "count": count,
            "creation_time": time,
            "creator": creator,
            "id": cid,
            "is_private": private,
            "tags": [],
            "text": text,
            "time": time
        })
    };
    json!({
        "bugs": {
            id.to_string(): {
                "comments": [
                    comment(7315202, 0, "user1@foobarcorp.example.com", false,
                        "This is a test cloud incident.", "2017-07-03T13:29:15Z"),
                    comment(7315205, 1, "bot1@foobarcorp.example.com", true,
                        "XXXFLAG:48626 is now handled by Firstname1 LastName1.", "2017-07-03T13:31:23Z"),
                    comment(7323867, 2, "user1@foobarcorp.example.com", false,
                        "This is a multi line comment.\n\nDone.", "2017-07-11T10:50:17Z")
                ]
            }
        },
        "comments": {}
    })
}

pub fn attachments_json(id: u64) -> Value {
    let attachment = |aid: u64, file_name: &str, time: &str| {
        json!({
            "bug_id": id,
            "content_type": "text/plain",
            "creation_time": time,
            "creator": "user1@foobarcorp.example.com",
            "file_name": file_name,
            "flags": [],
            "id": aid,
            "is_obsolete": 0,
            "is_patch": 0,
            "is_private": 0,
            "last_change_time": time,
            "size": 2,
            "summary": "description"
        })
    };
    json!({
        "attachments": {},
        "bugs": {
            id.to_string(): [
                attachment(766283, "a.txt", "2018-04-06T12:48:24Z"),
                attachment(766284, "a.txt", "2018-04-06T12:50:44Z"),
                attachment(ATTACHMENT_ID, "b.txt", "2018-04-06T12:58:52Z")
            ]
        }
    })
}

pub fn single_attachment_json() -> Value {
    json!({
        "attachments": {
            ATTACHMENT_ID.to_string(): { "id": ATTACHMENT_ID, "bug_id": BUG_ID, "data": "YQo=" }
        },
        "bugs": {}
    })
}

/// The acknowledgement of an update that removed `removed` from the flags.
pub fn ack_json(id: u64, removed: &str) -> Value {
    let changes = if removed.is_empty() {
        json!({})
    } else {
        json!({ "flagtypes.name": { "added": "", "removed": removed } })
    };
    json!({
        "bugs": [{
            "alias": [],
            "changes": changes,
            "id": id,
            "last_change_time": "2023-05-09T09:30:30Z"
        }]
    })
}

/// Serve bug `id` with its comments and attachments.
pub async fn mount_bug(server: &MockServer, id: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/bug/{}", id)))
        .and(query_param("Bugzilla_api_key", API_KEY))
        .and(query_param("ids", id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(bugs_json(id)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/rest/bug/{}/comment", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(comments_json(id)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/rest/bug/{}/attachment", id)))
        .and(query_param("exclude_fields", "data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(attachments_json(id)))
        .mount(server)
        .await;
}

/// Accept exactly `times` updates of bug `id`, answering with `ack`.
pub async fn mount_update(server: &MockServer, id: u64, ack: Value, times: u64) {
    Mock::given(method("PUT"))
        .and(path(format!("/rest/bug/{}", id)))
        .and(query_param("ids", id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(ack))
        .expect(times)
        .mount(server)
        .await;
}

/// JSON bodies of the requests received with `verb`, oldest first.
pub async fn bodies(server: &MockServer, verb: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request: &&Request| request.method.as_str() == verb)
        .map(|request| request.body_json::<Value>().expect("JSON request body"))
        .collect()
}

/// Number of requests received with `verb`.
pub async fn count(server: &MockServer, verb: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.method.as_str() == verb)
        .count()
}

/// A cache that remembers everything it was given.
#[derive(Default)]
pub struct RecordingCache {
    pub entries: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn entries(&self) -> Vec<(String, Vec<u8>)> {
        self.entries.lock().unwrap().clone()
    }
}

impl CacheSink for RecordingCache {
    fn store(&self, key: &str, body: &[u8]) -> io::Result<()> {
        self.entries
            .lock()
            .unwrap()
            .push((key.to_string(), body.to_vec()));
        Ok(())
    }
}

/// A cache that always fails.
pub struct BrokenCache;

impl CacheSink for BrokenCache {
    fn store(&self, _key: &str, _body: &[u8]) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Other, "disk full"))
    }
}
