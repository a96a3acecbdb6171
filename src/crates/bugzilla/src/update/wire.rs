//! The partial-update payload for `PUT /rest/bug/{id}`.
//!
//! Only what was set is serialized; absent parts are left out of the JSON
//! entirely instead of being sent as `null` or `""`.

use crate::model::{BugId, FlagId, FlagStatus, NEEDINFO};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Minimal server-format delta for one bug.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WireUpdate {
    pub ids: Vec<BugId>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<CommentChange>,
    #[serde(skip_serializing_if = "ListChange::is_empty")]
    pub cc: ListChange,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dupe_of: Option<BugId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whiteboard: Option<String>,
}

impl WireUpdate {
    /// An update addressing a single bug, with nothing to change yet.
    pub fn for_bug(id: BugId) -> Self {
        Self {
            ids: vec![id],
            ..Default::default()
        }
    }

    /// True when the update only names its bug.
    pub fn is_noop(&self) -> bool {
        match self.ids.as_slice() {
            [id] => *self == Self::for_bug(*id),
            _ => false,
        }
    }
}

/// A change to one flag.
///
/// New flags are addressed by name and requestee, existing ones by ID only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagChange {
    New(NewFlagRequest),
    Existing(ExistingFlagEdit),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFlagRequest {
    pub name: String,
    pub requestee: String,
    pub status: FlagStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingFlagEdit {
    pub id: FlagId,
    pub status: FlagStatus,
}

impl FlagChange {
    /// Request information from `requestee`.
    pub fn needinfo(requestee: impl Into<String>) -> Self {
        FlagChange::New(NewFlagRequest {
            name: NEEDINFO.to_string(),
            requestee: requestee.into(),
            status: FlagStatus::Requested,
        })
    }

    /// Remove an existing flag.
    pub fn clear(id: FlagId) -> Self {
        FlagChange::Existing(ExistingFlagEdit {
            id,
            status: FlagStatus::Cleared,
        })
    }
}

impl Serialize for FlagChange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FlagChange::New(flag) => {
                let mut state = serializer.serialize_struct("FlagChange", 4)?;
                state.serialize_field("name", &flag.name)?;
                state.serialize_field("new", &true)?;
                if flag.requestee.is_empty() {
                    state.skip_field("requestee")?;
                } else {
                    state.serialize_field("requestee", &flag.requestee)?;
                }
                state.serialize_field("status", &flag.status)?;
                state.end()
            }
            FlagChange::Existing(flag) => {
                let mut state = serializer.serialize_struct("FlagChange", 2)?;
                state.serialize_field("id", &flag.id)?;
                state.serialize_field("status", &flag.status)?;
                state.end()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentChange {
    pub body: String,
    pub is_private: bool,
}

/// Additions to and removals from a list field such as `cc`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListChange {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remove: Vec<String>,
}

impl ListChange {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_empty_update_only_names_the_bug() {
        let update = WireUpdate::for_bug(101234);
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"ids": [101234]}));
        assert!(update.is_noop());
    }

    #[test]
    fn test_new_needinfo_shape() {
        let change = FlagChange::needinfo("user@foobar.com");
        assert_eq!(
            serde_json::to_value(&change).unwrap(),
            json!({"name": "needinfo", "new": true, "requestee": "user@foobar.com", "status": "?"})
        );
    }

    #[test]
    fn test_clear_flag_has_no_new_marker() {
        let change = FlagChange::clear(266294);
        assert_eq!(
            serde_json::to_value(&change).unwrap(),
            json!({"id": 266294, "status": "X"})
        );
    }

    #[test]
    fn test_cc_sides_are_omitted_when_empty() {
        let mut update = WireUpdate::for_bug(1);
        update.cc.remove.push("b@x.com".to_string());
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"ids": [1], "cc": {"remove": ["b@x.com"]}})
        );
        assert!(!update.is_noop());
    }

    #[test]
    fn test_full_update() {
        let update = WireUpdate {
            ids: vec![7],
            flags: vec![FlagChange::needinfo("a@x.com"), FlagChange::clear(3)],
            comment: Some(CommentChange {
                body: "hi".to_string(),
                is_private: false,
            }),
            cc: ListChange {
                add: vec!["a@x.com".to_string()],
                remove: vec!["b@x.com".to_string()],
            },
            assigned_to: Some("dev@x.com".to_string()),
            dupe_of: Some(5),
            priority: Some("P0 - Crit Sit".to_string()),
            resolution: Some("FIXED".to_string()),
            status: Some("RESOLVED".to_string()),
            summary: Some("new summary".to_string()),
            url: Some("http://foobar.com/1/2".to_string()),
            whiteboard: Some("wb".to_string()),
        };

        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({
                "ids": [7],
                "flags": [
                    {"name": "needinfo", "new": true, "requestee": "a@x.com", "status": "?"},
                    {"id": 3, "status": "X"}
                ],
                "comment": {"body": "hi", "is_private": false},
                "cc": {"add": ["a@x.com"], "remove": ["b@x.com"]},
                "assigned_to": "dev@x.com",
                "dupe_of": 5,
                "priority": "P0 - Crit Sit",
                "resolution": "FIXED",
                "status": "RESOLVED",
                "summary": "new summary",
                "url": "http://foobar.com/1/2",
                "whiteboard": "wb"
            })
        );
    }
}
