use super::FlagId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the flag used to ask someone for more information.
pub const NEEDINFO: &str = "needinfo";

/// A flag attached to a bug, such as `needinfo?(someone@example.com)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flag {
    pub id: FlagId,
    pub name: String,
    pub type_id: u64,
    /// Raw status character: `?`, `+` or `-`.
    pub status: String,
    pub setter: String,
    /// Empty when the flag is not addressed to anybody.
    pub requestee: String,
    pub creation_date: DateTime<Utc>,
    pub modification_date: DateTime<Utc>,
}

impl Flag {
    pub fn is_needinfo(&self) -> bool {
        self.name == NEEDINFO
    }

    /// A requested flag still waiting for an answer.
    pub fn is_open(&self) -> bool {
        self.status == FlagStatus::Requested.as_str()
    }

    /// Case-insensitive requestee match. An empty `email` matches any flag.
    pub fn is_requested_from(&self, email: &str) -> bool {
        email.is_empty() || self.requestee.to_lowercase() == email.to_lowercase()
    }
}

/// Flag status values accepted by the update endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagStatus {
    #[serde(rename = "?")]
    Requested,
    #[serde(rename = "+")]
    Granted,
    #[serde(rename = "-")]
    Denied,
    /// Removes the flag.
    #[serde(rename = "X")]
    Cleared,
}

impl FlagStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagStatus::Requested => "?",
            FlagStatus::Granted => "+",
            FlagStatus::Denied => "-",
            FlagStatus::Cleared => "X",
        }
    }
}
