use serde::{Deserialize, Serialize};

/// A user as it appears in `*_detail` fields and on comments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub real_name: String,
}
