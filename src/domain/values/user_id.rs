use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque user identifier.
///
/// Upstream stores hand out either numeric or string ids; both are accepted
/// on input and normalized to their string form, which also defines the
/// ordering used for deterministic grouping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        UserId(s)
    }
}

impl From<i64> for UserId {
    fn from(n: i64) -> Self {
        UserId(n.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUserId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawUserId::deserialize(deserializer)? {
            RawUserId::Text(s) => UserId(s),
            RawUserId::Signed(n) => UserId(n.to_string()),
            RawUserId::Unsigned(n) => UserId(n.to_string()),
        })
    }
}
