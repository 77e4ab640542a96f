use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Server-assigned note identifier.
///
/// The notes API may hand out integer or string ids, so both are accepted.
/// Equality is strict: `Int(1)` and `Text("1")` are different ids.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum NoteId {
    Int(i64),
    Text(String),
}

impl NoteId {
    /// An empty string id is the only way to express "no id" on the wire.
    /// `0` is a perfectly good id.
    pub fn is_missing(&self) -> bool {
        matches!(self, NoteId::Text(s) if s.is_empty())
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteId::Int(n) => write!(f, "{n}"),
            NoteId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for NoteId {
    fn from(n: i64) -> Self {
        NoteId::Int(n)
    }
}

impl From<i32> for NoteId {
    fn from(n: i32) -> Self {
        NoteId::Int(n.into())
    }
}

impl From<&str> for NoteId {
    fn from(s: &str) -> Self {
        NoteId::Text(s.to_string())
    }
}

impl From<String> for NoteId {
    fn from(s: String) -> Self {
        NoteId::Text(s)
    }
}

/// Parses command-line input: integers become `Int`, anything else `Text`.
impl FromStr for NoteId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map(NoteId::Int)
            .unwrap_or_else(|_| NoteId::Text(s.to_string())))
    }
}

/// Cached copy of a note as returned by the server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    /// Server-computed fields (timestamps etc.) kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Note {
    pub fn new(id: impl Into<NoteId>, title: &str, content: &str) -> Self {
        Self {
            id: id.into(),
            title: title.to_string(),
            content: content.to_string(),
            extra: Map::new(),
        }
    }
}

/// Servers with optional text columns send `null` for an empty body.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Request body for create and update.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteInput {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl NoteInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: String::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }
}
