use serde::{Deserialize, Serialize};

/// Unique frame identifier. Stable for the life of the frame; never reused
/// within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct FrameId(String);

impl FrameId {
    pub const IDENTIFIER: &'static str = "Page.FrameId";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn inner(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FrameId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for FrameId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<FrameId> for String {
    fn from(id: FrameId) -> Self {
        id.0
    }
}

impl std::fmt::Display for FrameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
