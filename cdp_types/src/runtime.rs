use serde::{Deserialize, Serialize};

/// Id of a JavaScript execution context. Numeric, session-scoped; reused
/// across worlds only after the original context is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct ExecutionContextId(u32);

impl ExecutionContextId {
    pub const IDENTIFIER: &'static str = "Runtime.ExecutionContextId";

    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Unique object identifier for a remote JS object handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct RemoteObjectId(String);

impl RemoteObjectId {
    pub const IDENTIFIER: &'static str = "Runtime.RemoteObjectId";
}

impl AsRef<str> for RemoteObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
