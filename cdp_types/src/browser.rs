use serde::{Deserialize, Serialize};

/// Identifies an independent browser context (an "incognito profile").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct BrowserContextId(String);

impl BrowserContextId {
    pub const IDENTIFIER: &'static str = "Browser.BrowserContextID";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl AsRef<str> for BrowserContextId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
