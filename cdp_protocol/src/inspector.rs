//! `Inspector` domain: just the crash notification.

use cdp_types::Method;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventTargetCrashed {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error_code: i64,
}

impl Method for EventTargetCrashed {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        "Inspector.targetCrashed".into()
    }
}
