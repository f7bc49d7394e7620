//! `Target` domain: auto-attach plumbing for iframes and workers.

use cdp_types::{Command, Method, SessionId, TargetId};
use serde::{Deserialize, Serialize};

use crate::browser::BrowserContextId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAutoAttachParams {
    pub auto_attach: bool,
    pub wait_for_debugger_on_start: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flatten: Option<bool>,
}
impl SetAutoAttachParams {
    pub const IDENTIFIER: &'static str = "Target.setAutoAttach";

    pub fn new(auto_attach: bool, wait_for_debugger_on_start: bool, flatten: bool) -> Self {
        Self {
            auto_attach,
            wait_for_debugger_on_start,
            flatten: Some(flatten),
        }
    }
}
impl Method for SetAutoAttachParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for SetAutoAttachParams {
    type Response = super::page::EmptyReturns;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetachFromTargetParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<TargetId>,
}
impl DetachFromTargetParams {
    pub const IDENTIFIER: &'static str = "Target.detachFromTarget";

    pub fn for_session(session_id: SessionId) -> Self {
        Self {
            session_id: Some(session_id),
            target_id: None,
        }
    }
}
impl Method for DetachFromTargetParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for DetachFromTargetParams {
    type Response = super::page::EmptyReturns;
}

/// Info about an attachable target, as carried by `attachedToTarget`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
    pub target_id: TargetId,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_context_id: Option<BrowserContextId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttachedToTarget {
    pub session_id: SessionId,
    pub target_info: TargetInfo,
    #[serde(default)]
    pub waiting_for_debugger: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetachedFromTarget {
    pub session_id: SessionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<TargetId>,
}

impl Method for EventAttachedToTarget {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        "Target.attachedToTarget".into()
    }
}
impl Method for EventDetachedFromTarget {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        "Target.detachedFromTarget".into()
    }
}
