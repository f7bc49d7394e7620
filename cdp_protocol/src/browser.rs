//! `Browser` domain: window bounds lookup/control.

use cdp_types::{Command, Method, TargetId};
use serde::{Deserialize, Serialize};

pub use cdp_types::BrowserContextId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct WindowId(i64);

impl WindowId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum WindowState {
    #[default]
    Normal,
    Minimized,
    Maximized,
    Fullscreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "windowState")]
    pub window_state: Option<WindowState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetWindowForTargetParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<TargetId>,
}
impl GetWindowForTargetParams {
    pub const IDENTIFIER: &'static str = "Browser.getWindowForTarget";

    pub fn new(target_id: TargetId) -> Self {
        Self {
            target_id: Some(target_id),
        }
    }
}
impl Method for GetWindowForTargetParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for GetWindowForTargetParams {
    type Response = GetWindowForTargetReturns;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetWindowForTargetReturns {
    pub window_id: WindowId,
    pub bounds: Bounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetWindowBoundsParams {
    pub window_id: WindowId,
    pub bounds: Bounds,
}
impl SetWindowBoundsParams {
    pub const IDENTIFIER: &'static str = "Browser.setWindowBounds";

    pub fn new(window_id: WindowId, bounds: Bounds) -> Self {
        Self { window_id, bounds }
    }
}
impl Method for SetWindowBoundsParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for SetWindowBoundsParams {
    type Response = super::page::EmptyReturns;
}
