//! `Page` domain: frame tree, navigation, lifecycle events, isolated worlds.

use cdp_types::{Command, FrameId, Method};
use serde::{Deserialize, Serialize};

use crate::network::LoaderId;

/// Information about the Frame on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub id: FrameId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<FrameId>,
    pub loader_id: LoaderId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_fragment: Option<String>,
}

/// Information about the Frame hierarchy along with their cached resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameTree {
    pub frame: Frame,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_frames: Option<Vec<FrameTree>>,
}

/// The type of a frameRequestedNavigation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FrameDisposition {
    CurrentTab,
    NewTab,
    NewWindow,
    Download,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EnableParams {}

impl EnableParams {
    pub const IDENTIFIER: &'static str = "Page.enable";
}
impl Method for EnableParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for EnableParams {
    type Response = EmptyReturns;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EmptyReturns {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GetFrameTreeParams {}

impl GetFrameTreeParams {
    pub const IDENTIFIER: &'static str = "Page.getFrameTree";
}
impl Method for GetFrameTreeParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for GetFrameTreeParams {
    type Response = GetFrameTreeReturns;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetFrameTreeReturns {
    pub frame_tree: FrameTree,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLifecycleEventsEnabledParams {
    pub enabled: bool,
}
impl SetLifecycleEventsEnabledParams {
    pub const IDENTIFIER: &'static str = "Page.setLifecycleEventsEnabled";

    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}
impl Method for SetLifecycleEventsEnabledParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for SetLifecycleEventsEnabledParams {
    type Response = EmptyReturns;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIsolatedWorldParams {
    pub frame_id: FrameId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grant_univeral_access: Option<bool>,
}
impl CreateIsolatedWorldParams {
    pub const IDENTIFIER: &'static str = "Page.createIsolatedWorld";

    pub fn new(frame_id: FrameId, world_name: impl Into<String>, grant_universal_access: bool) -> Self {
        Self {
            frame_id,
            world_name: Some(world_name.into()),
            grant_univeral_access: Some(grant_universal_access),
        }
    }
}
impl Method for CreateIsolatedWorldParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for CreateIsolatedWorldParams {
    type Response = CreateIsolatedWorldReturns;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIsolatedWorldReturns {
    pub execution_context_id: cdp_types::ExecutionContextId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddScriptToEvaluateOnNewDocumentParams {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world_name: Option<String>,
}
impl AddScriptToEvaluateOnNewDocumentParams {
    pub const IDENTIFIER: &'static str = "Page.addScriptToEvaluateOnNewDocument";

    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            world_name: None,
        }
    }

    pub fn with_world_name(mut self, world_name: impl Into<String>) -> Self {
        self.world_name = Some(world_name.into());
        self
    }
}
impl Method for AddScriptToEvaluateOnNewDocumentParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for AddScriptToEvaluateOnNewDocumentParams {
    type Response = AddScriptToEvaluateOnNewDocumentReturns;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddScriptToEvaluateOnNewDocumentReturns {
    pub identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateParams {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<FrameId>,
}
impl NavigateParams {
    pub const IDENTIFIER: &'static str = "Page.navigate";

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            referrer: None,
            frame_id: None,
        }
    }

    pub fn with_frame_id(mut self, frame_id: FrameId) -> Self {
        self.frame_id = Some(frame_id);
        self
    }

    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }
}
impl Method for NavigateParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for NavigateParams {
    type Response = NavigateReturns;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateReturns {
    pub frame_id: FrameId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loader_id: Option<LoaderId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetBypassCspParams {
    pub enabled: bool,
}
impl SetBypassCspParams {
    pub const IDENTIFIER: &'static str = "Page.setBypassCSP";

    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}
impl Method for SetBypassCspParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for SetBypassCspParams {
    type Response = EmptyReturns;
}

// ---- events ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFrameAttached {
    pub frame_id: FrameId,
    pub parent_frame_id: FrameId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFrameDetached {
    pub frame_id: FrameId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFrameNavigated {
    pub frame: Frame,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFrameRequestedNavigation {
    pub frame_id: FrameId,
    pub disposition: FrameDisposition,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFrameStartedLoading {
    pub frame_id: FrameId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFrameStoppedLoading {
    pub frame_id: FrameId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventNavigatedWithinDocument {
    pub frame_id: FrameId,
    pub url: String,
}

/// Fired for top level page lifecycle events such as navigation, load,
/// paint, etc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLifecycleEvent {
    pub frame_id: FrameId,
    pub loader_id: LoaderId,
    pub name: String,
    pub timestamp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DialogType {
    Alert,
    Confirm,
    Prompt,
    Beforeunload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventJavascriptDialogOpening {
    pub url: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: DialogType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFileChooserOpened {
    pub frame_id: FrameId,
}

impl Method for EventFrameAttached {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        "Page.frameAttached".into()
    }
}
impl Method for EventFrameDetached {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        "Page.frameDetached".into()
    }
}
impl Method for EventFrameNavigated {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        "Page.frameNavigated".into()
    }
}
impl Method for EventFrameRequestedNavigation {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        "Page.frameRequestedNavigation".into()
    }
}
impl Method for EventFrameStartedLoading {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        "Page.frameStartedLoading".into()
    }
}
impl Method for EventFrameStoppedLoading {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        "Page.frameStoppedLoading".into()
    }
}
impl Method for EventNavigatedWithinDocument {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        "Page.navigatedWithinDocument".into()
    }
}
impl Method for EventLifecycleEvent {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        "Page.lifecycleEvent".into()
    }
}
impl Method for EventJavascriptDialogOpening {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        "Page.javascriptDialogOpening".into()
    }
}
impl Method for EventFileChooserOpened {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        "Page.fileChooserOpened".into()
    }
}
