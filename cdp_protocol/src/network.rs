//! `Network` domain: just enough to let `NetworkManager` track in-flight
//! requests per frame and apply header/offline/auth configuration. Full
//! request/response reconstruction is out of scope (§1).

use std::collections::BTreeMap;

use cdp_types::{Command, FrameId, Method};
use serde::{Deserialize, Serialize};

/// Identifier for the document loader backing a navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct LoaderId(String);

impl LoaderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl AsRef<str> for LoaderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Unique request identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EnableParams {}

impl EnableParams {
    pub const IDENTIFIER: &'static str = "Network.enable";
}
impl Method for EnableParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for EnableParams {
    type Response = super::page::EmptyReturns;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetExtraHttpHeadersParams {
    pub headers: BTreeMap<String, String>,
}
impl SetExtraHttpHeadersParams {
    pub const IDENTIFIER: &'static str = "Network.setExtraHTTPHeaders";

    pub fn new(headers: BTreeMap<String, String>) -> Self {
        Self { headers }
    }
}
impl Method for SetExtraHttpHeadersParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for SetExtraHttpHeadersParams {
    type Response = super::page::EmptyReturns;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetOfflineModeParams {
    pub offline: bool,
}
impl SetOfflineModeParams {
    pub const IDENTIFIER: &'static str = "Network.emulateNetworkConditions";

    pub fn new(offline: bool) -> Self {
        Self { offline }
    }
}
impl Method for SetOfflineModeParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for SetOfflineModeParams {
    type Response = super::page::EmptyReturns;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRequestInterceptionParams {
    pub enabled: bool,
}
impl SetRequestInterceptionParams {
    pub const IDENTIFIER: &'static str = "Network.setRequestInterception";

    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}
impl Method for SetRequestInterceptionParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for SetRequestInterceptionParams {
    type Response = super::page::EmptyReturns;
}

// Basic-auth credentials have no dedicated CDP command; the engine folds
// them into an `Authorization: Basic ...` header via `SetExtraHttpHeadersParams`
// (see the NetworkManager collaborator).

// ---- events that add/remove in-flight requests ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequestWillBeSent {
    pub request_id: RequestId,
    pub loader_id: LoaderId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<FrameId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLoadingFinished {
    pub request_id: RequestId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLoadingFailed {
    pub request_id: RequestId,
}

impl Method for EventRequestWillBeSent {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        "Network.requestWillBeSent".into()
    }
}
impl Method for EventLoadingFinished {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        "Network.loadingFinished".into()
    }
}
impl Method for EventLoadingFailed {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        "Network.loadingFailed".into()
    }
}
