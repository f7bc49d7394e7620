//! Maps the untyped `(method, params)` pairs CDP pushes onto the wire into a
//! closed, exhaustively-matchable enum. Per the design notes this replaces a
//! chained type-test dispatch with a single `match`, so adding an event is a
//! compile-time checked change rather than a silently-ignored miss.

use serde::Deserialize;

use crate::inspector::EventTargetCrashed;
use crate::log::EventEntryAdded;
use crate::network::{EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent};
use crate::page::{
    EventFileChooserOpened, EventFrameAttached, EventFrameDetached, EventFrameNavigated,
    EventFrameRequestedNavigation, EventFrameStartedLoading, EventFrameStoppedLoading,
    EventJavascriptDialogOpening, EventLifecycleEvent, EventNavigatedWithinDocument,
};
use crate::runtime::{
    EventConsoleApiCalled, EventExceptionThrown, EventExecutionContextCreated,
    EventExecutionContextDestroyed, EventExecutionContextsCleared,
};
use crate::target::{EventAttachedToTarget, EventDetachedFromTarget};

/// Every CDP event the engine consumes (§6), closed over a single enum.
#[derive(Debug, Clone)]
pub enum CdpEvent {
    TargetCrashed(EventTargetCrashed),
    LogEntryAdded(EventEntryAdded),
    FileChooserOpened(EventFileChooserOpened),
    FrameAttached(EventFrameAttached),
    FrameDetached(EventFrameDetached),
    FrameNavigated(EventFrameNavigated),
    FrameRequestedNavigation(EventFrameRequestedNavigation),
    FrameStartedLoading(EventFrameStartedLoading),
    FrameStoppedLoading(EventFrameStoppedLoading),
    JavascriptDialogOpening(EventJavascriptDialogOpening),
    LifecycleEvent(EventLifecycleEvent),
    NavigatedWithinDocument(EventNavigatedWithinDocument),
    ConsoleApiCalled(EventConsoleApiCalled),
    ExceptionThrown(EventExceptionThrown),
    ExecutionContextCreated(EventExecutionContextCreated),
    ExecutionContextDestroyed(EventExecutionContextDestroyed),
    ExecutionContextsCleared(EventExecutionContextsCleared),
    AttachedToTarget(EventAttachedToTarget),
    DetachedFromTarget(EventDetachedFromTarget),
    RequestWillBeSent(EventRequestWillBeSent),
    LoadingFinished(EventLoadingFinished),
    LoadingFailed(EventLoadingFailed),
}

/// Parses a raw `(method, params)` pair into a [`CdpEvent`]. Returns `None`
/// for any method the engine does not subscribe to, so callers can log and
/// drop unknown events instead of failing the session.
pub fn parse(method: &str, params: &serde_json::Value) -> Result<Option<CdpEvent>, serde_json::Error> {
    fn de<T: for<'de> Deserialize<'de>>(params: &serde_json::Value) -> Result<T, serde_json::Error> {
        serde_json::from_value(params.clone())
    }

    Ok(Some(match method {
        "Inspector.targetCrashed" => CdpEvent::TargetCrashed(de(params)?),
        "Log.entryAdded" => CdpEvent::LogEntryAdded(de(params)?),
        "Page.fileChooserOpened" => CdpEvent::FileChooserOpened(de(params)?),
        "Page.frameAttached" => CdpEvent::FrameAttached(de(params)?),
        "Page.frameDetached" => CdpEvent::FrameDetached(de(params)?),
        "Page.frameNavigated" => CdpEvent::FrameNavigated(de(params)?),
        "Page.frameRequestedNavigation" => CdpEvent::FrameRequestedNavigation(de(params)?),
        "Page.frameStartedLoading" => CdpEvent::FrameStartedLoading(de(params)?),
        "Page.frameStoppedLoading" => CdpEvent::FrameStoppedLoading(de(params)?),
        "Page.javascriptDialogOpening" => CdpEvent::JavascriptDialogOpening(de(params)?),
        "Page.lifecycleEvent" => CdpEvent::LifecycleEvent(de(params)?),
        "Page.navigatedWithinDocument" => CdpEvent::NavigatedWithinDocument(de(params)?),
        "Runtime.consoleAPICalled" => CdpEvent::ConsoleApiCalled(de(params)?),
        "Runtime.exceptionThrown" => CdpEvent::ExceptionThrown(de(params)?),
        "Runtime.executionContextCreated" => CdpEvent::ExecutionContextCreated(de(params)?),
        "Runtime.executionContextDestroyed" => CdpEvent::ExecutionContextDestroyed(de(params)?),
        "Runtime.executionContextsCleared" => CdpEvent::ExecutionContextsCleared(de(params)?),
        "Target.attachedToTarget" => CdpEvent::AttachedToTarget(de(params)?),
        "Target.detachedFromTarget" => CdpEvent::DetachedFromTarget(de(params)?),
        "Network.requestWillBeSent" => CdpEvent::RequestWillBeSent(de(params)?),
        "Network.loadingFinished" => CdpEvent::LoadingFinished(de(params)?),
        "Network.loadingFailed" => CdpEvent::LoadingFailed(de(params)?),
        _ => return Ok(None),
    }))
}

/// The renderer event set: subscribed to additionally for non-main-frame
/// sessions (§4.1 construction contract step 3).
pub const RENDERER_EVENTS: &[&str] = &[
    "Log.entryAdded",
    "Page.fileChooserOpened",
    "Page.frameAttached",
    "Page.frameDetached",
    "Page.frameNavigated",
    "Page.frameRequestedNavigation",
    "Page.frameStartedLoading",
    "Page.frameStoppedLoading",
    "Page.javascriptDialogOpening",
    "Page.lifecycleEvent",
    "Page.navigatedWithinDocument",
    "Runtime.consoleAPICalled",
    "Runtime.exceptionThrown",
    "Runtime.executionContextCreated",
    "Runtime.executionContextDestroyed",
    "Runtime.executionContextsCleared",
    "Target.attachedToTarget",
    "Target.detachedFromTarget",
];

/// The base event set: every session subscribes to these regardless of
/// whether it is the main frame.
pub const BASE_EVENTS: &[&str] = &["Inspector.targetCrashed"];

/// Network events, tracked by every session so its frames' in-flight-request
/// counts (and therefore the network-idle timer) stay accurate regardless of
/// which frame in the tree a request belongs to.
pub const NETWORK_EVENTS: &[&str] = &[
    "Network.requestWillBeSent",
    "Network.loadingFinished",
    "Network.loadingFailed",
];
