//! The per-target construction contract, event-dispatch loop, and
//! target-attach router (§4.1 FrameSession, ~45%). This is where a raw CDP
//! target turns into a live, mirrored frame tree: every other collaborator
//! in this crate (`Frame`, `FrameManager`, `ExecutionContext`,
//! `NetworkManager`) is wired together here.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use cdp_protocol::browser::{Bounds, GetWindowForTargetParams, SetWindowBoundsParams, WindowId};
use cdp_protocol::dom::EnableParams as DomEnableParams;
use cdp_protocol::emulation::{
    MediaFeature, ScreenOrientation, ScreenOrientationType, SetDeviceMetricsOverrideParams,
    SetEmulatedMediaParams, SetFocusEmulationEnabledParams, SetGeolocationOverrideParams,
    SetLocaleOverrideParams, SetScriptExecutionDisabledParams, SetTimezoneOverrideParams,
    SetTouchEmulationEnabledParams, SetUserAgentOverrideParams,
};
use cdp_protocol::events::{CdpEvent, BASE_EVENTS, NETWORK_EVENTS, RENDERER_EVENTS};
use cdp_protocol::log::{EnableParams as LogEnableParams, LogEntry, LogEntryLevel};
use cdp_protocol::page::{
    AddScriptToEvaluateOnNewDocumentParams, CreateIsolatedWorldParams,
    EnableParams as PageEnableParams, EventLifecycleEvent, GetFrameTreeParams,
    SetBypassCspParams, SetLifecycleEventsEnabledParams,
};
use cdp_protocol::runtime::{
    ConsoleApiType, EnableParams as RuntimeEnableParams, EventConsoleApiCalled,
    EventExecutionContextCreated, ExecutionContextDescription, RunIfWaitingForDebuggerParams,
};
use cdp_protocol::security::SetIgnoreCertificateErrorsParams;
use cdp_protocol::target::{
    DetachFromTargetParams, EventAttachedToTarget, EventDetachedFromTarget, SetAutoAttachParams,
    TargetInfo,
};
use cdp_types::{CommandResponse, ExecutionContextId, FrameId, SessionId, TargetId};
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;

use crate::context::{ExecutionContext, World};
use crate::error::{CdpError, Result};
use crate::frame::{Frame, FrameContext, FrameManager};
use crate::metrics::{MetricName, Sample};
use crate::network::NetworkManager;
use crate::page::{DialogInfo, EngineShared, PageEvent, Worker};
use crate::session::{CommandSink, Session};

/// A cooperative, clone-cheap cancellation flag. Each `FrameSession`'s event
/// loop selects on it alongside its event channels, and the target-attach
/// router cancels a child's the moment its target detaches (§4.1, §7).
#[derive(Clone)]
struct CancelToken {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancelToken {
    fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        }
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    async fn cancelled(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// One live target attachment: a frame tree, its execution contexts, its
/// network configuration, and (for an iframe or an out-of-process subframe)
/// the child FrameSessions spawned under it.
pub struct FrameSession {
    shared: Arc<EngineShared>,
    session: Arc<Session>,
    frames: Arc<FrameManager>,
    network: Arc<NetworkManager>,
    target_id: TargetId,
    is_main_frame: bool,
    window_id: RwLock<Option<WindowId>>,
    children: Mutex<HashMap<FrameId, Arc<FrameSession>>>,
    children_by_session: Mutex<HashMap<SessionId, FrameId>>,
    /// contextId -> (owning frame, world), so a destroy/clear event can find
    /// the right slot to clear without re-deriving it from aux data (§4.1).
    contexts: Mutex<HashMap<ExecutionContextId, (FrameId, World)>>,
    /// Isolated-world registry (§3): world names already created via an
    /// `isolated`-typed execution context, tracked idempotently.
    isolated_worlds: Mutex<HashSet<String>>,
    cancel: CancelToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl FrameSession {
    /// The construction contract (§4.1): enable domains, seed the frame
    /// tree, apply emulation, then start the event-dispatch loop. Returns
    /// once the session is fully live; the loop itself keeps running on a
    /// spawned task until `cancel` fires or its event channels close.
    pub async fn attach(
        shared: Arc<EngineShared>,
        session: Arc<Session>,
        parent: Option<Arc<FrameSession>>,
        target_id: TargetId,
        is_main_frame: bool,
    ) -> Result<Arc<Self>> {
        let network = match &parent {
            Some(parent) => NetworkManager::inherit(Arc::clone(&session), &parent.network),
            None => NetworkManager::new(Arc::clone(&session)),
        };
        network.enable().await?;

        // A non-main target (e.g. an iframe target that never owns its own
        // browser window) can legitimately fail this lookup; only a
        // transport-level failure is fatal here.
        let window_id = match session.execute(GetWindowForTargetParams::new(target_id.clone())).await {
            Ok(resp) => Some(resp.result.window_id),
            Err(CdpError::Ws(_)) => return Err(CdpError::Ws("failed to resolve window for target".into())),
            Err(_) => None,
        };

        let base_rx = session.subscribe(BASE_EVENTS);
        let renderer_rx = session.subscribe(RENDERER_EVENTS);
        let network_rx = session.subscribe(NETWORK_EVENTS);

        let frame_ctx = Arc::new(FrameContext {
            session: Arc::clone(&session),
            action_engine: Arc::clone(&shared.action_engine),
            lifecycle: shared.lifecycle,
            timeouts: shared.timeouts,
            utility_world_name: shared.utility_world_name,
        });
        let frames = Arc::new(FrameManager::new(frame_ctx));

        session.execute(PageEnableParams::default()).await?;
        session.execute(DomEnableParams::default()).await?;
        session.execute(LogEnableParams::default()).await?;
        session.execute(RuntimeEnableParams::default()).await?;
        session.execute_fire_and_forget(SetAutoAttachParams::new(true, true, true))?;

        let tree = session.execute(GetFrameTreeParams::default()).await?;
        frames.seed_from_tree(&tree.result.frame_tree);

        session.execute(SetLifecycleEventsEnabledParams::new(true)).await?;
        for frame in frames.frames() {
            let _ = session.execute_fire_and_forget(CreateIsolatedWorldParams::new(
                frame.id().clone(),
                shared.utility_world_name,
                true,
            ));
        }
        session
            .execute(
                AddScriptToEvaluateOnNewDocumentParams::new("//".to_string())
                    .with_world_name(shared.utility_world_name),
            )
            .await?;

        let frame_session = Arc::new(Self {
            shared,
            session: Arc::clone(&session),
            frames,
            network,
            target_id,
            is_main_frame,
            window_id: RwLock::new(window_id),
            children: Mutex::new(HashMap::new()),
            children_by_session: Mutex::new(HashMap::new()),
            contexts: Mutex::new(HashMap::new()),
            isolated_worlds: Mutex::new(HashSet::new()),
            cancel: CancelToken::new(),
            task: Mutex::new(None),
        });

        frame_session.apply_emulation().await?;
        session.execute(RunIfWaitingForDebuggerParams::default()).await?;

        let task_handle =
            tokio::spawn(Arc::clone(&frame_session).event_loop(base_rx, renderer_rx, network_rx));
        *frame_session.task.lock().unwrap() = Some(task_handle);

        Ok(frame_session)
    }

    pub fn target_id(&self) -> &TargetId {
        &self.target_id
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn frames(&self) -> &Arc<FrameManager> {
        &self.frames
    }

    pub fn main_frame(&self) -> Option<Arc<Frame>> {
        self.frames.main_frame()
    }

    pub fn is_main_frame(&self) -> bool {
        self.is_main_frame
    }

    pub fn children(&self) -> Vec<Arc<FrameSession>> {
        self.children.lock().unwrap().values().cloned().collect()
    }

    /// Ends this session's event loop. Called on the owning target's
    /// `Target.detachedFromTarget` and on a parent's own teardown.
    pub fn cancel(&self) {
        self.cancel.cancel();
        for child in self.children() {
            child.cancel();
        }
    }

    // ---- §4.1 step 7: per-session emulation, in the listed order ----

    async fn apply_emulation(&self) -> Result<()> {
        let emulation = &self.shared.emulation;

        if self.is_main_frame {
            self.session
                .execute(SetFocusEmulationEnabledParams { enabled: true })
                .await?;
            self.session
                .execute(SetDeviceMetricsOverrideParams {
                    width: emulation.viewport.width.max(0) as u32,
                    height: emulation.viewport.height.max(0) as u32,
                    device_scale_factor: emulation.viewport.device_scale_factor,
                    mobile: emulation.viewport.is_mobile,
                    screen_orientation: Some(ScreenOrientation::new(
                        if emulation.viewport.is_landscape {
                            ScreenOrientationType::LandscapePrimary
                        } else {
                            ScreenOrientationType::PortraitPrimary
                        },
                        0,
                    )),
                })
                .await?;
            if let Some(window_id) = *self.window_id.read().unwrap() {
                let bounds = Bounds {
                    width: Some(emulation.viewport.width),
                    height: Some(emulation.viewport.height),
                    ..Bounds::default()
                };
                self.session
                    .execute(SetWindowBoundsParams::new(window_id, bounds))
                    .await?;
            }
        }

        if emulation.bypass_csp {
            self.session.execute(SetBypassCspParams::new(true)).await?;
        }
        if emulation.ignore_https_errors {
            self.session
                .execute(SetIgnoreCertificateErrorsParams::new(true))
                .await?;
        }
        if emulation.viewport.has_touch {
            self.session
                .execute(SetTouchEmulationEnabledParams { enabled: true })
                .await?;
        }
        if emulation.disable_javascript {
            self.session
                .execute(SetScriptExecutionDisabledParams { value: true })
                .await?;
        }
        if let Some(user_agent) = &emulation.user_agent {
            let mut params = SetUserAgentOverrideParams::new(user_agent.clone());
            if let Some(lang) = &emulation.accept_language {
                params = params.with_accept_language(lang.clone());
            }
            self.session.execute(params).await?;
        }
        if let Some(locale) = &emulation.locale {
            let result = self.session.execute(SetLocaleOverrideParams::new(locale.clone())).await;
            self.tolerate_already_in_effect(result)?;
        }
        if let Some(timezone) = &emulation.timezone_id {
            let result = self
                .session
                .execute(SetTimezoneOverrideParams::new(timezone.clone()))
                .await;
            self.tolerate_already_in_effect(result)?;
        }
        if let Some(geo) = emulation.geolocation {
            self.session
                .execute(SetGeolocationOverrideParams {
                    latitude: Some(geo.latitude),
                    longitude: Some(geo.longitude),
                    accuracy: Some(geo.accuracy),
                })
                .await?;
        }

        // Unconditional from here: applied regardless of configuration so a
        // freshly attached child session matches its parent's network state.
        self.network
            .set_extra_http_headers(emulation.extra_http_headers.clone())
            .await?;
        self.network
            .set_request_interception(emulation.request_interception)
            .await?;
        self.network.set_offline_mode(emulation.offline).await?;
        if let Some(credentials) = emulation.credentials.clone() {
            self.network.authenticate(credentials).await?;
        }
        let features = emulation
            .emulated_media
            .iter()
            .map(|(name, value)| MediaFeature {
                name: name.clone(),
                value: value.clone(),
            })
            .collect();
        self.session
            .execute(SetEmulatedMediaParams {
                media: None,
                features: Some(features),
            })
            .await?;

        Ok(())
    }

    /// Treats a Chrome "already in effect" protocol error as success (§7,
    /// §E); anything else still propagates.
    fn tolerate_already_in_effect<T: std::fmt::Debug>(&self, result: Result<CommandResponse<T>>) -> Result<()> {
        match result {
            Ok(_) => Ok(()),
            Err(CdpError::Chrome(err)) if err.is_already_in_effect() => Ok(()),
            Err(err) => Err(err),
        }
    }

    // ---- event-dispatch loop (§4.1, §4.3) ----

    async fn event_loop(
        self: Arc<Self>,
        mut base_rx: mpsc::UnboundedReceiver<CdpEvent>,
        mut renderer_rx: mpsc::UnboundedReceiver<CdpEvent>,
        mut network_rx: mpsc::UnboundedReceiver<CdpEvent>,
    ) {
        loop {
            let event = tokio::select! {
                _ = self.cancel.cancelled() => break,
                event = base_rx.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
                event = renderer_rx.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
                event = network_rx.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
            };
            self.handle_event(event).await;
            if self.cancel.is_cancelled() {
                break;
            }
        }
    }

    async fn handle_event(self: &Arc<Self>, event: CdpEvent) {
        match event {
            CdpEvent::TargetCrashed(_) => {
                self.session.mark_as_crashed();
                self.shared.emit(PageEvent::Crashed);
                self.cancel.cancel();
            }
            CdpEvent::LogEntryAdded(event) => self.handle_log_entry(event.entry),
            CdpEvent::FileChooserOpened(event) => {
                self.shared.emit(PageEvent::FileChooserOpened(event.frame_id));
            }
            CdpEvent::FrameAttached(event) => {
                self.frames.on_frame_attached(event.frame_id, event.parent_frame_id);
            }
            CdpEvent::FrameDetached(event) => self.frames.on_frame_detached(event.frame_id),
            CdpEvent::FrameNavigated(event) => self.handle_frame_navigated(event.frame),
            CdpEvent::FrameRequestedNavigation(event) => {
                self.frames
                    .on_frame_requested_navigation(event.frame_id, event.disposition, event.url);
            }
            CdpEvent::FrameStartedLoading(event) => self.frames.on_frame_started_loading(event.frame_id),
            CdpEvent::FrameStoppedLoading(event) => self.frames.on_frame_stopped_loading(event.frame_id),
            CdpEvent::JavascriptDialogOpening(event) => self.shared.set_last_dialog(DialogInfo {
                url: event.url,
                message: event.message,
                kind: event.kind,
                default_prompt: event.default_prompt,
            }),
            CdpEvent::LifecycleEvent(event) => self.handle_lifecycle_event(event),
            CdpEvent::NavigatedWithinDocument(event) => self
                .frames
                .on_navigated_within_document(event.frame_id, event.url),
            CdpEvent::ConsoleApiCalled(event) => self.handle_console_api(event),
            CdpEvent::ExceptionThrown(event) => {
                self.shared.emit(PageEvent::Error(event.exception_details.text));
            }
            CdpEvent::ExecutionContextCreated(event) => self.handle_context_created(event),
            CdpEvent::ExecutionContextDestroyed(event) => {
                self.handle_context_destroyed(event.execution_context_id)
            }
            CdpEvent::ExecutionContextsCleared(_) => self.handle_contexts_cleared(),
            CdpEvent::AttachedToTarget(event) => self.handle_attached_to_target(event).await,
            CdpEvent::DetachedFromTarget(event) => self.handle_detached_from_target(event),
            CdpEvent::RequestWillBeSent(event) => self.network.on_request_will_be_sent(&self.frames, event),
            CdpEvent::LoadingFinished(event) => self.network.on_loading_finished(&self.frames, event),
            CdpEvent::LoadingFailed(event) => self.network.on_loading_failed(&self.frames, event),
        }
    }

    fn handle_frame_navigated(&self, frame: cdp_protocol::page::Frame) {
        let frame_id = frame.id.clone();
        let url = frame.url.clone();
        self.frames.on_frame_navigated(frame, false);
        let is_main = self
            .frames
            .main_frame()
            .map(|main| main.id() == &frame_id)
            .unwrap_or(false);
        if is_main {
            self.shared.emit(PageEvent::FrameNavigated { frame_id, url });
        }
    }

    /// Bridges `Page.lifecycleEvent` into the frame's lifecycle bits, the
    /// duration-sample metrics, and (for the main frame) the page bus (§3,
    /// §4.1, §6).
    fn handle_lifecycle_event(&self, event: EventLifecycleEvent) {
        let EventLifecycleEvent { frame_id, name, .. } = event;

        if name == "init" || name == "commit" {
            if let Some(frame) = self.frames.frame(&frame_id) {
                frame.mark_loading_started();
            }
        }

        self.frames.on_lifecycle_event(frame_id.clone(), &name);

        let frame = self.frames.frame(&frame_id);
        if let (Some(metric), Some(frame)) = (MetricName::for_lifecycle_event(&name), &frame) {
            if let Some(duration) = frame.loading_elapsed() {
                self.shared.metrics.emit(Sample {
                    name: metric,
                    duration,
                    tags: Vec::new(),
                    url: Some(frame.url()),
                });
            }
        }

        let is_main = self
            .frames
            .main_frame()
            .map(|main| main.id() == &frame_id)
            .unwrap_or(false);
        if is_main {
            match name.as_str() {
                "load" => self.shared.emit(PageEvent::Load),
                "DOMContentLoaded" => self.shared.emit(PageEvent::DomContentLoaded),
                _ => {}
            }
        }
    }

    fn handle_console_api(&self, event: EventConsoleApiCalled) {
        let text = event
            .args
            .iter()
            .map(|arg| {
                arg.description
                    .clone()
                    .or_else(|| arg.value.as_ref().map(|v| v.to_string()))
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join(" ");
        match event.kind {
            ConsoleApiType::Error | ConsoleApiType::Assert => tracing::error!(target: "console", "{text}"),
            ConsoleApiType::Warning => tracing::warn!(target: "console", "{text}"),
            ConsoleApiType::Debug | ConsoleApiType::Trace => tracing::debug!(target: "console", "{text}"),
            _ => tracing::info!(target: "console", "{text}"),
        }
    }

    fn handle_log_entry(&self, entry: LogEntry) {
        match entry.level {
            LogEntryLevel::Info => tracing::info!(target: "browser", source = %entry.source, "{}", entry.text),
            LogEntryLevel::Warning => tracing::warn!(target: "browser", source = %entry.source, "{}", entry.text),
            LogEntryLevel::Error => tracing::error!(target: "browser", source = %entry.source, "{}", entry.text),
            LogEntryLevel::Verbose => tracing::debug!(target: "browser", source = %entry.source, "{}", entry.text),
        }
    }

    // ---- execution context lifecycle (§4.1) ----

    fn handle_context_created(&self, event: EventExecutionContextCreated) {
        let ExecutionContextDescription { id, name, aux_data, .. } = event.context;
        let Some(aux_data) = aux_data else { return };
        let Some(frame_id) = aux_data
            .get("frameId")
            .and_then(|v| v.as_str())
            .map(FrameId::new)
        else {
            return;
        };
        let Some(frame) = self.frames.frame(&frame_id) else { return };

        let is_default = aux_data.get("isDefault").and_then(|v| v.as_bool()).unwrap_or(false);
        let world = if is_default {
            World::Main
        } else if name == self.shared.utility_world_name {
            World::Utility
        } else {
            World::None
        };

        // §3/§4.1: a context whose aux data names an `isolated` type records
        // its world name in the session's isolated-world set, idempotently,
        // regardless of whether it ends up occupying a frame's world slot.
        if aux_data.get("type").and_then(|v| v.as_str()) == Some("isolated") {
            self.isolated_worlds.lock().unwrap().insert(name.clone());
        }

        // An unassigned context (world == None) still gets a context object
        // and a map entry, so a later destroy event can find it (§4.1 line
        // 97); it just never occupies a frame's main/utility slot.
        let context = Arc::new(ExecutionContext::new(id, frame_id.clone(), world, Arc::clone(&self.session)));
        if !matches!(world, World::None) {
            frame.set_context(world, context);
        }
        self.contexts.lock().unwrap().insert(id, (frame_id, world));
    }

    /// The set of isolated-world names created so far (§3, §8 invariant at
    /// spec.md line 217).
    pub fn isolated_worlds(&self) -> HashSet<String> {
        self.isolated_worlds.lock().unwrap().clone()
    }

    fn handle_context_destroyed(&self, id: ExecutionContextId) {
        if let Some((frame_id, world)) = self.contexts.lock().unwrap().remove(&id) {
            if let Some(frame) = self.frames.frame(&frame_id) {
                frame.clear_context_if(world, id);
            }
        }
    }

    fn handle_contexts_cleared(&self) {
        let entries: Vec<_> = self.contexts.lock().unwrap().drain().collect();
        let mut cleared = std::collections::HashSet::new();
        for (_, (frame_id, _)) in entries {
            if cleared.insert(frame_id.clone()) {
                if let Some(frame) = self.frames.frame(&frame_id) {
                    frame.clear_all_contexts();
                }
            }
        }
    }

    // ---- target-attach router (§4.1) ----

    async fn handle_attached_to_target(self: &Arc<Self>, event: EventAttachedToTarget) {
        let EventAttachedToTarget { session_id, target_info, .. } = event;
        match target_info.kind.as_str() {
            "iframe" => self.attach_child_frame(session_id, target_info).await,
            "worker" | "shared_worker" | "service_worker" => {
                self.shared.register_worker(Worker {
                    session_id,
                    target_id: target_info.target_id,
                    url: target_info.url,
                });
            }
            _ => self.detach_other(session_id),
        }
    }

    async fn attach_child_frame(self: &Arc<Self>, session_id: SessionId, target_info: TargetInfo) {
        let frame_id = FrameId::new(target_info.target_id.as_ref());
        let Some(frame) = self.frames.frame(&frame_id) else {
            return;
        };
        // An OOPIF takeover: the frame's previous same-process descendants
        // are gone once a dedicated target attaches for it (§4.1).
        for child in frame.children() {
            self.frames.remove_frame_recursively(&child);
        }

        let child_session = Arc::new(self.sibling_session(session_id.clone(), target_info.target_id.clone()));
        let result = FrameSession::attach(
            Arc::clone(&self.shared),
            child_session,
            Some(Arc::clone(self)),
            target_info.target_id,
            false,
        )
        .await;

        match result {
            Ok(child) => {
                self.children.lock().unwrap().insert(frame_id.clone(), Arc::clone(&child));
                self.children_by_session.lock().unwrap().insert(session_id, frame_id);
            }
            Err(err) => self.handle_child_attach_failure(err),
        }
    }

    /// §7 propagation policy: connection loss or an already-requested
    /// cancellation during a child's construction is expected and silent;
    /// anything else is a fatal condition the page should observe.
    fn handle_child_attach_failure(&self, err: CdpError) {
        if self.cancel.is_cancelled() || !self.session.connection().is_connected() {
            tracing::debug!(error = %err, "child frame session attach aborted");
            return;
        }
        tracing::error!(error = %err, "child frame session attach failed");
        self.shared.emit(PageEvent::Error(err.to_string()));
    }

    fn detach_other(&self, session_id: SessionId) {
        let other = self.sibling_session(session_id.clone(), self.target_id.clone());
        let _ = other.execute_fire_and_forget(RunIfWaitingForDebuggerParams::default());
        let _ = other.execute_fire_and_forget(DetachFromTargetParams::for_session(session_id));
    }

    fn sibling_session(&self, session_id: SessionId, target_id: TargetId) -> Session {
        Session::new(target_id, Some(session_id), self.session.sink(), self.session.connection().clone())
    }

    fn handle_detached_from_target(&self, event: EventDetachedFromTarget) {
        self.shared.remove_worker(&event.session_id);
        if let Some(frame_id) = self.children_by_session.lock().unwrap().remove(&event.session_id) {
            if let Some(child) = self.children.lock().unwrap().remove(&frame_id) {
                child.cancel();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EmulationConfig, LifeCycleConfig, Timeouts};
    use crate::element::{Action, ActionOptions, ActionEngine, ElementHandle};
    use crate::error::Result as CdpResult;
    use crate::metrics::TracingMetricsSink;
    use crate::session::ConnectionState;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::oneshot;

    struct NoopActionEngine;
    #[async_trait::async_trait]
    impl ActionEngine for NoopActionEngine {
        async fn perform(&self, _handle: &ElementHandle, _action: Action, _options: ActionOptions) -> CdpResult<()> {
            Ok(())
        }
    }

    /// Answers every command with an empty success object except the two
    /// the construction contract actually inspects.
    struct FakeSink {
        responses: StdMutex<HashMap<String, serde_json::Value>>,
    }

    impl FakeSink {
        fn new() -> Self {
            let mut responses = HashMap::new();
            responses.insert(
                "Browser.getWindowForTarget".to_string(),
                serde_json::json!({ "windowId": 7, "bounds": {} }),
            );
            responses.insert(
                "Page.getFrameTree".to_string(),
                serde_json::json!({
                    "frameTree": {
                        "frame": { "id": "main", "loaderId": "l1", "url": "about:blank" }
                    }
                }),
            );
            Self {
                responses: StdMutex::new(responses),
            }
        }
    }

    impl CommandSink for FakeSink {
        fn submit(&self, request: cdp_types::Request, reply: oneshot::Sender<CdpResult<cdp_types::Response>>) {
            let result = self
                .responses
                .lock()
                .unwrap()
                .get(&*request.method)
                .cloned()
                .unwrap_or_else(|| serde_json::json!({}));
            let _ = reply.send(Ok(cdp_types::Response {
                id: request.id,
                result: Some(result),
                error: None,
            }));
        }

        fn submit_fire_and_forget(&self, _request: cdp_types::Request) {}
    }

    fn test_shared() -> Arc<EngineShared> {
        EngineShared::new(
            Arc::new(NoopActionEngine),
            Arc::new(TracingMetricsSink),
            EmulationConfig::default(),
            Timeouts::default(),
            LifeCycleConfig::default(),
        )
    }

    #[tokio::test]
    async fn attach_seeds_the_main_frame_and_starts_the_loop() {
        let session = Arc::new(Session::new(
            TargetId::new("t1"),
            None,
            Arc::new(FakeSink::new()),
            ConnectionState::new_connected(),
        ));
        let fs = FrameSession::attach(test_shared(), session, None, TargetId::new("t1"), true)
            .await
            .unwrap();
        assert!(fs.is_main_frame());
        let main = fs.main_frame().unwrap();
        assert_eq!(main.url(), "about:blank");
        fs.cancel();
    }

    #[tokio::test]
    async fn lifecycle_event_sets_the_bit_on_the_seeded_frame() {
        let session = Arc::new(Session::new(
            TargetId::new("t1"),
            None,
            Arc::new(FakeSink::new()),
            ConnectionState::new_connected(),
        ));
        let fs = FrameSession::attach(test_shared(), session, None, TargetId::new("t1"), true)
            .await
            .unwrap();
        fs.handle_lifecycle_event(EventLifecycleEvent {
            frame_id: FrameId::new("main"),
            loader_id: cdp_protocol::network::LoaderId::new("l1"),
            name: "load".to_string(),
            timestamp: 0.0,
        });
        let main = fs.main_frame().unwrap();
        assert!(!main.has_context(World::Main));
        fs.cancel();
    }

    #[tokio::test]
    async fn isolated_world_is_recorded_and_survives_destruction() {
        let session = Arc::new(Session::new(
            TargetId::new("t1"),
            None,
            Arc::new(FakeSink::new()),
            ConnectionState::new_connected(),
        ));
        let fs = FrameSession::attach(test_shared(), session, None, TargetId::new("t1"), true)
            .await
            .unwrap();

        fs.handle_context_created(EventExecutionContextCreated {
            context: ExecutionContextDescription {
                id: ExecutionContextId::new(9),
                unique_id: "u-9".to_string(),
                name: "my-isolated-world".to_string(),
                aux_data: Some(serde_json::json!({ "frameId": "main", "isDefault": false, "type": "isolated" })),
            },
        });
        assert!(fs.isolated_worlds().contains("my-isolated-world"));

        fs.handle_context_destroyed(ExecutionContextId::new(9));
        // §8: destroying the context must not remove its world name from the
        // isolated-world set.
        assert!(fs.isolated_worlds().contains("my-isolated-world"));
        fs.cancel();
    }

    #[tokio::test]
    async fn unassigned_context_is_still_tracked_by_id() {
        let session = Arc::new(Session::new(
            TargetId::new("t1"),
            None,
            Arc::new(FakeSink::new()),
            ConnectionState::new_connected(),
        ));
        let fs = FrameSession::attach(test_shared(), session, None, TargetId::new("t1"), true)
            .await
            .unwrap();

        fs.handle_context_created(EventExecutionContextCreated {
            context: ExecutionContextDescription {
                id: ExecutionContextId::new(42),
                unique_id: "u-42".to_string(),
                name: "some-other-world".to_string(),
                aux_data: Some(serde_json::json!({ "frameId": "main", "isDefault": false })),
            },
        });
        assert!(fs.contexts.lock().unwrap().contains_key(&ExecutionContextId::new(42)));

        let main = fs.main_frame().unwrap();
        assert!(!main.has_context(World::Main));
        assert!(!main.has_context(World::Utility));

        fs.handle_context_destroyed(ExecutionContextId::new(42));
        assert!(!fs.contexts.lock().unwrap().contains_key(&ExecutionContextId::new(42)));
        fs.cancel();
    }
}
