//! The root aggregate a caller attaches to one top-level target (§2 Page,
//! ~10%). A `Page` owns the main [`FrameSession`](crate::frame_session::FrameSession),
//! the worker sessions auto-attached under it, and the per-browser-context
//! configuration every FrameSession in its tree shares.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use cdp_protocol::page::DialogType;
use cdp_types::{BrowserContextId, FrameId, SessionId, TargetId};
use tokio::sync::broadcast;

use crate::config::{EmulationConfig, LifeCycleConfig, Timeouts};
use crate::element::ActionEngine;
use crate::error::Result;
use crate::frame::Frame;
use crate::frame_session::FrameSession;
use crate::metrics::MetricsSink;
use crate::session::{CommandSink, ConnectionState, Session};

/// The utility-world name every FrameSession in a tree creates isolated
/// worlds under (§4.1 step 6).
pub const UTILITY_WORLD_NAME: &str = "__cdp_session_engine_utility__";

/// A page-level bus event (§6 "Emitted events to Page").
#[derive(Debug, Clone)]
pub enum PageEvent {
    Load,
    DomContentLoaded,
    FrameNavigated { frame_id: FrameId, url: String },
    /// A script exception or a fatal FrameSession error, surfaced for the
    /// caller to observe rather than crashing the run (§7).
    Error(String),
    Crashed,
    /// Supplemented feature (§E): `Page.fileChooserOpened` routed to the bus
    /// instead of silently dropped.
    FileChooserOpened(FrameId),
}

/// The most recently opened JS dialog. Tracked for observability only; this
/// engine never auto-dismisses a dialog (§E).
#[derive(Debug, Clone)]
pub struct DialogInfo {
    pub url: String,
    pub message: String,
    pub kind: DialogType,
    pub default_prompt: Option<String>,
}

/// A worker target auto-attached under a page (§2).
#[derive(Debug, Clone)]
pub struct Worker {
    pub session_id: SessionId,
    pub target_id: TargetId,
    pub url: String,
}

/// Per-browser-context knobs a [`Page`] is constructed with. Distinct from
/// the per-session [`EmulationConfig`] every FrameSession applies on attach.
#[derive(Debug, Clone, Default)]
pub struct BrowserContextOptions {
    pub browser_context_id: Option<BrowserContextId>,
}

/// Collaborators shared, unchanged, across one Page's entire FrameSession
/// tree: the out-of-scope action engine, metrics sink, emulation/timeout/
/// lifecycle configuration, and the bus every FrameSession reports to.
/// Threaded down to children as a plain `Arc` clone rather than a parent
/// pointer, so a child FrameSession never needs to know its owning Page.
pub struct EngineShared {
    pub action_engine: Arc<dyn ActionEngine>,
    pub metrics: Arc<dyn MetricsSink>,
    pub emulation: EmulationConfig,
    pub timeouts: Timeouts,
    pub lifecycle: LifeCycleConfig,
    pub utility_world_name: &'static str,
    bus: broadcast::Sender<PageEvent>,
    workers: Mutex<HashMap<SessionId, Worker>>,
    last_dialog: Mutex<Option<DialogInfo>>,
}

impl EngineShared {
    pub fn new(
        action_engine: Arc<dyn ActionEngine>,
        metrics: Arc<dyn MetricsSink>,
        emulation: EmulationConfig,
        timeouts: Timeouts,
        lifecycle: LifeCycleConfig,
    ) -> Arc<Self> {
        let (bus, _rx) = broadcast::channel(256);
        Arc::new(Self {
            action_engine,
            metrics,
            emulation,
            timeouts,
            lifecycle,
            utility_world_name: UTILITY_WORLD_NAME,
            bus,
            workers: Mutex::new(HashMap::new()),
            last_dialog: Mutex::new(None),
        })
    }

    pub(crate) fn emit(&self, event: PageEvent) {
        let _ = self.bus.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PageEvent> {
        self.bus.subscribe()
    }

    pub(crate) fn register_worker(&self, worker: Worker) {
        self.workers.lock().unwrap().insert(worker.session_id.clone(), worker);
    }

    pub(crate) fn remove_worker(&self, session_id: &SessionId) {
        self.workers.lock().unwrap().remove(session_id);
    }

    pub fn workers(&self) -> Vec<Worker> {
        self.workers.lock().unwrap().values().cloned().collect()
    }

    pub(crate) fn set_last_dialog(&self, dialog: DialogInfo) {
        *self.last_dialog.lock().unwrap() = Some(dialog);
    }

    pub fn last_dialog(&self) -> Option<DialogInfo> {
        self.last_dialog.lock().unwrap().clone()
    }
}

/// Root aggregate a caller attaches to one top-level target.
pub struct Page {
    shared: Arc<EngineShared>,
    context_options: BrowserContextOptions,
    main_session: RwLock<Option<Arc<FrameSession>>>,
}

impl Page {
    pub fn new(shared: Arc<EngineShared>, context_options: BrowserContextOptions) -> Arc<Self> {
        Arc::new(Self {
            shared,
            context_options,
            main_session: RwLock::new(None),
        })
    }

    pub fn context_options(&self) -> &BrowserContextOptions {
        &self.context_options
    }

    pub fn events(&self) -> broadcast::Receiver<PageEvent> {
        self.shared.subscribe()
    }

    pub fn workers(&self) -> Vec<Worker> {
        self.shared.workers()
    }

    pub fn last_dialog(&self) -> Option<DialogInfo> {
        self.shared.last_dialog()
    }

    /// Attaches to `target_id` as this page's main frame, constructing the
    /// root FrameSession (§4.1 construction contract).
    pub async fn attach(
        self: &Arc<Self>,
        sink: Arc<dyn CommandSink>,
        connection: ConnectionState,
        target_id: TargetId,
        session_id: Option<SessionId>,
    ) -> Result<()> {
        let session = Arc::new(Session::new(target_id.clone(), session_id, sink, connection));
        let frame_session =
            FrameSession::attach(Arc::clone(&self.shared), session, None, target_id, true).await?;
        *self.main_session.write().unwrap() = Some(frame_session);
        Ok(())
    }

    pub fn main_frame(&self) -> Option<Arc<Frame>> {
        self.main_session
            .read()
            .unwrap()
            .as_ref()
            .and_then(|fs| fs.main_frame())
    }

    pub fn main_session(&self) -> Option<Arc<FrameSession>> {
        self.main_session.read().unwrap().clone()
    }

    pub fn is_crashed(&self) -> bool {
        self.main_session()
            .map(|fs| fs.session().is_crashed())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LifeCycleConfig, Timeouts};
    use crate::element::{Action, ActionOptions};
    use crate::error::Result as CdpResult;
    use crate::metrics::TracingMetricsSink;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::oneshot;

    struct NoopActionEngine;
    #[async_trait::async_trait]
    impl ActionEngine for NoopActionEngine {
        async fn perform(
            &self,
            _handle: &crate::element::ElementHandle,
            _action: Action,
            _options: ActionOptions,
        ) -> CdpResult<()> {
            Ok(())
        }
    }

    struct EmptyOkSink {
        last: StdMutex<Option<cdp_types::Request>>,
    }
    impl CommandSink for EmptyOkSink {
        fn submit(&self, request: cdp_types::Request, reply: oneshot::Sender<CdpResult<cdp_types::Response>>) {
            let id = request.id;
            let result = match &*request.method {
                "Browser.getWindowForTarget" => serde_json::json!({ "windowId": 1, "bounds": {} }),
                "Page.getFrameTree" => {
                    serde_json::json!({ "frameTree": { "frame": { "id": "main", "loaderId": "l1", "url": "about:blank" } } })
                }
                _ => serde_json::json!({}),
            };
            *self.last.lock().unwrap() = Some(request);
            let _ = reply.send(Ok(cdp_types::Response {
                id,
                result: Some(result),
                error: None,
            }));
        }

        fn submit_fire_and_forget(&self, request: cdp_types::Request) {
            *self.last.lock().unwrap() = Some(request);
        }
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

    #[test]
    fn page_starts_without_a_main_frame() {
        let page = Page::new(test_shared(), BrowserContextOptions::default());
        assert!(page.main_frame().is_none());
        assert!(page.main_session().is_none());
    }

    #[tokio::test]
    async fn attach_populates_the_main_session() {
        let page = Page::new(test_shared(), BrowserContextOptions::default());
        let sink = Arc::new(EmptyOkSink {
            last: StdMutex::new(None),
        });
        page.attach(
            sink,
            ConnectionState::new_connected(),
            TargetId::new("t1"),
            None,
        )
        .await
        .unwrap();
        assert!(page.main_session().is_some());
        assert!(page.main_frame().is_some());
    }
}
