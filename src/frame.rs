//! The frame tree: identity, lifecycle aggregation, and the Public action API
//! (§3 Frame/FrameManager data model, §4.2 Frame, ~25%). `FrameManager` is
//! kept to the thin external-interface shape the design calls for; the
//! actual bookkeeping lives on `Frame` itself.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, Weak};
use std::time::{Duration, Instant};

use cdp_protocol::network::{LoaderId, RequestId};
use cdp_protocol::page::{Frame as CdpFrame, FrameDisposition, FrameTree};
use cdp_protocol::runtime::RemoteObject;
use cdp_types::FrameId;
use tokio::sync::{broadcast, mpsc, Notify};
use tokio::time::timeout as tokio_timeout;

use crate::config::{LifeCycleConfig, Timeouts};
use crate::context::{ExecutionContext, World};
use crate::element::{Action, ActionEngine, ActionOptions, ElementHandle};
use crate::error::{CdpError, DeadlineExceeded, Result};
use crate::session::Session;

/// The three lifecycle bits tracked per frame (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    DomContentLoaded,
    Load,
    NetworkIdle,
}

impl LifecycleEvent {
    pub const ALL: [LifecycleEvent; 3] = [
        LifecycleEvent::DomContentLoaded,
        LifecycleEvent::Load,
        LifecycleEvent::NetworkIdle,
    ];

    fn from_cdp_name(name: &str) -> Option<Self> {
        match name {
            "DOMContentLoaded" => Some(LifecycleEvent::DomContentLoaded),
            "load" => Some(LifecycleEvent::Load),
            "networkIdle" | "networkAlmostIdle" => Some(LifecycleEvent::NetworkIdle),
            _ => None,
        }
    }

    /// Maps the public `WaitForLoadState` argument.
    pub fn from_wait_state(state: &str) -> Option<Self> {
        match state {
            "load" => Some(LifecycleEvent::Load),
            "domcontentloaded" => Some(LifecycleEvent::DomContentLoaded),
            "networkidle" => Some(LifecycleEvent::NetworkIdle),
            _ => None,
        }
    }
}

/// `{documentId, optional originating request}` (§3).
#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub document_id: String,
    pub request: Option<RequestId>,
}

/// Frame-scoped bus events (§6 "Emitted events to Page", frame-scoped half).
#[derive(Debug, Clone)]
pub enum FrameEvent {
    AddLifecycle(LifecycleEvent),
    RemoveLifecycle(LifecycleEvent),
    Navigated(String),
    RequestedNavigation(String),
}

/// Which DOM presence `waitForSelector` is asked to wait for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomState {
    Attached,
    Detached,
    Visible,
    Hidden,
}

#[derive(Debug, Clone)]
pub struct WaitForSelectorOptions {
    pub state: DomState,
    pub strict: bool,
    pub timeout: Duration,
}

impl WaitForSelectorOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

impl Default for WaitForSelectorOptions {
    fn default() -> Self {
        Self {
            state: DomState::Attached,
            strict: false,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Shared, effectively-static collaborators every Frame in a FrameSession
/// needs: the CDP session to issue commands on, the out-of-scope action
/// engine, and the emulation/timeout configuration (§C).
pub struct FrameContext {
    pub session: Arc<Session>,
    pub action_engine: Arc<dyn ActionEngine>,
    pub lifecycle: LifeCycleConfig,
    pub timeouts: Timeouts,
    pub utility_world_name: &'static str,
}

pub struct Frame {
    ctx: Arc<FrameContext>,
    id: FrameId,
    parent: RwLock<Option<Weak<Frame>>>,
    children: RwLock<Vec<Arc<Frame>>>,
    url: RwLock<String>,
    name: RwLock<Option<String>>,
    loader_id: RwLock<Option<LoaderId>>,
    detached: AtomicBool,
    lifecycle_events: RwLock<HashMap<LifecycleEvent, bool>>,
    subtree_lifecycle_events: RwLock<HashMap<LifecycleEvent, bool>>,
    in_flight_requests: RwLock<HashSet<RequestId>>,
    main_world: RwLock<Option<Arc<ExecutionContext>>>,
    utility_world: RwLock<Option<Arc<ExecutionContext>>>,
    context_notify: Notify,
    current_document: RwLock<DocumentInfo>,
    pending_document: RwLock<Option<DocumentInfo>>,
    loading_started: RwLock<Option<Instant>>,
    cached_document: std::sync::Mutex<Option<ElementHandle>>,
    idle_reset: RwLock<Option<mpsc::Sender<()>>>,
    idle_timer_running: AtomicBool,
    events: broadcast::Sender<FrameEvent>,
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("id", &self.id)
            .field("url", &*self.url.read().unwrap())
            .field("detached", &self.detached.load(Ordering::Relaxed))
            .finish()
    }
}

impl Frame {
    fn new(ctx: Arc<FrameContext>, id: FrameId, parent: Option<&Arc<Frame>>) -> Self {
        let (tx, _rx) = broadcast::channel(64);
        let mut lifecycle_events = HashMap::new();
        let mut subtree = HashMap::new();
        for event in LifecycleEvent::ALL {
            lifecycle_events.insert(event, false);
            subtree.insert(event, false);
        }
        Self {
            ctx,
            id,
            parent: RwLock::new(parent.map(Arc::downgrade)),
            children: RwLock::new(Vec::new()),
            url: RwLock::new(String::new()),
            name: RwLock::new(None),
            loader_id: RwLock::new(None),
            detached: AtomicBool::new(false),
            lifecycle_events: RwLock::new(lifecycle_events),
            subtree_lifecycle_events: RwLock::new(subtree),
            in_flight_requests: RwLock::new(HashSet::new()),
            main_world: RwLock::new(None),
            utility_world: RwLock::new(None),
            context_notify: Notify::new(),
            current_document: RwLock::new(DocumentInfo::default()),
            pending_document: RwLock::new(None),
            loading_started: RwLock::new(None),
            cached_document: std::sync::Mutex::new(None),
            idle_reset: RwLock::new(None),
            idle_timer_running: AtomicBool::new(false),
            events: tx,
        }
    }

    pub fn new_root(ctx: Arc<FrameContext>, id: FrameId) -> Self {
        Self::new(ctx, id, None)
    }

    pub fn new_child(ctx: Arc<FrameContext>, id: FrameId, parent: &Arc<Frame>) -> Self {
        Self::new(ctx, id, Some(parent))
    }

    pub fn id(&self) -> &FrameId {
        &self.id
    }

    pub fn url(&self) -> String {
        self.url.read().unwrap().clone()
    }

    pub fn name(&self) -> Option<String> {
        self.name.read().unwrap().clone()
    }

    pub fn loader_id(&self) -> Option<LoaderId> {
        self.loader_id.read().unwrap().clone()
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::Acquire)
    }

    pub fn is_main_frame(&self) -> bool {
        self.parent.read().unwrap().is_none()
    }

    pub fn parent(&self) -> Option<Arc<Frame>> {
        self.parent.read().unwrap().as_ref().and_then(Weak::upgrade)
    }

    pub fn children(&self) -> Vec<Arc<Frame>> {
        self.children.read().unwrap().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FrameEvent> {
        self.events.subscribe()
    }

    pub(crate) fn set_url(&self, url: String) {
        *self.url.write().unwrap() = url;
    }

    pub(crate) fn set_name(&self, name: Option<String>) {
        *self.name.write().unwrap() = name;
    }

    pub(crate) fn set_loader_id(&self, loader_id: LoaderId) {
        *self.loader_id.write().unwrap() = Some(loader_id);
    }

    pub(crate) fn mark_loading_started(&self) {
        *self.loading_started.write().unwrap() = Some(Instant::now());
    }

    /// Time since the current navigation's `Page.frameStartedLoading`, used to
    /// turn a `Page.lifecycleEvent` into a duration sample (§6).
    pub(crate) fn loading_elapsed(&self) -> Option<Duration> {
        self.loading_started.read().unwrap().map(|start| start.elapsed())
    }

    pub(crate) fn notify_navigated(&self, url: String) {
        let _ = self.events.send(FrameEvent::Navigated(url));
    }

    pub(crate) fn notify_requested_navigation(&self, url: String) {
        let _ = self.events.send(FrameEvent::RequestedNavigation(url));
    }

    // ---- child-set discipline (§4.2) ----

    pub(crate) fn add_child_frame(&self, child: Arc<Frame>) {
        self.children.write().unwrap().push(child);
    }

    pub(crate) fn remove_child_frame(&self, child_id: &FrameId) {
        self.children.write().unwrap().retain(|c| c.id() != child_id);
    }

    /// Recursive operations on the subtree must never re-enter the same
    /// guard on the same frame; `visited` makes that defensive rather than
    /// assumed (the frame graph is a tree, so this is normally a no-op).
    pub fn recalculate_lifecycle(self: &Arc<Self>) {
        let mut visited = HashSet::new();
        self.recalculate_lifecycle_inner(&mut visited);
    }

    fn recalculate_lifecycle_inner(self: &Arc<Self>, visited: &mut HashSet<FrameId>) {
        if !visited.insert(self.id.clone()) {
            return;
        }
        let children = self.children();
        for child in &children {
            child.recalculate_lifecycle_inner(visited);
        }

        let mut new_subtree = self.lifecycle_events.read().unwrap().clone();
        for event in LifecycleEvent::ALL {
            if *new_subtree.get(&event).unwrap_or(&false) {
                for child in &children {
                    let child_has_it = *child
                        .subtree_lifecycle_events
                        .read()
                        .unwrap()
                        .get(&event)
                        .unwrap_or(&false);
                    if !child_has_it {
                        new_subtree.insert(event, false);
                        break;
                    }
                }
            }
        }

        // §9: never emit while holding the lifecycle mutex — collect the
        // diff, release the lock, then broadcast.
        let mut pending = Vec::new();
        {
            let mut prior = self.subtree_lifecycle_events.write().unwrap();
            for event in LifecycleEvent::ALL {
                let was = *prior.get(&event).unwrap_or(&false);
                let now = *new_subtree.get(&event).unwrap_or(&false);
                if now && !was {
                    pending.push(FrameEvent::AddLifecycle(event));
                } else if was && !now {
                    pending.push(FrameEvent::RemoveLifecycle(event));
                }
            }
            *prior = new_subtree;
        }
        for event in pending {
            let _ = self.events.send(event);
        }
    }

    pub(crate) fn set_lifecycle(&self, event: LifecycleEvent, value: bool) {
        self.lifecycle_events.write().unwrap().insert(event, value);
    }

    /// Called on navigation commit (§4.2).
    pub fn clear_lifecycle(self: &Arc<Self>, root: &Arc<Frame>) {
        {
            let mut events = self.lifecycle_events.write().unwrap();
            for event in LifecycleEvent::ALL {
                events.insert(event, false);
            }
        }
        root.recalculate_lifecycle();

        let keep = self.current_document.read().unwrap().request.clone();
        {
            let mut in_flight = self.in_flight_requests.write().unwrap();
            match keep {
                Some(id) => in_flight.retain(|r| *r == id),
                None => in_flight.clear(),
            }
        }
        self.stop_network_idle_timer();
        if self.in_flight_requests.read().unwrap().is_empty() {
            self.start_network_idle_timer();
        }
    }

    pub(crate) fn commit_navigation(&self, document: DocumentInfo) {
        *self.current_document.write().unwrap() = document;
        *self.pending_document.write().unwrap() = None;
    }

    pub(crate) fn set_pending_navigation(&self, document: DocumentInfo) {
        *self.pending_document.write().unwrap() = Some(document);
    }

    pub fn mark_document_request(&self, request_id: RequestId) {
        let mut current = self.current_document.write().unwrap();
        if current.request.is_none() {
            current.request = Some(request_id);
        }
    }

    // ---- in-flight requests / network-idle timer (§4.2) ----

    pub fn add_in_flight_request(&self, id: RequestId) {
        self.in_flight_requests.write().unwrap().insert(id);
        self.reset_network_idle_timer();
    }

    pub fn remove_in_flight_request(&self, id: &RequestId) {
        self.in_flight_requests.write().unwrap().remove(id);
        self.reset_network_idle_timer();
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight_requests.read().unwrap().len()
    }

    fn reset_network_idle_timer(&self) {
        if let Some(tx) = self.idle_reset.read().unwrap().as_ref() {
            let _ = tx.try_send(());
        }
    }

    /// At most one timer worker per frame; detached or already-running
    /// frames never start a second one (§4.2 invariant).
    fn start_network_idle_timer(self: &Arc<Self>) {
        if self.is_detached() {
            return;
        }
        if self.idle_timer_running.swap(true, Ordering::AcqRel) {
            return;
        }
        let (tx, mut rx) = mpsc::channel(1);
        *self.idle_reset.write().unwrap() = Some(tx);
        let frame = Arc::clone(self);
        let quiet = self.ctx.lifecycle.network_idle_timeout;
        tokio::spawn(async move {
            loop {
                match tokio_timeout(quiet, rx.recv()).await {
                    Ok(Some(())) => continue,
                    Ok(None) => break,
                    Err(_elapsed) => {
                        frame.set_lifecycle(LifecycleEvent::NetworkIdle, true);
                        if let Some(main) = frame.parent_chain_root() {
                            main.recalculate_lifecycle();
                        } else {
                            frame.recalculate_lifecycle();
                        }
                        break;
                    }
                }
            }
            frame.idle_timer_running.store(false, Ordering::Release);
            *frame.idle_reset.write().unwrap() = None;
        });
    }

    fn stop_network_idle_timer(&self) {
        *self.idle_reset.write().unwrap() = None;
    }

    fn parent_chain_root(self: &Arc<Self>) -> Option<Arc<Frame>> {
        let mut current = Arc::clone(self);
        loop {
            match current.parent() {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }
    }

    /// Detach stops the timer, disposes cached handles, and clears the
    /// parent link and execution contexts (§5 Resource release).
    pub(crate) fn detach(&self) {
        self.detached.store(true, Ordering::Release);
        self.stop_network_idle_timer();
        if let Some(handle) = self.cached_document.lock().unwrap().take() {
            handle.dispose();
        }
        *self.main_world.write().unwrap() = None;
        *self.utility_world.write().unwrap() = None;
        *self.parent.write().unwrap() = None;
        self.context_notify.notify_waiters();
    }

    // ---- execution context lifecycle (§4.1) ----

    /// First-writer-wins: returns `false` if a context already occupies the
    /// requested world slot.
    pub fn set_context(&self, world: World, context: Arc<ExecutionContext>) -> bool {
        let slot = match world {
            World::Main => &self.main_world,
            World::Utility => &self.utility_world,
            World::None => return false,
        };
        let mut guard = slot.write().unwrap();
        if guard.is_some() {
            return false;
        }
        *guard = Some(context);
        drop(guard);
        self.context_notify.notify_waiters();
        true
    }

    /// Clears the world slot iff it still holds `context_id` — a stale slot
    /// must not be cleared twice (§4.1).
    pub fn clear_context_if(&self, world: World, context_id: cdp_types::ExecutionContextId) {
        let slot = match world {
            World::Main => &self.main_world,
            World::Utility => &self.utility_world,
            World::None => return,
        };
        let mut guard = slot.write().unwrap();
        if guard.as_ref().map(|c| c.id()) == Some(context_id) {
            *guard = None;
        }
    }

    pub fn clear_all_contexts(&self) {
        *self.main_world.write().unwrap() = None;
        *self.utility_world.write().unwrap() = None;
        self.context_notify.notify_waiters();
    }

    pub fn has_context(&self, world: World) -> bool {
        match world {
            World::Main => self.main_world.read().unwrap().is_some(),
            World::Utility => self.utility_world.read().unwrap().is_some(),
            World::None => false,
        }
    }

    /// Replaces the 50 ms poll the spec describes with an explicit
    /// notify-on-`set_context` wait (§9 design note): returns as soon as the
    /// world is populated or the frame detaches.
    pub async fn wait_for_execution_context(&self, world: World) -> Result<Arc<ExecutionContext>> {
        loop {
            // Constructing the `Notified` future before re-checking state is
            // what makes this race-free: any notify that happens after this
            // line is guaranteed observed by the subsequent `.await`.
            let notified = self.context_notify.notified();
            if self.is_detached() {
                return Err(CdpError::Canceled);
            }
            let existing = match world {
                World::Main => self.main_world.read().unwrap().clone(),
                World::Utility => self.utility_world.read().unwrap().clone(),
                World::None => panic!("cannot wait for World::None"),
            };
            if let Some(ctx) = existing {
                return Ok(ctx);
            }
            notified.await;
        }
    }

    // ---- document handle (§4.2) ----

    pub async fn document(self: &Arc<Self>) -> Result<ElementHandle> {
        if let Some(handle) = self.cached_document.lock().unwrap().clone() {
            return Ok(handle);
        }
        let ctx = self.wait_for_execution_context(World::Main).await?;
        let remote = ctx.evaluate("document").await?;
        let object_id = remote.object_id.clone().ok_or(CdpError::NoResponse)?;
        let handle = ElementHandle::new(ctx, object_id);
        *self.cached_document.lock().unwrap() = Some(handle.clone());
        Ok(handle)
    }

    pub async fn set_content(self: &Arc<Self>, html: &str) -> Result<()> {
        let ctx = self.wait_for_execution_context(World::Utility).await?;
        let encoded = serde_json::to_string(html).expect("string serialization is infallible");
        let script = format!(
            "(() => {{ window.stop(); document.open(); document.write({encoded}); document.close(); }})()"
        );
        ctx.evaluate(script).await?;
        Ok(())
    }

    // ---- querying (§4.2 Query/QueryAll) ----

    pub async fn query(self: &Arc<Self>, selector: &str) -> Result<Option<ElementHandle>> {
        let ctx = self.wait_for_execution_context(World::Main).await?;
        let encoded = serde_json::to_string(selector).expect("string serialization is infallible");
        let remote = ctx.evaluate(format!("document.querySelector({encoded})")).await?;
        Ok(remote.object_id.map(|id| ElementHandle::new(ctx, id)))
    }

    pub async fn query_all(self: &Arc<Self>, selector: &str) -> Result<Vec<ElementHandle>> {
        let ctx = self.wait_for_execution_context(World::Main).await?;
        let encoded = serde_json::to_string(selector).expect("string serialization is infallible");
        let count = ctx
            .evaluate(format!("document.querySelectorAll({encoded}).length"))
            .await?
            .value
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        let mut handles = Vec::with_capacity(count as usize);
        for index in 0..count {
            let remote = ctx
                .evaluate(format!("document.querySelectorAll({encoded})[{index}]"))
                .await?;
            if let Some(object_id) = remote.object_id {
                handles.push(ElementHandle::new(ctx.clone(), object_id));
            }
        }
        Ok(handles)
    }

    pub async fn wait_for_selector(
        self: &Arc<Self>,
        selector: &str,
        options: &WaitForSelectorOptions,
    ) -> Result<Option<ElementHandle>> {
        let deadline = Instant::now() + options.timeout;
        loop {
            let found = self.query(selector).await?;
            let satisfied = match (&found, options.state) {
                (Some(_), DomState::Attached) => true,
                (None, DomState::Detached) => true,
                (None, DomState::Hidden) => true,
                (Some(handle), DomState::Visible) => handle.is_visible().await.unwrap_or(false),
                (Some(handle), DomState::Hidden) => handle.is_hidden().await.unwrap_or(false),
                _ => false,
            };
            if satisfied {
                return Ok(found);
            }
            if Instant::now() >= deadline {
                return Err(CdpError::Timeout(DeadlineExceeded::new(Instant::now(), deadline)));
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }

    async fn resolve_for_action(self: &Arc<Self>, selector: &str, timeout: Option<Duration>) -> Result<ElementHandle> {
        let options = WaitForSelectorOptions::with_timeout(timeout.unwrap_or(self.ctx.timeouts.default));
        self.wait_for_selector(selector, &options)
            .await?
            .ok_or(CdpError::NotAttachedToTarget)
    }

    /// `Is*` predicates pass a zero timeout to the inner resolve and turn a
    /// timeout into a negative result rather than a failure (§4.2).
    async fn resolve_for_state_read(self: &Arc<Self>, selector: &str) -> Option<ElementHandle> {
        let options = WaitForSelectorOptions::with_timeout(Duration::ZERO);
        match self.wait_for_selector(selector, &options).await {
            Ok(handle) => handle,
            Err(CdpError::Timeout(_)) => None,
            Err(_) => None,
        }
    }

    // ---- Public action API: actionability-driven verbs (§4.2) ----

    async fn act(self: &Arc<Self>, selector: &str, action: Action, options: ActionOptions) -> Result<()> {
        let handle = self.resolve_for_action(selector, options.timeout).await?;
        self.ctx.action_engine.perform(&handle, action, options).await
    }

    pub async fn click(self: &Arc<Self>, selector: &str, options: ActionOptions) -> Result<()> {
        self.act(selector, Action::Click, options).await
    }

    pub async fn dblclick(self: &Arc<Self>, selector: &str, options: ActionOptions) -> Result<()> {
        self.act(selector, Action::DblClick, options).await
    }

    pub async fn check(self: &Arc<Self>, selector: &str, options: ActionOptions) -> Result<()> {
        self.act(selector, Action::Check, options).await
    }

    pub async fn uncheck(self: &Arc<Self>, selector: &str, options: ActionOptions) -> Result<()> {
        self.act(selector, Action::Uncheck, options).await
    }

    pub async fn hover(self: &Arc<Self>, selector: &str, options: ActionOptions) -> Result<()> {
        self.act(selector, Action::Hover, options).await
    }

    pub async fn tap(self: &Arc<Self>, selector: &str, options: ActionOptions) -> Result<()> {
        self.act(selector, Action::Tap, options).await
    }

    pub async fn fill(self: &Arc<Self>, selector: &str, value: &str, options: ActionOptions) -> Result<()> {
        self.act(selector, Action::Fill(value.to_string()), options).await
    }

    pub async fn focus(self: &Arc<Self>, selector: &str, options: ActionOptions) -> Result<()> {
        self.act(selector, Action::Focus, options).await
    }

    pub async fn press(self: &Arc<Self>, selector: &str, key: &str, options: ActionOptions) -> Result<()> {
        self.act(selector, Action::Press(key.to_string()), options).await
    }

    pub async fn r#type(self: &Arc<Self>, selector: &str, text: &str, options: ActionOptions) -> Result<()> {
        self.act(selector, Action::Type(text.to_string()), options).await
    }

    pub async fn select_option(
        self: &Arc<Self>,
        selector: &str,
        values: Vec<String>,
        options: ActionOptions,
    ) -> Result<()> {
        self.act(selector, Action::SelectOption(values), options).await
    }

    pub async fn dispatch_event(self: &Arc<Self>, selector: &str, event_type: &str) -> Result<()> {
        let handle = self.resolve_for_action(selector, None).await?;
        handle.dispatch_event(event_type).await
    }

    // ---- Public action API: direct reads (§4.2) ----

    pub async fn get_attribute(self: &Arc<Self>, selector: &str, name: &str) -> Result<Option<String>> {
        self.resolve_for_action(selector, None).await?.get_attribute(name).await
    }

    pub async fn inner_html(self: &Arc<Self>, selector: &str) -> Result<String> {
        self.resolve_for_action(selector, None).await?.inner_html().await
    }

    pub async fn inner_text(self: &Arc<Self>, selector: &str) -> Result<String> {
        self.resolve_for_action(selector, None).await?.inner_text().await
    }

    pub async fn input_value(self: &Arc<Self>, selector: &str) -> Result<String> {
        self.resolve_for_action(selector, None).await?.input_value().await
    }

    pub async fn text_content(self: &Arc<Self>, selector: &str) -> Result<String> {
        self.resolve_for_action(selector, None).await?.text_content().await
    }

    pub async fn is_checked(self: &Arc<Self>, selector: &str) -> Result<bool> {
        match self.resolve_for_state_read(selector).await {
            Some(handle) => handle.is_checked().await,
            None => Ok(false),
        }
    }

    pub async fn is_disabled(self: &Arc<Self>, selector: &str) -> Result<bool> {
        match self.resolve_for_state_read(selector).await {
            Some(handle) => handle.is_disabled().await,
            None => Ok(false),
        }
    }

    pub async fn is_enabled(self: &Arc<Self>, selector: &str) -> Result<bool> {
        Ok(!self.is_disabled(selector).await?)
    }

    pub async fn is_editable(self: &Arc<Self>, selector: &str) -> Result<bool> {
        match self.resolve_for_state_read(selector).await {
            Some(handle) => handle.is_editable().await,
            None => Ok(false),
        }
    }

    pub async fn is_hidden(self: &Arc<Self>, selector: &str) -> Result<bool> {
        match self.resolve_for_state_read(selector).await {
            Some(handle) => handle.is_hidden().await,
            None => Ok(true),
        }
    }

    pub async fn is_visible(self: &Arc<Self>, selector: &str) -> Result<bool> {
        Ok(!self.is_hidden(selector).await?)
    }

    // ---- Public action API: frame-level (§4.2) ----

    pub async fn goto(self: &Arc<Self>, url: &str, referrer: Option<&str>, timeout: Option<Duration>) -> Result<()> {
        use cdp_protocol::page::NavigateParams;

        let mut params = NavigateParams::new(url).with_frame_id(self.id.clone());
        if let Some(referrer) = referrer {
            params = params.with_referrer(referrer);
        }
        let timeout = timeout.unwrap_or(self.ctx.timeouts.navigation);
        let deadline = Instant::now() + timeout;
        let resp = tokio_timeout(timeout, self.ctx.session.execute(params))
            .await
            .map_err(|_| CdpError::Timeout(DeadlineExceeded::new(Instant::now(), deadline)))??;
        if let Some(error_text) = &resp.result.error_text {
            tracing::warn!(url, error_text, "Page.navigate reported an error");
        }
        Ok(())
    }

    pub async fn wait_for_navigation(self: &Arc<Self>, timeout: Option<Duration>) -> Result<String> {
        let mut rx = self.subscribe();
        let timeout = timeout.unwrap_or(self.ctx.timeouts.navigation);
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(CdpError::Timeout(DeadlineExceeded::new(Instant::now(), deadline)));
            }
            match tokio_timeout(remaining, rx.recv()).await {
                Ok(Ok(FrameEvent::Navigated(url))) => return Ok(url),
                Ok(Ok(_)) => continue,
                Ok(Err(broadcast::error::RecvError::Lagged(_))) => continue,
                Ok(Err(broadcast::error::RecvError::Closed)) => return Err(CdpError::Canceled),
                Err(_) => return Err(CdpError::Timeout(DeadlineExceeded::new(Instant::now(), deadline))),
            }
        }
    }

    pub async fn wait_for_load_state(self: &Arc<Self>, state: &str, timeout: Option<Duration>) -> Result<()> {
        let event = LifecycleEvent::from_wait_state(state).unwrap_or(LifecycleEvent::Load);
        if *self.subtree_lifecycle_events.read().unwrap().get(&event).unwrap_or(&false) {
            return Ok(());
        }
        let mut rx = self.subscribe();
        let timeout = timeout.unwrap_or(self.ctx.timeouts.default);
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(CdpError::Timeout(DeadlineExceeded::new(Instant::now(), deadline)));
            }
            match tokio_timeout(remaining, rx.recv()).await {
                Ok(Ok(FrameEvent::AddLifecycle(e))) if e == event => return Ok(()),
                Ok(Ok(_)) => continue,
                Ok(Err(broadcast::error::RecvError::Lagged(_))) => continue,
                Ok(Err(broadcast::error::RecvError::Closed)) => return Err(CdpError::Canceled),
                Err(_) => return Err(CdpError::Timeout(DeadlineExceeded::new(Instant::now(), deadline))),
            }
        }
    }

    pub async fn wait_for_timeout(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    pub async fn wait_for_function(self: &Arc<Self>, expression: &str, timeout: Option<Duration>) -> Result<RemoteObject> {
        let ctx = self.wait_for_execution_context(World::Main).await?;
        let timeout = timeout.unwrap_or(self.ctx.timeouts.default);
        let deadline = Instant::now() + timeout;
        loop {
            let result = ctx.evaluate(expression).await?;
            let truthy = match &result.value {
                Some(serde_json::Value::Bool(value)) => *value,
                Some(serde_json::Value::Null) => false,
                Some(_) => true,
                None => result.object_id.is_some(),
            };
            if truthy {
                return Ok(result);
            }
            if Instant::now() >= deadline {
                return Err(CdpError::Timeout(DeadlineExceeded::new(Instant::now(), deadline)));
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }

    pub async fn evaluate(self: &Arc<Self>, expression: &str) -> Result<RemoteObject> {
        let ctx = self.wait_for_execution_context(World::Main).await?;
        ctx.evaluate(expression).await
    }

    pub async fn evaluate_handle(self: &Arc<Self>, expression: &str) -> Result<ElementHandle> {
        let ctx = self.wait_for_execution_context(World::Main).await?;
        let remote = ctx.evaluate(expression).await?;
        let object_id = remote.object_id.ok_or(CdpError::NoResponse)?;
        Ok(ElementHandle::new(ctx, object_id))
    }

    pub async fn title(self: &Arc<Self>) -> Result<String> {
        let result = self.evaluate("document.title").await?;
        Ok(result.value.and_then(|v| v.as_str().map(str::to_string)).unwrap_or_default())
    }

    /// Supplemented (§E): full serialized `outerHTML` via the utility world.
    pub async fn content(self: &Arc<Self>) -> Result<String> {
        let ctx = self.wait_for_execution_context(World::Utility).await?;
        let result = ctx.evaluate("document.documentElement.outerHTML").await?;
        Ok(result.value.and_then(|v| v.as_str().map(str::to_string)).unwrap_or_default())
    }

    pub async fn frame_element(self: &Arc<Self>) -> Result<Option<ElementHandle>> {
        let ctx = self.wait_for_execution_context(World::Main).await?;
        let remote = ctx.evaluate("window.frameElement").await?;
        Ok(remote.object_id.map(|id| ElementHandle::new(ctx, id)))
    }
}

/// Thin registry over the frame tree; the bookkeeping lives on [`Frame`]
/// itself (§4.2 notes FrameManager as an external-interface-only component).
pub struct FrameManager {
    ctx: Arc<FrameContext>,
    main_frame: RwLock<Option<Arc<Frame>>>,
    frames: RwLock<HashMap<FrameId, Arc<Frame>>>,
}

impl FrameManager {
    pub fn new(ctx: Arc<FrameContext>) -> Self {
        Self {
            ctx,
            main_frame: RwLock::new(None),
            frames: RwLock::new(HashMap::new()),
        }
    }

    pub fn main_frame(&self) -> Option<Arc<Frame>> {
        self.main_frame.read().unwrap().clone()
    }

    pub fn frame(&self, id: &FrameId) -> Option<Arc<Frame>> {
        self.frames.read().unwrap().get(id).cloned()
    }

    pub fn frames(&self) -> Vec<Arc<Frame>> {
        self.frames.read().unwrap().values().cloned().collect()
    }

    /// Seeds the tree from `Page.getFrameTree`'s response, walking
    /// depth-first (§4.1 construction contract step 5).
    pub fn seed_from_tree(&self, tree: &FrameTree) {
        self.seed_node(tree, None);
    }

    fn seed_node(&self, node: &FrameTree, parent_id: Option<FrameId>) {
        match &parent_id {
            Some(parent_id) => self.on_frame_attached(node.frame.id.clone(), parent_id.clone()),
            None => self.set_main_frame(node.frame.id.clone()),
        }
        self.on_frame_navigated(node.frame.clone(), true);
        if let Some(children) = &node.child_frames {
            for child in children {
                self.seed_node(child, Some(node.frame.id.clone()));
            }
        }
    }

    fn set_main_frame(&self, id: FrameId) {
        if self.frames.read().unwrap().contains_key(&id) {
            return;
        }
        let frame = Arc::new(Frame::new_root(Arc::clone(&self.ctx), id.clone()));
        self.frames.write().unwrap().insert(id, Arc::clone(&frame));
        *self.main_frame.write().unwrap() = Some(frame);
    }

    pub fn on_frame_attached(&self, frame_id: FrameId, parent_id: FrameId) {
        if self.frames.read().unwrap().contains_key(&frame_id) {
            return;
        }
        let Some(parent) = self.frame(&parent_id) else {
            return;
        };
        let frame = Arc::new(Frame::new_child(Arc::clone(&self.ctx), frame_id.clone(), &parent));
        parent.add_child_frame(Arc::clone(&frame));
        self.frames.write().unwrap().insert(frame_id, frame);
    }

    pub fn on_frame_detached(&self, frame_id: FrameId) {
        if let Some(frame) = self.frame(&frame_id) {
            self.remove_frame_recursively(&frame);
        }
    }

    /// Cross-process boundary cleanup (also used by the target-attach
    /// router when an iframe's descendants must be dropped, §4.1).
    pub fn remove_frame_recursively(&self, frame: &Arc<Frame>) {
        for child in frame.children() {
            self.remove_frame_recursively(&child);
        }
        if let Some(parent) = frame.parent() {
            parent.remove_child_frame(frame.id());
        }
        frame.detach();
        self.frames.write().unwrap().remove(frame.id());
    }

    pub fn on_frame_navigated(&self, frame: CdpFrame, initial: bool) {
        let Some(target) = self.frame(&frame.id) else {
            return;
        };
        target.set_url(frame.url.clone());
        target.set_name(frame.name.clone());
        target.set_loader_id(frame.loader_id.clone());
        let document = DocumentInfo {
            document_id: frame.loader_id.as_ref().to_string(),
            request: None,
        };
        target.commit_navigation(document);
        if let Some(main) = self.main_frame() {
            target.clear_lifecycle(&main);
        }
        if !initial {
            target.notify_navigated(frame.url);
        }
    }

    pub fn on_navigated_within_document(&self, frame_id: FrameId, url: String) {
        if let Some(frame) = self.frame(&frame_id) {
            frame.set_url(url.clone());
            frame.notify_navigated(url);
        }
    }

    pub fn on_frame_started_loading(&self, frame_id: FrameId) {
        if let Some(frame) = self.frame(&frame_id) {
            frame.mark_loading_started();
        }
    }

    /// §8 Laws: sets DOMContentLoaded, Load, and NetworkIdle simultaneously;
    /// idempotent if already set.
    pub fn on_frame_stopped_loading(&self, frame_id: FrameId) {
        if let Some(frame) = self.frame(&frame_id) {
            frame.set_lifecycle(LifecycleEvent::DomContentLoaded, true);
            frame.set_lifecycle(LifecycleEvent::Load, true);
            frame.set_lifecycle(LifecycleEvent::NetworkIdle, true);
            if let Some(main) = self.main_frame() {
                main.recalculate_lifecycle();
            }
        }
    }

    pub fn on_frame_requested_navigation(&self, frame_id: FrameId, disposition: FrameDisposition, url: String) {
        if disposition != FrameDisposition::CurrentTab {
            return;
        }
        if let Some(frame) = self.frame(&frame_id) {
            frame.notify_requested_navigation(url);
        }
    }

    pub fn on_lifecycle_event(&self, frame_id: FrameId, name: &str) {
        let Some(frame) = self.frame(&frame_id) else {
            return;
        };
        if let Some(event) = LifecycleEvent::from_cdp_name(name) {
            frame.set_lifecycle(event, true);
            if let Some(main) = self.main_frame() {
                main.recalculate_lifecycle();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ActionOptions;
    use std::sync::atomic::AtomicUsize;

    struct NoopActionEngine;
    #[async_trait::async_trait]
    impl ActionEngine for NoopActionEngine {
        async fn perform(&self, _handle: &ElementHandle, _action: Action, _options: ActionOptions) -> Result<()> {
            Ok(())
        }
    }

    struct EchoSink;
    impl crate::session::CommandSink for EchoSink {
        fn submit(&self, request: cdp_types::Request, reply: tokio::sync::oneshot::Sender<Result<cdp_types::Response>>) {
            let id = request.id;
            let _ = reply.send(Ok(cdp_types::Response {
                id,
                result: Some(serde_json::json!({})),
                error: None,
            }));
        }
        fn submit_fire_and_forget(&self, _request: cdp_types::Request) {}
    }

    fn test_ctx() -> Arc<FrameContext> {
        let session = Arc::new(Session::new(
            cdp_types::TargetId::new("t1"),
            None,
            Arc::new(EchoSink),
            crate::session::ConnectionState::new_connected(),
        ));
        Arc::new(FrameContext {
            session,
            action_engine: Arc::new(NoopActionEngine),
            lifecycle: LifeCycleConfig {
                network_idle_timeout: Duration::from_millis(20),
            },
            timeouts: Timeouts::default(),
            utility_world_name: "__engine_utility_world__",
        })
    }

    #[test]
    fn subtree_lifecycle_requires_all_children() {
        let ctx = test_ctx();
        let root = Arc::new(Frame::new_root(Arc::clone(&ctx), FrameId::new("root")));
        let child = Arc::new(Frame::new_child(Arc::clone(&ctx), FrameId::new("child"), &root));
        root.add_child_frame(Arc::clone(&child));

        root.set_lifecycle(LifecycleEvent::Load, true);
        root.recalculate_lifecycle();
        assert!(!*root.subtree_lifecycle_events.read().unwrap().get(&LifecycleEvent::Load).unwrap());

        child.set_lifecycle(LifecycleEvent::Load, true);
        root.recalculate_lifecycle();
        assert!(*root.subtree_lifecycle_events.read().unwrap().get(&LifecycleEvent::Load).unwrap());
    }

    #[test]
    fn detach_clears_contexts_and_parent() {
        let ctx = test_ctx();
        let root = Arc::new(Frame::new_root(Arc::clone(&ctx), FrameId::new("root")));
        let child = Arc::new(Frame::new_child(Arc::clone(&ctx), FrameId::new("child"), &root));
        assert!(child.parent().is_some());
        child.detach();
        assert!(child.is_detached());
        assert!(child.parent().is_none());
    }

    #[tokio::test]
    async fn wait_for_execution_context_unblocks_on_set_context() {
        let ctx = test_ctx();
        let frame = Arc::new(Frame::new_root(Arc::clone(&ctx), FrameId::new("root")));
        let frame2 = Arc::clone(&frame);
        let waiter = tokio::spawn(async move { frame2.wait_for_execution_context(World::Main).await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        let exec_ctx = Arc::new(ExecutionContext::new(
            cdp_types::ExecutionContextId::new(1),
            frame.id().clone(),
            World::Main,
            Arc::clone(&ctx.session),
        ));
        assert!(frame.set_context(World::Main, exec_ctx));

        let resolved = waiter.await.unwrap().unwrap();
        assert_eq!(resolved.world(), World::Main);
    }

    #[test]
    fn second_writer_to_a_world_slot_loses_the_race() {
        let ctx = test_ctx();
        let frame = Arc::new(Frame::new_root(Arc::clone(&ctx), FrameId::new("root")));
        let first = Arc::new(ExecutionContext::new(
            cdp_types::ExecutionContextId::new(1),
            frame.id().clone(),
            World::Utility,
            Arc::clone(&ctx.session),
        ));
        let second = Arc::new(ExecutionContext::new(
            cdp_types::ExecutionContextId::new(2),
            frame.id().clone(),
            World::Utility,
            Arc::clone(&ctx.session),
        ));
        assert!(frame.set_context(World::Utility, first));
        assert!(!frame.set_context(World::Utility, second));
    }

    #[tokio::test]
    async fn network_idle_fires_after_quiet_period() {
        let ctx = test_ctx();
        let frame = Arc::new(Frame::new_root(Arc::clone(&ctx), FrameId::new("root")));
        let req = RequestId::new("r1");
        frame.add_in_flight_request(req.clone());
        frame.remove_in_flight_request(&req);
        frame.clear_lifecycle(&frame);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(*frame
            .subtree_lifecycle_events
            .read()
            .unwrap()
            .get(&LifecycleEvent::NetworkIdle)
            .unwrap());
    }

    #[allow(dead_code)]
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
}
