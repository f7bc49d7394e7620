//! End-to-end scenarios driving the engine through a deterministic
//! in-process fake `Session` (no real transport). One `#[tokio::test]` per
//! scenario listed under "End-to-end scenarios" in the design notes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cdp_session_engine::{
    Action, ActionEngine, ActionOptions, BrowserContextOptions, CdpError, CommandSink,
    ConnectionState, ElementHandle, EmulationConfig, EngineShared, LifeCycleConfig, MetricName,
    Page, PageEvent, Result as EngineResult, Sample, MetricsSink, Timeouts, World,
};
use cdp_types::{Request, Response, TargetId};
use serde_json::json;
use tokio::sync::oneshot;

struct NoopActionEngine;

#[async_trait::async_trait]
impl ActionEngine for NoopActionEngine {
    async fn perform(&self, _handle: &ElementHandle, _action: Action, _options: ActionOptions) -> EngineResult<()> {
        Ok(())
    }
}

#[derive(Default)]
struct RecordingMetricsSink {
    samples: Mutex<Vec<Sample>>,
}

impl RecordingMetricsSink {
    fn samples(&self) -> Vec<Sample> {
        self.samples.lock().unwrap().clone()
    }
}

impl MetricsSink for RecordingMetricsSink {
    fn emit(&self, sample: Sample) {
        self.samples.lock().unwrap().push(sample);
    }
}

/// Answers every command with an empty success object, except
/// `Browser.getWindowForTarget` and `Page.getFrameTree`, which it answers
/// per session id so a main target and its iframe each seed a distinct
/// frame. Per-session overrides are registered before the session that
/// needs them is attached.
struct FakeSink {
    frame_trees: Mutex<HashMap<Option<String>, serde_json::Value>>,
}

impl FakeSink {
    fn new() -> Self {
        let mut frame_trees = HashMap::new();
        frame_trees.insert(
            None,
            json!({
                "frameTree": {
                    "frame": { "id": "F0", "loaderId": "l0", "url": "about:blank" }
                }
            }),
        );
        Self {
            frame_trees: Mutex::new(frame_trees),
        }
    }

    fn seed_child(&self, session_id: &str, frame_id: &str) {
        self.frame_trees.lock().unwrap().insert(
            Some(session_id.to_string()),
            json!({
                "frameTree": {
                    "frame": { "id": frame_id, "loaderId": "l1", "url": "https://example.com/iframe" }
                }
            }),
        );
    }
}

impl CommandSink for FakeSink {
    fn submit(&self, request: Request, reply: oneshot::Sender<EngineResult<Response>>) {
        let result = match &*request.method {
            "Browser.getWindowForTarget" => json!({ "windowId": 1, "bounds": {} }),
            "Page.getFrameTree" => {
                let session_id = request.session_id.as_ref().map(|s| s.as_ref().to_string());
                self.frame_trees
                    .lock()
                    .unwrap()
                    .get(&session_id)
                    .cloned()
                    .unwrap_or_else(|| json!({ "frameTree": { "frame": { "id": "F0", "loaderId": "l0", "url": "about:blank" } } }))
            }
            _ => json!({}),
        };
        let _ = reply.send(Ok(Response {
            id: request.id,
            result: Some(result),
            error: None,
        }));
    }

    fn submit_fire_and_forget(&self, _request: Request) {}
}

async fn attached_page(sink: Arc<FakeSink>) -> (Arc<Page>, Arc<RecordingMetricsSink>) {
    let metrics = Arc::new(RecordingMetricsSink::default());
    let shared = EngineShared::new(
        Arc::new(NoopActionEngine),
        Arc::clone(&metrics) as Arc<dyn MetricsSink>,
        EmulationConfig::default(),
        Timeouts::default(),
        LifeCycleConfig {
            network_idle_timeout: Duration::from_millis(80),
        },
    );
    let page = Page::new(shared, BrowserContextOptions::default());
    page.attach(sink, ConnectionState::new_connected(), TargetId::new("t0"), None)
        .await
        .unwrap();
    (page, metrics)
}

/// Scenario 1: clean page load.
#[tokio::test]
async fn clean_page_load_fires_each_page_event_exactly_once() {
    let (page, metrics) = attached_page(Arc::new(FakeSink::new())).await;
    let session = page.main_session().unwrap().session().clone();
    let mut events = page.events();

    session.deliver(
        "Page.lifecycleEvent",
        &json!({ "frameId": "F0", "loaderId": "l0", "name": "init", "timestamp": 0.0 }),
    );
    session.deliver(
        "Page.lifecycleEvent",
        &json!({ "frameId": "F0", "loaderId": "l0", "name": "DOMContentLoaded", "timestamp": 1.0 }),
    );
    session.deliver(
        "Page.lifecycleEvent",
        &json!({ "frameId": "F0", "loaderId": "l0", "name": "load", "timestamp": 2.0 }),
    );

    let mut saw_dom_content_loaded = 0;
    let mut saw_load = 0;
    while let Ok(event) = tokio::time::timeout(Duration::from_millis(200), events.recv()).await {
        match event.unwrap() {
            PageEvent::DomContentLoaded => saw_dom_content_loaded += 1,
            PageEvent::Load => saw_load += 1,
            _ => {}
        }
        if saw_dom_content_loaded > 0 && saw_load > 0 {
            break;
        }
    }
    assert_eq!(saw_dom_content_loaded, 1);
    assert_eq!(saw_load, 1);

    let samples = metrics.samples();
    assert_eq!(samples.iter().filter(|s| s.name == MetricName::BrowserDomContentLoaded).count(), 1);
    assert_eq!(samples.iter().filter(|s| s.name == MetricName::BrowserLoaded).count(), 1);
}

/// Scenario 2: nested iframe.
#[tokio::test]
async fn nested_iframe_registers_a_child_frame_session() {
    let sink = Arc::new(FakeSink::new());
    sink.seed_child("s-f1", "F1");
    let (page, _metrics) = attached_page(Arc::clone(&sink)).await;
    let fs = page.main_session().unwrap();
    let session = fs.session().clone();

    session.deliver("Page.frameAttached", &json!({ "frameId": "F1", "parentFrameId": "F0" }));
    session.deliver(
        "Page.frameNavigated",
        &json!({ "frame": { "id": "F1", "parentId": "F0", "loaderId": "l1", "url": "https://example.com/iframe" } }),
    );
    session.deliver(
        "Target.attachedToTarget",
        &json!({
            "sessionId": "s-f1",
            "targetInfo": { "targetId": "F1", "type": "iframe", "title": "", "url": "https://example.com/iframe" },
            "waitingForDebugger": false,
        }),
    );

    tokio::time::sleep(Duration::from_millis(100)).await;

    let children = fs.children();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].main_frame().unwrap().id().as_ref(), "F1");
}

/// Scenario 3: network idle.
#[tokio::test]
async fn network_idle_fires_once_and_unblocks_wait_for_load_state() {
    let (page, _metrics) = attached_page(Arc::new(FakeSink::new())).await;
    let frame = page.main_frame().unwrap();
    let session = page.main_session().unwrap().session().clone();

    session.deliver(
        "Network.requestWillBeSent",
        &json!({ "requestId": "r1", "loaderId": "l0", "frameId": "F0" }),
    );
    session.deliver(
        "Network.requestWillBeSent",
        &json!({ "requestId": "r2", "loaderId": "l0", "frameId": "F0" }),
    );
    session.deliver("Network.loadingFinished", &json!({ "requestId": "r1" }));
    session.deliver("Network.loadingFinished", &json!({ "requestId": "r2" }));

    frame
        .wait_for_load_state("networkidle", Some(Duration::from_secs(2)))
        .await
        .unwrap();

    // The bit stuck; a second wait for the same state resolves without
    // needing to observe another event.
    let second = tokio::time::timeout(
        Duration::from_millis(20),
        frame.wait_for_load_state("networkidle", Some(Duration::from_secs(2))),
    )
    .await;
    assert!(second.is_ok());
}

/// Scenario 4: crash.
#[tokio::test]
async fn crash_marks_the_session_and_fails_fast_afterwards() {
    let (page, _metrics) = attached_page(Arc::new(FakeSink::new())).await;
    let fs = page.main_session().unwrap();
    let mut events = page.events();

    fs.session().deliver("Inspector.targetCrashed", &json!({}));

    let mut saw_crash = false;
    while let Ok(Ok(event)) = tokio::time::timeout(Duration::from_millis(200), events.recv()).await {
        if matches!(event, PageEvent::Crashed) {
            saw_crash = true;
            break;
        }
    }
    assert!(saw_crash);
    assert!(page.is_crashed());

    let err = fs
        .session()
        .execute(cdp_protocol::page::EnableParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CdpError::Crashed));
}

/// Scenario 5: isolated-world race.
#[tokio::test]
async fn isolated_world_race_coalesces_to_a_single_bound_context() {
    let (page, _metrics) = attached_page(Arc::new(FakeSink::new())).await;
    let frame = page.main_frame().unwrap();
    let session = page.main_session().unwrap().session().clone();

    let aux_data = json!({ "frameId": "F0", "isDefault": false });
    session.deliver(
        "Runtime.executionContextCreated",
        &json!({
            "context": {
                "id": 101,
                "uniqueId": "u-101",
                "name": cdp_session_engine::page::UTILITY_WORLD_NAME,
                "auxData": aux_data,
            }
        }),
    );
    session.deliver(
        "Runtime.executionContextCreated",
        &json!({
            "context": {
                "id": 102,
                "uniqueId": "u-102",
                "name": cdp_session_engine::page::UTILITY_WORLD_NAME,
                "auxData": aux_data,
            }
        }),
    );

    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(frame.has_context(World::Utility));
    let ctx = frame.wait_for_execution_context(World::Utility).await.unwrap();
    assert_eq!(ctx.id(), cdp_types::ExecutionContextId::new(101));
}

/// Scenario 6: WaitForLoadState already-fired.
#[tokio::test]
async fn wait_for_load_state_returns_immediately_once_already_fired() {
    let (page, _metrics) = attached_page(Arc::new(FakeSink::new())).await;
    let frame = page.main_frame().unwrap();
    let session = page.main_session().unwrap().session().clone();

    session.deliver(
        "Page.lifecycleEvent",
        &json!({ "frameId": "F0", "loaderId": "l0", "name": "load", "timestamp": 0.0 }),
    );
    tokio::time::sleep(Duration::from_millis(50)).await;

    let result = tokio::time::timeout(
        Duration::from_millis(20),
        frame.wait_for_load_state("load", Some(Duration::from_secs(5))),
    )
    .await;
    assert!(result.is_ok(), "wait_for_load_state should not need to wait");
    result.unwrap().unwrap();
}
