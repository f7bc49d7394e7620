//! Thin wire endpoint for one CDP session id (§3 Session, ~5%). Sends
//! commands, receives typed events, and exposes the subscription primitive
//! FrameSession builds its event-dispatch loop on top of (§4.3).
//!
//! The actual WebSocket connection and message framing is an external
//! collaborator (§1); [`CommandSink`] is the narrow interface this crate
//! needs from it; a fake implementation is all the test suite provides.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use cdp_protocol::events::CdpEvent;
use cdp_types::{CallId, Command, CommandResponse, Method, Request, Response, SessionId, TargetId};
use tokio::sync::{mpsc, oneshot};

use crate::error::{CdpError, Result};

static NEXT_CALL_ID: AtomicUsize = AtomicUsize::new(0);

fn next_call_id() -> CallId {
    CallId::new(NEXT_CALL_ID.fetch_add(1, Ordering::Relaxed))
}

/// What a [`Session`] needs from the transport: submit a request and either
/// get a reply back (`submit`) or not care (`submit_fire_and_forget`).
pub trait CommandSink: Send + Sync + 'static {
    fn submit(&self, request: Request, reply: oneshot::Sender<Result<Response>>);
    fn submit_fire_and_forget(&self, request: Request);
}

/// Per-target mirror of whether the browser is still reachable. Shared
/// between a FrameSession and the child sessions it spawns so connection-loss
/// during child construction (§4.1) can be distinguished from an ordinary
/// fatal error.
#[derive(Debug, Clone, Default)]
pub struct ConnectionState(Arc<AtomicBool>);

impl ConnectionState {
    pub fn new_connected() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_connected(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn mark_disconnected(&self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Session {
    target_id: TargetId,
    session_id: Option<SessionId>,
    sink: Arc<dyn CommandSink>,
    connection: ConnectionState,
    subs: Mutex<HashMap<&'static str, Vec<mpsc::UnboundedSender<CdpEvent>>>>,
    crashed: AtomicBool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("target_id", &self.target_id)
            .field("session_id", &self.session_id)
            .field("crashed", &self.crashed.load(Ordering::Relaxed))
            .finish()
    }
}

impl Session {
    pub fn new(
        target_id: TargetId,
        session_id: Option<SessionId>,
        sink: Arc<dyn CommandSink>,
        connection: ConnectionState,
    ) -> Self {
        Self {
            target_id,
            session_id,
            sink,
            connection,
            subs: Mutex::new(HashMap::new()),
            crashed: AtomicBool::new(false),
        }
    }

    pub fn target_id(&self) -> &TargetId {
        &self.target_id
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    /// Lets a FrameSession build a sibling `Session` scoped to a different
    /// session id over the same transport, e.g. the throwaway session used to
    /// fire-and-forget commands at a target it is about to detach from
    /// (§4.1 target-attach router).
    pub fn sink(&self) -> Arc<dyn CommandSink> {
        Arc::clone(&self.sink)
    }

    pub fn is_crashed(&self) -> bool {
        self.crashed.load(Ordering::Acquire)
    }

    /// §4.1 "Target crash": mark the owning Session as crashed.
    pub fn mark_as_crashed(&self) {
        self.crashed.store(true, Ordering::Release);
    }

    /// Registers `sink` to receive every event in `names`. Returns nothing;
    /// callers build the receiving half themselves via [`Session::subscribe`]
    /// returning a fresh channel, mirroring the "forwards a named-event
    /// subset to a sink" contract without requiring callers to pre-build one.
    pub fn subscribe(&self, names: &'static [&'static str]) -> mpsc::UnboundedReceiver<CdpEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut subs = self.subs.lock().unwrap();
        for name in names {
            subs.entry(*name).or_default().push(tx.clone());
        }
        rx
    }

    /// Called by the (out-of-scope) transport demuxer once it has routed a
    /// raw event to this session by session id. Parses it against the closed
    /// event set and forwards to every matching subscriber; unrecognized
    /// methods are dropped silently.
    pub fn deliver(&self, method: &str, params: &serde_json::Value) {
        let event = match cdp_protocol::events::parse(method, params) {
            Ok(Some(event)) => event,
            Ok(None) => return,
            Err(err) => {
                tracing::warn!(%method, error = %err, "failed to parse event params");
                return;
            }
        };
        let subs = self.subs.lock().unwrap();
        if let Some(sinks) = subs.get(method) {
            for sink in sinks {
                let _ = sink.send(event.clone());
            }
        }
    }

    fn build_request<T: Command>(&self, cmd: &T) -> Result<(Cow<'static, str>, Request)> {
        let method = cmd.identifier();
        let params = serde_json::to_value(cmd)?;
        let mut request = Request::new(next_call_id(), method.clone(), params);
        if let Some(session_id) = self.session_id.clone() {
            request = request.with_session(session_id);
        }
        Ok((method, request))
    }

    /// `execute(ctx, command, params) -> reply` (§4.3). Fails fast on a
    /// crashed session rather than issuing a doomed round trip (§E).
    pub async fn execute<T: Command>(&self, cmd: T) -> Result<CommandResponse<T::Response>> {
        if self.is_crashed() {
            return Err(CdpError::Crashed);
        }
        let (method, request) = self.build_request(&cmd)?;
        let (tx, rx) = oneshot::channel();
        self.sink.submit(request, tx);
        let resp = rx.await??;
        to_command_response::<T>(resp, method)
    }

    /// `executeFireAndForget(ctx, command, params)` (§4.3).
    pub fn execute_fire_and_forget<T: Command>(&self, cmd: T) -> Result<()> {
        if self.is_crashed() {
            return Err(CdpError::Crashed);
        }
        let (_, request) = self.build_request(&cmd)?;
        self.sink.submit_fire_and_forget(request);
        Ok(())
    }
}

fn to_command_response<T: Command>(
    resp: Response,
    method: Cow<'static, str>,
) -> Result<CommandResponse<T::Response>> {
    if let Some(result) = resp.result {
        let result = serde_json::from_value(result)?;
        Ok(CommandResponse {
            id: resp.id,
            result,
            method,
        })
    } else if let Some(err) = resp.error {
        if err.is_already_in_effect() {
            return Err(CdpError::Chrome(err));
        }
        Err(CdpError::Chrome(err))
    } else {
        Err(CdpError::NoResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdp_protocol::page::EnableParams;
    use std::sync::Mutex as StdMutex;

    struct EchoSink {
        last: StdMutex<Option<Request>>,
    }

    impl CommandSink for EchoSink {
        fn submit(&self, request: Request, reply: oneshot::Sender<Result<Response>>) {
            let id = request.id;
            *self.last.lock().unwrap() = Some(request);
            let _ = reply.send(Ok(Response {
                id,
                result: Some(serde_json::json!({})),
                error: None,
            }));
        }

        fn submit_fire_and_forget(&self, request: Request) {
            *self.last.lock().unwrap() = Some(request);
        }
    }

    #[tokio::test]
    async fn execute_round_trips() {
        let sink = Arc::new(EchoSink {
            last: StdMutex::new(None),
        });
        let session = Session::new(
            TargetId::new("t1"),
            None,
            sink,
            ConnectionState::new_connected(),
        );
        session.execute(EnableParams::default()).await.unwrap();
    }

    #[tokio::test]
    async fn crashed_session_fails_fast() {
        let sink = Arc::new(EchoSink {
            last: StdMutex::new(None),
        });
        let session = Session::new(
            TargetId::new("t1"),
            None,
            sink,
            ConnectionState::new_connected(),
        );
        session.mark_as_crashed();
        let err = session.execute(EnableParams::default()).await.unwrap_err();
        assert!(matches!(err, CdpError::Crashed));
    }

    #[tokio::test]
    async fn subscribe_forwards_matching_events() {
        let sink = Arc::new(EchoSink {
            last: StdMutex::new(None),
        });
        let session = Session::new(
            TargetId::new("t1"),
            None,
            sink,
            ConnectionState::new_connected(),
        );
        let mut rx = session.subscribe(&["Inspector.targetCrashed"]);
        session.deliver("Inspector.targetCrashed", &serde_json::json!({}));
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, CdpEvent::TargetCrashed(_)));
    }
}
