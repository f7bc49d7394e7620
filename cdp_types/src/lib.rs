//! The wire-level envelope shared by every CDP domain: method identifiers,
//! the `Command`/`Event` traits protocol types implement, and the JSON-RPC
//! request/response/event shapes themselves.

mod browser;
mod dom;
mod page;
mod runtime;
mod target;

pub use browser::BrowserContextId;
pub use dom::NodeId;
pub use page::FrameId;
pub use runtime::{ExecutionContextId, RemoteObjectId};
pub use target::TargetId;

use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Identifier for a CDP session, assigned by `Target.attachToTarget`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for an outgoing method call. Unique per connection, not per
/// session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(usize);

impl CallId {
    pub fn new(id: usize) -> Self {
        CallId(id)
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallId({})", self.0)
    }
}

/// A type that can identify itself by CDP method name, e.g. `DOM.removeNode`.
pub trait Method {
    fn identifier(&self) -> Cow<'static, str>;

    fn domain_name(&self) -> Cow<'static, str> {
        self.split().0
    }

    fn method_name(&self) -> Cow<'static, str> {
        self.split().1
    }

    fn split(&self) -> (Cow<'static, str>, Cow<'static, str>) {
        match self.identifier() {
            Cow::Borrowed(id) => {
                let mut iter = id.split('.');
                (iter.next().unwrap().into(), iter.next().unwrap().into())
            }
            Cow::Owned(id) => {
                let mut iter = id.split('.');
                (
                    Cow::Owned(iter.next().unwrap().to_string()),
                    Cow::Owned(iter.next().unwrap().to_string()),
                )
            }
        }
    }
}

/// A command that expects a typed response.
pub trait Command: Serialize + Method {
    type Response: DeserializeOwned + fmt::Debug;
}

/// An event CDP pushes to a session, distinguished from a [`Response`] by
/// carrying a `method` name instead of an `id`.
pub trait Event: Method + DeserializeOwned {
    fn session_id(&self) -> Option<&str>;
}

/// An outgoing CDP request, ready to be framed onto the transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    pub id: CallId,
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    pub method: Cow<'static, str>,
    pub params: serde_json::Value,
}

impl Request {
    pub fn new(id: CallId, method: Cow<'static, str>, params: serde_json::Value) -> Self {
        Self {
            id,
            method,
            params,
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }
}

/// A response to a previously issued [`Request`].
#[derive(Debug, Deserialize, Clone)]
pub struct Response {
    pub id: CallId,
    pub result: Option<serde_json::Value>,
    pub error: Option<Error>,
}

/// An untyped CDP event, as it arrives off the wire before being matched
/// against a concrete event type by method name.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CdpJsonEventMessage {
    pub method: Cow<'static, str>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
    pub params: serde_json::Value,
}

impl Method for CdpJsonEventMessage {
    fn identifier(&self) -> Cow<'static, str> {
        self.method.clone()
    }
}

impl Event for CdpJsonEventMessage {
    fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }
}

/// Either half of what arrives on a CDP connection: a reply to a request we
/// issued, or a spontaneous event.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
#[allow(clippy::large_enum_variant)]
pub enum Message<T = CdpJsonEventMessage> {
    Response(Response),
    Event(T),
}

/// The `error` object on a failed [`Response`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Error {
    pub code: i64,
    pub message: String,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CDP error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for Error {}

impl Error {
    /// `true` for the handful of "already in effect" protocol-state replies
    /// that the engine treats as a successful no-op (idempotent emulation
    /// setup, see §7 of the design notes).
    pub fn is_already_in_effect(&self) -> bool {
        let msg = self.message.to_ascii_lowercase();
        msg.contains("already") && (msg.contains("locale") || msg.contains("timezone"))
    }
}

/// A typed command reply, still tagged with the method that produced it.
#[derive(Debug)]
pub struct CommandResponse<T: fmt::Debug> {
    pub id: CallId,
    pub result: T,
    pub method: Cow<'static, str>,
}

impl<T: fmt::Debug> Deref for CommandResponse<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.result
    }
}
