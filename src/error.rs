//! Crate-wide error type (§7). One enum covering every failure kind the core
//! can produce; transport framing errors arrive wrapped from the external
//! collaborator that owns the socket.

use std::time::Instant;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CdpError>;

#[derive(Debug, Error)]
pub enum CdpError {
    /// The external transport reported a failure (connection error, framing
    /// error). The core never constructs this itself; it wraps whatever the
    /// transport collaborator surfaces.
    #[error("transport error: {0}")]
    Ws(String),

    /// An action was attempted against a FrameSession/Page that has no
    /// attached target, or whose Session has already been torn down.
    #[error("not attached to a target")]
    NotAttachedToTarget,

    /// The channel feeding a Session's event loop, or the oneshot bridging a
    /// command reply, was dropped by its owning task.
    #[error("internal channel closed")]
    ChannelSendError,

    /// An action or command's deadline elapsed before a reply arrived.
    #[error("{0}")]
    Timeout(#[from] DeadlineExceeded),

    /// The calling context was cancelled before the operation completed.
    #[error("operation canceled")]
    Canceled,

    /// A CDP call completed with no result and no error object - a malformed
    /// reply from the browser.
    #[error("received no response from the chromium instance")]
    NoResponse,

    #[error("{0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Url(#[from] url::ParseError),

    /// A `Chrome` protocol-state error, e.g. "X is already in effect". Callers
    /// that recognize the message as idempotent (see
    /// [`cdp_types::Error::is_already_in_effect`]) treat this as success
    /// instead of propagating it.
    #[error("{0}")]
    Chrome(#[from] cdp_types::Error),

    /// A JavaScript evaluation surfaced an exception. Carries the CDP
    /// exception details so the caller (or the Page's error bus) can report
    /// the script-side stack.
    #[error("script error: {}", .0.text)]
    ScriptError(cdp_protocol::runtime::ExceptionDetails),

    /// The owning Session received `Inspector.targetCrashed`; every
    /// subsequent call against it fails fast rather than attempting a round
    /// trip that can never complete.
    #[error("target crashed")]
    Crashed,
}

impl From<tokio::sync::oneshot::error::RecvError> for CdpError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        CdpError::Canceled
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for CdpError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        CdpError::ChannelSendError
    }
}

/// An error where `now > deadline`, produced by [`crate::session::CommandChain`]
/// style deadline tracking and by action timeouts.
#[derive(Debug, Clone)]
pub struct DeadlineExceeded {
    pub deadline: Instant,
    pub now: Instant,
}

impl DeadlineExceeded {
    /// panics if `now <= deadline`
    pub fn new(now: Instant, deadline: Instant) -> Self {
        assert!(now > deadline);
        Self { now, deadline }
    }
}

impl std::fmt::Display for DeadlineExceeded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "deadline exceeded: now {:?} is past deadline {:?}",
            self.now, self.deadline
        )
    }
}
