//! Hand-written CDP command/event types for the domains the session/frame-tree
//! engine speaks: `Page`, `Runtime`, `Target`, `Network`, `Emulation`,
//! `Security`, `DOM`, `Log` and `Inspector`. This mirrors the shape a real
//! protocol crate generates from the upstream `.pdl` definitions, but is
//! trimmed to exactly the commands and events the engine issues or consumes
//! (full protocol coverage is out of this crate's scope).

pub mod browser;
pub mod dom;
pub mod emulation;
pub mod events;
pub mod inspector;
pub mod log;
pub mod network;
pub mod page;
pub mod runtime;
pub mod security;
pub mod target;

pub use cdp_types::{BrowserContextId, ExecutionContextId, FrameId, NodeId, RemoteObjectId, TargetId};
