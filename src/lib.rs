//! A per-target CDP session and frame-tree engine: attaches to a browser
//! target, mirrors its frame tree (including out-of-process iframes) and
//! execution contexts, applies per-session emulation, and exposes the
//! actionability-driven Frame API a load-testing harness drives scripts
//! through.

pub mod config;
pub mod context;
pub mod element;
pub mod error;
pub mod frame;
pub mod frame_session;
pub mod metrics;
pub mod network;
pub mod page;
pub mod session;

pub use config::{Credentials, EmulationConfig, Geolocation, LifeCycleConfig, Timeouts, Viewport};
pub use context::{ExecutionContext, World};
pub use element::{Action, ActionEngine, ActionOptions, ElementHandle};
pub use error::{CdpError, DeadlineExceeded, Result};
pub use frame::{DomState, Frame, FrameEvent, FrameManager, LifecycleEvent, WaitForSelectorOptions};
pub use frame_session::FrameSession;
pub use metrics::{MetricName, MetricsSink, Sample, TracingMetricsSink};
pub use network::NetworkManager;
pub use page::{BrowserContextOptions, DialogInfo, EngineShared, Page, PageEvent, Worker};
pub use session::{CommandSink, ConnectionState, Session};
