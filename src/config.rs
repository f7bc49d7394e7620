//! Plain option structs (§C). Not env/file-parsed here — that seam belongs to
//! the out-of-scope CLI/option parser — but every per-session emulation knob
//! named in §4.1 step 7 has a field here.

use std::collections::BTreeMap;
use std::time::Duration;

/// Default and navigation timeouts, overridable per action call (§4.2 point 1).
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub default: Duration,
    pub navigation: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            default: Duration::from_secs(30),
            navigation: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: i64,
    pub height: i64,
    pub device_scale_factor: f64,
    pub is_mobile: bool,
    pub is_landscape: bool,
    pub has_touch: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            device_scale_factor: 1.0,
            is_mobile: false,
            is_landscape: false,
            has_touch: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// One field per §4.1 step 7 emulation knob, applied in the order
/// `FrameSession::apply_emulation` lists them.
#[derive(Debug, Clone, Default)]
pub struct EmulationConfig {
    pub viewport: Viewport,
    pub locale: Option<String>,
    pub timezone_id: Option<String>,
    pub geolocation: Option<Geolocation>,
    pub extra_http_headers: BTreeMap<String, String>,
    pub user_agent: Option<String>,
    pub accept_language: Option<String>,
    pub bypass_csp: bool,
    pub ignore_https_errors: bool,
    pub disable_javascript: bool,
    pub offline: bool,
    pub credentials: Option<Credentials>,
    pub emulated_media: Vec<(String, String)>,
    pub request_interception: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Geolocation {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
}

/// The quiet period used by the per-frame network-idle timer (§4.2).
#[derive(Debug, Clone, Copy)]
pub struct LifeCycleConfig {
    pub network_idle_timeout: Duration,
}

impl Default for LifeCycleConfig {
    fn default() -> Self {
        Self {
            network_idle_timeout: Duration::from_millis(500),
        }
    }
}
