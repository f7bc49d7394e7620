//! Request interception, auth, and offline toggling (§3/§4 NetworkManager
//! collaborator, ~interface only). The actual request/response
//! reconstruction is out of scope (§1); this module's job is narrower: own
//! the per-session network configuration and tell [`crate::frame::Frame`]s
//! when a request starts or stops being in-flight, which is what drives the
//! network-idle timer.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use cdp_protocol::network::{
    EnableParams, EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
    SetExtraHttpHeadersParams, SetOfflineModeParams, SetRequestInterceptionParams,
};
use crate::config::Credentials;
use crate::error::Result;
use crate::frame::FrameManager;
use crate::session::Session;

/// Per-session network configuration, shared between a parent `FrameSession`
/// and the children it spawns so credentials and interception state carry
/// across iframe boundaries (§4.1 construction contract step 1: "child
/// inherits parent's to share credentials, extra headers, interception
/// state").
#[derive(Debug, Clone, Default)]
struct NetworkState {
    extra_headers: BTreeMap<String, String>,
    request_interception: bool,
    offline: bool,
    credentials: Option<Credentials>,
}

pub struct NetworkManager {
    session: Arc<Session>,
    state: RwLock<NetworkState>,
}

impl NetworkManager {
    /// Constructs a fresh manager for a main-frame session.
    pub fn new(session: Arc<Session>) -> Arc<Self> {
        Arc::new(Self {
            session,
            state: RwLock::new(NetworkState::default()),
        })
    }

    /// Constructs a manager for a child session, inheriting the parent's
    /// configuration but issuing commands on the child's own session.
    pub fn inherit(session: Arc<Session>, parent: &NetworkManager) -> Arc<Self> {
        let state = parent.state.read().unwrap().clone();
        Arc::new(Self {
            session,
            state: RwLock::new(state),
        })
    }

    pub async fn enable(&self) -> Result<()> {
        self.session.execute(EnableParams::default()).await?;
        Ok(())
    }

    pub async fn set_extra_http_headers(&self, headers: BTreeMap<String, String>) -> Result<()> {
        self.session
            .execute(SetExtraHttpHeadersParams::new(headers.clone()))
            .await?;
        self.state.write().unwrap().extra_headers = headers;
        Ok(())
    }

    pub async fn set_offline_mode(&self, offline: bool) -> Result<()> {
        self.session.execute(SetOfflineModeParams::new(offline)).await?;
        self.state.write().unwrap().offline = offline;
        Ok(())
    }

    pub async fn set_request_interception(&self, enabled: bool) -> Result<()> {
        self.session
            .execute(SetRequestInterceptionParams::new(enabled))
            .await?;
        self.state.write().unwrap().request_interception = enabled;
        Ok(())
    }

    /// Basic-auth has no dedicated CDP command (§E); folded into the extra
    /// headers as an `Authorization: Basic ...` value.
    pub async fn authenticate(&self, credentials: Credentials) -> Result<()> {
        let token = BASE64_STANDARD.encode(format!("{}:{}", credentials.username, credentials.password));
        let mut headers = self.state.read().unwrap().extra_headers.clone();
        headers.insert("Authorization".to_string(), format!("Basic {token}"));
        self.set_extra_http_headers(headers).await?;
        self.state.write().unwrap().credentials = Some(credentials);
        Ok(())
    }

    /// Routes `Network.requestWillBeSent` to the owning frame, if known.
    pub fn on_request_will_be_sent(&self, frames: &FrameManager, event: EventRequestWillBeSent) {
        let Some(frame_id) = event.frame_id else {
            return;
        };
        if let Some(frame) = frames.frame(&frame_id) {
            frame.add_in_flight_request(event.request_id.clone());
            frame.mark_document_request(event.request_id);
        }
    }

    pub fn on_loading_finished(&self, frames: &FrameManager, event: EventLoadingFinished) {
        for frame in frames.frames() {
            frame.remove_in_flight_request(&event.request_id);
        }
    }

    pub fn on_loading_failed(&self, frames: &FrameManager, event: EventLoadingFailed) {
        for frame in frames.frames() {
            frame.remove_in_flight_request(&event.request_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_auth_token_matches_known_vector() {
        assert_eq!(
            BASE64_STANDARD.encode("Aladdin:open sesame"),
            "QWxhZGRpbjpvcGVuIHNlc2FtZQ=="
        );
    }
}
