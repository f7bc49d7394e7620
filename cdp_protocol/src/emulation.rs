//! `Emulation` domain: the per-session knobs `FrameSession::apply_emulation`
//! walks through in order (§4.1 step 7).

use cdp_types::{Command, Method};
use serde::{Deserialize, Serialize};

macro_rules! simple_command {
    ($name:ident, $id:expr, $($field:ident: $ty:ty),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            $(pub $field: $ty,)*
        }
        impl $name {
            pub const IDENTIFIER: &'static str = $id;
        }
        impl Method for $name {
            fn identifier(&self) -> std::borrow::Cow<'static, str> {
                Self::IDENTIFIER.into()
            }
        }
        impl Command for $name {
            type Response = super::page::EmptyReturns;
        }
    };
}

simple_command!(SetFocusEmulationEnabledParams, "Emulation.setFocusEmulationEnabled", enabled: bool);
simple_command!(SetTouchEmulationEnabledParams, "Emulation.setTouchEmulationEnabled", enabled: bool);
simple_command!(SetScriptExecutionDisabledParams, "Emulation.setScriptExecutionDisabled", value: bool);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SetLocaleOverrideParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}
impl SetLocaleOverrideParams {
    pub const IDENTIFIER: &'static str = "Emulation.setLocaleOverride";

    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: Some(locale.into()),
        }
    }
}
impl Method for SetLocaleOverrideParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for SetLocaleOverrideParams {
    type Response = super::page::EmptyReturns;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTimezoneOverrideParams {
    pub timezone_id: String,
}
impl SetTimezoneOverrideParams {
    pub const IDENTIFIER: &'static str = "Emulation.setTimezoneOverride";

    pub fn new(timezone_id: impl Into<String>) -> Self {
        Self {
            timezone_id: timezone_id.into(),
        }
    }
}
impl Method for SetTimezoneOverrideParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for SetTimezoneOverrideParams {
    type Response = super::page::EmptyReturns;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetUserAgentOverrideParams {
    pub user_agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}
impl SetUserAgentOverrideParams {
    pub const IDENTIFIER: &'static str = "Emulation.setUserAgentOverride";

    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            accept_language: None,
            platform: None,
        }
    }

    pub fn with_accept_language(mut self, accept_language: impl Into<String>) -> Self {
        self.accept_language = Some(accept_language.into());
        self
    }
}
impl Method for SetUserAgentOverrideParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for SetUserAgentOverrideParams {
    type Response = super::page::EmptyReturns;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ScreenOrientationType {
    #[default]
    PortraitPrimary,
    PortraitSecondary,
    LandscapePrimary,
    LandscapeSecondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenOrientation {
    #[serde(rename = "type")]
    pub kind: ScreenOrientationType,
    pub angle: i64,
}

impl ScreenOrientation {
    pub fn new(kind: ScreenOrientationType, angle: i64) -> Self {
        Self { kind, angle }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDeviceMetricsOverrideParams {
    pub width: u32,
    pub height: u32,
    pub device_scale_factor: f64,
    pub mobile: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_orientation: Option<ScreenOrientation>,
}
impl SetDeviceMetricsOverrideParams {
    pub const IDENTIFIER: &'static str = "Emulation.setDeviceMetricsOverride";
}
impl Method for SetDeviceMetricsOverrideParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for SetDeviceMetricsOverrideParams {
    type Response = super::page::EmptyReturns;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetGeolocationOverrideParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}
impl SetGeolocationOverrideParams {
    pub const IDENTIFIER: &'static str = "Emulation.setGeolocationOverride";
}
impl Method for SetGeolocationOverrideParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for SetGeolocationOverrideParams {
    type Response = super::page::EmptyReturns;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFeature {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SetEmulatedMediaParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<MediaFeature>>,
}
impl SetEmulatedMediaParams {
    pub const IDENTIFIER: &'static str = "Emulation.setEmulatedMedia";
}
impl Method for SetEmulatedMediaParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for SetEmulatedMediaParams {
    type Response = super::page::EmptyReturns;
}
