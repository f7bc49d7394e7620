//! `Log` domain: browser-side log entries, bridged into `tracing` (§4.1).

use cdp_types::{Command, Method};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EnableParams {}

impl EnableParams {
    pub const IDENTIFIER: &'static str = "Log.enable";
}
impl Method for EnableParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for EnableParams {
    type Response = super::page::EmptyReturns;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogEntryLevel {
    Verbose,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub source: String,
    pub level: LogEntryLevel,
    pub text: String,
    pub timestamp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEntryAdded {
    pub entry: LogEntry,
}

impl Method for EventEntryAdded {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        "Log.entryAdded".into()
    }
}
