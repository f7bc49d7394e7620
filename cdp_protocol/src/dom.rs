//! `DOM` domain. The engine only enables the domain; element interaction is
//! delegated to the out-of-scope element-action engine (§1).

use cdp_types::{Command, Method};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EnableParams {}

impl EnableParams {
    pub const IDENTIFIER: &'static str = "DOM.enable";
}
impl Method for EnableParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for EnableParams {
    type Response = super::page::EmptyReturns;
}
