//! `Security` domain.

use cdp_types::{Command, Method};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetIgnoreCertificateErrorsParams {
    pub ignore: bool,
}
impl SetIgnoreCertificateErrorsParams {
    pub const IDENTIFIER: &'static str = "Security.setIgnoreCertificateErrors";

    pub fn new(ignore: bool) -> Self {
        Self { ignore }
    }
}
impl Method for SetIgnoreCertificateErrorsParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for SetIgnoreCertificateErrorsParams {
    type Response = super::page::EmptyReturns;
}
