//! `Runtime` domain: execution contexts, evaluation, console/exception
//! surfacing.

use cdp_types::{Command, ExecutionContextId, Method, RemoteObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EnableParams {}

impl EnableParams {
    pub const IDENTIFIER: &'static str = "Runtime.enable";
}
impl Method for EnableParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for EnableParams {
    type Response = super::page::EmptyReturns;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunIfWaitingForDebuggerParams {}

impl RunIfWaitingForDebuggerParams {
    pub const IDENTIFIER: &'static str = "Runtime.runIfWaitingForDebugger";
}
impl Method for RunIfWaitingForDebuggerParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for RunIfWaitingForDebuggerParams {
    type Response = super::page::EmptyReturns;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateParams {
    pub expression: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<ExecutionContextId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_by_value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub await_promise: Option<bool>,
}
impl EvaluateParams {
    pub const IDENTIFIER: &'static str = "Runtime.evaluate";

    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            context_id: None,
            return_by_value: None,
            await_promise: None,
        }
    }

    pub fn with_context_id(mut self, id: ExecutionContextId) -> Self {
        self.context_id = Some(id);
        self
    }
}
impl Method for EvaluateParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for EvaluateParams {
    type Response = EvaluateReturns;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateReturns {
    pub result: RemoteObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_details: Option<ExceptionDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<RemoteObjectId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
    pub exception_id: i64,
    pub text: String,
    pub line_number: i64,
    pub column_number: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<RemoteObject>,
}

/// Description of an isolated world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionContextDescription {
    pub id: ExecutionContextId,
    #[serde(default)]
    pub unique_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub aux_data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventExecutionContextCreated {
    pub context: ExecutionContextDescription,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventExecutionContextDestroyed {
    pub execution_context_id: ExecutionContextId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EventExecutionContextsCleared {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConsoleApiType {
    Log,
    Debug,
    Info,
    Error,
    Warning,
    Dir,
    #[serde(rename = "dirxml")]
    DirXml,
    Table,
    Trace,
    Clear,
    StartGroup,
    StartGroupCollapsed,
    EndGroup,
    Assert,
    Profile,
    ProfileEnd,
    Count,
    TimeEnd,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventConsoleApiCalled {
    #[serde(rename = "type")]
    pub kind: ConsoleApiType,
    pub args: Vec<RemoteObject>,
    pub execution_context_id: ExecutionContextId,
    pub timestamp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventExceptionThrown {
    pub timestamp: f64,
    pub exception_details: ExceptionDetails,
}

impl Method for EventExecutionContextCreated {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        "Runtime.executionContextCreated".into()
    }
}
impl Method for EventExecutionContextDestroyed {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        "Runtime.executionContextDestroyed".into()
    }
}
impl Method for EventExecutionContextsCleared {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        "Runtime.executionContextsCleared".into()
    }
}
impl Method for EventConsoleApiCalled {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        "Runtime.consoleAPICalled".into()
    }
}
/// Invokes a function declaration against a remote object, used by element
/// handles to read DOM properties (innerText, checked, ...) without the
/// out-of-scope action engine's coordinate/actionability machinery (§1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFunctionOnParams {
    pub function_declaration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<RemoteObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<CallArgument>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_context_id: Option<ExecutionContextId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_by_value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub await_promise: Option<bool>,
}

impl CallFunctionOnParams {
    pub const IDENTIFIER: &'static str = "Runtime.callFunctionOn";

    pub fn on_object(object_id: RemoteObjectId, function_declaration: impl Into<String>) -> Self {
        Self {
            function_declaration: function_declaration.into(),
            object_id: Some(object_id),
            arguments: None,
            execution_context_id: None,
            return_by_value: Some(true),
            await_promise: Some(true),
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<CallArgument>) -> Self {
        self.arguments = Some(arguments);
        self
    }
}
impl Method for CallFunctionOnParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for CallFunctionOnParams {
    type Response = CallFunctionOnReturns;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CallArgument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<RemoteObjectId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFunctionOnReturns {
    pub result: RemoteObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_details: Option<ExceptionDetails>,
}

/// Releases a remote object handle so the renderer can garbage-collect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseObjectParams {
    pub object_id: RemoteObjectId,
}

impl ReleaseObjectParams {
    pub const IDENTIFIER: &'static str = "Runtime.releaseObject";

    pub fn new(object_id: RemoteObjectId) -> Self {
        Self { object_id }
    }
}
impl Method for ReleaseObjectParams {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        Self::IDENTIFIER.into()
    }
}
impl Command for ReleaseObjectParams {
    type Response = super::page::EmptyReturns;
}

impl Method for EventExceptionThrown {
    fn identifier(&self) -> std::borrow::Cow<'static, str> {
        "Runtime.exceptionThrown".into()
    }
}
