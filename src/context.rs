//! A handle to one JavaScript world inside one frame (§3 ExecutionContext,
//! ~5%). Evaluates scripts and returns remote-object handles; destruction is
//! driven entirely by the FrameSession event loop (§4.1).

use std::sync::Arc;

use cdp_protocol::runtime::{
    CallArgument, CallFunctionOnParams, EvaluateParams, EvaluateReturns, RemoteObject,
};
use cdp_types::{ExecutionContextId, FrameId, RemoteObjectId};

use crate::error::{CdpError, Result};
use crate::session::Session;

/// Which world an execution context belongs to. The set is closed: a context
/// whose aux data names neither is tracked by id only, with `World::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum World {
    Main,
    Utility,
    None,
}

#[derive(Debug)]
pub struct ExecutionContext {
    id: ExecutionContextId,
    frame_id: FrameId,
    world: World,
    session: Arc<Session>,
}

impl ExecutionContext {
    pub fn new(id: ExecutionContextId, frame_id: FrameId, world: World, session: Arc<Session>) -> Self {
        Self {
            id,
            frame_id,
            world,
            session,
        }
    }

    pub fn id(&self) -> ExecutionContextId {
        self.id
    }

    pub fn frame_id(&self) -> &FrameId {
        &self.frame_id
    }

    pub fn world(&self) -> World {
        self.world
    }

    /// Evaluates `expression` in this context and returns the raw remote
    /// object. Marshaling into user-facing values is the out-of-scope
    /// scripting runtime's job (§1, §9 "script-value bridge").
    pub async fn evaluate(&self, expression: impl Into<String>) -> Result<RemoteObject> {
        let params = EvaluateParams::new(expression).with_context_id(self.id);
        let resp = self.session.execute(params).await?;
        let EvaluateReturns {
            result,
            exception_details,
        } = resp.result;
        if let Some(details) = exception_details {
            return Err(CdpError::ScriptError(details));
        }
        Ok(result)
    }

    pub(crate) fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Invokes `function_declaration` with `object_id` bound to `this`,
    /// returning the by-value result. Element property reads (innerText,
    /// checked, ...) go through here rather than `evaluate`, since they
    /// operate on an already-resolved remote object (§4.2 Public action API).
    pub(crate) async fn call_function_on(
        &self,
        object_id: RemoteObjectId,
        function_declaration: impl Into<String>,
        arguments: Vec<CallArgument>,
    ) -> Result<RemoteObject> {
        let mut params = CallFunctionOnParams::on_object(object_id, function_declaration);
        if !arguments.is_empty() {
            params = params.with_arguments(arguments);
        }
        let resp = self.session.execute(params).await?;
        let cdp_protocol::runtime::CallFunctionOnReturns {
            result,
            exception_details,
        } = resp.result;
        if let Some(details) = exception_details {
            return Err(CdpError::ScriptError(details));
        }
        Ok(result)
    }
}
