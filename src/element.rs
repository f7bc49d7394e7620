//! A resolved handle onto a DOM node (part of the Frame collaborator, §4.2
//! Public action API). Property reads (innerText, checked, attribute
//! lookups, ...) are implemented directly against the remote object; the
//! coordinate/actionability-driven actions (Click, Fill, Hover, ...) are
//! delegated to the out-of-scope element-action engine (§1) through
//! [`ActionEngine`] so this crate never has to reason about hit-testing.

use std::sync::Arc;

use cdp_protocol::runtime::CallArgument;
use cdp_types::RemoteObjectId;
use serde::de::DeserializeOwned;

use crate::context::ExecutionContext;
use crate::error::Result;

/// A single resolved DOM node, scoped to the world it was queried in.
#[derive(Debug, Clone)]
pub struct ElementHandle {
    context: Arc<ExecutionContext>,
    object_id: RemoteObjectId,
}

impl ElementHandle {
    pub fn new(context: Arc<ExecutionContext>, object_id: RemoteObjectId) -> Self {
        Self { context, object_id }
    }

    pub fn object_id(&self) -> &RemoteObjectId {
        &self.object_id
    }

    pub fn context(&self) -> &Arc<ExecutionContext> {
        &self.context
    }

    /// Lets the renderer garbage-collect the remote object backing this
    /// handle. Fire-and-forget: a frame tearing down its cached document
    /// handle on detach (§5 Resource release) has no reply to wait on, and
    /// the owning execution context may already be gone.
    pub fn dispose(&self) {
        use cdp_protocol::runtime::ReleaseObjectParams;
        let _ = self
            .context
            .session()
            .execute_fire_and_forget(ReleaseObjectParams::new(self.object_id.clone()));
    }

    async fn eval_property(&self, function_declaration: &str) -> Result<serde_json::Value> {
        let result = self
            .context
            .call_function_on(self.object_id.clone(), function_declaration, Vec::new())
            .await?;
        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    fn read<T: DeserializeOwned + Default>(value: serde_json::Value) -> T {
        serde_json::from_value(value).unwrap_or_default()
    }

    pub async fn get_attribute(&self, name: &str) -> Result<Option<String>> {
        let result = self
            .context
            .call_function_on(
                self.object_id.clone(),
                "function(name) { return this.getAttribute(name); }",
                vec![CallArgument {
                    value: Some(serde_json::Value::String(name.to_string())),
                    object_id: None,
                }],
            )
            .await?;
        Ok(result.value.and_then(|v| v.as_str().map(str::to_string)))
    }

    pub async fn inner_html(&self) -> Result<String> {
        Ok(Self::read(
            self.eval_property("function() { return this.innerHTML; }")
                .await?,
        ))
    }

    pub async fn inner_text(&self) -> Result<String> {
        Ok(Self::read(
            self.eval_property("function() { return this.innerText; }")
                .await?,
        ))
    }

    pub async fn text_content(&self) -> Result<String> {
        Ok(Self::read(
            self.eval_property("function() { return this.textContent; }")
                .await?,
        ))
    }

    pub async fn input_value(&self) -> Result<String> {
        Ok(Self::read(
            self.eval_property("function() { return this.value; }")
                .await?,
        ))
    }

    pub async fn is_checked(&self) -> Result<bool> {
        Ok(Self::read(
            self.eval_property("function() { return !!this.checked; }")
                .await?,
        ))
    }

    pub async fn is_disabled(&self) -> Result<bool> {
        Ok(Self::read(
            self.eval_property("function() { return !!this.disabled; }")
                .await?,
        ))
    }

    pub async fn is_enabled(&self) -> Result<bool> {
        Ok(!self.is_disabled().await?)
    }

    pub async fn is_editable(&self) -> Result<bool> {
        Ok(Self::read(
            self.eval_property("function() { return !this.disabled && !this.readOnly; }")
                .await?,
        ))
    }

    pub async fn is_hidden(&self) -> Result<bool> {
        Ok(Self::read(
            self.eval_property(
                "function() { const s = getComputedStyle(this); return s.display === 'none' || s.visibility === 'hidden'; }",
            )
            .await?,
        ))
    }

    pub async fn is_visible(&self) -> Result<bool> {
        Ok(!self.is_hidden().await?)
    }

    /// Dispatches a synthetic DOM event by type, bypassing the action
    /// engine's actionability checks since no hit-testing is involved.
    pub async fn dispatch_event(&self, event_type: &str) -> Result<()> {
        self.context
            .call_function_on(
                self.object_id.clone(),
                "function(type) { this.dispatchEvent(new Event(type, { bubbles: true, cancelable: true })); }",
                vec![CallArgument {
                    value: Some(serde_json::Value::String(event_type.to_string())),
                    object_id: None,
                }],
            )
            .await?;
        Ok(())
    }
}

/// An actionability-aware action requested against an [`ElementHandle`].
/// Mirrors the Public action API's action verbs that require coordinates or
/// a focus/input simulation step (§4.2); the engine only builds this request,
/// the out-of-scope action engine decides how to satisfy it.
#[derive(Debug, Clone)]
pub enum Action {
    Click,
    DblClick,
    Check,
    Uncheck,
    Hover,
    Tap,
    Fill(String),
    Focus,
    Press(String),
    Type(String),
    SelectOption(Vec<String>),
}

/// Options threaded through from the Public action API template's third
/// stage (§4.2 step 3: "passing through force, noWaitAfter, timeout").
#[derive(Debug, Clone, Default)]
pub struct ActionOptions {
    pub force: bool,
    pub no_wait_after: bool,
    pub timeout: Option<std::time::Duration>,
}

/// The narrow interface onto the out-of-scope element-action engine: given a
/// resolved handle and an actionability-driven action, perform it. A real
/// implementation does hit-testing, scrolling-into-view, and input
/// simulation; this crate only needs to be able to call it and propagate its
/// result.
#[async_trait::async_trait]
pub trait ActionEngine: Send + Sync {
    async fn perform(
        &self,
        handle: &ElementHandle,
        action: Action,
        options: ActionOptions,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingActionEngine {
        calls: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl ActionEngine for RecordingActionEngine {
        async fn perform(
            &self,
            _handle: &ElementHandle,
            action: Action,
            _options: ActionOptions,
        ) -> Result<()> {
            self.calls.lock().unwrap().push(format!("{action:?}"));
            Ok(())
        }
    }

    #[test]
    fn action_options_default_to_non_forced() {
        let options = ActionOptions::default();
        assert!(!options.force);
        assert!(!options.no_wait_after);
        assert!(options.timeout.is_none());
    }
}
