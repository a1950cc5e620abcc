//! Test doubles for agents: a scripted model and a recording tool.
//!
//! These are ordinary public types so integration tests and downstream crates
//! can wire agents without a live provider.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::errors::{AgentError, AgentResult};
use crate::models::{Completion, Content, Conversation, LanguageModel, TokenUsage};
use crate::tools::{Tool, ToolContext, ToolOutcome, ToolSpec};

/// A [`LanguageModel`] that replays a fixed sequence of completions.
///
/// Every conversation it receives is recorded, so tests can assert on the
/// exact system text and messages an agent sent. Clones share the script and
/// the recordings.
#[derive(Clone)]
pub struct ScriptedModel {
    name: String,
    script: Arc<Mutex<VecDeque<AgentResult<Completion>>>>,
    calls: Arc<Mutex<Vec<Conversation>>>,
}

impl ScriptedModel {
    /// Creates a model that replays the given completions in order.
    pub fn with_completions<I>(name: impl Into<String>, completions: I) -> Self
    where
        I: IntoIterator<Item = AgentResult<Completion>>,
    {
        Self {
            name: name.into(),
            script: Arc::new(Mutex::new(completions.into_iter().collect())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Appends one more completion to the script.
    pub fn push_completion(&self, completion: AgentResult<Completion>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(completion);
        }
    }

    /// Returns every conversation the model has been asked to complete.
    #[must_use]
    pub fn calls(&self) -> Vec<Conversation> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    /// A successful completion containing plain text.
    pub fn text_completion(text: impl Into<String>) -> AgentResult<Completion> {
        Ok(Completion::new(
            Content::from_text(text),
            TokenUsage::partial(Some(10), Some(5), Some(15)),
        ))
    }

    /// A successful completion with arbitrary content, e.g. tool calls.
    pub fn content_completion(content: Content) -> AgentResult<Completion> {
        Ok(Completion::new(
            content,
            TokenUsage::partial(Some(10), Some(5), Some(15)),
        ))
    }

    /// A successful completion whose text is `value` as fenced JSON, the way
    /// models tend to format structured replies.
    pub fn structured_completion<T: Serialize>(value: &T) -> AgentResult<Completion> {
        let text = serde_json::to_string(value)
            .map(|json| format!("```json\n{json}\n```"))
            .unwrap_or_default();
        Self::text_completion(text)
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn model_name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        conversation: Conversation,
        _toolset: Option<Arc<dyn crate::tools::Toolset>>,
    ) -> AgentResult<Completion> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(conversation);
        }

        let next = self.script.lock().ok().and_then(|mut script| script.pop_front());
        next.unwrap_or_else(|| {
            Err(AgentError::Internal {
                component: "scripted_model".to_string(),
                reason: "script exhausted: more completions requested than provided".to_string(),
            })
        })
    }
}

/// A [`Tool`] that records every invocation and replays queued outcomes.
///
/// When the outcome queue runs dry it returns a null success, so tests only
/// need to queue the outcomes they care about. Clones share all state.
#[derive(Clone)]
pub struct RecordingTool {
    name: String,
    description: String,
    outcomes: Arc<Mutex<VecDeque<ToolOutcome>>>,
    calls: Arc<Mutex<Vec<HashMap<String, Value>>>>,
    deps: Arc<Mutex<Vec<Option<Value>>>>,
}

impl Default for RecordingTool {
    fn default() -> Self {
        Self::new("recording_tool", "Records every call it receives")
    }
}

impl RecordingTool {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            deps: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues outcomes to replay, one per invocation.
    #[must_use]
    pub fn with_outcomes<I>(self, outcomes: I) -> Self
    where
        I: IntoIterator<Item = ToolOutcome>,
    {
        if let Ok(mut queue) = self.outcomes.lock() {
            queue.extend(outcomes);
        }
        self
    }

    /// Returns the arguments of every invocation so far.
    #[must_use]
    pub fn calls(&self) -> Vec<HashMap<String, Value>> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Returns the dependencies visible to each invocation.
    #[must_use]
    pub fn seen_deps(&self) -> Vec<Option<Value>> {
        self.deps.lock().map(|deps| deps.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Tool for RecordingTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            self.name.clone(),
            self.description.clone(),
            serde_json::json!({"type": "object"}),
        )
    }

    async fn invoke(&self, args: HashMap<String, Value>, ctx: &ToolContext<'_>) -> ToolOutcome {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(args);
        }
        if let Ok(mut deps) = self.deps.lock() {
            deps.push(ctx.deps().cloned());
        }

        self.outcomes
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| ToolOutcome::success(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LanguageModelExt;
    use crate::tools::ScratchState;
    use serde_json::json;

    #[tokio::test(flavor = "current_thread")]
    async fn scripted_model_replays_and_records() {
        let model = ScriptedModel::with_completions(
            "scripted",
            [ScriptedModel::text_completion("one")],
        );

        let completion = model.prompt("hello").await.expect("first");
        assert_eq!(completion.content().first_text(), Some("one"));
        assert_eq!(model.call_count(), 1);

        let err = model.prompt("again").await.expect_err("exhausted");
        assert!(matches!(err, AgentError::Internal { .. }));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn recording_tool_captures_args_and_defaults_outcome() {
        let tool = RecordingTool::default();

        let state = ScratchState::new();
        let ctx = ToolContext::builder()
            .with_scratch(&state)
            .build()
            .expect("context");

        let mut args = HashMap::new();
        args.insert("order_id".to_string(), json!("12345"));

        let outcome = tool.invoke(args, &ctx).await;
        assert!(outcome.is_success());
        assert_eq!(tool.calls()[0]["order_id"], json!("12345"));
        assert_eq!(tool.seen_deps()[0], None);
    }
}
