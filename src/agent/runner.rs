//! The shared run loop behind both agent types.
//!
//! A run alternates between asking the model for a completion and executing
//! whatever tool calls come back. Once the model replies without tool calls,
//! the reply is handed to the caller-supplied parser; parse failures feed a
//! corrective message back to the model until the retry budget is spent.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::errors::{AgentError, AgentResult};
use crate::models::{Conversation, LanguageModel, Message, TokenUsage};
use crate::tools::{
    CombinedToolset, ScratchState, StaticToolset, Tool, ToolContext, ToolReply, Toolset,
};

pub(crate) const DEFAULT_MAX_TOOL_TURNS: usize = 8;

/// The result of one agent run.
///
/// Carries the parsed output, the full transcript (reusable as message
/// history for a follow-up run), and the token usage summed over every model
/// turn the run took.
#[derive(Debug, Clone)]
pub struct AgentRun<T> {
    output: T,
    transcript: Conversation,
    usage: TokenUsage,
}

impl<T> AgentRun<T> {
    #[must_use]
    pub const fn output(&self) -> &T {
        &self.output
    }

    #[must_use]
    pub fn into_output(self) -> T {
        self.output
    }

    #[must_use]
    pub const fn transcript(&self) -> &Conversation {
        &self.transcript
    }

    #[must_use]
    pub const fn usage(&self) -> &TokenUsage {
        &self.usage
    }
}

/// Shared mechanics: model, tools, and loop limits.
pub(crate) struct Driver {
    pub(crate) model: Arc<dyn LanguageModel>,
    pub(crate) toolset: Option<Arc<dyn Toolset>>,
    pub(crate) max_tool_turns: usize,
    pub(crate) retries: u32,
}

impl Driver {
    /// Runs the loop to completion.
    ///
    /// The toolset is never closed here: agents are reusable, so toolset
    /// lifecycle stays with whoever owns the toolset.
    pub(crate) async fn drive<T: Send>(
        &self,
        mut conversation: Conversation,
        deps: Option<&Value>,
        parse: &(dyn Fn(&crate::models::Content) -> AgentResult<T> + Sync),
    ) -> AgentResult<AgentRun<T>> {
        let tools: HashMap<String, Arc<dyn Tool>> = match &self.toolset {
            Some(toolset) => toolset
                .tools()
                .await
                .into_iter()
                .map(|tool| (tool.name().to_string(), tool))
                .collect(),
            None => HashMap::new(),
        };

        let scratch = ScratchState::new();
        let mut ctx_builder = ToolContext::builder().with_scratch(&scratch);
        if let Some(deps) = deps {
            ctx_builder = ctx_builder.with_deps(deps);
        }
        let ctx = ctx_builder.build()?;

        let mut usage = TokenUsage::empty();
        let mut retries_left = self.retries;
        let mut turns = 0usize;

        loop {
            turns += 1;
            if turns > self.max_tool_turns {
                return Err(AgentError::Internal {
                    component: "agent".to_string(),
                    reason: format!(
                        "run exceeded {} model turns without a final reply",
                        self.max_tool_turns
                    ),
                });
            }

            let completion = self
                .model
                .complete(conversation.clone(), self.toolset.clone())
                .await?;
            let (content, turn_usage) = completion.into_parts();
            usage.absorb(&turn_usage);

            let calls: Vec<_> = content.tool_calls().into_iter().cloned().collect();

            if calls.is_empty() {
                match parse(&content) {
                    Ok(output) => {
                        let transcript = conversation.add(Message::assistant(content));
                        return Ok(AgentRun {
                            output,
                            transcript,
                            usage,
                        });
                    }
                    Err(err) => {
                        if retries_left == 0 {
                            return Err(AgentError::OutputRejected {
                                attempts: self.retries + 1,
                                reason: err.to_string(),
                            });
                        }
                        retries_left -= 1;
                        tracing::warn!(%err, retries_left, "reply rejected, asking model to retry");
                        conversation = conversation.add(Message::assistant(content)).add(
                            Message::user(format!(
                                "Your previous reply could not be accepted: {err}. \
                                 Please answer again, following the required format exactly."
                            )),
                        );
                        continue;
                    }
                }
            }

            conversation = conversation.add(Message::assistant(content));

            for call in calls {
                let tool = tools
                    .get(call.name())
                    .ok_or_else(|| AgentError::ToolNotFound {
                        tool_name: call.name().to_string(),
                    })?;

                let args = value_to_arguments(call.name(), call.arguments())?;

                tracing::debug!(tool = call.name(), call_id = call.id(), "invoking tool");
                let outcome = tool.invoke(args, &ctx).await;
                if !outcome.is_success() {
                    tracing::warn!(
                        tool = call.name(),
                        error = outcome.error_message().unwrap_or("unknown"),
                        "tool reported an error"
                    );
                }

                conversation =
                    conversation.add(Message::from(ToolReply::new(call.id(), outcome)));
            }
        }
    }
}

/// Converts a tool call's argument value into the map tools receive.
fn value_to_arguments(
    tool_name: &str,
    arguments: &Value,
) -> AgentResult<HashMap<String, Value>> {
    match arguments {
        Value::Null => Ok(HashMap::new()),
        Value::Object(map) => Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
        other => Err(AgentError::ToolInvalidArguments {
            tool_name: tool_name.to_string(),
            reason: format!("expected a JSON object, got {other}"),
        }),
    }
}

/// Folds individually registered tools and toolsets into one toolset.
pub(crate) fn combine_toolsets(
    tools: Vec<Arc<dyn Tool>>,
    toolsets: Vec<Arc<dyn Toolset>>,
) -> Option<Arc<dyn Toolset>> {
    let mut sources = toolsets;
    if !tools.is_empty() {
        sources.insert(0, Arc::new(StaticToolset::new(tools)));
    }

    let mut iter = sources.into_iter();
    let first = iter.next()?;
    Some(iter.fold(first, |acc, next| {
        Arc::new(CombinedToolset::new(acc, next)) as Arc<dyn Toolset>
    }))
}
