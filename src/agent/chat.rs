//! Free-text agent.

use std::sync::Arc;

use crate::agent::runner::{combine_toolsets, AgentRun, Driver, DEFAULT_MAX_TOOL_TURNS};
use crate::errors::{AgentError, AgentResult};
use crate::models::{Content, Conversation, LanguageModel};
use crate::tools::{Tool, Toolset};

/// An agent whose output is the model's reply text.
///
/// # Examples
///
/// ```ignore
/// use deskagent::agent::ChatAgent;
/// use deskagent::models::OpenAiChat;
///
/// let agent = ChatAgent::builder(OpenAiChat::from_env("gpt-4o")?)
///     .with_instructions("You are a helpful support agent.")
///     .build();
///
/// let run = agent.run("How do I track my order?").await?;
/// println!("{}", run.output());
/// ```
pub struct ChatAgent {
    driver: Driver,
    instructions: Option<String>,
}

impl ChatAgent {
    /// Starts building a chat agent around the given model.
    pub fn builder(model: impl LanguageModel + 'static) -> ChatAgentBuilder {
        ChatAgentBuilder {
            model: Arc::new(model),
            instructions: None,
            tools: Vec::new(),
            toolsets: Vec::new(),
            max_tool_turns: DEFAULT_MAX_TOOL_TURNS,
        }
    }

    /// Runs the agent and returns the reply text with the transcript.
    ///
    /// `input` may be a plain string for a fresh conversation, or a
    /// [`Conversation`] carrying history from an earlier run.
    pub async fn run(&self, input: impl Into<Conversation>) -> AgentResult<AgentRun<String>> {
        let mut conversation = input.into();
        if let Some(instructions) = &self.instructions {
            if conversation.system().is_none() {
                conversation = conversation.with_system(instructions.clone());
            }
        }

        let parse = |content: &Content| {
            content.joined_texts().ok_or_else(|| AgentError::Validation {
                field: "reply".to_string(),
                reason: "reply contains no text".to_string(),
            })
        };

        self.driver.drive(conversation, None, &parse).await
    }
}

/// Builder for [`ChatAgent`].
pub struct ChatAgentBuilder {
    model: Arc<dyn LanguageModel>,
    instructions: Option<String>,
    tools: Vec<Arc<dyn Tool>>,
    toolsets: Vec<Arc<dyn Toolset>>,
    max_tool_turns: usize,
}

impl ChatAgentBuilder {
    /// Sets the system instructions for every run.
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Registers a single tool.
    #[must_use]
    pub fn with_tool(mut self, tool: impl Tool + 'static) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    /// Registers a toolset.
    #[must_use]
    pub fn with_toolset(mut self, toolset: Arc<dyn Toolset>) -> Self {
        self.toolsets.push(toolset);
        self
    }

    /// Caps how many model turns a single run may take.
    #[must_use]
    pub const fn with_max_tool_turns(mut self, max_tool_turns: usize) -> Self {
        self.max_tool_turns = max_tool_turns;
        self
    }

    #[must_use]
    pub fn build(self) -> ChatAgent {
        ChatAgent {
            driver: Driver {
                model: self.model,
                toolset: combine_toolsets(self.tools, self.toolsets),
                max_tool_turns: self.max_tool_turns,
                retries: 0,
            },
            instructions: self.instructions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Message;
    use crate::testing::ScriptedModel;

    #[tokio::test(flavor = "current_thread")]
    async fn returns_reply_text_and_transcript() {
        let model = ScriptedModel::with_completions(
            "scripted",
            [ScriptedModel::text_completion("Hello there!")],
        );
        let agent = ChatAgent::builder(model)
            .with_instructions("Be friendly")
            .build();

        let run = agent.run("Hi").await.expect("run");
        assert_eq!(run.output(), "Hello there!");
        assert_eq!(run.transcript().system(), Some("Be friendly"));
        assert_eq!(run.transcript().messages().len(), 2);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn transcript_feeds_back_as_history() {
        let model = ScriptedModel::with_completions(
            "scripted",
            [
                ScriptedModel::text_completion("First answer"),
                ScriptedModel::text_completion("Second answer"),
            ],
        );
        let agent = ChatAgent::builder(model).build();

        let first = agent.run("Question one").await.expect("first run");
        let history = first
            .transcript()
            .clone()
            .add(Message::user("Question two"));

        let second = agent.run(history).await.expect("second run");
        assert_eq!(second.output(), "Second answer");
        // history (2) + follow-up user + assistant reply
        assert_eq!(second.transcript().messages().len(), 4);
    }
}
