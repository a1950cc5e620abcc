//! Typed agent with structured output and dependency injection.

use std::marker::PhantomData;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::agent::output::{parse_output, schema_instructions};
use crate::agent::runner::{combine_toolsets, AgentRun, Driver, DEFAULT_MAX_TOOL_TURNS};
use crate::errors::AgentResult;
use crate::models::{Content, Conversation, LanguageModel};
use crate::tools::{Tool, Toolset};

/// An agent whose output is deserialized into `T`.
///
/// The output type's JSON Schema is appended to the system instructions, and
/// the reply is parsed into `T`. A reply that fails to parse is sent back to
/// the model with a corrective message, up to the configured retry budget.
///
/// `D` is the dependency type injected per run: it drives the dynamic
/// instructions callback and is exposed to tools as JSON through
/// [`ToolContext::deps`](crate::tools::ToolContext::deps). Agents without
/// dependencies use the default `D = ()` and [`run`](Agent::run).
///
/// # Examples
///
/// ```ignore
/// use deskagent::agent::Agent;
/// use schemars::JsonSchema;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, JsonSchema)]
/// struct SupportReply {
///     response: String,
///     needs_escalation: bool,
/// }
///
/// let agent: Agent<SupportReply> = Agent::builder(model)
///     .with_instructions("You are a customer support agent.")
///     .with_retries(3)
///     .build();
///
/// let run = agent.run("My package never arrived").await?;
/// println!("escalate: {}", run.output().needs_escalation);
/// ```
pub struct Agent<T, D = ()> {
    driver: Driver,
    instructions: Option<String>,
    instructions_fn: Option<Box<dyn Fn(&D) -> String + Send + Sync>>,
    _output: PhantomData<fn() -> T>,
}

impl<T, D> Agent<T, D>
where
    T: DeserializeOwned + JsonSchema + Send + 'static,
    D: Serialize + Sync,
{
    /// Starts building a typed agent around the given model.
    pub fn builder(model: impl LanguageModel + 'static) -> AgentBuilder<T, D> {
        AgentBuilder {
            model: Arc::new(model),
            instructions: None,
            instructions_fn: None,
            tools: Vec::new(),
            toolsets: Vec::new(),
            max_tool_turns: DEFAULT_MAX_TOOL_TURNS,
            retries: 0,
            _output: PhantomData,
        }
    }

    /// Runs the agent with the given dependencies.
    ///
    /// The dependencies are serialized once: the JSON is handed to tools via
    /// their context, and the value itself feeds the dynamic instructions
    /// callback if one is set.
    pub async fn run_with(
        &self,
        input: impl Into<Conversation>,
        deps: &D,
    ) -> AgentResult<AgentRun<T>> {
        let deps_value = serde_json::to_value(deps)?;
        let deps_ref = (!deps_value.is_null()).then_some(&deps_value);

        let mut system_parts = Vec::new();
        if let Some(instructions) = &self.instructions {
            system_parts.push(instructions.clone());
        }
        if let Some(instructions_fn) = &self.instructions_fn {
            system_parts.push(instructions_fn(deps));
        }
        system_parts.push(schema_instructions::<T>()?);

        let conversation = input.into().with_system(system_parts.join("\n\n"));

        let parse = |content: &Content| parse_output::<T>(content);
        self.driver.drive(conversation, deps_ref, &parse).await
    }
}

impl<T> Agent<T, ()>
where
    T: DeserializeOwned + JsonSchema + Send + 'static,
{
    /// Runs a dependency-free agent.
    pub async fn run(&self, input: impl Into<Conversation>) -> AgentResult<AgentRun<T>> {
        self.run_with(input, &()).await
    }
}

/// Builder for [`Agent`].
pub struct AgentBuilder<T, D = ()> {
    model: Arc<dyn LanguageModel>,
    instructions: Option<String>,
    instructions_fn: Option<Box<dyn Fn(&D) -> String + Send + Sync>>,
    tools: Vec<Arc<dyn Tool>>,
    toolsets: Vec<Arc<dyn Toolset>>,
    max_tool_turns: usize,
    retries: u32,
    _output: PhantomData<fn() -> T>,
}

impl<T, D> AgentBuilder<T, D>
where
    T: DeserializeOwned + JsonSchema + Send + 'static,
    D: Serialize + Sync,
{
    /// Sets the static part of the system instructions.
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Sets a callback that derives extra instructions from the run's
    /// dependencies, appended after the static instructions.
    #[must_use]
    pub fn with_instructions_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&D) -> String + Send + Sync + 'static,
    {
        self.instructions_fn = Some(Box::new(f));
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

    /// Sets how many times a rejected reply is sent back for another attempt.
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Caps how many model turns a single run may take.
    #[must_use]
    pub const fn with_max_tool_turns(mut self, max_tool_turns: usize) -> Self {
        self.max_tool_turns = max_tool_turns;
        self
    }

    #[must_use]
    pub fn build(self) -> Agent<T, D> {
        Agent {
            driver: Driver {
                model: self.model,
                toolset: combine_toolsets(self.tools, self.toolsets),
                max_tool_turns: self.max_tool_turns,
                retries: self.retries,
            },
            instructions: self.instructions,
            instructions_fn: self.instructions_fn,
            _output: PhantomData,
        }
    }
}
