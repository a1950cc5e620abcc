//! Core tool types: declarations, calls, replies, and the [`Tool`] trait.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tools::ToolContext;

/// Declaration that describes a tool's interface to the model.
///
/// The `parameters` field is a JSON Schema object describing the expected
/// arguments, sent verbatim to the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    name: String,
    description: String,
    parameters: Value,
}

impl ToolSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn parameters(&self) -> &Value {
        &self.parameters
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    id: String,
    name: String,
    arguments: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn arguments(&self) -> &Value {
        &self.arguments
    }
}

/// Result of a tool execution: either success data or an error message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutcome {
    success: bool,
    data: Value,
    error: Option<String>,
}

impl ToolOutcome {
    #[must_use]
    pub const fn success(data: Value) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Value::Null,
            error: Some(message.into()),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    #[must_use]
    pub const fn data(&self) -> &Value {
        &self.data
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// A tool outcome paired with the id of the call that produced it.
///
/// Replies are appended to the transcript as `Tool`-role messages so the
/// model can correlate them with its earlier calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolReply {
    call_id: String,
    outcome: ToolOutcome,
}

impl ToolReply {
    pub fn new(call_id: impl Into<String>, outcome: ToolOutcome) -> Self {
        Self {
            call_id: call_id.into(),
            outcome,
        }
    }

    #[must_use]
    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    #[must_use]
    pub const fn outcome(&self) -> &ToolOutcome {
        &self.outcome
    }
}

/// Core trait for tools the model may invoke during a run.
///
/// Implementations must be `Send + Sync` so agents can share them across
/// async tasks. Most callers use [`FunctionTool`](crate::tools::FunctionTool)
/// instead of implementing this directly.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name of the tool within an agent.
    fn name(&self) -> &str;

    /// Human-readable description shown to the model.
    fn description(&self) -> &str;

    /// Declaration describing this tool's interface to the model.
    fn spec(&self) -> ToolSpec;

    /// Executes the tool with the given arguments and context.
    async fn invoke(&self, args: HashMap<String, Value>, ctx: &ToolContext<'_>) -> ToolOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outcome_constructors_set_flags() {
        let ok = ToolOutcome::success(json!({"temp": 72}));
        assert!(ok.is_success());
        assert_eq!(ok.data()["temp"], json!(72));
        assert!(ok.error_message().is_none());

        let err = ToolOutcome::error("boom");
        assert!(!err.is_success());
        assert_eq!(err.error_message(), Some("boom"));
        assert!(err.data().is_null());
    }

    #[test]
    fn reply_keeps_call_id() {
        let reply = ToolReply::new("call-1", ToolOutcome::success(Value::Null));
        assert_eq!(reply.call_id(), "call-1");
        assert!(reply.outcome().is_success());
    }
}
