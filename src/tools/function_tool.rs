//! Function-based tool implementation.
//!
//! [`FunctionTool`] wraps an async closure as a [`Tool`] so callers don't have
//! to implement the trait by hand.
//!
//! # Examples
//!
//! ```ignore
//! use deskagent::tools::{FunctionTool, ToolOutcome};
//! use serde_json::json;
//!
//! let weather_tool = FunctionTool::new(
//!     "get_weather",
//!     "Get current weather for a location",
//!     |args, _ctx| {
//!         Box::pin(async move {
//!             let location = args
//!                 .get("location")
//!                 .and_then(|v| v.as_str())
//!                 .unwrap_or("Unknown");
//!             ToolOutcome::success(json!({"location": location, "temperature": 72}))
//!         })
//!     },
//! )
//! .with_parameters_schema(json!({
//!     "type": "object",
//!     "properties": {
//!         "location": {"type": "string", "description": "City name"}
//!     },
//!     "required": ["location"]
//! }));
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tools::{Tool, ToolContext, ToolOutcome, ToolSpec};

type ToolFuture<'a> = Pin<Box<dyn Future<Output = ToolOutcome> + Send + 'a>>;

/// Trait combining the bounds required of a tool closure.
///
/// This exists to work around E0225 (only one non-auto trait allowed in a
/// `dyn` object); any matching closure implements it automatically.
pub trait ToolFn:
    for<'a> Fn(HashMap<String, Value>, &'a ToolContext<'a>) -> ToolFuture<'a> + Send + Sync
{
}

impl<T> ToolFn for T where
    T: for<'a> Fn(HashMap<String, Value>, &'a ToolContext<'a>) -> ToolFuture<'a>
        + Send
        + Sync
        + 'static
{
}

/// A tool backed by an async closure.
pub struct FunctionTool {
    name: String,
    description: String,
    function: Box<dyn ToolFn>,
    parameters: Value,
}

impl FunctionTool {
    /// Creates a new function tool with the given name, description, and closure.
    ///
    /// The closure receives the arguments supplied by the model and the
    /// run-scoped [`ToolContext`], and returns a boxed future resolving to a
    /// [`ToolOutcome`].
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, function: F) -> Self
    where
        F: for<'a> Fn(HashMap<String, Value>, &'a ToolContext<'a>) -> ToolFuture<'a>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            function: Box::new(function),
            parameters: json!({"type": "object"}),
        }
    }

    /// Sets the JSON Schema describing the expected parameters.
    #[must_use]
    pub fn with_parameters_schema(mut self, schema: Value) -> Self {
        self.parameters = schema;
        self
    }

    /// Returns a reference to the parameters schema.
    #[must_use]
    pub const fn parameters_schema(&self) -> &Value {
        &self.parameters
    }
}

#[async_trait]
impl Tool for FunctionTool {
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
            self.parameters.clone(),
        )
    }

    async fn invoke(&self, args: HashMap<String, Value>, ctx: &ToolContext<'_>) -> ToolOutcome {
        (self.function)(args, ctx).await
    }
}
