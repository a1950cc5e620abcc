//! Execution context handed to tools.
//!
//! Tools never see the full agent; they receive a [`ToolContext`] that limits
//! them to two things: the dependencies injected into the run (as JSON) and a
//! scratch key-value store shared by every tool invocation within the run.

use std::sync::Arc;

use serde_json::Value;

use crate::errors::{AgentError, AgentResult};

/// Storage for run-scoped key-value data shared between tool invocations.
pub trait ScratchStore: Send + Sync {
    /// Persists a JSON value under the provided key, replacing any previous value.
    fn set(&self, key: &str, value: Value);

    /// Retrieves a JSON value for the given key, cloning it out of the store.
    fn get(&self, key: &str) -> Option<Value>;
}

/// Default in-memory [`ScratchStore`] backed by a concurrent map.
#[derive(Clone, Default)]
pub struct ScratchState {
    state: Arc<dashmap::DashMap<String, Value>>,
}

impl ScratchState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScratchStore for ScratchState {
    fn set(&self, key: &str, value: Value) {
        self.state.insert(key.to_owned(), value);
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.state.get(key).map(|entry| entry.value().clone())
    }
}

/// Restricted execution context passed to [`Tool::invoke`](crate::tools::Tool::invoke).
pub struct ToolContext<'a> {
    deps: Option<&'a Value>,
    scratch: &'a dyn ScratchStore,
}

impl std::fmt::Debug for ToolContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("deps", &self.deps)
            .finish_non_exhaustive()
    }
}

impl<'a> ToolContext<'a> {
    /// Creates a builder for assembling a context.
    #[must_use]
    pub fn builder() -> ToolContextBuilder<'a> {
        ToolContextBuilder {
            deps: None,
            scratch: None,
        }
    }

    /// Returns the dependencies injected into this run, if any, as JSON.
    #[must_use]
    pub const fn deps(&self) -> Option<&'a Value> {
        self.deps
    }

    /// Stores a value in the run-scoped scratch state.
    pub fn set(&self, key: &str, value: Value) {
        self.scratch.set(key, value);
    }

    /// Reads a value from the run-scoped scratch state.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.scratch.get(key)
    }
}

/// Builder for [`ToolContext`].
pub struct ToolContextBuilder<'a> {
    deps: Option<&'a Value>,
    scratch: Option<&'a dyn ScratchStore>,
}

impl<'a> ToolContextBuilder<'a> {
    #[must_use]
    pub fn with_deps(mut self, deps: &'a Value) -> Self {
        self.deps = Some(deps);
        self
    }

    #[must_use]
    pub fn with_scratch(mut self, scratch: &'a dyn ScratchStore) -> Self {
        self.scratch = Some(scratch);
        self
    }

    /// Finalizes the context.
    ///
    /// # Errors
    ///
    /// Returns an error if no scratch store was provided.
    pub fn build(self) -> AgentResult<ToolContext<'a>> {
        let scratch = self
            .scratch
            .ok_or_else(|| AgentError::MissingConfiguration {
                field: "tool_context.scratch".to_string(),
            })?;

        Ok(ToolContext {
            deps: self.deps,
            scratch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scratch_state_round_trips_values() {
        let state = ScratchState::new();
        assert!(state.get("missing").is_none());

        state.set("key", json!(42));
        assert_eq!(state.get("key"), Some(json!(42)));
    }

    #[test]
    fn context_exposes_deps_and_scratch() {
        let state = ScratchState::new();
        let deps = json!({"customer_id": "1"});

        let ctx = ToolContext::builder()
            .with_scratch(&state)
            .with_deps(&deps)
            .build()
            .expect("context");

        assert_eq!(ctx.deps().unwrap()["customer_id"], json!("1"));

        ctx.set("seen", json!(true));
        assert_eq!(ctx.get("seen"), Some(json!(true)));
    }

    #[test]
    fn builder_requires_scratch() {
        let err = ToolContext::builder().build().expect_err("should fail");
        assert!(matches!(err, AgentError::MissingConfiguration { .. }));
    }
}
