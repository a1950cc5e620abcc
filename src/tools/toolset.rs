//! Toolset abstractions for grouping related tools.
//!
//! A [`Toolset`] is a collection of tools with lifecycle management. The
//! in-memory [`StaticToolset`] covers most cases; [`CombinedToolset`] chains
//! two toolsets together so agent builders can compose several sources.

use std::sync::Arc;

use async_trait::async_trait;

use crate::tools::Tool;

/// A collection of related tools with a lifecycle.
///
/// [`close`](Toolset::close) should be called when the toolset is no longer
/// needed so implementations backed by external resources can release them.
/// For in-memory toolsets it is a no-op. Agents never close the toolsets
/// they are given; closing stays with the owner, so one toolset can back any
/// number of runs.
#[async_trait]
pub trait Toolset: Send + Sync {
    /// Returns all tools in the toolset.
    ///
    /// Cloning `Arc`s is cheap but this still allocates; callers that need
    /// the list repeatedly should cache it.
    async fn tools(&self) -> Vec<Arc<dyn Tool>>;

    /// Releases resources held by the toolset.
    async fn close(&self) {}
}

/// Simple in-memory collection of tools.
#[derive(Default)]
pub struct StaticToolset {
    tools: Vec<Arc<dyn Tool>>,
}

impl StaticToolset {
    pub fn new<T>(tools: T) -> Self
    where
        T: IntoIterator<Item = Arc<dyn Tool>>,
    {
        Self {
            tools: tools.into_iter().collect(),
        }
    }

    /// Builder-style helper to add a tool while consuming the toolset.
    #[must_use]
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }
}

#[async_trait]
impl Toolset for StaticToolset {
    async fn tools(&self) -> Vec<Arc<dyn Tool>> {
        self.tools.clone()
    }
}

/// Composes two toolsets into one.
pub struct CombinedToolset {
    left: Arc<dyn Toolset>,
    right: Arc<dyn Toolset>,
}

impl CombinedToolset {
    pub fn new(left: Arc<dyn Toolset>, right: Arc<dyn Toolset>) -> Self {
        Self { left, right }
    }
}

#[async_trait]
impl Toolset for CombinedToolset {
    async fn tools(&self) -> Vec<Arc<dyn Tool>> {
        let mut all = self.left.tools().await;
        all.extend(self.right.tools().await);
        all
    }

    async fn close(&self) {
        self.left.close().await;
        self.right.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{FunctionTool, ToolOutcome};
    use serde_json::Value;

    fn noop_tool(name: &str) -> Arc<dyn Tool> {
        Arc::new(FunctionTool::new(name, "No-op", |_args, _ctx| {
            Box::pin(async { ToolOutcome::success(Value::Null) })
        }))
    }

    #[tokio::test(flavor = "current_thread")]
    async fn static_toolset_returns_registered_tools() {
        let toolset = StaticToolset::new(vec![noop_tool("a")]).with_tool(noop_tool("b"));
        let tools = toolset.tools().await;
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name(), "a");
        assert_eq!(tools[1].name(), "b");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn combined_toolset_merges_both_sides() {
        let left = Arc::new(StaticToolset::new(vec![noop_tool("a")])) as Arc<dyn Toolset>;
        let right = Arc::new(StaticToolset::new(vec![noop_tool("b")])) as Arc<dyn Toolset>;

        let combined = CombinedToolset::new(left, right);
        let names: Vec<String> = combined
            .tools()
            .await
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
