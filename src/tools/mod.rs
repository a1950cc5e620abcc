//! Tools the model can invoke during an agent run.
//!
//! # Core concepts
//!
//! - [`Tool`]: the fundamental trait for implementing a tool
//! - [`FunctionTool`]: wrapper turning an async closure into a tool
//! - [`Toolset`]: collections of related tools
//! - [`ToolContext`]: restricted execution context passed to tools
//! - [`ScratchState`]: run-scoped key-value storage shared between tools

mod context;
mod function_tool;
mod tool;
mod toolset;

pub use context::{ScratchState, ScratchStore, ToolContext, ToolContextBuilder};
pub use function_tool::{FunctionTool, ToolFn};
pub use tool::{Tool, ToolCall, ToolOutcome, ToolReply, ToolSpec};
pub use toolset::{CombinedToolset, StaticToolset, Toolset};
